//! `ClassDB_Disable_*` defines

use crate::dispatch::{ArgShape, CommandArgs, Generator};
use crate::env::BuildEnv;
use crate::error::Result;
use crate::output::write_wrapped;

pub fn render_disabled_classes(classes: &[String]) -> String {
    classes
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(|c| format!("#define ClassDB_Disable_{} 1\n", c))
        .collect()
}

/// `disabled_classes`: classes come from the `disable_classes` environment
/// list, empty unless the build configures one
pub struct DisabledClasses;

impl Generator for DisabledClasses {
    fn name(&self) -> &'static str {
        "disabled_classes"
    }

    fn shape(&self) -> Option<ArgShape> {
        Some(ArgShape::Output)
    }

    fn generate(&self, args: &CommandArgs, env: &mut BuildEnv) -> Result<()> {
        let classes = env.string_list("disable_classes");
        write_wrapped(args.output()?, &render_disabled_classes(&classes))
    }
}
