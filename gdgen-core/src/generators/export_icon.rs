//! Export plugin logo/run icon headers

use std::fs;

use crate::dispatch::{ArgShape, CommandArgs, Generator};
use crate::env::BuildEnv;
use crate::error::Result;

/// Embed `svg` as an escaped C string named `_<platform>_<icon_type>_svg`
pub fn render_export_icon(platform_name: &str, icon_type: &str, svg: &[u8]) -> String {
    let mut out = String::from(" /* AUTOGENERATED FILE, DO NOT EDIT */ \n");
    out.push_str(&format!(" static const char *_{}_{}_svg = \"", platform_name, icon_type));
    for byte in svg {
        out.push_str(&format!("\\x{:x}", byte));
    }
    out.push_str("\";\n");
    out
}

/// `generate_export_icon --platform-name --icon-type --input --output`
pub struct GenerateExportIcon;

impl Generator for GenerateExportIcon {
    fn name(&self) -> &'static str {
        "generate_export_icon"
    }

    fn shape(&self) -> Option<ArgShape> {
        None
    }

    fn generate(&self, args: &CommandArgs, _env: &mut BuildEnv) -> Result<()> {
        let svg = fs::read(args.input()?)?;
        let text =
            render_export_icon(args.extra("platform_name")?, args.extra("icon_type")?, &svg);
        fs::write(args.output()?, text)?;
        Ok(())
    }
}
