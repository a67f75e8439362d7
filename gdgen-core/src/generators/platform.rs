//! Platform API and export plugin registration sources

use std::fs;

use crate::dispatch::{ArgShape, CommandArgs, Generator};
use crate::env::BuildEnv;
use crate::error::Result;

/// Source for `register_platform_apis()` / `unregister_platform_apis()`
pub fn render_platform_apis(platforms: &[String]) -> String {
    let mut includes = String::from("#include \"register_platform_apis.h\"\n");
    let mut register = String::from("void register_platform_apis() {\n");
    let mut unregister = String::from("void unregister_platform_apis() {\n");

    for platform in platforms {
        register.push_str(&format!("\tregister_{}_api();\n", platform));
        unregister.push_str(&format!("\tunregister_{}_api();\n", platform));
        includes.push_str(&format!("#include \"{}/api/api.h\"\n", platform));
    }
    includes.push('\n');
    register.push_str("}\n\n");
    unregister.push_str("}\n");

    includes + &register + &unregister
}

/// Source for `register_exporters()` / `register_exporter_types()`
pub fn render_platform_exporters(exporters: &[String]) -> String {
    let mut includes = String::from("#include \"register_exporters.h\"\n\n");
    let mut body = String::from("void register_exporters() {\n");

    for exporter in exporters {
        body.push_str(&format!("\tregister_{}_exporter();\n", exporter));
        includes.push_str(&format!("#include \"platform/{}/export/export.h\"\n", exporter));
    }
    body.push_str("}\n\n");

    body.push_str("void register_exporter_types() {\n");
    for exporter in exporters {
        body.push_str(&format!("\tregister_{}_exporter_types();\n", exporter));
    }
    body.push_str("}\n");

    includes + &body
}

/// `make_register_platform_apis`: platforms come from the `platform_apis`
/// environment list
pub struct RegisterPlatformApis;

impl Generator for RegisterPlatformApis {
    fn name(&self) -> &'static str {
        "make_register_platform_apis"
    }

    fn shape(&self) -> Option<ArgShape> {
        Some(ArgShape::Output)
    }

    fn generate(&self, args: &CommandArgs, env: &mut BuildEnv) -> Result<()> {
        let platforms = env.string_list("platform_apis");
        fs::write(args.output()?, render_platform_apis(&platforms))?;
        Ok(())
    }
}

/// `make_editor_platform_exporters`: `--input` is a whitespace separated
/// list of exporter names
pub struct EditorPlatformExporters;

impl Generator for EditorPlatformExporters {
    fn name(&self) -> &'static str {
        "make_editor_platform_exporters"
    }

    fn shape(&self) -> Option<ArgShape> {
        Some(ArgShape::InputOutput)
    }

    fn generate(&self, args: &CommandArgs, _env: &mut BuildEnv) -> Result<()> {
        let exporters: Vec<String> =
            args.inputs()?.iter().flat_map(|s| s.split_whitespace()).map(str::to_string).collect();
        fs::write(args.output()?, render_platform_exporters(&exporters))?;
        Ok(())
    }
}
