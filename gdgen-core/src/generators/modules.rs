//! `modules_enabled.gen.h` and `register_module_types.gen.cpp`

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::dispatch::{ArgShape, CommandArgs, Generator};
use crate::env::BuildEnv;
use crate::error::Result;
use crate::modules::{ConfigRegistry, detect_modules_within_searchpath, sort_module_list};
use crate::output::write_wrapped;

/// One `#define MODULE_<NAME>_ENABLED` per module
pub fn render_modules_enabled(modules: &[String]) -> String {
    modules.iter().map(|m| format!("#define MODULE_{}_ENABLED\n", m.to_uppercase())).collect()
}

/// Module registration source. Only modules whose `register_types.h`
/// exists under `base_dir` are included.
pub fn render_register_module_types(modules: &[(String, PathBuf)], base_dir: &Path) -> String {
    let mut includes = String::new();
    let mut initialize = String::new();
    let mut uninitialize = String::new();

    for (name, path) in modules {
        if !base_dir.join(path).join("register_types.h").is_file() {
            debug!("Module '{}' has no register_types.h", name);
            continue;
        }

        let path = path.to_string_lossy().replace('\\', "/");
        let upper = name.to_uppercase();
        includes.push_str(&format!("#include \"{}/register_types.h\"\n", path));
        initialize.push_str(&format!(
            "#ifdef MODULE_{upper}_ENABLED\n\tinitialize_{name}_module(p_level);\n#endif\n"
        ));
        uninitialize.push_str(&format!(
            "#ifdef MODULE_{upper}_ENABLED\n\tuninitialize_{name}_module(p_level);\n#endif\n"
        ));
    }

    format!(
        "// register_module_types.gen.cpp\n\
         /* THIS FILE IS GENERATED DO NOT EDIT */\n\
         #include \"register_module_types.h\"\n\
         \n\
         #include \"modules/modules_enabled.gen.h\"\n\
         \n\
         {includes}\n\
         \n\
         void initialize_modules(ModuleInitializationLevel p_level) {{\n\
         {initialize}\n\
         }}\n\
         \n\
         void uninitialize_modules(ModuleInitializationLevel p_level) {{\n\
         {uninitialize}\n\
         }}\n"
    )
}

/// `make_modules_enabled_and_types --input <modules dir> [--input2 <custom
/// modules dir>] --output <register_module_types.gen.cpp> --output2
/// <modules_enabled.gen.h>`
pub struct ModulesEnabledAndTypes {
    configs: Arc<ConfigRegistry>,
}

impl ModulesEnabledAndTypes {
    pub fn new(configs: Arc<ConfigRegistry>) -> Self {
        Self { configs }
    }
}

impl Generator for ModulesEnabledAndTypes {
    fn name(&self) -> &'static str {
        "make_modules_enabled_and_types"
    }

    fn shape(&self) -> Option<ArgShape> {
        None
    }

    fn generate(&self, args: &CommandArgs, env: &mut BuildEnv) -> Result<()> {
        let input = PathBuf::from(args.input()?);
        let base_dir = input.parent().map(Path::to_path_buf).unwrap_or_default();
        debug!("Detecting engine modules under {}", input.display());

        let platform = env.platform().to_string();
        let mut modules =
            detect_modules_within_searchpath(&input, env, &platform, &self.configs)?;
        for path in modules.values_mut() {
            if let Ok(relative) = path.strip_prefix(&base_dir) {
                *path = relative.to_path_buf();
            }
        }

        if let Some(custom) = &args.input2 {
            let custom =
                detect_modules_within_searchpath(Path::new(custom), env, &platform, &self.configs)?;
            modules.extend(custom);
        }

        let names: Vec<String> = modules.keys().cloned().collect();
        let ordered = sort_module_list(&names, &env.module_dependencies);
        env.set("module_list", Value::from(ordered.clone()));

        let ordered_modules: Vec<(String, PathBuf)> =
            ordered.iter().map(|name| (name.clone(), modules[name].clone())).collect();

        write_wrapped(args.output2()?, &render_modules_enabled(&ordered))?;
        fs::write(args.output()?, render_register_module_types(&ordered_modules, &base_dir))?;
        Ok(())
    }
}
