//! Header generators
//!
//! Native generators render their output directly. The rest call into the
//! engine's build helpers through [`helpers`].

pub mod disabled_classes;
pub mod doc_class_path;
pub mod encryption;
pub mod export_icon;
pub mod helpers;
pub mod modules;
pub mod platform;

use std::sync::Arc;

use crate::dispatch::GeneratorRegistry;
use crate::modules::ConfigRegistry;

pub use disabled_classes::DisabledClasses;
pub use doc_class_path::DataClassPath;
pub use encryption::ScriptEncryptionHeader;
pub use export_icon::GenerateExportIcon;
pub use helpers::{HelperCall, HelperGenerator, helper_generators};
pub use modules::ModulesEnabledAndTypes;
pub use platform::{EditorPlatformExporters, RegisterPlatformApis};

/// Every command with descriptors resolved from `config.toml` only
pub fn standard_registry() -> GeneratorRegistry {
    standard_registry_with(Arc::new(ConfigRegistry::new()))
}

/// Every command, with module descriptors looked up in `configs` first
pub fn standard_registry_with(configs: Arc<ConfigRegistry>) -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::new();

    for generator in helper_generators() {
        registry.register(Box::new(generator));
    }

    registry.register(Box::new(DisabledClasses));
    registry.register(Box::new(ScriptEncryptionHeader));
    registry.register(Box::new(RegisterPlatformApis));
    registry.register(Box::new(EditorPlatformExporters));
    registry.register(Box::new(GenerateExportIcon));
    registry.register(Box::new(ModulesEnabledAndTypes::new(Arc::clone(&configs))));
    registry.register(Box::new(DataClassPath::new(configs)));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_covers_every_command() {
        let registry = standard_registry();
        for name in [
            "glsl",
            "gles3",
            "glsl_raw",
            "certs_header",
            "authors_header",
            "donors_header",
            "license_header",
            "disabled_classes",
            "controller_mappings",
            "gdextension_interface_dumper",
            "make_app_icon",
            "make_app_splash",
            "resource_scene_make_fonts_header",
            "resource_make_default_theme_icons",
            "make_icu_data",
            "godot_editor_builtin_fonts",
            "make_documentation_header_compressed",
            "make_editor_icons_action",
            "make_editor_translations",
            "make_editor_properties_translations",
            "make_editor_documentation_translations",
            "make_editor_themes_fonts",
            "make_version_data_headers",
            "make_script_encryption_header",
            "make_extension_wrapper",
            "make_gdscript_virtuals",
            "make_editor_gdscript_templates",
            "make_register_platform_apis",
            "make_editor_platform_exporters",
            "make_modules_enabled_and_types",
            "make_data_class_path",
            "generate_export_icon",
        ] {
            assert!(registry.contains(name), "missing command {}", name);
        }
        assert_eq!(registry.names().count(), 32);
    }
}
