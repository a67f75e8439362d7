// Engine Module System
//
// Discovery of engine modules, their descriptors and their dependency
// order. Descriptors are looked up in a registry first and fall back to a
// `config.toml` next to the module sources.

pub mod config;
pub mod discovery;
pub mod manifest;
pub mod order;

#[cfg(test)]
mod tests;

pub use config::{ConfigRegistry, ModuleConfig, probe};
pub use discovery::{DEFAULT_ICONS_DIR, DetectedModule, detect_modules, detect_modules_within_searchpath};
pub use manifest::{DESCRIPTOR_FILE, ManifestParser, ModuleManifest};
pub use order::sort_module_list;
