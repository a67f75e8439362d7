// Module Configuration Interface
//
// Each engine module answers a handful of capability queries. Only
// `can_build` is mandatory; every other query has a default, and an
// optional query that fails is treated the same as one that is absent.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::env::{BuildEnv, ModuleDependencies};
use crate::modules::manifest::{DESCRIPTOR_FILE, ManifestParser};

/// Capability queries a module descriptor answers
pub trait ModuleConfig {
    /// Whether the module is on by default; `None` means unspecified
    fn is_enabled(&self) -> Option<bool> {
        None
    }

    /// Whether the module can be built for `platform` with `env`
    fn can_build(&self, env: &BuildEnv, platform: &str) -> bool;

    /// Required and optional module dependencies
    fn dependencies(&self) -> ModuleDependencies {
        ModuleDependencies::default()
    }

    /// Apply module specific settings to the environment
    fn configure(&self, _env: &mut BuildEnv) {}

    /// Classes documented by this module
    fn doc_classes(&self) -> Result<Option<Vec<String>>> {
        Ok(None)
    }

    /// Documentation directory relative to the module
    fn doc_path(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// Editor icon directory relative to the module
    fn icons_path(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Run an optional capability query, downgrading failures to absence
pub fn probe<T>(module: &str, capability: &str, result: Result<Option<T>>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            debug!("Module '{}' {} query failed, treating as absent: {:#}", module, capability, e);
            None
        }
    }
}

/// Lookup of module descriptors by module name
///
/// Registered descriptors take precedence; otherwise the module directory's
/// descriptor file is parsed.
#[derive(Default, Clone)]
pub struct ConfigRegistry {
    configs: HashMap<String, Arc<dyn ModuleConfig>>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor for `name`, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, config: Arc<dyn ModuleConfig>) {
        self.configs.insert(name.into(), config);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    /// Descriptor for the module `name` living in `dir`, if it has one
    pub fn resolve(
        &self,
        name: &str,
        dir: &Path,
    ) -> crate::error::Result<Option<Arc<dyn ModuleConfig>>> {
        if let Some(config) = self.configs.get(name) {
            return Ok(Some(Arc::clone(config)));
        }

        let descriptor = dir.join(DESCRIPTOR_FILE);
        if !descriptor.is_file() {
            return Ok(None);
        }

        let manifest = ManifestParser::parse_from_path(&descriptor)?;
        Ok(Some(Arc::new(manifest)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl ModuleConfig for Bare {
        fn can_build(&self, _env: &BuildEnv, _platform: &str) -> bool {
            true
        }
    }

    #[test]
    fn test_defaults_are_absent() {
        let config = Bare;
        assert_eq!(config.is_enabled(), None);
        assert!(config.doc_classes().unwrap().is_none());
        assert!(config.doc_path().unwrap().is_none());
        assert!(config.icons_path().unwrap().is_none());
        assert_eq!(config.dependencies(), ModuleDependencies::default());
    }

    #[test]
    fn test_probe_swallows_errors() {
        let failed: Result<Option<String>> = Err(anyhow::anyhow!("boom"));
        assert_eq!(probe("m", "doc_path", failed), None);
        assert_eq!(probe("m", "doc_path", Ok(Some(1))), Some(1));
    }

    #[test]
    fn test_registered_wins_over_missing_file() {
        let mut registry = ConfigRegistry::new();
        registry.register("bare", Arc::new(Bare));

        let dir = Path::new("/definitely/not/here");
        assert!(registry.resolve("bare", dir).unwrap().is_some());
        assert!(registry.resolve("other", dir).unwrap().is_none());
    }
}
