//! Module Discovery
//!
//! Walks a search directory, resolves each module's descriptor and decides
//! which modules take part in the build.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::env::BuildEnv;
use crate::error::Result;
use crate::modules::config::{ConfigRegistry, ModuleConfig, probe};

/// Icon directory used when a module does not name one
pub const DEFAULT_ICONS_DIR: &str = "icons";

/// A module directory together with its descriptor
pub struct DetectedModule {
    pub path: PathBuf,
    pub config: Arc<dyn ModuleConfig>,
}

impl fmt::Debug for DetectedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectedModule").field("path", &self.path).finish_non_exhaustive()
    }
}

/// Immediate subdirectories of `search_path` that have a descriptor
pub fn detect_modules(
    search_path: &Path,
    registry: &ConfigRegistry,
) -> Result<BTreeMap<String, DetectedModule>> {
    let mut modules = BTreeMap::new();

    let walker = WalkDir::new(search_path).min_depth(1).max_depth(1).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        match registry.resolve(&name, entry.path())? {
            Some(config) => {
                debug!("Detected module '{}' at {}", name, entry.path().display());
                modules.insert(name, DetectedModule { path: entry.path().to_path_buf(), config });
            }
            None => debug!("Skipping {}: no module descriptor", entry.path().display()),
        }
    }

    Ok(modules)
}

/// Detect the modules under `search_path` and return the enabled ones
/// keyed by name.
///
/// Records `module_<name>_enabled` for every detected module, the declared
/// dependencies, documentation class paths and icon paths in `env`.
pub fn detect_modules_within_searchpath(
    search_path: &Path,
    env: &mut BuildEnv,
    platform: &str,
    registry: &ConfigRegistry,
) -> Result<BTreeMap<String, PathBuf>> {
    let detected = detect_modules(search_path, registry)?;

    for (name, module) in &detected {
        let enabled = if env.modules_enabled_by_default() {
            env.module_enabled(name).or_else(|| module.config.is_enabled()).unwrap_or(true)
        } else {
            false
        };
        env.set_module_enabled(name, enabled);
    }

    let mut candidates = Vec::new();

    for (name, module) in &detected {
        if env.module_enabled(name) != Some(true) {
            debug!("Module '{}' is disabled", name);
            continue;
        }

        let config = module.config.as_ref();
        if !config.can_build(env, platform) {
            debug!("Module '{}' cannot be built for {}", name, platform);
            env.set_module_enabled(name, false);
            continue;
        }

        let deps = config.dependencies();
        env.module_add_dependencies(name, deps.required, false);
        env.module_add_dependencies(name, deps.optional, true);
        candidates.push((name, module));
    }

    // Disabling one module can leave another without a required
    // dependency, so repeat until the set is stable.
    loop {
        let mut changed = false;
        for (name, _) in &candidates {
            if env.module_enabled(name) == Some(true) && !env.module_check_dependencies(name) {
                warn!("Disabling module '{}': a required dependency is not enabled", name);
                env.set_module_enabled(name, false);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut enabled_modules = BTreeMap::new();

    for (name, module) in candidates {
        if env.module_enabled(name) != Some(true) {
            continue;
        }

        let config = module.config.as_ref();
        config.configure(env);
        collect_doc_classes(name, &module.path, config, env);
        collect_icons_path(name, &module.path, config, env);

        enabled_modules.insert(name.clone(), module.path.clone());
    }

    info!("Enabled {} of {} modules in {}", enabled_modules.len(), detected.len(), search_path.display());
    Ok(enabled_modules)
}

fn collect_doc_classes(name: &str, path: &Path, config: &dyn ModuleConfig, env: &mut BuildEnv) {
    let Some(classes) = probe(name, "doc_classes", config.doc_classes()) else {
        return;
    };
    let Some(doc_path) = probe(name, "doc_path", config.doc_path()) else {
        return;
    };

    let doc_dir = path.join(doc_path);
    for class in classes {
        env.doc_class_path.insert(class, doc_dir.clone());
    }
}

fn collect_icons_path(name: &str, path: &Path, config: &dyn ModuleConfig, env: &mut BuildEnv) {
    let icons = probe(name, "icons_path", config.icons_path())
        .unwrap_or_else(|| DEFAULT_ICONS_DIR.to_string());
    env.module_icons_paths.push(path.join(icons));
}
