//! Module Descriptor Format and Parser
//!
//! Defines the TOML descriptor (`config.toml`) found in each engine module
//! directory.

use std::fs;
use std::path::{Component, Path};

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::env::{BuildEnv, ModuleDependencies};
use crate::error::{GenError, Result};
use crate::modules::config::ModuleConfig;

/// File name of a module descriptor
pub const DESCRIPTOR_FILE: &str = "config.toml";

/// Module descriptor read from `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Enabled by default (absent = enabled)
    pub enabled: Option<bool>,
    /// Platforms the module builds on (absent = all)
    pub platforms: Option<Vec<String>>,
    /// Environment flags that must be truthy for the module to build
    #[serde(default)]
    pub requires: Vec<String>,
    /// Documented classes
    pub doc_classes: Option<Vec<String>>,
    /// Documentation directory, relative to the module
    pub doc_path: Option<String>,
    /// Editor icon directory, relative to the module
    pub icons_path: Option<String>,
    /// Module dependencies
    #[serde(default)]
    pub dependencies: ManifestDependencies,
    /// Environment entries applied when the module is configured
    #[serde(default)]
    pub env: toml::Table,
}

/// `[dependencies]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestDependencies {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

/// Module descriptor parser
pub struct ManifestParser;

impl ManifestParser {
    /// Parse a descriptor from TOML text
    pub fn parse(content: &str) -> std::result::Result<ModuleManifest, toml::de::Error> {
        toml::from_str(content)
    }

    /// Parse the descriptor stored at `path`
    pub fn parse_from_path(path: &Path) -> Result<ModuleManifest> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| GenError::InvalidDescriptor {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })
    }
}

/// A descriptor path must stay inside the module directory
fn check_relative(kind: &str, path: &str) -> anyhow::Result<()> {
    if path.trim().is_empty() {
        bail!("{} is empty", kind);
    }
    let escapes = Path::new(path)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        bail!("{} '{}' leaves the module directory", kind, path);
    }
    Ok(())
}

impl ModuleConfig for ModuleManifest {
    fn is_enabled(&self) -> Option<bool> {
        self.enabled
    }

    fn can_build(&self, env: &BuildEnv, platform: &str) -> bool {
        let platform_ok =
            self.platforms.as_ref().is_none_or(|platforms| platforms.iter().any(|p| p == platform));
        platform_ok && self.requires.iter().all(|flag| env.flag(flag))
    }

    fn dependencies(&self) -> ModuleDependencies {
        ModuleDependencies {
            required: self.dependencies.required.clone(),
            optional: self.dependencies.optional.clone(),
        }
    }

    fn configure(&self, env: &mut BuildEnv) {
        for (key, value) in &self.env {
            match serde_json::to_value(value) {
                Ok(value) => env.set(key.clone(), value),
                Err(e) => tracing::warn!("Skipping module env entry '{}': {}", key, e),
            }
        }
    }

    fn doc_classes(&self) -> anyhow::Result<Option<Vec<String>>> {
        Ok(self.doc_classes.clone())
    }

    fn doc_path(&self) -> anyhow::Result<Option<String>> {
        match &self.doc_path {
            Some(path) => {
                check_relative("doc_path", path)?;
                Ok(Some(path.clone()))
            }
            None => Ok(None),
        }
    }

    fn icons_path(&self) -> anyhow::Result<Option<String>> {
        match &self.icons_path {
            Some(path) => {
                check_relative("icons_path", path)?;
                Ok(Some(path.clone()))
            }
            None => Ok(None),
        }
    }
}
