//! Process-wide build environment
//!
//! The environment starts from the defaults the engine's build scripts
//! expect and is then overlaid with the JSON object passed via `--env`.
//! Module discovery records its bookkeeping here as well.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{GenError, Result};

/// Dependencies declared by a module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDependencies {
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

/// Key/value build configuration plus discovery bookkeeping
#[derive(Debug, Clone)]
pub struct BuildEnv {
    values: Map<String, Value>,
    /// Documentation directory per documented class
    pub doc_class_path: BTreeMap<String, PathBuf>,
    /// Icon directories of enabled modules, in discovery order
    pub module_icons_paths: Vec<PathBuf>,
    /// Declared dependencies per module
    pub module_dependencies: BTreeMap<String, ModuleDependencies>,
}

impl Default for BuildEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildEnv {
    /// Create an environment holding only the defaults
    pub fn new() -> Self {
        let defaults = json!({
            "platform": "macos",
            "arch": "arm64",
            "modules_enabled_by_default": true,
            "disable_3d": false,
            "openxr": true,
            "opengl3": true,
            "minizip": true,
            "builtin_certs": true,
            "system_certs_path": "",
        });

        let values = match defaults {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Self {
            values,
            doc_class_path: BTreeMap::new(),
            module_icons_paths: Vec::new(),
            module_dependencies: BTreeMap::new(),
        }
    }

    /// Defaults overlaid with the JSON object stored at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;

        let mut env = Self::new();
        env.merge(value).map_err(|reason| GenError::InvalidEnv {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(env)
    }

    /// Overlay every key of a JSON object; non-objects are rejected
    pub fn merge(&mut self, value: Value) -> std::result::Result<(), String> {
        let Value::Object(map) = value else {
            return Err(format!("expected a JSON object, found {}", kind_of(&value)));
        };

        for (key, value) in map {
            debug!("env {} = {}", key, value);
            self.values.insert(key, value);
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// String value of `key`, if it is a string
    pub fn str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// String value of `key`, failing when it is missing
    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.str(key).ok_or_else(|| GenError::MissingEnvKey(key.to_string()))
    }

    /// Truthiness of `key` the way build options are usually spelled
    pub fn flag(&self, key: &str) -> bool {
        match self.values.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => {
                matches!(s.to_ascii_lowercase().as_str(), "1" | "yes" | "true" | "on")
            }
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }

    /// List value of `key`: a JSON array of strings or a whitespace
    /// separated string. Missing keys give an empty list.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.values.get(key) {
            Some(Value::Array(items)) => {
                items.iter().filter_map(Value::as_str).map(str::to_string).collect()
            }
            Some(Value::String(s)) => s.split_whitespace().map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }

    pub fn platform(&self) -> &str {
        self.str("platform").unwrap_or_default()
    }

    pub fn modules_enabled_by_default(&self) -> bool {
        self.flag("modules_enabled_by_default")
    }

    /// Explicit `module_<name>_enabled` setting, if any
    pub fn module_enabled(&self, name: &str) -> Option<bool> {
        match self.values.get(&module_enabled_key(name)) {
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::Null) | None => None,
            Some(_) => Some(self.flag(&module_enabled_key(name))),
        }
    }

    pub fn set_module_enabled(&mut self, name: &str, enabled: bool) {
        self.set(module_enabled_key(name), enabled);
    }

    /// Record the required or optional dependencies of `module`
    pub fn module_add_dependencies(&mut self, module: &str, dependencies: Vec<String>, optional: bool) {
        let entry = self.module_dependencies.entry(module.to_string()).or_default();
        if optional {
            entry.optional = dependencies;
        } else {
            entry.required = dependencies;
        }
    }

    /// True when every required dependency of `module` is enabled
    pub fn module_check_dependencies(&self, module: &str) -> bool {
        let Some(deps) = self.module_dependencies.get(module) else {
            return true;
        };

        deps.required.iter().all(|dep| self.module_enabled(dep) == Some(true))
    }

    /// The raw key/value view, for handing to build helpers
    pub fn to_json(&self) -> Value {
        Value::Object(self.values.clone())
    }
}

fn module_enabled_key(name: &str) -> String {
    format!("module_{}_enabled", name)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let env = BuildEnv::new();
        assert_eq!(env.platform(), "macos");
        assert_eq!(env.str("arch"), Some("arm64"));
        assert!(env.modules_enabled_by_default());
        assert!(env.flag("builtin_certs"));
        assert!(!env.flag("disable_3d"));
        assert!(env.doc_class_path.is_empty());
    }

    #[test]
    fn test_load_overlays_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("env.json");
        fs::write(&path, r#"{"platform": "linuxbsd", "editor_build": "yes", "tools": 0}"#).unwrap();

        let env = BuildEnv::load(&path).unwrap();
        assert_eq!(env.platform(), "linuxbsd");
        assert_eq!(env.str("arch"), Some("arm64"));
        assert!(env.flag("editor_build"));
        assert!(!env.flag("tools"));
    }

    #[test]
    fn test_load_rejects_non_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("env.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = BuildEnv::load(&path).unwrap_err();
        assert!(matches!(err, GenError::InvalidEnv { .. }));
    }

    #[test]
    fn test_string_list() {
        let mut env = BuildEnv::new();
        env.set("a", json!(["x", "y"]));
        env.set("b", "x  y\tz");
        assert_eq!(env.string_list("a"), vec!["x", "y"]);
        assert_eq!(env.string_list("b"), vec!["x", "y", "z"]);
        assert!(env.string_list("missing").is_empty());
    }

    #[test]
    fn test_dependency_check() {
        let mut env = BuildEnv::new();
        env.module_add_dependencies("text", vec!["freetype".to_string()], false);
        env.module_add_dependencies("text", vec!["svg".to_string()], true);
        assert!(!env.module_check_dependencies("text"));

        env.set_module_enabled("freetype", true);
        assert!(env.module_check_dependencies("text"));
        assert!(env.module_check_dependencies("no_deps"));
        assert_eq!(env.module_dependencies["text"].optional, vec!["svg"]);
    }
}
