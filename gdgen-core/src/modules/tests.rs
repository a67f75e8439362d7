//! Tests for module discovery

use super::*;
use crate::env::BuildEnv;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Create `root/<name>/config.toml` with `descriptor` as its content
fn create_module(root: &Path, name: &str, descriptor: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(DESCRIPTOR_FILE), descriptor).unwrap();
    dir
}

/// Descriptor whose documentation query always fails
struct BrokenDocs;

impl ModuleConfig for BrokenDocs {
    fn can_build(&self, _env: &BuildEnv, _platform: &str) -> bool {
        true
    }

    fn doc_classes(&self) -> anyhow::Result<Option<Vec<String>>> {
        Ok(Some(vec!["Broken".to_string()]))
    }

    fn doc_path(&self) -> anyhow::Result<Option<String>> {
        anyhow::bail!("doc path lookup exploded")
    }

    fn icons_path(&self) -> anyhow::Result<Option<String>> {
        anyhow::bail!("icon path lookup exploded")
    }
}

#[test]
fn test_minimal_descriptors_are_enabled_by_default() {
    let temp_dir = TempDir::new().unwrap();
    let names = ["alpha", "beta", "gamma", "delta"];
    for name in names {
        create_module(temp_dir.path(), name, "");
    }

    let mut env = BuildEnv::new();
    let modules = detect_modules_within_searchpath(
        temp_dir.path(),
        &mut env,
        "linuxbsd",
        &ConfigRegistry::new(),
    )
    .unwrap();

    assert_eq!(modules.len(), names.len());
    for name in names {
        assert_eq!(modules[name], temp_dir.path().join(name));
        assert_eq!(env.module_enabled(name), Some(true));
    }
    // default icon directory for every module
    assert_eq!(env.module_icons_paths.len(), names.len());
    assert!(env.module_icons_paths.contains(&temp_dir.path().join("beta").join(DEFAULT_ICONS_DIR)));
}

#[test]
fn test_directories_without_descriptor_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    create_module(temp_dir.path(), "real", "");
    fs::create_dir_all(temp_dir.path().join("not_a_module")).unwrap();
    fs::create_dir_all(temp_dir.path().join(".git")).unwrap();
    fs::write(temp_dir.path().join("README.md"), "docs").unwrap();

    let detected = detect_modules(temp_dir.path(), &ConfigRegistry::new()).unwrap();
    assert_eq!(detected.keys().collect::<Vec<_>>(), vec!["real"]);
}

#[test]
fn test_failing_doc_query_keeps_module() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("broken")).unwrap();
    create_module(
        temp_dir.path(),
        "documented",
        "doc_classes = [\"Good\"]\ndoc_path = \"doc_classes\"\n",
    );

    let mut registry = ConfigRegistry::new();
    registry.register("broken", Arc::new(BrokenDocs));

    let mut env = BuildEnv::new();
    let modules =
        detect_modules_within_searchpath(temp_dir.path(), &mut env, "macos", &registry).unwrap();

    assert!(modules.contains_key("broken"));
    assert!(modules.contains_key("documented"));
    assert!(!env.doc_class_path.contains_key("Broken"));
    assert_eq!(
        env.doc_class_path["Good"],
        temp_dir.path().join("documented").join("doc_classes")
    );
    // failing icon query falls back to the default directory
    assert!(env.module_icons_paths.contains(&temp_dir.path().join("broken").join(DEFAULT_ICONS_DIR)));
}

#[test]
fn test_disabled_and_unbuildable_modules() {
    let temp_dir = TempDir::new().unwrap();
    create_module(temp_dir.path(), "off", "enabled = false\n");
    create_module(temp_dir.path(), "web_only", "platforms = [\"web\"]\n");
    create_module(temp_dir.path(), "editor_only", "requires = [\"editor_build\"]\n");
    create_module(temp_dir.path(), "on", "enabled = true\nicons_path = \"editor/icons\"\n");

    let mut env = BuildEnv::new();
    let modules = detect_modules_within_searchpath(
        temp_dir.path(),
        &mut env,
        "windows",
        &ConfigRegistry::new(),
    )
    .unwrap();

    assert_eq!(modules.keys().collect::<Vec<_>>(), vec!["on"]);
    assert_eq!(env.module_enabled("off"), Some(false));
    assert_eq!(env.module_enabled("web_only"), Some(false));
    assert_eq!(env.module_icons_paths, vec![temp_dir.path().join("on").join("editor/icons")]);
}

#[test]
fn test_modules_disabled_by_default() {
    let temp_dir = TempDir::new().unwrap();
    create_module(temp_dir.path(), "a", "enabled = true\n");

    let mut env = BuildEnv::new();
    env.set("modules_enabled_by_default", false);
    let modules = detect_modules_within_searchpath(
        temp_dir.path(),
        &mut env,
        "macos",
        &ConfigRegistry::new(),
    )
    .unwrap();

    assert!(modules.is_empty());
    assert_eq!(env.module_enabled("a"), Some(false));
}

#[test]
fn test_env_override_wins_over_descriptor() {
    let temp_dir = TempDir::new().unwrap();
    create_module(temp_dir.path(), "a", "enabled = false\n");
    create_module(temp_dir.path(), "b", "");

    let mut env = BuildEnv::new();
    env.set("module_a_enabled", true);
    env.set("module_b_enabled", false);
    let modules = detect_modules_within_searchpath(
        temp_dir.path(),
        &mut env,
        "macos",
        &ConfigRegistry::new(),
    )
    .unwrap();

    assert_eq!(modules.keys().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn test_missing_required_dependency_disables_module() {
    let temp_dir = TempDir::new().unwrap();
    create_module(temp_dir.path(), "text_server", "[dependencies]\nrequired = [\"freetype\"]\n");
    create_module(temp_dir.path(), "freetype", "enabled = false\n");
    create_module(temp_dir.path(), "gltf", "[dependencies]\noptional = [\"fbx\"]\n");

    let mut env = BuildEnv::new();
    let modules = detect_modules_within_searchpath(
        temp_dir.path(),
        &mut env,
        "macos",
        &ConfigRegistry::new(),
    )
    .unwrap();

    assert_eq!(modules.keys().collect::<Vec<_>>(), vec!["gltf"]);
    assert_eq!(env.module_dependencies["text_server"].required, vec!["freetype"]);
}

#[test]
fn test_invalid_descriptor_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    create_module(temp_dir.path(), "bad", "enabled = [");

    let err = detect_modules(temp_dir.path(), &ConfigRegistry::new()).unwrap_err();
    assert!(matches!(err, crate::error::GenError::InvalidDescriptor { .. }));
}

#[test]
fn test_dependency_that_cannot_build_disables_dependents() {
    let temp_dir = TempDir::new().unwrap();
    create_module(temp_dir.path(), "a_text", "[dependencies]\nrequired = [\"b_freetype\"]\n");
    create_module(temp_dir.path(), "b_freetype", "platforms = [\"web\"]\n");
    create_module(temp_dir.path(), "c_label", "[dependencies]\nrequired = [\"a_text\"]\n");
    create_module(temp_dir.path(), "d_zip", "");

    let mut env = BuildEnv::new();
    let modules = detect_modules_within_searchpath(
        temp_dir.path(),
        &mut env,
        "macos",
        &ConfigRegistry::new(),
    )
    .unwrap();

    assert_eq!(modules.keys().collect::<Vec<_>>(), vec!["d_zip"]);
    assert_eq!(env.module_enabled("a_text"), Some(false));
    assert_eq!(env.module_enabled("b_freetype"), Some(false));
    assert_eq!(env.module_enabled("c_label"), Some(false));
    // only surviving modules contribute icon paths
    assert_eq!(env.module_icons_paths, vec![temp_dir.path().join("d_zip").join(DEFAULT_ICONS_DIR)]);
}

#[test]
fn test_detected_module_debug_shows_path() {
    let temp_dir = TempDir::new().unwrap();
    create_module(temp_dir.path(), "zip", "");

    let detected = detect_modules(temp_dir.path(), &ConfigRegistry::new()).unwrap();
    let text = format!("{:?}", detected["zip"]);
    assert!(text.starts_with("DetectedModule"));
    assert!(text.contains("zip"));
}
