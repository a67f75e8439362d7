//! Output file helpers

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{GenError, Result};

/// Banner written at the top of wrapped generated headers
pub const GENERATED_BANNER: &str = "/* THIS FILE IS GENERATED. EDITS WILL BE LOST. */";

/// Create the parent directory chain of `output` when it does not exist
pub fn ensure_output_dir(output: &Path) -> Result<()> {
    let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };

    if dir.is_dir() {
        return Ok(());
    }

    debug!("Creating directory: {}", dir.display());
    fs::create_dir_all(dir)
        .map_err(|source| GenError::DirectoryCreation { path: dir.to_path_buf(), source })
}

/// Write `body` to `path` inside the standard generated-header wrapper
pub fn write_wrapped(path: &Path, body: &str) -> Result<()> {
    fs::write(path, wrap_generated(body))?;
    Ok(())
}

/// Banner, `#pragma once` and the body
pub fn wrap_generated(body: &str) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_BANNER);
    out.push_str("\n\n#pragma once\n\n");
    out.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_chain() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("a/b/c/out.gen.h");

        ensure_output_dir(&output).unwrap();
        assert!(dir.path().join("a/b/c").is_dir());
        assert!(!output.exists());
    }

    #[test]
    fn test_existing_dir_is_fine() {
        let dir = TempDir::new().unwrap();
        ensure_output_dir(&dir.path().join("out.h")).unwrap();
        ensure_output_dir(Path::new("bare_name.h")).unwrap();
    }

    #[test]
    fn test_blocked_by_file_reports_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = ensure_output_dir(&blocker.join("sub/out.h")).unwrap_err();
        assert_eq!(err.to_string(), format!("Unable to create directory: {}", blocker.join("sub").display()));
        match err {
            GenError::DirectoryCreation { path, .. } => assert_eq!(path, blocker.join("sub")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrap_generated() {
        let text = wrap_generated("#define A 1");
        assert!(text.starts_with(GENERATED_BANNER));
        assert!(text.contains("#pragma once\n\n#define A 1\n"));
    }
}
