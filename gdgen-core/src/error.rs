//! Error types for generator invocations
//!
//! Every failure that aborts a `gdgen` invocation is a `GenError`. The
//! binary turns it into a process exit status through [`GenError::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Exit status for an invalid script encryption key
pub const INVALID_KEY_EXIT_CODE: u8 = 255;

/// Main error type for generator invocations
#[derive(Debug, Error)]
pub enum GenError {
    /// The parent directory of an output file could not be created
    #[error("Unable to create directory: {}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The argument set matches no supported shape
    #[error("Unrecognized arguments: {0}")]
    UnrecognizedArguments(String),

    /// No generator is registered under the requested command name
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// `SCRIPT_AES256_ENCRYPTION_KEY` is not 64 hexadecimal characters
    #[error("Invalid AES256 encryption key, not 64 hexadecimal characters: '{key}'.")]
    InvalidEncryptionKey { key: String },

    /// The build environment is missing a required key
    #[error("Missing build environment key '{0}'")]
    MissingEnvKey(String),

    /// The build environment file is not a JSON object
    #[error("Invalid build environment {}: {reason}", path.display())]
    InvalidEnv { path: PathBuf, reason: String },

    /// A module descriptor could not be read
    #[error("Invalid module descriptor {}: {reason}", path.display())]
    InvalidDescriptor { path: PathBuf, reason: String },

    /// An engine build helper exited unsuccessfully
    #[error("Build helper {function} failed: {reason}")]
    HelperFailed { function: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenError {
    /// Process exit status reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            GenError::InvalidEncryptionKey { .. } => INVALID_KEY_EXIT_CODE,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let key = GenError::InvalidEncryptionKey { key: "abc".to_string() };
        assert_eq!(key.exit_code(), 255);

        let dir = GenError::DirectoryCreation {
            path: PathBuf::from("/nope"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(dir.exit_code(), 1);
        assert_eq!(dir.to_string(), "Unable to create directory: /nope");
    }
}
