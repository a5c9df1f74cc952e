//! KeyStore error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("Invalid key '{0}': keys may only contain letters, digits, '-', '_' and '.'")]
    InvalidKey(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record '{key}' is not valid JSON: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode record '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl KeyStoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KeyStoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the record exists but its content could not be decoded
    pub fn is_corrupt(&self) -> bool {
        matches!(self, KeyStoreError::Decode { .. })
    }
}

/// Result alias for store operations
pub type Result<T> = std::result::Result<T, KeyStoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_corrupt() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = KeyStoreError::Decode {
            key: "k".to_string(),
            source,
        };
        assert!(err.is_corrupt());

        let err = KeyStoreError::InvalidKey("../etc".to_string());
        assert!(!err.is_corrupt());
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = KeyStoreError::io(
            "/nowhere/record.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/nowhere/record.json"));
    }
}
