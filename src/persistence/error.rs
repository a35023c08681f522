use std::path::PathBuf;

use thiserror::Error;

use crate::algorithms::rl::types::KeyParseError;

/// Errors raised while loading or saving a Q-table.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed table key: {0}")]
    Key(#[from] KeyParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_display_names_operation_and_path() {
        let e = PersistenceError::Io {
            operation: "write",
            path: PathBuf::from("/tmp/q.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(e.to_string(), "Failed to write /tmp/q.json: denied");
    }

    #[test]
    fn key_error_converts() {
        let e: PersistenceError = KeyParseError::MissingSeparator("x".to_string()).into();
        assert!(matches!(e, PersistenceError::Key(_)));
    }
}
