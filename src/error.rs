//! Error types for loading rule records and options.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading conversion input.
///
/// Conversion itself is total; only loading can fail.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Input errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid argument at {path}: {message}")]
    InvalidArgument { path: String, message: String },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("records.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::InvalidArgument {
            path: "/".into(),
            message: "expected an array of rule records, got object".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_argument_display() {
        let err = LoadError::InvalidArgument {
            path: "/3".into(),
            message: "missing field `ruleKind`".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid argument at /3: missing field `ruleKind`"
        );
    }
}
