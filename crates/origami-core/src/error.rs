//! Error types and exit codes for origami
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args, invalid values)
//! - 3: Data/store error (unknown fold, store conflict, missing detail)

mod macros;

use std::path::PathBuf;

use thiserror::Error;

use crate::fold::FoldId;

/// Exit codes for the origami CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - unknown fold, conflicting writer (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during origami operations
#[derive(Error, Debug)]
pub enum OrigamiError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or records)")]
    UnknownFormat(String),

    #[error("--format may only be specified once")]
    DuplicateFormat,

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data/store errors (exit code 3)
    #[error("fold not found: {id}")]
    FoldNotFound { id: FoldId },

    #[error("detail blob missing for fold {id}")]
    DetailMissing { id: FoldId },

    #[error("invalid store at {path:?}: {reason}")]
    InvalidStore { path: PathBuf, reason: String },

    #[error(
        "fold log was modified by another writer (loaded revision {expected}, found {found}); reload and retry"
    )]
    StoreConflict { expected: u64, found: u64 },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl OrigamiError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        OrigamiError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        OrigamiError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// True when this error is the structured not-found result of a fold lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, OrigamiError::FoldNotFound { .. })
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            OrigamiError::UnknownFormat(_)
            | OrigamiError::DuplicateFormat
            | OrigamiError::UsageError(_)
            | OrigamiError::InvalidValue { .. } => ExitCode::Usage,

            OrigamiError::FoldNotFound { .. }
            | OrigamiError::DetailMissing { .. }
            | OrigamiError::InvalidStore { .. }
            | OrigamiError::StoreConflict { .. } => ExitCode::Data,

            OrigamiError::Io(_)
            | OrigamiError::Json(_)
            | OrigamiError::Toml(_)
            | OrigamiError::FailedOperationWithTarget { .. }
            | OrigamiError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            OrigamiError::UnknownFormat(_) => "unknown_format",
            OrigamiError::DuplicateFormat => "duplicate_format",
            OrigamiError::UsageError(_) => "usage_error",
            OrigamiError::InvalidValue { .. } => "invalid_value",
            OrigamiError::FoldNotFound { .. } => "fold_not_found",
            OrigamiError::DetailMissing { .. } => "detail_missing",
            OrigamiError::InvalidStore { .. } => "invalid_store",
            OrigamiError::StoreConflict { .. } => "store_conflict",
            OrigamiError::Io(_) => "io_error",
            OrigamiError::Json(_) => "json_error",
            OrigamiError::Toml(_) => "toml_error",
            OrigamiError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            OrigamiError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "code": self.exit_code() as i32,
            "type": self.error_type(),
            "message": self.to_string(),
        });

        if let OrigamiError::FoldNotFound { id } | OrigamiError::DetailMissing { id } = self {
            error_obj["fold_id"] = serde_json::json!(id.to_string());
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for origami operations
pub type Result<T> = std::result::Result<T, OrigamiError>;
