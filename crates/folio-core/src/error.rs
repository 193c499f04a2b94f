//! Error types for folio operations.
//!
//! Every error carries an [`ErrorCode`] for programmatic handling; the RPC layer
//! maps variants onto callable-function status codes.

use thiserror::Error;

/// Result type alias for folio operations.
pub type FolioResult<T> = Result<T, FolioError>;

/// Main error type for all folio operations.
#[derive(Error, Debug)]
pub enum FolioError {
    /// Caller carries no identity.
    #[error("Unauthenticated: {message}")]
    Unauthenticated { message: String, code: ErrorCode },

    /// Caller is known but lacks the admin claim.
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String, code: ErrorCode },

    /// Request is missing or carries malformed input.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String, code: ErrorCode },

    /// Content record does not exist.
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        record_id: Option<String>,
    },

    /// Record store operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication (AUTH_xxx)
    AuthMissingCredentials,
    AuthNotAdmin,

    // Validation (VAL_xxx)
    ValMissingField,
    ValNoFiles,

    // Records (REC_xxx)
    RecNotFound,

    // Database (DB_xxx)
    DbOperationFailed,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthMissingCredentials => "AUTH_001",
            ErrorCode::AuthNotAdmin => "AUTH_002",
            ErrorCode::ValMissingField => "VAL_001",
            ErrorCode::ValNoFiles => "VAL_002",
            ErrorCode::RecNotFound => "REC_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl FolioError {
    /// Create an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
            code: ErrorCode::AuthMissingCredentials,
        }
    }

    /// Create a permission denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
            code: ErrorCode::AuthNotAdmin,
        }
    }

    /// Create an invalid argument error for a missing field.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            code: ErrorCode::ValMissingField,
        }
    }

    /// Create an invalid argument error for a record with no files.
    pub fn no_files(record_id: &str) -> Self {
        Self::InvalidArgument {
            message: format!("No files found for content '{}'", record_id),
            code: ErrorCode::ValNoFiles,
        }
    }

    /// Create a not found error.
    pub fn not_found(record_id: impl Into<String>) -> Self {
        let id = record_id.into();
        Self::NotFound {
            message: format!("Content with id '{}' not found", id),
            code: ErrorCode::RecNotFound,
            record_id: Some(id),
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthenticated { code, .. } => *code,
            Self::PermissionDenied { code, .. } => *code,
            Self::InvalidArgument { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Database { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }
}

impl From<rusqlite::Error> for FolioError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}
