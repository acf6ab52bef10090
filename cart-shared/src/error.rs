//! Error types for the cart skill.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a skill request.
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No request handler accepted the request
    #[error("Unable to find a suitable request handler for {0}")]
    UnhandledRequest(String),

    /// The request was addressed to a different skill
    #[error("Skill id mismatch: expected {expected}, got {actual}")]
    SkillIdMismatch { expected: String, actual: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Short machine-friendly label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Database(_) => "database",
            Error::Aws(_) => "aws",
            Error::Config(_) => "config",
            Error::Serialization(_) => "serialization",
            Error::UnhandledRequest(_) => "unhandled_request",
            Error::SkillIdMismatch { .. } => "skill_id_mismatch",
            Error::Internal(_) => "internal",
        }
    }
}
