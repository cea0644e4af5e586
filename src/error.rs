//! Error types for the desk advisor

use thiserror::Error;

/// Result type alias for advisor operations
pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {

    // =============================
    // Advisory Call Errors
    // =============================

    #[error("GEMINI_API_KEY is not configured")]
    MissingCredential,

    #[error("Gemini API error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Empty response from Gemini")]
    EmptyResponse,

    // =============================
    // Desk / Surface Errors
    // =============================

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown desk: {0}")]
    UnknownDesk(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AdvisorError {
    /// HTTP status attached to the failure, when the upstream gave one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AdvisorError::Upstream { status, .. } => Some(*status),
            AdvisorError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
