// Error types for folio.
// Covers transport, GitHub API, configuration, and serialization failures.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("Gist has no file named {0}")]
    MissingGistFile(String),

    #[error("Missing {0} environment variable")]
    MissingEnv(&'static str),

    #[error("Invalid value for {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("Document read failed: {0}")]
    ReadFailed(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FolioError>;
