// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TiacherError {
    #[error("Failed to read or write file: {0}")]
    FileIo(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Unexpected response structure: {0}")]
    UnexpectedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("No authentication token found")]
    MissingToken,
}

impl TiacherError {
    /// Builds an `ApiError` from a failed response body, preferring the
    /// backend's `message` or `error` field over the bare reason phrase.
    pub fn from_response_body(status: reqwest::StatusCode, body: &str) -> Self {
        let message = backend_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });
        TiacherError::ApiError {
            status: status.as_u16(),
            message,
        }
    }
}

/// Extracts the `message` (or `error`) string from a JSON error body.
pub fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub type Result<T> = std::result::Result<T, TiacherError>;
