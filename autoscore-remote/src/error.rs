use autoscore_core::StoreError;

/// Errors that can occur talking to the catalog API.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog API rejected the API key")]
    Unauthorized,

    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<RemoteError> for StoreError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Api(msg) => StoreError::Malformed(msg),
            RemoteError::Json(e) => StoreError::Malformed(e.to_string()),
            unauthorized @ RemoteError::Unauthorized => {
                StoreError::Unavailable(unauthorized.to_string())
            }
            other => StoreError::backend(other),
        }
    }
}
