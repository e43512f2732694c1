use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Invalid lookup URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Lookup timed out")]
    Timeout,

    #[error("App not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
