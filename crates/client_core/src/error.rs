use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid user source url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("user source request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("user source returned HTTP {status}")]
    Status { status: u16 },
    #[error("user source reported an error: {0}")]
    Api(String),
    #[error("user source returned no profiles")]
    Empty,
}
