use thiserror::Error;

/// Failure of one bounded fetch. There is no retry here; retry policy,
/// if any, belongs to the caller.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::HttpStatus(status.as_u16()),
            None => FetchError::Network(err.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ReconError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid target URL: {0}")]
    InvalidTarget(String),

    #[error("task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ReconError>;
