use thiserror::Error;

use crate::tracker::RateLimitNotice;

#[derive(Error, Debug)]
pub enum AutoPrError {
    #[error("Invalid submission: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Rate limit exceeded: {}", .0.message)]
    RateLimited(RateLimitNotice),

    #[error("API request failed (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AutoPrError>;
