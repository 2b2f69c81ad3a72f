use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubHunterError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Curl error: {0}")]
    Curl(#[from] curl::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("request to {path} failed after {attempts} attempts")]
    RequestExhausted { path: String, attempts: u32 },
}

pub type Result<T> = std::result::Result<T, SubHunterError>;
