use thiserror::Error;

#[derive(Debug, Error)]
pub enum CwqError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("StatusCode is not Complete: label=\"{label}\" status={status}")]
    IncompleteSeries { label: String, status: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, CwqError>;
