//! Error types for pinpoint

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PinpointError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown enumeration strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown selection strategy: {0}")]
    UnknownSelection(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid proof: {0}")]
    InvalidProof(String),
}

pub type Result<T> = std::result::Result<T, PinpointError>;
