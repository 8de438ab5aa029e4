//! Error types for Bankchain

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    #[error("Invalid difficulty {requested}: must be at most {max}")]
    InvalidDifficulty { requested: u32, max: u32 },
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid proof of work at block {index}")]
    InvalidProofOfWork { index: usize },
    #[error("Block not found: {0}")]
    BlockNotFound(usize),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::Serialization(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
