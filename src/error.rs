use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZipCleanError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("could not load content from {path}: {reason}")]
    UnparseableDocument { path: PathBuf, reason: String },

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Guide store error: {0}")]
    Storage(String),

    #[error("Reference set error: {0}")]
    ReferenceSet(String),

    #[error("frequency threshold must be at least 1, got {0}")]
    InvalidThreshold(usize),
}

pub type Result<T> = std::result::Result<T, ZipCleanError>;
