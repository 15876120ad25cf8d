//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Failed to allocate a {height}x{width} buffer")]
    Allocation { height: usize, width: usize },

    #[error("Invalid grid dimensions: {height}x{width}")]
    InvalidDimensions { height: usize, width: usize },

    #[error("Invalid rule parameter: {0}")]
    InvalidRule(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
