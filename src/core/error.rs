//! Error types for the chain screener
//!
//! Malformed quotes are not errors: extractors and formulas degrade to
//! empty results. Only structural problems with the pasted table, bad
//! coordinates, and I/O at the edges surface here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("Table structure error: {0}")]
    Structure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type ScreenerResult<T> = Result<T, ScreenerError>;

impl ScreenerError {
    pub fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }
}

impl From<serde_json::Error> for ScreenerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
