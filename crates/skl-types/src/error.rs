use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("skill category {0} is outside the valid range")]
    InvalidCategory(u32),

    #[error("skill level code {0} is outside the valid range")]
    InvalidLevel(u8),
}
