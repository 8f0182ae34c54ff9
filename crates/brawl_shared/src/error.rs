//! # Shared Error Types
//!
//! Boundary errors raised while turning raw client input into typed values.

use thiserror::Error;

/// Errors produced while parsing client-facing identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// The player address was empty or whitespace.
    #[error("player address is empty")]
    EmptyAddress,

    /// The player address is not a 20-byte hex account identifier.
    #[error("invalid player address: {0}")]
    InvalidAddress(String),

    /// The requested game mode is not one the server runs.
    #[error("unsupported game mode: {0}")]
    UnsupportedGameMode(String),
}

/// Result type for shared parsing operations.
pub type SharedResult<T> = Result<T, SharedError>;
