//! # Security Error Types
//!
//! Errors at the edges of the referee: bad input at session start and bad
//! policy files. A suspicious result is never an error; it is a rejected
//! [`ValidationResult`](brawl_shared::ValidationResult).

use brawl_shared::SharedError;
use thiserror::Error;

/// Errors that can occur in the security layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// Client input failed boundary parsing (address, game mode).
    #[error(transparent)]
    Input(#[from] SharedError),

    /// A policy value makes no sense (zero ceiling, ratio above 1, ...).
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    /// The policy file is not valid TOML for the expected schema.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The policy file could not be read.
    #[error("cannot read configuration {path}: {reason}")]
    ConfigUnreadable {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },
}

/// Result type for security operations.
pub type SecurityResult<T> = Result<T, SecurityError>;
