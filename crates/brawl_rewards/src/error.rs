//! # Arena Error Types
//!
//! All errors that can occur between session start and payout.
//!
//! A rejected result is not an error: it comes back as a
//! [`ValidationResult`](brawl_shared::ValidationResult). Errors here are
//! requests the service refuses to process at all.

use brawl_security::SecurityError;
use brawl_shared::SharedError;
use thiserror::Error;

/// Errors that can occur in the arena service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// A required request field was empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Client input failed boundary parsing (address, game mode).
    #[error(transparent)]
    Input(#[from] SharedError),

    /// Referee policy or configuration problem.
    #[error(transparent)]
    Security(#[from] SecurityError),

    /// The player started too many sessions inside the window.
    #[error("rate limit exceeded for {player}; wait before starting a new game")]
    RateLimited {
        /// The throttled player.
        player: String,
    },

    /// No accepted result is on record for the session.
    #[error("no verified result found for session {0}")]
    NoVerifiedResult(String),

    /// The claimant is not the player who earned the result.
    #[error("player address mismatch")]
    AddressMismatch,

    /// The presented signature does not attest the stored result.
    #[error("invalid signature")]
    InvalidSignature,

    /// The session's reward has already been paid.
    #[error("reward already claimed for session {0}")]
    AlreadyClaimed(String),

    /// Reward policy values make no sense.
    #[error("invalid reward policy: {0}")]
    InvalidPolicy(String),

    /// The minting boundary refused the payout.
    #[error("mint failed: {0}")]
    MintFailed(String),

    /// A storage backend failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl ArenaError {
    /// True when the caller sent something wrong (as opposed to a backend
    /// failure).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::MintFailed(_)
                | Self::Storage(_)
                | Self::Security(SecurityError::ConfigUnreadable { .. })
        )
    }
}

/// Result type for arena operations.
pub type ArenaResult<T> = Result<T, ArenaError>;
