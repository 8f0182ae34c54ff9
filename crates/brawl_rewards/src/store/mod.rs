//! # Storage Boundaries
//!
//! The service never touches a map directly. Sessions, verified results and
//! paid claims live behind these traits so a durable backend can replace the
//! in-memory one without touching the flow.
//!
//! ## Atomicity Requirements
//!
//! - [`SessionStore::consume`] is a compare-and-delete. Two submissions
//!   racing on one session id: exactly one gets the session back.
//! - [`ClaimLedger::mark_paid`] is a test-and-set. Two claims racing on one
//!   session id: exactly one sees `true`.

mod memory;

pub use memory::{InMemoryClaimLedger, InMemoryResultStore, InMemorySessionStore};

use brawl_shared::{GameMode, GameSession, PlayerAddress, ServerSeed, SessionId, Signature};
use serde::{Deserialize, Serialize};

use crate::error::ArenaResult;

/// An accepted result, as persisted for the claim step.
///
/// Keeps the session seed so the claim can re-derive the attestation instead
/// of comparing strings. Never serialized toward a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedResult {
    /// Session the result was earned in.
    pub session_id: SessionId,
    /// Player who earned it.
    pub player_address: PlayerAddress,
    /// Normalized score (after the haircut).
    pub score: u64,
    /// Kills, as attested.
    pub kills: u32,
    /// The attestation handed to the player.
    pub signature: Signature,
    /// Server clock at acceptance (ms).
    pub verified_at: u64,
    /// Mode the session was played in.
    pub game_mode: GameMode,
    /// Attestation key of the session.
    pub server_seed: ServerSeed,
}

/// Live game sessions.
pub trait SessionStore: Send + Sync {
    /// Stores a freshly issued session.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn put(&self, session: GameSession) -> ArenaResult<()>;

    /// Looks a live session up without consuming it.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn get(&self, session_id: &SessionId) -> ArenaResult<Option<GameSession>>;

    /// Atomically removes and returns a live session.
    ///
    /// # Errors
    ///
    /// Backend failure. An unknown or already consumed id is `Ok(None)`.
    fn consume(&self, session_id: &SessionId) -> ArenaResult<Option<GameSession>>;

    /// Sessions `player` started after `since_ms`, consumed or not.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn recent_for_player(
        &self,
        player: &PlayerAddress,
        since_ms: u64,
    ) -> ArenaResult<Vec<GameSession>>;
}

/// Accepted results awaiting (or past) their claim.
pub trait ResultStore: Send + Sync {
    /// Records an accepted result.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn put(&self, result: VerifiedResult) -> ArenaResult<()>;

    /// Looks up the accepted result of a session.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn get(&self, session_id: &SessionId) -> ArenaResult<Option<VerifiedResult>>;
}

/// Which sessions have been paid.
pub trait ClaimLedger: Send + Sync {
    /// Marks a session paid. Returns false if it already was.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn mark_paid(&self, session_id: &SessionId) -> ArenaResult<bool>;

    /// Undoes [`Self::mark_paid`] after a payout that did not go through.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn release(&self, session_id: &SessionId) -> ArenaResult<()>;

    /// True once the session has been paid.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn is_paid(&self, session_id: &SessionId) -> ArenaResult<bool>;
}
