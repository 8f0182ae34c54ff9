//! Result submission and verdict types.
//!
//! [`GameResult`] is what the client claims happened. [`ValidationResult`] is
//! what the server decided. Only the latter is ever trusted downstream.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::session::SessionId;

/// A client-submitted round outcome. Untrusted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// Session the result belongs to.
    pub session_id: SessionId,
    /// Claimed score.
    pub score: u64,
    /// Claimed kills (targets destroyed).
    pub kills: u32,
    /// Claimed accuracy in `0.0..=1.0`.
    pub accuracy: f64,
    /// Claimed survival time (seconds).
    pub survival_time: f64,
    /// Ordered event log.
    #[serde(default)]
    pub game_events: Vec<GameEvent>,
    /// Client-side integrity tag. No cryptographic weight; diagnostics only.
    #[serde(default)]
    pub client_hash: String,
}

/// Why a result was rejected.
///
/// Serialized as the player-facing message, so the wire carries the same
/// text as [`RejectReason::message`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    /// Session id mismatched or already consumed.
    #[serde(rename = "Invalid session ID")]
    InvalidSessionId,
    /// Elapsed time below the minimum playable duration.
    #[serde(rename = "Game too short")]
    GameTooShort,
    /// Score exceeds the linear feasibility bound.
    #[serde(rename = "Score too high for duration")]
    ScoreTooHighForDuration,
    /// Claimed accuracy exceeds the ceiling.
    #[serde(rename = "Accuracy suspiciously high")]
    AccuracySuspiciouslyHigh,
    /// Event timestamps go backwards.
    #[serde(rename = "Events out of order")]
    EventsOutOfOrder,
    /// A hit arrived faster than a human can react.
    #[serde(rename = "Reaction time too fast")]
    ReactionTimeTooFast,
    /// Hit/miss ratio in the log exceeds the ceiling.
    #[serde(rename = "Hit ratio too high")]
    HitRatioTooHigh,
    /// Statistical signals reached the rejection threshold.
    #[serde(rename = "Suspicious gameplay patterns detected")]
    SuspiciousPatterns,
}

impl RejectReason {
    /// Every reason, in gate order.
    pub const ALL: [Self; 8] = [
        Self::InvalidSessionId,
        Self::GameTooShort,
        Self::ScoreTooHighForDuration,
        Self::AccuracySuspiciouslyHigh,
        Self::EventsOutOfOrder,
        Self::ReactionTimeTooFast,
        Self::HitRatioTooHigh,
        Self::SuspiciousPatterns,
    ];
}

impl RejectReason {
    /// Human-readable reason shown to the player.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidSessionId => "Invalid session ID",
            Self::GameTooShort => "Game too short",
            Self::ScoreTooHighForDuration => "Score too high for duration",
            Self::AccuracySuspiciouslyHigh => "Accuracy suspiciously high",
            Self::EventsOutOfOrder => "Events out of order",
            Self::ReactionTimeTooFast => "Reaction time too fast",
            Self::HitRatioTooHigh => "Hit ratio too high",
            Self::SuspiciousPatterns => "Suspicious gameplay patterns detected",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Hex-encoded result attestation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Encodes raw MAC output.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Wraps a signature string presented by a client.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Decodes back to raw bytes. `None` if the string is not hex.
    #[must_use]
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        hex::decode(&self.0).ok()
    }

    /// The hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when no signature was presented.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The server's verdict on a submitted result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Accept/reject.
    pub is_valid: bool,
    /// Normalized reward-eligible score. Zero when rejected.
    pub score: u64,
    /// Present only when rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
    /// Present only when accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
}

impl ValidationResult {
    /// An accepted verdict.
    #[must_use]
    pub const fn accepted(score: u64, signature: Signature) -> Self {
        Self {
            is_valid: true,
            score,
            reason: None,
            signature: Some(signature),
        }
    }

    /// A rejected verdict. Score is always zero.
    #[must_use]
    pub const fn rejected(reason: RejectReason) -> Self {
        Self {
            is_valid: false,
            score: 0,
            reason: Some(reason),
            signature: None,
        }
    }
}
