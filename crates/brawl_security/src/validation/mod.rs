//! # Result Validation
//!
//! Server-side judgement of a submitted round.
//!
//! ## Philosophy
//!
//! NEVER trust the client. The client says "I scored 1000 in 45 seconds".
//! We verify against the only clock we own:
//! 1. Is this the session we issued?
//! 2. Could anyone score that much in the time that actually passed?
//! 3. Does the event log look like a human played it?
//!
//! Gates run in a fixed order and stop at the first failure. The order only
//! decides which reason is reported; every gate must hold for acceptance.
//!
//! Score arithmetic is integer only. The feasibility bound compares
//! `score * 1000` against `elapsed_ms * max_score_per_second` and the haircut
//! is applied in basis points, so the verdict is bit-for-bit reproducible.

mod events;

pub use events::{EventLogSummary, EventLogValidator};

use brawl_shared::constants::MS_PER_SECOND;
use brawl_shared::{GameResult, GameSession, RejectReason, ValidationResult};

use crate::anti_cheat::{DetectorConfig, PatternDetector};
use crate::attestation::attest;
use crate::config::{ValidatorPolicy, BASIS_POINTS};

/// The orchestrator. Holds no mutable state; share it freely.
#[derive(Clone, Debug)]
pub struct ResultValidator {
    policy: ValidatorPolicy,
    events: EventLogValidator,
    patterns: PatternDetector,
}

impl Default for ResultValidator {
    fn default() -> Self {
        Self::new(ValidatorPolicy::default())
    }
}

impl ResultValidator {
    /// Creates a validator for the given policy.
    #[must_use]
    pub fn new(policy: ValidatorPolicy) -> Self {
        let events = EventLogValidator::from(&policy);
        let patterns = PatternDetector::new(DetectorConfig::from(&policy));
        Self {
            policy,
            events,
            patterns,
        }
    }

    /// The active policy.
    #[must_use]
    pub const fn policy(&self) -> &ValidatorPolicy {
        &self.policy
    }

    /// Highest score reachable in `elapsed_ms` of wall clock.
    #[must_use]
    pub fn max_score_for(&self, elapsed_ms: u64) -> u64 {
        let bound = u128::from(elapsed_ms) * u128::from(self.policy.max_score_per_second)
            / u128::from(MS_PER_SECOND);
        u64::try_from(bound).unwrap_or(u64::MAX)
    }

    /// Applies the acceptance haircut, rounding down.
    #[must_use]
    pub fn normalize_score(&self, score: u64) -> u64 {
        let kept = u128::from(score) * u128::from(self.policy.score_haircut_bp)
            / u128::from(BASIS_POINTS);
        u64::try_from(kept).unwrap_or(u64::MAX)
    }

    /// Judges `result` against the session it claims.
    ///
    /// `submitted_at_ms` is the server clock when the submission arrived.
    /// Identical inputs always produce an identical verdict, signature
    /// included.
    #[must_use]
    pub fn validate(
        &self,
        result: &GameResult,
        session: &GameSession,
        submitted_at_ms: u64,
    ) -> ValidationResult {
        if !result.client_hash.is_empty() {
            tracing::debug!(
                session_id = %result.session_id,
                client_hash = %result.client_hash,
                "client integrity tag"
            );
        }

        match self.check(result, session, submitted_at_ms) {
            Ok(()) => {
                let score = self.normalize_score(result.score);
                let signature =
                    attest(&session.session_id, score, result.kills, &session.server_seed);
                tracing::info!(
                    session_id = %session.session_id,
                    player = %session.player_address,
                    claimed = result.score,
                    score,
                    "result accepted"
                );
                ValidationResult::accepted(score, signature)
            }
            Err(reason) => {
                tracing::warn!(
                    session_id = %result.session_id,
                    player = %session.player_address,
                    claimed = result.score,
                    %reason,
                    "result rejected"
                );
                ValidationResult::rejected(reason)
            }
        }
    }

    /// Runs the gates in order.
    fn check(
        &self,
        result: &GameResult,
        session: &GameSession,
        submitted_at_ms: u64,
    ) -> Result<(), RejectReason> {
        if result.session_id != session.session_id {
            return Err(RejectReason::InvalidSessionId);
        }

        let elapsed_ms = submitted_at_ms.saturating_sub(session.start_time);
        if elapsed_ms < self.policy.min_game_duration_ms {
            return Err(RejectReason::GameTooShort);
        }

        if result.score > self.max_score_for(elapsed_ms) {
            return Err(RejectReason::ScoreTooHighForDuration);
        }

        // NaN compares false against everything; reject it explicitly.
        if result.accuracy.is_nan() || result.accuracy > self.policy.max_accuracy {
            return Err(RejectReason::AccuracySuspiciouslyHigh);
        }

        self.events.check_events(&result.game_events)?;

        let signals = self.patterns.detect_suspicious_patterns(&result.game_events);
        if signals >= self.policy.suspicious_pattern_threshold {
            return Err(RejectReason::SuspiciousPatterns);
        }

        Ok(())
    }
}
