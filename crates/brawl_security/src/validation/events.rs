//! Event log checks.
//!
//! One left-to-right pass, no look-ahead, so the same checks can run over a
//! streamed log later. Rules, in scan order:
//!
//! 1. Timestamps never decrease.
//! 2. A hit needs at least the reaction floor since the previous event. The
//!    very first event has no predecessor and is exempt.
//! 3. After the scan, hits / (hits + misses) stays at or under the ceiling.

use brawl_shared::{GameEvent, GameEventKind, RejectReason};

use crate::config::ValidatorPolicy;

/// Counts gathered while scanning a clean log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventLogSummary {
    /// Hit events.
    pub hits: u32,
    /// Miss events.
    pub misses: u32,
}

impl EventLogSummary {
    /// hits / (hits + misses), or `None` without any shots.
    #[must_use]
    pub fn hit_ratio(&self) -> Option<f64> {
        let shots = u64::from(self.hits) + u64::from(self.misses);
        if shots == 0 {
            return None;
        }
        Some(f64::from(self.hits) / shots as f64)
    }
}

/// Single-pass event log validator.
#[derive(Clone, Debug)]
pub struct EventLogValidator {
    min_reaction_time_ms: u64,
    max_hit_ratio: f64,
}

impl Default for EventLogValidator {
    fn default() -> Self {
        Self::from(&ValidatorPolicy::default())
    }
}

impl From<&ValidatorPolicy> for EventLogValidator {
    fn from(policy: &ValidatorPolicy) -> Self {
        Self {
            min_reaction_time_ms: policy.min_reaction_time_ms,
            max_hit_ratio: policy.max_hit_ratio,
        }
    }
}

impl EventLogValidator {
    /// Scans the log.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`RejectReason`]. An empty log
    /// is clean.
    pub fn check_events(&self, events: &[GameEvent]) -> Result<EventLogSummary, RejectReason> {
        let mut summary = EventLogSummary::default();
        let mut previous: Option<u64> = None;

        for event in events {
            if let Some(last) = previous {
                if event.timestamp < last {
                    return Err(RejectReason::EventsOutOfOrder);
                }
                if event.kind == GameEventKind::Hit
                    && event.timestamp - last < self.min_reaction_time_ms
                {
                    return Err(RejectReason::ReactionTimeTooFast);
                }
            }

            match event.kind {
                GameEventKind::Hit => summary.hits = summary.hits.saturating_add(1),
                GameEventKind::Miss => summary.misses = summary.misses.saturating_add(1),
                GameEventKind::Spawn | GameEventKind::Death | GameEventKind::Powerup => {}
            }
            previous = Some(event.timestamp);
        }

        if summary.hit_ratio().is_some_and(|ratio| ratio > self.max_hit_ratio) {
            return Err(RejectReason::HitRatioTooHigh);
        }

        Ok(summary)
    }
}
