//! Per-player session rate limiting.
//!
//! Bounds reward-farming throughput. The limiter keeps no state of its own;
//! the caller supplies the sessions it knows about and the current instant.
//! Two concurrent starts may both pass when one slot remains. That
//! off-by-one is accepted: this is a throughput control, not a security
//! boundary.

use brawl_shared::{GameSession, PlayerAddress};

use crate::config::RateLimitPolicy;

/// Rolling-window session limiter.
#[derive(Clone, Debug, Default)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
}

impl RateLimiter {
    /// Creates a limiter for the given policy.
    #[must_use]
    pub const fn new(policy: RateLimitPolicy) -> Self {
        Self { policy }
    }

    /// The active policy.
    #[must_use]
    pub const fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Counts `player`'s sessions that started inside the trailing window.
    ///
    /// A session exactly one window old has aged out.
    pub fn count_recent<'a, I>(&self, player: &PlayerAddress, sessions: I, now_ms: u64) -> usize
    where
        I: IntoIterator<Item = &'a GameSession>,
    {
        let window_start = now_ms.saturating_sub(self.policy.window_ms);
        sessions
            .into_iter()
            .filter(|session| session.is_owned_by(player) && session.start_time > window_start)
            .count()
    }

    /// Returns false once the player has used up the window.
    pub fn allow_new_session<'a, I>(
        &self,
        player: &PlayerAddress,
        recent_sessions: I,
        now_ms: u64,
    ) -> bool
    where
        I: IntoIterator<Item = &'a GameSession>,
    {
        let used = self.count_recent(player, recent_sessions, now_ms);
        let allowed = used < self.policy.max_sessions_per_window;
        if !allowed {
            tracing::warn!(
                player = %player,
                used,
                limit = self.policy.max_sessions_per_window,
                "session rate limit reached"
            );
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brawl_shared::{GameMode, ServerSeed, SessionId};

    const HOUR_MS: u64 = 3_600_000;
    const NOW: u64 = 10 * HOUR_MS;

    fn player(last: char) -> PlayerAddress {
        PlayerAddress::parse(&format!("0x{}{last}", "0".repeat(39))).unwrap()
    }

    fn sessions(owner: &PlayerAddress, count: usize, start_time: u64) -> Vec<GameSession> {
        (0..count)
            .map(|i| GameSession {
                session_id: SessionId::new(format!("{start_time}-{i}")),
                player_address: owner.clone(),
                game_mode: GameMode::Reaction,
                start_time,
                server_seed: ServerSeed::from_bytes([0; 32]),
            })
            .collect()
    }

    #[test]
    fn test_twentieth_session_is_the_last() {
        let limiter = RateLimiter::default();
        let alice = player('a');

        assert!(limiter.allow_new_session(&alice, &sessions(&alice, 19, NOW - 1_000), NOW));
        assert!(!limiter.allow_new_session(&alice, &sessions(&alice, 20, NOW - 1_000), NOW));
    }

    #[test]
    fn test_old_sessions_age_out() {
        let limiter = RateLimiter::default();
        let alice = player('a');

        let mut history = sessions(&alice, 19, NOW - 1_000);
        history.extend(sessions(&alice, 5, NOW - HOUR_MS - 1));
        history.extend(sessions(&alice, 1, NOW - HOUR_MS));

        assert_eq!(limiter.count_recent(&alice, &history, NOW), 19);
        assert!(limiter.allow_new_session(&alice, &history, NOW));
    }

    #[test]
    fn test_other_players_do_not_count() {
        let limiter = RateLimiter::default();
        let alice = player('a');
        let bob = player('b');

        let history = sessions(&bob, 50, NOW - 1_000);
        assert!(limiter.allow_new_session(&alice, &history, NOW));
        assert!(!limiter.allow_new_session(&bob, &history, NOW));
    }

    #[test]
    fn test_custom_ceiling() {
        let limiter = RateLimiter::new(RateLimitPolicy {
            window_ms: 60_000,
            max_sessions_per_window: 2,
        });
        let alice = player('a');

        assert!(limiter.allow_new_session(&alice, &sessions(&alice, 1, NOW - 30_000), NOW));
        assert!(!limiter.allow_new_session(&alice, &sessions(&alice, 2, NOW - 30_000), NOW));
        assert!(limiter.allow_new_session(&alice, &sessions(&alice, 2, NOW - 60_000), NOW));
    }
}
