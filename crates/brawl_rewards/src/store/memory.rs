//! In-memory stores.
//!
//! Lock scopes are single statements; nothing is held across calls.
//! Memory stays bounded only if the owner calls
//! [`InMemorySessionStore::purge_expired`] now and then.

use std::collections::{HashMap, HashSet};

use brawl_shared::{GameSession, PlayerAddress, SessionId};
use parking_lot::{Mutex, RwLock};

use super::{ClaimLedger, ResultStore, SessionStore, VerifiedResult};
use crate::error::ArenaResult;

/// Session store backed by hash maps.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    /// Sessions not yet consumed.
    live: Mutex<HashMap<SessionId, GameSession>>,
    /// Start history per player, for rate limiting.
    started: Mutex<HashMap<PlayerAddress, Vec<GameSession>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions still waiting for a result.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }

    /// Number of players with start history on record.
    #[must_use]
    pub fn tracked_players(&self) -> usize {
        self.started.lock().len()
    }

    /// Drops abandoned sessions and start history at or before `before_ms`.
    ///
    /// Returns the number of live sessions removed. Call periodically with
    /// `now - max(session lifetime, rate window)`.
    pub fn purge_expired(&self, before_ms: u64) -> usize {
        let removed = {
            let mut live = self.live.lock();
            let before = live.len();
            live.retain(|_, session| session.start_time > before_ms);
            before - live.len()
        };

        self.started.lock().retain(|_, history| {
            history.retain(|session| session.start_time > before_ms);
            !history.is_empty()
        });

        if removed > 0 {
            tracing::debug!(removed, before_ms, "purged abandoned sessions");
        }
        removed
    }
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, session: GameSession) -> ArenaResult<()> {
        self.started
            .lock()
            .entry(session.player_address.clone())
            .or_default()
            .push(session.clone());
        self.live.lock().insert(session.session_id.clone(), session);
        Ok(())
    }

    fn get(&self, session_id: &SessionId) -> ArenaResult<Option<GameSession>> {
        Ok(self.live.lock().get(session_id).cloned())
    }

    fn consume(&self, session_id: &SessionId) -> ArenaResult<Option<GameSession>> {
        Ok(self.live.lock().remove(session_id))
    }

    fn recent_for_player(
        &self,
        player: &PlayerAddress,
        since_ms: u64,
    ) -> ArenaResult<Vec<GameSession>> {
        let mut started = self.started.lock();
        let Some(history) = started.get_mut(player) else {
            return Ok(Vec::new());
        };
        // Anything at or before the cutoff can never count again.
        history.retain(|session| session.start_time > since_ms);
        let recent = history.clone();
        if recent.is_empty() {
            started.remove(player);
        }
        Ok(recent)
    }
}

/// Result store backed by a hash map.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    results: RwLock<HashMap<SessionId, VerifiedResult>>,
}

impl InMemoryResultStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for InMemoryResultStore {
    fn put(&self, result: VerifiedResult) -> ArenaResult<()> {
        self.results.write().insert(result.session_id.clone(), result);
        Ok(())
    }

    fn get(&self, session_id: &SessionId) -> ArenaResult<Option<VerifiedResult>> {
        Ok(self.results.read().get(session_id).cloned())
    }
}

/// Claim ledger backed by a hash set.
#[derive(Debug, Default)]
pub struct InMemoryClaimLedger {
    paid: Mutex<HashSet<SessionId>>,
}

impl InMemoryClaimLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClaimLedger for InMemoryClaimLedger {
    fn mark_paid(&self, session_id: &SessionId) -> ArenaResult<bool> {
        Ok(self.paid.lock().insert(session_id.clone()))
    }

    fn release(&self, session_id: &SessionId) -> ArenaResult<()> {
        self.paid.lock().remove(session_id);
        Ok(())
    }

    fn is_paid(&self, session_id: &SessionId) -> ArenaResult<bool> {
        Ok(self.paid.lock().contains(session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brawl_shared::{GameMode, ServerSeed};
    use std::sync::Arc;
    use std::thread;

    fn player(last: char) -> PlayerAddress {
        PlayerAddress::parse(&format!("0x{}{last}", "0".repeat(39))).unwrap()
    }

    fn session(id: &str, owner: &PlayerAddress, start_time: u64) -> GameSession {
        GameSession {
            session_id: SessionId::new(id),
            player_address: owner.clone(),
            game_mode: GameMode::Reaction,
            start_time,
            server_seed: ServerSeed::from_bytes([3; 32]),
        }
    }

    #[test]
    fn test_consume_is_at_most_once() {
        let store = InMemorySessionStore::new();
        let alice = player('a');
        store.put(session("s1", &alice, 100)).unwrap();

        assert!(store.get(&SessionId::new("s1")).unwrap().is_some());
        assert!(store.consume(&SessionId::new("s1")).unwrap().is_some());
        assert!(store.consume(&SessionId::new("s1")).unwrap().is_none());
        assert!(store.get(&SessionId::new("s1")).unwrap().is_none());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_history_survives_consumption() {
        let store = InMemorySessionStore::new();
        let alice = player('a');
        store.put(session("s1", &alice, 100)).unwrap();
        store.put(session("s2", &alice, 200)).unwrap();
        store.consume(&SessionId::new("s1")).unwrap();

        let recent = store.recent_for_player(&alice, 0).unwrap();
        assert_eq!(recent.len(), 2);
        assert!(store.recent_for_player(&player('b'), 0).unwrap().is_empty());
    }

    #[test]
    fn test_history_prunes_at_cutoff() {
        let store = InMemorySessionStore::new();
        let alice = player('a');
        for (i, start) in [100_u64, 200, 300].into_iter().enumerate() {
            store.put(session(&format!("s{i}"), &alice, start)).unwrap();
        }

        let recent = store.recent_for_player(&alice, 200).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].start_time, 300);
        // Pruned entries stay gone.
        assert_eq!(store.recent_for_player(&alice, 0).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_history_is_forgotten() {
        let store = InMemorySessionStore::new();
        let alice = player('a');
        store.put(session("s1", &alice, 100)).unwrap();
        assert_eq!(store.tracked_players(), 1);

        assert!(store.recent_for_player(&alice, 100).unwrap().is_empty());
        assert_eq!(store.tracked_players(), 0);
    }

    #[test]
    fn test_purge_expired_bounds_both_maps() {
        let store = InMemorySessionStore::new();
        let alice = player('a');
        let bob = player('b');
        store.put(session("old-a", &alice, 100)).unwrap();
        store.put(session("old-b", &bob, 150)).unwrap();
        store.put(session("new-a", &alice, 500)).unwrap();

        assert_eq!(store.purge_expired(200), 2);
        assert_eq!(store.live_count(), 1);
        assert!(store.get(&SessionId::new("new-a")).unwrap().is_some());
        // Bob never came back; his history is gone too.
        assert_eq!(store.tracked_players(), 1);
        assert_eq!(store.recent_for_player(&alice, 0).unwrap().len(), 1);

        assert_eq!(store.purge_expired(200), 0);
    }

    #[test]
    fn test_concurrent_consume_has_one_winner() {
        let store = Arc::new(InMemorySessionStore::new());
        store.put(session("race", &player('a'), 1)).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.consume(&SessionId::new("race")).unwrap().is_some())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_ledger_test_and_set() {
        let ledger = InMemoryClaimLedger::new();
        let id = SessionId::new("paid");

        assert!(!ledger.is_paid(&id).unwrap());
        assert!(ledger.mark_paid(&id).unwrap());
        assert!(!ledger.mark_paid(&id).unwrap());
        assert!(ledger.is_paid(&id).unwrap());

        ledger.release(&id).unwrap();
        assert!(!ledger.is_paid(&id).unwrap());
    }
}
