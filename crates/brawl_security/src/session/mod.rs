//! # Session Issuing
//!
//! Every round starts here. The issuer binds a player and a mode to a server
//! start time and draws two secrets from a CSPRNG:
//!
//! - a 128-bit session id (collision-free in practice)
//! - a 256-bit server seed (the attestation key, never sent to the client)
//!
//! Predictable values here would let an attacker forge attestations, so the
//! default RNG is the operating system's.

mod rate_limit;

pub use rate_limit::RateLimiter;

use std::sync::Arc;

use brawl_shared::constants::{SERVER_SEED_BYTES, SESSION_ID_BYTES};
use brawl_shared::{GameMode, GameSession, PlayerAddress, ServerSeed, SessionId};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::clock::Clock;
use crate::error::SecurityResult;

/// Issues game sessions.
pub struct SessionIssuer<R = OsRng> {
    /// Secret source. Locked per draw.
    rng: Mutex<R>,
    /// Start-time source.
    clock: Arc<dyn Clock>,
}

impl SessionIssuer<OsRng> {
    /// Creates an issuer backed by the OS CSPRNG.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_rng(OsRng, clock)
    }
}

impl<R: RngCore + CryptoRng> SessionIssuer<R> {
    /// Creates an issuer with an explicit CSPRNG (seeded ChaCha in tests).
    #[must_use]
    pub fn with_rng(rng: R, clock: Arc<dyn Clock>) -> Self {
        Self {
            rng: Mutex::new(rng),
            clock,
        }
    }

    /// Creates a session from raw request fields.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::Input`](crate::SecurityError::Input) for an
    /// empty or malformed address, or a mode the server does not run.
    pub fn create_session(
        &self,
        player_address: &str,
        game_mode: &str,
    ) -> SecurityResult<GameSession> {
        let player = PlayerAddress::parse(player_address)?;
        let mode = game_mode.parse::<GameMode>()?;
        Ok(self.issue(player, mode))
    }

    /// Creates a session for already-parsed inputs.
    pub fn issue(&self, player_address: PlayerAddress, game_mode: GameMode) -> GameSession {
        let mut id = [0u8; SESSION_ID_BYTES];
        let mut seed = [0u8; SERVER_SEED_BYTES];
        {
            let mut rng = self.rng.lock();
            rng.fill_bytes(&mut id);
            rng.fill_bytes(&mut seed);
        }

        let session = GameSession {
            session_id: SessionId::from_bytes(&id),
            player_address,
            game_mode,
            start_time: self.clock.now_ms(),
            server_seed: ServerSeed::from_bytes(seed),
        };

        tracing::info!(
            session_id = %session.session_id,
            player = %session.player_address,
            mode = %session.game_mode,
            "game session issued"
        );
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::SecurityError;
    use brawl_shared::constants::SESSION_ID_HEX_LEN;
    use brawl_shared::SharedError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    const PLAYER: &str = "0x1234567890123456789012345678901234567890";

    fn issuer(seed: u64) -> SessionIssuer<ChaCha20Rng> {
        SessionIssuer::with_rng(
            ChaCha20Rng::seed_from_u64(seed),
            Arc::new(ManualClock::new(1_700_000_000_000)),
        )
    }

    #[test]
    fn test_session_fields() {
        let session = issuer(1).create_session(&format!(" {PLAYER} "), "Reaction").unwrap();

        assert_eq!(session.player_address.as_str(), PLAYER);
        assert_eq!(session.game_mode, GameMode::Reaction);
        assert_eq!(session.start_time, 1_700_000_000_000);
        assert_eq!(session.session_id.as_str().len(), SESSION_ID_HEX_LEN);
        assert!(session
            .session_id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_ids_and_seeds_are_unique() {
        let issuer = issuer(2);
        let player = PlayerAddress::parse(PLAYER).unwrap();

        let mut ids = HashSet::new();
        let mut seeds = HashSet::new();
        for _ in 0..1_000 {
            let session = issuer.issue(player.clone(), GameMode::Survival);
            assert!(ids.insert(session.session_id.clone()));
            assert!(seeds.insert(*session.server_seed.as_bytes()));
        }
    }

    #[test]
    fn test_os_rng_issuer() {
        let issuer = SessionIssuer::new(Arc::new(ManualClock::new(5)));
        let a = issuer.create_session(PLAYER, "precision").unwrap();
        let b = issuer.create_session(PLAYER, "precision").unwrap();
        assert_ne!(a.session_id, b.session_id);
        assert_ne!(a.server_seed, b.server_seed);
    }

    #[test]
    fn test_rejects_unsupported_mode_and_empty_address() {
        let issuer = issuer(3);

        assert_eq!(
            issuer.create_session(PLAYER, "arena").unwrap_err(),
            SecurityError::Input(SharedError::UnsupportedGameMode("arena".to_owned()))
        );
        assert_eq!(
            issuer.create_session("", "reaction").unwrap_err(),
            SecurityError::Input(SharedError::EmptyAddress)
        );
    }
}
