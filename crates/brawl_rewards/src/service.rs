//! # Arena Service
//!
//! **THE PAYOUT WINDOW** - Nothing is paid without the referee's signature.
//!
//! ## The Golden Path
//!
//! ```text
//! start_session ──► RateLimiter ──► SessionIssuer ──► SessionStore.put
//!      │                                                    │
//!      ▼                                                    │
//! SessionTicket (no seed)                                   │
//!                                                           ▼
//! submit_result ─────────────────────────────► SessionStore.consume
//!                                                           │
//!                                                           ▼
//!                                                   ResultValidator
//!                                                           │ accepted
//!                                                           ▼
//!                                                   ResultStore.put
//!                                                           │
//! claim_reward ──► address + attestation check ◄────────────┘
//!      │
//!      ▼
//! ClaimLedger.mark_paid ──► RewardMinter.mint ──► ClaimReceipt
//! ```
//!
//! A session is consumed before it is judged, so a rejected submission burns
//! it too. There is no second try against the same seed.

use std::sync::Arc;

use brawl_security::{verify_attestation, Clock, RateLimiter, ResultValidator, SessionIssuer};
use brawl_shared::{
    GameMode, GameResult, PlayerAddress, RejectReason, SessionId, SessionTicket, Signature,
    ValidationResult,
};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::config::ArenaConfig;
use crate::error::{ArenaError, ArenaResult};
use crate::mint::{RecordingMinter, RewardMinter};
use crate::reward::RewardPolicy;
use crate::store::{
    ClaimLedger, InMemoryClaimLedger, InMemoryResultStore, InMemorySessionStore, ResultStore,
    SessionStore, VerifiedResult,
};

/// Storage and payout backends.
#[derive(Clone)]
pub struct ArenaStores {
    /// Live sessions and start history.
    pub sessions: Arc<dyn SessionStore>,
    /// Accepted results.
    pub results: Arc<dyn ResultStore>,
    /// Paid claims.
    pub claims: Arc<dyn ClaimLedger>,
    /// Payout boundary.
    pub minter: Arc<dyn RewardMinter>,
}

impl ArenaStores {
    /// In-memory stores and a journaling minter.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            sessions: Arc::new(InMemorySessionStore::new()),
            results: Arc::new(InMemoryResultStore::new()),
            claims: Arc::new(InMemoryClaimLedger::new()),
            minter: Arc::new(RecordingMinter::new()),
        }
    }
}

/// Outcome of a successful claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReceipt {
    /// Settled session.
    pub session_id: SessionId,
    /// Paid player.
    pub player_address: PlayerAddress,
    /// Tokens minted.
    pub reward: u64,
    /// Reference returned by the minter.
    pub mint_reference: String,
    /// Message for the player.
    pub message: String,
}

/// Session start, result submission and reward claims.
///
/// # Usage
///
/// ```ignore
/// let service = ArenaService::in_memory(ArenaConfig::default(), Arc::new(SystemClock));
///
/// let ticket = service.start_session(address, "survival")?;
/// // ... the client plays ...
/// let verdict = service.submit_result(&result)?;
/// if let Some(signature) = verdict.signature {
///     let receipt = service.claim_reward(ticket.session_id.as_str(), address, signature.as_str())?;
/// }
/// ```
pub struct ArenaService<R = OsRng> {
    rewards: RewardPolicy,
    limiter: RateLimiter,
    validator: ResultValidator,
    issuer: SessionIssuer<R>,
    clock: Arc<dyn Clock>,
    stores: ArenaStores,
}

impl ArenaService<OsRng> {
    /// Creates a service with OS-backed session entropy.
    #[must_use]
    pub fn new(config: ArenaConfig, clock: Arc<dyn Clock>, stores: ArenaStores) -> Self {
        Self::with_rng(config, OsRng, clock, stores)
    }

    /// Creates a service over fresh in-memory stores.
    #[must_use]
    pub fn in_memory(config: ArenaConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(config, clock, ArenaStores::in_memory())
    }
}

impl<R: RngCore + CryptoRng> ArenaService<R> {
    /// Creates a service with an explicit CSPRNG for session material.
    #[must_use]
    pub fn with_rng(
        config: ArenaConfig,
        rng: R,
        clock: Arc<dyn Clock>,
        stores: ArenaStores,
    ) -> Self {
        Self {
            rewards: config.rewards,
            limiter: RateLimiter::new(config.security.rate_limit),
            validator: ResultValidator::new(config.security.validator),
            issuer: SessionIssuer::with_rng(rng, Arc::clone(&clock)),
            clock,
            stores,
        }
    }

    /// The active reward schedule.
    #[must_use]
    pub const fn reward_policy(&self) -> &RewardPolicy {
        &self.rewards
    }

    /// The backends.
    #[must_use]
    pub const fn stores(&self) -> &ArenaStores {
        &self.stores
    }

    /// Starts a game for a player.
    ///
    /// The returned ticket carries no secret; the seed stays in the store.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::MissingField`] for an empty address or mode
    /// - [`ArenaError::Input`] for a malformed address or unknown mode
    /// - [`ArenaError::RateLimited`] once the player's window is full
    pub fn start_session(
        &self,
        player_address: &str,
        game_mode: &str,
    ) -> ArenaResult<SessionTicket> {
        if player_address.trim().is_empty() {
            return Err(ArenaError::MissingField("playerAddress"));
        }
        if game_mode.trim().is_empty() {
            return Err(ArenaError::MissingField("gameMode"));
        }

        let player = PlayerAddress::parse(player_address)?;
        let mode = game_mode.parse::<GameMode>()?;

        let now = self.clock.now_ms();
        let since = now.saturating_sub(self.limiter.policy().window_ms);
        let recent = self.stores.sessions.recent_for_player(&player, since)?;
        if !self.limiter.allow_new_session(&player, &recent, now) {
            return Err(ArenaError::RateLimited {
                player: player.to_string(),
            });
        }

        let session = self.issuer.issue(player, mode);
        let ticket = session.ticket();
        self.stores.sessions.put(session)?;
        Ok(ticket)
    }

    /// Judges a submitted result.
    ///
    /// The named session is consumed first, whatever the verdict. Unknown or
    /// already consumed sessions are rejected as an invalid session id.
    ///
    /// # Errors
    ///
    /// [`ArenaError::MissingField`] without a session id, or a backend
    /// failure. Suspicious results are `Ok` with `is_valid == false`.
    pub fn submit_result(&self, result: &GameResult) -> ArenaResult<ValidationResult> {
        if result.session_id.is_empty() {
            return Err(ArenaError::MissingField("sessionId"));
        }

        let Some(session) = self.stores.sessions.consume(&result.session_id)? else {
            tracing::warn!(
                session_id = %result.session_id,
                "submission for unknown or consumed session"
            );
            return Ok(ValidationResult::rejected(RejectReason::InvalidSessionId));
        };

        let now = self.clock.now_ms();
        let verdict = self.validator.validate(result, &session, now);

        if let Some(signature) = &verdict.signature {
            self.stores.results.put(VerifiedResult {
                session_id: session.session_id,
                player_address: session.player_address,
                score: verdict.score,
                kills: result.kills,
                signature: signature.clone(),
                verified_at: now,
                game_mode: session.game_mode,
                server_seed: session.server_seed,
            })?;
        }

        Ok(verdict)
    }

    /// Pays out the reward of an accepted result.
    ///
    /// The presented signature is the only authorization; the score comes
    /// from the stored result, never from the request.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::MissingField`] for any empty argument
    /// - [`ArenaError::NoVerifiedResult`] when nothing was accepted for the session
    /// - [`ArenaError::AddressMismatch`] when the claimant did not earn it
    /// - [`ArenaError::InvalidSignature`] when the signature does not attest it
    /// - [`ArenaError::AlreadyClaimed`] on a second claim
    /// - [`ArenaError::MintFailed`] when the payout fails (the claim stays open)
    pub fn claim_reward(
        &self,
        session_id: &str,
        player_address: &str,
        signature: &str,
    ) -> ArenaResult<ClaimReceipt> {
        for (field, value) in [
            ("sessionId", session_id),
            ("playerAddress", player_address),
            ("signature", signature),
        ] {
            if value.trim().is_empty() {
                return Err(ArenaError::MissingField(field));
            }
        }

        let session_id = SessionId::new(session_id.trim());
        let verified = self
            .stores
            .results
            .get(&session_id)?
            .ok_or_else(|| ArenaError::NoVerifiedResult(session_id.to_string()))?;

        let claimant =
            PlayerAddress::parse(player_address).map_err(|_| ArenaError::AddressMismatch)?;
        if claimant != verified.player_address {
            return Err(ArenaError::AddressMismatch);
        }

        let presented = Signature::new(signature.trim());
        if !verify_attestation(
            &verified.session_id,
            verified.score,
            verified.kills,
            &verified.server_seed,
            &presented,
        ) {
            tracing::warn!(
                session_id = %session_id,
                player = %claimant,
                "claim with invalid signature"
            );
            return Err(ArenaError::InvalidSignature);
        }

        let reward = self.rewards.reward_for(verified.score, verified.game_mode);

        if !self.stores.claims.mark_paid(&session_id)? {
            return Err(ArenaError::AlreadyClaimed(session_id.to_string()));
        }

        let mint_reference = match self.stores.minter.mint(&claimant, reward, &session_id) {
            Ok(reference) => reference,
            Err(e) => {
                self.stores.claims.release(&session_id)?;
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "payout failed, claim reopened"
                );
                return Err(e);
            }
        };

        tracing::info!(
            session_id = %session_id,
            player = %claimant,
            reward,
            mode = %verified.game_mode,
            "reward claimed"
        );

        Ok(ClaimReceipt {
            session_id,
            player_address: claimant,
            reward,
            mint_reference,
            message: format!("Successfully claimed {reward} ZC tokens!"),
        })
    }
}
