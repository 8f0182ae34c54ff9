//! # Minting Boundary
//!
//! Where a paid claim turns into tokens. On-chain minting is somebody else's
//! problem; the service only needs an amount to go out and a reference to
//! come back.

use brawl_shared::{PlayerAddress, SessionId};
use parking_lot::Mutex;

use crate::error::ArenaResult;

/// Pays out rewards.
pub trait RewardMinter: Send + Sync {
    /// Mints `amount` tokens to `player` for `session_id`.
    ///
    /// Returns an opaque reference (transaction hash or similar).
    ///
    /// # Errors
    ///
    /// [`ArenaError::MintFailed`](crate::ArenaError::MintFailed) when the
    /// payout did not happen.
    fn mint(
        &self,
        player: &PlayerAddress,
        amount: u64,
        session_id: &SessionId,
    ) -> ArenaResult<String>;
}

/// One payout recorded by [`RecordingMinter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintRecord {
    /// Reference handed back to the caller.
    pub reference: String,
    /// Recipient.
    pub player: PlayerAddress,
    /// Tokens minted.
    pub amount: u64,
    /// Session the payout settles.
    pub session_id: SessionId,
}

/// Minter that only keeps a journal. Stands in for the chain in local runs
/// and tests.
#[derive(Debug, Default)]
pub struct RecordingMinter {
    journal: Mutex<Vec<MintRecord>>,
}

impl RecordingMinter {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every payout so far, in order.
    #[must_use]
    pub fn records(&self) -> Vec<MintRecord> {
        self.journal.lock().clone()
    }

    /// Sum of all minted tokens.
    #[must_use]
    pub fn total_minted(&self) -> u64 {
        self.journal
            .lock()
            .iter()
            .fold(0_u64, |total, record| total.saturating_add(record.amount))
    }
}

impl RewardMinter for RecordingMinter {
    fn mint(
        &self,
        player: &PlayerAddress,
        amount: u64,
        session_id: &SessionId,
    ) -> ArenaResult<String> {
        let mut journal = self.journal.lock();
        let reference = format!("0x{:064x}", journal.len() + 1);
        journal.push(MintRecord {
            reference: reference.clone(),
            player: player.clone(),
            amount,
            session_id: session_id.clone(),
        });
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal() {
        let minter = RecordingMinter::new();
        let player = PlayerAddress::parse("0x00000000000000000000000000000000000000aa").unwrap();

        let first = minter.mint(&player, 95, &SessionId::new("a")).unwrap();
        let second = minter.mint(&player, 142, &SessionId::new("b")).unwrap();

        assert_ne!(first, second);
        assert_eq!(first.len(), 66);
        assert_eq!(minter.total_minted(), 237);
        assert_eq!(minter.records()[1].session_id, SessionId::new("b"));
    }
}
