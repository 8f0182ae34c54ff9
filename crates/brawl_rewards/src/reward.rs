//! # Reward Calculation
//!
//! Tokens owed for a verified score:
//!
//! ```text
//! reward = floor(floor(score / points_per_token) * multiplier_bp / 10_000)
//! ```
//!
//! Integer arithmetic only. Survival pays a 1.5x bonus by default.

use brawl_security::config::BASIS_POINTS;
use brawl_shared::GameMode;
use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, ArenaResult};

/// Reward schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardPolicy {
    /// Verified points per whole token.
    pub points_per_token: u64,
    /// Reaction mode multiplier (basis points).
    pub reaction_multiplier_bp: u32,
    /// Precision mode multiplier (basis points).
    pub precision_multiplier_bp: u32,
    /// Survival mode multiplier (basis points).
    pub survival_multiplier_bp: u32,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            points_per_token: 10,
            reaction_multiplier_bp: BASIS_POINTS,
            precision_multiplier_bp: BASIS_POINTS,
            survival_multiplier_bp: 15_000,
        }
    }
}

impl RewardPolicy {
    /// Multiplier for a mode, in basis points.
    #[must_use]
    pub const fn multiplier_bp(&self, mode: GameMode) -> u32 {
        match mode {
            GameMode::Reaction => self.reaction_multiplier_bp,
            GameMode::Precision => self.precision_multiplier_bp,
            GameMode::Survival => self.survival_multiplier_bp,
        }
    }

    /// Tokens owed for a verified (already normalized) score.
    #[must_use]
    pub fn reward_for(&self, score: u64, mode: GameMode) -> u64 {
        let base = score / self.points_per_token.max(1);
        let scaled = u128::from(base) * u128::from(self.multiplier_bp(mode))
            / u128::from(BASIS_POINTS);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }

    /// Checks the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidPolicy`] for a zero divisor or a zero
    /// multiplier.
    pub fn validate(&self) -> ArenaResult<()> {
        if self.points_per_token == 0 {
            return Err(ArenaError::InvalidPolicy("points_per_token must be positive".to_owned()));
        }
        for mode in GameMode::ALL {
            if self.multiplier_bp(mode) == 0 {
                return Err(ArenaError::InvalidPolicy(format!(
                    "{mode} multiplier must be positive"
                )));
            }
        }
        Ok(())
    }
}
