//! # Arena Configuration
//!
//! One TOML file for the whole service. The referee's sections sit at the
//! top level next to the reward schedule:
//!
//! ```toml
//! [validator]
//! max_score_per_second = 40
//!
//! [rate_limit]
//! max_sessions_per_window = 10
//!
//! [rewards]
//! survival_multiplier_bp = 20000
//! ```
//!
//! Every field is optional; missing values fall back to the production
//! policy.

use std::path::Path;

use brawl_security::{SecurityConfig, SecurityError};
use serde::{Deserialize, Serialize};

use crate::error::ArenaResult;
use crate::reward::RewardPolicy;

/// Service configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Referee policy (`[validator]`, `[rate_limit]`).
    #[serde(flatten)]
    pub security: SecurityConfig,
    /// Reward schedule (`[rewards]`).
    pub rewards: RewardPolicy,
}

impl ArenaConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Security`](crate::ArenaError::Security) for
    /// malformed TOML or a bad referee policy and
    /// [`ArenaError::InvalidPolicy`](crate::ArenaError::InvalidPolicy) for a
    /// bad reward schedule.
    pub fn from_toml_str(text: &str) -> ArenaResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| SecurityError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::ConfigUnreadable`] (wrapped) if the file cannot
    /// be read, otherwise the errors of [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ArenaResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SecurityError::ConfigUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> ArenaResult<()> {
        self.security.validate()?;
        self.rewards.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArenaError;

    #[test]
    fn test_sections_share_one_file() {
        let config = ArenaConfig::from_toml_str(
            r"
            [validator]
            max_score_per_second = 40

            [rate_limit]
            max_sessions_per_window = 10

            [rewards]
            survival_multiplier_bp = 20000
            ",
        )
        .unwrap();

        assert_eq!(config.security.validator.max_score_per_second, 40);
        assert_eq!(config.security.validator.min_reaction_time_ms, 100);
        assert_eq!(config.security.rate_limit.max_sessions_per_window, 10);
        assert_eq!(config.rewards.survival_multiplier_bp, 20_000);
        assert_eq!(config.rewards.points_per_token, 10);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ArenaConfig::from_toml_str("").unwrap(), ArenaConfig::default());
    }

    #[test]
    fn test_bad_sections_are_reported() {
        assert!(matches!(
            ArenaConfig::from_toml_str("[rewards]\npoints_per_token = 0"),
            Err(ArenaError::InvalidPolicy(_))
        ));
        assert!(matches!(
            ArenaConfig::from_toml_str("[validator]\nmax_hit_ratio = 0.0"),
            Err(ArenaError::Security(SecurityError::InvalidPolicy(_)))
        ));
        assert!(matches!(
            ArenaConfig::from_toml_str("rewards = 3"),
            Err(ArenaError::Security(SecurityError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ArenaConfig::load("/definitely/not/here.toml"),
            Err(ArenaError::Security(SecurityError::ConfigUnreadable { .. }))
        ));
    }
}
