//! # Referee Policy
//!
//! Every threshold the referee applies, with defaults equal to the
//! production policy. Loaded once at startup from TOML; every field is
//! optional.
//!
//! ```toml
//! [validator]
//! min_reaction_time_ms = 120
//! suspicious_pattern_threshold = 1
//!
//! [rate_limit]
//! max_sessions_per_window = 10
//! ```
//!
//! The reaction floor and the variance floor have no derivation behind them
//! beyond observed play. Treat them as knobs, not constants of nature.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SecurityError, SecurityResult};

/// One hundred percent, in basis points.
pub const BASIS_POINTS: u32 = 10_000;

/// Thresholds for result validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorPolicy {
    /// Shortest round that can earn anything (ms).
    pub min_game_duration_ms: u64,
    /// Highest legitimate scoring rate (points per second of wall clock).
    pub max_score_per_second: u64,
    /// Ceiling on the client-claimed accuracy.
    pub max_accuracy: f64,
    /// Fastest plausible gap before a hit (ms).
    pub min_reaction_time_ms: u64,
    /// Ceiling on hits / (hits + misses) in the event log.
    pub max_hit_ratio: f64,
    /// Hits needed before timing regularity is evaluated.
    pub min_hits_for_pattern: usize,
    /// Inter-hit variance below this is machine-like (ms^2).
    pub min_interval_variance: f64,
    /// Suspicious signals needed to reject.
    pub suspicious_pattern_threshold: u32,
    /// Share of the claimed score kept on acceptance (basis points).
    pub score_haircut_bp: u32,
}

impl Default for ValidatorPolicy {
    fn default() -> Self {
        Self {
            min_game_duration_ms: 10_000,
            max_score_per_second: 50,
            max_accuracy: 0.95,
            min_reaction_time_ms: 100,
            max_hit_ratio: 0.95,
            min_hits_for_pattern: 5,
            min_interval_variance: 100.0,
            suspicious_pattern_threshold: 3,
            score_haircut_bp: 9_500,
        }
    }
}

impl ValidatorPolicy {
    /// Checks the policy for values that would disable or invert a gate.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidPolicy`] naming the first bad field.
    pub fn validate(&self) -> SecurityResult<()> {
        if self.max_score_per_second == 0 {
            return Err(invalid("max_score_per_second must be positive"));
        }
        if !is_ratio(self.max_accuracy) {
            return Err(invalid("max_accuracy must be in (0, 1]"));
        }
        if !is_ratio(self.max_hit_ratio) {
            return Err(invalid("max_hit_ratio must be in (0, 1]"));
        }
        if self.min_hits_for_pattern < 2 {
            return Err(invalid("min_hits_for_pattern needs at least two hits"));
        }
        if !self.min_interval_variance.is_finite() || self.min_interval_variance < 0.0 {
            return Err(invalid("min_interval_variance must be a finite, non-negative value"));
        }
        if self.suspicious_pattern_threshold == 0 {
            return Err(invalid("suspicious_pattern_threshold must be positive"));
        }
        if self.score_haircut_bp == 0 || self.score_haircut_bp > BASIS_POINTS {
            return Err(invalid("score_haircut_bp must be in 1..=10000"));
        }
        Ok(())
    }
}

/// Session rate limiting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitPolicy {
    /// Trailing window length (ms).
    pub window_ms: u64,
    /// Sessions a player may start inside the window.
    pub max_sessions_per_window: usize,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            window_ms: 60 * 60 * 1_000,
            max_sessions_per_window: 20,
        }
    }
}

impl RateLimitPolicy {
    /// Checks the policy.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidPolicy`] for an empty window or a zero
    /// ceiling.
    pub fn validate(&self) -> SecurityResult<()> {
        if self.window_ms == 0 {
            return Err(invalid("window_ms must be positive"));
        }
        if self.max_sessions_per_window == 0 {
            return Err(invalid("max_sessions_per_window must be positive"));
        }
        Ok(())
    }
}

/// The referee's full policy file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Result validation thresholds.
    pub validator: ValidatorPolicy,
    /// Session rate limiting.
    pub rate_limit: RateLimitPolicy,
}

impl SecurityConfig {
    /// Parses and validates a TOML policy.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidConfig`] on malformed TOML and
    /// [`SecurityError::InvalidPolicy`] on out-of-range values.
    pub fn from_toml_str(text: &str) -> SecurityResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| SecurityError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML policy file.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::ConfigUnreadable`] if the file cannot be read,
    /// otherwise the errors of [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> SecurityResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SecurityError::ConfigUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Validates both sections.
    ///
    /// # Errors
    ///
    /// Returns the first [`SecurityError::InvalidPolicy`] found.
    pub fn validate(&self) -> SecurityResult<()> {
        self.validator.validate()?;
        self.rate_limit.validate()
    }
}

fn is_ratio(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}

fn invalid(reason: &str) -> SecurityError {
    SecurityError::InvalidPolicy(reason.to_owned())
}
