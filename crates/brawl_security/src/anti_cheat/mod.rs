//! # Pattern Detection
//!
//! Statistical bot detection over the submitted event log.
//!
//! ## Detection Methods
//!
//! - **Regular hit timing**: humans jitter. A macro firing every 250 ms
//!   exactly produces inter-hit intervals with near-zero variance. The
//!   anomaly is the regularity, not the speed.
//!
//! The detector returns signals, not verdicts. The orchestrator decides how
//! many signals are enough to reject, so new heuristics can be added here
//! without touching the validator's contract.

use brawl_shared::GameEvent;

use crate::config::ValidatorPolicy;

/// Kinds of suspicious signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SuspiciousSignal {
    /// Inter-hit intervals are too uniform to be human.
    RegularHitTiming,
}

/// One suspicious signal with its evidence.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalReport {
    /// What was detected.
    pub signal: SuspiciousSignal,
    /// Confidence level (0.0 - 1.0).
    pub confidence: f64,
    /// Description of the detection.
    pub description: String,
    /// Timing evidence.
    pub evidence: TimingEvidence,
}

/// Inter-hit timing statistics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimingEvidence {
    /// Successive gaps between hits (ms).
    pub intervals: Vec<u64>,
    /// Mean gap (ms).
    pub mean: f64,
    /// Population variance of the gaps (ms^2).
    pub variance: f64,
}

impl TimingEvidence {
    /// Computes interval statistics over ordered hit timestamps.
    ///
    /// Returns `None` with fewer than two hits. Timestamps that go backwards
    /// yield a zero gap; ordering is the event validator's job.
    #[must_use]
    pub fn from_hit_times(hit_times: &[u64]) -> Option<Self> {
        if hit_times.len() < 2 {
            return None;
        }

        let intervals: Vec<u64> = hit_times
            .windows(2)
            .map(|pair| pair[1].saturating_sub(pair[0]))
            .collect();

        let n = intervals.len() as f64;
        let mean = intervals.iter().map(|&gap| gap as f64).sum::<f64>() / n;
        let variance = intervals
            .iter()
            .map(|&gap| {
                let delta = gap as f64 - mean;
                delta * delta
            })
            .sum::<f64>()
            / n;

        Some(Self {
            intervals,
            mean,
            variance,
        })
    }
}

/// All signals raised for one event log.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatternReport {
    /// Raised signals, in detection order.
    pub signals: Vec<SignalReport>,
}

impl PatternReport {
    /// Number of raised signals.
    #[must_use]
    pub fn count(&self) -> u32 {
        u32::try_from(self.signals.len()).unwrap_or(u32::MAX)
    }

    /// True when nothing was raised.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Configuration for pattern detection.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Hits required before timing is evaluated.
    pub min_hits: usize,
    /// Variance floor (ms^2).
    pub min_interval_variance: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::from(&ValidatorPolicy::default())
    }
}

impl From<&ValidatorPolicy> for DetectorConfig {
    fn from(policy: &ValidatorPolicy) -> Self {
        Self {
            min_hits: policy.min_hits_for_pattern,
            min_interval_variance: policy.min_interval_variance,
        }
    }
}

/// Stateless pattern detector.
#[derive(Clone, Debug, Default)]
pub struct PatternDetector {
    config: DetectorConfig,
}

impl PatternDetector {
    /// Creates a detector.
    #[must_use]
    pub const fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Runs every heuristic and collects the signals.
    #[must_use]
    pub fn analyze(&self, events: &[GameEvent]) -> PatternReport {
        let mut report = PatternReport::default();

        if let Some(signal) = self.check_hit_regularity(events) {
            report.signals.push(signal);
        }

        report
    }

    /// Number of suspicious signals in the log.
    #[must_use]
    pub fn detect_suspicious_patterns(&self, events: &[GameEvent]) -> u32 {
        self.analyze(events).count()
    }

    /// Flags near-constant gaps between hits.
    fn check_hit_regularity(&self, events: &[GameEvent]) -> Option<SignalReport> {
        let hit_times: Vec<u64> = events
            .iter()
            .filter(|event| event.is_hit())
            .map(|event| event.timestamp)
            .collect();

        // Too few samples say nothing about regularity.
        if hit_times.len() < self.config.min_hits {
            return None;
        }

        let evidence = TimingEvidence::from_hit_times(&hit_times)?;
        if evidence.variance >= self.config.min_interval_variance {
            return None;
        }

        Some(SignalReport {
            signal: SuspiciousSignal::RegularHitTiming,
            confidence: regularity_confidence(evidence.variance, self.config.min_interval_variance),
            description: format!(
                "{} hits at {:.1} ms mean interval with variance {:.2} ms^2 (floor {})",
                hit_times.len(),
                evidence.mean,
                evidence.variance,
                self.config.min_interval_variance
            ),
            evidence,
        })
    }
}

/// Zero variance is certain; variance at the floor is a coin toss.
fn regularity_confidence(variance: f64, floor: f64) -> f64 {
    if floor <= 0.0 {
        return 1.0;
    }
    (1.0 - variance / floor).clamp(0.5, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brawl_shared::GameEventKind;

    fn hits_at(times: &[u64]) -> Vec<GameEvent> {
        times.iter().map(|&t| GameEvent::hit(t)).collect()
    }

    #[test]
    fn test_metronome_hits_are_flagged() {
        let detector = PatternDetector::default();
        let events = hits_at(&[1_000, 1_250, 1_500, 1_750, 2_000, 2_250]);

        let report = detector.analyze(&events);
        assert_eq!(report.count(), 1);

        let signal = &report.signals[0];
        assert_eq!(signal.signal, SuspiciousSignal::RegularHitTiming);
        assert_eq!(signal.evidence.intervals, vec![250; 5]);
        assert!(signal.evidence.variance.abs() < f64::EPSILON);
        assert!((signal.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_human_jitter_is_clean() {
        let detector = PatternDetector::default();
        let events = hits_at(&[1_000, 1_310, 1_520, 1_900, 2_080, 2_500]);

        assert!(detector.analyze(&events).is_clean());
        assert_eq!(detector.detect_suspicious_patterns(&events), 0);
    }

    #[test]
    fn test_four_hits_are_never_enough() {
        let detector = PatternDetector::default();
        let events = hits_at(&[1_000, 1_250, 1_500, 1_750]);

        assert_eq!(detector.detect_suspicious_patterns(&events), 0);
    }

    #[test]
    fn test_only_hits_are_sampled() {
        let detector = PatternDetector::default();
        // Perfectly regular misses around jittery hits.
        let mut events = hits_at(&[1_000, 1_400, 1_550, 2_100, 2_230]);
        for t in (0..20).map(|i| 900 + i * 100) {
            events.push(GameEvent::new(t, GameEventKind::Miss));
        }
        events.sort_by_key(|event| event.timestamp);

        assert_eq!(detector.detect_suspicious_patterns(&events), 0);
    }

    #[test]
    fn test_variance_threshold_is_strict() {
        // Intervals 90 and 110 alternate: mean 100, variance exactly 100.
        let events = hits_at(&[0, 90, 200, 290, 400]);
        let evidence = TimingEvidence::from_hit_times(&[0, 90, 200, 290, 400]).unwrap();
        assert!((evidence.variance - 100.0).abs() < 1e-9);

        assert_eq!(PatternDetector::default().detect_suspicious_patterns(&events), 0);

        let stricter = PatternDetector::new(DetectorConfig {
            min_hits: 5,
            min_interval_variance: 100.5,
        });
        assert_eq!(stricter.detect_suspicious_patterns(&events), 1);
    }

    #[test]
    fn test_empty_log() {
        assert!(TimingEvidence::from_hit_times(&[]).is_none());
        assert!(PatternDetector::default().analyze(&[]).is_clean());
    }
}
