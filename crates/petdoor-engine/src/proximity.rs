//! Proximity evaluation from beacon RSSI readings.
//!
//! Each scan cycle yields at most one sighting of the configured beacon.
//! The evaluator compares it with the previous sighting and classifies the
//! beacon as in range, approaching, receding, or steady:
//!
//! ```text
//! rssi >= override_threshold          → InRange     (no baseline needed)
//! rssi - previous > increase_threshold → Approaching
//! rssi - previous < 0                  → Receding
//! otherwise                            → Steady
//! ```
//!
//! Cycles without a sighting count as misses. Once the miss counter exceeds
//! `miss_reset_threshold` the baseline is discarded, so a beacon coming back
//! after a long absence cannot be classified as approaching on its first
//! sighting.

use petdoor_core::constants::{
    DEFAULT_INCREASE_THRESHOLD, DEFAULT_MISS_RESET_THRESHOLD, DEFAULT_OVERRIDE_THRESHOLD,
};
use petdoor_core::{Error, Result, validate_rssi};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Outcome of classifying one sighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityTrend {
    /// At or above the override threshold.
    InRange,
    /// Stronger than the previous sighting by more than the increase threshold.
    Approaching,
    /// Weaker than the previous sighting.
    Receding,
    /// Neither significantly stronger nor weaker.
    Steady,
}

impl ProximityTrend {
    /// Returns `true` for trends that request the door to open.
    #[must_use]
    pub fn should_open(self) -> bool {
        matches!(self, ProximityTrend::InRange | ProximityTrend::Approaching)
    }
}

/// Tuning for the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProximityConfig {
    /// Minimum RSSI increase, exclusive, that counts as approaching.
    pub increase_threshold: i16,
    /// Absolute RSSI at or above which the beacon is in range.
    pub override_threshold: i16,
    /// Misses tolerated before the baseline is discarded.
    pub miss_reset_threshold: u32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            increase_threshold: DEFAULT_INCREASE_THRESHOLD,
            override_threshold: DEFAULT_OVERRIDE_THRESHOLD,
            miss_reset_threshold: DEFAULT_MISS_RESET_THRESHOLD,
        }
    }
}

impl ProximityConfig {
    /// Check that the thresholds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a negative increase threshold, a zero
    /// miss threshold, or an override threshold outside the RSSI range.
    pub fn validate(&self) -> Result<()> {
        if self.increase_threshold < 0 {
            return Err(Error::Config(format!(
                "increase_threshold must not be negative (got {})",
                self.increase_threshold
            )));
        }
        if self.miss_reset_threshold == 0 {
            return Err(Error::Config("miss_reset_threshold must be at least 1".into()));
        }
        validate_rssi(i64::from(self.override_threshold))?;
        Ok(())
    }
}

/// Evaluator memory between cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProximityHistory {
    /// Last accepted RSSI, `None` when there is no baseline.
    pub previous_rssi: Option<i16>,
    /// Consecutive cycles without a sighting.
    pub missed: u32,
}

/// Stateful RSSI classifier.
///
/// # Examples
///
/// ```
/// use petdoor_engine::proximity::{ProximityConfig, ProximityEvaluator, ProximityTrend};
///
/// let mut evaluator = ProximityEvaluator::new(ProximityConfig {
///     increase_threshold: 5,
///     override_threshold: -70,
///     miss_reset_threshold: 10,
/// });
///
/// assert_eq!(evaluator.evaluate(Some(-80)), None); // first sighting sets the baseline
/// assert_eq!(evaluator.evaluate(Some(-72)), Some(ProximityTrend::Approaching));
/// assert_eq!(evaluator.evaluate(Some(-65)), Some(ProximityTrend::InRange));
/// ```
#[derive(Debug, Clone)]
pub struct ProximityEvaluator {
    config: ProximityConfig,
    history: ProximityHistory,
}

impl ProximityEvaluator {
    pub fn new(config: ProximityConfig) -> Self {
        Self {
            config,
            history: ProximityHistory::default(),
        }
    }

    /// Current tuning.
    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    /// Current memory.
    pub fn history(&self) -> ProximityHistory {
        self.history
    }

    /// Replace the override threshold, keeping the baseline.
    pub fn set_override_threshold(&mut self, threshold: i16) {
        self.config.override_threshold = threshold;
    }

    /// Process one scan cycle.
    ///
    /// `rssi` is the latest sighting of the beacon during the cycle, or
    /// `None` if it was not seen. Returns the classification, or `None` when
    /// there was no sighting or no baseline to compare against. A reading
    /// outside the radio's RSSI range is treated as no sighting.
    pub fn evaluate(&mut self, rssi: Option<i16>) -> Option<ProximityTrend> {
        let rssi = match rssi.map(|r| validate_rssi(i64::from(r))) {
            Some(Ok(rssi)) => rssi,
            Some(Err(e)) => {
                debug!(error = %e, "discarding malformed sighting");
                self.record_miss();
                return None;
            }
            None => {
                self.record_miss();
                return None;
            }
        };

        let trend = self.classify(rssi);
        self.history.previous_rssi = Some(rssi);
        self.history.missed = 0;

        trace!(rssi, ?trend, "sighting classified");
        trend
    }

    fn classify(&self, rssi: i16) -> Option<ProximityTrend> {
        if rssi >= self.config.override_threshold {
            return Some(ProximityTrend::InRange);
        }

        let previous = self.history.previous_rssi?;
        let delta = i32::from(rssi) - i32::from(previous);

        let trend = if delta > i32::from(self.config.increase_threshold) {
            ProximityTrend::Approaching
        } else if delta < 0 {
            ProximityTrend::Receding
        } else {
            ProximityTrend::Steady
        };
        Some(trend)
    }

    fn record_miss(&mut self) {
        self.history.missed = self.history.missed.saturating_add(1);

        if self.history.missed > self.config.miss_reset_threshold
            && self.history.previous_rssi.take().is_some()
        {
            debug!(missed = self.history.missed, "beacon lost, baseline reset");
        }
    }
}

impl Default for ProximityEvaluator {
    fn default() -> Self {
        Self::new(ProximityConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn evaluator() -> ProximityEvaluator {
        ProximityEvaluator::new(ProximityConfig {
            increase_threshold: 5,
            override_threshold: -70,
            miss_reset_threshold: 10,
        })
    }

    fn with_baseline(previous: i16) -> ProximityEvaluator {
        let mut e = evaluator();
        e.history.previous_rssi = Some(previous);
        e
    }

    #[rstest]
    #[case(-65, ProximityTrend::InRange)]
    #[case(-70, ProximityTrend::InRange)]
    #[case(-72, ProximityTrend::Approaching)]
    #[case(-75, ProximityTrend::Steady)]
    #[case(-83, ProximityTrend::Receding)]
    #[case(-80, ProximityTrend::Steady)]
    fn test_classification_against_baseline(#[case] rssi: i16, #[case] expected: ProximityTrend) {
        let mut e = with_baseline(-80);
        assert_eq!(e.evaluate(Some(rssi)), Some(expected));
        assert_eq!(e.history().previous_rssi, Some(rssi));
    }

    #[test]
    fn test_in_range_without_baseline() {
        let mut e = evaluator();
        assert_eq!(e.evaluate(Some(-60)), Some(ProximityTrend::InRange));
    }

    #[test]
    fn test_first_weak_sighting_only_sets_baseline() {
        let mut e = evaluator();
        assert_eq!(e.evaluate(Some(-90)), None);
        assert_eq!(e.history().previous_rssi, Some(-90));
    }

    #[test]
    fn test_sighting_resets_miss_counter() {
        let mut e = with_baseline(-80);
        e.evaluate(None);
        e.evaluate(None);
        assert_eq!(e.history().missed, 2);

        e.evaluate(Some(-81));
        assert_eq!(e.history().missed, 0);
    }

    #[test]
    fn test_baseline_kept_at_threshold() {
        let mut e = with_baseline(-80);
        for _ in 0..10 {
            assert_eq!(e.evaluate(None), None);
        }
        assert_eq!(e.history().previous_rssi, Some(-80));
        assert_eq!(e.evaluate(Some(-72)), Some(ProximityTrend::Approaching));
    }

    #[test]
    fn test_baseline_reset_after_eleven_misses() {
        let mut e = with_baseline(-80);
        for _ in 0..11 {
            e.evaluate(None);
        }
        assert_eq!(e.history().previous_rssi, None);

        // Would be Approaching against -80, but there is no baseline now
        assert_eq!(e.evaluate(Some(-72)), None);
        assert_eq!(e.evaluate(Some(-66)), Some(ProximityTrend::InRange));
    }

    #[test]
    fn test_malformed_sighting_counts_as_miss() {
        let mut e = with_baseline(-80);
        assert_eq!(e.evaluate(Some(12)), None);
        assert_eq!(e.history().missed, 1);
        assert_eq!(e.history().previous_rssi, Some(-80));
    }

    #[test]
    fn test_threshold_change_applies_next_cycle() {
        let mut e = evaluator();
        assert_eq!(e.evaluate(Some(-72)), None);

        e.set_override_threshold(-73);
        assert_eq!(e.evaluate(Some(-72)), Some(ProximityTrend::InRange));
    }

    #[rstest]
    #[case(ProximityTrend::InRange, true)]
    #[case(ProximityTrend::Approaching, true)]
    #[case(ProximityTrend::Receding, false)]
    #[case(ProximityTrend::Steady, false)]
    fn test_should_open(#[case] trend: ProximityTrend, #[case] expected: bool) {
        assert_eq!(trend.should_open(), expected);
    }

    #[test]
    fn test_config_validation() {
        assert!(ProximityConfig::default().validate().is_ok());

        let bad = ProximityConfig {
            miss_reset_threshold: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let bad = ProximityConfig {
            override_threshold: 5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
