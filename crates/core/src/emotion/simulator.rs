//! Synthetic emotion signal.
//!
//! Stands in for a real speech-emotion model: confidence and fear follow two
//! slow oscillations over wall-clock time, each nudged by uniform jitter and
//! clamped to `[0, 1]`. The audio frame handed to [`EmotionAnalyzer::analyze`]
//! is accepted but not inspected.

use crate::audio::AudioFrame;
use crate::config::SimulatorSettings;
use crate::emotion::{clamp_unit, EmotionAnalyzer, EmotionKind, Reading};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// A level must exceed this (strictly) to be classified as its own emotion.
pub const CLASSIFICATION_THRESHOLD: f64 = 0.6;

const FEAR_FREQUENCY_RATIO: f64 = 1.3;
const LOG_TARGET: &str = "emotion::simulator";

#[derive(Clone, Debug)]
pub struct SignalSimulator<R> {
    rng: R,
    settings: SimulatorSettings,
}

impl<R: Rng> SignalSimulator<R> {
    pub fn new(rng: R, settings: SimulatorSettings) -> Self {
        Self { rng, settings }
    }

    pub fn settings(&self) -> &SimulatorSettings {
        &self.settings
    }

    /// Produces one reading for `now_ms`, drawing fresh jitter for both levels.
    pub fn sample(&mut self, now_ms: u64) -> Reading {
        let confidence_offset = self.draw_offset();
        let fear_offset = self.draw_offset();
        let reading = self.sample_with_offsets(now_ms, confidence_offset, fear_offset);
        tracing::trace!(
            target: LOG_TARGET,
            now_ms,
            confidence_offset,
            fear_offset,
            kind = %reading.kind(),
            score = reading.score(),
            "sampled"
        );
        reading
    }

    /// Deterministic core of [`Self::sample`]: the jitter offsets are supplied by the caller.
    pub fn sample_with_offsets(
        &self,
        now_ms: u64,
        confidence_offset: f64,
        fear_offset: f64,
    ) -> Reading {
        let (confidence, fear) = self.raw_levels(now_ms);
        classify(
            clamp_unit(confidence + confidence_offset),
            clamp_unit(fear + fear_offset),
            now_ms,
        )
    }

    /// Pre-jitter `(confidence, fear)` levels at `now_ms`, both in `[0, 1]`.
    pub fn raw_levels(&self, now_ms: u64) -> (f64, f64) {
        let time_factor = now_ms as f64 / self.settings.oscillation_period_ms() as f64;
        let confidence = ((time_factor * PI).sin() + 1.0) / 2.0;
        let fear = ((time_factor * PI * FEAR_FREQUENCY_RATIO).cos() + 1.0) / 2.0;
        (confidence, fear)
    }

    fn draw_offset(&mut self) -> f64 {
        let span = self.settings.jitter_span();
        self.rng.random::<f64>() * span - span / 2.0
    }
}

impl SignalSimulator<StdRng> {
    pub fn seeded(seed: u64, settings: SimulatorSettings) -> Self {
        Self::new(StdRng::seed_from_u64(seed), settings)
    }

    pub fn from_os_rng(settings: SimulatorSettings) -> Self {
        Self::new(StdRng::from_os_rng(), settings)
    }
}

impl<R: Rng + Send> EmotionAnalyzer for SignalSimulator<R> {
    fn analyze(&mut self, _frame: &AudioFrame, now_ms: u64) -> Reading {
        self.sample(now_ms)
    }
}

/// First match wins: confidence, then fear, otherwise neutral scored by how far
/// the stronger of the two levels sits below full scale.
pub fn classify(confidence: f64, fear: f64, now_ms: u64) -> Reading {
    if confidence > CLASSIFICATION_THRESHOLD {
        Reading::new(EmotionKind::Confidence, confidence, now_ms)
    } else if fear > CLASSIFICATION_THRESHOLD {
        Reading::new(EmotionKind::Fear, fear, now_ms)
    } else {
        Reading::new(EmotionKind::Neutral, 1.0 - confidence.max(fear), now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_OSCILLATION_PERIOD_MS;

    const EPS: f64 = 1e-9;

    fn simulator() -> SignalSimulator<StdRng> {
        SignalSimulator::seeded(7, SimulatorSettings::default())
    }

    #[test]
    fn scores_stay_in_unit_range_over_a_full_cycle() {
        let mut sim = simulator();
        for step in 0..2_000u64 {
            let now = 1_700_000_000_000 + step * 37;
            let r = sim.sample(now);
            assert!((0.0..=1.0).contains(&r.score()), "score {} at {now}", r.score());
            assert_eq!(r.observed_at_ms(), now);
        }
    }

    #[test]
    fn extreme_jitter_is_clamped() {
        let sim = simulator();

        // Confidence peaks at a quarter period.
        let r = sim.sample_with_offsets(5_000, 0.075, 0.075);
        assert_eq!(r.kind(), EmotionKind::Confidence);
        assert_eq!(r.score(), 1.0);

        // Confidence bottoms out at three quarters while fear is near its peak.
        let r = sim.sample_with_offsets(15_000, -0.075, 0.075);
        assert_eq!(r.kind(), EmotionKind::Fear);
        assert_eq!(r.score(), 1.0);
    }

    #[test]
    fn low_levels_fall_through_to_neutral() {
        let sim = simulator();
        let (confidence, fear) = sim.raw_levels(10_000);
        assert!((confidence - 0.5).abs() < EPS);
        assert!(fear < confidence);

        let r = sim.sample_with_offsets(10_000, 0.0, 0.0);
        assert_eq!(r.kind(), EmotionKind::Neutral);
        assert!((r.score() - (1.0 - confidence)).abs() < EPS);

        let r = sim.sample_with_offsets(10_000, 0.075, 0.0);
        assert_eq!(r.kind(), EmotionKind::Neutral);
        assert!((r.score() - 0.425).abs() < EPS);
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let r = classify(0.6, 0.3, 0);
        assert_eq!(r.kind(), EmotionKind::Neutral);
        assert!((r.score() - 0.4).abs() < EPS);

        let r = classify(0.6, 0.61, 0);
        assert_eq!(r.kind(), EmotionKind::Fear);
        assert_eq!(r.score(), 0.61);

        let r = classify(0.2, 0.6, 0);
        assert_eq!(r.kind(), EmotionKind::Neutral);
        assert!((r.score() - 0.4).abs() < EPS);

        let r = classify(0.61, 0.9, 0);
        assert_eq!(r.kind(), EmotionKind::Confidence);
    }

    #[test]
    fn same_seed_same_signal() {
        let mut a = simulator();
        let mut b = simulator();
        for now in (0..5_000u64).step_by(500) {
            assert_eq!(a.sample(now), b.sample(now));
        }
    }

    #[test]
    fn jitter_respects_configured_span() {
        let settings = SimulatorSettings::new(DEFAULT_OSCILLATION_PERIOD_MS, 0.0).expect("valid");
        let mut sim = SignalSimulator::seeded(99, settings);
        let expected = sim.sample_with_offsets(2_500, 0.0, 0.0);
        assert_eq!(sim.sample(2_500), expected);
    }

    #[test]
    fn analyzer_ignores_frame_contents() {
        let mut a = simulator();
        let mut b = simulator();
        let loud = AudioFrame::new(vec![1.0; 16]);
        let silent = AudioFrame::silent(16);
        assert_eq!(a.analyze(&loud, 42), b.analyze(&silent, 42));
    }
}
