mod analyzer;
mod history;
mod insight;
mod simulator;
mod summary;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use analyzer::EmotionAnalyzer;
pub use history::History;
pub use insight::{Insight, Intensity};
pub use simulator::{classify, SignalSimulator, CLASSIFICATION_THRESHOLD};
pub use summary::{
    summarize, Summary, CONFIDENCE_TIPS, EXPRESSIVENESS_TIPS, FEAR_TIPS, HIGH_FEAR_MEAN,
    HIGH_NEUTRAL_MEAN, LOW_CONFIDENCE_MEAN,
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmotionKind {
    Confidence,
    Fear,
    Neutral,
}

impl EmotionKind {
    /// Plotting and summary order.
    pub const ALL: [EmotionKind; 3] = [Self::Confidence, Self::Fear, Self::Neutral];

    pub fn label(self) -> &'static str {
        match self {
            Self::Confidence => "Confidence",
            Self::Fear => "Fear",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for EmotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One timestamped emotion sample. Scores are always within `[0, 1]`.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct Reading {
    kind: EmotionKind,
    score: f64,
    observed_at_ms: u64,
}

impl Reading {
    /// Scores outside `[0, 1]` are clamped; non-finite scores become 0.
    pub fn new(kind: EmotionKind, score: f64, observed_at_ms: u64) -> Self {
        Self {
            kind,
            score: clamp_unit(score),
            observed_at_ms,
        }
    }

    /// Reading shown before any session has produced data.
    pub fn initial(observed_at_ms: u64) -> Self {
        Self::new(EmotionKind::Neutral, 1.0, observed_at_ms)
    }

    pub fn kind(&self) -> EmotionKind {
        self.kind
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn observed_at_ms(&self) -> u64 {
        self.observed_at_ms
    }

    pub fn intensity(&self) -> Intensity {
        Intensity::from_score(self.score)
    }

    pub fn insight(&self) -> Insight {
        Insight::for_reading(self)
    }

    /// Score this reading contributes to the `kind` series: its own score when the
    /// kinds match, zero otherwise.
    pub fn score_for(&self, kind: EmotionKind) -> f64 {
        if self.kind == kind {
            self.score
        } else {
            0.0
        }
    }
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_clamps_score() {
        assert_eq!(Reading::new(EmotionKind::Fear, 1.7, 0).score(), 1.0);
        assert_eq!(Reading::new(EmotionKind::Fear, -0.2, 0).score(), 0.0);
        assert_eq!(Reading::new(EmotionKind::Fear, f64::NAN, 0).score(), 0.0);
        assert_eq!(Reading::new(EmotionKind::Fear, 0.42, 0).score(), 0.42);
    }

    #[test]
    fn initial_reading_is_fully_neutral() {
        let r = Reading::initial(1234);
        assert_eq!(r.kind(), EmotionKind::Neutral);
        assert_eq!(r.score(), 1.0);
        assert_eq!(r.observed_at_ms(), 1234);
    }

    #[test]
    fn score_for_pads_other_kinds_with_zero() {
        let r = Reading::new(EmotionKind::Confidence, 0.8, 10);
        assert_eq!(r.score_for(EmotionKind::Confidence), 0.8);
        assert_eq!(r.score_for(EmotionKind::Fear), 0.0);
        assert_eq!(r.score_for(EmotionKind::Neutral), 0.0);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&EmotionKind::Confidence).expect("serialize");
        assert_eq!(json, "\"confidence\"");
    }
}
