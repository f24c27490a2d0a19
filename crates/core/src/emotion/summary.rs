use crate::emotion::{EmotionKind, History};
use serde::Serialize;

pub const LOW_CONFIDENCE_MEAN: f64 = 0.4;
pub const HIGH_FEAR_MEAN: f64 = 0.4;
pub const HIGH_NEUTRAL_MEAN: f64 = 0.6;

pub const CONFIDENCE_TIPS: [&str; 3] = [
    "Slow down slightly and land each sentence with a firm, falling tone.",
    "Rehearse your opening lines out loud until they come without hesitation.",
    "Stand or sit upright and breathe from the diaphragm before you speak.",
];

pub const FEAR_TIPS: [&str; 3] = [
    "Take two slow breaths before answering, exhaling longer than you inhale.",
    "Pause briefly instead of filling silence; short pauses read as composure.",
    "Focus on one friendly listener and speak to them as in a normal conversation.",
];

pub const EXPRESSIVENESS_TIPS: [&str; 3] = [
    "Vary your pitch to mark the points you want the listener to remember.",
    "Let your pace change with the content: quicker for stories, slower for key facts.",
    "Lean into emphasis words so your enthusiasm is audible, not just implied.",
];

/// Aggregate of one session's history.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Summary {
    pub mean_confidence: f64,
    pub mean_fear: f64,
    pub mean_neutral: f64,
    pub suggestions: Vec<String>,
}

impl Summary {
    pub fn mean(&self, kind: EmotionKind) -> f64 {
        match kind {
            EmotionKind::Confidence => self.mean_confidence,
            EmotionKind::Fear => self.mean_fear,
            EmotionKind::Neutral => self.mean_neutral,
        }
    }

    /// Means as whole percents, in `EmotionKind::ALL` order.
    pub fn percentages(&self) -> [u8; 3] {
        EmotionKind::ALL.map(|kind| (self.mean(kind) * 100.0).round().clamp(0.0, 100.0) as u8)
    }
}

/// Reduces a history to its summary. An empty history has no summary.
pub fn summarize(history: &History) -> Option<Summary> {
    let mean_confidence = history.mean(EmotionKind::Confidence)?;
    let mean_fear = history.mean(EmotionKind::Fear)?;
    let mean_neutral = history.mean(EmotionKind::Neutral)?;

    let mut suggestions = Vec::new();
    if mean_confidence < LOW_CONFIDENCE_MEAN {
        suggestions.extend(CONFIDENCE_TIPS.iter().map(|tip| tip.to_string()));
    }
    if mean_fear > HIGH_FEAR_MEAN {
        suggestions.extend(FEAR_TIPS.iter().map(|tip| tip.to_string()));
    }
    if mean_neutral > HIGH_NEUTRAL_MEAN {
        suggestions.extend(EXPRESSIVENESS_TIPS.iter().map(|tip| tip.to_string()));
    }

    Some(Summary {
        mean_confidence,
        mean_fear,
        mean_neutral,
        suggestions,
    })
}
