use crate::emotion::{EmotionKind, Reading};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Intensity {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Intensity {
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            Self::VeryHigh
        } else if score > 0.6 {
            Self::High
        } else if score > 0.4 {
            Self::Moderate
        } else if score > 0.2 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Short interpretation of the current reading.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Insight {
    pub title: &'static str,
    pub description: &'static str,
}

impl Insight {
    pub fn for_reading(reading: &Reading) -> Self {
        let score = reading.score();
        match reading.kind() {
            EmotionKind::Confidence if score > 0.7 => Self {
                title: "High confidence",
                description: "Your delivery sounds assured and decisive, which suits leading a discussion or making a case.",
            },
            EmotionKind::Confidence if score > 0.4 => Self {
                title: "Moderate confidence",
                description: "You sound clear and reasonably sure of what you are saying.",
            },
            EmotionKind::Fear if score > 0.7 => Self {
                title: "High anxiety",
                description: "Your voice carries noticeable tension. A short pause and a slow breath can help you reset.",
            },
            EmotionKind::Fear if score > 0.4 => Self {
                title: "Moderate anxiety",
                description: "There are some signs of nervousness, which is normal in many speaking situations.",
            },
            _ => Self {
                title: "Neutral tone",
                description: "Your voice is fairly even in emotional tone, which fits most everyday contexts.",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_bands_use_strict_lower_bounds() {
        assert_eq!(Intensity::from_score(0.81), Intensity::VeryHigh);
        assert_eq!(Intensity::from_score(0.8), Intensity::High);
        assert_eq!(Intensity::from_score(0.6), Intensity::Moderate);
        assert_eq!(Intensity::from_score(0.41), Intensity::Moderate);
        assert_eq!(Intensity::from_score(0.4), Intensity::Low);
        assert_eq!(Intensity::from_score(0.2), Intensity::VeryLow);
        assert_eq!(Intensity::from_score(0.0), Intensity::VeryLow);
        assert_eq!(Intensity::VeryHigh.to_string(), "Very High");
    }

    #[test]
    fn insight_follows_kind_and_score() {
        let at = |kind, score| Insight::for_reading(&Reading::new(kind, score, 0)).title;

        assert_eq!(at(EmotionKind::Confidence, 0.9), "High confidence");
        assert_eq!(at(EmotionKind::Confidence, 0.65), "Moderate confidence");
        assert_eq!(at(EmotionKind::Fear, 0.75), "High anxiety");
        assert_eq!(at(EmotionKind::Fear, 0.5), "Moderate anxiety");
        assert_eq!(at(EmotionKind::Fear, 0.3), "Neutral tone");
        assert_eq!(at(EmotionKind::Neutral, 0.95), "Neutral tone");
    }
}
