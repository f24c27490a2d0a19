use crate::emotion::{EmotionKind, Reading};
use crate::util::RingBuffer;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Bounded, chronological record of readings.
///
/// Readings are stored once, tagged with their kind. The per-kind series used
/// for plotting and averaging are derived on demand: every stored reading
/// contributes one entry to each series, carrying its own score in the series
/// of its kind and a zero score in the other two. All three series therefore
/// always have the same length and the same eviction horizon.
#[derive(Clone, Debug)]
pub struct History {
    readings: RingBuffer<Reading>,
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            readings: RingBuffer::new(capacity),
        }
    }

    /// Appends a reading. Once the history is full the oldest reading is
    /// dropped from every series and returned.
    pub fn record(&mut self, reading: Reading) -> Option<Reading> {
        self.readings.push(reading)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.readings.capacity()
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.readings.latest()
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }

    /// Stored readings, oldest first.
    pub fn readings(&self) -> impl Iterator<Item = &Reading> + '_ {
        self.readings.iter()
    }

    /// Zero-padded series for `kind`, oldest first.
    pub fn series(&self, kind: EmotionKind) -> impl Iterator<Item = Reading> + '_ {
        self.readings
            .iter()
            .map(move |r| Reading::new(kind, r.score_for(kind), r.observed_at_ms()))
    }

    pub fn scores(&self, kind: EmotionKind) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(move |r| r.score_for(kind))
    }

    /// Arithmetic mean of the zero-padded `kind` series, `None` when empty.
    pub fn mean(&self, kind: EmotionKind) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let total: f64 = self.scores(kind).sum();
        Some(total / self.len() as f64)
    }
}

/// Serialized in the chart shape: one padded array per kind.
impl Serialize for History {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("History", 3)?;
        state.serialize_field(
            "confidence",
            &self.series(EmotionKind::Confidence).collect::<Vec<_>>(),
        )?;
        state.serialize_field("fear", &self.series(EmotionKind::Fear).collect::<Vec<_>>())?;
        state.serialize_field(
            "neutral",
            &self.series(EmotionKind::Neutral).collect::<Vec<_>>(),
        )?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(kind: EmotionKind, score: f64, at: u64) -> Reading {
        Reading::new(kind, score, at)
    }

    #[test]
    fn series_lengths_track_ticks_up_to_capacity() {
        let mut history = History::with_capacity(100);
        for tick in 0..250u64 {
            let kind = EmotionKind::ALL[(tick % 3) as usize];
            history.record(reading(kind, 0.7, tick * 500));

            let expected = ((tick + 1) as usize).min(100);
            for kind in EmotionKind::ALL {
                assert_eq!(history.series(kind).count(), expected);
            }
        }
        assert_eq!(history.len(), 100);
    }

    #[test]
    fn padded_series_share_timestamps() {
        let mut history = History::with_capacity(4);
        history.record(reading(EmotionKind::Confidence, 0.9, 100));
        history.record(reading(EmotionKind::Fear, 0.7, 200));

        let confidence: Vec<_> = history.series(EmotionKind::Confidence).collect();
        let fear: Vec<_> = history.series(EmotionKind::Fear).collect();
        let neutral: Vec<_> = history.series(EmotionKind::Neutral).collect();

        assert_eq!(
            confidence.iter().map(Reading::score).collect::<Vec<_>>(),
            vec![0.9, 0.0]
        );
        assert_eq!(fear.iter().map(Reading::score).collect::<Vec<_>>(), vec![0.0, 0.7]);
        assert!(neutral.iter().all(|r| r.score() == 0.0));

        for series in [&confidence, &fear, &neutral] {
            assert_eq!(
                series.iter().map(Reading::observed_at_ms).collect::<Vec<_>>(),
                vec![100, 200]
            );
        }
        assert!(neutral.iter().all(|r| r.kind() == EmotionKind::Neutral));
    }

    #[test]
    fn record_hands_back_the_evicted_reading() {
        let mut history = History::with_capacity(2);
        assert_eq!(history.record(reading(EmotionKind::Fear, 0.9, 1)), None);
        assert_eq!(history.record(reading(EmotionKind::Neutral, 0.5, 2)), None);

        let evicted = history.record(reading(EmotionKind::Confidence, 0.7, 3));
        assert_eq!(evicted, Some(reading(EmotionKind::Fear, 0.9, 1)));
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.scores(EmotionKind::Fear).collect::<Vec<_>>(),
            vec![0.0, 0.0]
        );
    }

    #[test]
    fn oldest_readings_are_evicted_in_order() {
        let mut history = History::with_capacity(3);
        let evicted: Vec<_> = (1..=5u64)
            .filter_map(|at| history.record(reading(EmotionKind::Neutral, 0.5, at)))
            .map(|r| r.observed_at_ms())
            .collect();
        assert_eq!(evicted, vec![1, 2]);
        let stamps: Vec<_> = history.readings().map(Reading::observed_at_ms).collect();
        assert_eq!(stamps, vec![3, 4, 5]);
        assert_eq!(history.latest().map(Reading::observed_at_ms), Some(5));
    }

    #[test]
    fn mean_counts_padding_in_denominator() {
        let mut history = History::with_capacity(10);
        history.record(reading(EmotionKind::Fear, 0.8, 1));
        history.record(reading(EmotionKind::Neutral, 0.6, 2));

        assert_eq!(history.mean(EmotionKind::Fear), Some(0.4));
        assert_eq!(history.mean(EmotionKind::Neutral), Some(0.3));
        assert_eq!(history.mean(EmotionKind::Confidence), Some(0.0));
    }

    #[test]
    fn empty_history_has_no_mean() {
        let history = History::with_capacity(10);
        assert_eq!(history.mean(EmotionKind::Confidence), None);
    }

    #[test]
    fn clear_empties_every_series() {
        let mut history = History::with_capacity(10);
        history.record(reading(EmotionKind::Fear, 0.8, 1));
        history.clear();
        assert!(history.is_empty());
        for kind in EmotionKind::ALL {
            assert_eq!(history.series(kind).count(), 0);
        }
    }

    #[test]
    fn serializes_as_three_aligned_arrays() {
        let mut history = History::with_capacity(10);
        history.record(reading(EmotionKind::Confidence, 0.75, 500));

        let value = serde_json::to_value(&history).expect("serialize");
        for key in ["confidence", "fear", "neutral"] {
            let series = value[key].as_array().expect("array");
            assert_eq!(series.len(), 1);
            assert_eq!(series[0]["observed_at_ms"], 500);
        }
        assert_eq!(value["confidence"][0]["score"], 0.75);
        assert_eq!(value["fear"][0]["score"], 0.0);
        assert_eq!(value["fear"][0]["kind"], "fear");
    }
}
