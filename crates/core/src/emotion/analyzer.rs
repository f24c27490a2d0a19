use crate::audio::AudioFrame;
use crate::emotion::Reading;

/// Turns one captured audio frame into a reading.
///
/// Implementations run synchronously on the session's tick and must not block.
pub trait EmotionAnalyzer: Send {
    fn analyze(&mut self, frame: &AudioFrame, now_ms: u64) -> Reading;
}

impl<A: EmotionAnalyzer + ?Sized> EmotionAnalyzer for Box<A> {
    fn analyze(&mut self, frame: &AudioFrame, now_ms: u64) -> Reading {
        (**self).analyze(frame, now_ms)
    }
}
