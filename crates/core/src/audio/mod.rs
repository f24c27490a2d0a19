//! Audio frames handed to the analyzer on every tick.
//!
//! Capture itself (device selection, permissions) lives outside this crate; a
//! source only has to produce the next frame when asked.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FRAME_LEN: usize = 1024;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioFrame {
    pub samples: Vec<f32>,
}

impl AudioFrame {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    pub fn silent(len: usize) -> Self {
        Self {
            samples: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio input unavailable: {details}")]
    Unavailable { details: String },
}

pub trait AudioSource: Send {
    fn next_frame(&mut self) -> Result<AudioFrame, AudioError>;
}

impl<S: AudioSource + ?Sized> AudioSource for Box<S> {
    fn next_frame(&mut self) -> Result<AudioFrame, AudioError> {
        (**self).next_frame()
    }
}

/// Demo-mode input: uniform noise in `[-1, 1)`.
#[derive(Clone, Debug)]
pub struct NoiseSource<R> {
    rng: R,
    frame_len: usize,
}

impl<R: Rng> NoiseSource<R> {
    pub fn new(rng: R, frame_len: usize) -> Self {
        Self { rng, frame_len }
    }
}

impl NoiseSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed), DEFAULT_FRAME_LEN)
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng(), DEFAULT_FRAME_LEN)
    }
}

impl<R: Rng + Send> AudioSource for NoiseSource<R> {
    fn next_frame(&mut self) -> Result<AudioFrame, AudioError> {
        let samples = (0..self.frame_len)
            .map(|_| self.rng.random_range(-1.0f32..1.0))
            .collect();
        Ok(AudioFrame { samples })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SilenceSource {
    frame_len: usize,
}

impl SilenceSource {
    pub fn new(frame_len: usize) -> Self {
        Self { frame_len }
    }
}

impl Default for SilenceSource {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_LEN)
    }
}

impl AudioSource for SilenceSource {
    fn next_frame(&mut self) -> Result<AudioFrame, AudioError> {
        Ok(AudioFrame::silent(self.frame_len))
    }
}
