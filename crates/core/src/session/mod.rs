//! Start/stop lifecycle around the simulator, history and summary.
//!
//! [`EmotionSession`] is the synchronous state machine; [`SessionDriver`]
//! puts one on a tokio task and ticks it on a fixed interval.

mod clock;
mod driver;

use crate::audio::AudioFrame;
use crate::config::HistoryCapacity;
use crate::emotion::{summarize, EmotionAnalyzer, History, Reading, Summary};
use serde::Serialize;

pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::{SessionDriver, SessionError, SessionHandle};

const LOG_TARGET: &str = "session";

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Idle,
    Active,
}

/// Read-only view handed to presentation code.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub current: Reading,
    pub history: History,
    pub summary: Option<Summary>,
}

impl SessionSnapshot {
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }
}

pub struct EmotionSession<A, C> {
    analyzer: A,
    clock: C,
    state: SessionState,
    current: Reading,
    history: History,
    summary: Option<Summary>,
}

impl<A, C> EmotionSession<A, C>
where
    A: EmotionAnalyzer,
    C: Clock,
{
    pub fn new(analyzer: A, clock: C, capacity: HistoryCapacity) -> Self {
        let current = Reading::initial(clock.now_ms());
        Self {
            analyzer,
            clock,
            state: SessionState::Idle,
            current,
            history: History::with_capacity(capacity.get()),
            summary: None,
        }
    }

    /// Idle -> active. Drops the previous summary but keeps the history.
    ///
    /// Returns `false` if the session was already active.
    pub fn start(&mut self) -> bool {
        if self.is_active() {
            tracing::debug!(target: LOG_TARGET, "start ignored: already active");
            return false;
        }
        self.state = SessionState::Active;
        self.summary = None;
        tracing::info!(
            target: LOG_TARGET,
            carried_readings = self.history.len(),
            "session started"
        );
        true
    }

    /// Active -> idle, materializing the summary from the current history.
    ///
    /// Returns `None` when the session was not active or nothing was recorded.
    pub fn stop(&mut self) -> Option<&Summary> {
        if !self.is_active() {
            tracing::debug!(target: LOG_TARGET, "stop ignored: not active");
            return None;
        }
        self.state = SessionState::Idle;
        self.summary = summarize(&self.history);

        match &self.summary {
            Some(summary) => tracing::info!(
                target: LOG_TARGET,
                readings = self.history.len(),
                mean_confidence = summary.mean_confidence,
                mean_fear = summary.mean_fear,
                mean_neutral = summary.mean_neutral,
                suggestions = summary.suggestions.len(),
                "session stopped"
            ),
            None => tracing::info!(target: LOG_TARGET, "session stopped without readings"),
        }
        self.summary.as_ref()
    }

    /// Analyzes one frame and records the result. Ignored while idle.
    pub fn tick(&mut self, frame: &AudioFrame) -> Option<Reading> {
        if !self.is_active() {
            return None;
        }
        let reading = self.analyzer.analyze(frame, self.clock.now_ms());
        self.current = reading;
        if let Some(evicted) = self.history.record(reading) {
            tracing::trace!(
                target: LOG_TARGET,
                evicted_at_ms = evicted.observed_at_ms(),
                "history full, dropped oldest reading"
            );
        }
        tracing::debug!(
            target: LOG_TARGET,
            kind = %reading.kind(),
            score = reading.score(),
            readings = self.history.len(),
            "tick"
        );
        Some(reading)
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_reading(&self) -> &Reading {
        &self.current
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn reset_summary(&mut self) {
        self.summary = None;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            current: self.current,
            history: self.history.clone(),
            summary: self.summary.clone(),
        }
    }
}
