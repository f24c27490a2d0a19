use crate::audio::AudioSource;
use crate::config::TickInterval;
use crate::emotion::{EmotionAnalyzer, History, Reading, Summary};
use crate::session::{Clock, EmotionSession, SessionSnapshot};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const LOG_TARGET: &str = "session::driver";
const COMMAND_CAPACITY: usize = 8;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("session driver has shut down")]
    Closed,
    #[error("session driver task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

enum Command {
    Start(oneshot::Sender<bool>),
    Stop(oneshot::Sender<Option<Summary>>),
    ClearHistory(oneshot::Sender<()>),
    ResetSummary(oneshot::Sender<()>),
    Shutdown,
}

/// Owns a session on a single task: the interval and incoming commands are the
/// only things that touch it, one at a time.
pub struct SessionDriver<A, C, S> {
    session: EmotionSession<A, C>,
    source: S,
    tick: TickInterval,
}

impl<A, C, S> SessionDriver<A, C, S>
where
    A: EmotionAnalyzer + 'static,
    C: Clock + 'static,
    S: AudioSource + 'static,
{
    pub fn new(session: EmotionSession<A, C>, source: S, tick: TickInterval) -> Self {
        Self {
            session,
            source,
            tick,
        }
    }

    pub fn spawn(self) -> SessionHandle {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (snapshots_tx, snapshots_rx) = watch::channel(self.session.snapshot());
        let task = tokio::spawn(self.run(commands_rx, snapshots_tx));
        SessionHandle {
            commands: commands_tx,
            snapshots: snapshots_rx,
            task,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        snapshots: watch::Sender<SessionSnapshot>,
    ) {
        let period = self.tick.duration();
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::debug!(target: LOG_TARGET, tick_ms = self.tick.ms(), "driver running");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Start(reply)) => {
                        let started = self.session.start();
                        if started {
                            // First tick lands one full period after start.
                            ticker.reset();
                        }
                        self.publish(&snapshots);
                        let _ = reply.send(started);
                    }
                    Some(Command::Stop(reply)) => {
                        let summary = self.session.stop().cloned();
                        self.publish(&snapshots);
                        let _ = reply.send(summary);
                    }
                    Some(Command::ClearHistory(reply)) => {
                        self.session.clear_history();
                        self.publish(&snapshots);
                        let _ = reply.send(());
                    }
                    Some(Command::ResetSummary(reply)) => {
                        self.session.reset_summary();
                        self.publish(&snapshots);
                        let _ = reply.send(());
                    }
                    Some(Command::Shutdown) | None => break,
                },
                _ = ticker.tick(), if self.session.is_active() => {
                    self.on_tick();
                    self.publish(&snapshots);
                }
            }
        }

        tracing::debug!(target: LOG_TARGET, "driver stopped");
    }

    fn on_tick(&mut self) {
        match self.source.next_frame() {
            Ok(frame) => {
                self.session.tick(&frame);
            }
            Err(e) => {
                tracing::warn!(target: LOG_TARGET, error = %e, "no audio frame, skipping tick");
            }
        }
    }

    fn publish(&self, snapshots: &watch::Sender<SessionSnapshot>) {
        let snapshot = self.session.snapshot();
        snapshots.send_modify(|current| *current = snapshot);
    }
}

/// Client side of a spawned [`SessionDriver`].
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Returns `false` if a session was already running.
    pub async fn start(&self) -> Result<bool, SessionError> {
        self.request(Command::Start).await
    }

    /// Stops ticking and returns the summary of the recorded history, if any.
    pub async fn stop(&self) -> Result<Option<Summary>, SessionError> {
        self.request(Command::Stop).await
    }

    pub async fn clear_history(&self) -> Result<(), SessionError> {
        self.request(Command::ClearHistory).await
    }

    pub async fn reset_summary(&self) -> Result<(), SessionError> {
        self.request(Command::ResetSummary).await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified after every tick and command.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    pub fn is_active(&self) -> bool {
        self.snapshots.borrow().is_active()
    }

    pub fn current_reading(&self) -> Reading {
        self.snapshots.borrow().current
    }

    pub fn history(&self) -> History {
        self.snapshots.borrow().history.clone()
    }

    pub fn summary(&self) -> Option<Summary> {
        self.snapshots.borrow().summary.clone()
    }

    pub async fn shutdown(self) -> Result<(), SessionError> {
        // The task may already be gone; joining reports how it ended.
        let _ = self.commands.send(Command::Shutdown).await;
        self.task.await?;
        Ok(())
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| SessionError::Closed)
    }
}
