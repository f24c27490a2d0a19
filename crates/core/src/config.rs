use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
pub const DEFAULT_OSCILLATION_PERIOD_MS: u64 = 10_000;
pub const DEFAULT_JITTER_SPAN: f64 = 0.15;
pub const DEFAULT_SESSION_SECS: u64 = 10;
pub const ENV_TICK_INTERVAL_MS: &str = "AURARNYX_TICK_MS";
pub const ENV_HISTORY_CAPACITY: &str = "AURARNYX_HISTORY_CAPACITY";
pub const ENV_SEED: &str = "AURARNYX_SEED";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u64", into = "u64")]
pub struct TickInterval {
    ms: u64,
}

impl TickInterval {
    pub fn new(ms: u64) -> Result<Self, ConfigError> {
        if ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(Self { ms })
    }

    pub fn ms(&self) -> u64 {
        self.ms
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.ms)
    }

    /// Number of whole ticks that fit into `span`.
    pub fn ticks_in(&self, span: Duration) -> u64 {
        let span_ms = u64::try_from(span.as_millis()).unwrap_or(u64::MAX);
        span_ms / self.ms
    }
}

impl TryFrom<u64> for TickInterval {
    type Error = ConfigError;

    fn try_from(ms: u64) -> Result<Self, Self::Error> {
        Self::new(ms)
    }
}

impl From<TickInterval> for u64 {
    fn from(tick: TickInterval) -> Self {
        tick.ms
    }
}

impl Default for TickInterval {
    fn default() -> Self {
        Self {
            ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "usize", into = "usize")]
pub struct HistoryCapacity(usize);

impl HistoryCapacity {
    pub fn new(readings: usize) -> Result<Self, ConfigError> {
        if readings == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        Ok(Self(readings))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for HistoryCapacity {
    type Error = ConfigError;

    fn try_from(readings: usize) -> Result<Self, Self::Error> {
        Self::new(readings)
    }
}

impl From<HistoryCapacity> for usize {
    fn from(capacity: HistoryCapacity) -> Self {
        capacity.0
    }
}

impl Default for HistoryCapacity {
    fn default() -> Self {
        Self(DEFAULT_HISTORY_CAPACITY)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawSimulatorSettings", into = "RawSimulatorSettings")]
pub struct SimulatorSettings {
    oscillation_period_ms: u64,
    jitter_span: f64,
}

impl SimulatorSettings {
    pub fn new(oscillation_period_ms: u64, jitter_span: f64) -> Result<Self, ConfigError> {
        if oscillation_period_ms == 0 {
            return Err(ConfigError::ZeroOscillationPeriod);
        }
        if !(0.0..=1.0).contains(&jitter_span) {
            return Err(ConfigError::JitterOutOfRange(jitter_span));
        }
        Ok(Self {
            oscillation_period_ms,
            jitter_span,
        })
    }

    pub fn oscillation_period_ms(&self) -> u64 {
        self.oscillation_period_ms
    }

    /// Total width of the uniform jitter window, centred on zero.
    pub fn jitter_span(&self) -> f64 {
        self.jitter_span
    }
}

/// Unchecked wire form of [`SimulatorSettings`].
#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawSimulatorSettings {
    oscillation_period_ms: u64,
    jitter_span: f64,
}

impl TryFrom<RawSimulatorSettings> for SimulatorSettings {
    type Error = ConfigError;

    fn try_from(raw: RawSimulatorSettings) -> Result<Self, Self::Error> {
        Self::new(raw.oscillation_period_ms, raw.jitter_span)
    }
}

impl From<SimulatorSettings> for RawSimulatorSettings {
    fn from(settings: SimulatorSettings) -> Self {
        Self {
            oscillation_period_ms: settings.oscillation_period_ms,
            jitter_span: settings.jitter_span,
        }
    }
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            oscillation_period_ms: DEFAULT_OSCILLATION_PERIOD_MS,
            jitter_span: DEFAULT_JITTER_SPAN,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    pub tick: TickInterval,
    pub history: HistoryCapacity,
    pub simulator: SimulatorSettings,
    /// Fixed seed for the signal and noise generators; OS entropy when absent.
    pub seed: Option<u64>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("tick interval must be > 0 ms")]
    ZeroTickInterval,
    #[error("history capacity must be > 0 readings")]
    ZeroHistoryCapacity,
    #[error("oscillation period must be > 0 ms")]
    ZeroOscillationPeriod,
    #[error("jitter span must be within [0, 1], got {0}")]
    JitterOutOfRange(f64),
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: String, value: String },
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// CLI value, else the environment, else `None`. Environment values must parse.
pub fn resolve_optional_u64(
    cli_value: Option<u64>,
    env_key: &str,
    env: &impl Env,
) -> Result<Option<u64>, ConfigError> {
    match cli_value {
        Some(v) => Ok(Some(v)),
        None => match env.var(env_key) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidNumber {
                    key: env_key.to_owned(),
                    value: raw,
                }),
            None => Ok(None),
        },
    }
}

pub fn resolve_u64_with_default(
    cli_value: Option<u64>,
    env_key: &str,
    env: &impl Env,
    default: u64,
) -> Result<u64, ConfigError> {
    Ok(resolve_optional_u64(cli_value, env_key, env)?.unwrap_or(default))
}
