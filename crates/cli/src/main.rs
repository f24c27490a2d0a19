#![deny(warnings)]

use anyhow::Context;
use aurarnyx_core::audio::NoiseSource;
use aurarnyx_core::config::{
    resolve_optional_u64, resolve_u64_with_default, Env, HistoryCapacity, SessionConfig,
    SimulatorSettings, StdEnv, TickInterval, DEFAULT_HISTORY_CAPACITY, DEFAULT_SESSION_SECS,
    DEFAULT_TICK_INTERVAL_MS, ENV_HISTORY_CAPACITY, ENV_SEED, ENV_TICK_INTERVAL_MS,
};
use aurarnyx_core::emotion::{EmotionKind, History, Reading, SignalSimulator, Summary};
use aurarnyx_core::session::{
    EmotionSession, SessionDriver, SessionHandle, SessionSnapshot, SystemClock,
};
use clap::{Parser, ValueEnum};
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "aurarnyx")]
#[command(about = "Simulated speech-emotion sessions: live readings, rolling history and summaries")]
struct Args {
    /// Milliseconds between readings [env: AURARNYX_TICK_MS]
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Readings kept in the rolling history [env: AURARNYX_HISTORY_CAPACITY]
    #[arg(long)]
    history_capacity: Option<u64>,

    /// Seed for a reproducible signal [env: AURARNYX_SEED]
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_SESSION_SECS)]
    session_secs: u64,

    #[arg(long, default_value_t = 1)]
    sessions: u32,

    /// Clear the history before each session instead of carrying it over
    #[arg(long)]
    fresh: bool,

    /// Print every reading as it arrives
    #[arg(long)]
    follow: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let env = StdEnv;
    let cfg = build_config(&args, &env)?;

    tracing::info!(
        tick_ms = cfg.tick.ms(),
        history_capacity = cfg.history.get(),
        seed = ?cfg.seed,
        ticks_per_session = cfg.tick.ticks_in(Duration::from_secs(args.session_secs)),
        "config loaded"
    );

    let handle = spawn_driver(&cfg);
    let follower = args
        .follow
        .then(|| tokio::spawn(follow(handle.subscribe(), args.format)));

    let result = run_sessions(&args, &handle).await;

    if let Some(follower) = follower {
        follower.abort();
    }
    handle.shutdown().await.context("session driver failed")?;
    result
}

async fn run_sessions(args: &Args, handle: &SessionHandle) -> anyhow::Result<()> {
    let session_length = Duration::from_secs(args.session_secs);

    for number in 1..=args.sessions {
        if args.fresh {
            handle.clear_history().await?;
        }
        handle.start().await?;
        tracing::info!(session = number, secs = args.session_secs, "recording");

        let interrupted = tokio::select! {
            _ = tokio::time::sleep(session_length) => false,
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for ctrl-c")?;
                true
            }
        };

        let summary = handle.stop().await?;
        report(number, summary.as_ref(), &handle.history(), args.format)?;

        if interrupted {
            tracing::info!(session = number, "interrupted");
            break;
        }
    }
    Ok(())
}

fn spawn_driver(cfg: &SessionConfig) -> SessionHandle {
    let (simulator, noise) = match cfg.seed {
        Some(seed) => (
            SignalSimulator::seeded(seed, cfg.simulator),
            NoiseSource::seeded(seed.wrapping_add(1)),
        ),
        None => (
            SignalSimulator::from_os_rng(cfg.simulator),
            NoiseSource::from_os_rng(),
        ),
    };
    let session = EmotionSession::new(simulator, SystemClock, cfg.history);
    SessionDriver::new(session, noise, cfg.tick).spawn()
}

async fn follow(mut updates: watch::Receiver<SessionSnapshot>, format: OutputFormat) {
    let mut last: Option<Reading> = None;
    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        if !snapshot.is_active() || last == Some(snapshot.current) {
            continue;
        }
        last = Some(snapshot.current);
        print_reading(&snapshot.current, format);
    }
}

fn print_reading(reading: &Reading, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!(
            "{:<10} {:>4.0}%  {:<9}  {}",
            reading.kind(),
            reading.score() * 100.0,
            reading.intensity(),
            reading.insight().title,
        ),
        OutputFormat::Json => match serde_json::to_string(reading) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode reading"),
        },
    }
}

fn report(
    number: u32,
    summary: Option<&Summary>,
    history: &History,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "session": number,
                "readings": history.len(),
                "summary": summary,
                "history": history,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&doc).context("failed to encode summary")?
            );
        }
        OutputFormat::Text => {
            let Some(summary) = summary else {
                println!("Session {number}: not enough data for a summary");
                return Ok(());
            };
            println!("Session {number}: {} readings", history.len());
            for (kind, percent) in EmotionKind::ALL.iter().zip(summary.percentages()) {
                println!("  {:<10} {percent:>3}%", kind.label());
            }
            if !summary.suggestions.is_empty() {
                println!("Suggestions:");
                for suggestion in &summary.suggestions {
                    println!("  - {suggestion}");
                }
            }
        }
    }
    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_config(args: &Args, env: &impl Env) -> anyhow::Result<SessionConfig> {
    let tick_ms =
        resolve_u64_with_default(args.tick_ms, ENV_TICK_INTERVAL_MS, env, DEFAULT_TICK_INTERVAL_MS)?;
    let capacity = resolve_u64_with_default(
        args.history_capacity,
        ENV_HISTORY_CAPACITY,
        env,
        DEFAULT_HISTORY_CAPACITY as u64,
    )?;
    let capacity = usize::try_from(capacity).context("history capacity does not fit in memory")?;

    Ok(SessionConfig {
        tick: TickInterval::new(tick_ms)?,
        history: HistoryCapacity::new(capacity)?,
        simulator: SimulatorSettings::default(),
        seed: resolve_optional_u64(args.seed, ENV_SEED, env)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurarnyx_core::config::MapEnv;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["aurarnyx"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("valid args")
    }

    #[test]
    fn defaults_without_flags_or_env() {
        let cfg = build_config(&args(&[]), &MapEnv::default()).expect("config");
        assert_eq!(cfg, SessionConfig::default());
    }

    #[test]
    fn env_fills_missing_flags() {
        let env = MapEnv::default()
            .with_var(ENV_TICK_INTERVAL_MS, "250")
            .with_var(ENV_SEED, "9");
        let cfg = build_config(&args(&["--history-capacity", "20"]), &env).expect("config");
        assert_eq!(cfg.tick.ms(), 250);
        assert_eq!(cfg.history.get(), 20);
        assert_eq!(cfg.seed, Some(9));
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(build_config(&args(&["--tick-ms", "0"]), &MapEnv::default()).is_err());
    }

    #[test]
    fn format_flag_parses() {
        assert_eq!(args(&["--format", "json"]).format, OutputFormat::Json);
        assert_eq!(args(&[]).format, OutputFormat::Text);
    }
}
