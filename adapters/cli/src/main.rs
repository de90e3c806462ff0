#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Collapse Arena run.
//!
//! The runner builds a world from an optional TOML configuration, feeds it
//! autopilot input at a fixed frame rate until the run ends or the tick limit
//! is reached, and prints a summary of what happened.

mod autopilot;
mod summary;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use collapse_arena_core::{
    ArenaConfig, AudioSink, Command, PlayerClass, SinkError, SoundCue, WELCOME_BANNER,
};
use collapse_arena_world::{apply, query, World};
use tracing::{info, trace};
use tracing_subscriber::EnvFilter;

use autopilot::Autopilot;
use summary::RunSummary;

/// Command-line options of the headless runner.
#[derive(Debug, Parser)]
#[command(name = "collapse-arena", version, about = "Plays a headless Collapse Arena run")]
struct CliArgs {
    /// Seed overriding the configured run seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Player class.
    #[arg(long, value_enum, default_value_t = ClassArg::Striker)]
    class: ClassArg,
    /// TOML file with configuration overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 108_000)]
    ticks: u64,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Player classes selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ClassArg {
    /// Crit-focused class with the overclock special.
    Striker,
    /// Execution class with the purge special.
    Reaper,
    /// Support class with the turret special.
    Engineer,
}

impl From<ClassArg> for PlayerClass {
    fn from(value: ClassArg) -> Self {
        match value {
            ClassArg::Striker => Self::Striker,
            ClassArg::Reaper => Self::Reaper,
            ClassArg::Engineer => Self::Engineer,
        }
    }
}

/// Audio sink that records requested cues in the trace log.
#[derive(Debug, Default)]
struct TraceAudio;

impl AudioSink for TraceAudio {
    fn play(&mut self, cue: SoundCue) -> Result<(), SinkError> {
        trace!(?cue, "sound cue");
        Ok(())
    }
}

/// Entry point for the Collapse Arena command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args.log_level)?;

    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let dt = frame_duration(args.fps)?;

    println!("{WELCOME_BANNER}");
    let mut world = World::new(config, args.class.into(), Box::new(TraceAudio))
        .context("invalid run configuration")?;

    let autopilot = Autopilot;
    let mut summary = RunSummary::default();
    let mut events = Vec::new();
    for _ in 0..args.ticks {
        let input = autopilot.sample(&world);
        events.clear();
        apply(&mut world, Command::Tick { dt, input }, &mut events);
        summary.record(&events);
        if query::is_finished(&world) {
            break;
        }
    }

    if !query::is_finished(&world) {
        info!(ticks = args.ticks, "tick limit reached");
        events.clear();
        apply(&mut world, Command::AbandonRun, &mut events);
        summary.record(&events);
    }

    info!(outcome = ?summary.outcome(), tick = query::tick_index(&world), "run complete");
    println!("{summary}");
    println!("simulated time:   {:.1}s", query::elapsed(&world).as_secs_f32());
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log filter `{level}`"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|error| anyhow!("failed to install log subscriber: {error}"))
}

fn load_config(path: Option<&Path>) -> Result<ArenaConfig> {
    let Some(path) = path else {
        return Ok(ArenaConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("failed to parse config file {}", path.display()))
}

fn parse_config(contents: &str) -> Result<ArenaConfig> {
    let config: ArenaConfig = toml::from_str(contents)?;
    Ok(config)
}

fn frame_duration(fps: u32) -> Result<Duration> {
    if fps == 0 {
        bail!("--fps must be at least 1");
    }
    Ok(Duration::from_secs_f64(1.0 / f64::from(fps)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use collapse_arena_core::{BossKind, EnemyKind};

    #[test]
    fn parses_every_flag() {
        let args = CliArgs::try_parse_from([
            "collapse-arena",
            "--seed",
            "42",
            "--class",
            "engineer",
            "--ticks",
            "600",
            "--fps",
            "30",
            "--log-level",
            "debug",
        ])
        .expect("valid flags");

        assert_eq!(args.seed, Some(42));
        assert_eq!(PlayerClass::from(args.class), PlayerClass::Engineer);
        assert_eq!(args.ticks, 600);
        assert_eq!(args.fps, 30);
        assert_eq!(args.log_level, "debug");
        assert!(args.config.is_none());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
            seed = 99
            wave_layers_per_zone = 1

            [[zones]]
            enemy_pool = ["Crawler", "Bomber"]
            boss = "Firewall"

            [collapse]
            grace_secs = 10.0
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.seed, 99);
        assert_eq!(config.total_layers(), 2);
        assert_eq!(config.zones[0].enemy_pool, vec![EnemyKind::Crawler, EnemyKind::Bomber]);
        assert_eq!(config.zones[0].boss, BossKind::Firewall);
        assert_eq!(config.width, ArenaConfig::default().width);
        assert_eq!(config.waves, ArenaConfig::default().waves);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(parse_config("seed = \"soon\"").is_err());
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(frame_duration(0).is_err());
        assert_eq!(frame_duration(50).expect("positive fps"), Duration::from_millis(20));
    }
}
