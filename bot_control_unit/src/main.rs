//! # Robot Control Unit
//!
//! Runs the periodic control core against a scripted scenario. Without
//! `--scenario` the robot idles disabled until interrupted, which is useful
//! for checking a configuration file.
//!
//! Scenario runs use a synthetic clock (one cycle period per tick) unless
//! `--realtime` is given, in which case ticks are paced and stamped with the
//! wall clock.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bot_common::config::LogLevel;
use bot_common::consts::DEFAULT_CONFIG_PATH;
use bot_common::control_unit::config::ControlUnitConfig;
use bot_control_unit::config::{load_config, log_summary};
use bot_control_unit::cycle::CycleRunner;
use bot_control_unit::io::{
    IdleInputs, InputSource, MonotonicClock, SimClock, SystemClock, TracingDashboard,
};
use bot_control_unit::sim::{RecordingOutputs, ScriptedInputs};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Robot Control Unit: periodic pneumatics and match-clock controller
#[derive(Parser, Debug)]
#[command(name = "bot_control_unit")]
#[command(version)]
#[command(about = "Fixed-rate scan controller for the pneumatic lifts and match clock")]
struct Args {
    /// Path to the control unit configuration TOML.
    #[arg(long, short, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Scenario TOML to play back as inputs.
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Stop after this many ticks.
    #[arg(long)]
    ticks: Option<u64>,

    /// Pace ticks to the configured cycle time and stamp them with the wall clock.
    #[arg(long)]
    realtime: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Config is read before tracing is up so its log level can apply.
    let config = load_config(&args.config);
    let level = config
        .as_ref()
        .map(|cfg| cfg.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    info!("Robot Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = match config {
        Ok(cfg) => run(&args, &cfg),
        Err(e) => Err(e.into()),
    };
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Robot Control Unit shutdown complete");
}

fn run(args: &Args, config: &ControlUnitConfig) -> Result<(), Box<dyn std::error::Error>> {
    log_summary(config);

    // Setup signal handler for graceful shutdown.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    match (&args.scenario, args.realtime) {
        (Some(path), realtime) => {
            let inputs = ScriptedInputs::from_path(path)?;
            let scenario = inputs.scenario();
            info!(
                name = %scenario.name,
                steps = scenario.steps.len(),
                ticks = scenario.total_ticks(),
                "scenario loaded"
            );
            if realtime {
                drive(args, config, inputs, SystemClock::new(), &running)
            } else {
                drive(args, config, inputs, SimClock::new(config.cycle_time()), &running)
            }
        }
        (None, _) => {
            info!("no scenario given, idling disabled until interrupted");
            drive(args, config, IdleInputs, SystemClock::new(), &running)
        }
    }
}

/// Build a runner around `inputs` and `clock`, run it and report.
fn drive<I, C>(
    args: &Args,
    config: &ControlUnitConfig,
    inputs: I,
    clock: C,
    running: &AtomicBool,
) -> Result<(), Box<dyn std::error::Error>>
where
    I: InputSource,
    C: MonotonicClock,
{
    let outputs = RecordingOutputs::new(&config.cylinders);
    let paced = args.realtime || args.scenario.is_none();
    let mut runner =
        CycleRunner::new(config, inputs, outputs, TracingDashboard, clock)?.with_realtime(paced);
    info!(period_ms = config.cycle_time_ms, paced, "entering cycle loop");

    let executed = match args.ticks {
        Some(limit) => runner.run_until_limit(running, limit),
        None => runner.run_until(running),
    };

    let stats = runner.stats();
    info!(
        ticks = executed,
        avg_cycle_us = stats.avg_cycle_ns() / 1_000,
        max_cycle_us = stats.max_cycle_ns / 1_000,
        max_latency_us = stats.max_latency_ns / 1_000,
        overruns = stats.overruns,
        "cycle loop finished"
    );

    let last = runner.last_outputs();
    let sink = runner.outputs();
    info!(
        pressure_ready = last.pressure_ready,
        climb_now = last.climb_now,
        front_lift = ?last.front_lift,
        rear_lift = ?last.rear_lift,
        ball_gateway = ?last.ball_gateway,
        winch_count = runner.cycle().winch().count(),
        compressor = sink.compressor_enabled(),
        writes = sink.writes(),
        "final state"
    );
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
fn setup_tracing(args: &Args, level: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
