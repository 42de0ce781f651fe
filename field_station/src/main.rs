//! # Field Station
//!
//! Runs the field-object registry against simulated pose producers:
//! loads the station TOML, wires the sinks (tracing-backed dashboard,
//! JSON-lines structured log), registers the simulated field population
//! and enters the fixed-period publish loop.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use field_common::config::ConfigLoader;
use field_common::consts::DEFAULT_CONFIG_PATH;
use field_registry::FieldRegistry;
use field_registry::sinks::jsonl::JsonlTelemetry;
use field_registry::sinks::trace::TraceDashboard;
use field_station::config::StationConfig;
use field_station::cycle::{CycleRunner, rt_setup};
use field_station::sim::FieldSimulation;

/// Field telemetry station — per-cycle field projection
#[derive(Parser, Debug)]
#[command(name = "field_station")]
#[command(version)]
#[command(about = "Publishes simulated field poses to dashboard and structured log")]
struct Args {
    /// Path to the station configuration TOML.
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Stop after this many cycles (overrides the configured value).
    #[arg(long)]
    cycles: Option<u64>,

    /// CPU core to pin the cycle thread to (rt builds only).
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority (rt builds only).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("Field station v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Field station shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StationConfig::load(&args.config)?;
    config.validate()?;
    if args.cycles.is_some() {
        config.cycle.max_cycles = args.cycles;
    }

    info!(
        station = %config.shared.station_name,
        cycle_time_us = config.cycle.cycle_time_us,
        "configuration loaded"
    );

    if let Some(parent) = config.telemetry.jsonl_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let telemetry = JsonlTelemetry::create(&config.telemetry.jsonl_path)?;
    let dashboard = TraceDashboard::new();

    let simulation = FieldSimulation::from_config(&config.field);
    let mut registry = FieldRegistry::new(simulation.robot_handle(), dashboard, telemetry);
    simulation.register_all(&mut registry);
    info!(
        objects = simulation.object_count(),
        opponents = config.field.opponent_count,
        pieces = config.field.piece_count + config.field.airborne_piece_count,
        "field simulation registered"
    );

    rt_setup(args.cpu_core, args.rt_priority)?;

    let mut runner = CycleRunner::new(&config, simulation, registry);
    runner.run()?;

    let stats = runner.stats();
    info!(
        cycles = stats.cycle_count,
        avg_us = stats.avg_cycle_ns() / 1000,
        max_us = stats.max_cycle_ns / 1000,
        overruns = stats.overruns,
        "final cycle statistics"
    );

    let telemetry = runner.registry_mut().telemetry_mut();
    telemetry.flush()?;
    if telemetry.dropped_records() > 0 {
        error!(
            dropped = telemetry.dropped_records(),
            "telemetry records were lost to write failures"
        );
    }

    Ok(())
}

fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

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
