use clap::Parser;
use gasbox::core::{Color, Schedule, SimConfig, Simulation};
use gasbox::driver::{Driver, PlacementRequest};
use log::{info, warn};
use std::process::ExitCode;
use std::time::Duration;

/// Headless run of the particle box: seed the air mix, tick, report.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Side length of the cubic box
    #[arg(long, default_value_t = 1.0)]
    box_size: f64,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Milliseconds between ticks (0 runs flat out)
    #[arg(long, default_value_t = 0)]
    period_ms: u64,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Tick ordering: phased or interleaved
    #[arg(long, default_value = "phased")]
    schedule: Schedule,

    /// Extra particles to add after the air mix
    #[arg(short, long, default_value_t = 0)]
    count: usize,

    /// Radius of the extra particles
    #[arg(short, long, default_value_t = 0.015)]
    radius: f64,

    /// Color of the extra particles (cyan, red, yellow, green)
    #[arg(long, default_value = "green")]
    color: Color,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> gasbox::Result<()> {
    let mut config = SimConfig::new(args.box_size).with_schedule(args.schedule);
    config.seed = args.seed;
    let mut sim = Simulation::new(config)?;

    if !sim.seed_air_mix() {
        warn!("air mix did not fully fit; continuing with {} particles", sim.len());
    }
    info!("seeded {} particles in a box of side {}", sim.len(), args.box_size);

    let mut driver = Driver::new(sim);
    if args.count > 0 {
        let req = PlacementRequest::new(args.count, args.radius, args.color);
        if !driver.add_particles(req)? {
            warn!("could not fit {} {} particles", args.count, args.color);
        }
    }

    driver.run();
    let stepped = driver.run_fixed_rate(Duration::from_millis(args.period_ms), args.ticks);
    driver.stop();

    let sim = driver.into_inner();
    info!(
        "ran {stepped} ticks ({} schedule): {} particles, mean speed {:.5}",
        sim.config().schedule,
        sim.len(),
        sim.mean_speed()
    );
    Ok(())
}
