//! Simgen CLI - Parallel Heston Dataset Generation
//!
//! Operational entry point for the simulation harness.
//!
//! # Commands
//!
//! - `simgen run --N_total <rows>` - generate a labelled option-price
//!   dataset across independent worker processes
//!
//! The hidden `worker` command is the re-entry point the distributor spawns:
//! it reads one assignment from its environment, executes the worker loop,
//! and exits. Spawning a fresh executable per assignment gives each worker a
//! clean slate, so the pricing context is initialised exactly once per
//! process and never shared across workers.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use simgen_harness::distribute::{self, ProcessPool};
use simgen_harness::{worker, RunConfig};
use simgen_models::analytic::HestonAnalyticEngine;
use simgen_models::config::Scheme;

mod error;

pub use error::{CliError, Result};

/// Parallel Heston option-price dataset simulator
#[derive(Parser)]
#[command(name = "simgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a labelled option-price dataset in parallel
    Run {
        /// Total number of simulated rows to generate
        #[arg(long = "N_total")]
        n_total: u64,

        /// Option type ('call' or 'put')
        #[arg(long = "OPTtype", default_value = "call")]
        option_type: String,

        /// Rows per Parquet chunk written by each worker
        #[arg(long = "chunk_size", default_value_t = 5000)]
        chunk_size: usize,

        /// Output directory for chunk files
        #[arg(long = "out_dir", default_value = "simulation_output")]
        out_dir: PathBuf,

        /// Base seed for the RNG (worker seeds are derived from this)
        #[arg(long = "seed_base", default_value_t = 100_000)]
        seed_base: u64,

        /// Override worker count (0 = auto)
        #[arg(long = "n_workers", default_value_t = 0)]
        n_workers: usize,

        /// Cap workers even if the scheduler allocates more CPUs
        #[arg(long = "max_workers", default_value_t = 24)]
        max_workers: usize,

        /// Operator splitting scheme forwarded to the pricing engine
        #[arg(long, default_value = "hundsdorfer")]
        scheme: String,
    },

    /// Execute one worker assignment from the environment (spawned by `run`)
    #[command(hide = true)]
    Worker,
}

fn main() -> Result<()> {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Run {
            n_total,
            option_type,
            chunk_size,
            out_dir,
            seed_base,
            n_workers,
            max_workers,
            scheme,
        } => run(
            n_total,
            &option_type,
            chunk_size,
            out_dir,
            seed_base,
            n_workers,
            max_workers,
            &scheme,
        ),
        Commands::Worker => run_worker(),
    }
}

/// Builds the validated run configuration and supervises the worker pool.
#[allow(clippy::too_many_arguments)]
fn run(
    n_total: u64,
    option_type: &str,
    chunk_size: usize,
    out_dir: PathBuf,
    seed_base: u64,
    n_workers: usize,
    max_workers: usize,
    scheme: &str,
) -> Result<()> {
    let mut config = RunConfig::new(n_total, option_type.parse()?);
    config.chunk_size = chunk_size;
    config.out_dir = out_dir;
    config.seed_base = seed_base;
    config.n_workers = n_workers;
    config.max_workers = max_workers;
    config.engine = config.engine.with_scheme(scheme.parse::<Scheme>()?);

    let assignments = distribute::build_assignments(&config)?;
    let pool = ProcessPool::current_exe(vec!["worker".into()], assignments.len())?;
    pool.run(&assignments)?;

    info!(
        rows = config.n_total,
        out_dir = %config.out_dir.display(),
        "simulation complete"
    );
    Ok(())
}

/// The worker re-entry point: one assignment, one process, then exit.
fn run_worker() -> Result<()> {
    let assignment = distribute::assignment_from_env()?;
    let oracle = HestonAnalyticEngine::with_config(assignment.engine)?;
    worker::run(&assignment, oracle)?;
    Ok(())
}
