//! Work distribution and process supervision.
//!
//! The distributor partitions a total row count into near-equal per-worker
//! shares, derives a disjoint seed per worker, and supervises one OS process
//! per assignment. Processes are spawned "clean slate" by re-invoking the
//! current executable's worker entry point with the assignment serialised
//! into an environment variable: the pricing context is rebuilt fresh inside
//! each child, so the oracle's process-wide valuation-date state is
//! initialised exactly once per process and never raced across workers.
//!
//! Each child handles exactly one assignment and exits. This is the
//! strongest form of task-count-based worker recycling: worker memory never
//! outlives its assignment, so long runs cannot accumulate growth inside a
//! reused process.

use std::collections::VecDeque;
use std::env;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus};

use simgen_core::types::OptionKind;
use simgen_models::config::EngineConfig;
use tracing::{debug, info, warn};

use crate::assignment::WorkerAssignment;
use crate::error::{ConfigError, HarnessError};

/// Seed distance between adjacent workers.
///
/// Large enough that no two workers' streams can coincide under any
/// supported row count.
pub const SEED_STRIDE: u64 = 1_000_000;

/// Environment variable carrying the JSON assignment into a worker process.
pub const ASSIGNMENT_ENV: &str = "SIMGEN_WORKER_ASSIGNMENT";

/// Environment variable with the scheduler's CPU allocation, preferred over
/// logical CPU detection when the worker count is left on auto.
pub const CPU_HINT_ENV: &str = "SLURM_CPUS_PER_TASK";

/// Logical CPUs left free for the parent and the OS under auto detection.
const RESERVED_CPUS: usize = 3;

/// Validated top-level run parameters.
///
/// # Examples
///
/// ```
/// use simgen_core::types::OptionKind;
/// use simgen_harness::RunConfig;
///
/// let mut config = RunConfig::new(100, OptionKind::Put);
/// config.chunk_size = 20;
/// config.n_workers = 4;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Total rows to generate across all workers.
    pub n_total: u64,
    /// Option side priced for every row.
    pub option_kind: OptionKind,
    /// Rows per chunk file.
    pub chunk_size: usize,
    /// Shared output directory.
    pub out_dir: PathBuf,
    /// Base seed; worker seeds are derived by [`worker_seed`].
    pub seed_base: u64,
    /// Worker-count hint; 0 selects auto detection.
    pub n_workers: usize,
    /// Hard cap on the worker count.
    pub max_workers: usize,
    /// Pricing-engine configuration handed to every worker.
    pub engine: EngineConfig,
}

impl RunConfig {
    /// Creates a configuration with the stock defaults.
    pub fn new(n_total: u64, option_kind: OptionKind) -> Self {
        Self {
            n_total,
            option_kind,
            chunk_size: 5000,
            out_dir: PathBuf::from("simulation_output"),
            seed_base: 100_000,
            n_workers: 0,
            max_workers: 24,
            engine: EngineConfig::default(),
        }
    }

    /// Rejects non-positive counts before any process is spawned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_total == 0 {
            return Err(ConfigError::ZeroTotalRows);
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.max_workers == 0 {
            return Err(ConfigError::ZeroMaxWorkers);
        }
        self.engine.validate()?;
        Ok(())
    }
}

/// Resolves the worker count from the hint, the environment, and the CPU
/// count, clamped to `[1, max_workers]`.
///
/// A positive hint wins outright. On auto (`hint == 0`) a scheduler CPU
/// allocation from [`CPU_HINT_ENV`] is preferred, falling back to
/// `max(1, logical_cpus - 3)`.
pub fn resolve_worker_count(hint: usize, max_workers: usize) -> usize {
    let cpu_hint = env::var(CPU_HINT_ENV)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|&cpus| cpus > 0);
    resolve_with(hint, max_workers, cpu_hint, num_cpus::get())
}

fn resolve_with(
    hint: usize,
    max_workers: usize,
    cpu_hint: Option<usize>,
    logical_cpus: usize,
) -> usize {
    let resolved = if hint > 0 {
        hint
    } else if let Some(cpus) = cpu_hint {
        cpus
    } else {
        logical_cpus.saturating_sub(RESERVED_CPUS).max(1)
    };
    resolved.clamp(1, max_workers.max(1))
}

/// Partitions `n_total` rows into `workers` near-equal shares.
///
/// `base = n_total / workers`, with the remainder distributed one row at a
/// time to the first `n_total % workers` workers. Order-stable: the shares
/// sum to `n_total` and differ by at most one.
pub fn partition_rows(n_total: u64, workers: usize) -> Vec<u64> {
    let workers = workers.max(1) as u64;
    let base = n_total / workers;
    let remainder = n_total % workers;
    (0..workers)
        .map(|worker_id| base + u64::from(worker_id < remainder))
        .collect()
}

/// Derives the seed for one worker: `seed_base + worker_id * SEED_STRIDE`.
pub fn worker_seed(seed_base: u64, worker_id: u32) -> u64 {
    seed_base + u64::from(worker_id) * SEED_STRIDE
}

/// Builds the validated, deterministic assignment list for a run.
///
/// Workers that would receive zero rows are skipped entirely.
pub fn build_assignments(config: &RunConfig) -> Result<Vec<WorkerAssignment>, ConfigError> {
    config.validate()?;
    let workers = resolve_worker_count(config.n_workers, config.max_workers);
    let shares = partition_rows(config.n_total, workers);

    let mut assignments = Vec::with_capacity(workers);
    for (index, &row_count) in shares.iter().enumerate() {
        if row_count == 0 {
            continue;
        }
        let worker_id = index as u32;
        assignments.push(WorkerAssignment::new(
            worker_id,
            row_count,
            config.option_kind,
            config.chunk_size,
            config.out_dir.clone(),
            worker_seed(config.seed_base, worker_id),
            config.engine,
        )?);
    }

    info!(
        n_total = config.n_total,
        option_kind = %config.option_kind,
        workers = assignments.len(),
        chunk_size = config.chunk_size,
        out_dir = %config.out_dir.display(),
        seed_base = config.seed_base,
        "run configured"
    );
    Ok(assignments)
}

/// Reads the assignment a parent pool placed into this process's
/// environment.
pub fn assignment_from_env() -> Result<WorkerAssignment, HarnessError> {
    let payload =
        env::var(ASSIGNMENT_ENV).map_err(|_| HarnessError::MissingAssignment(ASSIGNMENT_ENV))?;
    Ok(serde_json::from_str(&payload)?)
}

/// Supervising pool of single-assignment worker processes.
///
/// Bounds the number of in-flight children, waits for every child, and
/// propagates the first failure (lowest worker id) after all children have
/// been given the chance to finish or fail independently.
pub struct ProcessPool {
    program: PathBuf,
    args: Vec<String>,
    max_in_flight: usize,
}

impl ProcessPool {
    /// Creates a pool that spawns `program args...` per assignment.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, max_in_flight: usize) -> Self {
        Self {
            program: program.into(),
            args,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Creates a pool that re-invokes the current executable.
    pub fn current_exe(args: Vec<String>, max_in_flight: usize) -> Result<Self, HarnessError> {
        Ok(Self::new(env::current_exe()?, args, max_in_flight))
    }

    /// Runs every assignment to completion in its own process.
    ///
    /// Children are spawned and reaped in worker-id order, so the first
    /// recorded failure is the lowest-id failure.
    pub fn run(&self, assignments: &[WorkerAssignment]) -> Result<(), HarnessError> {
        let mut in_flight: VecDeque<(u32, Child)> = VecDeque::new();
        let mut failures: Vec<(u32, ExitStatus)> = Vec::new();

        for assignment in assignments {
            if in_flight.len() >= self.max_in_flight {
                if let Some(entry) = in_flight.pop_front() {
                    Self::reap(entry, &mut failures)?;
                }
            }
            match self.spawn(assignment) {
                Ok(child) => in_flight.push_back((assignment.worker_id, child)),
                Err(err) => {
                    // Never strand live children behind a spawn failure.
                    while let Some(entry) = in_flight.pop_front() {
                        let _ = Self::reap(entry, &mut failures);
                    }
                    return Err(err);
                }
            }
        }
        while let Some(entry) = in_flight.pop_front() {
            Self::reap(entry, &mut failures)?;
        }

        if let Some(&(worker_id, status)) = failures.first() {
            return Err(HarnessError::WorkerFailed { worker_id, status });
        }
        Ok(())
    }

    fn spawn(&self, assignment: &WorkerAssignment) -> Result<Child, HarnessError> {
        let payload = serde_json::to_string(assignment)?;
        let child = Command::new(&self.program)
            .args(&self.args)
            .env(ASSIGNMENT_ENV, payload)
            .spawn()?;
        debug!(
            worker_id = assignment.worker_id,
            pid = child.id(),
            rows = assignment.row_count,
            "spawned worker process"
        );
        Ok(child)
    }

    fn reap(
        (worker_id, mut child): (u32, Child),
        failures: &mut Vec<(u32, ExitStatus)>,
    ) -> Result<(), HarnessError> {
        let status = child.wait()?;
        if status.success() {
            debug!(worker_id, "worker process completed");
        } else {
            warn!(worker_id, %status, "worker process failed");
            failures.push((worker_id, status));
        }
        Ok(())
    }
}
