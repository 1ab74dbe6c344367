//! Worker assignments.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use simgen_core::types::OptionKind;
use simgen_models::config::EngineConfig;

use crate::error::ConfigError;

/// One worker's immutable slice of a simulation run.
///
/// Created once by the distributor before process spawn and handed to the
/// child as a JSON payload; immutable for the lifetime of the worker
/// process. Across all assignments of one run, row counts sum to the total
/// requested rows and seeds are pairwise disjoint.
///
/// # Examples
///
/// ```
/// use simgen_core::types::OptionKind;
/// use simgen_harness::WorkerAssignment;
/// use simgen_models::config::EngineConfig;
///
/// let assignment = WorkerAssignment::new(
///     0,
///     25,
///     OptionKind::Put,
///     10,
///     "out".into(),
///     100_000,
///     EngineConfig::default(),
/// )
/// .unwrap();
/// assert_eq!(assignment.row_count, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerAssignment {
    /// Zero-based worker index, unique within a run.
    pub worker_id: u32,
    /// Number of rows this worker produces.
    pub row_count: u64,
    /// Option side priced for every row.
    pub option_kind: OptionKind,
    /// Rows buffered before a chunk file is flushed.
    pub chunk_size: usize,
    /// Shared output directory.
    pub out_dir: PathBuf,
    /// Seed for this worker's random stream.
    pub seed: u64,
    /// Pricing-engine configuration forwarded to the oracle.
    pub engine: EngineConfig,
}

impl WorkerAssignment {
    /// Creates a validated assignment.
    ///
    /// Rejects zero row counts and zero chunk sizes eagerly, before any
    /// process is spawned.
    pub fn new(
        worker_id: u32,
        row_count: u64,
        option_kind: OptionKind,
        chunk_size: usize,
        out_dir: PathBuf,
        seed: u64,
        engine: EngineConfig,
    ) -> Result<Self, ConfigError> {
        if row_count == 0 {
            return Err(ConfigError::ZeroWorkerRows { worker_id });
        }
        if chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        engine.validate()?;
        Ok(Self {
            worker_id,
            row_count,
            option_kind,
            chunk_size,
            out_dir,
            seed,
            engine,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment() -> WorkerAssignment {
        WorkerAssignment::new(
            2,
            1000,
            OptionKind::Call,
            100,
            "simulation_output".into(),
            102_000_000,
            EngineConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_zero_counts() {
        assert_eq!(
            WorkerAssignment::new(
                5,
                0,
                OptionKind::Call,
                100,
                "out".into(),
                0,
                EngineConfig::default(),
            ),
            Err(ConfigError::ZeroWorkerRows { worker_id: 5 })
        );
        assert_eq!(
            WorkerAssignment::new(
                0,
                10,
                OptionKind::Call,
                0,
                "out".into(),
                0,
                EngineConfig::default(),
            ),
            Err(ConfigError::ZeroChunkSize)
        );
    }

    #[test]
    fn test_round_trips_across_the_process_boundary() {
        let original = assignment();
        let payload = serde_json::to_string(&original).unwrap();
        let decoded: WorkerAssignment = serde_json::from_str(&payload).unwrap();
        assert_eq!(decoded, original);
    }
}
