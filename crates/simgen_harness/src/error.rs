//! Error types for the simulation harness.
//!
//! This module provides:
//! - `ConfigError`: run configuration failures, rejected before any worker
//!   process is spawned
//! - `HarnessError`: fatal worker and pool failures
//!
//! Row-level pricing failures are deliberately NOT represented here; they
//! are converted to the NaN sentinel inside the pricing session and never
//! surface as errors.

use std::process::ExitStatus;
use thiserror::Error;

use simgen_models::config::EngineConfigError;

/// Run configuration errors.
///
/// All variants are raised eagerly, at assignment-construction time, so an
/// invalid run fails before a single process is spawned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The total row count was zero.
    #[error("total row count must be positive")]
    ZeroTotalRows,

    /// A worker assignment was constructed with zero rows.
    #[error("worker {worker_id} row count must be positive")]
    ZeroWorkerRows {
        /// The offending worker id.
        worker_id: u32,
    },

    /// The chunk size was zero.
    #[error("chunk size must be positive")]
    ZeroChunkSize,

    /// The worker cap was zero.
    #[error("max workers must be positive")]
    ZeroMaxWorkers,

    /// The pricing-engine configuration was invalid.
    #[error(transparent)]
    Engine(#[from] EngineConfigError),
}

/// Fatal harness errors.
///
/// Any of these aborts the owning worker (or the supervising pool); other
/// workers continue unaffected and already-flushed chunk files stay intact.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Invalid run configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O failure while spawning a process or writing a chunk file.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Assignment could not be encoded or decoded as JSON.
    #[error("assignment serialisation failed: {0}")]
    Assignment(#[from] serde_json::Error),

    /// Parquet serialisation failed.
    #[error("chunk write failed: {0}")]
    Chunk(#[from] parquet::errors::ParquetError),

    /// The worker re-entry point found no assignment in its environment.
    #[error("worker assignment not found in ${0}")]
    MissingAssignment(&'static str),

    /// A worker process exited with a failure status.
    #[error("worker {worker_id} failed: {status}")]
    WorkerFailed {
        /// Id of the failed worker.
        worker_id: u32,
        /// The process exit status.
        status: ExitStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_name_the_offending_field() {
        assert!(ConfigError::ZeroTotalRows.to_string().contains("row count"));
        assert!(ConfigError::ZeroChunkSize.to_string().contains("chunk size"));
        let err = ConfigError::ZeroWorkerRows { worker_id: 7 };
        assert!(err.to_string().contains('7'));
    }
}
