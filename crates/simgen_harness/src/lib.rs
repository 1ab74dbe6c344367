//! # simgen_harness: Parallel Simulation Harness
//!
//! Generates large labelled datasets of option prices by sampling random
//! market and model parameters, pricing each sample through an oracle, and
//! persisting results as chunked Parquet files.
//!
//! ## Components
//!
//! - `sampler`: deterministic per-worker parameter draws
//! - `adapter`: the [`adapter::Oracle`] trait and the per-worker
//!   [`adapter::PricingSession`] that amortises expensive setup across calls
//! - `chunk`: buffered, crash-safe chunked Parquet persistence
//! - `worker`: the sequential per-process loop composing the three above
//! - `distribute`: row partitioning, seed derivation, and the supervising
//!   process pool
//!
//! ## Concurrency Model
//!
//! Process-level parallelism only. Each worker runs a fully sequential,
//! blocking loop in its own OS process, shares no mutable state with any
//! other worker, and talks to the parent at exactly two points: assignment
//! hand-off at spawn, and a trivial exit status at completion. The output
//! directory is the sole shared resource; `(worker_id, chunk_index)` file
//! naming makes concurrent writes collision-free without locking.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod adapter;
pub mod assignment;
pub mod chunk;
pub mod distribute;
pub mod error;
pub mod sampler;
pub mod worker;

pub use adapter::{Oracle, OracleError, PriceRequest, PricingSession};
pub use assignment::WorkerAssignment;
pub use chunk::{ChunkWriter, PricedRow};
pub use distribute::{ProcessPool, RunConfig};
pub use error::{ConfigError, HarnessError};
pub use sampler::{ParameterDraw, ParameterSampler};
