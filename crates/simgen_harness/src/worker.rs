//! The per-process worker loop.
//!
//! A worker executes exactly one assignment and terminates. Its return value
//! is deliberately minimal (the worker id): large payloads across process
//! boundaries are an anti-pattern this design avoids, and everything of
//! value has already been persisted by the chunk writer.

use simgen_core::types::{Calendar, DayCountConvention};
use tracing::info;

use crate::adapter::{Oracle, PricingSession};
use crate::assignment::WorkerAssignment;
use crate::chunk::{ChunkWriter, PricedRow};
use crate::error::HarnessError;
use crate::sampler::ParameterSampler;

/// Executes one assignment end-to-end against a fresh pricing session.
///
/// The session is anchored on today's date under the US settlement calendar
/// with ACT/365F, exactly once for the process lifetime.
///
/// Failure semantics:
/// - a row-level oracle failure is recorded as a NaN sentinel price and the
///   loop continues;
/// - a sampler or writer failure (I/O, serialisation) is fatal and
///   propagates to the distributor as this worker's failure, leaving
///   already-flushed chunk files intact. The unflushed tail is lost, an
///   accepted at-most-once durability trade-off.
pub fn run<O: Oracle>(assignment: &WorkerAssignment, oracle: O) -> Result<u32, HarnessError> {
    let mut session = PricingSession::new(
        oracle,
        Calendar::UsSettlement,
        DayCountConvention::Actual365Fixed,
    );
    run_with_session(assignment, &mut session)
}

/// Worker loop against an existing session.
///
/// Split out from [`run`] so tests can anchor the valuation date explicitly.
pub fn run_with_session<O: Oracle>(
    assignment: &WorkerAssignment,
    session: &mut PricingSession<O>,
) -> Result<u32, HarnessError> {
    info!(
        worker_id = assignment.worker_id,
        rows = assignment.row_count,
        seed = assignment.seed,
        valuation = %session.valuation_date(),
        "worker started"
    );

    let mut sampler = ParameterSampler::from_seed(assignment.seed);
    let mut writer = ChunkWriter::new(
        &assignment.out_dir,
        assignment.option_kind,
        assignment.worker_id,
        assignment.chunk_size,
    )?;

    let mut failed_rows: u64 = 0;
    for _ in 0..assignment.row_count {
        let draw = sampler.next_draw();
        session.set_market(draw.rate, draw.dividend);
        let price = session.price(&draw, assignment.option_kind);
        if price.is_nan() {
            failed_rows += 1;
        }
        writer.append(PricedRow::new(draw, price));
        writer.maybe_flush()?;
    }
    writer.flush()?;

    info!(
        worker_id = assignment.worker_id,
        rows = assignment.row_count,
        failed_rows,
        chunks = writer.chunks_written(),
        "worker finished"
    );
    Ok(assignment.worker_id)
}

// Integration coverage for this module lives in tests/worker_loop.rs, where
// the loop runs against both the shipped analytic oracle and injected
// failing oracles.
