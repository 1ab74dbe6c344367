//! End-to-end worker loop tests.
//!
//! Runs full assignments against the shipped analytic oracle and against
//! injected failing oracles, then reads the chunk files back to verify row
//! counts, ordering, failure isolation, and reproducibility.

use std::fs;
use std::path::{Path, PathBuf};

use simgen_core::types::{Calendar, Date, DayCountConvention, OptionKind};
use simgen_harness::adapter::{Oracle, OracleError, PriceRequest, PricingSession};
use simgen_harness::chunk::COLUMN_NAMES;
use simgen_harness::worker;
use simgen_harness::{ParameterSampler, WorkerAssignment};
use simgen_models::analytic::HestonAnalyticEngine;
use simgen_models::config::EngineConfig;

use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::RowAccessor;

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("simgen_worker_loop_tests").join(name);
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn assignment(
    worker_id: u32,
    row_count: u64,
    kind: OptionKind,
    chunk_size: usize,
    out_dir: PathBuf,
    seed: u64,
) -> WorkerAssignment {
    WorkerAssignment::new(
        worker_id,
        row_count,
        kind,
        chunk_size,
        out_dir,
        seed,
        EngineConfig::default(),
    )
    .unwrap()
}

fn sorted_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn read_rows(path: &Path) -> Vec<Vec<f64>> {
    let reader = SerializedFileReader::new(fs::File::open(path).unwrap()).unwrap();
    reader
        .get_row_iter(None)
        .unwrap()
        .map(|row| {
            let row = row.unwrap();
            (0..COLUMN_NAMES.len())
                .map(|column| row.get_double(column).unwrap())
                .collect()
        })
        .collect()
}

/// Oracle failing whenever the strike exceeds its supported grid.
struct CappedStrikeOracle {
    inner: HestonAnalyticEngine,
    max_strike: f64,
}

impl Oracle for CappedStrikeOracle {
    fn price(&self, request: &PriceRequest) -> Result<f64, OracleError> {
        if request.strike > self.max_strike {
            return Err(OracleError::Numerical("strike above supported grid".into()));
        }
        self.inner.price(request)
    }
}

/// Oracle failing on every request.
struct AlwaysFailingOracle;

impl Oracle for AlwaysFailingOracle {
    fn price(&self, _request: &PriceRequest) -> Result<f64, OracleError> {
        Err(OracleError::Numerical("no solution".into()))
    }
}

#[test]
fn chunking_splits_25_rows_into_10_10_5() {
    let dir = test_dir("chunking");
    let assignment = assignment(3, 25, OptionKind::Call, 10, dir.clone(), 42);

    let worker_id = worker::run(&assignment, HestonAnalyticEngine::new()).unwrap();
    assert_eq!(worker_id, 3);

    let names = sorted_file_names(&dir);
    assert_eq!(
        names,
        vec![
            "call_worker003_chunk00000.parquet",
            "call_worker003_chunk00001.parquet",
            "call_worker003_chunk00002.parquet",
        ]
    );

    let counts: Vec<usize> = names.iter().map(|name| read_rows(&dir.join(name)).len()).collect();
    assert_eq!(counts, vec![10, 10, 5]);
}

#[test]
fn row_level_failure_never_terminates_the_worker() {
    let dir = test_dir("failure_isolation");
    let seed = 1_000_000;
    let rows = 200;
    let assignment = assignment(0, rows, OptionKind::Put, 50, dir.clone(), seed);

    let oracle = CappedStrikeOracle {
        inner: HestonAnalyticEngine::new(),
        max_strike: 400.0,
    };
    worker::run(&assignment, oracle).unwrap();

    // Replay the worker's deterministic draw stream to find which strikes
    // must have failed.
    let mut sampler = ParameterSampler::from_seed(seed);
    let expected_failures: usize = (0..rows)
        .filter(|_| sampler.next_draw().strike > 400.0)
        .count();

    let mut total = 0;
    let mut sentinels = 0;
    for name in sorted_file_names(&dir) {
        for row in read_rows(&dir.join(name)) {
            total += 1;
            if row[COLUMN_NAMES.len() - 1].is_nan() {
                sentinels += 1;
            }
        }
    }
    assert_eq!(total, rows as usize);
    assert_eq!(sentinels, expected_failures);
}

#[test]
fn all_failing_rows_still_produce_the_full_output() {
    let dir = test_dir("all_failures");
    let assignment = assignment(1, 30, OptionKind::Call, 10, dir.clone(), 5);

    worker::run(&assignment, AlwaysFailingOracle).unwrap();

    let names = sorted_file_names(&dir);
    assert_eq!(names.len(), 3);
    for name in names {
        for row in read_rows(&dir.join(name)) {
            assert!(row[COLUMN_NAMES.len() - 1].is_nan());
        }
    }
}

#[test]
fn identical_assignments_reproduce_identical_chunks() {
    let first_dir = test_dir("rerun_a");
    let second_dir = test_dir("rerun_b");
    let valuation = Date::from_ymd(2025, 6, 16).unwrap();

    for dir in [&first_dir, &second_dir] {
        let assignment = assignment(0, 40, OptionKind::Put, 16, dir.clone(), 77);
        let mut session = PricingSession::anchored(
            HestonAnalyticEngine::new(),
            valuation,
            Calendar::UsSettlement,
            DayCountConvention::Actual365Fixed,
        );
        worker::run_with_session(&assignment, &mut session).unwrap();
    }

    let first_names = sorted_file_names(&first_dir);
    assert_eq!(first_names, sorted_file_names(&second_dir));
    for name in first_names {
        let first = read_rows(&first_dir.join(&name));
        let second = read_rows(&second_dir.join(&name));
        assert_eq!(first.len(), second.len());
        for (left, right) in first.iter().zip(&second) {
            for (a, b) in left.iter().zip(right) {
                // Bitwise reproducibility, with NaN sentinels comparing equal.
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }
    }
}

#[test]
fn concurrent_workers_never_collide_on_file_names() {
    let dir = test_dir("shared_out_dir");
    for worker_id in 0..3u32 {
        let assignment = assignment(
            worker_id,
            12,
            OptionKind::Call,
            10,
            dir.clone(),
            u64::from(worker_id) * 1_000_000,
        );
        worker::run(&assignment, HestonAnalyticEngine::new()).unwrap();
    }

    let names = sorted_file_names(&dir);
    // 12 rows at chunk size 10 is two files per worker.
    assert_eq!(names.len(), 6);
    for worker_id in 0..3 {
        assert!(names
            .iter()
            .any(|name| name.contains(&format!("worker{worker_id:03}"))));
    }
}
