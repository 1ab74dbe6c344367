//! End-to-end CLI tests.
//!
//! Drives the built `simgen` binary through the full spawn-and-supervise
//! path: the parent partitions the run, each worker lands in its own
//! process, and the chunk files are read back to verify the union of rows.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use parquet::file::reader::{FileReader, SerializedFileReader};

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("simgen_cli_tests").join(name);
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn sorted_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn row_count(path: &Path) -> i64 {
    let reader = SerializedFileReader::new(fs::File::open(path).unwrap()).unwrap();
    reader.metadata().file_metadata().num_rows()
}

#[test]
fn run_reproduces_the_example_scenario() {
    // N_total=100, put, chunk_size=20, seed_base=7, n_workers=4: four
    // assignments of 25 rows, each flushing one full and one partial chunk.
    let out_dir = test_dir("example_scenario");

    let status = Command::new(env!("CARGO_BIN_EXE_simgen"))
        .args([
            "run",
            "--N_total",
            "100",
            "--OPTtype",
            "put",
            "--chunk_size",
            "20",
            "--out_dir",
            out_dir.to_str().unwrap(),
            "--seed_base",
            "7",
            "--n_workers",
            "4",
        ])
        .status()
        .unwrap();
    assert!(status.success());

    let expected: Vec<String> = (0..4)
        .flat_map(|worker| {
            (0..2).map(move |chunk| format!("put_worker{worker:03}_chunk{chunk:05}.parquet"))
        })
        .collect();
    assert_eq!(sorted_file_names(&out_dir), expected);

    let mut total = 0;
    for name in sorted_file_names(&out_dir) {
        let rows = row_count(&out_dir.join(&name));
        if name.ends_with("chunk00000.parquet") {
            assert_eq!(rows, 20);
        } else {
            assert_eq!(rows, 5);
        }
        total += rows;
    }
    assert_eq!(total, 100);
}

#[test]
fn invalid_option_type_fails_before_any_spawn() {
    let out_dir = test_dir("bad_option_type");

    let status = Command::new(env!("CARGO_BIN_EXE_simgen"))
        .args([
            "run",
            "--N_total",
            "10",
            "--OPTtype",
            "straddle",
            "--out_dir",
            out_dir.to_str().unwrap(),
        ])
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!out_dir.exists());
}

#[test]
fn invalid_scheme_fails_before_any_spawn() {
    let out_dir = test_dir("bad_scheme");

    let status = Command::new(env!("CARGO_BIN_EXE_simgen"))
        .args([
            "run",
            "--N_total",
            "10",
            "--scheme",
            "implicit-euler",
            "--out_dir",
            out_dir.to_str().unwrap(),
        ])
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!out_dir.exists());
}

#[test]
fn zero_rows_are_rejected_eagerly() {
    let status = Command::new(env!("CARGO_BIN_EXE_simgen"))
        .args(["run", "--N_total", "0"])
        .status()
        .unwrap();
    assert!(!status.success());
}
