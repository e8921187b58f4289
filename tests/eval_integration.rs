//! Integration tests for the evaluation flow.

use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_eval_writes_metrics_per_file_species_pair() {
    let dir = TempDir::new().unwrap();

    let ground_truth = dir.path().join("train.csv");
    fs::write(
        &ground_truth,
        "path,start_time,end_time,species\n\
         data/audio/rec1.mp3,0m0s,0m10s,owl\n\
         data/audio/rec1.mp3,0m8s,0m12s,owl\n",
    )
    .unwrap();

    let results = dir.path().join("results");
    fs::create_dir(&results).unwrap();
    fs::write(
        results.join("rec1.BirdNET.results.csv"),
        "Start (s),End (s),Scientific name,Common name,Confidence\n\
         0.0,3.0,Strix uralensis,Ural Owl,0.9\n\
         30.0,33.0,Strix uralensis,Ural Owl,0.8\n",
    )
    .unwrap();

    let metrics = dir.path().join("metrics.csv");
    let mut cmd = Command::new(cargo_bin("avilog"));
    cmd.arg("eval")
        .arg("--results-dir")
        .arg(&results)
        .arg("--ground-truth")
        .arg(&ground_truth)
        .arg("--output")
        .arg(&metrics);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Wrote 1 metrics row(s)"));

    // truth covers seconds 0..=12; predictions hit second 0 (true
    // positive) and second 30 (false positive) at the 0.1 threshold
    let contents = fs::read_to_string(&metrics).unwrap();
    assert!(contents.starts_with("file_name,species,f1_score,precision,recall"));
    assert!(contents.contains("rec1,owl,"));
    assert!(contents.contains("0.5000")); // precision
    assert!(contents.contains("0.0769")); // recall = 1/13
}

#[test]
fn test_eval_ignores_normalized_marker_in_filenames() {
    let dir = TempDir::new().unwrap();

    let ground_truth = dir.path().join("train.csv");
    fs::write(
        &ground_truth,
        "path,start_time,end_time,species\n\
         data/audio/rec1.mp3,0m0s,0m3s,owl\n",
    )
    .unwrap();

    let results = dir.path().join("results");
    fs::create_dir(&results).unwrap();
    fs::write(
        results.join("rec1_normalized.BirdNET.results.csv"),
        "Start (s),End (s),Scientific name,Common name,Confidence\n\
         0.0,3.0,Strix uralensis,Ural Owl,0.9\n",
    )
    .unwrap();

    let metrics = dir.path().join("metrics.csv");
    let mut cmd = Command::new(cargo_bin("avilog"));
    cmd.arg("eval")
        .arg("--results-dir")
        .arg(&results)
        .arg("--ground-truth")
        .arg(&ground_truth)
        .arg("--output")
        .arg(&metrics);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Wrote 1 metrics row(s)"));

    let contents = fs::read_to_string(&metrics).unwrap();
    assert!(contents.contains("rec1_normalized,owl,"));
}

#[test]
fn test_eval_missing_ground_truth_fails() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results");
    fs::create_dir(&results).unwrap();

    let mut cmd = Command::new(cargo_bin("avilog"));
    cmd.arg("eval")
        .arg("--results-dir")
        .arg(&results)
        .arg("--ground-truth")
        .arg(dir.path().join("missing.csv"))
        .arg("--output")
        .arg(dir.path().join("metrics.csv"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("input path not found"));
}

#[test]
fn test_eval_rejects_out_of_range_threshold() {
    let dir = TempDir::new().unwrap();

    let mut cmd = Command::new(cargo_bin("avilog"));
    cmd.arg("eval")
        .arg("--results-dir")
        .arg(dir.path())
        .arg("--ground-truth")
        .arg(dir.path().join("train.csv"))
        .arg("--output")
        .arg(dir.path().join("metrics.csv"))
        .args(["--threshold", "1.5"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("confidence must be 0.0-1.0"));
}
