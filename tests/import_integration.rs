//! Integration tests for the import flow.

use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const HEADER: &str = "Start (s),End (s),Scientific name,Common name,Confidence";

fn avilog(db: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("avilog"));
    cmd.arg("--database").arg(db);
    cmd
}

fn write_result_csv(dir: &Path, basename: &str, body: &str) -> PathBuf {
    let path = dir.join(format!("{basename}.BirdNET.results.csv"));
    fs::write(&path, format!("{HEADER}\n{body}")).unwrap();
    path
}

#[test]
fn test_import_skips_rows_with_both_names_empty() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("test.db");
    let csv = write_result_csv(
        dir.path(),
        "rec1",
        "0,3,Bubo blakistoni,Blakiston's Fish Owl,0.85\n3,6,,,0.0\n",
    );

    avilog(&db)
        .arg("import")
        .arg(&csv)
        .args(["--session", "Forest_Owl_20240101"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Detections: 1 total"))
        .stdout(predicate::str::contains("Location: Forest"))
        .stdout(predicate::str::contains("Species: Owl"));

    avilog(&db)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Detections: 1"))
        .stdout(predicate::str::contains("Species: 1"));
}

#[test]
fn test_import_counts_match_nonempty_rows() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("test.db");
    // five rows, two with both name fields empty
    let csv = write_result_csv(
        dir.path(),
        "rec1",
        "0,3,Parus major,Great Tit,0.9\n\
         3,6,,,0.0\n\
         6,9,Turdus merula,Eurasian Blackbird,0.5\n\
         9,12,,,\n\
         12,15,,Unidentified call,0.2\n",
    );

    avilog(&db)
        .arg("import")
        .arg(&csv)
        .args(["--session", "site_mixed_20240101"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Detections: 3 total"));
}

#[test]
fn test_import_missing_column_fails_with_zero_rows() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("test.db");
    let csv = dir.path().join("bad.BirdNET.results.csv");
    fs::write(
        &csv,
        "Start (s),End (s),Scientific name,Common name\n0,3,Parus major,Great Tit\n",
    )
    .unwrap();

    avilog(&db)
        .arg("import")
        .arg(&csv)
        .args(["--session", "site_x_20240101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Confidence"));

    avilog(&db)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Detections: 0"));
}

#[test]
fn test_directory_import_continues_past_bad_file() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("test.db");
    let input = dir.path().join("results");
    fs::create_dir(&input).unwrap();

    write_result_csv(&input, "good", "0,3,Parus major,Great Tit,0.6\n");
    fs::write(
        input.join("bad.BirdNET.results.csv"),
        "Start (s),End (s),Scientific name,Common name\n0,3,Parus major,Great Tit\n",
    )
    .unwrap();

    avilog(&db)
        .arg("import")
        .arg(&input)
        .args(["--session", "site_x_20240101", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Files: 1/2 successful"))
        .stdout(predicate::str::contains("[ERROR] bad.BirdNET.results.csv"));
}

#[test]
fn test_import_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("test.db");

    avilog(&db)
        .arg("import")
        .arg(dir.path().join("nope.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("input path not found"));
}

#[test]
fn test_import_with_location_species_components() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("test.db");
    let csv = write_result_csv(dir.path(), "rec1", "0,3,Strix uralensis,Ural Owl,0.7\n");

    avilog(&db)
        .arg("import")
        .arg(&csv)
        .args(["--location", "Okutama", "--species", "owl", "--date", "20240629"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session: 'Okutama_owl_20240629'"));
}
