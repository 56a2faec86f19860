use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
        .canonicalize()
        .expect("fixture present")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("contrail-cli");
    cmd.env("RUST_LOG", "error")
        .env("NO_COLOR", "1")
        .env_remove("CONTRAIL_RATE_OVERRIDE");
    cmd
}

#[test]
fn estimates_fixture_flight_as_text() {
    let mut cmd = cli();
    cmd.arg("estimate")
        .arg("--samples")
        .arg(fixture("sample_flight.csv"))
        .arg("--aircraft")
        .arg("B737-800")
        .arg("--flight-id")
        .arg("CT100");

    cmd.assert()
        .success()
        .stdout(contains("Flight CT100: B737-800 (confidence: high)"))
        .stdout(contains("Fuel: 4530.0 kg"))
        .stdout(contains("Taxi-out"))
        .stdout(contains("Descent"))
        .stdout(contains("Rates: built-in rates"));
}

#[test]
fn estimates_fixture_flight_as_json() {
    let mut cmd = cli();
    cmd.arg("--format")
        .arg("json")
        .arg("estimate")
        .arg("--samples")
        .arg(fixture("sample_flight.csv"))
        .arg("--aircraft")
        .arg("B738")
        .arg("--distance-nm")
        .arg("450");

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(value["flightId"], "sample_flight");
    assert_eq!(value["aircraftKey"], "B737-800");
    assert_eq!(value["confidence"], "medium");
    assert_eq!(value["phases"].as_array().map(Vec::len), Some(5));
    let fuel = value["fuelKg"].as_f64().expect("fuelKg");
    let per_nm = value["fuelPerNm"].as_f64().expect("fuelPerNm");
    assert!((per_nm - fuel / 450.0).abs() < 1e-9);
}

#[test]
fn unknown_aircraft_prints_fallback_note() {
    let mut cmd = cli();
    cmd.arg("estimate")
        .arg("--samples")
        .arg(fixture("sample_flight.csv"))
        .arg("--aircraft")
        .arg("totally-unknown-xyz");

    cmd.assert()
        .success()
        .stdout(contains("(confidence: low)"))
        .stdout(contains("Note: No burn-rate profile matches"));
}

#[test]
fn empty_sample_file_reports_no_phases() {
    let temp = tempdir().expect("create temp dir");
    let path = temp.path().join("empty.csv");
    fs::write(&path, "timestamp,altitude_ft\n").expect("write samples");

    let mut cmd = cli();
    cmd.arg("estimate")
        .arg("--samples")
        .arg(&path)
        .arg("--aircraft")
        .arg("A320");

    cmd.assert()
        .success()
        .stdout(contains("Fuel: 0.0 kg"))
        .stdout(contains("Note: no phases detected"));
}

#[test]
fn missing_sample_file_fails_with_context() {
    let mut cmd = cli();
    cmd.arg("estimate")
        .arg("--samples")
        .arg("/definitely/not/here.csv")
        .arg("--aircraft")
        .arg("A320");

    cmd.assert()
        .failure()
        .stderr(contains("failed to load samples from /definitely/not/here.csv"));
}

#[test]
fn override_feed_from_environment_is_applied() {
    let mut cmd = cli();
    cmd.env("CONTRAIL_RATE_OVERRIDE", fixture("rate_override.json"))
        .arg("estimate")
        .arg("--samples")
        .arg(fixture("sample_flight.csv"))
        .arg("--aircraft")
        .arg("XX1");

    cmd.assert()
        .success()
        .stdout(contains("Flight sample_flight: X1 (confidence: medium)"))
        .stdout(contains("Rates: override from"));
}

#[test]
fn malformed_override_aborts() {
    let temp = tempdir().expect("create temp dir");
    let path = temp.path().join("rates.json");
    fs::write(&path, "{ not json").expect("write override");

    let mut cmd = cli();
    cmd.arg("--rates-override")
        .arg(&path)
        .arg("rates");

    cmd.assert()
        .failure()
        .stderr(contains("failed to apply burn-rate override").and(contains("rates.json")));
}
