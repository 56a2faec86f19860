mod common;

use std::fs;
use std::sync::Arc;
use std::thread;

use common::{fixtures_dir, sparse_flight};
use contrail_lib::aircraft::{OverrideSource, TableProvenance};
use contrail_lib::{
    AircraftKey, ConfidenceLevel, FlightPhase, FuelEstimator, RateTableHandle,
};
use tempfile::tempdir;

#[test]
fn loaded_override_is_visible_to_the_next_estimate() -> contrail_lib::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("rates.json");
    fs::write(&path, r#"{"rates": {"X1": {"cruise": 3000}}}"#)?;

    let handle = RateTableHandle::builtin();
    let estimator = FuelEstimator::new(handle.clone());
    let before = estimator.estimate_fuel("O1", "X1", &sparse_flight(0.0), None);
    assert_eq!(before.confidence, ConfidenceLevel::Low);

    assert!(handle.load_override(&OverrideSource::Path(path)));

    let after = estimator.estimate_fuel("O1", "X1", &sparse_flight(0.0), None);
    assert_eq!(after.confidence, ConfidenceLevel::High);
    assert_eq!(after.aircraft_key, AircraftKey::Model("X1".to_string()));
    let cruise = after
        .assumptions
        .phases
        .iter()
        .find(|p| p.phase == FlightPhase::Cruise)
        .expect("cruise slice");
    assert_eq!(cruise.rate_kg_per_hour, 3_000.0);
    assert!(!cruise.rate_derived);
    assert!(matches!(
        after.assumptions.rate_table,
        TableProvenance::Override { revision: 1, .. }
    ));
    Ok(())
}

#[test]
fn fixture_feed_replaces_and_adds_profiles() -> contrail_lib::Result<()> {
    let handle = RateTableHandle::builtin();
    let source = OverrideSource::parse(&fixtures_dir().join("rate_override.json").to_string_lossy());
    let summary = handle.try_load_override(&source)?;

    assert_eq!(summary.rates_applied, 2);
    assert_eq!(summary.families_applied, 1);
    assert!(summary.skipped.is_empty());

    let table = handle.snapshot();
    let b738 = AircraftKey::Model("B737-800".to_string());
    assert_eq!(table.get_burn_rate(&b738, FlightPhase::Cruise), 2_600.0);
    // Only cruise is in the feed; the built-in climb and taxi rates stay.
    assert_eq!(table.get_burn_rate(&b738, FlightPhase::Climb), 4_400.0);
    assert_eq!(table.get_burn_rate(&b738, FlightPhase::TaxiIn), 600.0);
    assert!(!table.resolve_rate(&b738, FlightPhase::Climb).derived);
    assert_eq!(
        table.normalize_aircraft("XX1"),
        (AircraftKey::Model("X1".to_string()), ConfidenceLevel::Medium)
    );
    Ok(())
}

#[test]
fn malformed_feed_keeps_current_table() -> contrail_lib::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"rates\": {\"X1\": ")?;

    let handle = RateTableHandle::builtin();
    let before = handle.snapshot();
    assert!(!handle.load_override(&OverrideSource::Path(path)));
    assert!(Arc::ptr_eq(&before, &handle.snapshot()));
    Ok(())
}

#[test]
fn feed_without_usable_rates_is_rejected() -> contrail_lib::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("zero.json");
    fs::write(&path, r#"{"rates": {"X1": {"cruise": 0, "climb": -4}}}"#)?;

    let handle = RateTableHandle::builtin();
    assert!(!handle.load_override(&OverrideSource::Path(path)));
    assert_eq!(handle.snapshot().revision(), 0);
    Ok(())
}

#[test]
fn unreachable_url_is_reported_as_failure() {
    let handle = RateTableHandle::builtin();
    // Port 9 (discard) on localhost is never serving HTTP in test environments.
    let source = OverrideSource::parse("http://127.0.0.1:9/rates.json");
    assert!(!handle.load_override(&source));
    assert_eq!(handle.snapshot().revision(), 0);
}

#[test]
fn concurrent_readers_see_whole_tables() {
    let handle = RateTableHandle::builtin();
    let estimator = FuelEstimator::new(handle.clone());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let estimator = estimator.clone();
            thread::spawn(move || {
                let samples = sparse_flight(0.0);
                (0..50)
                    .map(|_| estimator.estimate_fuel("T1", "X1", &samples, None))
                    .map(|estimate| {
                        let cruise = estimate
                            .assumptions
                            .phases
                            .iter()
                            .find(|p| p.phase == FlightPhase::Cruise)
                            .map(|p| p.rate_kg_per_hour);
                        (estimate.confidence, cruise)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    handle
        .apply_json(r#"{"rates": {"X1": {"cruise": 3000}}}"#, "concurrent")
        .expect("override applies");

    for reader in readers {
        for (confidence, cruise) in reader.join().expect("reader thread") {
            match confidence {
                ConfidenceLevel::High => assert_eq!(cruise, Some(3_000.0)),
                ConfidenceLevel::Low => assert_eq!(cruise, Some(2_500.0)),
                ConfidenceLevel::Medium => panic!("unexpected medium confidence"),
            }
        }
    }
    assert_eq!(
        handle
            .snapshot()
            .get_burn_rate(&AircraftKey::Model("X1".to_string()), FlightPhase::Cruise),
        3_000.0
    );
}
