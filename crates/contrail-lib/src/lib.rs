//! Contrail library entry points.
//!
//! This crate turns a flight's altitude time series and a free-text aircraft
//! type into a fuel burn and CO2 estimate. It segments the series into flight
//! phases, resolves the aircraft to a burn-rate profile and integrates burn
//! rates over phase durations. Higher-level consumers (the CLI) should only
//! depend on the functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod aircraft;
pub mod error;
pub mod estimate;
pub mod output;
pub mod phases;
pub mod samples;

pub use aircraft::{
    default_rate_table, get_burn_rate, load_override, normalize_aircraft, AircraftCategory,
    AircraftKey, BurnRateProfile, BurnRateTable, ConfidenceLevel, OverrideSource,
    OverrideSummary, RateTableHandle,
};
pub use error::{Error, Result};
pub use estimate::{
    estimate_fuel, EstimateAssumptions, FuelEstimate, FuelEstimator, PhaseRateAssumption,
    NO_PHASES_DETECTED,
};
pub use output::{EstimateSummary, PhaseSummary, SummaryRenderMode};
pub use phases::{detect_phases, AltitudeSample, FlightPhase, PhaseDetectionConfig, PhaseSlice};
pub use samples::{load_samples, samples_from_csv, samples_from_json};
