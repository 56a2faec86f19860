//! Aircraft classification and burn-rate data.
//!
//! This module is organized into focused submodules:
//!
//! - [`types`] - Aircraft keys, categories and confidence levels
//! - [`table`] - Burn-rate profiles, the rate table and rate derivation
//! - [`defaults`] - Compiled-in rates and family aliases
//! - [`classifier`] - Free-text aircraft type resolution
//! - [`overrides`] - Override feed parsing and merging
//! - [`registry`] - Hot-reloadable handle to the live table
//! - [`constants`] - Derivation multipliers and unit conversion factors
//!
//! # Example
//!
//! ```
//! use contrail_lib::aircraft::{BurnRateTable, ConfidenceLevel};
//! use contrail_lib::phases::FlightPhase;
//!
//! let table = BurnRateTable::builtin();
//! let (key, confidence) = table.normalize_aircraft("B738");
//! assert_eq!(confidence, ConfidenceLevel::Medium);
//! assert!(table.get_burn_rate(&key, FlightPhase::Cruise) > 0.0);
//! ```

pub mod classifier;
pub mod constants;
pub mod defaults;
pub mod overrides;
pub mod registry;
pub mod table;
pub mod types;

pub use classifier::{infer_category, Classification, MatchKind};
pub use constants::{
    CLIMB_CRUISE_MULTIPLIER, CO2_KG_PER_KG_FUEL, DESCENT_CRUISE_MULTIPLIER, GALLONS_PER_LITER,
    JET_A_KG_PER_LITER, TAXI_CRUISE_MULTIPLIER,
};
pub use overrides::{apply_override, OverrideDocument, OverrideRates, OverrideSource, OverrideSummary};
pub use registry::{default_rate_table, RateTableHandle};
pub use table::{BurnRateProfile, BurnRateTable, ResolvedRate, TableProvenance};
pub use types::{AircraftCategory, AircraftKey, ConfidenceLevel};

use crate::phases::FlightPhase;

/// Classify `raw_type` against the process-wide default table.
pub fn normalize_aircraft(raw_type: &str) -> (AircraftKey, ConfidenceLevel) {
    default_rate_table().snapshot().normalize_aircraft(raw_type)
}

/// Burn rate from the process-wide default table, kg/hour.
pub fn get_burn_rate(key: &AircraftKey, phase: FlightPhase) -> f64 {
    default_rate_table().snapshot().get_burn_rate(key, phase)
}

/// Load an override feed into the process-wide default table.
pub fn load_override(source: &OverrideSource) -> bool {
    default_rate_table().load_override(source)
}
