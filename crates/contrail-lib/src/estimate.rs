//! Fuel and CO2 estimation from an altitude series.
//!
//! The estimator ties the classifier, the phase segmentation engine and the
//! burn-rate table together:
//!
//! 1. classify the aircraft type into a rate key and confidence;
//! 2. segment the altitude series into phase slices;
//! 3. integrate `rate × duration` per slice;
//! 4. convert to volume and CO2 and record the assumptions used.
//!
//! Estimation never fails: degenerate input yields a zero estimate with an
//! explanatory note, unknown aircraft fall back to a category profile.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::aircraft::{
    default_rate_table, AircraftCategory, AircraftKey, BurnRateTable, ConfidenceLevel,
    RateTableHandle, TableProvenance, CO2_KG_PER_KG_FUEL, GALLONS_PER_LITER, JET_A_KG_PER_LITER,
};
use crate::error::Result;
use crate::phases::{detect_phases, AltitudeSample, FlightPhase, PhaseDetectionConfig, PhaseSlice};

/// Note recorded when segmentation produced nothing to integrate.
pub const NO_PHASES_DETECTED: &str = "no phases detected";

/// Number of similar model keys listed for low-confidence results.
const SIMILAR_MODEL_LIMIT: usize = 3;

/// Rate and fuel attributed to one phase slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseRateAssumption {
    pub phase: FlightPhase,
    pub duration_seconds: f64,
    pub rate_kg_per_hour: f64,
    /// The profile lacked this phase and the rate was derived from cruise.
    pub rate_derived: bool,
    pub fuel_kg: f64,
}

/// Everything a reader needs to judge an estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateAssumptions {
    pub aircraft_key: AircraftKey,
    pub confidence: ConfidenceLevel,
    /// Category of the profile the rates came from.
    pub category: AircraftCategory,
    pub rate_table: TableProvenance,
    pub segmentation: PhaseDetectionConfig,
    /// One entry per phase slice, in flight order.
    pub phases: Vec<PhaseRateAssumption>,
    pub fuel_density_kg_per_liter: f64,
    pub co2_kg_per_kg_fuel: f64,
    /// Plain-language statement present whenever a category fallback was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub similar_models: Vec<String>,
    pub notes: Vec<String>,
}

impl EstimateAssumptions {
    /// True when the estimate carries the "no phases detected" marker.
    pub fn no_phases_detected(&self) -> bool {
        self.notes.iter().any(|note| note == NO_PHASES_DETECTED)
    }
}

/// Fuel and CO2 estimate for one flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelEstimate {
    pub flight_id: String,
    pub raw_aircraft_type: String,
    pub aircraft_key: AircraftKey,
    pub fuel_kg: f64,
    pub fuel_liters: f64,
    pub fuel_gallons: f64,
    pub co2_kg: f64,
    pub confidence: ConfidenceLevel,
    pub phases: Vec<PhaseSlice>,
    pub phase_fuel: BTreeMap<FlightPhase, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_nm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_per_nm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nm_per_gallon: Option<f64>,
    pub assumptions: EstimateAssumptions,
}

/// Estimator bound to a rate table handle and segmentation settings.
#[derive(Debug, Clone)]
pub struct FuelEstimator {
    rates: RateTableHandle,
    config: PhaseDetectionConfig,
}

impl Default for FuelEstimator {
    /// Estimator over the process-wide default table with segmentation
    /// settings from [`PhaseDetectionConfig::from_env`].
    fn default() -> Self {
        Self {
            rates: default_rate_table().clone(),
            config: valid_or_default(PhaseDetectionConfig::from_env()),
        }
    }
}

/// Fall back to the built-in settings when `config` fails validation.
fn valid_or_default(config: PhaseDetectionConfig) -> PhaseDetectionConfig {
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            warn!(error = %err, "ignoring invalid phase detection settings from the environment");
            PhaseDetectionConfig::default()
        }
    }
}

impl FuelEstimator {
    pub fn new(rates: RateTableHandle) -> Self {
        Self {
            rates,
            config: PhaseDetectionConfig::default(),
        }
    }

    /// Estimator with custom segmentation settings.
    pub fn with_config(rates: RateTableHandle, config: PhaseDetectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { rates, config })
    }

    pub fn rates(&self) -> &RateTableHandle {
        &self.rates
    }

    pub fn config(&self) -> &PhaseDetectionConfig {
        &self.config
    }

    /// Estimate fuel burn and CO2 for a flight.
    ///
    /// The rate table is read once per call, so a concurrent reload is either
    /// fully visible or not at all.
    pub fn estimate_fuel(
        &self,
        flight_id: &str,
        aircraft_type: &str,
        samples: &[AltitudeSample],
        distance_nm: Option<f64>,
    ) -> FuelEstimate {
        let table = self.rates.snapshot();
        estimate_with_table(&table, &self.config, flight_id, aircraft_type, samples, distance_nm)
    }
}

/// Estimate against the process-wide default table.
///
/// Segmentation follows [`PhaseDetectionConfig::from_env`], the same settings
/// the command-line tool uses.
///
/// # Examples
/// ```
/// use contrail_lib::{estimate_fuel, AltitudeSample, ConfidenceLevel};
///
/// let minute = 60.0;
/// let samples: Vec<AltitudeSample> = vec![
///     (0.0, 0.0).into(),
///     (10.0 * minute, 0.0).into(),
///     (30.0 * minute, 35_000.0).into(),
///     (90.0 * minute, 35_000.0).into(),
///     (110.0 * minute, 0.0).into(),
///     (120.0 * minute, 0.0).into(),
/// ];
/// let estimate = estimate_fuel("F1", "B737-800", &samples, Some(500.0));
/// assert_eq!(estimate.confidence, ConfidenceLevel::High);
/// assert!(estimate.fuel_kg > 0.0);
/// ```
pub fn estimate_fuel(
    flight_id: &str,
    aircraft_type: &str,
    samples: &[AltitudeSample],
    distance_nm: Option<f64>,
) -> FuelEstimate {
    FuelEstimator::default().estimate_fuel(flight_id, aircraft_type, samples, distance_nm)
}

/// Estimate against an explicit table snapshot.
pub fn estimate_with_table(
    table: &BurnRateTable,
    config: &PhaseDetectionConfig,
    flight_id: &str,
    aircraft_type: &str,
    samples: &[AltitudeSample],
    distance_nm: Option<f64>,
) -> FuelEstimate {
    let (key, confidence) = table.normalize_aircraft(aircraft_type);
    let category = table.effective_profile(&key).category;
    let phases = detect_phases(samples, config);

    let mut assumptions = EstimateAssumptions {
        aircraft_key: key.clone(),
        confidence,
        category,
        rate_table: table.provenance().clone(),
        segmentation: *config,
        phases: Vec::with_capacity(phases.len()),
        fuel_density_kg_per_liter: JET_A_KG_PER_LITER,
        co2_kg_per_kg_fuel: CO2_KG_PER_KG_FUEL,
        fallback: None,
        similar_models: Vec::new(),
        notes: Vec::new(),
    };
    if confidence == ConfidenceLevel::Low {
        assumptions.fallback = Some(fallback_statement(aircraft_type, category));
        assumptions.similar_models = table.suggest_models(aircraft_type, SIMILAR_MODEL_LIMIT);
    }
    let distance_nm = distance_nm.filter(|d| d.is_finite() && *d > 0.0);

    if phases.is_empty() {
        assumptions.notes.push(NO_PHASES_DETECTED.to_string());
        debug!(flight_id, samples = samples.len(), "no phases detected; zero estimate");
        return FuelEstimate {
            flight_id: flight_id.to_string(),
            raw_aircraft_type: aircraft_type.to_string(),
            aircraft_key: key,
            fuel_kg: 0.0,
            fuel_liters: 0.0,
            fuel_gallons: 0.0,
            co2_kg: 0.0,
            confidence,
            phases,
            phase_fuel: BTreeMap::new(),
            distance_nm,
            fuel_per_nm: None,
            nm_per_gallon: None,
            assumptions,
        };
    }

    let mut fuel_kg = 0.0;
    let mut phase_fuel: BTreeMap<FlightPhase, f64> = BTreeMap::new();
    for slice in &phases {
        let rate = table.resolve_rate(&key, slice.phase);
        let slice_fuel = rate.kg_per_hour * slice.duration_seconds / 3600.0;
        fuel_kg += slice_fuel;
        *phase_fuel.entry(slice.phase).or_insert(0.0) += slice_fuel;
        assumptions.phases.push(PhaseRateAssumption {
            phase: slice.phase,
            duration_seconds: slice.duration_seconds,
            rate_kg_per_hour: rate.kg_per_hour,
            rate_derived: rate.derived,
            fuel_kg: slice_fuel,
        });
    }

    let fuel_liters = fuel_kg / JET_A_KG_PER_LITER;
    let fuel_gallons = fuel_liters * GALLONS_PER_LITER;
    let co2_kg = fuel_kg * CO2_KG_PER_KG_FUEL;

    let (fuel_per_nm, nm_per_gallon) = match distance_nm {
        Some(distance) => (
            Some(fuel_kg / distance),
            (fuel_gallons > 0.0).then(|| distance / fuel_gallons),
        ),
        None => (None, None),
    };

    assumptions.notes.extend(coverage_notes(&phases));

    debug!(
        flight_id,
        key = %key,
        confidence = %confidence,
        slices = phases.len(),
        fuel_kg,
        "fuel estimate computed"
    );

    FuelEstimate {
        flight_id: flight_id.to_string(),
        raw_aircraft_type: aircraft_type.to_string(),
        aircraft_key: key,
        fuel_kg,
        fuel_liters,
        fuel_gallons,
        co2_kg,
        confidence,
        phases,
        phase_fuel,
        distance_nm,
        fuel_per_nm,
        nm_per_gallon,
        assumptions,
    }
}

fn fallback_statement(raw_type: &str, category: AircraftCategory) -> String {
    let shown = raw_type.trim();
    let shown = if shown.is_empty() { "<empty>" } else { shown };
    format!(
        "No burn-rate profile matches aircraft type '{shown}'; \
         applied the average {} profile ({}) instead, so this estimate may differ \
         substantially from the actual aircraft.",
        category.label(),
        category.key_name()
    )
}

/// Notes describing how much of the flight the telemetry covered.
fn coverage_notes(phases: &[PhaseSlice]) -> Vec<String> {
    let mut notes = Vec::new();
    if let Some(first) = phases.first() {
        if first.phase != FlightPhase::TaxiOut {
            notes.push(format!(
                "telemetry starts in {}; no taxi-out fuel included",
                first.phase.label().to_lowercase()
            ));
        }
    }
    if let Some(last) = phases.last() {
        if last.phase != FlightPhase::TaxiIn {
            notes.push(format!(
                "telemetry ends in {}; no taxi-in fuel included",
                last.phase.label().to_lowercase()
            ));
        }
    }
    let filled: f64 = phases
        .iter()
        .filter(|slice| slice.sample_count == 0)
        .map(|slice| slice.duration_seconds)
        .sum();
    if filled > 0.0 {
        notes.push(format!(
            "{:.0} s of telemetry gaps filled from the preceding phase",
            filled
        ));
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_cruise() -> Vec<AltitudeSample> {
        (0..=60)
            .map(|i| AltitudeSample::new(i as f64 * 60.0, 35_000.0))
            .collect()
    }

    #[test]
    fn default_estimator_reads_settings_from_environment() {
        let estimator = FuelEstimator::default();
        assert_eq!(
            estimator.config(),
            &valid_or_default(PhaseDetectionConfig::from_env())
        );
    }

    #[test]
    fn invalid_environment_settings_fall_back_to_defaults() {
        let tuned = PhaseDetectionConfig {
            merge_threshold_secs: 300.0,
            ..PhaseDetectionConfig::default()
        };
        assert_eq!(valid_or_default(tuned), tuned);

        let broken = PhaseDetectionConfig {
            leveling_tolerance_ft: -1.0,
            ..PhaseDetectionConfig::default()
        };
        assert_eq!(valid_or_default(broken), PhaseDetectionConfig::default());
    }

    #[test]
    fn cruise_only_flight_notes_missing_taxi() {
        let estimator = FuelEstimator::new(RateTableHandle::builtin());
        let estimate = estimator.estimate_fuel("C1", "A320", &flat_cruise(), None);

        assert_eq!(estimate.phases.len(), 1);
        assert_eq!(estimate.phases[0].phase, FlightPhase::Cruise);
        assert!((estimate.fuel_kg - 2_450.0).abs() < 1e-6);
        assert!(estimate
            .assumptions
            .notes
            .iter()
            .any(|n| n.contains("no taxi-out")));
        assert!(estimate.fuel_per_nm.is_none());
    }

    #[test]
    fn low_confidence_explains_fallback() {
        let estimator = FuelEstimator::new(RateTableHandle::builtin());
        let estimate = estimator.estimate_fuel("C2", "Mystery Jet 9000", &flat_cruise(), None);

        assert_eq!(estimate.confidence, ConfidenceLevel::Low);
        let fallback = estimate.assumptions.fallback.expect("fallback statement");
        assert!(fallback.contains("Mystery Jet 9000"));
        assert!(fallback.contains("NARROWBODY"));
    }

    #[test]
    fn zero_distance_omits_efficiency_fields() {
        let estimator = FuelEstimator::new(RateTableHandle::builtin());
        let estimate = estimator.estimate_fuel("C3", "A320", &flat_cruise(), Some(0.0));
        assert!(estimate.fuel_per_nm.is_none());
        assert!(estimate.nm_per_gallon.is_none());
        assert!(estimate.distance_nm.is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PhaseDetectionConfig {
            merge_threshold_secs: -1.0,
            ..PhaseDetectionConfig::default()
        };
        assert!(FuelEstimator::with_config(RateTableHandle::builtin(), config).is_err());
    }
}
