//! Burn-rate profiles and the table that holds them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::phases::FlightPhase;

use super::constants::{
    CLIMB_CRUISE_MULTIPLIER, DESCENT_CRUISE_MULTIPLIER, TAXI_CRUISE_MULTIPLIER,
};
use super::defaults::FALLBACK_PROFILE;
use super::types::{compact_type, AircraftCategory, AircraftKey};

/// Per-phase fuel burn for one aircraft key, in kg/hour.
///
/// Profiles may be partial; missing phases are derived from cruise by
/// [`BurnRateTable::resolve_rate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurnRateProfile {
    pub category: AircraftCategory,
    rates: BTreeMap<FlightPhase, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hint: Option<String>,
}

impl BurnRateProfile {
    pub fn new(category: AircraftCategory) -> Self {
        Self {
            category,
            rates: BTreeMap::new(),
            source_hint: None,
        }
    }

    /// Set the rate for one phase.
    pub fn with_rate(mut self, phase: FlightPhase, kg_per_hour: f64) -> Self {
        self.set_rate(phase, kg_per_hour);
        self
    }

    /// Set the same rate for taxi-out and taxi-in.
    pub fn with_taxi(self, kg_per_hour: f64) -> Self {
        self.with_rate(FlightPhase::TaxiOut, kg_per_hour)
            .with_rate(FlightPhase::TaxiIn, kg_per_hour)
    }

    /// Convenience for the common full profile.
    pub fn full(
        category: AircraftCategory,
        taxi: f64,
        climb: f64,
        cruise: f64,
        descent: f64,
    ) -> Self {
        Self::new(category)
            .with_taxi(taxi)
            .with_rate(FlightPhase::Climb, climb)
            .with_rate(FlightPhase::Cruise, cruise)
            .with_rate(FlightPhase::Descent, descent)
    }

    pub fn with_source_hint(mut self, hint: impl Into<String>) -> Self {
        self.source_hint = Some(hint.into());
        self
    }

    pub(crate) fn set_rate(&mut self, phase: FlightPhase, kg_per_hour: f64) {
        self.rates.insert(phase, kg_per_hour);
    }

    /// Rate defined directly by this profile, if any.
    pub fn rate(&self, phase: FlightPhase) -> Option<f64> {
        self.rates.get(&phase).copied()
    }

    pub fn cruise(&self) -> Option<f64> {
        self.rate(FlightPhase::Cruise)
    }

    pub fn rates(&self) -> &BTreeMap<FlightPhase, f64> {
        &self.rates
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Where a rate table came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableProvenance {
    /// Compiled-in defaults only.
    Builtin,
    /// Defaults plus one or more override feeds; `source` is the latest.
    Override { source: String, revision: u64 },
}

impl TableProvenance {
    pub fn describe(&self) -> String {
        match self {
            TableProvenance::Builtin => "built-in rates".to_string(),
            TableProvenance::Override { source, revision } => {
                format!("override from {source} (revision {revision})")
            }
        }
    }
}

/// A rate resolved for one key and phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedRate {
    pub kg_per_hour: f64,
    /// True when the profile did not define the phase and the rate was
    /// derived from cruise.
    pub derived: bool,
}

/// Burn-rate profiles keyed by aircraft, plus the family alias map used by
/// the classifier.
///
/// Tables are immutable once shared; reloads build a new table and swap it
/// in through [`crate::aircraft::RateTableHandle`].
#[derive(Debug, Clone, PartialEq)]
pub struct BurnRateTable {
    profiles: BTreeMap<AircraftKey, BurnRateProfile>,
    /// Compact alias -> canonical key.
    families: BTreeMap<String, AircraftKey>,
    provenance: TableProvenance,
}

impl BurnRateTable {
    pub(crate) fn from_parts(
        profiles: BTreeMap<AircraftKey, BurnRateProfile>,
        families: BTreeMap<String, AircraftKey>,
        provenance: TableProvenance,
    ) -> Self {
        Self {
            profiles,
            families,
            provenance,
        }
    }

    pub fn provenance(&self) -> &TableProvenance {
        &self.provenance
    }

    /// Number of override feeds applied on top of the built-in rates.
    pub fn revision(&self) -> u64 {
        match &self.provenance {
            TableProvenance::Builtin => 0,
            TableProvenance::Override { revision, .. } => *revision,
        }
    }

    pub(crate) fn set_provenance(&mut self, provenance: TableProvenance) {
        self.provenance = provenance;
    }

    /// Profile stored under exactly this key.
    pub fn profile(&self, key: &AircraftKey) -> Option<&BurnRateProfile> {
        self.profiles.get(key)
    }

    /// All profiles in key order.
    pub fn profiles(&self) -> impl Iterator<Item = (&AircraftKey, &BurnRateProfile)> {
        self.profiles.iter()
    }

    /// Model keys (excluding category fallbacks) in key order.
    pub fn model_keys(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().filter_map(|key| match key {
            AircraftKey::Model(name) => Some(name.as_str()),
            AircraftKey::Category(_) => None,
        })
    }

    /// Canonical key registered for a family alias or ICAO code.
    pub fn family(&self, alias: &str) -> Option<&AircraftKey> {
        self.families.get(&compact_type(alias))
    }

    pub fn families(&self) -> impl Iterator<Item = (&String, &AircraftKey)> {
        self.families.iter()
    }

    pub(crate) fn insert_profile(&mut self, key: AircraftKey, profile: BurnRateProfile) {
        self.profiles.insert(key, profile);
    }

    pub(crate) fn insert_family(&mut self, alias: &str, key: AircraftKey) {
        self.families.insert(compact_type(alias), key);
    }

    /// Category fallback profile; the compiled-in narrow-body profile when the
    /// table lacks one.
    pub fn category_profile(&self, category: AircraftCategory) -> &BurnRateProfile {
        self.profiles
            .get(&AircraftKey::Category(category))
            .unwrap_or(&*FALLBACK_PROFILE)
    }

    /// Profile used for `key`. Unknown keys resolve to the narrow-body
    /// category profile.
    pub fn effective_profile(&self, key: &AircraftKey) -> &BurnRateProfile {
        match self.profiles.get(key) {
            Some(profile) => profile,
            None => match key {
                AircraftKey::Category(category) => self.category_profile(*category),
                AircraftKey::Model(_) => self.category_profile(AircraftCategory::Narrowbody),
            },
        }
    }

    /// Burn rate for `key` during `phase`, in kg/hour.
    pub fn get_burn_rate(&self, key: &AircraftKey, phase: FlightPhase) -> f64 {
        self.resolve_rate(key, phase).kg_per_hour
    }

    /// Burn rate plus whether it had to be derived.
    ///
    /// Missing phases derive from cruise: climb = cruise × 1.8,
    /// descent = cruise × 0.5, taxi = min(cruise × 0.25, category taxi cap).
    /// A profile without cruise borrows its category's cruise rate.
    pub fn resolve_rate(&self, key: &AircraftKey, phase: FlightPhase) -> ResolvedRate {
        let profile = self.effective_profile(key);
        if let Some(kg_per_hour) = profile.rate(phase) {
            return ResolvedRate {
                kg_per_hour,
                derived: false,
            };
        }

        let cruise = self.cruise_for(profile);
        let kg_per_hour = match phase {
            FlightPhase::Cruise => cruise,
            FlightPhase::Climb => cruise * CLIMB_CRUISE_MULTIPLIER,
            FlightPhase::Descent => cruise * DESCENT_CRUISE_MULTIPLIER,
            FlightPhase::TaxiOut | FlightPhase::TaxiIn => (cruise * TAXI_CRUISE_MULTIPLIER)
                .min(profile.category.taxi_cap_kg_per_hour()),
        };

        ResolvedRate {
            kg_per_hour,
            derived: true,
        }
    }

    fn cruise_for(&self, profile: &BurnRateProfile) -> f64 {
        profile
            .cruise()
            .or_else(|| self.category_profile(profile.category).cruise())
            .or_else(|| FALLBACK_PROFILE.cruise())
            .unwrap_or_default()
    }

    /// Closest known model keys to `raw`, best first.
    pub fn suggest_models(&self, raw: &str, limit: usize) -> Vec<String> {
        let needle = compact_type(raw);
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &str)> = self
            .model_keys()
            .map(|name| (strsim::jaro_winkler(&needle, &compact_type(name)), name))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }
}

const SUGGESTION_THRESHOLD: f64 = 0.75;
