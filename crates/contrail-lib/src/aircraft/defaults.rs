//! Compiled-in burn rates and family aliases.
//!
//! Rates are block-average figures in kg/hour for typical stage lengths and
//! loads. They are deliberately coarse; deployments with better data replace
//! or extend them through an override feed.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::phases::FlightPhase;

use super::table::{BurnRateProfile, BurnRateTable, TableProvenance};
use super::types::{compact_type, AircraftCategory, AircraftKey};

const NARROWBODY_CRUISE: f64 = 2_500.0;
const WIDEBODY_CRUISE: f64 = 6_500.0;
const REGIONAL_CRUISE: f64 = 1_600.0;
const TURBOPROP_CRUISE: f64 = 650.0;

/// Narrow-body profile used when a table somehow lacks category entries.
pub(crate) static FALLBACK_PROFILE: Lazy<BurnRateProfile> = Lazy::new(|| {
    BurnRateProfile::new(AircraftCategory::Narrowbody)
        .with_rate(FlightPhase::Cruise, NARROWBODY_CRUISE)
});

/// (key, category, taxi, climb, cruise, descent)
const FULL_PROFILES: &[(&str, AircraftCategory, f64, f64, f64, f64)] = &[
    ("A220-300", AircraftCategory::Narrowbody, 450.0, 3_000.0, 1_800.0, 700.0),
    ("A319", AircraftCategory::Narrowbody, 540.0, 3_700.0, 2_200.0, 850.0),
    ("A320", AircraftCategory::Narrowbody, 580.0, 4_000.0, 2_450.0, 950.0),
    ("A320NEO", AircraftCategory::Narrowbody, 540.0, 3_600.0, 2_150.0, 850.0),
    ("A321", AircraftCategory::Narrowbody, 650.0, 4_700.0, 2_850.0, 1_100.0),
    ("A321NEO", AircraftCategory::Narrowbody, 600.0, 4_200.0, 2_500.0, 980.0),
    ("B737-700", AircraftCategory::Narrowbody, 560.0, 3_900.0, 2_300.0, 900.0),
    ("B737-800", AircraftCategory::Narrowbody, 600.0, 4_400.0, 2_530.0, 1_000.0),
    ("B737 MAX 8", AircraftCategory::Narrowbody, 560.0, 4_000.0, 2_230.0, 880.0),
    ("B757-200", AircraftCategory::Narrowbody, 800.0, 5_800.0, 3_300.0, 1_300.0),
    ("A330-300", AircraftCategory::Widebody, 1_200.0, 10_200.0, 5_700.0, 2_300.0),
    ("A350-900", AircraftCategory::Widebody, 1_100.0, 10_500.0, 5_800.0, 2_300.0),
    ("B747-400", AircraftCategory::Widebody, 1_500.0, 19_000.0, 10_500.0, 4_200.0),
    ("B767-300ER", AircraftCategory::Widebody, 1_200.0, 9_000.0, 4_900.0, 2_000.0),
    ("B777-300ER", AircraftCategory::Widebody, 1_400.0, 13_500.0, 7_500.0, 3_000.0),
    ("B787-9", AircraftCategory::Widebody, 1_100.0, 10_000.0, 5_600.0, 2_200.0),
    ("CRJ700", AircraftCategory::Regional, 320.0, 2_300.0, 1_300.0, 520.0),
    ("CRJ900", AircraftCategory::Regional, 350.0, 2_600.0, 1_450.0, 580.0),
    ("E175", AircraftCategory::Regional, 350.0, 2_700.0, 1_500.0, 600.0),
    ("E190", AircraftCategory::Regional, 400.0, 3_200.0, 1_800.0, 700.0),
    ("ATR 72", AircraftCategory::Turboprop, 120.0, 1_000.0, 700.0, 350.0),
    ("DASH 8-400", AircraftCategory::Turboprop, 150.0, 1_400.0, 1_000.0, 450.0),
];

/// ICAO designators and common spellings mapped to model keys.
const FAMILY_ALIASES: &[(&str, &str)] = &[
    ("A20N", "A320NEO"),
    ("A21N", "A321NEO"),
    ("A333", "A330-300"),
    ("A359", "A350-900"),
    ("A388", "A380-800"),
    ("AIRBUS A320", "A320"),
    ("AT43", "ATR 42"),
    ("AT45", "ATR 42"),
    ("AT46", "ATR 42"),
    ("AT72", "ATR 72"),
    ("AT75", "ATR 72"),
    ("AT76", "ATR 72"),
    ("B37M", "B737 MAX 8"),
    ("B38M", "B737 MAX 8"),
    ("B737", "B737-700"),
    ("B738", "B737-800"),
    ("B744", "B747-400"),
    ("B752", "B757-200"),
    ("B763", "B767-300ER"),
    ("B77W", "B777-300ER"),
    ("B789", "B787-9"),
    ("BCS3", "A220-300"),
    ("BOEING 737-800", "B737-800"),
    ("737-800", "B737-800"),
    ("CRJ7", "CRJ700"),
    ("CRJ9", "CRJ900"),
    ("DH8D", "DASH 8-400"),
    ("E75L", "E175"),
    ("E75S", "E175"),
    ("Q400", "DASH 8-400"),
];

impl BurnRateTable {
    /// Table holding only the compiled-in profiles and aliases.
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();

        for &(name, category, taxi, climb, cruise, descent) in FULL_PROFILES {
            profiles.insert(
                AircraftKey::parse(name),
                BurnRateProfile::full(category, taxi, climb, cruise, descent)
                    .with_source_hint("built-in"),
            );
        }

        // Partial profiles: missing phases derive from cruise.
        profiles.insert(
            AircraftKey::parse("A380-800"),
            BurnRateProfile::new(AircraftCategory::Widebody)
                .with_rate(FlightPhase::Cruise, 11_000.0)
                .with_source_hint("built-in"),
        );
        profiles.insert(
            AircraftKey::parse("ATR 42"),
            BurnRateProfile::new(AircraftCategory::Turboprop)
                .with_rate(FlightPhase::Climb, 800.0)
                .with_rate(FlightPhase::Cruise, 560.0)
                .with_source_hint("built-in"),
        );

        for (category, cruise) in [
            (AircraftCategory::Narrowbody, NARROWBODY_CRUISE),
            (AircraftCategory::Widebody, WIDEBODY_CRUISE),
            (AircraftCategory::Regional, REGIONAL_CRUISE),
            (AircraftCategory::Turboprop, TURBOPROP_CRUISE),
        ] {
            profiles.insert(
                AircraftKey::Category(category),
                BurnRateProfile::new(category)
                    .with_rate(FlightPhase::Cruise, cruise)
                    .with_source_hint("category average"),
            );
        }

        let families = FAMILY_ALIASES
            .iter()
            .map(|&(alias, key)| (compact_type(alias), AircraftKey::parse(key)))
            .collect();

        BurnRateTable::from_parts(profiles, families, TableProvenance::Builtin)
    }
}

impl Default for BurnRateTable {
    fn default() -> Self {
        Self::builtin()
    }
}
