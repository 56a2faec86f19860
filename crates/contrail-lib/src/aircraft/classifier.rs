//! Free-text aircraft type resolution.

use tracing::debug;

use super::table::BurnRateTable;
use super::types::{compact_type, normalize_type, AircraftCategory, AircraftKey, ConfidenceLevel};

/// Keyword sets checked against the compact type string, most specific
/// category first. Anything unmatched falls back to narrow-body.
const CATEGORY_KEYWORDS: &[(AircraftCategory, &[&str])] = &[
    (
        AircraftCategory::Turboprop,
        &[
            "TURBOPROP", "ATR", "DASH8", "DH8", "DHC6", "DHC8", "Q200", "Q300", "Q400", "SAAB340",
            "SAAB2000", "SF34", "SB20", "JS31", "JS32", "JS41", "D328", "B190", "BEECH1900",
            "BE20", "KINGAIR", "PC12", "C208", "CARAVAN", "TWINOTTER", "E120", "BRASILIA", "F50",
            "FOKKER50", "L410", "AT4", "AT7",
        ],
    ),
    (
        AircraftCategory::Regional,
        &[
            "REGIONAL", "CRJ", "ERJ", "EMB", "EJET", "E170", "E175", "E190", "E195", "E75", "E17",
            "E19", "E29", "ARJ", "SSJ", "SUPERJET", "RJ70", "RJ85", "RJ100", "BAE146", "B461",
            "B462", "B463", "F70", "F100", "MRJ", "SPACEJET",
        ],
    ),
    (
        AircraftCategory::Widebody,
        &[
            "WIDEBODY", "WIDE", "HEAVY", "JUMBO", "DREAMLINER", "747", "767", "777", "787", "B74",
            "B76", "B77", "B78", "A300", "A310", "A30B", "A33", "A34", "A35", "A38", "DC10",
            "MD11", "L101", "IL86", "IL96",
        ],
    ),
    (
        AircraftCategory::Narrowbody,
        &[
            "NARROWBODY", "NARROW", "737", "757", "B73", "B75", "B712", "B717", "A318", "A319",
            "A320", "A321", "A31", "A32", "A22", "BCS", "MD8", "MD9", "DC9", "C919", "T204",
            "TU204",
        ],
    ),
];

/// Outcome of classifying an aircraft type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub key: AircraftKey,
    pub confidence: ConfidenceLevel,
    pub matched_by: MatchKind,
}

/// Which classification tier produced the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Normalized input equals a model key.
    Exact,
    /// Input is a registered family alias or ICAO designator, or a spacing
    /// variant of a model key.
    Family,
    /// A category keyword was found in the input.
    Keyword,
    /// Nothing matched; narrow-body assumed.
    Default,
}

impl BurnRateTable {
    /// Resolve a free-text aircraft type to a rate key and confidence.
    ///
    /// 1. exact model key (after trim/uppercase) → High
    /// 2. family alias, ICAO designator, or model key ignoring spacing → Medium
    /// 3. category keyword → Low with that category
    /// 4. otherwise → Low, narrow-body
    pub fn classify(&self, raw_type: &str) -> Classification {
        let normalized = normalize_type(raw_type);
        let exact = AircraftKey::Model(normalized.clone());
        if !normalized.is_empty() && self.profile(&exact).is_some() {
            return Classification {
                key: exact,
                confidence: ConfidenceLevel::High,
                matched_by: MatchKind::Exact,
            };
        }

        let compact = compact_type(&normalized);
        if !compact.is_empty() {
            if let Some(key) = self.family(&compact) {
                return Classification {
                    key: key.clone(),
                    confidence: ConfidenceLevel::Medium,
                    matched_by: MatchKind::Family,
                };
            }
            if let Some(name) = self.model_keys().find(|name| compact_type(name) == compact) {
                return Classification {
                    key: AircraftKey::Model(name.to_string()),
                    confidence: ConfidenceLevel::Medium,
                    matched_by: MatchKind::Family,
                };
            }
        }

        let (category, matched_by) = match category_from_keywords(&compact) {
            Some(category) => (category, MatchKind::Keyword),
            None => (AircraftCategory::Narrowbody, MatchKind::Default),
        };
        debug!(
            raw = raw_type,
            category = %category,
            "aircraft type resolved to category fallback"
        );
        Classification {
            key: AircraftKey::Category(category),
            confidence: ConfidenceLevel::Low,
            matched_by,
        }
    }

    /// Tuple form of [`BurnRateTable::classify`].
    pub fn normalize_aircraft(&self, raw_type: &str) -> (AircraftKey, ConfidenceLevel) {
        let classification = self.classify(raw_type);
        (classification.key, classification.confidence)
    }
}

/// Category whose keyword set matches the compact type string, if any.
pub fn category_from_keywords(compact: &str) -> Option<AircraftCategory> {
    if compact.is_empty() {
        return None;
    }
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| compact.contains(kw)))
        .map(|(category, _)| *category)
}

/// Best-guess category for a type string, narrow-body when nothing matches.
pub fn infer_category(raw_type: &str) -> AircraftCategory {
    category_from_keywords(&compact_type(raw_type)).unwrap_or(AircraftCategory::Narrowbody)
}
