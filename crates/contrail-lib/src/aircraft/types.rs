//! Aircraft keys, categories and classification confidence.

use std::fmt;

use serde::{Serialize, Serializer};

/// Broad airframe class used when no model-specific profile applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AircraftCategory {
    Narrowbody,
    Widebody,
    Regional,
    Turboprop,
}

impl AircraftCategory {
    pub const ALL: [AircraftCategory; 4] = [
        AircraftCategory::Narrowbody,
        AircraftCategory::Widebody,
        AircraftCategory::Regional,
        AircraftCategory::Turboprop,
    ];

    /// Canonical table key for the category fallback profile.
    pub fn key_name(self) -> &'static str {
        match self {
            AircraftCategory::Narrowbody => "NARROWBODY",
            AircraftCategory::Widebody => "WIDEBODY",
            AircraftCategory::Regional => "REGIONAL",
            AircraftCategory::Turboprop => "TURBOPROP",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            AircraftCategory::Narrowbody => "narrow-body jet",
            AircraftCategory::Widebody => "wide-body jet",
            AircraftCategory::Regional => "regional jet",
            AircraftCategory::Turboprop => "turboprop",
        }
    }

    /// Upper bound on a derived taxi burn rate, kg/hour.
    pub fn taxi_cap_kg_per_hour(self) -> f64 {
        match self {
            AircraftCategory::Narrowbody => 700.0,
            AircraftCategory::Widebody => 1_500.0,
            AircraftCategory::Regional => 400.0,
            AircraftCategory::Turboprop => 150.0,
        }
    }

    /// Parse a canonical category key (`NARROWBODY`, ...), case-insensitive.
    pub fn from_key_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|c| c.key_name() == upper)
    }
}

impl fmt::Display for AircraftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_name())
    }
}

/// Canonical identifier of a burn-rate profile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AircraftKey {
    /// An exact model profile, e.g. `B737-800`. Stored normalized.
    Model(String),
    /// A category fallback profile.
    Category(AircraftCategory),
}

impl AircraftKey {
    /// Build a key from a table name; category names map to category keys.
    pub fn parse(name: &str) -> Self {
        match AircraftCategory::from_key_name(name) {
            Some(category) => AircraftKey::Category(category),
            None => AircraftKey::Model(normalize_type(name)),
        }
    }

    pub fn is_category(&self) -> bool {
        matches!(self, AircraftKey::Category(_))
    }

    pub fn as_category(&self) -> Option<AircraftCategory> {
        match self {
            AircraftKey::Category(category) => Some(*category),
            AircraftKey::Model(_) => None,
        }
    }
}

impl fmt::Display for AircraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AircraftKey::Model(name) => f.write_str(name),
            AircraftKey::Category(category) => f.write_str(category.key_name()),
        }
    }
}

impl Serialize for AircraftKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How directly the burn-rate data matches the reported aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Category fallback.
    Low,
    /// Family or ICAO code mapped to a model profile.
    Medium,
    /// Exact model match.
    High,
}

impl ConfidenceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim, uppercase and collapse internal whitespace.
pub fn normalize_type(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Normalized form with spaces, hyphens and underscores removed.
pub fn compact_type(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_parse_to_category_keys() {
        assert_eq!(
            AircraftKey::parse("widebody"),
            AircraftKey::Category(AircraftCategory::Widebody)
        );
        assert_eq!(
            AircraftKey::parse(" b737-800 "),
            AircraftKey::Model("B737-800".to_string())
        );
    }

    #[test]
    fn normalization_collapses_whitespace() {
        assert_eq!(normalize_type("  boeing   737\t800 "), "BOEING 737 800");
        assert_eq!(compact_type("B737-800"), "B737800");
        assert_eq!(compact_type("dash 8_400"), "DASH8400");
    }

    #[test]
    fn keys_serialize_as_plain_strings() {
        let key = AircraftKey::Category(AircraftCategory::Regional);
        assert_eq!(serde_json::to_string(&key).expect("serializes"), "\"REGIONAL\"");
        assert_eq!(
            serde_json::to_string(&ConfidenceLevel::Medium).expect("serializes"),
            "\"medium\""
        );
    }
}
