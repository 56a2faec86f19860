//! Burn-rate override feeds.
//!
//! An override document adds or replaces model profiles and family aliases:
//!
//! ```json
//! {
//!   "rates": {
//!     "X1": { "taxi": 300, "climb": 5000, "cruise": 3000, "descent": 1200, "sourceHint": "vendor sheet" }
//!   },
//!   "families": { "XX1": "X1" }
//! }
//! ```
//!
//! Every rate field is optional. Entries merge per phase: a rate named in the
//! feed replaces that phase's rate, and phases the feed leaves out keep the
//! rate already stored under the key. New keys start empty, so their missing
//! phases derive from cruise like any other partial profile.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::phases::FlightPhase;

use super::classifier::infer_category;
use super::table::{BurnRateProfile, BurnRateTable, TableProvenance};
use super::types::{AircraftCategory, AircraftKey};

/// Where to read an override document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideSource {
    /// A local JSON file.
    Path(PathBuf),
    /// An `http://` or `https://` URL.
    Url(String),
}

impl OverrideSource {
    /// Interpret a CLI/env string: URLs by scheme, everything else as a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            OverrideSource::Url(trimmed.to_string())
        } else {
            OverrideSource::Path(PathBuf::from(trimmed))
        }
    }

    /// Read the raw document.
    pub fn fetch(&self) -> Result<String> {
        match self {
            OverrideSource::Path(path) => Ok(fs::read_to_string(path)?),
            OverrideSource::Url(url) => fetch_url(url),
        }
    }
}

impl fmt::Display for OverrideSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideSource::Path(path) => write!(f, "{}", path.display()),
            OverrideSource::Url(url) => f.write_str(url),
        }
    }
}

fn fetch_url(url: &str) -> Result<String> {
    let client = build_client()?;
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::OverrideStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text()?)
}

fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(user_agent())
        .build()
        .map_err(Error::Http)
}

fn user_agent() -> String {
    format!("contrail-lib/{version}", version = env!("CARGO_PKG_VERSION"))
}

/// Parsed override document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverrideDocument {
    #[serde(default)]
    pub rates: BTreeMap<String, OverrideRates>,
    #[serde(default)]
    pub families: BTreeMap<String, String>,
}

/// Rates for one key in an override document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRates {
    pub taxi: Option<f64>,
    pub climb: Option<f64>,
    pub cruise: Option<f64>,
    pub descent: Option<f64>,
    pub source_hint: Option<String>,
    /// Category key (`narrowbody`, `widebody`, ...); inferred when absent.
    pub category: Option<String>,
}

impl OverrideDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// What an applied override changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverrideSummary {
    pub source: String,
    pub revision: u64,
    pub rates_applied: usize,
    pub families_applied: usize,
    pub skipped: Vec<String>,
}

/// Build a new table from `base` with `document` merged in.
///
/// `base` is left untouched. Invalid individual entries are skipped and
/// reported in the summary; a document with nothing usable is an error.
pub fn apply_override(
    base: &BurnRateTable,
    document: &OverrideDocument,
    source_name: &str,
) -> Result<(BurnRateTable, OverrideSummary)> {
    let mut table = base.clone();
    let mut summary = OverrideSummary {
        source: source_name.to_string(),
        revision: base.revision() + 1,
        ..OverrideSummary::default()
    };

    for (name, entry) in &document.rates {
        if name.trim().is_empty() {
            summary.skipped.push("rates entry with empty key".to_string());
            continue;
        }
        let key = AircraftKey::parse(name);
        let category = match resolve_category(&key, entry, &table, name) {
            Ok(category) => category,
            Err(reason) => {
                warn!(key = %key, reason = %reason, "skipping override rate entry");
                summary.skipped.push(format!("{key}: {reason}"));
                continue;
            }
        };

        let mut profile = table
            .profile(&key)
            .cloned()
            .unwrap_or_else(|| BurnRateProfile::new(category));
        profile.category = category;
        if let Some(hint) = &entry.source_hint {
            profile.source_hint = Some(hint.clone());
        }
        let mut phases_set = 0;
        let fields = [
            ("taxi", entry.taxi),
            ("climb", entry.climb),
            ("cruise", entry.cruise),
            ("descent", entry.descent),
        ];
        for (field, value) in fields {
            let Some(value) = value else { continue };
            if !value.is_finite() || value <= 0.0 {
                warn!(key = %key, field, value, "ignoring non-positive override rate");
                summary
                    .skipped
                    .push(format!("{key}.{field}: rate must be finite and positive"));
                continue;
            }
            for phase in phases_for_field(field) {
                profile.set_rate(*phase, value);
            }
            phases_set += 1;
        }

        if phases_set == 0 {
            warn!(key = %key, "override entry has no usable rates");
            summary.skipped.push(format!("{key}: no usable rates"));
            continue;
        }

        debug!(key = %key, category = %category, phases_set, "applying override profile");
        table.insert_profile(key, profile);
        summary.rates_applied += 1;
    }

    for (alias, target) in &document.families {
        let key = AircraftKey::parse(target);
        if alias.trim().is_empty() || table.profile(&key).is_none() {
            warn!(alias = %alias, target = %target, "skipping family alias with unknown target");
            summary
                .skipped
                .push(format!("family {alias} -> {target}: unknown target"));
            continue;
        }
        table.insert_family(alias, key);
        summary.families_applied += 1;
    }

    if summary.rates_applied == 0 && summary.families_applied == 0 {
        return Err(Error::OverrideFeedEmpty {
            source_name: source_name.to_string(),
        });
    }

    table.set_provenance(TableProvenance::Override {
        source: source_name.to_string(),
        revision: summary.revision,
    });
    Ok((table, summary))
}

fn phases_for_field(field: &str) -> &'static [FlightPhase] {
    match field {
        "taxi" => &[FlightPhase::TaxiOut, FlightPhase::TaxiIn],
        "climb" => &[FlightPhase::Climb],
        "cruise" => &[FlightPhase::Cruise],
        "descent" => &[FlightPhase::Descent],
        _ => &[],
    }
}

fn resolve_category(
    key: &AircraftKey,
    entry: &OverrideRates,
    table: &BurnRateTable,
    name: &str,
) -> std::result::Result<AircraftCategory, String> {
    if let Some(category) = key.as_category() {
        return Ok(category);
    }
    if let Some(raw) = &entry.category {
        return AircraftCategory::from_key_name(raw)
            .ok_or_else(|| format!("unknown category '{raw}'"));
    }
    Ok(table
        .profile(key)
        .map(|existing| existing.category)
        .unwrap_or_else(|| infer_category(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sources_by_scheme() {
        assert_eq!(
            OverrideSource::parse("https://rates.example/feed.json"),
            OverrideSource::Url("https://rates.example/feed.json".to_string())
        );
        assert_eq!(
            OverrideSource::parse(" ./rates.json "),
            OverrideSource::Path(PathBuf::from("./rates.json"))
        );
    }

    #[test]
    fn applies_rates_and_families_to_a_copy() {
        let base = BurnRateTable::builtin();
        let document = OverrideDocument::from_json(
            r#"{"rates": {"X1": {"cruise": 3000, "sourceHint": "test"}}, "families": {"XX1": "X1"}}"#,
        )
        .expect("valid document");

        let (table, summary) = apply_override(&base, &document, "test-feed").expect("applies");
        let key = AircraftKey::Model("X1".to_string());

        assert_eq!(summary.rates_applied, 1);
        assert_eq!(summary.families_applied, 1);
        assert_eq!(summary.revision, 1);
        assert_eq!(table.get_burn_rate(&key, FlightPhase::Cruise), 3_000.0);
        assert_eq!(table.family("XX1"), Some(&key));
        assert!(base.profile(&key).is_none(), "base table untouched");
    }

    #[test]
    fn skips_invalid_entries_but_keeps_valid_ones() {
        let base = BurnRateTable::builtin();
        let document = OverrideDocument::from_json(
            r#"{"rates": {"BAD": {"cruise": -5}, "GOOD": {"climb": 900, "category": "turboprop"}},
                "families": {"ZZZ": "MISSING"}}"#,
        )
        .expect("valid document");

        let (table, summary) = apply_override(&base, &document, "mixed").expect("applies");
        assert_eq!(summary.rates_applied, 1);
        assert_eq!(summary.families_applied, 0);
        assert_eq!(summary.skipped.len(), 3);
        let good = table
            .profile(&AircraftKey::Model("GOOD".to_string()))
            .expect("good profile");
        assert_eq!(good.category, AircraftCategory::Turboprop);
    }

    #[test]
    fn partial_entry_keeps_existing_phase_rates() {
        let base = BurnRateTable::builtin();
        let key = AircraftKey::Model("B737-800".to_string());
        let document = OverrideDocument::from_json(
            r#"{"rates": {"B737-800": {"cruise": 2600, "sourceHint": "feed"}}}"#,
        )
        .expect("valid document");

        let (table, summary) = apply_override(&base, &document, "partial").expect("applies");
        assert_eq!(summary.rates_applied, 1);
        assert_eq!(table.get_burn_rate(&key, FlightPhase::Cruise), 2_600.0);
        assert_eq!(
            table.get_burn_rate(&key, FlightPhase::Climb),
            base.get_burn_rate(&key, FlightPhase::Climb)
        );
        assert!(!table.resolve_rate(&key, FlightPhase::Descent).derived);
        let profile = table.profile(&key).expect("profile");
        assert_eq!(profile.source_hint.as_deref(), Some("feed"));
        assert_eq!(profile.category, AircraftCategory::Narrowbody);
    }

    #[test]
    fn entry_with_only_invalid_rates_leaves_existing_profile() {
        let base = BurnRateTable::builtin();
        let key = AircraftKey::Model("B737-800".to_string());
        let document = OverrideDocument::from_json(
            r#"{"rates": {"B737-800": {"cruise": 0}}, "families": {"B38X": "B737-800"}}"#,
        )
        .expect("valid document");

        let (table, summary) = apply_override(&base, &document, "zero").expect("applies");
        assert_eq!(summary.rates_applied, 0);
        assert_eq!(table.profile(&key), base.profile(&key));
    }

    #[test]
    fn empty_document_is_rejected() {
        let base = BurnRateTable::builtin();
        let err = apply_override(&base, &OverrideDocument::default(), "empty")
            .expect_err("nothing to apply");
        assert!(matches!(err, Error::OverrideFeedEmpty { .. }));
    }

    #[test]
    fn category_keys_replace_fallback_profiles() {
        let base = BurnRateTable::builtin();
        let document =
            OverrideDocument::from_json(r#"{"rates": {"regional": {"cruise": 1700}}}"#).expect("valid");
        let (table, _) = apply_override(&base, &document, "cat").expect("applies");
        assert_eq!(
            table
                .category_profile(AircraftCategory::Regional)
                .cruise(),
            Some(1_700.0)
        );
    }
}
