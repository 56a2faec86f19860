//! Altitude sample loading.
//!
//! Two file formats are accepted:
//!
//! - CSV with a timestamp column and an altitude column. Header names are
//!   matched loosely (`timestamp`, `time`, `ts`, `t` / `altitude_ft`,
//!   `altitude`, `alt`, `baro_altitude`).
//! - JSON holding an array of `{"timestamp": .., "altitude_ft": ..}` objects
//!   or `[timestamp, altitude]` pairs.
//!
//! Timestamps are either seconds (any epoch) or RFC 3339 strings.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::DateTime;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::phases::AltitudeSample;

const TIMESTAMP_HEADERS: &[&str] = &["timestamp", "time", "ts", "t", "epoch", "seconds"];
const ALTITUDE_HEADERS: &[&str] = &[
    "altitude_ft",
    "altitude",
    "alt",
    "alt_ft",
    "baro_altitude",
    "baro_altitude_ft",
];

/// Load samples from a CSV or JSON file.
///
/// Files ending in `.json`, or whose first non-blank byte opens a JSON array,
/// are read as JSON; everything else as CSV.
pub fn load_samples(path: &Path) -> Result<Vec<AltitudeSample>> {
    let text = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
        || text.trim_start().starts_with('[');

    let samples = if is_json {
        samples_from_json(&text)?
    } else {
        samples_from_csv(text.as_bytes())?
    };
    debug!(path = %path.display(), count = samples.len(), "loaded altitude samples");
    Ok(samples)
}

/// Parse CSV sample rows from a reader.
pub fn samples_from_csv<R: Read>(reader: R) -> Result<Vec<AltitudeSample>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|err| Error::SampleData {
            message: format!("failed to read CSV headers: {err}"),
        })?
        .clone();

    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
    let mut columns: BTreeMap<&str, usize> = BTreeMap::new();
    for (canon, alts) in [("timestamp", TIMESTAMP_HEADERS), ("altitude_ft", ALTITUDE_HEADERS)] {
        if let Some(index) = alts
            .iter()
            .find_map(|alt| normalized.iter().position(|h| h == alt))
        {
            columns.insert(canon, index);
        }
    }

    let missing: Vec<&str> = ["timestamp", "altitude_ft"]
        .into_iter()
        .filter(|c| !columns.contains_key(c))
        .collect();
    if !missing.is_empty() {
        return Err(Error::SampleData {
            message: format!(
                "CSV missing required columns: {}. Available: {}",
                missing.join(", "),
                headers.iter().collect::<Vec<_>>().join(", ")
            ),
        });
    }
    let ts_col = columns["timestamp"];
    let alt_col = columns["altitude_ft"];

    let mut samples = Vec::new();
    // Header is line 1.
    let mut row: usize = 1;
    for result in csv_reader.records() {
        row += 1;
        let record = result.map_err(|err| Error::SampleData {
            message: format!("row {row}: {err}"),
        })?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let raw_ts = record.get(ts_col).unwrap_or_default();
        let raw_alt = record.get(alt_col).unwrap_or_default();
        let timestamp = parse_timestamp(raw_ts).map_err(|message| Error::SampleData {
            message: format!("row {row}: {message}"),
        })?;
        let altitude_ft = parse_number(raw_alt, "altitude").map_err(|message| Error::SampleData {
            message: format!("row {row}: {message}"),
        })?;
        samples.push(AltitudeSample::new(timestamp, altitude_ft));
    }
    Ok(samples)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimestampValue {
    Seconds(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SampleRecord {
    Pair(TimestampValue, f64),
    Object {
        #[serde(alias = "time", alias = "ts", alias = "t")]
        timestamp: TimestampValue,
        #[serde(alias = "altitude", alias = "alt", alias = "baro_altitude", alias = "altitudeFt")]
        altitude_ft: f64,
    },
}

/// Parse a JSON array of sample objects or `[t, alt]` pairs.
pub fn samples_from_json(text: &str) -> Result<Vec<AltitudeSample>> {
    let records: Vec<serde_json::Value> = serde_json::from_str(text)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let record: SampleRecord =
                serde_json::from_value(value).map_err(|err| Error::SampleData {
                    message: format!("entry {index}: {err}"),
                })?;
            let (timestamp, altitude_ft) = match record {
                SampleRecord::Pair(ts, alt) => (ts, alt),
                SampleRecord::Object {
                    timestamp,
                    altitude_ft,
                } => (timestamp, altitude_ft),
            };
            let timestamp = match timestamp {
                TimestampValue::Seconds(seconds) => Ok(seconds),
                TimestampValue::Text(text) => parse_timestamp(&text),
            }
            .map_err(|message| Error::SampleData {
                message: format!("entry {index}: {message}"),
            })?;
            Ok(AltitudeSample::new(timestamp, altitude_ft))
        })
        .collect()
}

fn normalize_header(header: &str) -> String {
    header
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Seconds, or an RFC 3339 instant converted to Unix seconds.
fn parse_timestamp(raw: &str) -> std::result::Result<f64, String> {
    let raw = raw.trim();
    if let Ok(seconds) = parse_number(raw, "timestamp") {
        return Ok(seconds);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.timestamp_millis() as f64 / 1000.0)
        .map_err(|err| format!("invalid timestamp '{raw}': {err}"))
}

fn parse_number(raw: &str, field: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("invalid {field} '{raw}': {err}"))?;
    if !value.is_finite() {
        return Err(format!("{field} must be finite, got '{raw}'"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_header_synonyms_are_accepted() {
        let csv = "Time,Baro_Altitude,speed\n0,0,0\n60,1200,150\n";
        let samples = samples_from_csv(csv.as_bytes()).expect("parses");
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1], AltitudeSample::new(60.0, 1_200.0));
    }

    #[test]
    fn csv_rfc3339_timestamps_become_seconds() {
        let csv = "timestamp,alt\n2024-05-01T10:00:00Z,0\n2024-05-01T10:01:30Z,900\n";
        let samples = samples_from_csv(csv.as_bytes()).expect("parses");
        assert_eq!(samples[1].timestamp - samples[0].timestamp, 90.0);
    }

    #[test]
    fn csv_errors_name_the_row() {
        let csv = "ts,altitude_ft\n0,0\n60,high\n";
        let err = samples_from_csv(csv.as_bytes()).expect_err("bad altitude");
        assert!(err.to_string().contains("row 3"), "{err}");
    }

    #[test]
    fn csv_without_altitude_column_is_rejected() {
        let err = samples_from_csv("ts,speed\n0,0\n".as_bytes()).expect_err("missing column");
        assert!(err.to_string().contains("altitude_ft"));
    }

    #[test]
    fn json_accepts_objects_and_pairs() {
        let text = r#"[{"timestamp": 0, "altitude_ft": 0}, [60, 1500], {"t": "1970-01-01T00:02:00Z", "alt": 3000}]"#;
        let samples = samples_from_json(text).expect("parses");
        assert_eq!(
            samples,
            vec![
                AltitudeSample::new(0.0, 0.0),
                AltitudeSample::new(60.0, 1_500.0),
                AltitudeSample::new(120.0, 3_000.0),
            ]
        );
    }

    #[test]
    fn json_errors_name_the_entry() {
        let err = samples_from_json(r#"[[0, 0], {"altitude_ft": 10}]"#).expect_err("missing ts");
        assert!(err.to_string().contains("entry 1"), "{err}");
    }
}
