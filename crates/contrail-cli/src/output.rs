//! Output formatting for CLI results.
//!
//! Estimates, classifications and the rate table each render as plain text,
//! Markdown or JSON.

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use contrail_lib::aircraft::{Classification, MatchKind};
use contrail_lib::{
    AircraftKey, BurnRateTable, ConfidenceLevel, EstimateSummary, FlightPhase, SummaryRenderMode,
};

use crate::terminal::{format_rate, ColorPalette};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

/// Render an estimate summary.
pub fn render_estimate(summary: &EstimateSummary, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => summary.render(SummaryRenderMode::PlainText),
        OutputFormat::Markdown => summary.render(SummaryRenderMode::Markdown),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(summary)?),
    })
}

/// One classified aircraft type, ready for display or serialisation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRow {
    pub input: String,
    pub aircraft_key: AircraftKey,
    pub confidence: ConfidenceLevel,
    pub matched_by: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ClassificationRow {
    pub fn new(input: &str, classification: Classification, suggestions: Vec<String>) -> Self {
        Self {
            input: input.to_string(),
            aircraft_key: classification.key,
            confidence: classification.confidence,
            matched_by: match_label(classification.matched_by),
            suggestions,
        }
    }
}

fn match_label(kind: MatchKind) -> &'static str {
    match kind {
        MatchKind::Exact => "exact",
        MatchKind::Family => "family",
        MatchKind::Keyword => "keyword",
        MatchKind::Default => "default",
    }
}

/// Render classification results.
pub fn render_classifications(
    rows: &[ClassificationRow],
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    let mut buffer = String::new();
    match format {
        OutputFormat::Json => {
            buffer = format!("{}\n", serde_json::to_string_pretty(rows)?);
        }
        OutputFormat::Markdown => {
            let _ = writeln!(buffer, "| Input | Key | Confidence | Match |");
            let _ = writeln!(buffer, "|---|---|---|---|");
            for row in rows {
                let _ = writeln!(
                    buffer,
                    "| {} | {} | {} | {} |",
                    row.input, row.aircraft_key, row.confidence, row.matched_by
                );
            }
        }
        OutputFormat::Text => {
            for row in rows {
                let _ = writeln!(
                    buffer,
                    "{} -> {}{}{} ({}{}{}, {})",
                    row.input,
                    palette.white_bold,
                    row.aircraft_key,
                    palette.reset,
                    palette.confidence(row.confidence),
                    row.confidence,
                    palette.reset,
                    row.matched_by
                );
                if !row.suggestions.is_empty() {
                    let _ = writeln!(
                        buffer,
                        "  {}did you mean: {}{}",
                        palette.gray,
                        row.suggestions.join(", "),
                        palette.reset
                    );
                }
            }
        }
    }
    Ok(buffer)
}

/// Effective rates for one table key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRow {
    pub key: AircraftKey,
    pub category: String,
    pub taxi: f64,
    pub climb: f64,
    pub cruise: f64,
    pub descent: f64,
    /// Phases whose rate was derived from cruise.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub derived: Vec<FlightPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hint: Option<String>,
}

/// Effective rates for every key in the table, in key order.
pub fn rate_rows(table: &BurnRateTable) -> Vec<RateRow> {
    table
        .profiles()
        .map(|(key, profile)| {
            let rate = |phase| table.resolve_rate(key, phase);
            let derived = FlightPhase::ALL
                .into_iter()
                .filter(|phase| rate(*phase).derived)
                .collect();
            RateRow {
                key: key.clone(),
                category: profile.category.key_name().to_string(),
                taxi: rate(FlightPhase::TaxiOut).kg_per_hour,
                climb: rate(FlightPhase::Climb).kg_per_hour,
                cruise: rate(FlightPhase::Cruise).kg_per_hour,
                descent: rate(FlightPhase::Descent).kg_per_hour,
                derived,
                source_hint: profile.source_hint.clone(),
            }
        })
        .collect()
}

/// Render the rate table listing.
pub fn render_rates(
    table: &BurnRateTable,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    let rows = rate_rows(table);
    let mut buffer = String::new();
    match format {
        OutputFormat::Json => {
            buffer = format!("{}\n", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Markdown => {
            let _ = writeln!(buffer, "Rates: {}", table.provenance().describe());
            let _ = writeln!(buffer);
            let _ = writeln!(buffer, "| Key | Category | Taxi | Climb | Cruise | Descent |");
            let _ = writeln!(buffer, "|---|---|---:|---:|---:|---:|");
            for row in &rows {
                let _ = writeln!(
                    buffer,
                    "| {} | {} | {:.0} | {:.0} | {:.0} | {:.0} |",
                    row.key, row.category, row.taxi, row.climb, row.cruise, row.descent
                );
            }
        }
        OutputFormat::Text => {
            let _ = writeln!(
                buffer,
                "Burn rates in kg/hour ({}); * = derived from cruise",
                table.provenance().describe()
            );
            let _ = writeln!(
                buffer,
                "{:<14} {:<11} {:>8} {:>8} {:>8} {:>8}",
                "Key", "Category", "Taxi", "Climb", "Cruise", "Descent"
            );
            for row in &rows {
                let cell = |phase: FlightPhase, value: f64| {
                    let mark = if row.derived.contains(&phase) { "*" } else { "" };
                    format!("{}{}", format_rate(value), mark)
                };
                let _ = writeln!(
                    buffer,
                    "{}{:<14}{} {:<11} {:>8} {:>8} {:>8} {:>8}",
                    palette.white_bold,
                    row.key.to_string(),
                    palette.reset,
                    row.category,
                    cell(FlightPhase::TaxiOut, row.taxi),
                    cell(FlightPhase::Climb, row.climb),
                    cell(FlightPhase::Cruise, row.cruise),
                    cell(FlightPhase::Descent, row.descent)
                );
            }
        }
    }
    Ok(buffer)
}
