use std::fmt::Write;

use serde::Serialize;

use crate::aircraft::{AircraftKey, ConfidenceLevel};
use crate::estimate::{EstimateAssumptions, FuelEstimate};
use crate::phases::FlightPhase;

/// Presentation style for turning an [`EstimateSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryRenderMode {
    PlainText,
    Markdown,
}

/// One phase slice as reported to consumers.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSummary {
    pub phase: FlightPhase,
    pub duration_minutes: f64,
    pub fuel_burn_kg: f64,
    pub avg_altitude_ft: f64,
}

/// Flat, serialisable view of a [`FuelEstimate`].
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstimateSummary {
    pub flight_id: String,
    pub aircraft_key: AircraftKey,
    pub fuel_kg: f64,
    #[serde(rename = "fuelL")]
    pub fuel_liters: f64,
    #[serde(rename = "fuelGal")]
    pub fuel_gallons: f64,
    pub co2_kg: f64,
    pub confidence: ConfidenceLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_per_nm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nm_per_gallon: Option<f64>,
    pub phases: Vec<PhaseSummary>,
    pub assumptions: EstimateAssumptions,
}

impl EstimateSummary {
    /// Flatten an estimate, pairing each slice with the fuel attributed to it.
    pub fn from_estimate(estimate: &FuelEstimate) -> Self {
        let phases = estimate
            .phases
            .iter()
            .zip(estimate.assumptions.phases.iter())
            .map(|(slice, rate)| PhaseSummary {
                phase: slice.phase,
                duration_minutes: slice.duration_minutes(),
                fuel_burn_kg: rate.fuel_kg,
                avg_altitude_ft: slice.avg_altitude_ft,
            })
            .collect();

        Self {
            flight_id: estimate.flight_id.clone(),
            aircraft_key: estimate.aircraft_key.clone(),
            fuel_kg: estimate.fuel_kg,
            fuel_liters: estimate.fuel_liters,
            fuel_gallons: estimate.fuel_gallons,
            co2_kg: estimate.co2_kg,
            confidence: estimate.confidence,
            fuel_per_nm: estimate.fuel_per_nm,
            nm_per_gallon: estimate.nm_per_gallon,
            phases,
            assumptions: estimate.assumptions.clone(),
        }
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: SummaryRenderMode) -> String {
        match mode {
            SummaryRenderMode::PlainText => self.render_plain(),
            SummaryRenderMode::Markdown => self.render_markdown(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Flight {}: {} (confidence: {})",
            self.flight_id, self.aircraft_key, self.confidence
        );
        let _ = writeln!(
            buffer,
            "Fuel: {:.1} kg ({:.1} L, {:.1} gal)",
            self.fuel_kg, self.fuel_liters, self.fuel_gallons
        );
        let _ = writeln!(buffer, "CO2: {:.1} kg", self.co2_kg);
        if let Some(per_nm) = self.fuel_per_nm {
            let _ = write!(buffer, "Fuel per nm: {per_nm:.2} kg");
            if let Some(nm_per_gallon) = self.nm_per_gallon {
                let _ = write!(buffer, " ({nm_per_gallon:.3} nm/gal)");
            }
            let _ = writeln!(buffer);
        }

        if !self.phases.is_empty() {
            let _ = writeln!(buffer, "Phases:");
            for phase in &self.phases {
                let _ = writeln!(
                    buffer,
                    "  {:<9} {:>7.1} min {:>10.1} kg  avg {:>6.0} ft",
                    phase.phase.label(),
                    phase.duration_minutes,
                    phase.fuel_burn_kg,
                    phase.avg_altitude_ft
                );
            }
        }

        let _ = writeln!(buffer, "Rates: {}", self.assumptions.rate_table.describe());
        if let Some(fallback) = &self.assumptions.fallback {
            let _ = writeln!(buffer, "Note: {fallback}");
        }
        if !self.assumptions.similar_models.is_empty() {
            let _ = writeln!(
                buffer,
                "Similar known types: {}",
                self.assumptions.similar_models.join(", ")
            );
        }
        for note in &self.assumptions.notes {
            let _ = writeln!(buffer, "Note: {note}");
        }
        buffer
    }

    fn render_markdown(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Flight {}** ({}, confidence `{}`)",
            self.flight_id, self.aircraft_key, self.confidence
        );
        let _ = writeln!(buffer);
        let _ = writeln!(
            buffer,
            "* Fuel: **{:.1} kg** ({:.1} L / {:.1} gal)",
            self.fuel_kg, self.fuel_liters, self.fuel_gallons
        );
        let _ = writeln!(buffer, "* CO2: **{:.1} kg**", self.co2_kg);
        if let Some(per_nm) = self.fuel_per_nm {
            let _ = writeln!(buffer, "* Fuel per nm: {per_nm:.2} kg");
        }
        if !self.phases.is_empty() {
            let _ = writeln!(buffer);
            let _ = writeln!(buffer, "| Phase | Minutes | Fuel (kg) | Avg alt (ft) |");
            let _ = writeln!(buffer, "|---|---:|---:|---:|");
            for phase in &self.phases {
                let _ = writeln!(
                    buffer,
                    "| {} | {:.1} | {:.1} | {:.0} |",
                    phase.phase.label(),
                    phase.duration_minutes,
                    phase.fuel_burn_kg,
                    phase.avg_altitude_ft
                );
            }
        }
        if let Some(fallback) = &self.assumptions.fallback {
            let _ = writeln!(buffer);
            let _ = writeln!(buffer, "> {fallback}");
        }
        buffer
    }
}

impl From<&FuelEstimate> for EstimateSummary {
    fn from(estimate: &FuelEstimate) -> Self {
        Self::from_estimate(estimate)
    }
}
