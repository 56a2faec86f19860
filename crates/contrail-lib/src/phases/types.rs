//! Sample, phase and slice types shared by the segmentation engine and the
//! estimator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One altitude reading from position telemetry.
///
/// `timestamp` is expressed in seconds (usually Unix epoch seconds); only the
/// differences between timestamps matter to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltitudeSample {
    pub timestamp: f64,
    pub altitude_ft: f64,
}

impl AltitudeSample {
    pub fn new(timestamp: f64, altitude_ft: f64) -> Self {
        Self {
            timestamp,
            altitude_ft,
        }
    }

    /// True when both fields are finite numbers the engine can use.
    pub fn is_finite(&self) -> bool {
        self.timestamp.is_finite() && self.altitude_ft.is_finite()
    }
}

impl From<(f64, f64)> for AltitudeSample {
    fn from((timestamp, altitude_ft): (f64, f64)) -> Self {
        Self::new(timestamp, altitude_ft)
    }
}

/// Operational phase of a flight's vertical profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightPhase {
    TaxiOut,
    Climb,
    Cruise,
    Descent,
    TaxiIn,
}

impl FlightPhase {
    /// All phases in flight order.
    pub const ALL: [FlightPhase; 5] = [
        FlightPhase::TaxiOut,
        FlightPhase::Climb,
        FlightPhase::Cruise,
        FlightPhase::Descent,
        FlightPhase::TaxiIn,
    ];

    /// Stable machine-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            FlightPhase::TaxiOut => "taxi_out",
            FlightPhase::Climb => "climb",
            FlightPhase::Cruise => "cruise",
            FlightPhase::Descent => "descent",
            FlightPhase::TaxiIn => "taxi_in",
        }
    }

    /// Human-readable label shown in textual renderings.
    pub fn label(self) -> &'static str {
        match self {
            FlightPhase::TaxiOut => "Taxi-out",
            FlightPhase::Climb => "Climb",
            FlightPhase::Cruise => "Cruise",
            FlightPhase::Descent => "Descent",
            FlightPhase::TaxiIn => "Taxi-in",
        }
    }

    /// Whether the phase is flown (as opposed to surface movement).
    pub fn is_airborne(self) -> bool {
        matches!(
            self,
            FlightPhase::Climb | FlightPhase::Cruise | FlightPhase::Descent
        )
    }

    /// Whether the phase is surface movement.
    pub fn is_taxi(self) -> bool {
        matches!(self, FlightPhase::TaxiOut | FlightPhase::TaxiIn)
    }
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous stretch of the flight attributed to a single phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSlice {
    pub phase: FlightPhase,
    pub start_time: f64,
    pub end_time: f64,
    pub duration_seconds: f64,
    pub avg_altitude_ft: f64,
    pub avg_vertical_speed_fpm: f64,
    /// Number of real samples backing the slice; zero for synthetic gap fills.
    pub sample_count: usize,
}

impl PhaseSlice {
    pub(crate) fn new(
        phase: FlightPhase,
        start_time: f64,
        end_time: f64,
        avg_altitude_ft: f64,
        avg_vertical_speed_fpm: f64,
        sample_count: usize,
    ) -> Self {
        Self {
            phase,
            start_time,
            end_time,
            duration_seconds: end_time - start_time,
            avg_altitude_ft,
            avg_vertical_speed_fpm,
            sample_count,
        }
    }

    /// Duration in minutes.
    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds / 60.0
    }

    /// Move the start of the slice, keeping the duration in sync.
    pub(crate) fn set_start(&mut self, start_time: f64) {
        self.start_time = start_time;
        self.duration_seconds = self.end_time - self.start_time;
    }

    /// Move the end of the slice, keeping the duration in sync.
    pub(crate) fn set_end(&mut self, end_time: f64) {
        self.end_time = end_time;
        self.duration_seconds = self.end_time - self.start_time;
    }

    /// Fold `other` into `self`, keeping `self`'s phase.
    ///
    /// Time bounds become the union of both slices; averages are weighted by
    /// sample count. Slices without samples (synthetic fills) only widen the
    /// time bounds.
    pub(crate) fn absorb(&mut self, other: &PhaseSlice) {
        let total = self.sample_count + other.sample_count;
        if total > 0 {
            let own = self.sample_count as f64;
            let theirs = other.sample_count as f64;
            let weight = total as f64;
            self.avg_altitude_ft =
                (self.avg_altitude_ft * own + other.avg_altitude_ft * theirs) / weight;
            self.avg_vertical_speed_fpm = (self.avg_vertical_speed_fpm * own
                + other.avg_vertical_speed_fpm * theirs)
                / weight;
        }
        self.sample_count = total;
        self.start_time = self.start_time.min(other.start_time);
        self.end_time = self.end_time.max(other.end_time);
        self.duration_seconds = self.end_time - self.start_time;
    }
}
