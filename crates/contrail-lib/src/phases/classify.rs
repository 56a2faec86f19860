//! Per-sample phase classification.
//!
//! Classification is history dependent: ambiguous samples inherit the last
//! committed phase, taxi direction depends on whether the aircraft has been
//! airborne, and cruise is sticky within the micro-leveling band. That history
//! is carried explicitly in [`ClassifierState`] and threaded through
//! [`ClassifierState::step`].

use super::config::PhaseDetectionConfig;
use super::types::FlightPhase;

/// Running mean of altitudes committed to the current cruise segment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CruiseLevel {
    sum: f64,
    count: usize,
}

impl CruiseLevel {
    fn starting_at(altitude_ft: f64) -> Self {
        Self {
            sum: altitude_ft,
            count: 1,
        }
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    fn record(&mut self, altitude_ft: f64) {
        self.sum += altitude_ft;
        self.count += 1;
    }
}

/// State carried between samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassifierState {
    committed: Option<FlightPhase>,
    airborne: bool,
    cruise: CruiseLevel,
}

impl ClassifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last committed phase, if any sample has been classified.
    pub fn committed(&self) -> Option<FlightPhase> {
        self.committed
    }

    /// Mean altitude of the current cruise segment, when cruising.
    pub fn cruise_mean_ft(&self) -> Option<f64> {
        (self.committed == Some(FlightPhase::Cruise) && self.cruise.count > 0)
            .then(|| self.cruise.mean())
    }

    /// Classify one sample and commit the result.
    ///
    /// Rules, first match wins:
    /// 1. below the ground threshold: taxi-in once airborne, else taxi-out;
    /// 2. cruising, at or above the cruise floor and inside the leveling band:
    ///    stay in cruise;
    /// 3. vertical speed above the climb threshold: climb;
    /// 4. vertical speed below the descent threshold: descent;
    /// 5. at or above the cruise floor: cruise;
    /// 6. otherwise inherit the committed phase.
    pub fn step(
        &mut self,
        altitude_ft: f64,
        vertical_speed_fpm: f64,
        config: &PhaseDetectionConfig,
    ) -> FlightPhase {
        let phase = self.classify(altitude_ft, vertical_speed_fpm, config);
        self.commit(phase, altitude_ft);
        phase
    }

    fn classify(
        &self,
        altitude_ft: f64,
        vertical_speed_fpm: f64,
        config: &PhaseDetectionConfig,
    ) -> FlightPhase {
        if altitude_ft < config.ground_threshold_ft {
            return if self.airborne {
                FlightPhase::TaxiIn
            } else {
                FlightPhase::TaxiOut
            };
        }

        if let Some(mean) = self.cruise_mean_ft() {
            if altitude_ft >= config.cruise_floor_ft
                && (altitude_ft - mean).abs() <= config.leveling_tolerance_ft
            {
                return FlightPhase::Cruise;
            }
        }

        if vertical_speed_fpm > config.climb_threshold_fpm {
            return FlightPhase::Climb;
        }
        if vertical_speed_fpm < config.descent_threshold_fpm {
            return FlightPhase::Descent;
        }
        if altitude_ft >= config.cruise_floor_ft {
            return FlightPhase::Cruise;
        }

        self.inherited()
    }

    fn inherited(&self) -> FlightPhase {
        match self.committed {
            Some(phase) => phase,
            None if self.airborne => FlightPhase::TaxiIn,
            None => FlightPhase::TaxiOut,
        }
    }

    fn commit(&mut self, phase: FlightPhase, altitude_ft: f64) {
        if phase == FlightPhase::Cruise {
            if self.committed == Some(FlightPhase::Cruise) {
                self.cruise.record(altitude_ft);
            } else {
                self.cruise = CruiseLevel::starting_at(altitude_ft);
            }
        }
        if phase.is_airborne() || phase == FlightPhase::TaxiIn {
            self.airborne = true;
        }
        self.committed = Some(phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PhaseDetectionConfig {
        PhaseDetectionConfig::default()
    }

    #[test]
    fn ground_before_flight_is_taxi_out_and_after_is_taxi_in() {
        let mut state = ClassifierState::new();
        assert_eq!(state.step(0.0, 0.0, &config()), FlightPhase::TaxiOut);
        assert_eq!(state.step(5_000.0, 1_500.0, &config()), FlightPhase::Climb);
        assert_eq!(state.step(3_000.0, -1_500.0, &config()), FlightPhase::Descent);
        assert_eq!(state.step(100.0, -800.0, &config()), FlightPhase::TaxiIn);
        assert_eq!(state.step(0.0, 0.0, &config()), FlightPhase::TaxiIn);
    }

    #[test]
    fn cruise_is_sticky_inside_leveling_band() {
        let mut state = ClassifierState::new();
        assert_eq!(state.step(35_000.0, 0.0, &config()), FlightPhase::Cruise);
        // Noise-driven vertical speed inside the band does not exit cruise.
        assert_eq!(state.step(35_200.0, 1_200.0, &config()), FlightPhase::Cruise);
        assert_eq!(state.step(34_850.0, -2_100.0, &config()), FlightPhase::Cruise);
        // Leaving the band with a real descent does.
        assert_eq!(state.step(33_000.0, -2_000.0, &config()), FlightPhase::Descent);
    }

    #[test]
    fn sticky_cruise_ends_below_cruise_floor() {
        let mut state = ClassifierState::new();
        assert_eq!(state.step(18_100.0, 0.0, &config()), FlightPhase::Cruise);
        assert_eq!(state.step(18_050.0, -400.0, &config()), FlightPhase::Cruise);
        // Within the band of the cruise mean but under the floor.
        assert_eq!(state.step(17_900.0, -400.0, &config()), FlightPhase::Descent);
    }

    #[test]
    fn transitional_band_inherits_committed_phase() {
        let mut state = ClassifierState::new();
        state.step(0.0, 0.0, &config());
        state.step(4_000.0, 2_000.0, &config());
        // Level segment below the cruise floor stays in climb.
        assert_eq!(state.step(10_000.0, 50.0, &config()), FlightPhase::Climb);
    }

    #[test]
    fn series_starting_aloft_begins_in_cruise() {
        let mut state = ClassifierState::new();
        assert_eq!(state.step(37_000.0, 0.0, &config()), FlightPhase::Cruise);
        assert_eq!(state.cruise_mean_ft(), Some(37_000.0));
    }

    #[test]
    fn cruise_mean_resets_on_new_cruise_segment() {
        let mut state = ClassifierState::new();
        state.step(30_000.0, 0.0, &config());
        state.step(32_000.0, 1_000.0, &config());
        assert_eq!(state.committed(), Some(FlightPhase::Climb));
        state.step(34_000.0, 0.0, &config());
        assert_eq!(state.cruise_mean_ft(), Some(34_000.0));
    }
}
