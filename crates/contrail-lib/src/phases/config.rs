//! Tunable thresholds for phase segmentation.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

const LEVELING_TOLERANCE_ENV: &str = "CONTRAIL_LEVELING_TOLERANCE_FT";
const MERGE_THRESHOLD_ENV: &str = "CONTRAIL_MERGE_THRESHOLD_SECS";
const SMOOTHING_WINDOW_ENV: &str = "CONTRAIL_SMOOTHING_WINDOW_SECS";

/// Phase segmentation configuration.
///
/// The defaults suit ADS-B altitude feeds sampled every few seconds to a
/// minute. The leveling tolerance and merge threshold are empirical values and
/// are exposed here so deployments can tune them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseDetectionConfig {
    /// Apply the rolling median before computing vertical speed.
    pub smoothing: bool,
    /// Width of the centered rolling median window.
    pub smoothing_window_secs: f64,
    /// Upper bound on samples inside one median window.
    pub max_window_samples: usize,
    /// Altitudes below this are treated as surface movement.
    pub ground_threshold_ft: f64,
    /// Vertical speed above this classifies as climb.
    pub climb_threshold_fpm: f64,
    /// Vertical speed below this classifies as descent.
    pub descent_threshold_fpm: f64,
    /// Lowest altitude at which level flight counts as cruise.
    pub cruise_floor_ft: f64,
    /// Micro-leveling band around the running cruise mean.
    pub leveling_tolerance_ft: f64,
    /// Slices shorter than this are absorbed into a neighbour.
    pub merge_threshold_secs: f64,
}

impl Default for PhaseDetectionConfig {
    fn default() -> Self {
        Self {
            smoothing: true,
            smoothing_window_secs: 60.0,
            max_window_samples: 25,
            ground_threshold_ft: 500.0,
            climb_threshold_fpm: 300.0,
            descent_threshold_fpm: -300.0,
            cruise_floor_ft: 18_000.0,
            leveling_tolerance_ft: 250.0,
            merge_threshold_secs: 120.0,
        }
    }
}

impl PhaseDetectionConfig {
    /// Defaults with the tunables overridden from the environment.
    ///
    /// - `CONTRAIL_LEVELING_TOLERANCE_FT`
    /// - `CONTRAIL_MERGE_THRESHOLD_SECS`
    /// - `CONTRAIL_SMOOTHING_WINDOW_SECS`
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(value) = env_f64(LEVELING_TOLERANCE_ENV) {
            config.leveling_tolerance_ft = value;
        }
        if let Some(value) = env_f64(MERGE_THRESHOLD_ENV) {
            config.merge_threshold_secs = value;
        }
        if let Some(value) = env_f64(SMOOTHING_WINDOW_ENV) {
            config.smoothing_window_secs = value;
        }
        config
    }

    /// Copy of this configuration with smoothing switched on or off.
    pub fn with_smoothing(mut self, smoothing: bool) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            (self.smoothing_window_secs, "smoothing_window_secs"),
            (self.leveling_tolerance_ft, "leveling_tolerance_ft"),
            (self.merge_threshold_secs, "merge_threshold_secs"),
            (self.climb_threshold_fpm, "climb_threshold_fpm"),
        ];
        for (value, field) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig {
                    message: format!("{field} must be finite and non-negative, got {value}"),
                });
            }
        }

        for (value, field) in [
            (self.ground_threshold_ft, "ground_threshold_ft"),
            (self.cruise_floor_ft, "cruise_floor_ft"),
            (self.descent_threshold_fpm, "descent_threshold_fpm"),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidConfig {
                    message: format!("{field} must be finite, got {value}"),
                });
            }
        }

        if self.descent_threshold_fpm > 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "descent_threshold_fpm must not be positive, got {}",
                    self.descent_threshold_fpm
                ),
            });
        }

        if self.cruise_floor_ft <= self.ground_threshold_ft {
            return Err(Error::InvalidConfig {
                message: format!(
                    "cruise_floor_ft ({}) must be above ground_threshold_ft ({})",
                    self.cruise_floor_ft, self.ground_threshold_ft
                ),
            });
        }

        if self.max_window_samples == 0 {
            return Err(Error::InvalidConfig {
                message: "max_window_samples must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn env_f64(name: &str) -> Option<f64> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<f64>() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(variable = name, value = %raw, error = %err, "ignoring unparseable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        PhaseDetectionConfig::default()
            .validate()
            .expect("defaults validate");
    }

    #[test]
    fn rejects_positive_descent_threshold() {
        let config = PhaseDetectionConfig {
            descent_threshold_fpm: 100.0,
            ..PhaseDetectionConfig::default()
        };
        let err = config.validate().expect_err("should reject");
        assert!(err.to_string().contains("descent_threshold_fpm"));
    }

    #[test]
    fn rejects_cruise_floor_below_ground() {
        let config = PhaseDetectionConfig {
            cruise_floor_ft: 100.0,
            ..PhaseDetectionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_tolerance() {
        let config = PhaseDetectionConfig {
            leveling_tolerance_ft: f64::NAN,
            ..PhaseDetectionConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
