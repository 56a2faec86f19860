//! Estimate command handler.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use contrail_lib::{
    load_samples, EstimateSummary, FuelEstimator, PhaseDetectionConfig, RateTableHandle,
};

use crate::output::{render_estimate, OutputFormat};

/// Arguments for the estimate subcommand.
#[derive(Debug, Clone)]
pub struct EstimateArgs {
    pub samples: PathBuf,
    pub aircraft: String,
    pub flight_id: Option<String>,
    pub distance_nm: Option<f64>,
    pub smoothing: bool,
    pub format: OutputFormat,
}

/// Handle the estimate subcommand.
///
/// Loads the altitude samples, estimates fuel and CO2 against `rates` and
/// prints the summary to stdout.
pub fn handle_estimate(rates: &RateTableHandle, args: &EstimateArgs) -> Result<()> {
    let rendered = run_estimate(rates, args)?;
    print!("{rendered}");
    Ok(())
}

/// Produce the rendered estimate without printing it.
pub fn run_estimate(rates: &RateTableHandle, args: &EstimateArgs) -> Result<String> {
    let samples = load_samples(&args.samples)
        .with_context(|| format!("failed to load samples from {}", args.samples.display()))?;

    let config = PhaseDetectionConfig::from_env().with_smoothing(args.smoothing);
    let estimator = FuelEstimator::with_config(rates.clone(), config)
        .context("invalid phase detection settings")?;

    let flight_id = args
        .flight_id
        .clone()
        .unwrap_or_else(|| default_flight_id(&args.samples));
    debug!(flight_id = %flight_id, samples = samples.len(), "estimating flight");

    let estimate = estimator.estimate_fuel(&flight_id, &args.aircraft, &samples, args.distance_nm);
    let summary = EstimateSummary::from_estimate(&estimate);
    render_estimate(&summary, args.format)
}

/// Flight id derived from the sample file name.
fn default_flight_id(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("flight")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::fixture_path;

    fn args(format: OutputFormat) -> EstimateArgs {
        EstimateArgs {
            samples: fixture_path("sample_flight.csv"),
            aircraft: "B737-800".to_string(),
            flight_id: None,
            distance_nm: Some(480.0),
            smoothing: true,
            format,
        }
    }

    #[test]
    fn flight_id_defaults_to_file_stem() {
        assert_eq!(default_flight_id(Path::new("/tmp/KL1234.csv")), "KL1234");
        assert_eq!(default_flight_id(Path::new("/")), "flight");
    }

    #[test]
    fn json_output_uses_summary_fields() {
        let rendered = run_estimate(&RateTableHandle::builtin(), &args(OutputFormat::Json))
            .expect("estimate succeeds");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(value["flightId"], "sample_flight");
        assert_eq!(value["confidence"], "high");
        assert!(value["fuelKg"].as_f64().is_some_and(|kg| kg > 0.0));
    }
}
