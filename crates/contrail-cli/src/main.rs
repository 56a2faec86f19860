use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use contrail_cli::commands::classify::handle_classify;
use contrail_cli::commands::estimate::{handle_estimate, EstimateArgs};
use contrail_cli::commands::rates::handle_rates;
use contrail_cli::output::OutputFormat;
use contrail_lib::{OverrideSource, RateTableHandle};

#[derive(Parser, Debug)]
#[command(author, version, about = "Flight fuel burn and CO2 estimation")]
struct Cli {
    /// Burn-rate override feed (JSON file path or http(s) URL) applied at startup.
    #[arg(long, global = true, env = "CONTRAIL_RATE_OVERRIDE")]
    rates_override: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate fuel burn and CO2 for a flight from an altitude sample file.
    Estimate {
        /// CSV or JSON file of altitude samples.
        #[arg(long)]
        samples: PathBuf,
        /// Free-text aircraft type (model, ICAO code or description).
        #[arg(long)]
        aircraft: String,
        /// Flight identifier; defaults to the sample file name.
        #[arg(long)]
        flight_id: Option<String>,
        /// Great-circle distance flown, in nautical miles.
        #[arg(long)]
        distance_nm: Option<f64>,
        /// Skip rolling-median smoothing of the altitude series.
        #[arg(long)]
        no_smoothing: bool,
    },
    /// Show how aircraft type strings resolve to burn-rate keys.
    Classify {
        /// Aircraft type strings to resolve.
        #[arg(required = true)]
        types: Vec<String>,
    },
    /// List the effective burn-rate table.
    Rates,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let rates = RateTableHandle::builtin();
    if let Some(raw) = cli.rates_override.as_deref() {
        apply_override(&rates, raw)?;
    }

    match cli.command {
        Command::Estimate {
            samples,
            aircraft,
            flight_id,
            distance_nm,
            no_smoothing,
        } => handle_estimate(
            &rates,
            &EstimateArgs {
                samples,
                aircraft,
                flight_id,
                distance_nm,
                smoothing: !no_smoothing,
                format: cli.format,
            },
        ),
        Command::Classify { types } => handle_classify(&rates, &types, cli.format),
        Command::Rates => handle_rates(&rates, cli.format),
    }
}

fn apply_override(rates: &RateTableHandle, raw: &str) -> Result<()> {
    let source = OverrideSource::parse(raw);
    let summary = rates
        .try_load_override(&source)
        .with_context(|| format!("failed to apply burn-rate override from {source}"))?;
    info!(
        rates = summary.rates_applied,
        families = summary.families_applied,
        "using burn-rate override"
    );
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
