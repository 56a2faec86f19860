//! Rates command handler.

use anyhow::Result;

use contrail_lib::RateTableHandle;

use crate::output::{render_rates, OutputFormat};
use crate::terminal::ColorPalette;

/// Handle the rates subcommand.
///
/// Prints the effective per-phase burn rate of every key in the current
/// table, marking rates derived from cruise.
pub fn handle_rates(rates: &RateTableHandle, format: OutputFormat) -> Result<()> {
    let table = rates.snapshot();
    print!("{}", render_rates(&table, format, &ColorPalette::detect())?);
    Ok(())
}
