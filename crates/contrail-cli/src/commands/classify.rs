//! Classify command handler.

use anyhow::Result;

use contrail_lib::{ConfidenceLevel, RateTableHandle};

use crate::output::{render_classifications, ClassificationRow, OutputFormat};
use crate::terminal::ColorPalette;

const SUGGESTION_LIMIT: usize = 3;

/// Handle the classify subcommand.
///
/// Resolves each aircraft type string against the current table; low
/// confidence results list the closest known models.
pub fn handle_classify(
    rates: &RateTableHandle,
    types: &[String],
    format: OutputFormat,
) -> Result<()> {
    let rows = classify_all(rates, types);
    print!(
        "{}",
        render_classifications(&rows, format, &ColorPalette::detect())?
    );
    Ok(())
}

/// Classify every input against one table snapshot.
pub fn classify_all(rates: &RateTableHandle, types: &[String]) -> Vec<ClassificationRow> {
    let table = rates.snapshot();
    types
        .iter()
        .map(|raw| {
            let classification = table.classify(raw);
            let suggestions = if classification.confidence == ConfidenceLevel::Low {
                table.suggest_models(raw, SUGGESTION_LIMIT)
            } else {
                Vec::new()
            };
            ClassificationRow::new(raw, classification, suggestions)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contrail_lib::AircraftKey;

    #[test]
    fn classifies_each_input_in_order() {
        let rows = classify_all(
            &RateTableHandle::builtin(),
            &["B738".to_string(), "A20N".to_string()],
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].aircraft_key, AircraftKey::Model("B737-800".to_string()));
        assert_eq!(rows[1].aircraft_key, AircraftKey::Model("A320NEO".to_string()));
    }
}
