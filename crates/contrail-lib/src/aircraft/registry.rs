//! Shared, hot-reloadable access to the live burn-rate table.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use once_cell::sync::Lazy;
use tracing::{info, warn};

use crate::error::{Error, Result};

use super::overrides::{apply_override, OverrideDocument, OverrideSource, OverrideSummary};
use super::table::BurnRateTable;

static DEFAULT_RATES: Lazy<RateTableHandle> = Lazy::new(RateTableHandle::builtin);

/// Process-wide handle initialized with the built-in rates.
pub fn default_rate_table() -> &'static RateTableHandle {
    &DEFAULT_RATES
}

/// Cheaply cloneable handle to the live burn-rate table.
///
/// Readers grab an `Arc` snapshot and never hold the lock while computing.
/// Reloads build a replacement table off to the side and swap it in with a
/// single pointer replacement, so a reader sees either the old table or the
/// new one in full. Reloads are serialized among themselves so concurrent
/// feeds accumulate instead of overwriting each other.
#[derive(Debug, Clone)]
pub struct RateTableHandle {
    live: Arc<RwLock<Arc<BurnRateTable>>>,
    reload: Arc<Mutex<()>>,
}

impl RateTableHandle {
    pub fn new(table: BurnRateTable) -> Self {
        Self {
            live: Arc::new(RwLock::new(Arc::new(table))),
            reload: Arc::new(Mutex::new(())),
        }
    }

    /// Handle over a fresh copy of the built-in table.
    pub fn builtin() -> Self {
        Self::new(BurnRateTable::builtin())
    }

    /// Current table.
    pub fn snapshot(&self) -> Arc<BurnRateTable> {
        let guard = self.live.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the live table wholesale.
    pub fn replace(&self, table: BurnRateTable) {
        let _reload = self.reload.lock().unwrap_or_else(PoisonError::into_inner);
        self.swap(table);
    }

    fn swap(&self, table: BurnRateTable) {
        let mut guard = self.live.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(table);
    }

    /// Fetch, parse and merge an override feed into the live table.
    ///
    /// On any failure the live table is left as it was.
    pub fn try_load_override(&self, source: &OverrideSource) -> Result<OverrideSummary> {
        let text = source.fetch()?;
        self.apply_json(&text, &source.to_string())
    }

    /// Merge an override document given as JSON text.
    pub fn apply_json(&self, text: &str, source_name: &str) -> Result<OverrideSummary> {
        let document = OverrideDocument::from_json(text).map_err(|err| Error::OverrideParse {
            source_name: source_name.to_string(),
            message: err.to_string(),
        })?;
        self.apply_document(&document, source_name)
    }

    /// Merge an already parsed override document.
    pub fn apply_document(
        &self,
        document: &OverrideDocument,
        source_name: &str,
    ) -> Result<OverrideSummary> {
        let _reload = self.reload.lock().unwrap_or_else(PoisonError::into_inner);
        let base = self.snapshot();
        let (table, summary) = apply_override(&base, document, source_name)?;
        self.swap(table);

        info!(
            source = source_name,
            revision = summary.revision,
            rates = summary.rates_applied,
            families = summary.families_applied,
            skipped = summary.skipped.len(),
            "burn-rate override applied"
        );
        Ok(summary)
    }

    /// Load an override feed, reporting success as a flag.
    ///
    /// Failures are logged and leave the live table unchanged. Call this from
    /// startup or an admin path, never from inside an estimation.
    pub fn load_override(&self, source: &OverrideSource) -> bool {
        match self.try_load_override(source) {
            Ok(_) => true,
            Err(err) => {
                warn!(source = %source, error = %err, "burn-rate override rejected; keeping current table");
                false
            }
        }
    }
}

impl Default for RateTableHandle {
    fn default() -> Self {
        Self::builtin()
    }
}
