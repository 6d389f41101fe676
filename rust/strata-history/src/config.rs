use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strata_common::{Result, error::Error};

/// Configuration of a [`HistoricalData`](crate::HistoricalData) store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of rows retained per table.
    pub max_entries: usize,
    /// Tables for which rows are recorded.
    pub dump_tables: BTreeSet<String>,
}

impl HistoryConfig {
    /// One day of per-second samples.
    pub const DEFAULT_MAX_ENTRIES: usize = 86400;

    pub fn with_max_entries(&self, max_entries: usize) -> Self {
        let mut config = self.clone();
        config.max_entries = max_entries;
        config
    }

    pub fn with_dump_tables<I, S>(&self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = self.clone();
        config.dump_tables = tables.into_iter().map(Into::into).collect();
        config
    }

    /// Parses a configuration from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<HistoryConfig> {
        serde_json::from_str(json)
            .map_err(|e| Error::invalid_format("history config", e.to_string()))
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            max_entries: Self::DEFAULT_MAX_ENTRIES,
            dump_tables: BTreeSet::new(),
        }
    }
}
