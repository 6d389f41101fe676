use std::{
    collections::{BTreeSet, HashMap, VecDeque},
    sync::{Mutex, MutexGuard, PoisonError},
};

use strata_common::{Result, error::Error};

use crate::config::HistoryConfig;

/// Per-table ring buffers of rows, safe to share between threads.
///
/// The set of tables is fixed at construction. A single lock serializes appends and
/// reads across all tables.
pub struct HistoricalData<V> {
    max_entries: usize,
    tables: BTreeSet<String>,
    rows: Mutex<HashMap<String, VecDeque<Vec<V>>>>,
}

impl<V: Clone> HistoricalData<V> {
    pub fn new(config: &HistoryConfig) -> Self {
        Self::with_tables(config.max_entries, config.dump_tables.iter().cloned())
    }

    /// Creates a store keeping at most `max_entries` rows for each of `tables`.
    pub fn with_tables<I, S>(max_entries: usize, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tables: BTreeSet<String> = tables.into_iter().map(Into::into).collect();
        let rows = tables
            .iter()
            .map(|table| (table.clone(), VecDeque::new()))
            .collect();
        log::debug!(
            "created history for {} tables, max_entries = {max_entries}",
            tables.len()
        );
        HistoricalData {
            max_entries,
            tables,
            rows: Mutex::new(rows),
        }
    }

    pub fn tables(&self) -> &BTreeSet<String> {
        &self.tables
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Appends `row` to `table`, evicting the oldest row when the buffer is full.
    pub fn add_row(&self, table: &str, row: Vec<V>) -> Result<()> {
        let mut rows = self.lock();
        let Some(buffer) = rows.get_mut(table) else {
            log::warn!("rejected row for unknown history table '{table}'");
            return Err(Error::unknown_key("history table", table));
        };
        if self.max_entries == 0 {
            return Ok(());
        }
        if buffer.len() == self.max_entries {
            buffer.pop_front();
            log::trace!("evicted oldest row of history table '{table}'");
        }
        buffer.push_back(row);
        Ok(())
    }

    /// Returns the buffered rows of `table`, oldest first, projected onto
    /// `selected_columns` in the order given.
    ///
    /// An unknown table yields no rows. A column index outside a buffered row is an
    /// invalid argument.
    pub fn get_rows(&self, table: &str, selected_columns: &[usize]) -> Result<Vec<Vec<V>>> {
        let rows = self.lock();
        let Some(buffer) = rows.get(table) else {
            return Ok(Vec::new());
        };
        buffer
            .iter()
            .map(|row| {
                selected_columns
                    .iter()
                    .map(|&column| {
                        row.get(column).cloned().ok_or_else(|| {
                            Error::invalid_arg(
                                "selected_columns",
                                format!("column {column} out of range for row of {}", row.len()),
                            )
                        })
                    })
                    .collect::<Result<Vec<V>>>()
            })
            .collect()
    }

    /// Number of rows currently buffered for `table`, zero for an unknown table.
    pub fn len(&self, table: &str) -> usize {
        self.lock().get(table).map_or(0, VecDeque::len)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, VecDeque<Vec<V>>>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
