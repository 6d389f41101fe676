//! Bounded in-memory history of diagnostic rows, kept per table.
//!
//! Each registered table owns a ring buffer of rows; once the buffer holds
//! `max_entries` rows the oldest one is dropped for every new append. Readers project
//! buffered rows onto a subset of columns.

pub mod config;
pub mod historical_data;

pub use config::HistoryConfig;
pub use historical_data::HistoricalData;
