//! Core definitions (errors, results and argument checks), relied upon by all strata-* crates.

pub mod checks;
pub mod error;
pub mod result;

pub use result::Result;
