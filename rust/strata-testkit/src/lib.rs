//! Test utilities for the Strata crates.
//!
//! - `assertions`: exhaustive checks of the `Block` contract against expected values
//! - `data_gen`: seeded generation of nullable test columns

pub mod assertions;
pub mod data_gen;
