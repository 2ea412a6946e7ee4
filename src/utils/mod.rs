//! Utility functions shared by the diagnostics.

pub mod stats;

pub use stats::{mean, mean_abs, rmse, round_to};
