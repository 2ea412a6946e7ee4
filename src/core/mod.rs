//! Core data structures: observation records and per-group residual series.

mod residuals;

pub use residuals::{
    extract_residuals, DataType, ObservationRecord, ResidualPoint, ResidualSeries, ResidualTable,
};
