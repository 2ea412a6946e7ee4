//! Per-group residual diagnostics.
//!
//! Applies the runs test and control limits to every group of a
//! [`ResidualTable`](crate::core::ResidualTable) and classifies each group as
//! passed, failed or excluded.
//!
//! # Example
//!
//! ```
//! use residual_diagnostics::core::{extract_residuals, ObservationRecord};
//! use residual_diagnostics::diagnostics::{run_diagnostics, DiagnosticConfig};
//!
//! let records: Vec<ObservationRecord> = (0..12)
//!     .map(|i| {
//!         let obs = 1.0 + 0.1 * ((i * 7 % 5) as f64 - 2.0);
//!         ObservationRecord::new("Survey", 2000.0 + i as f64, Some(obs), Some(1.0))
//!     })
//!     .collect();
//!
//! let table = extract_residuals(&records).unwrap();
//! let result = run_diagnostics(&table, &DiagnosticConfig::default()).unwrap();
//!
//! for row in &result.rows {
//!     println!("{}: {} (p = {:?})", row.group, row.classification, row.p_value);
//! }
//! ```

mod aggregator;
mod rmse;
mod selection;

pub use aggregator::{
    diagnose_group, run_diagnostics, Classification, DiagnosticConfig, DiagnosticTable,
    GroupDiagnostic, PointMarker, SeriesMode,
};
pub use rmse::{residual_rmse, GroupRmse, RmseSummary};
pub use selection::GroupSelection;
