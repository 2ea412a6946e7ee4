//! # residual-diagnostics
//!
//! Residual diagnostics for fitted time series models, built around the
//! checks used for fishery stock-assessment fits but usable with any model
//! that produces one residual series per observation group.
//!
//! Provides three-sigma control limits from the average moving range, a
//! runs test for randomness of residual signs, a per-group summary table
//! with pass/fail classification, and MASE scoring of hindcast peels.
//!
//! All computation is synchronous and side-effect free. Diagnostic events
//! are emitted through `tracing`; installing a subscriber is left to the
//! caller.

pub mod core;
pub mod diagnostics;
pub mod error;
pub mod hindcast;
pub mod utils;
pub mod validation;

pub use error::{DiagnosticError, Result};

pub mod prelude {
    pub use crate::core::{extract_residuals, DataType, ObservationRecord, ResidualTable};
    pub use crate::diagnostics::{
        run_diagnostics, Classification, DiagnosticConfig, DiagnosticTable, GroupSelection,
    };
    pub use crate::error::{DiagnosticError, Result};
    pub use crate::hindcast::{score_hindcast, HindcastGroup, HindcastPeel, MaseConfig};
    pub use crate::validation::{control_limits, runs_test, Mixing};
}
