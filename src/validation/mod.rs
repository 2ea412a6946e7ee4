//! Statistical checks applied to a single residual series.
//!
//! Provides three-sigma control limits from the moving range and a runs
//! test for randomness of the residual signs.
//!
//! # Example
//!
//! ```
//! use residual_diagnostics::validation::{control_limits, runs_test, Mixing};
//!
//! let residuals = vec![0.12, -0.05, 0.08, -0.11, 0.02, 0.15, -0.09, -0.03, 0.07, -0.12];
//!
//! let limits = control_limits(&residuals, 0.0).unwrap();
//! let outside = residuals.iter().filter(|&&r| limits.is_outside(r)).count();
//! println!("{outside} residuals outside [{:.3}, {:.3}]", limits.lower, limits.upper);
//!
//! let runs = runs_test(&residuals, 0.0, Mixing::Less);
//! if runs.passes() {
//!     println!("Residual signs look random (p = {:.3})", runs.p_value());
//! }
//! ```

pub mod control_limits;

pub use control_limits::{control_limits, moving_ranges, ControlLimits, D2_MR, D4_MR};
pub use runs_test::{
    round_p_value, runs_test, Alternative, Mixing, RunsOutcome, RunsTestResult, DEFAULT_ALPHA,
    DEGENERATE_P_VALUE,
};
