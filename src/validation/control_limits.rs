//! Three-sigma control limits from the average moving range.
//!
//! Spread is estimated from the moving ranges of consecutive values rather
//! than the sample standard deviation, so a slow trend or a few large jumps
//! do not inflate the band. Ranges at or above `D4 * MR-bar` are treated as
//! special-cause variation and discarded before the final estimate
//! (Nelson, 1982).
//!
//! # Reference
//!
//! Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*,
//! 8th ed., Section 6.4.

use crate::error::{DiagnosticError, Result};
use crate::utils::stats::{finite_values, mean};

/// D4 factor for the moving-range chart (subgroup size 2).
pub const D4_MR: f64 = 3.267;

/// d2 unbiasing constant for subgroup size 2: sigma-hat = MR-bar / d2.
pub const D2_MR: f64 = 1.128;

/// Width of the band in standard deviations.
pub const SIGMA_MULTIPLIER: f64 = 3.0;

/// Control band around a center value.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlLimits {
    /// Center line (0 for residuals, the mean for raw observations).
    pub center: f64,
    /// Lower control limit.
    pub lower: f64,
    /// Upper control limit.
    pub upper: f64,
    /// Estimated standard deviation (MR-bar / d2).
    pub sigma: f64,
    /// Average moving range after trimming.
    pub average_moving_range: f64,
    /// Moving ranges used for the final estimate.
    pub retained_ranges: usize,
    /// Moving ranges discarded as special-cause variation.
    pub discarded_ranges: usize,
}

impl ControlLimits {
    /// Check whether a value lies inside the band (limits inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Check whether a value falls outside the band.
    pub fn is_outside(&self, value: f64) -> bool {
        !self.contains(value)
    }

    /// Band half-width (3 sigma).
    pub fn half_width(&self) -> f64 {
        SIGMA_MULTIPLIER * self.sigma
    }
}

/// Moving ranges of the centered values: |(x_i - c) - (x_{i-1} - c)|.
///
/// Non-finite values are removed before differencing.
pub fn moving_ranges(values: &[f64], center: f64) -> Vec<f64> {
    let centered: Vec<f64> = finite_values(values)
        .into_iter()
        .map(|v| v - center)
        .collect();
    centered.windows(2).map(|w| (w[1] - w[0]).abs()).collect()
}

/// Compute three-sigma control limits around `center`.
///
/// # Algorithm
///
/// 1. Moving ranges MR_i = |x_i - x_{i-1}| of the centered values.
/// 2. MR-bar = mean(MR).
/// 3. Discard ranges >= D4 * MR-bar and recompute MR-bar.
/// 4. sigma = MR-bar / d2; limits = center -/+ 3 sigma.
///
/// When every range is discarded (a constant series) the spread is zero and
/// both limits collapse onto the center.
///
/// # Errors
/// Returns `InsufficientData` when fewer than two finite values remain.
///
/// # Example
/// ```
/// use residual_diagnostics::validation::control_limits;
///
/// let residuals = [0.1, -0.1, 0.1, -0.1, 0.1, -0.1, 0.1, -0.1];
/// let limits = control_limits(&residuals, 0.0).unwrap();
///
/// assert!((limits.upper - 0.5319).abs() < 1e-3);
/// assert!((limits.lower + 0.5319).abs() < 1e-3);
/// ```
pub fn control_limits(values: &[f64], center: f64) -> Result<ControlLimits> {
    if !center.is_finite() {
        return Err(DiagnosticError::InvalidParameter(
            "center must be finite".to_string(),
        ));
    }

    let ranges = moving_ranges(values, center);
    if ranges.is_empty() {
        return Err(DiagnosticError::InsufficientData {
            needed: 2,
            got: finite_values(values).len(),
        });
    }

    let upper_range_limit = D4_MR * mean(&ranges);
    let retained: Vec<f64> = ranges
        .iter()
        .copied()
        .filter(|&r| r < upper_range_limit)
        .collect();

    let average_moving_range = if retained.is_empty() {
        0.0
    } else {
        mean(&retained)
    };

    let sigma = average_moving_range / D2_MR;

    Ok(ControlLimits {
        center,
        lower: center - SIGMA_MULTIPLIER * sigma,
        upper: center + SIGMA_MULTIPLIER * sigma,
        sigma,
        average_moving_range,
        retained_ranges: retained.len(),
        discarded_ranges: ranges.len() - retained.len(),
    })
}
