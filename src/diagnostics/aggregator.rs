//! Runs tests and control limits for every group of a residual table.

use super::selection::GroupSelection;
use crate::core::{DataType, ResidualSeries, ResidualTable};
use crate::error::{DiagnosticError, Result};
use crate::utils::stats::mean;
use crate::validation::{control_limits, runs_test, ControlLimits, Mixing, DEFAULT_ALPHA};
use std::fmt;
use tracing::{debug, trace, warn};

/// Outcome of the randomness check for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// p-value at or above the significance level.
    Passed,
    /// p-value below the significance level.
    Failed,
    /// Too few observations or too short a time span to test.
    Excluded,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Passed => f.write_str("Passed"),
            Classification::Failed => f.write_str("Failed"),
            Classification::Excluded => f.write_str("Excluded"),
        }
    }
}

/// Which values are tested and where the center sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesMode {
    /// Log residuals around zero.
    #[default]
    Residual,
    /// Raw observations around their mean.
    Observed,
}

/// Configuration for a diagnostic run.
#[derive(Debug, Clone)]
pub struct DiagnosticConfig {
    /// Alternative hypothesis for the runs test.
    pub mixing: Mixing,
    /// Observation category, carried through to the output.
    pub data_type: DataType,
    /// Values tested and their center.
    pub mode: SeriesMode,
    /// Groups to evaluate.
    pub selection: GroupSelection,
    /// A group needs strictly more observations than this.
    pub min_observations: usize,
    /// A group needs a strictly longer time span than this.
    pub min_time_span: f64,
    /// Significance level for pass/fail.
    pub alpha: f64,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            mixing: Mixing::Less,
            data_type: DataType::AbundanceIndex,
            mode: SeriesMode::Residual,
            selection: GroupSelection::All,
            min_observations: 3,
            min_time_span: 3.0,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl DiagnosticConfig {
    /// Default configuration for a given data type.
    pub fn for_data_type(data_type: DataType) -> Self {
        Self {
            data_type,
            ..Self::default()
        }
    }

    pub fn with_mixing(mut self, mixing: Mixing) -> Self {
        self.mixing = mixing;
        self
    }

    pub fn with_mode(mut self, mode: SeriesMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_selection(mut self, selection: GroupSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_min_observations(mut self, min_observations: usize) -> Self {
        self.min_observations = min_observations;
        self
    }

    pub fn with_min_time_span(mut self, min_time_span: f64) -> Self {
        self.min_time_span = min_time_span;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Check numeric options.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(DiagnosticError::InvalidParameter(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if !self.min_time_span.is_finite() || self.min_time_span < 0.0 {
            return Err(DiagnosticError::InvalidParameter(format!(
                "min_time_span must be finite and non-negative, got {}",
                self.min_time_span
            )));
        }
        // Control limits need at least two values.
        if self.min_observations < 1 {
            return Err(DiagnosticError::InvalidParameter(
                "min_observations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a series is long enough to be tested.
    pub fn is_admissible(&self, series: &ResidualSeries) -> bool {
        series.len() > self.min_observations
            && series
                .time_span()
                .is_some_and(|span| span > self.min_time_span)
    }
}

/// Per-observation classification against the control band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMarker {
    pub time: f64,
    pub year: f64,
    /// Tested value (residual or observation).
    pub value: f64,
    /// Outside the three-sigma band.
    pub outside: bool,
    /// Above the center line.
    pub above_center: bool,
}

/// Diagnostic result for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDiagnostic {
    pub group: String,
    /// Runs-test p-value, `None` when excluded.
    pub p_value: Option<f64>,
    pub classification: Classification,
    /// Lower control limit, `None` when excluded.
    pub lower: Option<f64>,
    /// Upper control limit, `None` when excluded.
    pub upper: Option<f64>,
    pub data_type: DataType,
    /// Residuals available for the group.
    pub n_observations: usize,
    /// max(time) - min(time), `None` for an empty group.
    pub time_span: Option<f64>,
    /// The p-value is the sentinel for an undefined test.
    pub degenerate: bool,
    /// Band classification for each tested value, empty when excluded.
    pub markers: Vec<PointMarker>,
}

impl GroupDiagnostic {
    fn excluded(series: &ResidualSeries, data_type: DataType) -> Self {
        Self {
            group: series.group().to_string(),
            p_value: None,
            classification: Classification::Excluded,
            lower: None,
            upper: None,
            data_type,
            n_observations: series.len(),
            time_span: series.time_span(),
            degenerate: false,
            markers: Vec::new(),
        }
    }

    /// Number of values outside the control band.
    pub fn outside_count(&self) -> usize {
        self.markers.iter().filter(|m| m.outside).count()
    }
}

/// Result table: one row per evaluated group, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticTable {
    pub data_type: DataType,
    pub mixing: Mixing,
    pub rows: Vec<GroupDiagnostic>,
}

impl DiagnosticTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, group: &str) -> Option<&GroupDiagnostic> {
        self.rows.iter().find(|r| r.group == group)
    }

    fn with_classification(
        &self,
        classification: Classification,
    ) -> impl Iterator<Item = &GroupDiagnostic> {
        self.rows
            .iter()
            .filter(move |r| r.classification == classification)
    }

    pub fn passed(&self) -> impl Iterator<Item = &GroupDiagnostic> {
        self.with_classification(Classification::Passed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &GroupDiagnostic> {
        self.with_classification(Classification::Failed)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &GroupDiagnostic> {
        self.with_classification(Classification::Excluded)
    }
}

/// Run the residual diagnostics on every selected group.
///
/// Each group is evaluated independently; the rows come back in table
/// order whatever order the groups were selected in.
///
/// # Errors
/// Invalid configuration, an empty table, or a selection that does not
/// match the table. Degenerate or short groups never produce an error.
///
/// # Example
/// ```
/// use residual_diagnostics::core::ResidualSeries;
/// use residual_diagnostics::core::ResidualTable;
/// use residual_diagnostics::diagnostics::{run_diagnostics, Classification, DiagnosticConfig};
///
/// let table = ResidualTable::new(vec![
///     ResidualSeries::from_residuals("Short", &[(1.0, 0.1), (2.0, -0.1), (3.0, 0.2)]),
/// ]);
/// let result = run_diagnostics(&table, &DiagnosticConfig::default()).unwrap();
///
/// assert_eq!(result.rows[0].classification, Classification::Excluded);
/// assert!(result.rows[0].p_value.is_none());
/// ```
pub fn run_diagnostics(
    table: &ResidualTable,
    config: &DiagnosticConfig,
) -> Result<DiagnosticTable> {
    config.validate()?;
    if table.is_empty() {
        return Err(DiagnosticError::EmptyData);
    }

    let selected = config.selection.resolve(table)?;
    let rows: Vec<GroupDiagnostic> = selected
        .into_iter()
        .map(|series| diagnose_group(series, config))
        .collect();

    debug!(
        data_type = %config.data_type,
        mixing = %config.mixing,
        groups = rows.len(),
        "residual diagnostics complete"
    );

    Ok(DiagnosticTable {
        data_type: config.data_type,
        mixing: config.mixing,
        rows,
    })
}

/// Evaluate a single group.
pub fn diagnose_group(series: &ResidualSeries, config: &DiagnosticConfig) -> GroupDiagnostic {
    if !config.is_admissible(series) {
        debug!(
            group = series.group(),
            n = series.len(),
            span = ?series.time_span(),
            "group excluded: too few observations or too short a span"
        );
        return GroupDiagnostic::excluded(series, config.data_type);
    }

    let (values, center) = match config.mode {
        SeriesMode::Residual => (series.residuals(), 0.0),
        SeriesMode::Observed => {
            let observed = series.observed();
            let center = mean(&observed);
            (observed, center)
        }
    };

    let limits = match control_limits(&values, center) {
        Ok(limits) => limits,
        Err(err) => {
            warn!(group = series.group(), error = %err, "control limits unavailable");
            return GroupDiagnostic::excluded(series, config.data_type);
        }
    };

    let runs = runs_test(&values, center, config.mixing);
    if runs.is_degenerate() {
        trace!(group = series.group(), "runs test degenerate");
    }

    let p_value = runs.p_value();
    let classification = if p_value < config.alpha {
        Classification::Failed
    } else {
        Classification::Passed
    };

    GroupDiagnostic {
        group: series.group().to_string(),
        p_value: Some(p_value),
        classification,
        lower: Some(limits.lower),
        upper: Some(limits.upper),
        data_type: config.data_type,
        n_observations: series.len(),
        time_span: series.time_span(),
        degenerate: runs.is_degenerate(),
        markers: point_markers(series, &values, &limits),
    }
}

fn point_markers(
    series: &ResidualSeries,
    values: &[f64],
    limits: &ControlLimits,
) -> Vec<PointMarker> {
    series
        .points()
        .iter()
        .zip(values.iter())
        .map(|(point, &value)| PointMarker {
            time: point.time,
            year: point.year,
            value,
            outside: limits.is_outside(value),
            above_center: value > limits.center,
        })
        .collect()
}
