//! Per-group residual series built from a tidy observation table.

use crate::error::{DiagnosticError, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Observation category a diagnostic run was performed on.
///
/// Informational only: the tag is carried through to the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// Abundance index (CPUE, survey biomass).
    #[default]
    AbundanceIndex,
    /// Mean length from length compositions.
    MeanLength,
    /// Mean age from age compositions.
    MeanAge,
    /// Conditional age-at-length.
    ConditionalAgeAtLength,
}

impl DataType {
    /// Short code used in configuration (`cpue`, `len`, `age`, `con`).
    pub fn code(&self) -> &'static str {
        match self {
            DataType::AbundanceIndex => "cpue",
            DataType::MeanLength => "len",
            DataType::MeanAge => "age",
            DataType::ConditionalAgeAtLength => "con",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DataType {
    type Err = DiagnosticError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpue" => Ok(DataType::AbundanceIndex),
            "len" => Ok(DataType::MeanLength),
            "age" => Ok(DataType::MeanAge),
            "con" => Ok(DataType::ConditionalAgeAtLength),
            other => Err(DiagnosticError::InvalidParameter(format!(
                "data type must be one of cpue, len, age, con (got '{other}')"
            ))),
        }
    }
}

/// One row of the tidy model-output table.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    /// Group (fleet / data series) identifier.
    pub group: String,
    /// Observation occasion, used for span and ordering.
    pub time: f64,
    /// Year-equivalent ordinal of the occasion.
    pub year: f64,
    /// Season for sub-annual data.
    pub season: Option<u32>,
    /// Observed value, if any.
    pub observed: Option<f64>,
    /// Model expectation, if any.
    pub expected: Option<f64>,
}

impl ObservationRecord {
    /// Create a record whose year equals its time.
    pub fn new(
        group: impl Into<String>,
        time: f64,
        observed: Option<f64>,
        expected: Option<f64>,
    ) -> Self {
        Self {
            group: group.into(),
            time,
            year: time,
            season: None,
            observed,
            expected,
        }
    }

    /// Set the year-equivalent ordinal.
    pub fn with_year(mut self, year: f64) -> Self {
        self.year = year;
        self
    }

    /// Set the season.
    pub fn with_season(mut self, season: u32) -> Self {
        self.season = Some(season);
        self
    }

    /// Log residual, defined only when both values are present and positive.
    pub fn log_residual(&self) -> Option<f64> {
        match (self.observed, self.expected) {
            (Some(obs), Some(exp))
                if obs.is_finite() && exp.is_finite() && obs > 0.0 && exp > 0.0 =>
            {
                Some(obs.ln() - exp.ln())
            }
            _ => None,
        }
    }
}

/// A single residual with its source values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualPoint {
    pub time: f64,
    pub year: f64,
    pub season: Option<u32>,
    pub observed: f64,
    pub expected: f64,
    /// ln(observed) - ln(expected).
    pub residual: f64,
}

/// Ordered residuals for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualSeries {
    group: String,
    points: Vec<ResidualPoint>,
}

impl ResidualSeries {
    /// Create a series, sorting points by time.
    pub fn new(group: impl Into<String>, mut points: Vec<ResidualPoint>) -> Self {
        points.sort_by(|a, b| {
            a.time
                .partial_cmp(&b.time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self {
            group: group.into(),
            points,
        }
    }

    /// Build a series straight from `(time, residual)` pairs.
    ///
    /// Observed/expected are reconstructed with expected = 1.
    pub fn from_residuals(group: impl Into<String>, pairs: &[(f64, f64)]) -> Self {
        let points = pairs
            .iter()
            .map(|&(time, residual)| ResidualPoint {
                time,
                year: time,
                season: None,
                observed: residual.exp(),
                expected: 1.0,
                residual,
            })
            .collect();
        Self::new(group, points)
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn points(&self) -> &[ResidualPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Residual values in time order.
    pub fn residuals(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.residual).collect()
    }

    /// Observed values in time order.
    pub fn observed(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.observed).collect()
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }

    /// Time span covered (max - min), `None` if empty.
    pub fn time_span(&self) -> Option<f64> {
        let first = self.points.first()?;
        let (min, max) = self
            .points
            .iter()
            .fold((first.time, first.time), |(lo, hi), p| {
                (lo.min(p.time), hi.max(p.time))
            });
        Some(max - min)
    }
}

/// Residual series for every group, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidualTable {
    series: Vec<ResidualSeries>,
}

impl ResidualTable {
    pub fn new(series: Vec<ResidualSeries>) -> Self {
        Self { series }
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Group identifiers in table order.
    pub fn groups(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.group()).collect()
    }

    pub fn get(&self, group: &str) -> Option<&ResidualSeries> {
        self.series.iter().find(|s| s.group() == group)
    }

    pub fn series(&self) -> &[ResidualSeries] {
        &self.series
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResidualSeries> {
        self.series.iter()
    }

    /// Position of a group in table order.
    pub fn position(&self, group: &str) -> Option<usize> {
        self.series.iter().position(|s| s.group() == group)
    }
}

impl<'a> IntoIterator for &'a ResidualTable {
    type Item = &'a ResidualSeries;
    type IntoIter = std::slice::Iter<'a, ResidualSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

/// Turn a tidy observation table into per-group log-residual series.
///
/// Rows without a positive observed and expected value contribute no
/// residual. Groups keep the order in which they first appear, and a group
/// whose rows were all dropped is kept with an empty series.
///
/// # Example
/// ```
/// use residual_diagnostics::core::{extract_residuals, ObservationRecord};
///
/// let records = vec![
///     ObservationRecord::new("Survey", 2001.0, Some(1.2), Some(1.0)),
///     ObservationRecord::new("Survey", 2002.0, None, Some(1.0)),
///     ObservationRecord::new("CPUE", 2001.0, Some(0.8), Some(1.0)),
/// ];
/// let table = extract_residuals(&records).unwrap();
///
/// assert_eq!(table.groups(), vec!["Survey", "CPUE"]);
/// assert_eq!(table.get("Survey").unwrap().len(), 1);
/// ```
pub fn extract_residuals(records: &[ObservationRecord]) -> Result<ResidualTable> {
    if records.is_empty() {
        return Err(DiagnosticError::EmptyData);
    }

    let mut order: Vec<String> = Vec::new();
    let mut points: HashMap<String, Vec<ResidualPoint>> = HashMap::new();

    for (row, record) in records.iter().enumerate() {
        if record.group.trim().is_empty() {
            return Err(DiagnosticError::InvalidRecord {
                row,
                reason: "group id is empty".to_string(),
            });
        }
        if !record.time.is_finite() {
            return Err(DiagnosticError::InvalidRecord {
                row,
                reason: "time is not finite".to_string(),
            });
        }
        if !record.year.is_finite() {
            return Err(DiagnosticError::InvalidRecord {
                row,
                reason: "year is not finite".to_string(),
            });
        }

        let entry = points.entry(record.group.clone()).or_insert_with(|| {
            order.push(record.group.clone());
            Vec::new()
        });

        if let (Some(residual), Some(observed), Some(expected)) =
            (record.log_residual(), record.observed, record.expected)
        {
            entry.push(ResidualPoint {
                time: record.time,
                year: record.year,
                season: record.season,
                observed,
                expected,
                residual,
            });
        }
    }

    let series = order
        .into_iter()
        .map(|group| {
            let pts = points.remove(&group).unwrap_or_default();
            ResidualSeries::new(group, pts)
        })
        .collect();

    Ok(ResidualTable::new(series))
}
