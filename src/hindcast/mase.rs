//! Mean Absolute Scaled Error of hindcast predictions.
//!
//! Each peel is a refit with the data after `end_time` withheld. Its
//! predictions for the withheld occasions are compared with the actual
//! observations, and the error is scaled by the error of a persistence
//! forecast that carries the last in-sample observation forward.
//!
//! # Reference
//!
//! Kell, L.T., Kimoto, A., Kitakado, T. (2016). Evaluation of the prediction
//! skill of stock assessment using hindcasting. *Fisheries Research* 183.

use crate::error::{DiagnosticError, Result};
use crate::utils::stats::mean_abs;
use tracing::{debug, trace};

/// Label of the pooled row in a [`MaseReport`].
pub const JOINT_GROUP: &str = "joint";

/// Two occasions closer than this are the same occasion.
const TIME_TOLERANCE: f64 = 1e-9;

/// One observation of the reference (full data) series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HindcastObservation {
    pub time: f64,
    pub season: Option<u32>,
    pub observed: f64,
}

/// Prediction of a truncated refit for one occasion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeelPrediction {
    pub time: f64,
    pub predicted: f64,
}

/// A refit with everything after `end_time` withheld.
#[derive(Debug, Clone, PartialEq)]
pub struct HindcastPeel {
    /// Last occasion available to the refit.
    pub end_time: f64,
    pub predictions: Vec<PeelPrediction>,
}

impl HindcastPeel {
    /// Create a peel from `(time, predicted)` pairs.
    pub fn new(end_time: f64, predictions: &[(f64, f64)]) -> Self {
        Self {
            end_time,
            predictions: predictions
                .iter()
                .map(|&(time, predicted)| PeelPrediction { time, predicted })
                .collect(),
        }
    }

    fn prediction_at(&self, time: f64) -> Option<f64> {
        self.predictions
            .iter()
            .find(|p| (p.time - time).abs() < TIME_TOLERANCE)
            .map(|p| p.predicted)
            .filter(|&p| p.is_finite() && p > 0.0)
    }
}

/// Observations and hindcast peels for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct HindcastGroup {
    pub group: String,
    pub observations: Vec<HindcastObservation>,
    pub peels: Vec<HindcastPeel>,
}

impl HindcastGroup {
    /// Create a group from `(time, observed)` pairs.
    pub fn new(group: impl Into<String>, observations: &[(f64, f64)]) -> Self {
        Self {
            group: group.into(),
            observations: observations
                .iter()
                .map(|&(time, observed)| HindcastObservation {
                    time,
                    season: None,
                    observed,
                })
                .collect(),
            peels: Vec::new(),
        }
    }

    /// Create a group from `(time, season, observed)` triples.
    pub fn seasonal(group: impl Into<String>, observations: &[(f64, u32, f64)]) -> Self {
        Self {
            group: group.into(),
            observations: observations
                .iter()
                .map(|&(time, season, observed)| HindcastObservation {
                    time,
                    season: Some(season),
                    observed,
                })
                .collect(),
            peels: Vec::new(),
        }
    }

    /// Add a peel.
    pub fn with_peel(mut self, peel: HindcastPeel) -> Self {
        self.peels.push(peel);
        self
    }

    fn seasons(&self) -> Vec<Option<u32>> {
        let mut seasons = Vec::new();
        for obs in &self.observations {
            if !seasons.contains(&obs.season) {
                seasons.push(obs.season);
            }
        }
        seasons
    }

    fn validate(&self) -> Result<()> {
        for (row, obs) in self.observations.iter().enumerate() {
            if !obs.time.is_finite() {
                return Err(DiagnosticError::InvalidRecord {
                    row,
                    reason: format!("observation time of group '{}' is not finite", self.group),
                });
            }
        }
        for peel in &self.peels {
            if !peel.end_time.is_finite() {
                return Err(DiagnosticError::InvalidParameter(format!(
                    "peel end time of group '{}' is not finite",
                    self.group
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for hindcast scoring.
#[derive(Debug, Clone)]
pub struct MaseConfig {
    /// Floor applied to the baseline MAE for the adjusted score.
    pub mae_base_adj: f64,
    /// Withheld time evaluated after each peel's end (one step ahead by default).
    pub horizon: f64,
    /// Score each season separately.
    pub by_season: bool,
}

impl Default for MaseConfig {
    fn default() -> Self {
        Self {
            mae_base_adj: 0.1,
            horizon: 1.0,
            by_season: false,
        }
    }
}

impl MaseConfig {
    pub fn with_mae_base_adj(mut self, mae_base_adj: f64) -> Self {
        self.mae_base_adj = mae_base_adj;
        self
    }

    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_by_season(mut self, by_season: bool) -> Self {
        self.by_season = by_season;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.mae_base_adj.is_finite() || self.mae_base_adj <= 0.0 {
            return Err(DiagnosticError::InvalidParameter(format!(
                "mae_base_adj must be finite and positive, got {}",
                self.mae_base_adj
            )));
        }
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(DiagnosticError::InvalidParameter(format!(
                "horizon must be finite and positive, got {}",
                self.horizon
            )));
        }
        Ok(())
    }
}

/// MAE of prediction and baseline residuals and the resulting scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaseComponents {
    /// Mean absolute prediction residual.
    pub mae_prediction: f64,
    /// Mean absolute persistence-forecast residual.
    pub mae_baseline: f64,
    /// MAE_prediction / MAE_baseline (None if the baseline MAE is zero).
    pub mase: Option<f64>,
    /// MAE_prediction / max(MAE_baseline, mae_base_adj).
    pub mase_adjusted: f64,
    /// Prediction residuals contributing.
    pub n_evaluated: usize,
}

impl MaseComponents {
    /// Score a set of prediction residuals against persistence residuals.
    ///
    /// # Example
    /// ```
    /// use residual_diagnostics::hindcast::MaseComponents;
    ///
    /// let scores = MaseComponents::from_residuals(&[0.08, -0.08], &[0.05, -0.05], 0.1).unwrap();
    /// assert!((scores.mase.unwrap() - 1.6).abs() < 1e-12);
    /// assert!((scores.mase_adjusted - 0.8).abs() < 1e-12);
    /// ```
    pub fn from_residuals(prediction: &[f64], naive: &[f64], mae_base_adj: f64) -> Result<Self> {
        if prediction.is_empty() || naive.is_empty() {
            return Err(DiagnosticError::EmptyData);
        }

        let mae_prediction = mean_abs(prediction);
        let mae_baseline = mean_abs(naive);
        let mase = if mae_baseline == 0.0 {
            None
        } else {
            Some(mae_prediction / mae_baseline)
        };

        Ok(Self {
            mae_prediction,
            mae_baseline,
            mase,
            mase_adjusted: mae_prediction / mae_baseline.max(mae_base_adj),
            n_evaluated: prediction.len(),
        })
    }
}

/// Prediction skill of one group (and season).
#[derive(Debug, Clone, PartialEq)]
pub struct MaseScore {
    pub group: String,
    pub season: Option<u32>,
    pub mase: Option<f64>,
    pub mae_prediction: f64,
    pub mae_baseline: f64,
    pub mase_adjusted: f64,
    pub n_evaluated: usize,
}

impl MaseScore {
    fn from_components(group: &str, season: Option<u32>, c: MaseComponents) -> Self {
        Self {
            group: group.to_string(),
            season,
            mase: c.mase,
            mae_prediction: c.mae_prediction,
            mae_baseline: c.mae_baseline,
            mase_adjusted: c.mase_adjusted,
            n_evaluated: c.n_evaluated,
        }
    }

    /// Predictions beat the persistence forecast (adjusted score below 1).
    pub fn has_skill(&self) -> bool {
        self.mase_adjusted < 1.0
    }
}

/// Scores for every group with evaluated predictions, plus the pooled row.
#[derive(Debug, Clone, PartialEq)]
pub struct MaseReport {
    pub scores: Vec<MaseScore>,
    /// All prediction residuals of all groups pooled.
    pub joint: Option<MaseScore>,
}

impl MaseReport {
    pub fn get(&self, group: &str) -> Option<&MaseScore> {
        self.scores.iter().find(|s| s.group == group)
    }
}

#[derive(Debug, Default)]
struct HindcastResiduals {
    prediction: Vec<f64>,
    naive: Vec<f64>,
}

impl HindcastResiduals {
    fn extend(&mut self, other: &HindcastResiduals) {
        self.prediction.extend_from_slice(&other.prediction);
        self.naive.extend_from_slice(&other.naive);
    }
}

/// Score hindcast predictions of every group.
///
/// For each peel, every observed occasion `t` with
/// `end_time < t <= end_time + horizon` that has a prediction contributes
///
/// * prediction residual `ln(obs[t]) - ln(pred[t])`
/// * persistence residual `ln(obs[t]) - ln(obs[last])`, where `last` is the
///   latest occasion at or before `end_time`.
///
/// Groups (or seasons) with nothing to evaluate produce no score.
///
/// # Errors
/// Invalid configuration, no groups, or non-finite times.
pub fn score_hindcast(groups: &[HindcastGroup], config: &MaseConfig) -> Result<MaseReport> {
    config.validate()?;
    if groups.is_empty() {
        return Err(DiagnosticError::EmptyData);
    }
    for group in groups {
        group.validate()?;
    }

    let mut scores = Vec::new();
    let mut pooled = HindcastResiduals::default();

    for group in groups {
        let seasons = if config.by_season {
            group.seasons()
        } else {
            vec![None]
        };

        for season in seasons {
            let filter = if config.by_season { Some(season) } else { None };
            let residuals = collect_residuals(group, filter, config.horizon);
            if residuals.prediction.is_empty() {
                debug!(
                    group = group.group.as_str(),
                    season = ?season,
                    "no observations in evaluation period, skipping"
                );
                continue;
            }

            let components = MaseComponents::from_residuals(
                &residuals.prediction,
                &residuals.naive,
                config.mae_base_adj,
            )?;
            scores.push(MaseScore::from_components(&group.group, season, components));
            pooled.extend(&residuals);
        }
    }

    let joint = if pooled.prediction.is_empty() {
        None
    } else {
        let components = MaseComponents::from_residuals(
            &pooled.prediction,
            &pooled.naive,
            config.mae_base_adj,
        )?;
        Some(MaseScore::from_components(JOINT_GROUP, None, components))
    };

    Ok(MaseReport { scores, joint })
}

/// Gather residual pairs for one group. `season` of `Some(s)` restricts the
/// observations to season `s`.
fn collect_residuals(
    group: &HindcastGroup,
    season: Option<Option<u32>>,
    horizon: f64,
) -> HindcastResiduals {
    let observations: Vec<&HindcastObservation> = group
        .observations
        .iter()
        .filter(|o| match season {
            Some(s) => o.season == s,
            None => true,
        })
        .filter(|o| o.observed.is_finite() && o.observed > 0.0)
        .collect();

    let mut residuals = HindcastResiduals::default();

    for peel in &group.peels {
        let last_in_sample = observations
            .iter()
            .filter(|o| o.time <= peel.end_time)
            .max_by(|a, b| {
                a.time
                    .partial_cmp(&b.time)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let Some(last) = last_in_sample else {
            trace!(
                group = group.group.as_str(),
                end_time = peel.end_time,
                "peel has no in-sample observation"
            );
            continue;
        };

        for obs in observations
            .iter()
            .filter(|o| o.time > peel.end_time && o.time <= peel.end_time + horizon)
        {
            if let Some(predicted) = peel.prediction_at(obs.time) {
                residuals
                    .prediction
                    .push(obs.observed.ln() - predicted.ln());
                residuals.naive.push(obs.observed.ln() - last.observed.ln());
            }
        }
    }

    residuals
}
