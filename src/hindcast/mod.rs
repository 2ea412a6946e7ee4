//! Prediction skill of hindcast (retrospective forecast) peels.
//!
//! # Example
//!
//! ```
//! use residual_diagnostics::hindcast::{score_hindcast, HindcastGroup, HindcastPeel, MaseConfig};
//!
//! let observed: Vec<(f64, f64)> = (2010..=2020)
//!     .map(|y| (y as f64, 1.0 + 0.05 * ((y * 3 % 7) as f64)))
//!     .collect();
//!
//! let mut survey = HindcastGroup::new("Survey", &observed);
//! for end in 2015..2020 {
//!     let next = (end + 1) as f64;
//!     survey = survey.with_peel(HindcastPeel::new(end as f64, &[(next, 1.1)]));
//! }
//!
//! let report = score_hindcast(&[survey], &MaseConfig::default()).unwrap();
//! let score = &report.scores[0];
//! println!("MASE = {:?}, adjusted = {:.3}", score.mase, score.mase_adjusted);
//! ```

mod mase;

pub use mase::{
    score_hindcast, HindcastGroup, HindcastObservation, HindcastPeel, MaseComponents, MaseConfig,
    MaseReport, MaseScore, PeelPrediction, JOINT_GROUP,
};
