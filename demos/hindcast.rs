//! Hindcast MASE Example
//!
//! Scores one-step-ahead predictions of five retrospective peels against a
//! persistence forecast, for a noisy index and a nearly flat one.
//!
//! Run with: cargo run --example hindcast

use residual_diagnostics::hindcast::{score_hindcast, HindcastGroup, HindcastPeel, MaseConfig};

fn build_group(name: &str, observed: &[(f64, f64)], predicted: &[(f64, f64)]) -> HindcastGroup {
    let mut group = HindcastGroup::new(name, observed);
    for &(time, value) in predicted {
        group = group.with_peel(HindcastPeel::new(time - 1.0, &[(time, value)]));
    }
    group
}

fn main() -> residual_diagnostics::Result<()> {
    println!("=== Hindcast MASE Example ===\n");

    let noisy: Vec<(f64, f64)> = [1.0, 1.4, 0.9, 1.3, 0.8, 1.2, 1.5, 0.9, 1.1, 1.3]
        .iter()
        .enumerate()
        .map(|(i, &v)| (2010.0 + i as f64, v))
        .collect();
    let noisy_pred = [
        (2015.0, 1.1),
        (2016.0, 1.2),
        (2017.0, 1.1),
        (2018.0, 1.1),
        (2019.0, 1.2),
    ];

    let flat: Vec<(f64, f64)> = [1.00, 1.02, 1.01, 1.03, 1.02, 1.04, 1.03, 1.05, 1.04, 1.06]
        .iter()
        .enumerate()
        .map(|(i, &v)| (2010.0 + i as f64, v))
        .collect();
    let flat_pred = [
        (2015.0, 1.10),
        (2016.0, 1.08),
        (2017.0, 1.11),
        (2018.0, 1.09),
        (2019.0, 1.12),
    ];

    let groups = vec![
        build_group("Survey", &noisy, &noisy_pred),
        build_group("Longline", &flat, &flat_pred),
    ];

    let report = score_hindcast(&groups, &MaseConfig::default())?;

    println!(
        "{:<10} {:>8} {:>8} {:>8} {:>9} {:>6}",
        "Index", "MASE", "MAE.PR", "MAE.base", "MASE.adj", "n.eval"
    );
    for score in report.scores.iter().chain(report.joint.iter()) {
        println!(
            "{:<10} {:>8} {:>8.3} {:>8.3} {:>9.3} {:>6}",
            score.group,
            score.mase.map_or("NA".to_string(), |m| format!("{m:.3}")),
            score.mae_prediction,
            score.mae_baseline,
            score.mase_adjusted,
            score.n_evaluated
        );
    }

    println!("\nMASE < 1: predictions beat the persistence forecast.");
    println!("MASE.adj floors the baseline MAE at 0.1 so flat indices are not over-penalized.");

    Ok(())
}
