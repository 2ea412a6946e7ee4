//! Residual Diagnostics Example
//!
//! This example runs the runs test and three-sigma control limits over the
//! residuals of several abundance indices and prints the summary table.
//!
//! Run with: RUST_LOG=debug cargo run --example diagnostics

use residual_diagnostics::core::{extract_residuals, DataType, ObservationRecord};
use residual_diagnostics::diagnostics::{
    residual_rmse, run_diagnostics, DiagnosticConfig, GroupSelection,
};
use residual_diagnostics::validation::Mixing;
use tracing_subscriber::EnvFilter;

fn index(group: &str, first_year: i32, residuals: &[f64]) -> Vec<ObservationRecord> {
    residuals
        .iter()
        .enumerate()
        .map(|(i, &r)| {
            let year = (first_year + i as i32) as f64;
            let expected = 1000.0 * (-0.03 * i as f64).exp();
            ObservationRecord::new(group, year, Some(expected * r.exp()), Some(expected))
        })
        .collect()
}

fn main() -> residual_diagnostics::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Residual Diagnostics Example ===\n");

    let mut records = Vec::new();
    // Well-behaved survey.
    records.extend(index(
        "Survey",
        2000,
        &[0.12, -0.05, 0.08, -0.11, 0.02, 0.15, -0.09, -0.03, 0.07, -0.12, 0.04, -0.02],
    ));
    // Commercial CPUE drifting above then below the model.
    records.extend(index(
        "CPUE_commercial",
        2000,
        &[0.20, 0.25, 0.18, 0.22, 0.10, 0.05, -0.08, -0.15, -0.22, -0.18, -0.25, -0.20],
    ));
    // Recruitment index with a single outlier.
    records.extend(index(
        "Recruit",
        2005,
        &[0.05, -0.04, 0.06, -0.05, 0.90, -0.03, 0.04, -0.06],
    ));
    // Acoustic survey with only three usable years.
    records.extend(index("Acoustic", 2015, &[0.1, -0.2, 0.05]));

    let table = extract_residuals(&records)?;
    println!("Groups: {:?}\n", table.groups());

    let config = DiagnosticConfig::for_data_type(DataType::AbundanceIndex)
        .with_mixing(Mixing::Less);
    let result = run_diagnostics(&table, &config)?;

    println!(
        "{:<18} {:>8} {:>10} {:>9} {:>9} {:>8}",
        "Index", "p.runs", "test", "sigma3.lo", "sigma3.hi", "outside"
    );
    for row in &result.rows {
        let fmt = |v: Option<f64>| v.map_or("NA".to_string(), |x| format!("{x:.3}"));
        println!(
            "{:<18} {:>8} {:>10} {:>9} {:>9} {:>8}",
            row.group,
            fmt(row.p_value),
            row.classification.to_string(),
            fmt(row.lower),
            fmt(row.upper),
            row.outside_count()
        );
    }

    println!(
        "\nPassed: {}, Failed: {}, Excluded: {}",
        result.passed().count(),
        result.failed().count(),
        result.excluded().count()
    );

    let rmse = residual_rmse(&table, &GroupSelection::All)?;
    println!("\n--- Residual RMSE ---\n");
    for g in &rmse.groups {
        println!("{:<18} {:>6.1}%  (n = {})", g.group, 100.0 * g.rmse, g.n);
    }
    println!("{:<18} {:>6.1}%  (n = {})", "Combined", 100.0 * rmse.combined, rmse.n);

    Ok(())
}
