//! End-to-end scenarios from a tidy observation table to summary tables.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use residual_diagnostics::core::{extract_residuals, DataType, ObservationRecord};
use residual_diagnostics::diagnostics::{
    residual_rmse, run_diagnostics, Classification, DiagnosticConfig, GroupSelection,
};
use residual_diagnostics::hindcast::{score_hindcast, HindcastGroup, HindcastPeel, MaseConfig};
use residual_diagnostics::validation::Mixing;
use residual_diagnostics::DiagnosticError;

/// Records whose log residuals equal `residuals`, one per year from `start`.
fn records(group: &str, start: f64, residuals: &[f64]) -> Vec<ObservationRecord> {
    residuals
        .iter()
        .enumerate()
        .map(|(i, &r)| {
            let expected = 2.0 + 0.1 * i as f64;
            let time = start + i as f64;
            ObservationRecord::new(group, time, Some(expected * r.exp()), Some(expected))
        })
        .collect()
}

#[test]
fn scenario_a_perfect_alternation_fails() {
    let residuals = [0.1, -0.1, 0.1, -0.1, 0.1, -0.1, 0.1, -0.1];
    let table = extract_residuals(&records("CPUE", 2010.0, &residuals)).unwrap();
    let config = DiagnosticConfig::default().with_mixing(Mixing::TwoSided);
    let result = run_diagnostics(&table, &config).unwrap();

    let row = &result.rows[0];
    assert_eq!(row.n_observations, 8);
    assert_relative_eq!(row.time_span.unwrap(), 7.0, epsilon = 1e-12);
    assert_eq!(row.classification, Classification::Failed);
    assert!(row.p_value.unwrap() < 0.05);
    assert!(!row.degenerate);

    let bound = 3.0 * (0.2 / 1.128);
    assert_relative_eq!(row.upper.unwrap(), bound, epsilon = 1e-9);
    assert_relative_eq!(row.lower.unwrap(), -bound, epsilon = 1e-9);
    assert_relative_eq!(row.upper.unwrap(), 0.532, epsilon = 1e-3);
    assert!(row.markers.iter().all(|m| !m.outside));
}

#[test]
fn scenario_a_default_mixing_looks_for_clustering_only() {
    let residuals = [0.1, -0.1, 0.1, -0.1, 0.1, -0.1, 0.1, -0.1];
    let table = extract_residuals(&records("CPUE", 2010.0, &residuals)).unwrap();
    let result = run_diagnostics(&table, &DiagnosticConfig::default()).unwrap();
    assert_eq!(result.rows[0].classification, Classification::Passed);
}

#[test]
fn strongly_clustered_group_reports_smallest_p_value() {
    let residuals: Vec<f64> = (0..40).map(|i| if i < 20 { 0.1 } else { -0.1 }).collect();
    let table = extract_residuals(&records("Trend", 1980.0, &residuals)).unwrap();
    let result = run_diagnostics(&table, &DiagnosticConfig::default()).unwrap();

    let row = &result.rows[0];
    assert!(!row.degenerate);
    assert_eq!(row.p_value, Some(0.001));
    assert_eq!(row.classification, Classification::Failed);
}

#[test]
fn scenario_b_three_points_are_excluded() {
    for residuals in [[0.1, 0.2, 0.3], [0.5, -0.5, 0.5], [0.0, 0.0, 0.0]] {
        let table = extract_residuals(&records("Short", 2000.0, &residuals)).unwrap();
        let result = run_diagnostics(&table, &DiagnosticConfig::default()).unwrap();
        let row = &result.rows[0];
        assert_eq!(row.classification, Classification::Excluded);
        assert!(row.p_value.is_none());
        assert!(row.lower.is_none());
        assert!(row.upper.is_none());
    }
}

#[test]
fn scenario_c_random_signs_usually_pass() {
    let mut rng = StdRng::seed_from_u64(42);
    let trials = 200;
    let mut passed = 0;

    for _ in 0..trials {
        let residuals: Vec<f64> = (0..10)
            .map(|_| {
                let magnitude = rng.gen_range(0.05..0.5);
                if rng.gen_bool(0.5) {
                    magnitude
                } else {
                    -magnitude
                }
            })
            .collect();
        let table = extract_residuals(&records("Random", 1990.0, &residuals)).unwrap();
        let result = run_diagnostics(&table, &DiagnosticConfig::default()).unwrap();
        if result.rows[0].classification == Classification::Passed {
            passed += 1;
        }
    }

    assert!(
        passed as f64 / trials as f64 >= 0.8,
        "only {passed} of {trials} random series passed"
    );
}

#[test]
fn scenario_c_irregular_pattern_passes() {
    let residuals = [0.3, 0.1, -0.2, 0.4, -0.1, -0.3, 0.2, -0.4, 0.1, 0.2];
    let table = extract_residuals(&records("Survey", 2000.0, &residuals)).unwrap();
    let result = run_diagnostics(&table, &DiagnosticConfig::default()).unwrap();
    let row = &result.rows[0];
    assert_eq!(row.classification, Classification::Passed);
    assert!(row.p_value.unwrap() >= 0.05);
}

#[test]
fn scenario_d_adjusted_mase_reverses_conclusion() {
    let observed: Vec<(f64, f64)> = (0..10)
        .map(|i| (2010.0 + i as f64, 100.0 * (0.05 * i as f64).exp()))
        .collect();
    let mut group = HindcastGroup::new("Survey", &observed);
    for end in 2014..2019 {
        let t = (end + 1) as f64;
        let i = (t - 2010.0) as i32;
        let predicted = 100.0 * (0.05 * i as f64).exp() * (0.08_f64).exp();
        group = group.with_peel(HindcastPeel::new(end as f64, &[(t, predicted)]));
    }

    let report = score_hindcast(&[group], &MaseConfig::default()).unwrap();
    let score = &report.scores[0];

    assert_eq!(score.n_evaluated, 5);
    assert_relative_eq!(score.mae_baseline, 0.05, epsilon = 1e-9);
    assert_relative_eq!(score.mae_prediction, 0.08, epsilon = 1e-9);
    assert_relative_eq!(score.mase.unwrap(), 1.6, epsilon = 1e-6);
    assert_relative_eq!(score.mase_adjusted, 0.8, epsilon = 1e-6);
    assert!(score.mase.unwrap() > 1.0);
    assert!(score.has_skill());

    let joint = report.joint.unwrap();
    assert_relative_eq!(joint.mase_adjusted, score.mase_adjusted, epsilon = 1e-12);
}

#[test]
fn mixed_table_keeps_order_and_isolates_bad_groups() {
    let mut rows = Vec::new();
    rows.extend(records("Survey", 2000.0, &[0.2, 0.3, 0.1, 0.2, -0.1, -0.3, -0.2, -0.1]));
    rows.extend(records("Short", 2000.0, &[0.1, -0.1]));
    rows.extend(records("OneSided", 2000.0, &[0.1, 0.2, 0.3, 0.2, 0.1]));
    rows.extend(records("Random", 2000.0, &[0.3, 0.1, -0.2, 0.4, -0.1, -0.3, 0.2, -0.4, 0.1, 0.2]));
    // A group whose observations are all missing.
    rows.push(ObservationRecord::new("Missing", 2000.0, None, Some(1.0)));
    rows.push(ObservationRecord::new("Missing", 2010.0, None, Some(1.0)));

    let table = extract_residuals(&rows).unwrap();
    let config = DiagnosticConfig::for_data_type(DataType::AbundanceIndex);
    let result = run_diagnostics(&table, &config).unwrap();

    let summary: Vec<(&str, Classification)> = result
        .rows
        .iter()
        .map(|r| (r.group.as_str(), r.classification))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Survey", Classification::Failed),
            ("Short", Classification::Excluded),
            ("OneSided", Classification::Failed),
            ("Random", Classification::Passed),
            ("Missing", Classification::Excluded),
        ]
    );
    assert!(result.get("OneSided").unwrap().degenerate);
    assert_eq!(result.get("OneSided").unwrap().p_value, Some(0.001));
}

#[test]
fn selection_by_index_and_name() {
    let mut rows = Vec::new();
    rows.extend(records("A", 2000.0, &[0.1, -0.1, 0.1, -0.1, 0.1]));
    rows.extend(records("B", 2000.0, &[0.1, -0.1, 0.1, -0.1, 0.1]));
    rows.extend(records("C", 2000.0, &[0.1, -0.1, 0.1, -0.1, 0.1]));
    let table = extract_residuals(&rows).unwrap();

    let by_index = DiagnosticConfig::default().with_selection(GroupSelection::Indices(vec![2, 0]));
    let groups: Vec<String> = run_diagnostics(&table, &by_index)
        .unwrap()
        .rows
        .into_iter()
        .map(|r| r.group)
        .collect();
    assert_eq!(groups, vec!["A", "C"]);

    let by_name = DiagnosticConfig::default().with_selection(GroupSelection::names(["B"]));
    assert_eq!(run_diagnostics(&table, &by_name).unwrap().rows[0].group, "B");

    let out_of_range =
        DiagnosticConfig::default().with_selection(GroupSelection::Indices(vec![5]));
    assert_eq!(
        run_diagnostics(&table, &out_of_range).unwrap_err(),
        DiagnosticError::IndexOutOfBounds { index: 5, size: 3 }
    );
}

#[test]
fn string_options_are_validated_at_the_boundary() {
    let config = DiagnosticConfig::for_data_type("len".parse().unwrap())
        .with_mixing("two.sided".parse().unwrap());
    assert_eq!(config.data_type, DataType::MeanLength);
    assert_eq!(config.mixing, Mixing::TwoSided);

    assert_eq!("LESS".parse::<Mixing>().unwrap(), Mixing::Less);
    assert_eq!("CPUE".parse::<DataType>().unwrap(), DataType::AbundanceIndex);
    assert!("two-sided".parse::<Mixing>().is_err());
    assert!("weight".parse::<DataType>().is_err());
}

#[test]
fn rmse_summary_over_extracted_table() {
    let mut rows = Vec::new();
    rows.extend(records("A", 2000.0, &[0.1, -0.1, 0.1, -0.1]));
    rows.extend(records("B", 2000.0, &[0.2, -0.2]));
    let table = extract_residuals(&rows).unwrap();

    let summary = residual_rmse(&table, &GroupSelection::All).unwrap();
    assert_relative_eq!(summary.groups[0].rmse, 0.1, epsilon = 1e-9);
    assert_relative_eq!(summary.groups[1].rmse, 0.2, epsilon = 1e-9);
    assert_relative_eq!(summary.combined, (0.12_f64 / 6.0).sqrt(), epsilon = 1e-9);
}
