//! Root mean square of residuals, per group and pooled.

use super::selection::GroupSelection;
use crate::core::ResidualTable;
use crate::error::{DiagnosticError, Result};
use crate::utils::stats::rmse;

/// RMSE of one group's residuals.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRmse {
    pub group: String,
    pub rmse: f64,
    pub n: usize,
}

/// Residual RMSE for the selected groups plus the pooled value.
#[derive(Debug, Clone, PartialEq)]
pub struct RmseSummary {
    pub groups: Vec<GroupRmse>,
    /// RMSE over every residual of every listed group.
    pub combined: f64,
    pub n: usize,
}

/// Compute residual RMSE per group and across all selected groups.
///
/// Groups without residuals are left out.
///
/// # Errors
/// `EmptyData` when no selected group has residuals, plus any selection
/// error.
pub fn residual_rmse(table: &ResidualTable, selection: &GroupSelection) -> Result<RmseSummary> {
    let mut pooled = Vec::new();
    let mut groups = Vec::new();

    for series in selection.resolve(table)? {
        if series.is_empty() {
            continue;
        }
        let residuals = series.residuals();
        groups.push(GroupRmse {
            group: series.group().to_string(),
            rmse: rmse(&residuals),
            n: residuals.len(),
        });
        pooled.extend(residuals);
    }

    if pooled.is_empty() {
        return Err(DiagnosticError::EmptyData);
    }

    Ok(RmseSummary {
        groups,
        combined: rmse(&pooled),
        n: pooled.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ResidualSeries;
    use approx::assert_relative_eq;

    #[test]
    fn rmse_per_group_and_combined() {
        let table = ResidualTable::new(vec![
            ResidualSeries::from_residuals("A", &[(1.0, 0.1), (2.0, -0.1)]),
            ResidualSeries::new("Empty", Vec::new()),
            ResidualSeries::from_residuals(
                "B",
                &[(1.0, 0.3), (2.0, -0.3), (3.0, 0.3), (4.0, -0.3)],
            ),
        ]);
        let summary = residual_rmse(&table, &GroupSelection::All).unwrap();

        assert_eq!(summary.groups.len(), 2);
        assert_eq!(summary.groups[0].group, "A");
        assert_relative_eq!(summary.groups[0].rmse, 0.1, epsilon = 1e-12);
        assert_relative_eq!(summary.groups[1].rmse, 0.3, epsilon = 1e-12);
        assert_eq!(summary.n, 6);
        assert_relative_eq!(
            summary.combined,
            ((2.0 * 0.01 + 4.0 * 0.09) / 6.0_f64).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn rmse_respects_selection() {
        let table = ResidualTable::new(vec![
            ResidualSeries::from_residuals("A", &[(1.0, 0.1)]),
            ResidualSeries::from_residuals("B", &[(1.0, 0.5)]),
        ]);
        let summary = residual_rmse(&table, &GroupSelection::names(["B"])).unwrap();
        assert_eq!(summary.groups.len(), 1);
        assert_relative_eq!(summary.combined, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn rmse_without_residuals_is_an_error() {
        let table = ResidualTable::new(vec![ResidualSeries::new("Empty", Vec::new())]);
        assert!(matches!(
            residual_rmse(&table, &GroupSelection::All),
            Err(DiagnosticError::EmptyData)
        ));
    }
}
