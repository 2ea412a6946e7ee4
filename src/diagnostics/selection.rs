//! Choosing which groups of a table to evaluate.

use crate::core::{ResidualSeries, ResidualTable};
use crate::error::{DiagnosticError, Result};
use std::collections::BTreeSet;

/// Subset of groups to evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupSelection {
    /// Every group in the table.
    #[default]
    All,
    /// Zero-based positions in table order.
    Indices(Vec<usize>),
    /// Group identifiers.
    Names(Vec<String>),
}

impl GroupSelection {
    /// Select groups by name.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GroupSelection::Names(names.into_iter().map(Into::into).collect())
    }

    /// Resolve the selection against a table.
    ///
    /// Selected series are returned in table order with duplicates removed,
    /// regardless of the order in which they were requested.
    ///
    /// # Errors
    /// * `IndexOutOfBounds` for a position past the end of the table
    /// * `UnknownGroup` for a name not present in the table
    /// * `InvalidParameter` for an explicit but empty selection
    pub fn resolve<'a>(&self, table: &'a ResidualTable) -> Result<Vec<&'a ResidualSeries>> {
        let positions: BTreeSet<usize> = match self {
            GroupSelection::All => return Ok(table.iter().collect()),
            GroupSelection::Indices(indices) => {
                if indices.is_empty() {
                    return Err(DiagnosticError::InvalidParameter(
                        "group selection is empty".to_string(),
                    ));
                }
                indices
                    .iter()
                    .map(|&index| {
                        if index < table.len() {
                            Ok(index)
                        } else {
                            Err(DiagnosticError::IndexOutOfBounds {
                                index,
                                size: table.len(),
                            })
                        }
                    })
                    .collect::<Result<BTreeSet<usize>>>()?
            }
            GroupSelection::Names(names) => {
                if names.is_empty() {
                    return Err(DiagnosticError::InvalidParameter(
                        "group selection is empty".to_string(),
                    ));
                }
                names
                    .iter()
                    .map(|name| {
                        table
                            .position(name)
                            .ok_or_else(|| DiagnosticError::UnknownGroup(name.clone()))
                    })
                    .collect::<Result<BTreeSet<usize>>>()?
            }
        };

        Ok(positions
            .into_iter()
            .map(|i| &table.series()[i])
            .collect())
    }
}
