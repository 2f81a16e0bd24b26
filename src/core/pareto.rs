//! Pareto front extraction
//!
//! Brute-force O(n² · k) dominance check over every row pair. Optimization
//! logs hold hundreds to a few thousand iterations, where this is well under
//! a second.

use crate::error::{MooError, MooResult};
use crate::types::{ColumnSource, ObjectiveSense, ObjectiveSenses};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Objective values of every row, negated where the objective is maximized
/// so that smaller is always better
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveMatrix {
    rows: Vec<Vec<f64>>,
}

impl ObjectiveMatrix {
    /// Build the matrix from the named columns of `source`.
    ///
    /// Fails if an objective column does not exist.
    pub fn from_source<S, N>(
        objectives: &[N],
        source: &S,
        senses: &ObjectiveSenses,
    ) -> MooResult<Self>
    where
        S: ColumnSource + ?Sized,
        N: AsRef<str>,
    {
        let n_rows = source.row_count();
        let mut rows = vec![Vec::with_capacity(objectives.len()); n_rows];

        for objective in objectives {
            let name = objective.as_ref();
            let column = source
                .numeric_column(name)
                .ok_or_else(|| MooError::MissingColumn(name.to_string()))?;
            if column.len() != n_rows {
                return Err(MooError::Validation(format!(
                    "Objective '{}' has {} rows, expected {}",
                    name,
                    column.len(),
                    n_rows
                )));
            }

            let sense = senses.sense_of(name);
            match sense {
                ObjectiveSense::Maximize => debug!(
                    "Objective '{}' set to MAXIMIZE (values negated for Pareto calculation)",
                    name
                ),
                ObjectiveSense::Minimize => debug!("Objective '{}' set to MINIMIZE", name),
            }

            for (row, value) in rows.iter_mut().zip(column.iter()) {
                row.push(match sense {
                    ObjectiveSense::Maximize => -value,
                    ObjectiveSense::Minimize => *value,
                });
            }
        }

        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Indices of rows no other row dominates, ascending
    pub fn non_dominated(&self) -> Vec<usize> {
        (0..self.rows.len())
            .filter(|&i| {
                !self
                    .rows
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != i && dominates(other, &self.rows[i]))
            })
            .collect()
    }
}

/// `a` dominates `b` when it is no worse in every objective and strictly
/// better in at least one (minimization).
///
/// Any comparison involving NaN is false, so a NaN on either side of any
/// objective prevents domination. Equal points do not dominate each other.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut strictly_better = false;
    for (x, y) in a.iter().zip(b) {
        match x.partial_cmp(y) {
            Some(Ordering::Less) => strictly_better = true,
            Some(Ordering::Equal) => {}
            Some(Ordering::Greater) | None => return false,
        }
    }
    strictly_better
}

/// Row indices on the Pareto front of `objectives` in `source`.
///
/// Objectives missing from `senses` are minimized. An empty objective list
/// or an empty table gives an empty front. Callers decide whether a front
/// over fewer than two objectives is meaningful.
pub fn pareto_front<S, N>(
    objectives: &[N],
    source: &S,
    senses: &ObjectiveSenses,
) -> MooResult<Vec<usize>>
where
    S: ColumnSource + ?Sized,
    N: AsRef<str>,
{
    if objectives.is_empty() || source.row_count() == 0 {
        return Ok(Vec::new());
    }

    let matrix = ObjectiveMatrix::from_source(objectives, source, senses)?;
    let front = matrix.non_dominated();
    info!("Found {} Pareto optimal solutions", front.len());
    Ok(front)
}
