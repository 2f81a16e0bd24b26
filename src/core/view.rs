//! Dashboard view assembly
//!
//! Combines the resolver and the Pareto engine the way the dashboard's
//! plot callback does: guard on the selection size, resolve, then optionally
//! compute the Pareto front.

use crate::core::pareto::pareto_front;
use crate::core::resolver::{display_label, resolve, SplomData};
use crate::error::MooResult;
use crate::selection::{SelectionSet, SelectionToken};
use crate::types::{ObjectiveSenses, RawTable, VariableConfig};
use tracing::{debug, warn};

/// A scatter-plot matrix needs at least this many variables
pub const MIN_SELECTED_VARIABLES: usize = 2;

/// A Pareto front is only shown over at least this many objectives
pub const MIN_PARETO_OBJECTIVES: usize = 2;

/// Why there is nothing to plot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guidance {
    SelectMoreVariables,
    NoMatchingVariables,
}

impl Guidance {
    pub fn message(&self) -> &'static str {
        match self {
            Guidance::SelectMoreVariables => {
                "Select at least 2 variables to create a Scatter Plot Matrix"
            }
            Guidance::NoMatchingVariables => "Click variable buttons to select channels for SPLOM",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub pareto_enabled: bool,
    pub senses: ObjectiveSenses,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Guidance(Guidance),
    Ready {
        data: SplomData,
        /// `None` when the front is disabled or not computable
        pareto: Option<Vec<usize>>,
    },
}

/// Build everything the SPLOM needs for one interaction
pub fn build_view(
    table: &RawTable,
    config: &VariableConfig,
    selection: &SelectionSet,
    options: &ViewOptions,
) -> MooResult<DashboardView> {
    if selection.len() < MIN_SELECTED_VARIABLES {
        return Ok(DashboardView::Guidance(Guidance::SelectMoreVariables));
    }

    let Some(data) = resolve(table, selection, config)? else {
        return Ok(DashboardView::Guidance(Guidance::NoMatchingVariables));
    };

    let pareto = if options.pareto_enabled {
        config_pareto(table, config, &options.senses)?
    } else {
        None
    };

    Ok(DashboardView::Ready { data, pareto })
}

/// Front over every configured objective in the raw table.
///
/// Objectives missing from the table are skipped with a warning.
pub fn config_pareto(
    table: &RawTable,
    config: &VariableConfig,
    senses: &ObjectiveSenses,
) -> MooResult<Option<Vec<usize>>> {
    let objectives: Vec<&str> = config
        .objectives
        .names()
        .filter(|name| {
            let present = table.has_column(name);
            if !present {
                warn!("Objective '{}' not found in table, skipped for Pareto front", name);
            }
            present
        })
        .collect();

    if objectives.len() < MIN_PARETO_OBJECTIVES {
        debug!(
            "Not enough objectives ({}) for Pareto front calculation",
            objectives.len()
        );
        return Ok(None);
    }

    debug!("Calculating Pareto front for objectives: {:?}", objectives);
    pareto_front(&objectives, table, senses).map(Some)
}

/// Front over the selected scalar objectives only, evaluated on the
/// simplified table.
///
/// Senses keyed by source name are re-keyed to display labels.
pub fn pareto_for_selection(
    data: &SplomData,
    selection: &SelectionSet,
    config: &VariableConfig,
    senses: &ObjectiveSenses,
) -> MooResult<Option<Vec<usize>>> {
    let mut labels: Vec<&str> = Vec::new();
    let mut label_senses = ObjectiveSenses::new();

    for token in selection.iter() {
        let SelectionToken::Scalar(name) = token else {
            continue;
        };
        if !config.objectives.contains(name) {
            continue;
        }
        let label = display_label(name);
        if data.table.column(label).is_none() || labels.contains(&label) {
            continue;
        }
        labels.push(label);
        label_senses.set(label, senses.sense_of(name));
    }

    if labels.len() < MIN_PARETO_OBJECTIVES {
        return Ok(None);
    }
    pareto_front(&labels, &data.table, &label_senses).map(Some)
}
