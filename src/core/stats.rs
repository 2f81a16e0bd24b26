use crate::types::Dimension;
use serde::Serialize;
use tracing::{debug, warn};

/// Ranges narrower than this plot as a single clustered band
pub const TINY_RANGE: f64 = 1e-10;

/// Summary of the non-NaN values of one dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionStats {
    pub label: String,
    pub valid: usize,
    pub total: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl DimensionStats {
    pub fn compute(dimension: &Dimension) -> Self {
        let mut valid = 0;
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;

        for &value in dimension.values.iter().filter(|v| !v.is_nan()) {
            valid += 1;
            min = Some(min.map_or(value, |m| m.min(value)));
            max = Some(max.map_or(value, |m| m.max(value)));
        }

        Self {
            label: dimension.label.clone(),
            valid,
            total: dimension.len(),
            min,
            max,
        }
    }

    pub fn range(&self) -> Option<f64> {
        Some(self.max? - self.min?)
    }

    pub fn is_all_nan(&self) -> bool {
        self.valid == 0
    }

    pub fn is_constant(&self) -> bool {
        self.range() == Some(0.0)
    }
}

/// Compute stats for every dimension, logging ones that will render poorly
pub fn summarize_dimensions(dimensions: &[Dimension]) -> Vec<DimensionStats> {
    debug!("Summarizing {} dimensions", dimensions.len());

    dimensions
        .iter()
        .map(|dimension| {
            let stats = DimensionStats::compute(dimension);
            match (stats.min, stats.max, stats.range()) {
                (Some(min), Some(max), Some(range)) => {
                    debug!(
                        "Dimension '{}': {}/{} values, range {:.6} to {:.6} ({:.6})",
                        stats.label, stats.valid, stats.total, min, max, range
                    );
                    if range == 0.0 {
                        warn!(
                            "Dimension '{}': all values are identical ({}), may appear as single point",
                            stats.label, min
                        );
                    } else if range < TINY_RANGE {
                        warn!(
                            "Dimension '{}': very small range, points may cluster tightly",
                            stats.label
                        );
                    }
                }
                _ => warn!("Dimension '{}' has no valid values (all NaN)", stats.label),
            }
            stats
        })
        .collect()
}
