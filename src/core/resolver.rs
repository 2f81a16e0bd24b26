use crate::core::decode::{finite_extremes, DecoderChain};
use crate::error::MooResult;
use crate::selection::{RequestKind, SelectionSet, VariableRequest, MAX_SUFFIX, MIN_SUFFIX};
use crate::types::{
    Bound, CategoryMap, CellValue, Dimension, NumericTable, RawColumn, RawTable, VariableConfig,
};
use serde::Serialize;
use tracing::{debug, warn};

/// Name of the implicit row-ordinal column in the simplified table
pub const SAMPLE_ID_COLUMN: &str = "sample_id";

/// Plot-ready result of resolving a selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplomData {
    /// One column per dimension label, plus `sample_id`
    pub table: NumericTable,
    /// Plotted dimensions in request order
    pub dimensions: Vec<Dimension>,
    pub categories: CategoryMap,
}

impl SplomData {
    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.label.as_str())
    }
}

/// Display label for a dotted OpenMDAO-style path: `"tower.mass"` -> `"mass"`
pub fn display_label(base: &str) -> &str {
    base.rsplit('.').next().unwrap_or(base)
}

/// Turns selection tokens into plottable dimensions
pub struct VariableResolver<'a> {
    config: &'a VariableConfig,
    decoders: DecoderChain,
}

impl<'a> VariableResolver<'a> {
    pub fn new(config: &'a VariableConfig) -> Self {
        Self {
            config,
            decoders: DecoderChain::standard(),
        }
    }

    pub fn with_decoders(config: &'a VariableConfig, decoders: DecoderChain) -> Self {
        Self { config, decoders }
    }

    /// Resolve the selection against the table.
    ///
    /// Returns `Ok(None)` when no requested variable exists in the table.
    /// Only a ragged table is an error; undecodable cells become NaN.
    pub fn resolve(
        &self,
        table: &RawTable,
        selection: &SelectionSet,
    ) -> MooResult<Option<SplomData>> {
        table.validate_lengths()?;

        let requests = selection.group_requests(|name| table.has_column(name));
        if requests.is_empty() {
            debug!(
                "No selected variables found in table ({} tokens)",
                selection.len()
            );
            return Ok(None);
        }

        let mut simplified = NumericTable::new();
        let mut dimensions = Vec::new();
        let mut categories = CategoryMap::new();

        for VariableRequest { base, kind } in &requests {
            let Some(column) = table.column(base) else {
                continue;
            };
            let category = self.config.category_of(base);

            let resolved = match kind {
                RequestKind::Regular => vec![self.resolve_regular(column)],
                RequestKind::Array => {
                    let (min, max) = self.resolve_array(column);
                    vec![min, max]
                }
            };

            for dimension in resolved {
                if categories.contains_key(&dimension.label) {
                    warn!(
                        "Dimension label '{}' from '{}' shadows an earlier variable",
                        dimension.label, base
                    );
                }
                categories.insert(dimension.label.clone(), category);
                simplified.insert(dimension.label.clone(), dimension.values.clone());
                dimensions.push(dimension);
            }
        }

        let sample_ids = (0..table.row_count()).map(|i| i as f64).collect();
        simplified.insert(SAMPLE_ID_COLUMN, sample_ids);

        Ok(Some(SplomData {
            table: simplified,
            dimensions,
            categories,
        }))
    }

    fn resolve_regular(&self, column: &RawColumn) -> Dimension {
        let values = column.cells.iter().map(CellValue::as_f64).collect();
        Dimension::new(display_label(&column.name), values)
    }

    /// Decode every cell and split into `_min` / `_max` dimensions
    fn resolve_array(&self, column: &RawColumn) -> (Dimension, Dimension) {
        let base = column.name.as_str();
        debug!("Processing array variable '{}' for separate min/max", base);

        let bound = self.config.constraint_bound(base);
        let mut min_values = Vec::with_capacity(column.len());
        let mut max_values = Vec::with_capacity(column.len());

        for (row, cell) in column.cells.iter().enumerate() {
            let (min_val, max_val) = match self.decoders.decode(cell) {
                Some(values) => finite_extremes(&values).unwrap_or((f64::NAN, f64::NAN)),
                None => {
                    warn!(
                        "Could not convert '{}' row {} value {:?} to numeric array",
                        base, row, cell
                    );
                    (f64::NAN, f64::NAN)
                }
            };
            min_values.push(apply_bound(min_val, bound));
            max_values.push(apply_bound(max_val, bound));
        }

        let stem = display_label(base);
        (
            Dimension::new(format!("{}{}", stem, MIN_SUFFIX), min_values),
            Dimension::new(format!("{}{}", stem, MAX_SUFFIX), max_values),
        )
    }
}

/// Out-of-bound extremes are blanked rather than dropped so every dimension
/// keeps one value per row
fn apply_bound(value: f64, bound: Option<Bound>) -> f64 {
    match bound {
        Some(bound) if !bound.contains(value) => f64::NAN,
        _ => value,
    }
}

/// Resolve with the standard decoder chain
pub fn resolve(
    table: &RawTable,
    selection: &SelectionSet,
    config: &VariableConfig,
) -> MooResult<Option<SplomData>> {
    VariableResolver::new(config).resolve(table, selection)
}
