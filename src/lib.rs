//! MOO Explorer - data preparation for multi-objective optimization logs
//!
//! This library turns an optimization log (one row per iteration) and a
//! variable configuration into the inputs of a scatter-plot matrix, and
//! finds the Pareto front over selected objectives.
//!
//! # Features
//!
//! - Variable resolution with `_min`/`_max` extremes for array-valued columns
//! - Array cells decoded from native lists, Python literals or NumPy-style text
//! - Constraint bounds applied to array extremes
//! - Pareto front over any number of objectives with per-objective senses
//! - JSON and Excel log loading
//!
//! # Example
//!
//! ```no_run
//! use moo_explorer::parser::{load_table, parse_config};
//! use moo_explorer::selection::SelectionSet;
//! use moo_explorer::types::ObjectiveSenses;
//! use std::path::Path;
//!
//! let table = load_table(Path::new("log.json"))?;
//! let config = parse_config(Path::new("analysis.yaml"))?;
//!
//! let selection = SelectionSet::from_tokens(["financese.lcoe", "tower.stress_max"]);
//! if let Some(data) = moo_explorer::resolve(&table, &selection, &config)? {
//!     println!("Dimensions: {}", data.dimensions.len());
//! }
//!
//! let front = moo_explorer::pareto_front(
//!     &["financese.lcoe", "financese.aep"],
//!     &table,
//!     &ObjectiveSenses::new(),
//! )?;
//! println!("Pareto optimal: {:?}", front);
//! # Ok::<(), moo_explorer::error::MooError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod parser;
pub mod selection;
pub mod types;

// Re-export commonly used types
pub use crate::core::{pareto_front, resolve, SplomData};
pub use error::{MooError, MooResult};
pub use selection::{SelectionSet, SelectionToken};
pub use types::{
    Bound, Category, CellValue, Dimension, ObjectiveSense, ObjectiveSenses, RawTable,
    VariableConfig,
};
