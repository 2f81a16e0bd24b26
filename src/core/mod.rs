//! Variable resolution and Pareto analysis over optimization logs

pub mod decode;
pub mod detail;
pub mod detect;
pub mod pareto;
pub mod resolver;
pub mod stats;
pub mod view;

pub use decode::{finite_extremes, DecoderChain};
pub use detail::{row_detail, DetailEntry};
pub use detect::{detect_array_columns, DEFAULT_SAMPLE_SIZE};
pub use pareto::{dominates, pareto_front, ObjectiveMatrix};
pub use resolver::{resolve, SplomData, VariableResolver, SAMPLE_ID_COLUMN};
pub use stats::{summarize_dimensions, DimensionStats};
pub use view::{build_view, pareto_for_selection, DashboardView, Guidance, ViewOptions};
