use crate::error::{MooError, MooResult};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

//==============================================================================
// Raw Table (as loaded from the optimization log)
//==============================================================================

/// A single cell of the raw optimization table.
///
/// Array-valued outputs are stored either as a native sequence (JSON/YAML
/// input) or as text (CSV/Excel input) and are only decoded on request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Sequence(Vec<CellValue>),
}

impl CellValue {
    /// True for cells that carry no data (null, NaN, or blank text)
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Number(n) => n.is_nan(),
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Bool(_) | CellValue::Sequence(_) => false,
        }
    }

    /// Coerce a scalar cell to a number. Anything that is not a number,
    /// a boolean, or numeric text becomes NaN.
    pub fn as_f64(&self) -> f64 {
        match self {
            CellValue::Number(n) => *n,
            CellValue::Bool(b) => bool_to_f64(*b),
            CellValue::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            CellValue::Null | CellValue::Sequence(_) => f64::NAN,
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "Null",
            CellValue::Bool(_) => "Boolean",
            CellValue::Number(_) => "Number",
            CellValue::Text(_) => "Text",
            CellValue::Sequence(_) => "Sequence",
        }
    }

    /// Convert a parsed JSON value into a cell
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => CellValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            serde_json::Value::Array(items) => {
                CellValue::Sequence(items.iter().map(CellValue::from_json).collect())
            }
            serde_json::Value::Object(_) => CellValue::Text(value.to_string()),
        }
    }
}

pub(crate) fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<Vec<f64>> for CellValue {
    fn from(values: Vec<f64>) -> Self {
        CellValue::Sequence(values.into_iter().map(CellValue::Number).collect())
    }
}

/// A named column of raw cells
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub cells: Vec<CellValue>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// One row per optimization iteration, columns in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<RawColumn>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a header and row-major data.
    ///
    /// Every row must have exactly one cell per header entry.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<CellValue>>) -> MooResult<Self> {
        let mut cells: Vec<Vec<CellValue>> = vec![Vec::with_capacity(rows.len()); names.len()];
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(MooError::Validation(format!(
                    "Row {} has {} cells, expected {}",
                    row_idx,
                    row.len(),
                    names.len()
                )));
            }
            for (col_idx, cell) in row.into_iter().enumerate() {
                cells[col_idx].push(cell);
            }
        }

        let mut table = Self::new();
        for (name, column_cells) in names.into_iter().zip(cells) {
            table.add_column(RawColumn::new(name, column_cells));
        }
        Ok(table)
    }

    /// Add a column, replacing any existing column with the same name
    pub fn add_column(&mut self, column: RawColumn) {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    pub fn column(&self, name: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Get the number of rows (length of first column, all should be same)
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, RawColumn::len)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Validate all columns have the same length
    pub fn validate_lengths(&self) -> MooResult<()> {
        let row_count = self.row_count();
        for column in &self.columns {
            if column.len() != row_count {
                return Err(MooError::Validation(format!(
                    "Column '{}' has {} rows, expected {} rows",
                    column.name,
                    column.len(),
                    row_count
                )));
            }
        }
        Ok(())
    }
}

//==============================================================================
// Numeric Table (plot-ready output)
//==============================================================================

/// A named column of plain numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Simplified table handed to the renderer: one column per dimension plus
/// `sample_id`. Column names are display labels, not source names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumericTable {
    columns: Vec<NumericColumn>,
}

impl NumericTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a column, replacing an existing column with the same name in place
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        let name = name.into();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(NumericColumn { name, values }),
        }
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn columns(&self) -> &[NumericColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// Anything the Pareto engine can pull numeric objective columns from
pub trait ColumnSource {
    fn row_count(&self) -> usize;

    /// Numeric view of a column, or `None` when the column does not exist
    fn numeric_column(&self, name: &str) -> Option<Cow<'_, [f64]>>;
}

impl ColumnSource for RawTable {
    fn row_count(&self) -> usize {
        RawTable::row_count(self)
    }

    fn numeric_column(&self, name: &str) -> Option<Cow<'_, [f64]>> {
        self.column(name)
            .map(|c| Cow::Owned(c.cells.iter().map(CellValue::as_f64).collect()))
    }
}

impl ColumnSource for NumericTable {
    fn row_count(&self) -> usize {
        NumericTable::row_count(self)
    }

    fn numeric_column(&self, name: &str) -> Option<Cow<'_, [f64]>> {
        self.column(name).map(Cow::Borrowed)
    }
}

//==============================================================================
// Variable Configuration
//==============================================================================

/// Role of a variable in the optimization problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Objectives,
    Constraints,
    DesignVars,
}

impl Category {
    /// Lookup precedence when a name is listed in several sections
    pub const ALL: [Category; 3] = [
        Category::Objectives,
        Category::Constraints,
        Category::DesignVars,
    ];

    /// Section key used in the configuration document
    pub fn key(&self) -> &'static str {
        match self {
            Category::Objectives => "objectives",
            Category::Constraints => "constraints",
            Category::DesignVars => "design_vars",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Objectives => "Objectives",
            Category::Constraints => "Constraints",
            Category::DesignVars => "Design Variables",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Closed interval; a missing side is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bound {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Bound {
    /// Returns `None` when neither side is given
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Option<Self> {
        if lower.is_none() && upper.is_none() {
            None
        } else {
            Some(Self { lower, upper })
        }
    }

    /// NaN is never contained
    pub fn contains(&self, value: f64) -> bool {
        let above_lower = self.lower.map_or(!value.is_nan(), |lo| lo <= value);
        let below_upper = self.upper.map_or(!value.is_nan(), |hi| value <= hi);
        above_lower && below_upper
    }
}

/// A configured variable name with its optional bound
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSpec {
    pub name: String,
    pub bound: Option<Bound>,
}

impl VariableSpec {
    pub fn new(name: impl Into<String>, bound: Option<Bound>) -> Self {
        Self {
            name: name.into(),
            bound,
        }
    }
}

/// Ordered list of variables in one configuration section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableGroup {
    specs: Vec<VariableSpec>,
}

impl VariableGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a spec. A repeated name keeps its position and takes the new bound.
    pub fn push(&mut self, spec: VariableSpec) {
        match self.specs.iter_mut().find(|s| s.name == spec.name) {
            Some(existing) => existing.bound = spec.bound,
            None => self.specs.push(spec),
        }
    }

    pub fn get(&self, name: &str) -> Option<&VariableSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl FromIterator<VariableSpec> for VariableGroup {
    fn from_iter<I: IntoIterator<Item = VariableSpec>>(iter: I) -> Self {
        let mut group = Self::new();
        for spec in iter {
            group.push(spec);
        }
        group
    }
}

/// Objective/constraint/design-variable categorization of an optimization run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableConfig {
    pub objectives: VariableGroup,
    pub constraints: VariableGroup,
    pub design_vars: VariableGroup,
}

impl VariableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self, category: Category) -> &VariableGroup {
        match category {
            Category::Objectives => &self.objectives,
            Category::Constraints => &self.constraints,
            Category::DesignVars => &self.design_vars,
        }
    }

    pub fn group_mut(&mut self, category: Category) -> &mut VariableGroup {
        match category {
            Category::Objectives => &mut self.objectives,
            Category::Constraints => &mut self.constraints,
            Category::DesignVars => &mut self.design_vars,
        }
    }

    /// First matching section in objectives, constraints, design_vars order
    pub fn category_of(&self, name: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| self.group(*category).contains(name))
    }

    /// Bound used to filter array extremes: only constraints are filtered
    pub fn constraint_bound(&self, name: &str) -> Option<Bound> {
        self.constraints.get(name).and_then(|spec| spec.bound)
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.group(*c).is_empty())
    }
}

//==============================================================================
// Resolver and Pareto outputs
//==============================================================================

/// One plotted axis of the scatter-plot matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimension {
    pub label: String,
    pub values: Vec<f64>,
}

impl Dimension {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Dimension label to role, used for axis coloring
pub type CategoryMap = BTreeMap<String, Option<Category>>;

/// Optimization direction of an objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveSense {
    #[default]
    Minimize,
    Maximize,
}

impl FromStr for ObjectiveSense {
    type Err = MooError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimize" | "min" => Ok(ObjectiveSense::Minimize),
            "maximize" | "max" => Ok(ObjectiveSense::Maximize),
            other => Err(MooError::Parse(format!(
                "Unknown objective sense '{}' (expected 'minimize' or 'maximize')",
                other
            ))),
        }
    }
}

impl fmt::Display for ObjectiveSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveSense::Minimize => f.write_str("minimize"),
            ObjectiveSense::Maximize => f.write_str("maximize"),
        }
    }
}

/// Per-objective senses; unlisted objectives are minimized
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectiveSenses {
    senses: BTreeMap<String, ObjectiveSense>,
}

impl ObjectiveSenses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, sense: ObjectiveSense) {
        self.senses.insert(name.into(), sense);
    }

    pub fn sense_of(&self, name: &str) -> ObjectiveSense {
        self.senses.get(name).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ObjectiveSense)> {
        self.senses.iter().map(|(name, sense)| (name.as_str(), *sense))
    }

    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ObjectiveSense)> for ObjectiveSenses {
    fn from_iter<I: IntoIterator<Item = (S, ObjectiveSense)>>(iter: I) -> Self {
        let mut senses = Self::new();
        for (name, sense) in iter {
            senses.set(name, sense);
        }
        senses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_as_f64_coercion() {
        assert_eq!(CellValue::Number(2.5).as_f64(), 2.5);
        assert_eq!(CellValue::Bool(true).as_f64(), 1.0);
        assert_eq!(CellValue::from(" 4.0 ").as_f64(), 4.0);
        assert!(CellValue::from("abc").as_f64().is_nan());
        assert!(CellValue::Null.as_f64().is_nan());
        assert!(CellValue::from(vec![1.0, 2.0]).as_f64().is_nan());
    }

    #[test]
    fn test_cell_is_missing() {
        assert!(CellValue::Null.is_missing());
        assert!(CellValue::Number(f64::NAN).is_missing());
        assert!(CellValue::from("  ").is_missing());
        assert!(!CellValue::Number(0.0).is_missing());
        assert!(!CellValue::from("[0. 1.]").is_missing());
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let names = vec!["a".to_string(), "b".to_string()];
        let rows: Vec<Vec<CellValue>> = vec![vec![1.0.into(), 2.0.into()], vec![3.0.into()]];
        let err = RawTable::from_rows(names, rows).unwrap_err();
        assert!(err.to_string().contains("Row 1"));
    }

    #[test]
    fn test_from_rows_is_column_major() {
        let names = vec!["a".to_string(), "b".to_string()];
        let rows: Vec<Vec<CellValue>> = vec![
            vec![1.0.into(), "x".into()],
            vec![2.0.into(), "y".into()],
        ];
        let table = RawTable::from_rows(names, rows).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.column("b").unwrap().cells,
            vec![CellValue::from("x"), CellValue::from("y")]
        );
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_validate_lengths() {
        let mut table = RawTable::new();
        table.add_column(RawColumn::new("a", vec![1.0.into(), 2.0.into()]));
        table.add_column(RawColumn::new("b", vec![1.0.into()]));
        assert!(table.validate_lengths().is_err());
    }

    #[test]
    fn test_bound_contains() {
        let both = Bound::new(Some(0.0), Some(1.0)).unwrap();
        assert!(both.contains(0.0));
        assert!(both.contains(1.0));
        assert!(!both.contains(1.5));
        assert!(!both.contains(f64::NAN));

        let lower_only = Bound::new(Some(2.0), None).unwrap();
        assert!(lower_only.contains(1e9));
        assert!(!lower_only.contains(1.0));

        assert!(Bound::new(None, None).is_none());
    }

    #[test]
    fn test_category_precedence() {
        let mut config = VariableConfig::new();
        config.design_vars.push(VariableSpec::new("x", None));
        config.objectives.push(VariableSpec::new("x", None));
        config.constraints.push(VariableSpec::new("c", None));
        assert_eq!(config.category_of("x"), Some(Category::Objectives));
        assert_eq!(config.category_of("c"), Some(Category::Constraints));
        assert_eq!(config.category_of("missing"), None);
    }

    #[test]
    fn test_group_push_replaces_bound_in_place() {
        let mut group = VariableGroup::new();
        group.push(VariableSpec::new("a", None));
        group.push(VariableSpec::new("b", None));
        group.push(VariableSpec::new("a", Bound::new(Some(1.0), None)));
        assert_eq!(group.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(group.get("a").unwrap().bound.is_some());
    }

    #[test]
    fn test_objective_sense_parsing() {
        assert_eq!(
            "MAXIMIZE".parse::<ObjectiveSense>().unwrap(),
            ObjectiveSense::Maximize
        );
        assert_eq!(
            "min".parse::<ObjectiveSense>().unwrap(),
            ObjectiveSense::Minimize
        );
        assert!("sideways".parse::<ObjectiveSense>().is_err());
    }

    #[test]
    fn test_senses_default_to_minimize() {
        let senses: ObjectiveSenses = [("aep", ObjectiveSense::Maximize)].into_iter().collect();
        assert_eq!(senses.sense_of("aep"), ObjectiveSense::Maximize);
        assert_eq!(senses.sense_of("lcoe"), ObjectiveSense::Minimize);
    }

    #[test]
    fn test_numeric_table_insert_replaces() {
        let mut table = NumericTable::new();
        table.insert("mass", vec![1.0]);
        table.insert("mass", vec![2.0]);
        assert_eq!(table.columns().len(), 1);
        assert_eq!(table.column("mass"), Some(&[2.0][..]));
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let dim = Dimension::new("tip", vec![1.0, f64::NAN]);
        let json = serde_json::to_string(&dim).unwrap();
        assert_eq!(json, r#"{"label":"tip","values":[1.0,null]}"#);
    }
}
