//! Variable resolution over a realistic optimization log

use moo_explorer::core::{resolve, VariableResolver, SAMPLE_ID_COLUMN};
use moo_explorer::parser::{load_table, parse_config};
use moo_explorer::selection::SelectionSet;
use moo_explorer::types::{Category, CellValue, RawColumn, RawTable, VariableConfig};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn test_data_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("test-data");
    path.push(filename);
    path
}

fn fixture() -> (RawTable, VariableConfig) {
    let table = load_table(&test_data_path("optimization_log.json")).unwrap();
    let config = parse_config(&test_data_path("analysis.yaml")).unwrap();
    (table, config)
}

fn same(actual: &[f64], expected: &[f64]) -> bool {
    actual.len() == expected.len()
        && actual
            .iter()
            .zip(expected)
            .all(|(a, e)| (a.is_nan() && e.is_nan()) || a == e)
}

#[test]
fn test_every_dimension_has_one_value_per_row() {
    let (table, config) = fixture();
    let selection = SelectionSet::from_tokens([
        "financese.lcoe",
        "towerse.stress_min",
        "towerse.stress_max",
        "tower.diameter",
        "converged",
    ]);

    let data = resolve(&table, &selection, &config).unwrap().unwrap();
    assert_eq!(data.dimensions.len(), 5);
    for dimension in &data.dimensions {
        assert_eq!(dimension.len(), table.row_count(), "{}", dimension.label);
    }
    assert_eq!(data.row_count(), table.row_count());
}

#[test]
fn test_labels_and_categories() {
    let (table, config) = fixture();
    let selection = SelectionSet::from_tokens([
        "tower.diameter",
        "towerse.stress_max",
        "financese.lcoe",
        "converged",
    ]);

    let data = resolve(&table, &selection, &config).unwrap().unwrap();
    assert_eq!(
        data.labels().collect::<Vec<_>>(),
        vec!["diameter", "stress_min", "stress_max", "lcoe", "converged"]
    );
    assert_eq!(data.categories["diameter"], Some(Category::DesignVars));
    assert_eq!(data.categories["stress_min"], Some(Category::Constraints));
    assert_eq!(data.categories["stress_max"], Some(Category::Constraints));
    assert_eq!(data.categories["lcoe"], Some(Category::Objectives));
    assert_eq!(data.categories["converged"], None);
    assert!(!data.categories.contains_key(SAMPLE_ID_COLUMN));
}

#[test]
fn test_array_extremes_with_constraint_bounds() {
    let (table, config) = fixture();
    let selection = SelectionSet::from_tokens(["towerse.stress_min", "towerse.stress_max"]);

    let data = resolve(&table, &selection, &config).unwrap().unwrap();
    let min = data.table.column("stress_min").unwrap();
    let max = data.table.column("stress_max").unwrap();

    // row 1 peaks above the upper bound of 1.0; rows 3 and 4 do not decode
    assert!(same(min, &[0.1, 0.2, 0.3, f64::NAN, f64::NAN]), "{:?}", min);
    assert!(same(max, &[0.9, f64::NAN, 0.6, f64::NAN, f64::NAN]), "{:?}", max);
}

#[test]
fn test_design_var_bounds_do_not_filter() {
    let mut table = RawTable::new();
    table.add_column(RawColumn::new(
        "tower.section_height",
        vec!["[1 20]".into(), "[2 3]".into()],
    ));
    table.add_column(RawColumn::new("x", vec![1.0.into(), 2.0.into()]));
    let config = moo_explorer::parser::parse_config_str(
        "design_vars:\n  - [tower.section_height, {lower: 0, upper: 5}]\n",
    )
    .unwrap();

    let data = resolve(
        &table,
        &SelectionSet::from_tokens(["tower.section_height_max", "x"]),
        &config,
    )
    .unwrap()
    .unwrap();
    assert_eq!(data.table.column("section_height_max").unwrap(), &[20.0, 3.0]);
}

#[test]
fn test_sample_id_is_row_ordinal() {
    let (table, config) = fixture();
    let data = resolve(
        &table,
        &SelectionSet::from_tokens(["financese.lcoe", "floatingse.mass"]),
        &config,
    )
    .unwrap()
    .unwrap();
    assert_eq!(
        data.table.column(SAMPLE_ID_COLUMN).unwrap(),
        &[0.0, 1.0, 2.0, 3.0, 4.0]
    );
}

#[test]
fn test_scalar_round_trip() {
    let (table, config) = fixture();
    let data = resolve(
        &table,
        &SelectionSet::from_tokens(["financese.lcoe", "tower.diameter"]),
        &config,
    )
    .unwrap()
    .unwrap();

    let source: Vec<f64> = table
        .column("financese.lcoe")
        .unwrap()
        .cells
        .iter()
        .map(CellValue::as_f64)
        .collect();
    assert_eq!(data.table.column("lcoe").unwrap(), source.as_slice());
    assert_eq!(
        data.table.column("diameter").unwrap(),
        &[5.0, 6.0, 7.0, 8.0, 9.0]
    );
}

#[test]
fn test_unknown_tokens_are_ignored() {
    let (table, config) = fixture();
    assert_eq!(
        resolve(
            &table,
            &SelectionSet::from_tokens(["nope", "also.nope_max"]),
            &config
        )
        .unwrap(),
        None
    );

    let data = resolve(
        &table,
        &SelectionSet::from_tokens(["nope", "financese.lcoe"]),
        &config,
    )
    .unwrap()
    .unwrap();
    assert_eq!(data.labels().collect::<Vec<_>>(), vec!["lcoe"]);
}

#[test]
fn test_resolution_is_deterministic() {
    let (table, config) = fixture();
    let selection = SelectionSet::from_tokens([
        "financese.lcoe",
        "towerse.stress_max",
        "tower.diameter",
    ]);
    let resolver = VariableResolver::new(&config);

    let first = resolver.resolve(&table, &selection).unwrap().unwrap();
    let second = resolver.resolve(&table, &selection).unwrap().unwrap();
    assert_eq!(first.labels().collect::<Vec<_>>(), second.labels().collect::<Vec<_>>());
    assert_eq!(first.categories, second.categories);
    for (a, b) in first.dimensions.iter().zip(&second.dimensions) {
        assert!(same(&a.values, &b.values));
    }
}

#[test]
fn test_ragged_table_is_rejected() {
    let mut table = RawTable::new();
    table.add_column(RawColumn::new("a", vec![1.0.into(), 2.0.into()]));
    table.add_column(RawColumn::new("b", vec![1.0.into()]));

    let result = resolve(
        &table,
        &SelectionSet::from_tokens(["a", "b"]),
        &VariableConfig::new(),
    );
    assert!(result.is_err());
}
