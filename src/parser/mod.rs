use crate::error::{MooError, MooResult};
use crate::excel::ExcelImporter;
use crate::types::{
    Bound, Category, CellValue, ObjectiveSense, ObjectiveSenses, RawColumn, RawTable,
    VariableConfig, VariableSpec,
};
use serde_yaml::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Parse a variable configuration file.
///
/// The file holds up to three sections, `objectives`, `constraints` and
/// `design_vars`, each a list whose entries are either a bare variable name
/// or a `[name, {lower, upper}]` pair. Missing sections are empty.
///
/// # Example
/// ```no_run
/// use moo_explorer::parser::parse_config;
/// use std::path::Path;
///
/// let config = parse_config(Path::new("analysis.yaml"))?;
/// println!("Objectives: {}", config.objectives.len());
/// # Ok::<(), moo_explorer::error::MooError>(())
/// ```
pub fn parse_config(path: &Path) -> MooResult<VariableConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> MooResult<VariableConfig> {
    if content.trim().is_empty() {
        return Ok(VariableConfig::new());
    }
    let yaml: Value = serde_yaml::from_str(content)?;
    parse_config_value(&yaml)
}

/// Build a configuration from an already parsed YAML document.
///
/// Malformed entries are skipped with a warning; a malformed bound makes the
/// variable unbounded.
pub fn parse_config_value(yaml: &Value) -> MooResult<VariableConfig> {
    let mut config = VariableConfig::new();

    let map = match yaml {
        Value::Null => return Ok(config),
        Value::Mapping(map) => map,
        other => {
            return Err(MooError::Validation(format!(
                "Configuration must be a mapping, found {}",
                yaml_type_name(other)
            )))
        }
    };

    for category in Category::ALL {
        let entries = match map.get(category.key()) {
            None | Some(Value::Null) => continue,
            Some(Value::Sequence(entries)) => entries,
            Some(other) => {
                return Err(MooError::Validation(format!(
                    "Section '{}' must be a list, found {}",
                    category.key(),
                    yaml_type_name(other)
                )))
            }
        };

        let group = config.group_mut(category);
        for (i, entry) in entries.iter().enumerate() {
            match parse_entry(entry) {
                Some(spec) => group.push(spec),
                None => warn!(
                    "Skipping malformed entry {} in '{}': expected a name or [name, {{lower, upper}}]",
                    i,
                    category.key()
                ),
            }
        }
        debug!("Loaded {} {}", group.len(), category.key());
    }

    Ok(config)
}

fn parse_entry(entry: &Value) -> Option<VariableSpec> {
    match entry {
        Value::String(name) => Some(VariableSpec::new(name.as_str(), None)),
        Value::Sequence(items) => {
            let name = items.first()?.as_str()?;
            let bound = items.get(1).and_then(parse_bound);
            Some(VariableSpec::new(name, bound))
        }
        _ => None,
    }
}

fn parse_bound(value: &Value) -> Option<Bound> {
    let map = value.as_mapping()?;
    Bound::new(bound_side(map, "lower"), bound_side(map, "upper"))
}

fn bound_side(map: &serde_yaml::Mapping, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse an objective-sense mapping (`name: minimize | maximize`).
///
/// Accepts YAML or JSON.
pub fn parse_senses_str(content: &str) -> MooResult<ObjectiveSenses> {
    let mut senses = ObjectiveSenses::new();
    if content.trim().is_empty() {
        return Ok(senses);
    }
    let yaml: Value = serde_yaml::from_str(content)?;

    let map = match &yaml {
        Value::Null => return Ok(senses),
        Value::Mapping(map) => map,
        other => {
            return Err(MooError::Validation(format!(
                "Objective senses must be a mapping, found {}",
                yaml_type_name(other)
            )))
        }
    };

    for (key, value) in map {
        let name = key
            .as_str()
            .ok_or_else(|| MooError::Parse("Objective name must be a string".to_string()))?;
        let sense = value.as_str().ok_or_else(|| {
            MooError::Parse(format!("Sense for '{}' must be a string", name))
        })?;
        senses.set(name, sense.parse()?);
    }

    Ok(senses)
}

pub fn parse_senses(path: &Path) -> MooResult<ObjectiveSenses> {
    let content = std::fs::read_to_string(path)?;
    parse_senses_str(&content)
}

/// Parse a `name=sense` command-line pair
pub fn parse_sense_arg(arg: &str) -> MooResult<(String, ObjectiveSense)> {
    let (name, sense) = arg.rsplit_once('=').ok_or_else(|| {
        MooError::Parse(format!("Expected NAME=minimize|maximize, got '{}'", arg))
    })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(MooError::Parse(format!("Missing objective name in '{}'", arg)));
    }
    Ok((name.to_string(), sense.parse()?))
}

/// Load an optimization log from JSON.
///
/// Two layouts are accepted: `{"columns": [...], "data": [[...], ...]}` and
/// a list of row objects. In the row layout, keys missing from a row become
/// missing cells.
pub fn load_table_json_str(content: &str) -> MooResult<RawTable> {
    let json: serde_json::Value = serde_json::from_str(content)?;

    match &json {
        serde_json::Value::Object(map) if map.contains_key("columns") => {
            let names = map
                .get("columns")
                .and_then(|c| c.as_array())
                .ok_or_else(|| MooError::Parse("'columns' must be a list".to_string()))?
                .iter()
                .map(|name| match name {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>();

            let rows = match map.get("data") {
                None | Some(serde_json::Value::Null) => Vec::new(),
                Some(serde_json::Value::Array(rows)) => rows
                    .iter()
                    .enumerate()
                    .map(|(i, row)| {
                        row.as_array()
                            .map(|cells| cells.iter().map(CellValue::from_json).collect())
                            .ok_or_else(|| {
                                MooError::Parse(format!("Row {} in 'data' must be a list", i))
                            })
                    })
                    .collect::<MooResult<Vec<Vec<CellValue>>>>()?,
                Some(_) => return Err(MooError::Parse("'data' must be a list".to_string())),
            };

            RawTable::from_rows(names, rows)
        }
        serde_json::Value::Array(records) => load_records(records),
        _ => Err(MooError::Parse(
            "Expected a {\"columns\", \"data\"} object or a list of records".to_string(),
        )),
    }
}

fn load_records(records: &[serde_json::Value]) -> MooResult<RawTable> {
    let mut names: Vec<String> = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let object = record
            .as_object()
            .ok_or_else(|| MooError::Parse(format!("Record {} must be an object", i)))?;
        for key in object.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let mut table = RawTable::new();
    for name in names {
        let cells = records
            .iter()
            .map(|record| {
                record
                    .get(&name)
                    .map_or(CellValue::Null, CellValue::from_json)
            })
            .collect();
        table.add_column(RawColumn::new(name, cells));
    }
    Ok(table)
}

pub fn load_table_json(path: &Path) -> MooResult<RawTable> {
    let content = std::fs::read_to_string(path)?;
    load_table_json_str(&content)
}

/// Load an optimization log from CSV.
///
/// The first record is the header. Empty fields are missing cells, numeric
/// fields become numbers and `True`/`False` become booleans. Anything else,
/// including serialized arrays such as `"[0.1 0.5]"`, stays text for the
/// decoders.
pub fn load_table_csv_str(content: &str) -> MooResult<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let names = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let name = name.trim();
            if name.is_empty() {
                format!("col_{}", i)
            } else {
                name.to_string()
            }
        })
        .collect::<Vec<_>>();

    let rows = reader
        .records()
        .map(|record| Ok(record?.iter().map(csv_cell).collect()))
        .collect::<MooResult<Vec<Vec<CellValue>>>>()?;

    RawTable::from_rows(names, rows)
}

/// Load an optimization log from a CSV file
pub fn load_table_csv(path: &Path) -> MooResult<RawTable> {
    let content = std::fs::read_to_string(path)?;
    load_table_csv_str(&content)
}

fn csv_cell(field: &str) -> CellValue {
    let field = field.trim();
    if field.is_empty() {
        return CellValue::Null;
    }
    match field {
        "True" | "true" | "TRUE" => return CellValue::Bool(true),
        "False" | "false" | "FALSE" => return CellValue::Bool(false),
        _ => {}
    }
    match field.parse::<f64>() {
        Ok(n) => CellValue::Number(n),
        Err(_) => CellValue::Text(field.to_string()),
    }
}

/// Load an optimization log, choosing the reader from the file extension
pub fn load_table(path: &Path) -> MooResult<RawTable> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = match extension.as_str() {
        "json" => load_table_json(path)?,
        "csv" => load_table_csv(path)?,
        "xlsx" | "xlsm" | "xls" | "ods" => ExcelImporter::new(path).import()?,
        other => {
            return Err(MooError::Parse(format!(
                "Unsupported table format '{}' for {} (expected .csv, .json, .xlsx, .xls or .ods)",
                other,
                path.display()
            )))
        }
    };

    debug!(
        "Loaded {} columns x {} rows from {}",
        table.columns().len(),
        table.row_count(),
        path.display()
    );
    Ok(table)
}

fn yaml_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_entries() {
        let yaml = r#"
objectives:
  - financese.lcoe
  - floatingse.system_structural_mass
constraints:
  - [towerse.stress, {lower: 0.0, upper: 1.0}]
  - [floatingse.draft, {upper: "12.5"}]
  - [rotor.tip_deflection, {}]
design_vars:
  - [tower.diameter, {lower: 3, upper: 10}]
"#;
        let config = parse_config_str(yaml).unwrap();

        assert_eq!(config.objectives.len(), 2);
        assert_eq!(config.constraints.len(), 3);
        assert_eq!(
            config.constraint_bound("towerse.stress"),
            Bound::new(Some(0.0), Some(1.0))
        );
        assert_eq!(
            config.constraint_bound("floatingse.draft"),
            Bound::new(None, Some(12.5))
        );
        assert_eq!(config.constraint_bound("rotor.tip_deflection"), None);
        assert_eq!(
            config.category_of("tower.diameter"),
            Some(Category::DesignVars)
        );
    }

    #[test]
    fn test_parse_config_missing_sections() {
        let config = parse_config_str("objectives: [a]\n").unwrap();
        assert_eq!(config.objectives.len(), 1);
        assert!(config.constraints.is_empty());
        assert!(config.design_vars.is_empty());

        assert!(parse_config_str("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_config_rejects_bad_shapes() {
        assert!(matches!(
            parse_config_str("- a\n- b\n"),
            Err(MooError::Validation(_))
        ));
        assert!(matches!(
            parse_config_str("objectives: lcoe\n"),
            Err(MooError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_config_skips_malformed_entries() {
        let config = parse_config_str("objectives:\n  - 42\n  - []\n  - ok\n").unwrap();
        assert_eq!(config.objectives.names().collect::<Vec<_>>(), vec!["ok"]);
    }

    #[test]
    fn test_parse_senses() {
        let senses = parse_senses_str("aep: Maximize\nlcoe: min\n").unwrap();
        assert_eq!(senses.sense_of("aep"), ObjectiveSense::Maximize);
        assert_eq!(senses.sense_of("lcoe"), ObjectiveSense::Minimize);

        let json = parse_senses_str(r#"{"aep": "maximize"}"#).unwrap();
        assert_eq!(json.sense_of("aep"), ObjectiveSense::Maximize);

        assert!(parse_senses_str("aep: sideways\n").is_err());
    }

    #[test]
    fn test_parse_sense_arg() {
        assert_eq!(
            parse_sense_arg("fin.aep=maximize").unwrap(),
            ("fin.aep".to_string(), ObjectiveSense::Maximize)
        );
        assert!(parse_sense_arg("fin.aep").is_err());
        assert!(parse_sense_arg("=max").is_err());
    }

    #[test]
    fn test_load_split_json() {
        let json = r#"{"columns": ["a", "b"], "data": [[1, "[1 2]"], [2.5, null]]}"#;
        let table = load_table_json_str(json).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.column("b").unwrap().cells,
            vec![CellValue::from("[1 2]"), CellValue::Null]
        );
    }

    #[test]
    fn test_load_split_json_ragged_rows() {
        let json = r#"{"columns": ["a", "b"], "data": [[1, 2], [3]]}"#;
        assert!(load_table_json_str(json).is_err());
    }

    #[test]
    fn test_load_records_json() {
        let json = r#"[{"a": 1, "b": [1.0, 2.0]}, {"a": 2, "c": true}]"#;
        let table = load_table_json_str(json).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(table.column("b").unwrap().cells[1], CellValue::Null);
        assert_eq!(table.column("c").unwrap().cells[1], CellValue::Bool(true));
    }

    #[test]
    fn test_load_table_unknown_extension() {
        let err = load_table(Path::new("log.parquet")).unwrap_err();
        assert!(err.to_string().contains("Unsupported table format"));
    }

    #[test]
    fn test_load_csv_cells() {
        let content = "financese.lcoe,towerse.stress,converged,note\n\
                   51.2,\"[0.1 0.5 0.9]\",True,\n\
                   ,\"[0.2, 0.8]\",False,restart\n";
        let table = load_table_csv_str(content).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.column("financese.lcoe").unwrap().cells,
            vec![CellValue::Number(51.2), CellValue::Null]
        );
        assert_eq!(
            table.column("towerse.stress").unwrap().cells[1],
            CellValue::Text("[0.2, 0.8]".to_string())
        );
        assert_eq!(table.column("converged").unwrap().cells[0], CellValue::Bool(true));
        assert_eq!(
            table.column("note").unwrap().cells,
            vec![CellValue::Null, CellValue::Text("restart".to_string())]
        );
    }

    #[test]
    fn test_load_csv_blank_header_and_ragged_row() {
        let table = load_table_csv_str(",x\n0,1.5\n1,2.5\n").unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["col_0", "x"]);

        let err = load_table_csv_str("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, MooError::Csv(_)));
    }
}
