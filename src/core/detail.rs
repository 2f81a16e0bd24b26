use crate::error::{MooError, MooResult};
use crate::types::{Category, CellValue, RawTable, VariableConfig};
use serde::Serialize;

/// One line of the detail table shown for a selected iteration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailEntry {
    pub name: String,
    pub value: CellValue,
    pub category: Option<Category>,
}

impl DetailEntry {
    /// Numbers to four decimals, missing values as `N/A`
    pub fn display_value(&self) -> String {
        format_cell(&self.value)
    }
}

fn format_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => "N/A".to_string(),
        CellValue::Number(n) if n.is_nan() => "N/A".to_string(),
        CellValue::Number(n) => format!("{:.4}", n),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Text(s) => s.clone(),
        CellValue::Sequence(items) => {
            let parts: Vec<String> = items.iter().map(format_cell).collect();
            format!("[{}]", parts.join(" "))
        }
    }
}

/// Transposed view of one row: every column with its raw value and role
pub fn row_detail(
    table: &RawTable,
    row: usize,
    config: &VariableConfig,
) -> MooResult<Vec<DetailEntry>> {
    if row >= table.row_count() {
        return Err(MooError::Validation(format!(
            "Iteration {} out of range (table has {} rows)",
            row,
            table.row_count()
        )));
    }

    Ok(table
        .columns()
        .iter()
        .filter_map(|column| {
            column.cells.get(row).map(|cell| DetailEntry {
                name: column.name.clone(),
                value: cell.clone(),
                category: config.category_of(&column.name),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawColumn, VariableSpec};

    #[test]
    fn test_row_detail() {
        let mut table = RawTable::new();
        table.add_column(RawColumn::new("a.x", vec![1.0.into(), 2.123456.into()]));
        table.add_column(RawColumn::new("b", vec![CellValue::Null, "[1 2]".into()]));
        let mut config = VariableConfig::new();
        config.design_vars.push(VariableSpec::new("a.x", None));

        let detail = row_detail(&table, 1, &config).unwrap();
        assert_eq!(detail.len(), 2);
        assert_eq!(detail[0].display_value(), "2.1235");
        assert_eq!(detail[0].category, Some(Category::DesignVars));
        assert_eq!(detail[1].display_value(), "[1 2]");
        assert_eq!(detail[1].category, None);

        let first = row_detail(&table, 0, &config).unwrap();
        assert_eq!(first[1].display_value(), "N/A");
    }

    #[test]
    fn test_row_out_of_range() {
        let mut table = RawTable::new();
        table.add_column(RawColumn::new("a", vec![1.0.into()]));
        assert!(row_detail(&table, 1, &VariableConfig::new()).is_err());
    }

    #[test]
    fn test_sequence_formatting() {
        let entry = DetailEntry {
            name: "s".to_string(),
            value: vec![1.0, f64::NAN].into(),
            category: None,
        };
        assert_eq!(entry.display_value(), "[1.0000 N/A]");
    }
}
