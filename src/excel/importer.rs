//! Excel importer implementation - optimization log (.xlsx/.xls/.ods) → RawTable

use crate::error::{MooError, MooResult};
use crate::types::{CellValue, RawColumn, RawTable};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads the first non-empty worksheet of a workbook as a table whose first
/// row holds the column names
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn import(&self) -> MooResult<RawTable> {
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| MooError::Excel(format!("Failed to open Excel file: {}", e)))?;

        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                MooError::Excel(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;
            if range.is_empty() {
                continue;
            }
            debug!("Reading sheet '{}' from {}", sheet_name, self.path.display());
            return Ok(table_from_range(&range));
        }

        Err(MooError::Excel(format!(
            "No data found in {}",
            self.path.display()
        )))
    }
}

fn table_from_range(range: &Range<Data>) -> RawTable {
    let (_, width) = range.get_size();
    let mut rows = range.rows();

    let header: Vec<String> = match rows.next() {
        Some(cells) => header_names(cells, width),
        None => return RawTable::new(),
    };

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); width];
    for row in rows {
        for (col, cells) in columns.iter_mut().enumerate() {
            cells.push(row.get(col).map_or(CellValue::Null, convert_cell));
        }
    }

    let mut table = RawTable::new();
    for (name, cells) in header.into_iter().zip(columns) {
        table.add_column(RawColumn::new(name, cells));
    }
    table
}

/// Header cells as column names; blanks become `col_{n}` and repeats get a
/// `.{n}` suffix
fn header_names(cells: &[Data], width: usize) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    (0..width)
        .map(|col| {
            let base = match cells.get(col) {
                Some(Data::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Some(Data::Int(i)) => i.to_string(),
                Some(Data::Float(f)) => f.to_string(),
                _ => format!("col_{}", col),
            };
            let mut name = base.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", base, n);
                n += 1;
            }
            name
        })
        .collect()
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::Error(_) => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}
