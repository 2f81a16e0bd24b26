use crate::core::decode::DecoderChain;
use crate::types::{RawColumn, RawTable};
use std::collections::BTreeSet;

/// Non-missing cells inspected per column
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// True if any of the first `sample_size` non-missing cells decodes to more
/// than one value
pub fn is_array_column(column: &RawColumn, decoders: &DecoderChain, sample_size: usize) -> bool {
    column
        .cells
        .iter()
        .filter(|cell| !cell.is_missing())
        .take(sample_size)
        .any(|cell| decoders.decode(cell).is_some_and(|values| values.len() > 1))
}

/// Names of the columns that hold array values.
///
/// Callers offer `<name>_min` / `<name>_max` tokens for these instead of
/// the plain name.
pub fn detect_array_columns(table: &RawTable, sample_size: usize) -> BTreeSet<String> {
    let decoders = DecoderChain::standard();
    table
        .columns()
        .iter()
        .filter(|column| is_array_column(column, &decoders, sample_size))
        .map(|column| column.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    #[test]
    fn test_detects_encoded_arrays() {
        let mut table = RawTable::new();
        table.add_column(RawColumn::new("scalar", vec![1.0.into(), 2.0.into()]));
        table.add_column(RawColumn::new(
            "numpy",
            vec![CellValue::Null, "[0. 1.]".into()],
        ));
        table.add_column(RawColumn::new("native", vec![vec![1.0, 2.0].into(), CellValue::Null]));
        table.add_column(RawColumn::new("single", vec!["[3.0]".into(), "[4.0]".into()]));

        let detected = detect_array_columns(&table, DEFAULT_SAMPLE_SIZE);
        assert_eq!(
            detected.into_iter().collect::<Vec<_>>(),
            vec!["native".to_string(), "numpy".to_string()]
        );
    }

    #[test]
    fn test_sample_window_respected() {
        let mut cells: Vec<CellValue> = vec![1.0.into(); 3];
        cells.push("[1 2 3]".into());
        let column = RawColumn::new("late", cells);
        let decoders = DecoderChain::standard();
        assert!(!is_array_column(&column, &decoders, 3));
        assert!(is_array_column(&column, &decoders, 4));
    }
}
