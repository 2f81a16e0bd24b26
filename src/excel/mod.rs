//! Excel import for optimization logs
//!
//! Spreadsheet exports of the optimization log are read with `calamine`
//! into the same raw table the JSON loader produces.

mod importer;

pub use importer::ExcelImporter;
