//! CSV reading utilities.

mod header;
mod reader;

pub use header::{normalize_cell, normalize_header, unwrap_quoted_line};
pub use reader::{CsvRow, CsvTable, MAX_CSV_FILE_SIZE, parse_csv_text, read_csv_table};
