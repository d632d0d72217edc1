//! CSV file reading into a header-plus-rows table.

use std::path::Path;

use ::csv::ReaderBuilder;

use crate::error::{IngestError, Result};

use super::header::{normalize_cell, normalize_header, unwrap_quoted_line};

/// Maximum file size for CSV loading (500 MB).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// A data row with the source line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl CsvRow {
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

impl CsvTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header == name)
            .or_else(|| {
                self.headers
                    .iter()
                    .position(|header| header.eq_ignore_ascii_case(name))
            })
    }
}

/// Reads a CSV file, returning the parsed table and the raw bytes.
pub fn read_csv_table(path: &Path) -> Result<(CsvTable, Vec<u8>)> {
    let bytes = read_bytes(path)?;
    let text = decode(path, &bytes)?;
    let table = parse_csv_text(&text, &path.display().to_string())?;
    Ok((table, bytes))
}

/// Parses CSV text. The first non-blank row is the header; blank rows are
/// skipped. Short rows are kept as-is so missing cells can be reported per
/// row rather than failing the whole file.
pub fn parse_csv_text(text: &str, source_name: &str) -> Result<CsvTable> {
    let cleaned: Vec<&str> = text.lines().map(unwrap_quoted_line).collect();
    let cleaned = cleaned.join("\n");
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(cleaned.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| IngestError::CsvParse {
            source_name: source_name.to_string(),
            message: error.to_string(),
        })?;
        let cells: Vec<String> = record.iter().map(normalize_cell).collect();
        if cells.iter().all(|value| value.is_empty()) {
            continue;
        }
        let line = record
            .position()
            .map_or(0, |position| position.line() as usize);
        match headers {
            None => headers = Some(record.iter().map(normalize_header).collect()),
            Some(_) => rows.push(CsvRow { line, cells }),
        }
    }
    let Some(headers) = headers else {
        return Err(IngestError::EmptyCsv {
            source_name: source_name.to_string(),
        });
    };
    Ok(CsvTable { headers, rows })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let metadata = std::fs::metadata(path).map_err(|e| not_found_or_read(path, e))?;
    if metadata.len() > MAX_CSV_FILE_SIZE {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: MAX_CSV_FILE_SIZE,
        });
    }
    std::fs::read(path).map_err(|e| not_found_or_read(path, e))
}

fn decode(path: &Path, bytes: &[u8]) -> Result<String> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 BE",
        });
    }
    String::from_utf8(bytes.to_vec()).map_err(|_| IngestError::UnsupportedEncoding {
        path: path.to_path_buf(),
        encoding: "non-UTF-8",
    })
}

fn not_found_or_read(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_rows_and_tracks_lines() {
        let table = parse_csv_text("A,B\n\n1,2\n,\n3,4\n", "inline").unwrap();
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].line, 3);
        assert_eq!(table.rows[1].cells, vec!["3", "4"]);
        assert_eq!(table.rows[1].line, 5);
    }

    #[test]
    fn empty_text_is_an_error() {
        let err = parse_csv_text("\n\n", "inline").unwrap_err();
        assert!(matches!(err, IngestError::EmptyCsv { .. }));
    }

    #[test]
    fn short_rows_are_kept() {
        let table = parse_csv_text("A,B,C\nx\n", "inline").unwrap();
        assert_eq!(table.rows[0].cells, vec!["x"]);
        assert_eq!(table.rows[0].get(2), None);
        assert_eq!(table.column_index("b"), Some(1));
    }
}
