//! Conversion of a CSV table into a validated [`Dataset`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use tagscope_model::{Dataset, ResourceRecord, ValidationError, add_cost};

use crate::csv::{CsvRow, CsvTable, parse_csv_text, read_csv_table};
use crate::error::{IngestError, Result};
use crate::fingerprint::dataset_fingerprint;

pub const DEFAULT_ID_COLUMN: &str = "ResourceID";
pub const DEFAULT_COST_COLUMN: &str = "MonthlyCostUSD";

/// Names of the key columns in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub id_column: String,
    pub cost_column: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
            cost_column: DEFAULT_COST_COLUMN.to_string(),
        }
    }
}

/// A row excluded from the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line in the source file.
    pub line: usize,
    pub resource_id: Option<String>,
    pub error: ValidationError,
}

#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub rejected: Vec<RejectedRow>,
    pub fingerprint: String,
    pub source: Option<PathBuf>,
}

impl LoadedDataset {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Loads and validates a resource CSV file.
///
/// Rows with a missing ID, a missing, unparsable or negative cost, or a
/// repeated ID are excluded and returned in `rejected`, as is a row whose
/// cost would push the dataset total past [`Decimal::MAX`]. The load itself
/// only fails on file-level problems.
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<LoadedDataset> {
    let (table, bytes) = read_csv_table(path)?;
    let source_name = path.display().to_string();
    let (dataset, rejected) = build_dataset(&table, options, &source_name)?;
    info!(
        source = %source_name,
        records = dataset.len(),
        rejected = rejected.len(),
        total_cost = %dataset.total_cost(),
        "dataset loaded"
    );
    Ok(LoadedDataset {
        dataset,
        rejected,
        fingerprint: dataset_fingerprint(&bytes),
        source: Some(path.to_path_buf()),
    })
}

/// Same as [`load_dataset`] for in-memory CSV text.
pub fn load_dataset_from_str(text: &str, options: &LoadOptions) -> Result<LoadedDataset> {
    let table = parse_csv_text(text, "<inline>")?;
    let (dataset, rejected) = build_dataset(&table, options, "<inline>")?;
    Ok(LoadedDataset {
        dataset,
        rejected,
        fingerprint: dataset_fingerprint(text.as_bytes()),
        source: None,
    })
}

pub fn build_dataset(
    table: &CsvTable,
    options: &LoadOptions,
    source_name: &str,
) -> Result<(Dataset, Vec<RejectedRow>)> {
    let id_index = required_column(table, &options.id_column, source_name)?;
    let cost_index = required_column(table, &options.cost_column, source_name)?;
    let id_column = table.headers[id_index].clone();
    let cost_column = table.headers[cost_index].clone();

    let mut seen = BTreeSet::new();
    let mut records = Vec::with_capacity(table.rows.len());
    let mut rejected = Vec::new();
    let mut total = Decimal::ZERO;
    for row in &table.rows {
        match build_record(table, row, id_index, cost_index) {
            Ok(record) if seen.contains(&record.id) => {
                rejected.push(reject(
                    row,
                    Some(record.id.clone()),
                    ValidationError::DuplicateResourceId {
                        resource_id: record.id,
                    },
                ));
            }
            Ok(record) => match add_cost(total, record.cost, &record.id) {
                Ok(sum) => {
                    total = sum;
                    seen.insert(record.id.clone());
                    records.push(record);
                }
                Err(error) => rejected.push(reject(row, Some(record.id), error)),
            },
            Err(error) => {
                let resource_id = row
                    .get(id_index)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string);
                rejected.push(reject(row, resource_id, error));
            }
        }
    }

    let dataset = Dataset::new(table.headers.clone(), id_column, cost_column, records)?;
    Ok((dataset, rejected))
}

/// Parses a cost cell. Accepts an optional sign, an optional `$` before or
/// after it, thousands separators, and scientific notation.
pub fn parse_cost(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = unsigned
        .strip_prefix('$')
        .unwrap_or(unsigned)
        .chars()
        .filter(|ch| *ch != ',')
        .collect();
    if digits.is_empty() {
        return None;
    }
    let cleaned = format!("{sign}{digits}");
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

fn required_column(table: &CsvTable, column: &str, source_name: &str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: column.to_string(),
            source_name: source_name.to_string(),
        })
}

fn build_record(
    table: &CsvTable,
    row: &CsvRow,
    id_index: usize,
    cost_index: usize,
) -> std::result::Result<ResourceRecord, ValidationError> {
    let id = row
        .get(id_index)
        .filter(|value| !value.is_empty())
        .ok_or(ValidationError::MissingResourceId)?;
    let raw_cost = row
        .get(cost_index)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ValidationError::MissingCost {
            resource_id: id.to_string(),
        })?;
    let cost = parse_cost(raw_cost).ok_or_else(|| ValidationError::InvalidCost {
        resource_id: id.to_string(),
        value: raw_cost.to_string(),
    })?;
    if cost < Decimal::ZERO {
        return Err(ValidationError::NegativeCost {
            resource_id: id.to_string(),
            cost,
        });
    }

    let mut fields = BTreeMap::new();
    for (index, header) in table.headers.iter().enumerate() {
        if index == id_index || index == cost_index {
            continue;
        }
        let value = row.get(index).unwrap_or_default();
        fields.insert(header.clone(), value.to_string());
    }
    debug!(resource_id = %id, "record parsed");
    Ok(ResourceRecord {
        id: id.to_string(),
        cost,
        fields,
    })
}

fn reject(row: &CsvRow, resource_id: Option<String>, error: ValidationError) -> RejectedRow {
    warn!(line = row.line, %error, "row rejected");
    RejectedRow {
        line: row.line,
        resource_id,
        error,
    }
}
