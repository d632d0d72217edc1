//! CSV exports of untagged resources and remediated datasets.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use tagscope_core::{AnnotatedRecord, untagged_by_cost};
use tagscope_model::{Dataset, ResourceRecord};

/// Columns appended to the untagged resources export.
pub const UNTAGGED_EXTRA_COLUMNS: [&str; 2] = ["TagCompleteness", "MissingTags"];

/// Cells of `record` in the dataset's header order.
fn record_cells(dataset: &Dataset, record: &ResourceRecord) -> Vec<String> {
    dataset
        .columns()
        .iter()
        .map(|column| {
            if column == dataset.id_column() {
                record.id.clone()
            } else if column == dataset.cost_column() {
                record.cost.to_string()
            } else {
                record.value(column).unwrap_or_default().to_string()
            }
        })
        .collect()
}

/// Writes the untagged rows, most expensive first, with their completeness
/// and missing tags appended. Returns the number of rows written.
pub fn write_untagged_csv<W: Write>(
    writer: W,
    dataset: &Dataset,
    rows: &[AnnotatedRecord<'_>],
) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut header: Vec<&str> = dataset.columns().iter().map(String::as_str).collect();
    header.extend(UNTAGGED_EXTRA_COLUMNS);
    csv.write_record(&header).context("write header")?;

    let untagged = untagged_by_cost(rows);
    for row in &untagged {
        let mut cells = record_cells(dataset, row.record);
        cells.push(format!("{:.1}", row.score.percentage()));
        cells.push(row.score.missing.join(";"));
        csv.write_record(&cells)
            .with_context(|| format!("write resource {}", row.id()))?;
    }
    csv.flush().context("flush untagged export")?;
    Ok(untagged.len())
}

/// Writes every record of `dataset` in its original column order.
pub fn write_dataset_csv<W: Write>(writer: W, dataset: &Dataset) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(dataset.columns()).context("write header")?;
    for record in dataset.records() {
        csv.write_record(record_cells(dataset, record))
            .with_context(|| format!("write resource {}", record.id))?;
    }
    csv.flush().context("flush dataset export")?;
    Ok(dataset.len())
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Writes the untagged resources export to `path`.
pub fn export_untagged(path: &Path, dataset: &Dataset, rows: &[AnnotatedRecord<'_>]) -> Result<usize> {
    let written = write_untagged_csv(create_output(path)?, dataset, rows)?;
    info!(path = %path.display(), rows = written, "untagged resources exported");
    Ok(written)
}

/// Writes `dataset` (typically a remediated copy) to `path`.
pub fn export_dataset(path: &Path, dataset: &Dataset) -> Result<usize> {
    let written = write_dataset_csv(create_output(path)?, dataset)?;
    info!(path = %path.display(), rows = written, "dataset exported");
    Ok(written)
}
