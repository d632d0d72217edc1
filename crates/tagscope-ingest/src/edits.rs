//! Edit drafts read from a CSV file.
//!
//! An edits file has the resource ID column plus one column per field to
//! set, e.g. `ResourceID,Department,Owner`. Empty cells leave the field
//! as it is.

use std::path::Path;

use tracing::{debug, warn};

use tagscope_model::EditDraft;

use crate::csv::{CsvTable, parse_csv_text, read_csv_table};
use crate::error::{IngestError, Result};

pub fn load_edit_draft(path: &Path, id_column: &str) -> Result<EditDraft> {
    let (table, _) = read_csv_table(path)?;
    edit_draft_from_table(&table, id_column, &path.display().to_string())
}

pub fn edit_draft_from_str(text: &str, id_column: &str) -> Result<EditDraft> {
    let table = parse_csv_text(text, "<inline>")?;
    edit_draft_from_table(&table, id_column, "<inline>")
}

fn edit_draft_from_table(table: &CsvTable, id_column: &str, source_name: &str) -> Result<EditDraft> {
    let id_index = table
        .column_index(id_column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: id_column.to_string(),
            source_name: source_name.to_string(),
        })?;

    let mut draft = EditDraft::new();
    for row in &table.rows {
        let Some(resource_id) = row.get(id_index).filter(|value| !value.is_empty()) else {
            warn!(line = row.line, source = %source_name, "edit row without resource id skipped");
            continue;
        };
        for (index, field) in table.headers.iter().enumerate() {
            if index == id_index {
                continue;
            }
            if let Some(value) = row.get(index).filter(|value| !value.is_empty()) {
                draft.set(resource_id, field.as_str(), value);
            }
        }
    }
    debug!(source = %source_name, resources = draft.len(), "edit draft loaded");
    Ok(draft)
}
