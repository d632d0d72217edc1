//! Translation of command-line selections into a [`Session`].

use std::path::Path;

use anyhow::{Context, Result};

use tagscope_core::{FilterSpec, Session, parse_selection, resolve_dimension};
use tagscope_ingest::load_edit_draft;
use tagscope_model::{ConfigError, Dataset, Dimension, EditDraft, TagSchema, parse_edit};

/// Parses a dimension name and maps it onto the dataset's header spelling.
pub fn parse_dimension(dataset: &Dataset, raw: &str) -> Result<Dimension, ConfigError> {
    resolve_dimension(dataset, raw.parse()?)
}

/// Builds filters from `DIMENSION=V1,V2` selections. A later selection on
/// the same dimension replaces an earlier one.
pub fn build_filters(dataset: &Dataset, selections: &[String]) -> Result<FilterSpec, ConfigError> {
    let mut filters = FilterSpec::new();
    for raw in selections {
        let (dimension, values) = parse_selection(raw)?;
        filters.restrict(resolve_dimension(dataset, dimension)?, values)?;
    }
    Ok(filters)
}

pub fn build_grouping(dataset: &Dataset, names: &[String]) -> Result<Vec<Dimension>, ConfigError> {
    names
        .iter()
        .map(|name| parse_dimension(dataset, name))
        .collect()
}

/// Collects edits from an optional edits file and `ID:FIELD=VALUE`
/// arguments; arguments win over the file. Field names are mapped onto the
/// expected tag spelling where they match one.
pub fn build_draft(
    dataset: &Dataset,
    schema: &TagSchema,
    edits: &[String],
    edits_file: Option<&Path>,
) -> Result<EditDraft> {
    let mut draft = match edits_file {
        Some(path) => {
            let loaded = load_edit_draft(path, dataset.id_column())
                .with_context(|| format!("load edits file {}", path.display()))?;
            canonical_fields(&loaded, schema)
        }
        None => EditDraft::new(),
    };
    let mut arguments = EditDraft::new();
    for raw in edits {
        let (resource_id, field, value) = parse_edit(raw)?;
        arguments.set(resource_id, field, value);
    }
    draft.merge(canonical_fields(&arguments, schema));
    draft.validate(dataset).context("validate edits")?;
    Ok(draft)
}

fn canonical_fields(draft: &EditDraft, schema: &TagSchema) -> EditDraft {
    let mut canonical = EditDraft::new();
    for (resource_id, fields) in draft.iter() {
        for (field, value) in fields {
            let field = schema.canonical(field).unwrap_or(field.as_str());
            canonical.set(resource_id.as_str(), field, value.as_str());
        }
    }
    canonical
}

/// Assembles a session from parsed selections.
pub fn build_session(
    dataset: &Dataset,
    schema: &TagSchema,
    filters: &[String],
    group_by: &[String],
    edits: &[String],
    edits_file: Option<&Path>,
) -> Result<Session> {
    Ok(Session::new()
        .with_filters(build_filters(dataset, filters).context("parse filters")?)
        .with_grouping(build_grouping(dataset, group_by).context("parse grouping")?)
        .with_draft(build_draft(dataset, schema, edits, edits_file)?))
}
