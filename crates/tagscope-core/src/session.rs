//! Session state and recomputation of the read models.

use serde::Serialize;

use tagscope_model::{AggregateGroup, Dataset, Dimension, EditDraft, TagSchema, TagscopeError};

use crate::aggregate::aggregate;
use crate::compliance::{AnnotatedRecord, annotate};
use crate::filter::{FilterSpec, apply_filters};
use crate::remediation::{RemediationReport, simulate_draft};

/// Everything a single user session can change: filter selections, the
/// grouping choice, and pending edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub filters: FilterSpec,
    pub grouping: Vec<Dimension>,
    pub draft: EditDraft,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_filters(mut self, filters: FilterSpec) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn with_grouping(mut self, grouping: Vec<Dimension>) -> Self {
        self.grouping = grouping;
        self
    }

    #[must_use]
    pub fn with_draft(mut self, draft: EditDraft) -> Self {
        self.draft = draft;
        self
    }
}

/// Read models handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Views<'a> {
    /// Filtered records annotated with their compliance score.
    pub rows: Vec<AnnotatedRecord<'a>>,
    /// Cost aggregates over `rows`.
    pub groups: Vec<AggregateGroup>,
    /// Before/after comparison, when the session has pending edits.
    pub remediation: Option<RemediationReport>,
}

/// Recomputes every read model from scratch. Holds no state between calls.
pub fn recompute<'a>(
    dataset: &'a Dataset,
    schema: &TagSchema,
    session: &Session,
) -> Result<Views<'a>, TagscopeError> {
    let annotated = annotate(dataset.records(), schema);
    let rows: Vec<AnnotatedRecord<'a>> = apply_filters(&annotated, &session.filters)
        .into_iter()
        .cloned()
        .collect();
    let groups = aggregate(&rows, &session.grouping)?;
    let remediation = if session.draft.is_empty() {
        None
    } else {
        Some(simulate_draft(
            dataset,
            &session.filters,
            &session.draft,
            schema,
        )?)
    };
    Ok(Views {
        rows,
        groups,
        remediation,
    })
}
