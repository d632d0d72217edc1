//! Simulated tag remediation with before/after comparison.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use tagscope_model::{
    ComplianceScore, Dataset, EditDraft, FieldEdits, ResourceRecord, TagSchema, TagscopeError,
    percentage,
};

use crate::compliance::{AnnotatedRecord, TaggingTotals, annotate, score};
use crate::filter::{FilterSpec, apply_filters};

/// Returns a copy of `record` with `edits` applied. The original is left
/// untouched. Values are trimmed, so a blank edit clears the tag. Edit keys
/// match existing fields case-insensitively.
pub fn apply_edits(record: &ResourceRecord, edits: &FieldEdits) -> ResourceRecord {
    let mut edited = record.clone();
    for (field, value) in edits {
        let key = edited
            .fields
            .keys()
            .find(|existing| existing.eq_ignore_ascii_case(field))
            .cloned()
            .unwrap_or_else(|| field.clone());
        edited.fields.insert(key, value.trim().to_string());
    }
    edited
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemediationOutcome {
    pub resource_id: String,
    pub cost: Decimal,
    pub before: ComplianceScore,
    pub after: ComplianceScore,
    pub edited: ResourceRecord,
}

impl RemediationOutcome {
    pub fn completeness_delta(&self) -> f64 {
        self.after.completeness - self.before.completeness
    }

    pub fn newly_tagged(&self) -> bool {
        !self.before.fully_tagged && self.after.fully_tagged
    }
}

/// Applies `edits` to a copy of `record` and scores both versions.
pub fn simulate(record: &ResourceRecord, edits: &FieldEdits, schema: &TagSchema) -> RemediationOutcome {
    let edited = apply_edits(record, edits);
    RemediationOutcome {
        resource_id: record.id.clone(),
        cost: record.cost,
        before: score(record, schema),
        after: score(&edited, schema),
        edited,
    }
}

/// Outcome of an entire edit draft over a filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemediationReport {
    pub outcomes: Vec<RemediationOutcome>,
    pub before: TaggingTotals,
    pub after: TaggingTotals,
}

impl RemediationReport {
    pub fn tagged_delta(&self) -> i64 {
        self.after.tagged as i64 - self.before.tagged as i64
    }

    pub fn untagged_delta(&self) -> i64 {
        self.after.untagged as i64 - self.before.untagged as i64
    }

    pub fn untagged_cost_delta(&self) -> Decimal {
        self.after.untagged_cost - self.before.untagged_cost
    }

    /// Reduction in untagged resources relative to the starting count.
    pub fn compliance_improvement_percentage(&self) -> Decimal {
        let reduced = self.before.untagged.saturating_sub(self.after.untagged);
        percentage(Decimal::from(reduced), Decimal::from(self.before.untagged))
    }

    /// Cost that moves from untagged to tagged.
    pub fn cost_visibility_gain(&self) -> Decimal {
        self.before.untagged_cost - self.after.untagged_cost
    }
}

/// Simulates `draft` over the records of `dataset` that pass `filters`.
///
/// Filters are evaluated against the records as loaded. Drafted resources
/// outside the filtered view are skipped.
///
/// # Errors
///
/// Fails if the draft names an unknown resource or edits a key column, or
/// if a cost total overflows.
pub fn simulate_draft(
    dataset: &Dataset,
    filters: &FilterSpec,
    draft: &EditDraft,
    schema: &TagSchema,
) -> Result<RemediationReport, TagscopeError> {
    draft.validate(dataset)?;
    let annotated = annotate(dataset.records(), schema);
    let scope = apply_filters(&annotated, filters);

    let mut outcomes = Vec::new();
    let mut after = Vec::with_capacity(scope.len());
    for row in &scope {
        match draft.edits_for(row.id()) {
            Some(edits) => {
                let outcome = simulate(row.record, edits, schema);
                after.push((row.id(), row.cost(), outcome.after.fully_tagged));
                outcomes.push(outcome);
            }
            None => after.push((row.id(), row.cost(), row.is_tagged())),
        }
    }
    let report = RemediationReport {
        outcomes,
        before: TaggingTotals::from_annotated(scope.iter().copied())?,
        after: TaggingTotals::from_entries(after)?,
    };
    info!(
        edited = report.outcomes.len(),
        tagged_before = report.before.tagged,
        tagged_after = report.after.tagged,
        "remediation simulated"
    );
    Ok(report)
}

/// Copy of `dataset` with every drafted edit applied.
///
/// When `declared_column` names a column of the dataset, drafted records get
/// it rewritten to `Yes`/`No` from their classification after the edits.
/// Records outside the draft keep their declared value.
pub fn apply_draft(
    dataset: &Dataset,
    draft: &EditDraft,
    schema: &TagSchema,
    declared_column: Option<&str>,
) -> Result<Dataset, TagscopeError> {
    draft.validate(dataset)?;
    let declared = declared_column
        .and_then(|column| dataset.resolve_column(column))
        .filter(|column| !dataset.is_key_column(column));
    let records: Vec<ResourceRecord> = dataset
        .records()
        .iter()
        .map(|record| match draft.edits_for(&record.id) {
            Some(edits) => {
                let mut edited = apply_edits(record, edits);
                if let Some(column) = declared {
                    let tagged = score(&edited, schema).fully_tagged;
                    edited
                        .fields
                        .insert(column.to_string(), declared_flag(tagged).to_string());
                }
                edited
            }
            None => record.clone(),
        })
        .collect();
    debug!(
        edited = draft.len(),
        declared_column = declared.unwrap_or("-"),
        "draft applied to dataset copy"
    );
    Ok(dataset.with_records(records)?)
}

fn declared_flag(tagged: bool) -> &'static str {
    if tagged { "Yes" } else { "No" }
}

/// Records eligible for remediation: everything not fully tagged.
pub fn remediation_candidates<'r, 'a>(
    annotated: &'r [AnnotatedRecord<'a>],
) -> Vec<&'r AnnotatedRecord<'a>> {
    annotated.iter().filter(|row| !row.is_tagged()).collect()
}
