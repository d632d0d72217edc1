//! Per-record tag compliance scoring.
//!
//! A tag counts as present when its value is non-null and not blank after
//! trimming. The completeness score is the present fraction of the schema;
//! a record is tagged only when every expected field is present.

use rust_decimal::Decimal;
use serde::Serialize;

use tagscope_model::{
    ComplianceScore, Dimension, Dimensional, ResourceRecord, TagSchema, ValidationError, add_cost,
    percentage, tagged_status_label,
};

/// Scores `record` against `schema`. Pure and deterministic.
pub fn score(record: &ResourceRecord, schema: &TagSchema) -> ComplianceScore {
    let total = schema.field_count();
    let missing: Vec<String> = schema
        .fields()
        .iter()
        .filter(|field| !record.is_present(field))
        .cloned()
        .collect();
    let present = total - missing.len();
    ComplianceScore {
        present,
        total,
        completeness: present as f64 / total as f64,
        fully_tagged: present == total,
        missing,
    }
}

/// A record with its compliance score attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRecord<'a> {
    pub record: &'a ResourceRecord,
    pub score: ComplianceScore,
}

impl<'a> AnnotatedRecord<'a> {
    pub fn new(record: &'a ResourceRecord, schema: &TagSchema) -> Self {
        Self {
            record,
            score: score(record, schema),
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn cost(&self) -> Decimal {
        self.record.cost
    }

    pub fn is_tagged(&self) -> bool {
        self.score.fully_tagged
    }
}

impl Dimensional for AnnotatedRecord<'_> {
    fn resource_id(&self) -> &str {
        &self.record.id
    }

    fn dimension_value(&self, dimension: &Dimension) -> Option<&str> {
        match dimension {
            Dimension::TaggedStatus => Some(tagged_status_label(self.score.fully_tagged)),
            Dimension::Field(_) => self.record.dimension_value(dimension),
        }
    }
}

pub fn annotate<'a, I>(records: I, schema: &TagSchema) -> Vec<AnnotatedRecord<'a>>
where
    I: IntoIterator<Item = &'a ResourceRecord>,
{
    records
        .into_iter()
        .map(|record| AnnotatedRecord::new(record, schema))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingFieldCount {
    pub field: String,
    pub missing: usize,
}

/// How many records miss each expected field, most-missed first. Ties keep
/// schema order.
pub fn missing_field_counts(
    annotated: &[AnnotatedRecord<'_>],
    schema: &TagSchema,
) -> Vec<MissingFieldCount> {
    let mut counts: Vec<MissingFieldCount> = schema
        .fields()
        .iter()
        .map(|field| MissingFieldCount {
            field: field.clone(),
            missing: annotated
                .iter()
                .filter(|row| row.score.missing.contains(field))
                .count(),
        })
        .collect();
    counts.sort_by(|a, b| b.missing.cmp(&a.missing));
    counts
}

/// The `limit` least complete records. Ties keep dataset order.
pub fn lowest_completeness<'r, 'a>(
    annotated: &'r [AnnotatedRecord<'a>],
    limit: usize,
) -> Vec<&'r AnnotatedRecord<'a>> {
    let mut ordered: Vec<&AnnotatedRecord<'a>> = annotated.iter().collect();
    ordered.sort_by_key(|row| row.score.present);
    ordered.truncate(limit);
    ordered
}

/// Untagged records, most expensive first.
pub fn untagged_by_cost<'r, 'a>(annotated: &'r [AnnotatedRecord<'a>]) -> Vec<&'r AnnotatedRecord<'a>> {
    let mut untagged: Vec<&AnnotatedRecord<'a>> =
        annotated.iter().filter(|row| !row.is_tagged()).collect();
    untagged.sort_by(|a, b| b.cost().cmp(&a.cost()));
    untagged
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessBucket {
    pub present: usize,
    pub completeness: f64,
    pub records: usize,
}

/// Record count per number of present tags, from `0` to the schema size.
pub fn completeness_distribution(
    annotated: &[AnnotatedRecord<'_>],
    schema: &TagSchema,
) -> Vec<CompletenessBucket> {
    let total = schema.field_count();
    (0..=total)
        .map(|present| CompletenessBucket {
            present,
            completeness: present as f64 / total as f64,
            records: annotated
                .iter()
                .filter(|row| row.score.present == present)
                .count(),
        })
        .collect()
}

/// A record whose declared tagged flag disagrees with its derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMismatch {
    pub resource_id: String,
    pub declared: String,
    pub derived: &'static str,
}

/// Compares a declared yes/no column (e.g. `Tagged`) with the derived
/// classification. Blank or unrecognised declarations are skipped.
pub fn declared_status_mismatches(
    annotated: &[AnnotatedRecord<'_>],
    column: &str,
) -> Vec<StatusMismatch> {
    annotated
        .iter()
        .filter_map(|row| {
            let declared = row.record.present_value(column)?;
            let declared_tagged = parse_flag(declared)?;
            (declared_tagged != row.is_tagged()).then(|| StatusMismatch {
                resource_id: row.id().to_string(),
                declared: declared.to_string(),
                derived: tagged_status_label(row.is_tagged()),
            })
        })
        .collect()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Tagged/untagged counts and costs over a set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaggingTotals {
    pub resources: usize,
    pub tagged: usize,
    pub untagged: usize,
    pub total_cost: Decimal,
    pub tagged_cost: Decimal,
    pub untagged_cost: Decimal,
}

impl TaggingTotals {
    /// Accumulates `(resource_id, cost, fully_tagged)` entries.
    pub fn from_entries<'i, I>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (&'i str, Decimal, bool)>,
    {
        let mut totals = Self::default();
        for (resource_id, cost, tagged) in entries {
            totals.resources += 1;
            totals.total_cost = add_cost(totals.total_cost, cost, resource_id)?;
            if tagged {
                totals.tagged += 1;
                totals.tagged_cost = add_cost(totals.tagged_cost, cost, resource_id)?;
            } else {
                totals.untagged += 1;
                totals.untagged_cost = add_cost(totals.untagged_cost, cost, resource_id)?;
            }
        }
        Ok(totals)
    }

    pub fn from_annotated<'r, 'a: 'r, I>(rows: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = &'r AnnotatedRecord<'a>>,
    {
        Self::from_entries(
            rows.into_iter()
                .map(|row| (row.record.id.as_str(), row.cost(), row.is_tagged())),
        )
    }

    /// Share of resources that are untagged, as a percentage.
    pub fn untagged_resource_percentage(&self) -> Decimal {
        percentage(Decimal::from(self.untagged), Decimal::from(self.resources))
    }

    /// Share of cost carried by untagged resources, as a percentage.
    pub fn untagged_cost_percentage(&self) -> Decimal {
        percentage(self.untagged_cost, self.total_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> TagSchema {
        TagSchema::new(["Department", "Project", "Owner", "Environment"]).unwrap()
    }

    #[test]
    fn scores_partial_record() {
        let record = ResourceRecord::new("r1", Decimal::new(100, 0))
            .with_field("Department", "")
            .with_field("Project", "P1")
            .with_field("Owner", "")
            .with_field("Environment", "prod");
        let score = score(&record, &schema());
        assert_eq!(score.present, 2);
        assert_eq!(score.total, 4);
        assert!((score.completeness - 0.5).abs() < f64::EPSILON);
        assert!(!score.fully_tagged);
        assert_eq!(score.missing, vec!["Department", "Owner"]);
    }

    #[test]
    fn parses_declared_flags() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("NO"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
