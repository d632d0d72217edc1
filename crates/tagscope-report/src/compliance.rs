//! Tag compliance read model.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use tagscope_core::{
    AnnotatedRecord, CompletenessBucket, MissingFieldCount, StatusMismatch, TaggingTotals,
    completeness_distribution, declared_status_mismatches, lowest_completeness,
    missing_field_counts, untagged_by_cost,
};
use tagscope_model::TagSchema;

/// One annotated record as shown in compliance tables and exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub resource_id: String,
    pub cost: Decimal,
    pub present: usize,
    pub total: usize,
    pub completeness_percentage: f64,
    pub missing: Vec<String>,
}

impl From<&AnnotatedRecord<'_>> for RecordSummary {
    fn from(row: &AnnotatedRecord<'_>) -> Self {
        Self {
            resource_id: row.id().to_string(),
            cost: row.cost(),
            present: row.score.present,
            total: row.score.total,
            completeness_percentage: row.score.percentage(),
            missing: row.score.missing.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub expected_fields: Vec<String>,
    pub totals: TaggingTotals,
    /// Mean completeness across the rows, as a percentage.
    pub average_completeness: f64,
    pub lowest: Vec<RecordSummary>,
    pub missing_fields: Vec<MissingFieldCount>,
    pub distribution: Vec<CompletenessBucket>,
    /// Every untagged record, most expensive first.
    pub untagged: Vec<RecordSummary>,
    pub mismatches: Vec<StatusMismatch>,
}

/// Builds the compliance report over the filtered `rows`.
///
/// Declared-status mismatches are only computed when `declared_column`
/// names a column.
pub fn build_compliance_report(
    rows: &[AnnotatedRecord<'_>],
    schema: &TagSchema,
    declared_column: Option<&str>,
    lowest_limit: usize,
) -> Result<ComplianceReport> {
    let average_completeness = if rows.is_empty() {
        0.0
    } else {
        rows.iter().map(|row| row.score.percentage()).sum::<f64>() / rows.len() as f64
    };
    let totals = TaggingTotals::from_annotated(rows).context("sum tagging totals")?;
    Ok(ComplianceReport {
        expected_fields: schema.fields().to_vec(),
        totals,
        average_completeness,
        lowest: lowest_completeness(rows, lowest_limit)
            .into_iter()
            .map(RecordSummary::from)
            .collect(),
        missing_fields: missing_field_counts(rows, schema),
        distribution: completeness_distribution(rows, schema),
        untagged: untagged_by_cost(rows)
            .into_iter()
            .map(RecordSummary::from)
            .collect(),
        mismatches: declared_column
            .map(|column| declared_status_mismatches(rows, column))
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagscope_core::annotate;
    use tagscope_model::ResourceRecord;

    fn records() -> Vec<ResourceRecord> {
        vec![
            ResourceRecord::new("r1", Decimal::new(100, 0))
                .with_field("Department", "Finance")
                .with_field("Owner", "ana")
                .with_field("Tagged", "Yes"),
            ResourceRecord::new("r2", Decimal::new(40, 0))
                .with_field("Department", "")
                .with_field("Owner", "bo")
                .with_field("Tagged", "Yes"),
            ResourceRecord::new("r3", Decimal::new(60, 0)).with_field("Tagged", "No"),
        ]
    }

    #[test]
    fn ranks_and_counts_missing_tags() {
        let records = records();
        let schema = TagSchema::new(["Department", "Owner"]).unwrap();
        let rows = annotate(&records, &schema);
        let report = build_compliance_report(&rows, &schema, Some("Tagged"), 2).unwrap();

        let lowest: Vec<&str> = report.lowest.iter().map(|row| row.resource_id.as_str()).collect();
        assert_eq!(lowest, vec!["r3", "r2"]);
        let untagged: Vec<&str> = report
            .untagged
            .iter()
            .map(|row| row.resource_id.as_str())
            .collect();
        assert_eq!(untagged, vec!["r3", "r2"]);
        assert_eq!(report.missing_fields[0].field, "Department");
        assert_eq!(report.missing_fields[0].missing, 2);
        assert!((report.average_completeness - 50.0).abs() < 1e-9);
        assert_eq!(report.distribution.len(), 3);

        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].resource_id, "r2");
    }

    #[test]
    fn empty_rows_report_zero_completeness() {
        let schema = TagSchema::new(["Department"]).unwrap();
        let report = build_compliance_report(&[], &schema, None, 5).unwrap();
        assert_eq!(report.average_completeness, 0.0);
        assert!(report.lowest.is_empty());
        assert!(report.mismatches.is_empty());
        assert_eq!(report.totals, TaggingTotals::default());
    }
}
