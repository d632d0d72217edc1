//! Dataset exploration summary.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use tagscope_core::{TaggingTotals, annotate};
use tagscope_ingest::{LoadedDataset, RejectedRow};
use tagscope_model::{Dataset, TagSchema};

/// Column counted for the number of distinct cloud accounts.
pub const ACCOUNT_COLUMN: &str = "AccountID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// A row the loader excluded, reduced to what a reader needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedSummary {
    pub line: usize,
    pub resource_id: Option<String>,
    pub reason: String,
}

impl From<&RejectedRow> for RejectedSummary {
    fn from(row: &RejectedRow) -> Self {
        Self {
            line: row.line,
            resource_id: row.resource_id.clone(),
            reason: row.error.to_string(),
        }
    }
}

/// Headline figures for the governance overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutiveSummary {
    pub total_resources: usize,
    pub accounts: Option<usize>,
    pub untagged_resources: usize,
    pub untagged_resource_percentage: Decimal,
    pub total_cost: Decimal,
    pub untagged_cost: Decimal,
    pub untagged_cost_percentage: Decimal,
}

impl ExecutiveSummary {
    pub fn from_totals(totals: &TaggingTotals, accounts: Option<usize>) -> Self {
        Self {
            total_resources: totals.resources,
            accounts,
            untagged_resources: totals.untagged,
            untagged_resource_percentage: totals.untagged_resource_percentage(),
            total_cost: totals.total_cost,
            untagged_cost: totals.untagged_cost,
            untagged_cost_percentage: totals.untagged_cost_percentage(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetOverview {
    pub source: Option<String>,
    pub fingerprint: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub missing_values: Vec<ColumnMissing>,
    pub totals: TaggingTotals,
    pub summary: ExecutiveSummary,
    pub rejected: Vec<RejectedSummary>,
}

/// Summarises the whole loaded dataset, ignoring any session filters.
pub fn build_overview(loaded: &LoadedDataset, schema: &TagSchema) -> Result<DatasetOverview> {
    let dataset = &loaded.dataset;
    let annotated = annotate(dataset.records(), schema);
    let totals = TaggingTotals::from_annotated(&annotated).context("sum tagging totals")?;
    let summary = ExecutiveSummary::from_totals(&totals, account_count(dataset));
    Ok(DatasetOverview {
        source: loaded
            .source
            .as_ref()
            .map(|path| path.display().to_string()),
        fingerprint: loaded.fingerprint.clone(),
        rows: dataset.len(),
        columns: dataset.columns().to_vec(),
        missing_values: missing_values(dataset),
        totals,
        summary,
        rejected: loaded.rejected.iter().map(RejectedSummary::from).collect(),
    })
}

/// Blank cells per column, in header order. Key columns are never blank in
/// a loaded dataset.
fn missing_values(dataset: &Dataset) -> Vec<ColumnMissing> {
    dataset
        .columns()
        .iter()
        .map(|column| {
            let missing = if dataset.is_key_column(column) {
                0
            } else {
                dataset
                    .records()
                    .iter()
                    .filter(|record| !record.is_present(column))
                    .count()
            };
            ColumnMissing {
                column: column.clone(),
                missing,
            }
        })
        .collect()
}

fn account_count(dataset: &Dataset) -> Option<usize> {
    let column = dataset.resolve_column(ACCOUNT_COLUMN)?;
    let accounts: BTreeSet<&str> = dataset
        .records()
        .iter()
        .filter_map(|record| record.present_value(column))
        .collect();
    Some(accounts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagscope_ingest::{LoadOptions, load_dataset_from_str};

    const CSV: &str = "\
ResourceID,AccountID,Department,Project,MonthlyCostUSD
r1,111,Finance,P1,100
r2,111,,P2,50
r3,222,Finance,,25
";

    #[test]
    fn counts_missing_values_and_accounts() {
        let loaded = load_dataset_from_str(CSV, &LoadOptions::default()).unwrap();
        let schema = TagSchema::new(["Department", "Project"]).unwrap();
        let overview = build_overview(&loaded, &schema).unwrap();

        assert_eq!(overview.rows, 3);
        assert_eq!(overview.summary.accounts, Some(2));
        assert_eq!(overview.totals.untagged, 2);
        assert_eq!(overview.summary.untagged_cost, Decimal::new(75, 0));
        let missing: Vec<(&str, usize)> = overview
            .missing_values
            .iter()
            .map(|entry| (entry.column.as_str(), entry.missing))
            .collect();
        assert_eq!(
            missing,
            vec![
                ("ResourceID", 0),
                ("AccountID", 0),
                ("Department", 1),
                ("Project", 1),
                ("MonthlyCostUSD", 0),
            ]
        );
    }

    #[test]
    fn surfaces_rejected_rows() {
        let csv = "ResourceID,Department,MonthlyCostUSD\nr1,Ops,-5\nr2,Ops,10\n";
        let loaded = load_dataset_from_str(csv, &LoadOptions::default()).unwrap();
        let overview = build_overview(&loaded, &TagSchema::new(["Department"]).unwrap()).unwrap();
        assert_eq!(overview.rows, 1);
        assert_eq!(overview.rejected.len(), 1);
        assert_eq!(overview.rejected[0].line, 2);
        assert_eq!(overview.rejected[0].resource_id.as_deref(), Some("r1"));
        assert!(overview.summary.accounts.is_none());
    }
}
