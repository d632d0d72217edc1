//! Cost visibility read model.

use anyhow::{Context, Result};
use serde::Serialize;

use tagscope_core::{AnnotatedRecord, aggregate, cost_visibility};
use tagscope_model::{AggregateGroup, CostVisibility, Dataset, Dimension};

/// Columns broken down in every cost report when the dataset has them.
pub const STANDARD_BREAKDOWNS: &[&str] =
    &["Department", "Project", "Environment", "Service", "Region"];

/// Cost per value of a single dimension, largest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub dimension: String,
    /// Number of groups before truncation to the report limit.
    pub group_count: usize,
    pub groups: Vec<AggregateGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostReport {
    pub visibility: CostVisibility,
    pub grouping: Vec<Dimension>,
    pub groups: Vec<AggregateGroup>,
    pub breakdowns: Vec<Breakdown>,
}

/// Builds the cost report over the filtered `rows`.
///
/// `groups` follows the requested grouping in full; each standard
/// breakdown is cut to `top_limit` groups.
pub fn build_cost_report(
    dataset: &Dataset,
    rows: &[AnnotatedRecord<'_>],
    grouping: &[Dimension],
    top_limit: usize,
) -> Result<CostReport> {
    let visibility = cost_visibility(rows).context("compute cost visibility")?;
    let groups = aggregate(rows, grouping).context("aggregate costs")?;

    let mut breakdowns = Vec::new();
    for name in STANDARD_BREAKDOWNS {
        let Some(column) = dataset.resolve_column(name) else {
            continue;
        };
        let dimension = Dimension::field(column);
        let mut groups = aggregate(rows, std::slice::from_ref(&dimension))
            .with_context(|| format!("aggregate costs by {column}"))?;
        let group_count = groups.len();
        groups.truncate(top_limit);
        breakdowns.push(Breakdown {
            dimension: column.to_string(),
            group_count,
            groups,
        });
    }

    Ok(CostReport {
        visibility,
        grouping: grouping.to_vec(),
        groups,
        breakdowns,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use tagscope_core::annotate;
    use tagscope_ingest::{LoadOptions, load_dataset_from_str};
    use tagscope_model::TagSchema;

    const CSV: &str = "\
ResourceID,Service,Department,Project,MonthlyCostUSD
r1,EC2,Finance,P1,100
r2,S3,,P1,50
r3,EC2,Ops,P2,30
r4,RDS,Ops,P3,20
";

    #[test]
    fn breaks_down_present_standard_columns() {
        let loaded = load_dataset_from_str(CSV, &LoadOptions::default()).unwrap();
        let schema = TagSchema::new(["Department", "Project"]).unwrap();
        let rows = annotate(loaded.dataset.records(), &schema);
        let report = build_cost_report(&loaded.dataset, &rows, &[], 2).unwrap();

        let dimensions: Vec<&str> = report
            .breakdowns
            .iter()
            .map(|breakdown| breakdown.dimension.as_str())
            .collect();
        assert_eq!(dimensions, vec!["Department", "Project", "Service"]);

        let department = &report.breakdowns[0];
        assert_eq!(department.group_count, 3);
        assert_eq!(department.groups.len(), 2);
        assert_eq!(department.groups[0].key.to_string(), "Finance");
        assert_eq!(department.groups[1].key.to_string(), "Ops");

        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.visibility.total_cost, Decimal::new(200, 0));
        assert_eq!(report.visibility.untagged_cost, Decimal::new(50, 0));
        assert_eq!(report.visibility.untagged_percentage, Decimal::new(25, 0));
    }

    #[test]
    fn groups_by_requested_dimensions() {
        let loaded = load_dataset_from_str(CSV, &LoadOptions::default()).unwrap();
        let schema = TagSchema::new(["Department"]).unwrap();
        let rows = annotate(loaded.dataset.records(), &schema);
        let grouping = vec![Dimension::field("Service"), Dimension::TaggedStatus];
        let report = build_cost_report(&loaded.dataset, &rows, &grouping, 10).unwrap();

        let keys: Vec<String> = report.groups.iter().map(|group| group.key.to_string()).collect();
        assert_eq!(keys, vec!["EC2 / Tagged", "S3 / Untagged", "RDS / Tagged"]);
        assert_eq!(report.groups[0].total_cost, Decimal::new(130, 0));
    }
}
