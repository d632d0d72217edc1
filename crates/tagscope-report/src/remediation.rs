//! Before/after comparison of a simulated edit draft.

use rust_decimal::Decimal;
use serde::Serialize;

use tagscope_core::{RemediationOutcome, RemediationReport, TaggingTotals};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeSummary {
    pub resource_id: String,
    pub cost: Decimal,
    pub before_percentage: f64,
    pub after_percentage: f64,
    pub newly_tagged: bool,
    pub still_missing: Vec<String>,
}

impl From<&RemediationOutcome> for OutcomeSummary {
    fn from(outcome: &RemediationOutcome) -> Self {
        Self {
            resource_id: outcome.resource_id.clone(),
            cost: outcome.cost,
            before_percentage: outcome.before.percentage(),
            after_percentage: outcome.after.percentage(),
            newly_tagged: outcome.newly_tagged(),
            still_missing: outcome.after.missing.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemediationSummary {
    pub before: TaggingTotals,
    pub after: TaggingTotals,
    pub tagged_delta: i64,
    pub untagged_delta: i64,
    pub untagged_cost_delta: Decimal,
    pub compliance_improvement_percentage: Decimal,
    pub cost_visibility_gain: Decimal,
    pub outcomes: Vec<OutcomeSummary>,
}

impl From<&RemediationReport> for RemediationSummary {
    fn from(report: &RemediationReport) -> Self {
        Self {
            before: report.before.clone(),
            after: report.after.clone(),
            tagged_delta: report.tagged_delta(),
            untagged_delta: report.untagged_delta(),
            untagged_cost_delta: report.untagged_cost_delta(),
            compliance_improvement_percentage: report.compliance_improvement_percentage(),
            cost_visibility_gain: report.cost_visibility_gain(),
            outcomes: report.outcomes.iter().map(OutcomeSummary::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagscope_core::{FilterSpec, simulate_draft};
    use tagscope_model::{Dataset, EditDraft, ResourceRecord, TagSchema};

    #[test]
    fn summarises_draft_effect() {
        let dataset = Dataset::new(
            vec![
                "ResourceID".into(),
                "Department".into(),
                "Owner".into(),
                "MonthlyCostUSD".into(),
            ],
            "ResourceID",
            "MonthlyCostUSD",
            vec![
                ResourceRecord::new("r1", Decimal::new(80, 0))
                    .with_field("Department", "")
                    .with_field("Owner", "ana"),
                ResourceRecord::new("r2", Decimal::new(20, 0))
                    .with_field("Department", "")
                    .with_field("Owner", ""),
            ],
        )
        .unwrap();
        let schema = TagSchema::new(["Department", "Owner"]).unwrap();
        let draft = EditDraft::new()
            .with_edit("r1", "Department", "Finance")
            .with_edit("r2", "Department", "Ops");
        let report = simulate_draft(&dataset, &FilterSpec::new(), &draft, &schema).unwrap();
        let summary = RemediationSummary::from(&report);

        assert_eq!(summary.tagged_delta, 1);
        assert_eq!(summary.untagged_delta, -1);
        assert_eq!(summary.cost_visibility_gain, Decimal::new(80, 0));
        assert_eq!(summary.untagged_cost_delta, Decimal::new(-80, 0));
        assert_eq!(summary.compliance_improvement_percentage, Decimal::new(50, 0));

        let r2 = &summary.outcomes[1];
        assert_eq!(r2.resource_id, "r2");
        assert!(!r2.newly_tagged);
        assert_eq!(r2.still_missing, vec!["Owner"]);
        assert!((r2.after_percentage - 50.0).abs() < 1e-9);
    }
}
