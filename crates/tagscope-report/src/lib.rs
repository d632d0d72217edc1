//! Governance report generation.
//!
//! This crate turns the core engine's views into presentation read models
//! and writes the export files:
//!
//! - **Overview**: dataset shape, missing values per column, executive summary
//! - **Costs**: cost visibility and per-dimension breakdowns
//! - **Compliance**: completeness rankings, missing fields, untagged resources
//! - **Remediation**: before/after comparison of a simulated edit draft
//! - **Exports**: untagged resources and remediated dataset as CSV, the full
//!   governance report as JSON

mod compliance;
mod costs;
mod export;
mod governance;
mod overview;
mod remediation;

pub use compliance::{ComplianceReport, RecordSummary, build_compliance_report};
pub use costs::{Breakdown, CostReport, STANDARD_BREAKDOWNS, build_cost_report};
pub use export::{
    UNTAGGED_EXTRA_COLUMNS, export_dataset, export_untagged, write_dataset_csv, write_untagged_csv,
};
pub use governance::{
    FilterSummary, GovernanceReport, build_governance_report, write_json_report,
};
pub use overview::{
    ACCOUNT_COLUMN, ColumnMissing, DatasetOverview, ExecutiveSummary, RejectedSummary,
    build_overview,
};
pub use remediation::{OutcomeSummary, RemediationSummary};
