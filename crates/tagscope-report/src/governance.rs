//! Full governance report assembled from a loaded dataset and a session.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use tagscope_core::{GovernanceConfig, Session, recompute};
use tagscope_ingest::LoadedDataset;

use crate::compliance::{ComplianceReport, build_compliance_report};
use crate::costs::{CostReport, build_cost_report};
use crate::overview::{DatasetOverview, build_overview};
use crate::remediation::RemediationSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub dimension: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GovernanceReport {
    pub generator: String,
    /// RFC 3339 timestamp in UTC.
    pub generated_at: String,
    pub expected_tags: Vec<String>,
    pub filters: Vec<FilterSummary>,
    pub overview: DatasetOverview,
    pub costs: CostReport,
    pub compliance: ComplianceReport,
    pub remediation: Option<RemediationSummary>,
}

/// Recomputes every view for `session` and assembles the report.
///
/// The overview covers the whole dataset; costs, compliance and remediation
/// follow the session filters.
pub fn build_governance_report(
    loaded: &LoadedDataset,
    config: &GovernanceConfig,
    session: &Session,
) -> Result<GovernanceReport> {
    let schema = config.tag_schema().context("build tag schema")?;
    let dataset = &loaded.dataset;
    let views = recompute(dataset, &schema, session).context("recompute views")?;

    let declared_column = config
        .dataset
        .declared_status_column
        .as_deref()
        .and_then(|column| dataset.resolve_column(column));
    let costs = build_cost_report(
        dataset,
        &views.rows,
        &session.grouping,
        config.report.top_limit,
    )?;
    let compliance = build_compliance_report(
        &views.rows,
        &schema,
        declared_column,
        config.report.lowest_completeness_limit,
    )?;

    let report = GovernanceReport {
        generator: format!("tagscope {}", env!("CARGO_PKG_VERSION")),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        expected_tags: schema.fields().to_vec(),
        filters: session
            .filters
            .restrictions()
            .map(|(dimension, values)| FilterSummary {
                dimension: dimension.to_string(),
                values: values.iter().cloned().collect(),
            })
            .collect(),
        overview: build_overview(loaded, &schema)?,
        costs,
        compliance,
        remediation: views.remediation.as_ref().map(RemediationSummary::from),
    };
    info!(
        rows = views.rows.len(),
        groups = report.costs.groups.len(),
        "governance report built"
    );
    Ok(report)
}

/// Writes `report` as pretty-printed JSON to `writer`.
pub fn write_json_report<W: Write>(mut writer: W, report: &GovernanceReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report).context("serialize governance report")?;
    writeln!(writer).context("write governance report")?;
    writer.flush().context("flush governance report")?;
    Ok(())
}

impl GovernanceReport {
    /// Writes the report as JSON to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("create {}", path.display()))?;
        write_json_report(std::io::BufWriter::new(file), self)?;
        info!(path = %path.display(), "governance report written");
        Ok(())
    }
}
