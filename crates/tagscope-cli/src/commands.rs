use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use tagscope_cli::selection::{build_filters, build_session, parse_dimension};
use tagscope_core::{
    GovernanceConfig, Session, annotate, apply_draft, recompute, remediation_candidates,
};
use tagscope_ingest::{LoadOptions, LoadedDataset, load_dataset};
use tagscope_model::{
    Dimension, Dimensional, TAGGED_LABEL, TagSchema, UNSPECIFIED, UNTAGGED_LABEL,
};
use tagscope_report::{
    RecordSummary, RemediationSummary, build_compliance_report, build_cost_report,
    build_governance_report, build_overview, export_dataset, export_untagged, write_json_report,
};

use crate::cli::{
    ComplianceArgs, CostsArgs, OutputFormatArg, OverviewArgs, RemediateArgs, ReportArgs,
    ValuesArgs,
};
use crate::summary::{
    print_candidates, print_compliance_report, print_cost_report, print_overview,
    print_remediation, print_values,
};

/// Configuration, tag schema and dataset shared by every command.
struct Workspace {
    config: GovernanceConfig,
    schema: TagSchema,
    loaded: LoadedDataset,
}

impl Workspace {
    fn open(config_path: Option<&Path>, csv: &Path) -> Result<Self> {
        let config = match config_path {
            Some(path) => GovernanceConfig::load(path)
                .with_context(|| format!("load config {}", path.display()))?,
            None => GovernanceConfig::default(),
        };
        let schema = config.tag_schema().context("build tag schema")?;
        let options = LoadOptions {
            id_column: config.dataset.id_column.clone(),
            cost_column: config.dataset.cost_column.clone(),
        };
        let loaded =
            load_dataset(csv, &options).with_context(|| format!("load {}", csv.display()))?;
        Ok(Self {
            config,
            schema,
            loaded,
        })
    }

    /// Declared tagged column, when configured and present in the file.
    fn declared_column(&self) -> Option<&str> {
        self.config
            .dataset
            .declared_status_column
            .as_deref()
            .and_then(|column| self.loaded.dataset.resolve_column(column))
    }
}

#[derive(Debug, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub records: usize,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("write JSON")?;
    writeln!(out).context("write JSON")?;
    Ok(())
}

pub fn run_overview(config: Option<&Path>, args: &OverviewArgs) -> Result<()> {
    let span = info_span!("overview", csv = %args.csv.display());
    let _guard = span.enter();
    let workspace = Workspace::open(config, &args.csv)?;
    let overview = build_overview(&workspace.loaded, &workspace.schema)?;
    match args.format {
        OutputFormatArg::Table => {
            print_overview(&overview);
            Ok(())
        }
        OutputFormatArg::Json => print_json(&overview),
    }
}

pub fn run_costs(config: Option<&Path>, args: &CostsArgs) -> Result<()> {
    let span = info_span!("costs", csv = %args.csv.display());
    let _guard = span.enter();
    let workspace = Workspace::open(config, &args.csv)?;
    let dataset = &workspace.loaded.dataset;
    let session = build_session(
        dataset,
        &workspace.schema,
        &args.filters,
        &args.group_by,
        &[],
        None,
    )?;
    let views = recompute(dataset, &workspace.schema, &session).context("recompute views")?;
    let report = build_cost_report(
        dataset,
        &views.rows,
        &session.grouping,
        workspace.config.report.top_limit,
    )?;
    info!(rows = views.rows.len(), groups = report.groups.len(), "costs aggregated");
    match args.format {
        OutputFormatArg::Table => {
            print_cost_report(&report, views.rows.len());
            Ok(())
        }
        OutputFormatArg::Json => print_json(&report),
    }
}

pub fn run_compliance(config: Option<&Path>, args: &ComplianceArgs) -> Result<()> {
    let span = info_span!("compliance", csv = %args.csv.display());
    let _guard = span.enter();
    let workspace = Workspace::open(config, &args.csv)?;
    let dataset = &workspace.loaded.dataset;
    let session =
        Session::new().with_filters(build_filters(dataset, &args.filters).context("parse filters")?);
    let views = recompute(dataset, &workspace.schema, &session).context("recompute views")?;
    let limit = args
        .limit
        .unwrap_or(workspace.config.report.lowest_completeness_limit);
    let report = build_compliance_report(
        &views.rows,
        &workspace.schema,
        workspace.declared_column(),
        limit,
    )?;

    let exported = match &args.export_untagged {
        Some(path) => Some((path, export_untagged(path, dataset, &views.rows)?)),
        None => None,
    };
    match args.format {
        OutputFormatArg::Table => {
            print_compliance_report(&report, workspace.config.report.top_limit);
            if let Some((path, written)) = exported {
                println!("Untagged resources: {written} rows written to {}", path.display());
            }
            Ok(())
        }
        OutputFormatArg::Json => print_json(&report),
    }
}

pub fn run_remediate(config: Option<&Path>, args: &RemediateArgs) -> Result<()> {
    let span = info_span!("remediate", csv = %args.csv.display());
    let _guard = span.enter();
    let workspace = Workspace::open(config, &args.csv)?;
    let dataset = &workspace.loaded.dataset;
    let session = build_session(
        dataset,
        &workspace.schema,
        &args.filters,
        &[],
        &args.edits,
        args.edits_file.as_deref(),
    )?;
    let views = recompute(dataset, &workspace.schema, &session).context("recompute views")?;

    let Some(remediation) = views.remediation.as_ref() else {
        let candidates: Vec<RecordSummary> = remediation_candidates(&views.rows)
            .into_iter()
            .map(RecordSummary::from)
            .collect();
        return match args.format {
            OutputFormatArg::Table => {
                print_candidates(&candidates);
                Ok(())
            }
            OutputFormatArg::Json => print_json(&candidates),
        };
    };
    let summary = RemediationSummary::from(remediation);

    let exported = match &args.export {
        Some(path) => {
            let remediated = apply_draft(
                dataset,
                &session.draft,
                &workspace.schema,
                workspace.declared_column(),
            )
            .context("apply edits")?;
            Some((path, export_dataset(path, &remediated)?))
        }
        None => None,
    };
    match args.format {
        OutputFormatArg::Table => {
            print_remediation(&summary);
            if let Some((path, written)) = exported {
                println!("Remediated dataset: {written} rows written to {}", path.display());
            }
            Ok(())
        }
        OutputFormatArg::Json => print_json(&summary),
    }
}

pub fn run_values(config: Option<&Path>, args: &ValuesArgs) -> Result<()> {
    let span = info_span!("values", csv = %args.csv.display(), dimension = %args.dimension);
    let _guard = span.enter();
    let workspace = Workspace::open(config, &args.csv)?;
    let dataset = &workspace.loaded.dataset;
    let dimension = parse_dimension(dataset, &args.dimension)
        .with_context(|| format!("resolve dimension {}", args.dimension))?;
    let options = match &dimension {
        Dimension::TaggedStatus => vec![TAGGED_LABEL.to_string(), UNTAGGED_LABEL.to_string()],
        Dimension::Field(_) => dataset.distinct_values(&dimension),
    };
    let rows = annotate(dataset.records(), &workspace.schema);
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &rows {
        *counts
            .entry(row.dimension_value(&dimension).unwrap_or(UNSPECIFIED))
            .or_default() += 1;
    }
    let values: Vec<ValueCount> = options
        .into_iter()
        .map(|value| ValueCount {
            records: counts.get(value.as_str()).copied().unwrap_or_default(),
            value,
        })
        .collect();
    match args.format {
        OutputFormatArg::Table => {
            print_values(&dimension.to_string(), &values);
            Ok(())
        }
        OutputFormatArg::Json => print_json(&values),
    }
}

pub fn run_report(config: Option<&Path>, args: &ReportArgs) -> Result<()> {
    let span = info_span!("report", csv = %args.csv.display());
    let _guard = span.enter();
    let workspace = Workspace::open(config, &args.csv)?;
    let session = build_session(
        &workspace.loaded.dataset,
        &workspace.schema,
        &args.filters,
        &args.group_by,
        &args.edits,
        args.edits_file.as_deref(),
    )?;
    let report = build_governance_report(&workspace.loaded, &workspace.config, &session)?;
    match &args.output {
        Some(path) => {
            report.save(path)?;
            println!("Governance report written to {}", path.display());
        }
        None => write_json_report(io::stdout().lock(), &report)?,
    }
    Ok(())
}
