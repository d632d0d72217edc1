//! CLI argument definitions for tagscope.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tagscope",
    version,
    about = "Resource tagging compliance and cost allocation",
    long_about = "Analyse a CSV export of cloud resources for tag compliance.\n\n\
                  Scores every resource against the expected tags, breaks costs down by\n\
                  tagged status, and simulates tag remediation without touching the source."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration (expected tags, key columns, report limits).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Dataset shape, missing values and executive summary.
    Overview(OverviewArgs),

    /// Cost aggregates by the chosen dimensions.
    Costs(CostsArgs),

    /// Tag completeness rankings and untagged resources.
    Compliance(ComplianceArgs),

    /// Simulate tag edits and compare before/after compliance.
    Remediate(RemediateArgs),

    /// Distinct values of a dimension, for use in filters.
    Values(ValuesArgs),

    /// Full governance report as JSON.
    Report(ReportArgs),
}

#[derive(Parser)]
pub struct OverviewArgs {
    /// Resource CSV file.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct CostsArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Restrict a dimension to the listed values (repeatable).
    #[arg(long = "filter", value_name = "DIM=V1,V2")]
    pub filters: Vec<String>,

    /// Dimensions to group by, e.g. `Department,tagged-status`.
    #[arg(long = "group-by", value_name = "DIM", value_delimiter = ',')]
    pub group_by: Vec<String>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct ComplianceArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Restrict a dimension to the listed values (repeatable).
    #[arg(long = "filter", value_name = "DIM=V1,V2")]
    pub filters: Vec<String>,

    /// Number of least complete resources to list (default from config).
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Write the untagged resources to a CSV file.
    #[arg(long = "export-untagged", value_name = "PATH")]
    pub export_untagged: Option<PathBuf>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct RemediateArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Restrict a dimension to the listed values (repeatable).
    #[arg(long = "filter", value_name = "DIM=V1,V2")]
    pub filters: Vec<String>,

    /// Set a field on one resource (repeatable).
    #[arg(long = "edit", value_name = "ID:FIELD=VALUE")]
    pub edits: Vec<String>,

    /// CSV of edits: the resource ID column plus the fields to set.
    #[arg(long = "edits-file", value_name = "PATH")]
    pub edits_file: Option<PathBuf>,

    /// Write the remediated dataset to a CSV file.
    #[arg(long = "export", value_name = "PATH")]
    pub export: Option<PathBuf>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct ValuesArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Column name, or `tagged-status`.
    #[arg(value_name = "DIM")]
    pub dimension: String,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct ReportArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Restrict a dimension to the listed values (repeatable).
    #[arg(long = "filter", value_name = "DIM=V1,V2")]
    pub filters: Vec<String>,

    #[arg(long = "group-by", value_name = "DIM", value_delimiter = ',')]
    pub group_by: Vec<String>,

    /// Include a remediation comparison for this edit (repeatable).
    #[arg(long = "edit", value_name = "ID:FIELD=VALUE")]
    pub edits: Vec<String>,

    #[arg(long = "edits-file", value_name = "PATH")]
    pub edits_file: Option<PathBuf>,

    /// Write the report here instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
