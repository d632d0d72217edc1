//! Compliance scoring, cost aggregation, filtering, and remediation.
//!
//! Every operation here is a pure function of its inputs. A presentation
//! layer holds a [`Session`] and calls [`recompute`] after each change.

pub mod aggregate;
pub mod compliance;
pub mod config;
pub mod filter;
pub mod remediation;
pub mod session;

pub use aggregate::{Classified, aggregate, cost_visibility};
pub use compliance::{
    AnnotatedRecord, CompletenessBucket, MissingFieldCount, StatusMismatch, TaggingTotals,
    annotate, completeness_distribution, declared_status_mismatches, lowest_completeness,
    missing_field_counts, score, untagged_by_cost,
};
pub use config::GovernanceConfig;
pub use filter::{FilterSpec, apply_filters, parse_selection, resolve_dimension};
pub use remediation::{
    RemediationOutcome, RemediationReport, apply_draft, apply_edits, remediation_candidates,
    simulate, simulate_draft,
};
pub use session::{Session, Views, recompute};
