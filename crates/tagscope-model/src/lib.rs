//! Data model for resource tagging compliance and cost allocation.

pub mod aggregate;
pub mod compliance;
pub mod dataset;
pub mod dimension;
pub mod draft;
pub mod error;
pub mod record;
pub mod schema;

pub use aggregate::{AggregateGroup, CostVisibility, GroupKey, percentage};
pub use compliance::ComplianceScore;
pub use dataset::{Dataset, add_cost};
pub use dimension::{Dimension, Dimensional, TAGGED_LABEL, UNTAGGED_LABEL, tagged_status_label};
pub use draft::{EditDraft, FieldEdits, parse_edit};
pub use error::{ConfigError, TagscopeError, ValidationError};
pub use record::{ResourceRecord, UNSPECIFIED, is_present_value};
pub use schema::{DEFAULT_EXPECTED_TAGS, TagSchema};
