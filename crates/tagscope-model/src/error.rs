use rust_decimal::Decimal;
use thiserror::Error;

/// Configuration and user-input errors. These fail fast and are not
/// recovered mid-session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("expected tag field list is empty")]
    EmptyTagSchema,

    #[error("expected tag field list contains a blank name")]
    BlankTagField,

    #[error("duplicate expected tag field: {field}")]
    DuplicateTagField { field: String },

    #[error("filter on {dimension} has no selected values")]
    EmptyFilterSelection { dimension: String },

    #[error("unknown dimension: {name}")]
    UnknownDimension { name: String },

    #[error("edit draft references unknown resource: {resource_id}")]
    UnknownResource { resource_id: String },

    #[error("field {field} is not editable")]
    ReadOnlyField { field: String },

    #[error("invalid {kind} '{input}': {message}")]
    InvalidSelection {
        kind: &'static str,
        input: String,
        message: String,
    },

    #[error("failed to read configuration {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

/// Data validation errors raised for individual records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("resource {resource_id} has negative cost {cost}")]
    NegativeCost { resource_id: String, cost: Decimal },

    #[error("row has no resource id")]
    MissingResourceId,

    #[error("resource {resource_id} has no cost value")]
    MissingCost { resource_id: String },

    #[error("resource {resource_id} has unparsable cost '{value}'")]
    InvalidCost { resource_id: String, value: String },

    #[error("duplicate resource id {resource_id}")]
    DuplicateResourceId { resource_id: String },

    #[error("total cost overflows at resource {resource_id}")]
    CostOverflow { resource_id: String },
}

#[derive(Debug, Error)]
pub enum TagscopeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
