use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::ConfigError;

/// Expected tag fields of the bundled CloudMart dataset.
pub const DEFAULT_EXPECTED_TAGS: [&str; 5] =
    ["Department", "Project", "Environment", "Owner", "CostCenter"];

/// Ordered, validated list of expected tag field names.
///
/// A schema always holds at least one field and never the same name twice
/// (compared case-insensitively), so scoring against it cannot divide by
/// zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSchema {
    fields: Vec<String>,
}

impl TagSchema {
    pub fn new<I, S>(fields: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let mut validated = Vec::new();
        for field in fields {
            let field = field.into().trim().to_string();
            if field.is_empty() {
                return Err(ConfigError::BlankTagField);
            }
            if !seen.insert(field.to_ascii_uppercase()) {
                return Err(ConfigError::DuplicateTagField { field });
            }
            validated.push(field);
        }
        if validated.is_empty() {
            return Err(ConfigError::EmptyTagSchema);
        }
        Ok(Self { fields: validated })
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields
            .iter()
            .any(|field| field.eq_ignore_ascii_case(name))
    }

    /// Canonical spelling of `name` within the schema.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

impl Default for TagSchema {
    fn default() -> Self {
        Self {
            fields: DEFAULT_EXPECTED_TAGS.iter().map(|f| (*f).to_string()).collect(),
        }
    }
}
