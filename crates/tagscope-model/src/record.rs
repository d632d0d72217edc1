use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Group and filter value used for records with no value for a dimension.
pub const UNSPECIFIED: &str = "Unspecified";

/// Returns true when a cell holds a usable value: non-null and non-blank.
pub fn is_present_value(value: Option<&str>) -> bool {
    value.is_some_and(|value| !value.trim().is_empty())
}

/// One row of the resource dataset.
///
/// `fields` holds every column other than the resource ID and cost, keyed
/// by header name. Blank cells are kept as empty strings so that exports
/// reproduce the source layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: String,
    pub cost: Decimal,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl ResourceRecord {
    pub fn new(id: impl Into<String>, cost: Decimal) -> Self {
        Self {
            id: id.into(),
            cost,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Raw cell value. Exact header match wins, otherwise the first
    /// case-insensitive match.
    pub fn value(&self, field: &str) -> Option<&str> {
        if let Some(value) = self.fields.get(field) {
            return Some(value.as_str());
        }
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed value, or `None` when the field is absent or blank.
    pub fn present_value(&self, field: &str) -> Option<&str> {
        self.value(field)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn is_present(&self, field: &str) -> bool {
        is_present_value(self.value(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_not_present() {
        let record = ResourceRecord::new("r1", Decimal::ONE)
            .with_field("Owner", "   ")
            .with_field("Project", " P1 ");
        assert!(!record.is_present("Owner"));
        assert!(!record.is_present("CostCenter"));
        assert_eq!(record.present_value("Project"), Some("P1"));
    }

    #[test]
    fn lookup_falls_back_to_case_insensitive_match() {
        let record = ResourceRecord::new("r1", Decimal::ONE).with_field("CostCenter", "CC-1");
        assert_eq!(record.value("costcenter"), Some("CC-1"));
        assert_eq!(record.value("CostCenter"), Some("CC-1"));
    }
}
