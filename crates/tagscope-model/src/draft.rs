use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::ConfigError;

/// Field name to replacement value.
pub type FieldEdits = BTreeMap<String, String>;

/// Pending tag edits keyed by resource ID.
///
/// A draft lives only as long as the session that owns it; applying it
/// produces edited copies and never touches the loaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditDraft {
    edits: BTreeMap<String, FieldEdits>,
}

impl EditDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        resource_id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.edits
            .entry(resource_id.into())
            .or_default()
            .insert(field.into(), value.into());
    }

    #[must_use]
    pub fn with_edit(
        mut self,
        resource_id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.set(resource_id, field, value);
        self
    }

    pub fn edits_for(&self, resource_id: &str) -> Option<&FieldEdits> {
        self.edits.get(resource_id)
    }

    /// Number of resources with pending edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldEdits)> {
        self.edits.iter()
    }

    /// Merges `other` into this draft; later values win.
    pub fn merge(&mut self, other: EditDraft) {
        for (resource_id, edits) in other.edits {
            self.edits.entry(resource_id).or_default().extend(edits);
        }
    }

    /// Checks that every edited resource exists and that no edit targets
    /// the ID or cost column.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), ConfigError> {
        for (resource_id, edits) in &self.edits {
            if dataset.get(resource_id).is_none() {
                return Err(ConfigError::UnknownResource {
                    resource_id: resource_id.clone(),
                });
            }
            if let Some(field) = edits.keys().find(|field| dataset.is_key_column(field)) {
                return Err(ConfigError::ReadOnlyField {
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Parses `RESOURCE_ID:FIELD=VALUE`. The resource ID may itself contain
/// colons (ARNs); the field name is taken from after the last one.
pub fn parse_edit(raw: &str) -> Result<(String, String, String), ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidSelection {
        kind: "edit",
        input: raw.to_string(),
        message: message.to_string(),
    };
    let (target, value) = raw
        .split_once('=')
        .ok_or_else(|| invalid("expected RESOURCE_ID:FIELD=VALUE"))?;
    let (resource_id, field) = target
        .rsplit_once(':')
        .ok_or_else(|| invalid("expected RESOURCE_ID:FIELD before '='"))?;
    let resource_id = resource_id.trim();
    let field = field.trim();
    if resource_id.is_empty() {
        return Err(invalid("resource id is empty"));
    }
    if field.is_empty() {
        return Err(invalid("field name is empty"));
    }
    Ok((resource_id.to_string(), field.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::record::ResourceRecord;

    #[test]
    fn parses_edits_with_arn_ids() {
        let (id, field, value) =
            parse_edit("arn:aws:ec2:us-east-1:123:instance/i-1:Owner=alice").unwrap();
        assert_eq!(id, "arn:aws:ec2:us-east-1:123:instance/i-1");
        assert_eq!(field, "Owner");
        assert_eq!(value, "alice");

        let (_, _, value) = parse_edit("r1:Owner=").unwrap();
        assert_eq!(value, "");
        assert!(parse_edit("r1=Owner").is_err());
        assert!(parse_edit(":Owner=x").is_err());
    }

    #[test]
    fn validate_rejects_unknown_resources_and_key_columns() {
        let dataset = Dataset::new(
            vec!["ResourceID".into(), "Owner".into(), "MonthlyCostUSD".into()],
            "ResourceID",
            "MonthlyCostUSD",
            vec![ResourceRecord::new("r1", Decimal::ONE)],
        )
        .unwrap();

        let draft = EditDraft::new().with_edit("r1", "Owner", "alice");
        assert_eq!(draft.validate(&dataset), Ok(()));

        let draft = EditDraft::new().with_edit("r2", "Owner", "alice");
        assert_eq!(
            draft.validate(&dataset),
            Err(ConfigError::UnknownResource {
                resource_id: "r2".to_string()
            })
        );

        let draft = EditDraft::new().with_edit("r1", "monthlycostusd", "0");
        assert!(matches!(
            draft.validate(&dataset),
            Err(ConfigError::ReadOnlyField { .. })
        ));
    }

    #[test]
    fn merge_overrides_earlier_values() {
        let mut draft = EditDraft::new()
            .with_edit("r1", "Owner", "alice")
            .with_edit("r1", "Project", "P1");
        draft.merge(EditDraft::new().with_edit("r1", "Owner", "bob"));
        let edits = draft.edits_for("r1").unwrap();
        assert_eq!(edits.get("Owner").map(String::as_str), Some("bob"));
        assert_eq!(edits.len(), 2);
        assert_eq!(draft.len(), 1);
    }
}
