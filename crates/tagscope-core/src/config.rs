//! Governance configuration loaded from TOML.
//!
//! ```toml
//! [dataset]
//! id_column = "ResourceID"
//! cost_column = "MonthlyCostUSD"
//! declared_status_column = "Tagged"
//!
//! [tags]
//! expected = ["Department", "Project", "Environment", "Owner", "CostCenter"]
//!
//! [report]
//! lowest_completeness_limit = 5
//! top_limit = 10
//! ```
//!
//! Every section is optional; omitted keys fall back to the defaults above.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tagscope_model::{ConfigError, DEFAULT_EXPECTED_TAGS, TagSchema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GovernanceConfig {
    pub dataset: DatasetSection,
    pub tags: TagsSection,
    pub report: ReportSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetSection {
    pub id_column: String,
    pub cost_column: String,
    /// Optional yes/no column cross-checked against the derived status.
    pub declared_status_column: Option<String>,
}

impl Default for DatasetSection {
    fn default() -> Self {
        Self {
            id_column: "ResourceID".to_string(),
            cost_column: "MonthlyCostUSD".to_string(),
            declared_status_column: Some("Tagged".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagsSection {
    pub expected: Vec<String>,
}

impl Default for TagsSection {
    fn default() -> Self {
        Self {
            expected: DEFAULT_EXPECTED_TAGS.iter().map(|f| (*f).to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    pub lowest_completeness_limit: usize,
    pub top_limit: usize,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            lowest_completeness_limit: 5,
            top_limit: 10,
        }
    }
}

impl GovernanceConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|error| ConfigError::Invalid {
            message: error.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn tag_schema(&self) -> Result<TagSchema, ConfigError> {
        TagSchema::new(self.tags.expected.iter().map(String::as_str))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let id = self.dataset.id_column.trim();
        let cost = self.dataset.cost_column.trim();
        if id.is_empty() || cost.is_empty() {
            return Err(ConfigError::Invalid {
                message: "id_column and cost_column must be non-empty".to_string(),
            });
        }
        if id.eq_ignore_ascii_case(cost) {
            return Err(ConfigError::Invalid {
                message: format!("id_column and cost_column are both '{id}'"),
            });
        }
        let schema = self.tag_schema()?;
        if let Some(field) = [id, cost].into_iter().find(|column| schema.contains(column)) {
            return Err(ConfigError::Invalid {
                message: format!("key column '{field}' cannot be an expected tag"),
            });
        }
        if self.report.lowest_completeness_limit == 0 || self.report.top_limit == 0 {
            return Err(ConfigError::Invalid {
                message: "report limits must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = GovernanceConfig::from_toml_str("").unwrap();
        assert_eq!(config, GovernanceConfig::default());
        assert_eq!(config.tag_schema().unwrap(), TagSchema::default());
    }

    #[test]
    fn overrides_expected_tags() {
        let config = GovernanceConfig::from_toml_str(
            "[tags]\nexpected = [\"Owner\", \"Team\"]\n[report]\ntop_limit = 3\n",
        )
        .unwrap();
        assert_eq!(config.tag_schema().unwrap().fields(), ["Owner", "Team"]);
        assert_eq!(config.report.top_limit, 3);
        assert_eq!(config.report.lowest_completeness_limit, 5);
    }

    #[test]
    fn rejects_invalid_documents() {
        assert_eq!(
            GovernanceConfig::from_toml_str("[tags]\nexpected = []\n"),
            Err(ConfigError::EmptyTagSchema)
        );
        assert!(matches!(
            GovernanceConfig::from_toml_str("[tags]\nexpected = [\"Owner\", \"owner\"]\n"),
            Err(ConfigError::DuplicateTagField { .. })
        ));
        assert!(matches!(
            GovernanceConfig::from_toml_str("[dataset]\nunknown = 1\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            GovernanceConfig::from_toml_str("[tags]\nexpected = [\"ResourceID\"]\n"),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
