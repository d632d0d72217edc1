use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::record::ResourceRecord;

pub const TAGGED_LABEL: &str = "Tagged";
pub const UNTAGGED_LABEL: &str = "Untagged";

pub fn tagged_status_label(fully_tagged: bool) -> &'static str {
    if fully_tagged {
        TAGGED_LABEL
    } else {
        UNTAGGED_LABEL
    }
}

/// A column records can be grouped or filtered by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// A dataset column, e.g. `Service` or `Region`.
    Field(String),
    /// Derived tagged/untagged classification.
    TaggedStatus,
}

impl Dimension {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Field(name) => name,
            Self::TaggedStatus => "TaggedStatus",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::UnknownDimension {
                name: raw.to_string(),
            });
        }
        let folded = trimmed.to_ascii_lowercase().replace(['-', '_'], "");
        if folded == "taggedstatus" {
            return Ok(Self::TaggedStatus);
        }
        Ok(Self::Field(trimmed.to_string()))
    }
}

/// Anything that exposes dimension values for filtering and grouping.
pub trait Dimensional {
    fn resource_id(&self) -> &str;

    /// Value for `dimension`, or `None` when it is missing or blank.
    fn dimension_value(&self, dimension: &Dimension) -> Option<&str>;
}

impl Dimensional for ResourceRecord {
    fn resource_id(&self) -> &str {
        &self.id
    }

    fn dimension_value(&self, dimension: &Dimension) -> Option<&str> {
        match dimension {
            Dimension::Field(name) => self.present_value(name),
            // Raw records carry no derived status.
            Dimension::TaggedStatus => None,
        }
    }
}

impl<T: Dimensional + ?Sized> Dimensional for &T {
    fn resource_id(&self) -> &str {
        (**self).resource_id()
    }

    fn dimension_value(&self, dimension: &Dimension) -> Option<&str> {
        (**self).dimension_value(dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_status_aliases() {
        for raw in ["tagged-status", "Tagged_Status", "TaggedStatus"] {
            assert_eq!(raw.parse::<Dimension>().unwrap(), Dimension::TaggedStatus);
        }
        assert_eq!(
            " Region ".parse::<Dimension>().unwrap(),
            Dimension::field("Region")
        );
        assert!("  ".parse::<Dimension>().is_err());
    }
}
