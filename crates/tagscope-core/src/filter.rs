//! Filter selections over dimension values.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use tagscope_model::{ConfigError, Dataset, Dimension, Dimensional, UNSPECIFIED};

/// Allowed values per dimension. Dimensions without an entry are
/// unrestricted; restrictions combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    restrictions: BTreeMap<Dimension, BTreeSet<String>>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts `dimension` to `values`, replacing any earlier selection.
    /// Use [`UNSPECIFIED`] to admit records with no value.
    pub fn restrict<I, S>(&mut self, dimension: Dimension, values: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed: BTreeSet<String> = values
            .into_iter()
            .map(|value| value.as_ref().trim().to_string())
            .filter(|value| !value.is_empty())
            .collect();
        if allowed.is_empty() {
            return Err(ConfigError::EmptyFilterSelection {
                dimension: dimension.to_string(),
            });
        }
        self.restrictions.insert(dimension, allowed);
        Ok(())
    }

    pub fn with_restriction<I, S>(mut self, dimension: Dimension, values: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.restrict(dimension, values)?;
        Ok(self)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.restrictions.is_empty()
    }

    pub fn restrictions(&self) -> impl Iterator<Item = (&Dimension, &BTreeSet<String>)> {
        self.restrictions.iter()
    }

    pub fn matches<R: Dimensional + ?Sized>(&self, record: &R) -> bool {
        self.restrictions.iter().all(|(dimension, allowed)| {
            let value = record.dimension_value(dimension).unwrap_or(UNSPECIFIED);
            allowed.contains(value)
        })
    }
}

/// Records passing every restriction, in input order.
pub fn apply_filters<'r, R: Dimensional>(records: &'r [R], spec: &FilterSpec) -> Vec<&'r R> {
    records.iter().filter(|record| spec.matches(*record)).collect()
}

/// Parses `DIMENSION=VALUE[,VALUE...]`.
pub fn parse_selection(raw: &str) -> Result<(Dimension, Vec<String>), ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidSelection {
        kind: "filter",
        input: raw.to_string(),
        message: message.to_string(),
    };
    let (dimension, values) = raw
        .split_once('=')
        .ok_or_else(|| invalid("expected DIMENSION=VALUE[,VALUE...]"))?;
    let dimension: Dimension = dimension.parse()?;
    let values: Vec<String> = values
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() {
        return Err(ConfigError::EmptyFilterSelection {
            dimension: dimension.to_string(),
        });
    }
    Ok((dimension, values))
}

/// Maps a user-supplied dimension onto the dataset's header spelling.
///
/// # Errors
///
/// Unknown columns and the ID/cost columns are rejected.
pub fn resolve_dimension(dataset: &Dataset, dimension: Dimension) -> Result<Dimension, ConfigError> {
    match dimension {
        Dimension::TaggedStatus => Ok(Dimension::TaggedStatus),
        Dimension::Field(name) => match dataset.resolve_column(&name) {
            Some(column) if !dataset.is_key_column(column) => Ok(Dimension::field(column)),
            _ => Err(ConfigError::UnknownDimension { name }),
        },
    }
}
