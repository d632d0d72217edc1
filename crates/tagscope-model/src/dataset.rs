use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::dimension::{Dimension, Dimensional};
use crate::error::ValidationError;
use crate::record::{ResourceRecord, UNSPECIFIED};

/// In-memory resource table. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    id_column: String,
    cost_column: String,
    records: Vec<ResourceRecord>,
    index: BTreeMap<String, usize>,
    total_cost: Decimal,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate resource IDs and a total cost
    /// that does not fit in a [`Decimal`].
    pub fn new(
        columns: Vec<String>,
        id_column: impl Into<String>,
        cost_column: impl Into<String>,
        records: Vec<ResourceRecord>,
    ) -> Result<Self, ValidationError> {
        let mut index = BTreeMap::new();
        let mut total_cost = Decimal::ZERO;
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), position).is_some() {
                return Err(ValidationError::DuplicateResourceId {
                    resource_id: record.id.clone(),
                });
            }
            total_cost = add_cost(total_cost, record.cost, &record.id)?;
        }
        Ok(Self {
            columns,
            id_column: id_column.into(),
            cost_column: cost_column.into(),
            records,
            index,
            total_cost,
        })
    }

    /// Same column layout with a different set of records.
    pub fn with_records(&self, records: Vec<ResourceRecord>) -> Result<Self, ValidationError> {
        Self::new(
            self.columns.clone(),
            self.id_column.clone(),
            self.cost_column.clone(),
            records,
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn cost_column(&self) -> &str {
        &self.cost_column
    }

    pub fn records(&self) -> &[ResourceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, resource_id: &str) -> Option<&ResourceRecord> {
        self.index
            .get(resource_id)
            .and_then(|position| self.records.get(*position))
    }

    /// Header spelling of `name`, matched case-insensitively.
    pub fn resolve_column(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.columns
            .iter()
            .find(|column| column.as_str() == name)
            .or_else(|| {
                self.columns
                    .iter()
                    .find(|column| column.eq_ignore_ascii_case(name))
            })
            .map(String::as_str)
    }

    /// True for the ID and cost columns, which are not record fields.
    pub fn is_key_column(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.id_column) || name.eq_ignore_ascii_case(&self.cost_column)
    }

    /// Sum of every record cost. No subset of the records can overflow it.
    pub fn total_cost(&self) -> Decimal {
        self.total_cost
    }

    /// Sorted distinct values of a column, including the `Unspecified`
    /// sentinel when some record has no value.
    pub fn distinct_values(&self, dimension: &Dimension) -> Vec<String> {
        let mut values = BTreeSet::new();
        for record in &self.records {
            let value = record.dimension_value(dimension).unwrap_or(UNSPECIFIED);
            values.insert(value.to_string());
        }
        values.into_iter().collect()
    }
}

/// `total + cost`, failing with [`ValidationError::CostOverflow`] instead of
/// panicking.
pub fn add_cost(
    total: Decimal,
    cost: Decimal,
    resource_id: &str,
) -> Result<Decimal, ValidationError> {
    total
        .checked_add(cost)
        .ok_or_else(|| ValidationError::CostOverflow {
            resource_id: resource_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ResourceRecord {
        ResourceRecord::new(id, Decimal::new(1000, 2))
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Dataset::new(
            vec!["ResourceID".into(), "MonthlyCostUSD".into()],
            "ResourceID",
            "MonthlyCostUSD",
            vec![record("r1"), record("r2"), record("r1")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateResourceId {
                resource_id: "r1".to_string()
            }
        );
    }

    #[test]
    fn rejects_total_cost_overflow() {
        let huge = Decimal::MAX - Decimal::ONE;
        let err = Dataset::new(
            vec!["ResourceID".into(), "MonthlyCostUSD".into()],
            "ResourceID",
            "MonthlyCostUSD",
            vec![
                ResourceRecord::new("r1", huge),
                ResourceRecord::new("r2", huge),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::CostOverflow {
                resource_id: "r2".to_string()
            }
        );
    }

    #[test]
    fn resolves_columns_case_insensitively() {
        let dataset = Dataset::new(
            vec!["ResourceID".into(), "Region".into(), "MonthlyCostUSD".into()],
            "ResourceID",
            "MonthlyCostUSD",
            vec![record("r1")],
        )
        .unwrap();
        assert_eq!(dataset.resolve_column("region"), Some("Region"));
        assert_eq!(dataset.resolve_column("zone"), None);
        assert!(dataset.is_key_column("monthlycostusd"));
        assert_eq!(dataset.get("r1").map(|r| r.id.as_str()), Some("r1"));
    }
}
