//! Cost aggregation by dimension.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use tagscope_model::{
    AggregateGroup, CostVisibility, Dimension, Dimensional, GroupKey, UNSPECIFIED,
    ValidationError, add_cost, percentage,
};

use crate::compliance::AnnotatedRecord;

/// A record that carries a cost and a derived tagged flag.
pub trait Classified: Dimensional {
    fn cost(&self) -> Decimal;
    fn is_fully_tagged(&self) -> bool;
}

impl Classified for AnnotatedRecord<'_> {
    fn cost(&self) -> Decimal {
        self.record.cost
    }

    fn is_fully_tagged(&self) -> bool {
        self.score.fully_tagged
    }
}

impl<T: Classified + ?Sized> Classified for &T {
    fn cost(&self) -> Decimal {
        (**self).cost()
    }

    fn is_fully_tagged(&self) -> bool {
        (**self).is_fully_tagged()
    }
}

/// Groups `records` by `dimensions` and sums their cost.
///
/// Missing dimension values are grouped under [`UNSPECIFIED`]. With no
/// dimensions the result is a single group covering every record, even
/// when there are none. Groups are ordered by total cost descending, then
/// by key.
///
/// # Errors
///
/// Returns [`ValidationError::NegativeCost`] for the first record with a
/// negative cost, and [`ValidationError::CostOverflow`] when a sum does not
/// fit in a [`Decimal`].
pub fn aggregate<R: Classified>(
    records: &[R],
    dimensions: &[Dimension],
) -> Result<Vec<AggregateGroup>, ValidationError> {
    let mut groups: BTreeMap<GroupKey, AggregateGroup> = BTreeMap::new();
    if dimensions.is_empty() {
        groups.insert(
            GroupKey::default(),
            AggregateGroup::empty(GroupKey::default()),
        );
    }
    for record in records {
        let cost = record.cost();
        if cost < Decimal::ZERO {
            return Err(ValidationError::NegativeCost {
                resource_id: record.resource_id().to_string(),
                cost,
            });
        }
        let key = group_key(record, dimensions);
        let group = groups
            .entry(key.clone())
            .or_insert_with(|| AggregateGroup::empty(key));
        let id = record.resource_id();
        group.total_cost = add_cost(group.total_cost, cost, id)?;
        group.record_count += 1;
        if record.is_fully_tagged() {
            group.tagged_cost = add_cost(group.tagged_cost, cost, id)?;
        } else {
            group.untagged_cost = add_cost(group.untagged_cost, cost, id)?;
        }
    }

    let mut groups: Vec<AggregateGroup> = groups.into_values().collect();
    groups.sort_by(|a, b| {
        b.total_cost
            .cmp(&a.total_cost)
            .then_with(|| a.key.cmp(&b.key))
    });
    debug!(
        records = records.len(),
        dimensions = dimensions.len(),
        groups = groups.len(),
        "aggregated costs"
    );
    Ok(groups)
}

/// Tagged versus untagged cost over `records`.
pub fn cost_visibility<R: Classified>(records: &[R]) -> Result<CostVisibility, ValidationError> {
    let total = aggregate(records, &[])?
        .into_iter()
        .next()
        .unwrap_or_else(|| AggregateGroup::empty(GroupKey::default()));
    Ok(CostVisibility {
        untagged_percentage: percentage(total.untagged_cost, total.total_cost),
        total_cost: total.total_cost,
        tagged_cost: total.tagged_cost,
        untagged_cost: total.untagged_cost,
    })
}

fn group_key<R: Dimensional>(record: &R, dimensions: &[Dimension]) -> GroupKey {
    GroupKey(
        dimensions
            .iter()
            .map(|dimension| {
                record
                    .dimension_value(dimension)
                    .unwrap_or(UNSPECIFIED)
                    .to_string()
            })
            .collect(),
    )
}
