use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tuple of dimension values identifying an aggregate group.
///
/// The empty key stands for the whole record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(pub Vec<String>);

impl GroupKey {
    pub fn is_total(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("All resources");
        }
        f.write_str(&self.0.join(" / "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateGroup {
    pub key: GroupKey,
    pub total_cost: Decimal,
    pub record_count: usize,
    pub tagged_cost: Decimal,
    pub untagged_cost: Decimal,
}

impl AggregateGroup {
    pub fn empty(key: GroupKey) -> Self {
        Self {
            key,
            total_cost: Decimal::ZERO,
            record_count: 0,
            tagged_cost: Decimal::ZERO,
            untagged_cost: Decimal::ZERO,
        }
    }

    /// Untagged share of the group cost as a percentage (0 for a zero total).
    pub fn untagged_percentage(&self) -> Decimal {
        percentage(self.untagged_cost, self.total_cost)
    }
}

/// Split of cost between tagged and untagged resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostVisibility {
    pub total_cost: Decimal,
    pub tagged_cost: Decimal,
    pub untagged_cost: Decimal,
    pub untagged_percentage: Decimal,
}

/// `part / whole * 100`, rounded to two places; zero when `whole` is zero.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
}
