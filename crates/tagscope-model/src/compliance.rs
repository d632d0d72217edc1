use serde::{Deserialize, Serialize};

/// Tag completeness of a single record against a `TagSchema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceScore {
    pub present: usize,
    pub total: usize,
    /// `present / total`, in `[0, 1]`.
    pub completeness: f64,
    pub fully_tagged: bool,
    /// Expected fields that are not present, in schema order.
    pub missing: Vec<String>,
}

impl ComplianceScore {
    pub fn percentage(&self) -> f64 {
        self.completeness * 100.0
    }
}
