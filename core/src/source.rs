//! Collaborator contracts consumed by the decline engine.
//!
//! RULE: The engine only reads through these traits.
//! It never touches SQL or the network directly.

use crate::{
    error::AlertResult,
    period::Period,
    types::{BranchCode, CustomerCode, FiscalYear},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub code: BranchCode,
    pub name: Option<String>,
}

impl Branch {
    pub fn new(code: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            code: code.into(),
            name: name.map(str::to_string),
        }
    }

    /// Display name, falling back to the code when the name is absent or blank.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => self.code.as_str(),
        }
    }
}

/// One customer's metered usage for one branch and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub customer_code: CustomerCode,
    pub usage:         f64,
}

impl UsageRecord {
    pub fn new(customer_code: impl Into<String>, usage: f64) -> Self {
        Self { customer_code: customer_code.into(), usage }
    }
}

/// Ordered list of known branches.
pub trait BranchCatalog {
    fn list_branches(&self) -> AlertResult<Vec<Branch>>;
}

/// Per-branch usage lookup, keyed by branch, period and fiscal year.
/// Record order is irrelevant to callers.
pub trait UsageSource {
    fn fetch_usage(
        &self,
        branch_code: &str,
        period: Period,
        fiscal_year: FiscalYear,
    ) -> AlertResult<Vec<UsageRecord>>;
}
