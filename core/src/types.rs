//! Shared primitive types used across the alert pipeline.

/// Organizational branch code, unique within the catalog.
pub type BranchCode = String;

/// Customer account code, unique within a branch.
pub type CustomerCode = String;

/// Fiscal year number. The fiscal year begins in October.
pub type FiscalYear = i32;
