use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Invalid period '{input}': expected YYYYMM with month 01-12")]
    InvalidPeriod { input: String },

    #[error("Invalid threshold {value}: expected a finite, non-negative percentage")]
    InvalidThreshold { value: f64 },

    #[error("Branch catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    #[error("Usage for branch '{branch_code}' unavailable: {reason}")]
    BranchUsageUnavailable { branch_code: String, reason: String },

    #[error("Notification delivery failed: {reason}")]
    Delivery { reason: String },

    #[error("Alert run cancelled")]
    Cancelled,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AlertResult<T> = Result<T, AlertError>;
