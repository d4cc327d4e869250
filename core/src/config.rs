use crate::engine::validate_threshold;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

pub const DEFAULT_THRESHOLD_PERCENT: f64 = 20.0;
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 7; // Asia/Bangkok
pub const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

/// Outbound chat destination. Every field is optional: a missing endpoint,
/// token or destination means delivery is disabled, not misconfigured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotifierConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertConfig {
    #[serde(default = "default_threshold")]
    pub threshold_percent: f64,
    #[serde(default)]
    pub detail_link: Option<String>,
    #[serde(default = "default_offset_hours")]
    pub utc_offset_hours: i32,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

fn default_threshold()     -> f64    { DEFAULT_THRESHOLD_PERCENT }
fn default_offset_hours()  -> i32    { DEFAULT_UTC_OFFSET_HOURS }
fn default_database_path() -> String { "usage.db".to_string() }
fn default_timeout_secs()  -> u64    { DEFAULT_NOTIFY_TIMEOUT_SECS }

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_token: None,
            destination: None,
            timeout_secs: DEFAULT_NOTIFY_TIMEOUT_SECS,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
            detail_link: None,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            database_path: default_database_path(),
            notifier: NotifierConfig::default(),
        }
    }
}

impl AlertConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    /// In tests, use AlertConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content).map_err(|e| anyhow::anyhow!("Invalid config {path}: {e}"))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: AlertConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// In-memory database, no delivery, default threshold.
    pub fn default_test() -> Self {
        Self {
            database_path: ":memory:".to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        validate_threshold(self.threshold_percent)?;
        self.utc_offset()?;
        Ok(())
    }

    pub fn utc_offset(&self) -> anyhow::Result<FixedOffset> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                anyhow::anyhow!("utc_offset_hours out of range: {}", self.utc_offset_hours)
            })
    }
}
