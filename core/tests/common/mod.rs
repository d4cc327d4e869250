//! In-test collaborators shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
};
use usage_alert_core::{
    clock::FixedClock,
    engine::CancelFlag,
    error::{AlertError, AlertResult},
    notifier::NotificationSink,
    period::Period,
    source::{Branch, BranchCatalog, UsageRecord, UsageSource},
    types::FiscalYear,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 2025-04-05 10:00 in Bangkok.
pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 5, 3, 0, 0).unwrap()
}

pub fn fixed_clock() -> FixedClock {
    FixedClock::new(fixed_instant())
}

pub fn period(key: &str) -> Period {
    Period::parse(key).unwrap()
}

/// Catalog + usage source backed by plain maps.
#[derive(Default)]
pub struct FakeSource {
    pub branches:     Vec<Branch>,
    usage:            HashMap<(String, String), Vec<UsageRecord>>,
    failing:          HashSet<String>,
    cancelled:        HashSet<String>,
    raise_on_fetch:   Option<CancelFlag>,
    pub catalog_down: bool,
    pub calls:        RefCell<Vec<(String, Period, FiscalYear)>>,
}

impl FakeSource {
    pub fn with_branches(codes: &[(&str, Option<&str>)]) -> Self {
        Self {
            branches: codes.iter().map(|(c, n)| Branch::new(*c, *n)).collect(),
            ..Self::default()
        }
    }

    pub fn usage(mut self, branch: &str, period: &str, records: &[(&str, f64)]) -> Self {
        self.usage.insert(
            (branch.to_string(), period.to_string()),
            records.iter().map(|(c, u)| UsageRecord::new(*c, *u)).collect(),
        );
        self
    }

    pub fn failing(mut self, branch: &str) -> Self {
        self.failing.insert(branch.to_string());
        self
    }

    /// Fetches for `branch` report that the caller's run was cancelled.
    pub fn cancelled_at(mut self, branch: &str) -> Self {
        self.cancelled.insert(branch.to_string());
        self
    }

    /// Every fetch raises `flag`, as if cancellation arrived mid-query.
    pub fn raising(mut self, flag: CancelFlag) -> Self {
        self.raise_on_fetch = Some(flag);
        self
    }
}

impl BranchCatalog for FakeSource {
    fn list_branches(&self) -> AlertResult<Vec<Branch>> {
        if self.catalog_down {
            return Err(AlertError::Other(anyhow::anyhow!("catalog connection refused")));
        }
        Ok(self.branches.clone())
    }
}

impl UsageSource for FakeSource {
    fn fetch_usage(
        &self,
        branch_code: &str,
        period: Period,
        fiscal_year: FiscalYear,
    ) -> AlertResult<Vec<UsageRecord>> {
        self.calls
            .borrow_mut()
            .push((branch_code.to_string(), period, fiscal_year));
        if let Some(flag) = &self.raise_on_fetch {
            flag.cancel();
        }
        if self.cancelled.contains(branch_code) {
            return Err(AlertError::Cancelled);
        }
        if self.failing.contains(branch_code) {
            return Err(AlertError::Other(anyhow::anyhow!("usage query timed out")));
        }
        Ok(self
            .usage
            .get(&(branch_code.to_string(), period.key()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Sink that records every message it is given.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub sent: Rc<RefCell<Vec<String>>>,
    pub fail: bool,
}

impl NotificationSink for RecordingSink {
    fn send(&self, message: &str) -> AlertResult<()> {
        if self.fail {
            return Err(AlertError::Delivery { reason: "HTTP 401 Unauthorized".into() });
        }
        self.sent.borrow_mut().push(message.to_string());
        Ok(())
    }
}
