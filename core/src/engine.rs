//! Decline detection engine.
//!
//! For a target period the engine joins each branch's current and previous
//! usage by customer code and counts customers whose usage fell by at least
//! the threshold percentage. Branches are processed one at a time in catalog
//! order. A branch whose usage cannot be read is skipped and recorded as a
//! `BranchOutcome::Skipped`; the run carries on with the next branch.
//! Only a catalog failure aborts the run.

use crate::{
    clock::{Clock, SystemClock},
    error::{AlertError, AlertResult},
    period::Period,
    source::{Branch, BranchCatalog, UsageRecord, UsageSource},
    types::{BranchCode, FiscalYear},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchAlertResult {
    pub branch_code:  BranchCode,
    pub display_name: String,
    pub count:        u32,
}

/// What happened to one branch during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BranchOutcome {
    Alerted(BranchAlertResult),
    NoAlerts { branch_code: BranchCode },
    Skipped  { branch_code: BranchCode, reason: String },
}

impl BranchOutcome {
    pub fn branch_code(&self) -> &str {
        match self {
            BranchOutcome::Alerted(r)                  => r.branch_code.as_str(),
            BranchOutcome::NoAlerts { branch_code }    => branch_code.as_str(),
            BranchOutcome::Skipped { branch_code, .. } => branch_code.as_str(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, BranchOutcome::Skipped { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRunStats {
    pub target_period:       Period,
    pub previous_period:     Period,
    pub fiscal_year:         FiscalYear,
    /// Percentage magnitude; 20.0 means "fell by 20% or more".
    pub threshold_percent:   f64,
    pub total_branches:      usize,
    pub branches_with_alerts: usize,
    pub total_customers:     u32,
    pub alerts:              Vec<BranchAlertResult>,
    pub outcomes:            Vec<BranchOutcome>,
    pub generated_at:        DateTime<Utc>,
}

impl AlertRunStats {
    /// Branches whose usage fetch failed, in catalog order.
    pub fn skipped_branches(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_skipped())
            .map(BranchOutcome::branch_code)
            .collect()
    }
}

/// Shared cancellation signal. Raising it stops the run before the next
/// branch is fetched; the run then fails with `AlertError::Cancelled`.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ── Pure decline rule ────────────────────────────────────────────────────────

/// Percentage change from `previous` to `current`.
/// `None` when there is no usable baseline (previous usage of zero).
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Accept a threshold only if it is a finite percentage magnitude ≥ 0.
/// A negative value would flag flat or rising usage; NaN would flag nothing.
pub fn validate_threshold(threshold_percent: f64) -> AlertResult<f64> {
    if !threshold_percent.is_finite() || threshold_percent < 0.0 {
        return Err(AlertError::InvalidThreshold { value: threshold_percent });
    }
    Ok(threshold_percent)
}

/// Count customers whose usage fell by at least `threshold_percent`.
///
/// Customers without a previous record, or with previous usage of exactly
/// zero, never qualify. Increases never qualify whatever their size,
/// provided the threshold passed `validate_threshold`.
pub fn count_declines(
    current: &[UsageRecord],
    previous: &[UsageRecord],
    threshold_percent: f64,
) -> u32 {
    let baseline: HashMap<&str, f64> = previous
        .iter()
        .map(|r| (r.customer_code.as_str(), r.usage))
        .collect();

    let limit = -threshold_percent;
    let count = current
        .iter()
        .filter_map(|r| {
            let prev = *baseline.get(r.customer_code.as_str())?;
            percent_change(r.usage, prev)
        })
        .filter(|pct| *pct <= limit)
        .count();

    count as u32
}

// ── Engine ───────────────────────────────────────────────────────────────────

pub struct DeclineEngine<'a> {
    catalog: &'a dyn BranchCatalog,
    usage:   &'a dyn UsageSource,
    clock:   Box<dyn Clock + 'a>,
    cancel:  CancelFlag,
}

impl<'a> DeclineEngine<'a> {
    pub fn new(catalog: &'a dyn BranchCatalog, usage: &'a dyn UsageSource) -> Self {
        Self {
            catalog,
            usage,
            clock: Box::new(SystemClock),
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'a) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Run decline detection for `target_period` across every branch.
    pub fn compute_alerts(
        &self,
        target_period: &str,
        threshold_percent: f64,
    ) -> AlertResult<AlertRunStats> {
        let threshold_percent = validate_threshold(threshold_percent)?;
        let target = Period::parse(target_period)?;
        let previous = target.previous()?;
        let fiscal_year = target.fiscal_year();

        let branches = self.catalog.list_branches().map_err(|e| match e {
            AlertError::Cancelled => AlertError::Cancelled,
            other => AlertError::CatalogUnavailable { reason: other.to_string() },
        })?;

        let mut outcomes = Vec::with_capacity(branches.len());
        for branch in &branches {
            if self.cancel.is_cancelled() {
                log::info!("alert run {target} cancelled after {} branches", outcomes.len());
                return Err(AlertError::Cancelled);
            }
            outcomes.push(self.process_branch(
                branch, target, previous, fiscal_year, threshold_percent,
            )?);
        }

        let alerts: Vec<BranchAlertResult> = outcomes
            .iter()
            .filter_map(|o| match o {
                BranchOutcome::Alerted(r) => Some(r.clone()),
                _ => None,
            })
            .collect();
        let total_customers = alerts.iter().map(|r| r.count).sum();

        let stats = AlertRunStats {
            target_period: target,
            previous_period: previous,
            fiscal_year,
            threshold_percent,
            total_branches: branches.len(),
            branches_with_alerts: alerts.len(),
            total_customers,
            alerts,
            outcomes,
            generated_at: self.clock.now(),
        };

        log::info!(
            "alert run {target} vs {previous} (FY{fiscal_year}) threshold={threshold_percent}%: \
             {} branches, {} with alerts, {} customers, {} skipped",
            stats.total_branches,
            stats.branches_with_alerts,
            stats.total_customers,
            stats.skipped_branches().len()
        );
        Ok(stats)
    }

    /// Evaluate one branch. Usage failures become a `Skipped` outcome;
    /// only cancellation propagates as an error.
    fn process_branch(
        &self,
        branch: &Branch,
        target: Period,
        previous: Period,
        fiscal_year: FiscalYear,
        threshold_percent: f64,
    ) -> AlertResult<BranchOutcome> {
        let fetched = self
            .usage
            .fetch_usage(&branch.code, target, fiscal_year)
            .and_then(|cur| {
                // A cancel raised during the first query stops the second.
                if self.cancel.is_cancelled() {
                    return Err(AlertError::Cancelled);
                }
                self.usage
                    .fetch_usage(&branch.code, previous, fiscal_year)
                    .map(|prev| (cur, prev))
            });

        let (current, prior) = match fetched {
            Ok(pair) => pair,
            Err(AlertError::Cancelled) => {
                log::info!("alert run {target} cancelled at branch {}", branch.code);
                return Err(AlertError::Cancelled);
            }
            Err(e) => {
                let err = AlertError::BranchUsageUnavailable {
                    branch_code: branch.code.clone(),
                    reason: e.to_string(),
                };
                log::warn!("skipping branch: {err}");
                return Ok(BranchOutcome::Skipped {
                    branch_code: branch.code.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let count = count_declines(&current, &prior, threshold_percent);
        log::debug!(
            "branch={} current={} previous={} qualifying={count}",
            branch.code,
            current.len(),
            prior.len()
        );

        if count == 0 {
            return Ok(BranchOutcome::NoAlerts { branch_code: branch.code.clone() });
        }
        Ok(BranchOutcome::Alerted(BranchAlertResult {
            branch_code:  branch.code.clone(),
            display_name: branch.display_name().to_string(),
            count,
        }))
    }
}
