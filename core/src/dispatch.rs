//! Dispatch: compute alerts, render the message, hand it to the sink.

use crate::{
    engine::{AlertRunStats, DeclineEngine},
    error::AlertResult,
    message::render_notification,
    notifier::NotificationSink,
};
use chrono::FixedOffset;

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Delivered { stats: AlertRunStats, message: String },
    /// No sink configured. Not an error.
    Skipped   { stats: AlertRunStats, message: String },
    /// Rendered on request; the sink was never consulted.
    Preview   { stats: AlertRunStats, message: String },
}

impl DispatchOutcome {
    pub fn stats(&self) -> &AlertRunStats {
        match self {
            DispatchOutcome::Delivered { stats, .. }
            | DispatchOutcome::Skipped { stats, .. }
            | DispatchOutcome::Preview { stats, .. } => stats,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DispatchOutcome::Delivered { message, .. }
            | DispatchOutcome::Skipped { message, .. }
            | DispatchOutcome::Preview { message, .. } => message,
        }
    }

    pub fn was_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}

pub struct AlertDispatcher<'a> {
    engine:      DeclineEngine<'a>,
    sink:        Option<Box<dyn NotificationSink + 'a>>,
    detail_link: Option<String>,
    offset:      FixedOffset,
}

impl<'a> AlertDispatcher<'a> {
    pub fn new(
        engine: DeclineEngine<'a>,
        sink: Option<Box<dyn NotificationSink + 'a>>,
        detail_link: Option<String>,
        offset: FixedOffset,
    ) -> Self {
        Self { engine, sink, detail_link, offset }
    }

    pub fn engine(&self) -> &DeclineEngine<'a> {
        &self.engine
    }

    /// Build the message without sending it.
    pub fn preview(&self, target_period: &str, threshold_percent: f64) -> AlertResult<DispatchOutcome> {
        let (stats, message) = self.compute_and_render(target_period, threshold_percent)?;
        Ok(DispatchOutcome::Preview { stats, message })
    }

    /// Compute, render, and deliver. Delivery errors are returned as-is.
    pub fn run(&self, target_period: &str, threshold_percent: f64) -> AlertResult<DispatchOutcome> {
        let (stats, message) = self.compute_and_render(target_period, threshold_percent)?;

        let Some(sink) = &self.sink else {
            log::info!("no notification destination configured; delivery skipped");
            return Ok(DispatchOutcome::Skipped { stats, message });
        };

        sink.send(&message)?;
        Ok(DispatchOutcome::Delivered { stats, message })
    }

    fn compute_and_render(
        &self,
        target_period: &str,
        threshold_percent: f64,
    ) -> AlertResult<(AlertRunStats, String)> {
        let stats = self.engine.compute_alerts(target_period, threshold_percent)?;
        let message = render_notification(&stats, self.detail_link.as_deref(), &self.offset);
        Ok((stats, message))
    }
}
