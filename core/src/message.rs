//! Notification message rendering.
//!
//! Layout:
//!   header
//!   reporting date + threshold
//!   period comparison
//!   separator
//!   one bullet per alerted branch, or the no-alerts line
//!   separator
//!   detail link (only when configured)
//!   call to action
//!
//! Rendering is pure: no I/O, no clock reads.

use crate::{
    calendar::{format_local_timestamp, period_label},
    engine::AlertRunStats,
};
use chrono::FixedOffset;

pub const HEADER: &str = "📉 แจ้งเตือนผู้ใช้น้ำที่มีปริมาณการใช้ลดลง";
pub const SEPARATOR: &str = "━━━━━━━━━━━━━━━";
pub const NO_ALERTS_LINE: &str = "✅ ไม่พบสาขาที่มีผู้ใช้น้ำลดลงตามเกณฑ์";
pub const UNIT_LABEL: &str = "ราย";
pub const CALL_TO_ACTION: &str = "กรุณาตรวจสอบมาตรวัดน้ำและติดตามผู้ใช้น้ำดังกล่าว";

/// Render a run into the notification text.
pub fn render_notification(
    stats: &AlertRunStats,
    detail_link: Option<&str>,
    offset: &FixedOffset,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(HEADER.to_string());
    lines.push(format!(
        "ข้อมูล ณ วันที่ {} | เกณฑ์ลดลงตั้งแต่ {}%",
        format_local_timestamp(&stats.generated_at, offset),
        format_threshold(stats.threshold_percent)
    ));
    lines.push(format!(
        "รอบ {} เทียบกับ {}",
        period_label(stats.target_period),
        period_label(stats.previous_period)
    ));
    lines.push(SEPARATOR.to_string());

    if stats.alerts.is_empty() {
        lines.push(NO_ALERTS_LINE.to_string());
    } else {
        for alert in &stats.alerts {
            lines.push(format!("• {} {} {}", alert.display_name, alert.count, UNIT_LABEL));
        }
    }
    lines.push(SEPARATOR.to_string());

    if let Some(link) = detail_link.map(str::trim).filter(|l| !l.is_empty()) {
        lines.push(format!("🔗 ดูรายละเอียด: {link}"));
    }
    lines.push(CALL_TO_ACTION.to_string());

    lines.join("\n")
}

/// `20.0` → `"20"`, `12.5` → `"12.5"`.
fn format_threshold(threshold: f64) -> String {
    if threshold.fract() == 0.0 && threshold.is_finite() {
        format!("{threshold:.0}")
    } else {
        format!("{threshold}")
    }
}
