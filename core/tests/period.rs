//! Period arithmetic tests.

use usage_alert_core::{
    error::AlertError,
    period::{fiscal_year, previous_period, Period},
};

#[test]
fn previous_period_wraps_january_to_december() {
    assert_eq!(previous_period("202501").unwrap().key(), "202412");
    assert_eq!(previous_period("202503").unwrap().key(), "202502");
    assert_eq!(previous_period("202412").unwrap().key(), "202411");
}

#[test]
fn two_steps_back_is_two_months_earlier() {
    for (key, expected) in [("202503", "202501"), ("202502", "202412"), ("202501", "202411")] {
        let p = Period::parse(key).unwrap();
        let back_two = p.previous().unwrap().previous().unwrap();
        assert_eq!(back_two.key(), expected, "two months before {key}");
    }
}

#[test]
fn fiscal_year_starts_in_october() {
    let fy = |k: &str| fiscal_year(Period::parse(k).unwrap());
    assert_eq!(fy("202501"), 2025);
    assert_eq!(fy("202410"), 2025);
    assert_eq!(fy("202409"), 2024);
    assert_eq!(fy("202412"), 2025);
}

/// Walking forward month by month, the fiscal year never decreases and
/// only increments when the month becomes 10.
#[test]
fn fiscal_year_is_monotonic_and_steps_at_october() {
    let mut prev_fy = None;
    for year in 2023..=2025 {
        for month in 1..=12 {
            let fy = Period::new(year, month).unwrap().fiscal_year();
            if let Some(p) = prev_fy {
                if month == 10 {
                    assert_eq!(fy, p + 1, "{year}-{month} should open a new fiscal year");
                } else {
                    assert_eq!(fy, p, "{year}-{month} should stay in fiscal year {p}");
                }
            }
            prev_fy = Some(fy);
        }
    }
}

#[test]
fn malformed_keys_are_rejected() {
    for bad in ["", "2025", "2025011", "20250a", "202500", "202513", "000001", "2025-1", " 20251"] {
        match previous_period(bad) {
            Err(AlertError::InvalidPeriod { input }) => assert_eq!(input, bad),
            other => panic!("expected InvalidPeriod for {bad:?}, got {other:?}"),
        }
    }
}

#[test]
fn january_of_year_one_has_no_predecessor() {
    assert!(matches!(previous_period("000101"), Err(AlertError::InvalidPeriod { .. })));
}

#[test]
fn period_serializes_as_canonical_key() {
    let p = Period::parse("202409").unwrap();
    assert_eq!(serde_json::to_string(&p).unwrap(), "\"202409\"");
    let back: Period = serde_json::from_str("\"202409\"").unwrap();
    assert_eq!(back, p);
    assert!(serde_json::from_str::<Period>("\"202413\"").is_err());
}

#[test]
fn period_from_date_uses_calendar_month() {
    let d = chrono::NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
    assert_eq!(Period::from_date(&d).unwrap().key(), "202503");
}

#[test]
fn period_from_date_rejects_years_before_one() {
    let d = chrono::NaiveDate::from_ymd_opt(0, 6, 15).unwrap();
    assert!(matches!(Period::from_date(&d), Err(AlertError::InvalidPeriod { .. })));
    let d = chrono::NaiveDate::from_ymd_opt(-44, 3, 15).unwrap();
    assert!(Period::from_date(&d).is_err());
}
