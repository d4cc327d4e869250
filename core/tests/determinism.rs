//! Two runs over the same data must produce identical stats.

mod common;

use common::{fixed_clock, FakeSource};
use usage_alert_core::{clock::SystemClock, engine::DeclineEngine};

fn source() -> FakeSource {
    FakeSource::with_branches(&[("N01", Some("เหนือ")), ("S02", Some("ใต้")), ("E03", None)])
        .usage("N01", "202501", &[("a", 10.0), ("b", 55.5), ("c", 0.0)])
        .usage("N01", "202412", &[("a", 40.0), ("b", 60.0), ("c", 0.0)])
        .usage("S02", "202501", &[("x", 1.0)])
        .usage("S02", "202412", &[("x", 3.0)])
        .failing("E03")
}

#[test]
fn identical_inputs_produce_identical_stats() {
    let src = source();
    let engine = DeclineEngine::new(&src, &src).with_clock(fixed_clock());

    let a = engine.compute_alerts("202501", 25.0).unwrap();
    let b = engine.compute_alerts("202501", 25.0).unwrap();

    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn only_the_timestamp_differs_on_the_wall_clock() {
    let src = source();
    let engine = DeclineEngine::new(&src, &src).with_clock(SystemClock);

    let mut a = engine.compute_alerts("202501", 25.0).unwrap();
    let b = engine.compute_alerts("202501", 25.0).unwrap();
    a.generated_at = b.generated_at;

    assert_eq!(a, b);
}
