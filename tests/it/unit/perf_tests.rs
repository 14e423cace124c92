//! Timing helpers.

use notecanvas::perf::{ScopeTimer, TARGET_FRAME_MS, measure, measure_and_log};
use std::time::Duration;

#[test]
fn test_measure_returns_result_and_time() {
    let (value, elapsed) = measure(|| {
        std::thread::sleep(Duration::from_millis(2));
        7
    });
    assert_eq!(value, 7);
    assert!(elapsed >= 2.0);
}

#[test]
fn test_measure_and_log_passes_result_through() {
    let out = measure_and_log("noop", TARGET_FRAME_MS, || "done");
    assert_eq!(out, "done");
    // Over threshold only logs
    let slow = measure_and_log("slow", 0.0, || {
        std::thread::sleep(Duration::from_millis(1));
        1
    });
    assert_eq!(slow, 1);
}

#[test]
fn test_scope_timer_budget() {
    let frame = ScopeTimer::start("frame", TARGET_FRAME_MS);
    assert_eq!(frame.name(), "frame");
    assert!(!frame.over_budget());

    let tight = ScopeTimer::start("tight", 0.5);
    std::thread::sleep(Duration::from_millis(2));
    assert!(tight.elapsed_ms() >= 2.0);
    assert!(tight.over_budget());
}
