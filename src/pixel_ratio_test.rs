#![allow(clippy::float_cmp)]

use super::*;

#[derive(Default)]
struct FakeSource {
    ratio: Option<f64>,
    armed: Vec<f64>,
    disarmed: usize,
}

impl PixelRatioSource for FakeSource {
    fn device_pixel_ratio(&self) -> Option<f64> {
        self.ratio
    }

    fn watch_pixel_ratio(&mut self, ratio: f64) {
        self.armed.push(ratio);
    }

    fn unwatch_pixel_ratio(&mut self) {
        self.disarmed += 1;
    }
}

fn source(ratio: Option<f64>) -> FakeSource {
    FakeSource { ratio, ..Default::default() }
}

// =============================================================
// sanitize_ratio / resolution_query
// =============================================================

#[test]
fn sanitize_defaults_to_one_when_missing() {
    assert_eq!(sanitize_ratio(None), 1.0);
}

#[test]
fn sanitize_rejects_zero_negative_and_nan() {
    assert_eq!(sanitize_ratio(Some(0.0)), 1.0);
    assert_eq!(sanitize_ratio(Some(-2.0)), 1.0);
    assert_eq!(sanitize_ratio(Some(f64::NAN)), 1.0);
    assert_eq!(sanitize_ratio(Some(f64::INFINITY)), 1.0);
}

#[test]
fn sanitize_keeps_fractional_ratios() {
    assert_eq!(sanitize_ratio(Some(1.25)), 1.25);
}

#[test]
fn resolution_query_formats_ratio() {
    assert_eq!(resolution_query(2.0), "(resolution: 2dppx)");
    assert_eq!(resolution_query(1.5), "(resolution: 1.5dppx)");
}

// =============================================================
// Tracker lifecycle
// =============================================================

#[test]
fn start_reads_ratio_and_arms_watcher() {
    let mut src = source(Some(2.0));
    let tracker = PixelRatioTracker::start(&mut src);
    assert_eq!(tracker.ratio(), 2.0);
    assert_eq!(tracker.watching(), Some(2.0));
    assert_eq!(src.armed, vec![2.0]);
    assert_eq!(src.disarmed, 0);
}

#[test]
fn start_without_platform_ratio_uses_one() {
    let mut src = source(None);
    let tracker = PixelRatioTracker::start(&mut src);
    assert_eq!(tracker.ratio(), 1.0);
    assert_eq!(src.armed, vec![1.0]);
}

#[test]
fn handle_change_rearms_for_new_ratio() {
    let mut src = source(Some(1.0));
    let mut tracker = PixelRatioTracker::start(&mut src);

    src.ratio = Some(2.0);
    assert_eq!(tracker.handle_change(&mut src), 2.0);
    assert_eq!(tracker.watching(), Some(2.0));
    assert_eq!(src.armed, vec![1.0, 2.0]);
    assert_eq!(src.disarmed, 1);

    src.ratio = Some(1.5);
    assert_eq!(tracker.handle_change(&mut src), 1.5);
    assert_eq!(src.armed, vec![1.0, 2.0, 1.5]);
    assert_eq!(src.disarmed, 2);
}

#[test]
fn force_update_reads_without_rearming() {
    let mut src = source(Some(1.0));
    let mut tracker = PixelRatioTracker::start(&mut src);

    src.ratio = Some(3.0);
    assert_eq!(tracker.force_update(&src), 3.0);
    assert_eq!(tracker.ratio(), 3.0);
    assert_eq!(tracker.watching(), Some(1.0));
    assert_eq!(src.armed, vec![1.0]);
}
