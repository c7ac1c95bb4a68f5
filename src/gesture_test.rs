#![allow(clippy::float_cmp)]

use proptest::prelude::*;

use super::*;

fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
    raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

// =============================================================
// average_movement
// =============================================================

#[test]
fn single_finger_movement_is_plain_delta() {
    let moved = average_movement(&pts(&[(15.0, 20.0)]), &pts(&[(10.0, 10.0)]));
    assert_eq!(moved, Point::new(5.0, 10.0));
}

#[test]
fn two_finger_movement_is_average_delta() {
    let moved = average_movement(&pts(&[(12.0, 0.0), (22.0, 4.0)]), &pts(&[(10.0, 0.0), (20.0, 0.0)]));
    assert_eq!(moved, Point::new(2.0, 2.0));
}

#[test]
fn finger_count_change_resets_movement() {
    let moved = average_movement(&pts(&[(50.0, 50.0), (90.0, 90.0)]), &pts(&[(10.0, 10.0)]));
    assert_eq!(moved, Point::default());
}

#[test]
fn empty_snapshots_have_no_movement() {
    assert_eq!(average_movement(&[], &[]), Point::default());
}

// =============================================================
// pinch_between
// =============================================================

#[test]
fn pinch_closer_is_positive() {
    // Distance 100 -> 80.
    let pinch = pinch_between(&pts(&[(0.0, 0.0), (80.0, 0.0)]), &pts(&[(0.0, 0.0), (100.0, 0.0)])).unwrap();
    assert_eq!(pinch.pinch, 200.0);
    assert_eq!(pinch.center, Point::new(40.0, 0.0));
}

#[test]
fn pinch_apart_is_negative() {
    let pinch = pinch_between(&pts(&[(0.0, 0.0), (0.0, 60.0)]), &pts(&[(0.0, 0.0), (0.0, 50.0)])).unwrap();
    assert_eq!(pinch.pinch, -100.0);
}

#[test]
fn no_pinch_on_transition_into_two_fingers() {
    assert!(pinch_between(&pts(&[(0.0, 0.0), (10.0, 0.0)]), &pts(&[(0.0, 0.0)])).is_none());
    assert!(pinch_between(&pts(&[(0.0, 0.0)]), &pts(&[(0.0, 0.0), (10.0, 0.0)])).is_none());
}

proptest! {
    #[test]
    fn movement_is_zero_whenever_counts_differ(
        current in prop::collection::vec((-500.0_f64..500.0, -500.0_f64..500.0), 0..5),
        last in prop::collection::vec((-500.0_f64..500.0, -500.0_f64..500.0), 0..5),
    ) {
        prop_assume!(current.len() != last.len());
        prop_assert_eq!(average_movement(&pts(&current), &pts(&last)), Point::default());
    }

    #[test]
    fn pinch_only_for_two_and_two(
        current in prop::collection::vec((-500.0_f64..500.0, -500.0_f64..500.0), 0..5),
        last in prop::collection::vec((-500.0_f64..500.0, -500.0_f64..500.0), 0..5),
    ) {
        let fired = pinch_between(&pts(&current), &pts(&last)).is_some();
        prop_assert_eq!(fired, current.len() == 2 && last.len() == 2);
    }
}
