//! Gesture derivation from consecutive touch snapshots.
//!
//! Both functions compare the current touch positions with the previous
//! event's positions slot by slot. No identity tracking is attempted: when
//! the finger count changes there is no correspondence between old and new
//! slots, so movement is zero and no pinch is reported for that event.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::consts::PINCH_SCALE;
use crate::events::Pinch;
use crate::geom::{Point, average};

/// Average-position delta between two snapshots with the same finger count.
#[must_use]
pub fn average_movement(current: &[Point], last: &[Point]) -> Point {
    if current.len() != last.len() {
        return Point::default();
    }
    match (average(current.iter().copied()), average(last.iter().copied())) {
        (Some(now), Some(before)) => Point::new(now.x - before.x, now.y - before.y),
        _ => Point::default(),
    }
}

/// Two-finger pinch step, positive when the fingers move closer together.
///
/// Only reported when both snapshots hold exactly two touches.
#[must_use]
pub fn pinch_between(current: &[Point], last: &[Point]) -> Option<Pinch> {
    let (&[a, b], &[last_a, last_b]) = (current, last) else {
        return None;
    };
    let previous = last_a.distance_to(last_b);
    let now = a.distance_to(b);
    Some(Pinch { pinch: (previous - now) * PINCH_SCALE, center: a.midpoint(b) })
}
