//! Geometry primitives and the device-to-logical coordinate mapping.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in either device/layout space or logical drawing space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(Self::new(self.x / len, self.y / len))
    }
}

/// Arithmetic mean of a set of points, or `None` when empty.
#[must_use]
pub fn average(points: impl IntoIterator<Item = Point>) -> Option<Point> {
    let mut count = 0_u32;
    let mut sum = Point::default();
    for p in points {
        sum.x += p.x;
        sum.y += p.y;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let n = f64::from(count);
    Some(Point::new(sum.x / n, sum.y / n))
}

/// Width/height pair in CSS or logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle. For bounding rects, `x`/`y` are the left/top edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Maps device/layout pixel coordinates into logical drawing-surface units.
///
/// `rect` is the surface's on-screen bounding rect and `logical` its logical
/// size. The mapping is `(client - origin) / (rect_size / logical_size)`, so
/// reported coordinates ignore any CSS scaling of the element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMap {
    pub rect: Rect,
    pub logical: Size,
}

impl CoordinateMap {
    #[must_use]
    pub fn new(rect: Rect, logical: Size) -> Self {
        Self { rect, logical }
    }

    #[must_use]
    pub fn to_logical(&self, client: Point) -> Point {
        Point::new(
            (client.x - self.rect.x) / axis_scale(self.rect.width, self.logical.width),
            (client.y - self.rect.y) / axis_scale(self.rect.height, self.logical.height),
        )
    }
}

/// Display pixels per logical unit along one axis.
///
/// A collapsed element (zero size on either side) maps one-to-one instead of
/// dividing by zero.
fn axis_scale(displayed: f64, logical: f64) -> f64 {
    if displayed > 0.0 && logical > 0.0 {
        displayed / logical
    } else {
        1.0
    }
}
