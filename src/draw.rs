//! Immediate-mode drawing helpers built on [`Renderer`].
//!
//! Each helper issues a fixed sequence of renderer calls. Fill and stroke
//! colors go through [`should_render`], so `None`, `""` and `"transparent"`
//! skip that half of the paint. A `line_width` of `None` or zero leaves the
//! current width alone.

#[cfg(test)]
#[path = "draw_test.rs"]
mod draw_test;

use std::f64::consts::{PI, TAU};

use crate::consts::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_WEIGHT, VECTOR_HEAD_SIZE, VECTOR_HEAD_SPREAD, VECTOR_LINE_WIDTH,
    ZERO_VECTOR_RADIUS,
};
use crate::error::CanvasError;
use crate::geom::{Point, Rect, Size};
use crate::render::{ImageDraw, LinearGradient, Paint, Renderer, should_render};

/// Fill/stroke colors and stroke width for one shape.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShapeStyle<'a> {
    pub fill: Option<&'a str>,
    pub stroke: Option<&'a str>,
    pub line_width: Option<f64>,
}

impl<'a> ShapeStyle<'a> {
    #[must_use]
    pub fn filled(color: &'a str) -> Self {
        Self { fill: Some(color), ..Self::default() }
    }

    #[must_use]
    pub fn stroked(color: &'a str, line_width: f64) -> Self {
        Self { stroke: Some(color), line_width: Some(line_width), ..Self::default() }
    }

    #[must_use]
    pub fn with_stroke(mut self, color: &'a str) -> Self {
        self.stroke = Some(color);
        self
    }
}

/// Font family and weight used by [`text`]; the size is per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub family: String,
    pub weight: String,
}

impl Default for Font {
    fn default() -> Self {
        Self { family: DEFAULT_FONT_FAMILY.to_owned(), weight: DEFAULT_FONT_WEIGHT.to_owned() }
    }
}

impl Font {
    /// CSS font shorthand at `size` pixels, e.g. `"bold 16px Arial"`.
    #[must_use]
    pub fn css(&self, size: f64) -> String {
        format!("{} {size}px {}", self.weight, self.family)
    }
}

/// Per-corner radii, clockwise from top-left.
pub type CornerRadii = [f64; 4];

fn apply_line_width<R: Renderer + ?Sized>(r: &mut R, line_width: Option<f64>) {
    if let Some(width) = line_width.filter(|w| *w != 0.0) {
        r.set_line_width(width);
    }
}

/// Fill then stroke the current path.
fn paint_path<R: Renderer + ?Sized>(r: &mut R, style: ShapeStyle<'_>) {
    apply_line_width(r, style.line_width);
    if let Some(fill) = style.fill.filter(|c| should_render(Some(*c))) {
        r.set_fill(&Paint::from(fill));
        r.fill();
    }
    if let Some(stroke) = style.stroke.filter(|c| should_render(Some(*c))) {
        r.set_stroke(&Paint::from(stroke));
        r.stroke();
    }
}

// =============================================================
// Whole-surface
// =============================================================

pub fn clear_screen<R: Renderer + ?Sized>(r: &mut R, size: Size) {
    r.clear_rect(Rect::new(0.0, 0.0, size.width, size.height));
}

pub fn background<R: Renderer + ?Sized>(r: &mut R, paint: &Paint, size: Size) {
    r.set_fill(paint);
    r.fill_rect(Rect::new(0.0, 0.0, size.width, size.height));
}

// =============================================================
// Shapes
// =============================================================

/// # Errors
///
/// Returns `Render` if the host rejects the arc (e.g. negative radius).
pub fn circle<R: Renderer + ?Sized>(
    r: &mut R,
    center: Point,
    radius: f64,
    style: ShapeStyle<'_>,
) -> Result<(), CanvasError> {
    r.begin_path();
    r.arc(center, radius, 0.0, TAU, false)?;
    paint_path(r, style);
    Ok(())
}

/// Stroked circle outline. The stroke is applied even for `"transparent"`.
///
/// # Errors
///
/// Returns `Render` if the host rejects the arc.
pub fn ring<R: Renderer + ?Sized>(
    r: &mut R,
    center: Point,
    radius: f64,
    color: &str,
    line_width: Option<f64>,
) -> Result<(), CanvasError> {
    r.begin_path();
    r.arc(center, radius, 0.0, TAU, false)?;
    r.set_stroke(&Paint::from(color));
    apply_line_width(r, line_width);
    r.stroke();
    Ok(())
}

/// # Errors
///
/// Returns `Render` if the host rejects the ellipse.
pub fn ellipse<R: Renderer + ?Sized>(
    r: &mut R,
    center: Point,
    radii: Size,
    rotation: f64,
    style: ShapeStyle<'_>,
) -> Result<(), CanvasError> {
    r.begin_path();
    r.ellipse(center, radii, rotation, 0.0, TAU)?;
    paint_path(r, style);
    Ok(())
}

/// Stroked rectangles go through a path; fill-only ones use `fill_rect`.
pub fn rectangle<R: Renderer + ?Sized>(r: &mut R, rect: Rect, style: ShapeStyle<'_>) {
    let fill = style.fill.filter(|c| should_render(Some(*c)));
    if let Some(fill) = fill {
        r.set_fill(&Paint::from(fill));
    }
    apply_line_width(r, style.line_width);
    if let Some(stroke) = style.stroke.filter(|c| should_render(Some(*c))) {
        r.begin_path();
        r.set_stroke(&Paint::from(stroke));
        r.rect(rect);
        if fill.is_some() {
            r.fill();
        }
        r.stroke();
    } else if fill.is_some() {
        r.fill_rect(rect);
    }
}

/// Rectangle with per-corner radii. Strokes before filling.
///
/// # Errors
///
/// Returns `Render` if the host rejects a corner arc.
pub fn rounded_rectangle<R: Renderer + ?Sized>(
    r: &mut R,
    rect: Rect,
    radii: CornerRadii,
    style: ShapeStyle<'_>,
) -> Result<(), CanvasError> {
    let Rect { x, y, width: w, height: h } = rect;
    let [tl, tr, br, bl] = radii;
    r.begin_path();
    r.arc(Point::new(x + tl, y + tl), tl, PI, PI * 1.5, false)?;
    r.line_to(Point::new(x + w - tr, y));
    r.arc(Point::new(x + w - tr, y + tr), tr, PI * 1.5, TAU, false)?;
    r.line_to(Point::new(x + w, y + h - br));
    r.arc(Point::new(x + w - br, y + h - br), br, 0.0, PI * 0.5, false)?;
    r.line_to(Point::new(x + bl, y + h));
    r.arc(Point::new(x + bl, y + h - bl), bl, PI * 0.5, PI, false)?;
    r.close_path();
    if let Some(stroke) = style.stroke.filter(|c| should_render(Some(*c))) {
        apply_line_width(r, style.line_width);
        r.set_stroke(&Paint::from(stroke));
        r.stroke();
    }
    if let Some(fill) = style.fill.filter(|c| should_render(Some(*c))) {
        r.set_fill(&Paint::from(fill));
        r.fill();
    }
    Ok(())
}

pub fn triangle<R: Renderer + ?Sized>(r: &mut R, corners: [Point; 3], style: ShapeStyle<'_>) {
    let [a, b, c] = corners;
    r.begin_path();
    r.move_to(a);
    r.line_to(b);
    r.line_to(c);
    r.close_path();
    paint_path(r, style);
}

/// Stroked segment. An empty `color` keeps the current stroke style.
pub fn line<R: Renderer + ?Sized>(r: &mut R, from: Point, to: Point, color: Option<&str>, weight: Option<f64>) {
    r.begin_path();
    r.move_to(from);
    r.line_to(to);
    if let Some(color) = color.filter(|c| !c.is_empty()) {
        r.set_stroke(&Paint::from(color));
    }
    apply_line_width(r, weight);
    r.stroke();
}

/// Path through `points`, each shifted by `offset`. An empty list draws nothing.
pub fn polygon<R: Renderer + ?Sized>(r: &mut R, points: &[Point], offset: Point, closed: bool, style: ShapeStyle<'_>) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    r.begin_path();
    r.move_to(first.offset(offset.x, offset.y));
    for p in rest {
        r.line_to(p.offset(offset.x, offset.y));
    }
    if closed {
        r.close_path();
    }
    if let Some(fill) = style.fill.filter(|c| should_render(Some(*c))) {
        r.set_fill(&Paint::from(fill));
        r.fill();
    }
    if let Some(stroke) = style.stroke.filter(|c| should_render(Some(*c))) {
        apply_line_width(r, style.line_width);
        r.set_stroke(&Paint::from(stroke));
        r.stroke();
    }
}

// =============================================================
// Text
// =============================================================

/// Draw `content` at `size` pixels. Sizes below one pixel draw nothing.
///
/// # Errors
///
/// Returns `Render` if the host fails to draw the text.
pub fn text<R: Renderer + ?Sized>(
    r: &mut R,
    font: &Font,
    content: &str,
    at: Point,
    size: f64,
    style: ShapeStyle<'_>,
) -> Result<(), CanvasError> {
    if size < 1.0 {
        return Ok(());
    }
    r.set_font(&font.css(size));
    if let Some(fill) = style.fill.filter(|c| should_render(Some(*c))) {
        r.set_fill(&Paint::from(fill));
        r.fill_text(content, at)?;
    }
    if let Some(stroke) = style.stroke.filter(|c| should_render(Some(*c))) {
        apply_line_width(r, style.line_width);
        r.set_stroke(&Paint::from(stroke));
        r.stroke_text(content, at)?;
    }
    Ok(())
}

// =============================================================
// Vectors
// =============================================================

/// Arrow from `origin` along `vector * scale`. A zero vector draws a dot.
///
/// # Errors
///
/// Returns `Render` if the host rejects the dot's arc.
pub fn draw_vector<R: Renderer + ?Sized>(
    r: &mut R,
    origin: Point,
    vector: Point,
    scale: f64,
    color: &str,
) -> Result<(), CanvasError> {
    let Some(tangent) = vector.normalized() else {
        return circle(r, origin, ZERO_VECTOR_RADIUS, ShapeStyle::filled(color));
    };
    let normal = Point::new(-tangent.y, tangent.x);
    let end = origin.offset(vector.x * scale, vector.y * scale);
    let base = end.offset(-tangent.x * VECTOR_HEAD_SIZE, -tangent.y * VECTOR_HEAD_SIZE);
    let spread = VECTOR_HEAD_SIZE * VECTOR_HEAD_SPREAD;

    line(r, origin, base, Some(color), Some(VECTOR_LINE_WIDTH));
    triangle(
        r,
        [end, base.offset(normal.x * spread, normal.y * spread), base.offset(-normal.x * spread, -normal.y * spread)],
        ShapeStyle::filled(color),
    );
    Ok(())
}

// =============================================================
// Images and gradients
// =============================================================

/// # Errors
///
/// Returns `Render` if the host fails to draw a loaded image.
pub fn picture<R: Renderer + ?Sized>(
    r: &mut R,
    source: &str,
    at: Point,
    size: Option<Size>,
) -> Result<(), CanvasError> {
    r.draw_image(&ImageDraw { source: source.to_owned(), dest: at, size, clip: None })
}

/// Draw the `clip` region of the source image.
///
/// # Errors
///
/// Returns `Render` if the host fails to draw a loaded image.
pub fn clipped_picture<R: Renderer + ?Sized>(
    r: &mut R,
    source: &str,
    clip: Rect,
    at: Point,
    size: Option<Size>,
) -> Result<(), CanvasError> {
    r.draw_image(&ImageDraw { source: source.to_owned(), dest: at, size, clip: Some(clip) })
}

#[must_use]
pub fn gradient(start_color: &str, end_color: &str, from: Point, to: Point) -> Paint {
    Paint::LinearGradient(LinearGradient {
        from,
        to,
        start_color: start_color.to_owned(),
        end_color: end_color.to_owned(),
    })
}

// =============================================================
// Pixel-perfect variants
// =============================================================

#[must_use]
pub fn floor_nearest(x: f64, nearest: f64) -> f64 {
    (x / nearest).floor() * nearest
}

/// Snap `x` to the physical pixel grid, then center a `stroke`-wide line on it.
#[must_use]
pub fn make_pixel_perfect(x: f64, stroke: f64, dpr: f64) -> f64 {
    let physical = 1.0 / dpr;
    floor_nearest(x, physical) + physical / 2.0 * stroke
}

/// Line whose `weight` is in physical pixels. A horizontal line is only
/// offset in y, a vertical one only in x.
#[allow(clippy::float_cmp)]
pub fn pixel_perfect_line<R: Renderer + ?Sized>(
    r: &mut R,
    from: Point,
    to: Point,
    dpr: f64,
    color: Option<&str>,
    weight: f64,
) {
    let spans_x = if from.x == to.x { 0.0 } else { 1.0 };
    let spans_y = if from.y == to.y { 0.0 } else { 1.0 };
    let snap = |p: Point| {
        Point::new(make_pixel_perfect(p.x, weight * spans_y, dpr), make_pixel_perfect(p.y, weight * spans_x, dpr))
    };
    let (from, to) = (snap(from), snap(to));
    line(r, from, to, color, Some(weight / dpr));
}

/// Rectangle snapped to the physical pixel grid. `line_width` is in physical pixels.
pub fn pixel_perfect_rectangle<R: Renderer + ?Sized>(r: &mut R, rect: Rect, dpr: f64, style: ShapeStyle<'_>) {
    let stroke = style.line_width.unwrap_or(0.0);
    let x1 = make_pixel_perfect(rect.x, stroke, dpr);
    let y1 = make_pixel_perfect(rect.y, stroke, dpr);
    let x2 = make_pixel_perfect(rect.x + rect.width, stroke, dpr);
    let y2 = make_pixel_perfect(rect.y + rect.height, stroke, dpr);
    rectangle(r, Rect::new(x1, y1, x2 - x1, y2 - y1), ShapeStyle { line_width: Some(stroke / dpr), ..style });
}
