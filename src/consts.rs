//! Shared numeric and string constants for the canvas crate.

// ── Sizing ──────────────────────────────────────────────────────

/// Extra CSS pixels added to the viewport in fullscreen mode.
///
/// Fills the sliver left around the surface when the page is zoomed in a lot.
pub const FULLSCREEN_PADDING_PX: f64 = 1.0;

/// Static-mode width used when only the height is configured.
pub const DEFAULT_WIDTH: f64 = 300.0;

/// Static-mode height used when only the width is configured.
pub const DEFAULT_HEIGHT: f64 = 150.0;

/// Ratio reported when the platform has none (or reports garbage).
pub const DEFAULT_PIXEL_RATIO: f64 = 1.0;

// ── Gestures ────────────────────────────────────────────────────

/// Multiplier applied to the change in finger distance for pinch events.
pub const PINCH_SCALE: f64 = 10.0;

// ── Rendering ───────────────────────────────────────────────────

/// Color sentinel meaning "skip this paint operation".
pub const TRANSPARENT: &str = "transparent";

/// Font family used until `set_font` is called.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Font weight used until `set_font_weight` is called.
pub const DEFAULT_FONT_WEIGHT: &str = "normal";

/// Length of the arrowhead drawn by `draw_vector`, in logical units.
pub const VECTOR_HEAD_SIZE: f64 = 10.0;

/// Half-width of the arrowhead relative to its length.
pub const VECTOR_HEAD_SPREAD: f64 = 0.4;

/// Radius of the dot drawn for a zero-length vector.
pub const ZERO_VECTOR_RADIUS: f64 = 4.0;

/// Line width of the vector shaft.
pub const VECTOR_LINE_WIDTH: f64 = 2.0;
