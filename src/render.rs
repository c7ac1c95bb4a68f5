//! The drawing-surface collaborator and the paint/style values it consumes.
//!
//! [`Renderer`] is the only seam between this crate and pixels. Every
//! coordinate passed through it is in logical units: the surface sizer scales
//! the context by the device pixel ratio, so implementations forward calls
//! verbatim. Calls that can fail on a real context (transforms, arcs, text,
//! images, pixel transfer) return `Result`; pure state setters do not.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::{Deserialize, Serialize};

use crate::consts::TRANSPARENT;
use crate::error::CanvasError;
use crate::geom::{Point, Rect, Size};
use crate::pixels::PixelBuffer;

/// Immediate-mode 2D drawing context.
pub trait Renderer {
    /// Reset the transform to a uniform scale of `scale`.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the context rejects the transform.
    fn set_scale(&mut self, scale: f64) -> Result<(), CanvasError>;

    fn save(&mut self);
    fn restore(&mut self);

    /// # Errors
    ///
    /// Returns `Render` if the context rejects the transform.
    fn rotate(&mut self, angle: f64) -> Result<(), CanvasError>;

    /// # Errors
    ///
    /// Returns `Render` if the context rejects the transform.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), CanvasError>;

    fn clear_rect(&mut self, rect: Rect);
    fn fill_rect(&mut self, rect: Rect);

    // ── Paths ───────────────────────────────────────────────────

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, to: Point);
    fn line_to(&mut self, to: Point);
    fn rect(&mut self, rect: Rect);
    fn quadratic_curve_to(&mut self, control: Point, to: Point);
    fn bezier_curve_to(&mut self, control1: Point, control2: Point, to: Point);

    /// # Errors
    ///
    /// Returns `Render` for a negative radius.
    fn arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        counterclockwise: bool,
    ) -> Result<(), CanvasError>;

    /// # Errors
    ///
    /// Returns `Render` for a negative radius.
    fn ellipse(&mut self, center: Point, radii: Size, rotation: f64, start: f64, end: f64) -> Result<(), CanvasError>;

    fn fill(&mut self);
    fn stroke(&mut self);
    fn clip(&mut self);

    // ── Style ───────────────────────────────────────────────────

    fn set_fill(&mut self, paint: &Paint);
    fn set_stroke(&mut self, paint: &Paint);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    /// Full CSS font shorthand, e.g. `"bold 12px Arial"`.
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn set_shadow_offset(&mut self, offset: Point);
    fn set_shadow_blur(&mut self, blur: f64);
    fn set_shadow_color(&mut self, color: &str);

    // ── Text, images, pixels ────────────────────────────────────

    /// # Errors
    ///
    /// Returns `Render` if the context fails to draw the text.
    fn fill_text(&mut self, text: &str, at: Point) -> Result<(), CanvasError>;

    /// # Errors
    ///
    /// Returns `Render` if the context fails to draw the text.
    fn stroke_text(&mut self, text: &str, at: Point) -> Result<(), CanvasError>;

    /// Draw an image by source URL. Hosts may defer the draw until the image loads.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the context fails to draw a loaded image.
    fn draw_image(&mut self, image: &ImageDraw) -> Result<(), CanvasError>;

    /// Capture the top-left `width` x `height` physical pixels.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the backing store cannot be read.
    fn read_pixels(&mut self, width: u32, height: u32) -> Result<PixelBuffer, CanvasError>;

    /// Write `pixels` back with its top-left corner at physical pixel `at`.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the backing store cannot be written.
    fn write_pixels(&mut self, pixels: &PixelBuffer, at: Point) -> Result<(), CanvasError>;
}

/// Whether a color should be painted at all.
///
/// Missing, empty and `"transparent"` colors mean "skip this paint", which is
/// distinct from "use whatever style is current".
#[must_use]
pub fn should_render(color: Option<&str>) -> bool {
    matches!(color, Some(c) if !c.is_empty() && c != TRANSPARENT)
}

/// Two-stop linear gradient between `from` and `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearGradient {
    pub from: Point,
    pub to: Point,
    pub start_color: String,
    pub end_color: String,
}

/// A fill or stroke style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Paint {
    Color(String),
    LinearGradient(LinearGradient),
}

impl Paint {
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self::Color(color.into())
    }
}

impl From<&str> for Paint {
    fn from(color: &str) -> Self {
        Self::Color(color.to_owned())
    }
}

/// Shadow settings applied to subsequent draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset: Point,
    pub blur: f64,
    pub color: String,
}

impl Shadow {
    /// The "no shadow" state: zero offset and blur, fully transparent black.
    #[must_use]
    pub fn none() -> Self {
        Self { offset: Point::default(), blur: 0.0, color: "rgba(0, 0, 0, 0)".to_owned() }
    }

    /// Parse a CSS-like `"Xpx Ypx Bpx color"` shadow.
    ///
    /// Everything after the blur is the color, so `rgba(...)` with spaces works.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a length is missing or not a number.
    pub fn parse_css(css: &str) -> Result<Self, CanvasError> {
        let mut parts = css.split_whitespace();
        let mut length = |index: usize| -> Result<f64, CanvasError> {
            let raw = parts
                .next()
                .ok_or_else(|| {
                    CanvasError::invalid_argument("applyShadow", index, format!("missing length in '{css}'"))
                })?;
            raw.trim_end_matches("px")
                .parse::<f64>()
                .map_err(|_| CanvasError::invalid_argument("applyShadow", index, format!("'{raw}' is not a length")))
        };
        let offset = Point::new(length(0)?, length(1)?);
        let blur = length(2)?;
        let color = parts.collect::<Vec<_>>().join(" ");
        Ok(Self { offset, blur, color })
    }

    /// Push every field onto `renderer`.
    pub fn apply<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.set_shadow_offset(self.offset);
        renderer.set_shadow_blur(self.blur);
        renderer.set_shadow_color(&self.color);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "butt" => Some(Self::Butt),
            "round" => Some(Self::Round),
            "square" => Some(Self::Square),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Start,
    End,
}

impl TextAlign {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Start => "start",
            Self::End => "end",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "center" => Some(Self::Center),
            "start" => Some(Self::Start),
            "end" => Some(Self::End),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Hanging,
    Middle,
    #[default]
    Alphabetic,
    Ideographic,
    Bottom,
}

impl TextBaseline {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Hanging => "hanging",
            Self::Middle => "middle",
            Self::Alphabetic => "alphabetic",
            Self::Ideographic => "ideographic",
            Self::Bottom => "bottom",
        }
    }

    /// Parse a baseline name; `"center"` is accepted as `middle`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "top" => Some(Self::Top),
            "hanging" => Some(Self::Hanging),
            "middle" | "center" => Some(Self::Middle),
            "alphabetic" => Some(Self::Alphabetic),
            "ideographic" => Some(Self::Ideographic),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// One image blit.
///
/// `size` of `None` draws at the image's natural size. `clip` selects a source
/// sub-rectangle in image pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDraw {
    pub source: String,
    pub dest: Point,
    pub size: Option<Size>,
    pub clip: Option<Rect>,
}
