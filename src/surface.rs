//! Logical (style) versus physical (buffer) surface sizing.
//!
//! DESIGN
//! ======
//! For each requested logical dimension the buffer gets `ceil(logical * dpr)`
//! physical pixels, the element is displayed at `buffer / dpr` CSS pixels, and
//! the recorded style size is `round(buffer / dpr)`. The ceil/round pair can
//! make the recorded style size differ from the request by one unit; that is
//! accepted, not corrected. After resizing, the drawing context is scaled by
//! `dpr` so every draw call is issued in logical units.
//!
//! Three sizing modes decide where requests come from:
//! - fullscreen: viewport size plus one pixel of padding on every host resize
//! - responsive: the parent's content box (client size minus padding)
//! - static: configured once, changed only through explicit `set_size` calls

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use serde::Serialize;

use crate::consts::FULLSCREEN_PADDING_PX;
use crate::error::CanvasError;
use crate::geom::{Rect, Size};
use crate::render::Renderer;

/// Host capability: the element backing the drawing surface.
pub trait SurfaceTarget {
    /// Set the backing store width in physical pixels.
    fn set_buffer_width(&mut self, pixels: u32);
    /// Set the backing store height in physical pixels.
    fn set_buffer_height(&mut self, pixels: u32);
    /// Set the displayed width in CSS pixels.
    fn set_style_width(&mut self, css_pixels: f64);
    /// Set the displayed height in CSS pixels.
    fn set_style_height(&mut self, css_pixels: f64);
    /// The element's on-screen bounding rect in layout pixels.
    fn bounding_rect(&self) -> Rect;
    /// Inner size of the host viewport in CSS pixels.
    fn viewport_size(&self) -> Size;
    /// Layout box of the parent container, if the surface has one.
    fn container_box(&self) -> Option<ContentBox>;
}

/// Where logical size requests come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingMode {
    Fullscreen,
    Responsive,
    Static(Size),
}

/// Padding of a container element in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// A container's client box and padding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContentBox {
    pub client_width: f64,
    pub client_height: f64,
    pub padding: Padding,
}

impl ContentBox {
    /// Client size minus padding.
    #[must_use]
    pub fn content_size(&self) -> Size {
        Size::new(
            self.client_width - self.padding.left - self.padding.right,
            self.client_height - self.padding.top - self.padding.bottom,
        )
    }
}

/// Current buffer and style dimensions of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    pub buffer_width: u32,
    pub buffer_height: u32,
    pub style_width: u32,
    pub style_height: u32,
    pub device_pixel_ratio: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self { buffer_width: 0, buffer_height: 0, style_width: 0, style_height: 0, device_pixel_ratio: 1.0 }
    }
}

/// Physical pixels needed to show `logical` units at `dpr`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn buffer_pixels(logical: f64, dpr: f64) -> u32 {
    let raw = (logical * dpr).ceil();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        raw as u32
    }
}

/// Whole CSS pixels a buffer of `buffer` physical pixels occupies at `dpr`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn style_pixels(buffer: u32, dpr: f64) -> u32 {
    (f64::from(buffer) / dpr).round().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSizer {
    mode: SizingMode,
    surface: Surface,
    requested: Size,
}

impl SurfaceSizer {
    #[must_use]
    pub fn new(mode: SizingMode) -> Self {
        Self { mode, surface: Surface::default(), requested: Size::default() }
    }

    #[must_use]
    pub fn mode(&self) -> SizingMode {
        self.mode
    }

    #[must_use]
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Last logical size requested for each dimension.
    #[must_use]
    pub fn requested(&self) -> Size {
        self.requested
    }

    /// Logical size as seen by drawing code: buffer divided by `dpr`.
    #[must_use]
    pub fn logical_size(&self, dpr: f64) -> Size {
        Size::new(f64::from(self.surface.buffer_width) / dpr, f64::from(self.surface.buffer_height) / dpr)
    }

    /// Resize each given dimension and rescale the context by `dpr`.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the host rejects the context transform.
    pub fn set_size<H>(
        &mut self,
        host: &mut H,
        dpr: f64,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Result<(), CanvasError>
    where
        H: SurfaceTarget + Renderer + ?Sized,
    {
        if let Some(width) = width {
            let buffer = buffer_pixels(width, dpr);
            host.set_buffer_width(buffer);
            host.set_style_width(f64::from(buffer) / dpr);
            self.surface.buffer_width = buffer;
            self.surface.style_width = style_pixels(buffer, dpr);
            self.requested.width = width;
        }
        if let Some(height) = height {
            let buffer = buffer_pixels(height, dpr);
            host.set_buffer_height(buffer);
            host.set_style_height(f64::from(buffer) / dpr);
            self.surface.buffer_height = buffer;
            self.surface.style_height = style_pixels(buffer, dpr);
            self.requested.height = height;
        }
        self.surface.device_pixel_ratio = dpr;
        tracing::debug!(
            buffer_width = self.surface.buffer_width,
            buffer_height = self.surface.buffer_height,
            style_width = self.surface.style_width,
            style_height = self.surface.style_height,
            dpr,
            "surface resized"
        );
        host.set_scale(dpr)
    }

    /// Fullscreen refit: viewport plus padding.
    ///
    /// # Errors
    ///
    /// Propagates `set_size` failures.
    pub fn fit_viewport<H>(&mut self, host: &mut H, dpr: f64, viewport: Size) -> Result<(), CanvasError>
    where
        H: SurfaceTarget + Renderer + ?Sized,
    {
        self.set_size(
            host,
            dpr,
            Some(viewport.width + FULLSCREEN_PADDING_PX),
            Some(viewport.height + FULLSCREEN_PADDING_PX),
        )
    }

    /// Responsive refit: the container's content box, floored to whole pixels.
    ///
    /// # Errors
    ///
    /// Propagates `set_size` failures.
    pub fn fit_container<H>(&mut self, host: &mut H, dpr: f64, container: ContentBox) -> Result<(), CanvasError>
    where
        H: SurfaceTarget + Renderer + ?Sized,
    {
        let content = container.content_size();
        self.set_size(host, dpr, Some(content.width.floor()), Some(content.height.floor()))
    }

    /// Re-derive the buffer from the last requested size, e.g. after a DPR change.
    ///
    /// # Errors
    ///
    /// Propagates `set_size` failures.
    pub fn refit<H>(&mut self, host: &mut H, dpr: f64) -> Result<(), CanvasError>
    where
        H: SurfaceTarget + Renderer + ?Sized,
    {
        let requested = self.requested;
        self.set_size(host, dpr, Some(requested.width), Some(requested.height))
    }
}
