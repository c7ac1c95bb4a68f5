//! Host platform capabilities.
//!
//! An [`crate::engine::Engine`] is generic over a single host value that
//! draws, owns the surface element, reports the pixel ratio and exposes the
//! page-level controls below. Any type implementing all four capability
//! traits is a [`Host`].

use crate::error::CanvasError;
use crate::pixel_ratio::PixelRatioSource;
use crate::render::Renderer;
use crate::surface::SurfaceTarget;

/// Page-level controls over the surface element.
pub trait HostControls {
    /// Set the CSS cursor shown over the surface.
    fn set_cursor(&mut self, cursor: &str);

    /// # Errors
    ///
    /// Returns `Render` if the platform refuses fullscreen.
    fn request_fullscreen(&mut self) -> Result<(), CanvasError>;

    /// # Errors
    ///
    /// Returns `Render` if the platform refuses to leave fullscreen.
    fn exit_fullscreen(&mut self) -> Result<(), CanvasError>;

    fn lock_pointer(&mut self);
    fn unlock_pointer(&mut self);
}

/// Everything the engine needs from its platform.
pub trait Host: Renderer + SurfaceTarget + PixelRatioSource + HostControls {}

impl<T> Host for T where T: Renderer + SurfaceTarget + PixelRatioSource + HostControls {}
