//! Device-pixel-ratio tracking.
//!
//! Platform ratio notifications are one-shot per threshold: a watcher is
//! armed for the ratio it was created with and fires once the display stops
//! matching it. The tracker therefore re-arms a fresh watcher for the new
//! value on every change.
//!
//! `force_update` re-reads the ratio synchronously without touching the
//! watcher. Sizing calls it right before computing buffer dimensions so a
//! change whose notification has not been delivered yet is still honored.

#[cfg(test)]
#[path = "pixel_ratio_test.rs"]
mod pixel_ratio_test;

use crate::consts::DEFAULT_PIXEL_RATIO;

/// Host capability: report the device pixel ratio and watch for it changing.
pub trait PixelRatioSource {
    /// The platform's current ratio, if it reports one.
    fn device_pixel_ratio(&self) -> Option<f64>;

    /// Arm a one-shot watcher that fires when the display no longer matches `ratio`.
    ///
    /// When it fires, the host calls [`crate::engine::Engine::handle_pixel_ratio_change`].
    fn watch_pixel_ratio(&mut self, ratio: f64);

    /// Disarm the current watcher, if any.
    fn unwatch_pixel_ratio(&mut self);
}

/// Media query matching exactly `ratio`, e.g. `(resolution: 2dppx)`.
#[must_use]
pub fn resolution_query(ratio: f64) -> String {
    format!("(resolution: {ratio}dppx)")
}

/// Clamp a platform-reported ratio to something usable.
#[must_use]
pub fn sanitize_ratio(reported: Option<f64>) -> f64 {
    match reported {
        Some(ratio) if ratio.is_finite() && ratio > 0.0 => ratio,
        _ => DEFAULT_PIXEL_RATIO,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PixelRatioTracker {
    ratio: f64,
    watching: Option<f64>,
}

impl PixelRatioTracker {
    /// Read the initial ratio and arm the first watcher.
    pub fn start<S: PixelRatioSource + ?Sized>(source: &mut S) -> Self {
        let mut tracker = Self { ratio: DEFAULT_PIXEL_RATIO, watching: None };
        tracker.rearm(source);
        tracker
    }

    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Ratio the live watcher is armed for.
    #[must_use]
    pub fn watching(&self) -> Option<f64> {
        self.watching
    }

    /// Handle a watcher notification: re-read, re-arm, and return the new ratio.
    pub fn handle_change<S: PixelRatioSource + ?Sized>(&mut self, source: &mut S) -> f64 {
        self.rearm(source);
        tracing::info!(ratio = self.ratio, "device pixel ratio changed");
        self.ratio
    }

    /// Synchronously re-read the ratio without re-arming the watcher.
    pub fn force_update<S: PixelRatioSource + ?Sized>(&mut self, source: &S) -> f64 {
        self.ratio = sanitize_ratio(source.device_pixel_ratio());
        self.ratio
    }

    fn rearm<S: PixelRatioSource + ?Sized>(&mut self, source: &mut S) {
        if self.watching.take().is_some() {
            source.unwatch_pixel_ratio();
        }
        self.ratio = sanitize_ratio(source.device_pixel_ratio());
        source.watch_pixel_ratio(self.ratio);
        self.watching = Some(self.ratio);
    }
}
