//! Convenience layer over an interactive 2D drawing surface.
//!
//! The crate keeps a canvas sized correctly for the device pixel ratio,
//! normalizes raw mouse, touch, keyboard and wheel input into queryable state,
//! derives pan and pinch gestures, and dispatches everything through a named
//! event bus. Drawing is immediate-mode and goes through the [`render::Renderer`]
//! collaborator, so the engine runs the same against a browser context or a
//! recording fake.
//!
//! On `wasm32` the [`web`] module supplies a `web-sys` host and DOM listener
//! wiring. Everywhere else a host is any type implementing [`host::Host`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::Engine`]: owns all state, handles input, exposes the public operations |
//! | [`event_bus`] | Named events, FIFO listeners, snapshot dispatch |
//! | [`events`] | Event names, raw host input types, [`events::CanvasEvent`] payloads |
//! | [`pixel_ratio`] | Device pixel ratio watcher with re-arm on change |
//! | [`surface`] | Logical vs buffer sizing under a pixel ratio |
//! | [`input`] | Mouse, touch and pan state transitions |
//! | [`keys`] | Canonical key identity and multi-convention key queries |
//! | [`gesture`] | Average-movement and pinch math |
//! | [`render`] | The `Renderer` trait and paint/style values |
//! | [`draw`] | Shape, text, image and pixel-perfect helpers over a `Renderer` |
//! | [`pixels`] | Captured RGBA pixel buffer |
//! | [`color`] | CSS color-string generators |
//! | [`binding`] | Host-controlled registry, public binding, legacy hooks |
//! | [`config`] | Construction options and their resolved form |
//! | [`host`] | Host controls and the umbrella `Host` trait |
//! | [`geom`] | Points, sizes, rects, device-to-logical mapping |
//! | [`error`] | Error taxonomy |
//! | [`consts`] | Shared constants (pinch scale, default size, paddings) |

pub mod binding;
pub mod color;
pub mod config;
pub mod consts;
pub mod draw;
pub mod engine;
pub mod error;
pub mod event_bus;
pub mod events;
pub mod geom;
pub mod gesture;
pub mod host;
pub mod input;
pub mod keys;
pub mod pixel_ratio;
pub mod pixels;
pub mod render;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod test_host;

pub use binding::{BindReport, Binding, Registry, bind_public};
pub use config::{CanvasConfig, ResolvedConfig};
pub use engine::{Dispatch, Engine, SharedEngine, dispatch_shared};
pub use error::{CanvasError, ListenerError};
pub use event_bus::{EventBus, ListenerId};
pub use events::{CanvasEvent, EventOutcome};
pub use geom::{Point, Rect, Size};
pub use host::Host;
