//! Raw host input types and the payloads dispatched on the event bus.
//!
//! Raw inputs (`KeyInput`, `PointerInput`, `WheelInput`, `RawTouch`) carry
//! coordinates in device/layout space exactly as the host reported them.
//! `CanvasEvent` is what listeners receive; its `name()` is the bus key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geom::{Point, Size};

pub const KEY_DOWN: &str = "keydown";
pub const KEY_UP: &str = "keyup";
pub const MOUSE_MOVE: &str = "mousemove";
pub const MOUSE_DOWN: &str = "mousedown";
pub const MOUSE_UP: &str = "mouseup";
pub const CONTEXT_MENU: &str = "contextmenu";
pub const SCROLL: &str = "scroll";
pub const TOUCH_START: &str = "touchstart";
pub const TOUCH_MOVE: &str = "touchmove";
pub const TOUCH_END: &str = "touchend";
pub const PAN: &str = "pan";
pub const PINCH: &str = "pinch";
pub const RESIZE: &str = "resize";
pub const DPR_CHANGE: &str = "dprChange";

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A key press or release as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInput {
    /// Symbolic key name, e.g. `"a"`, `"Enter"`, `"Shift"`.
    pub key: String,
    /// Physical key code, e.g. `"KeyA"`, `"ShiftLeft"`. May be empty.
    pub code: String,
    /// Legacy numeric key code, e.g. `65`.
    pub key_code: u32,
    pub modifiers: Modifiers,
}

/// A mouse event in device/layout space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerInput {
    pub client: Point,
    /// Raw device movement since the previous event.
    pub movement: Point,
    /// Button index: 0 left, 1 middle, 2 right; higher values are ignored.
    pub button: i16,
    pub modifiers: Modifiers,
}

/// Wheel deltas as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_z: f64,
}

/// One active touch point in page space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTouch {
    pub page: Point,
    pub id: i64,
    pub force: f64,
    pub radius_x: f64,
    pub radius_y: f64,
    pub rotation_angle: f64,
}

/// The host's full set of currently active touches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchInput {
    pub touches: Vec<RawTouch>,
}

impl TouchInput {
    #[must_use]
    pub fn new(touches: Vec<RawTouch>) -> Self {
        Self { touches }
    }
}

/// Pan gesture delta in logical units (mouse: raw device movement).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanDelta {
    pub x: f64,
    pub y: f64,
}

/// Two-finger pinch step.
///
/// `pinch` is positive when the fingers move closer together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pinch {
    pub pinch: f64,
    pub center: Point,
}

/// Payload delivered to bus listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CanvasEvent {
    KeyDown(KeyInput),
    KeyUp(KeyInput),
    MouseMove(PointerInput),
    MouseDown(PointerInput),
    MouseUp(PointerInput),
    ContextMenu(PointerInput),
    Scroll(WheelInput),
    TouchStart(TouchInput),
    TouchMove(TouchInput),
    TouchEnd(TouchInput),
    Pan(PanDelta),
    Pinch(Pinch),
    /// New logical surface size.
    Resize(Size),
    DprChange { ratio: f64 },
    /// Application-defined event fired through `Engine::emit`.
    Custom { name: String, payload: Value },
}

impl CanvasEvent {
    /// The bus key this event is dispatched under.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::KeyDown(_) => KEY_DOWN,
            Self::KeyUp(_) => KEY_UP,
            Self::MouseMove(_) => MOUSE_MOVE,
            Self::MouseDown(_) => MOUSE_DOWN,
            Self::MouseUp(_) => MOUSE_UP,
            Self::ContextMenu(_) => CONTEXT_MENU,
            Self::Scroll(_) => SCROLL,
            Self::TouchStart(_) => TOUCH_START,
            Self::TouchMove(_) => TOUCH_MOVE,
            Self::TouchEnd(_) => TOUCH_END,
            Self::Pan(_) => PAN,
            Self::Pinch(_) => PINCH,
            Self::Resize(_) => RESIZE,
            Self::DprChange { .. } => DPR_CHANGE,
            Self::Custom { name, .. } => name,
        }
    }
}

/// What the host should do with the native event after dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Suppress the platform's default handling (scrolling, menus, shortcuts).
    pub prevent_default: bool,
}

impl EventOutcome {
    #[must_use]
    pub fn prevent_if(condition: bool) -> Self {
        Self { prevent_default: condition }
    }
}
