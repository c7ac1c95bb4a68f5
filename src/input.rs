//! Normalized mouse, touch, keyboard and pan state.
//!
//! Every transition here runs before any listener sees the event, so
//! listeners always read state that already reflects the event they are
//! handling. Gesture outputs (pan deltas, pinch steps) are returned to the
//! caller to dispatch rather than fired from here.
//!
//! Mouse coordinates come from client space, touch coordinates from page
//! space; both are mapped into logical units through a [`CoordinateMap`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Serialize;

use crate::events::{KeyInput, PanDelta, Pinch, PointerInput, RawTouch, TouchInput, WheelInput};
use crate::geom::{CoordinateMap, Point};
use crate::gesture::{average_movement, pinch_between};
use crate::keys::KeyState;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a host button index; indices past the right button are ignored.
    #[must_use]
    pub fn from_index(index: i16) -> Option<Self> {
        match index {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseState {
    pub x: f64,
    pub y: f64,
    /// Position before the most recent move.
    pub last_x: f64,
    pub last_y: f64,
    /// Raw device movement of the most recent move.
    pub movement_x: f64,
    pub movement_y: f64,
    pub left: bool,
    pub middle: bool,
    pub right: bool,
    /// Any button held, or any touch active.
    pub any: bool,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub scroll_z: f64,
}

impl MouseState {
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn buttons_down(&self) -> bool {
        self.left || self.middle || self.right
    }

    fn set_button(&mut self, button: Button, down: bool) {
        match button {
            Button::Primary => self.left = down,
            Button::Middle => self.middle = down,
            Button::Secondary => self.right = down,
        }
    }
}

/// One active touch in logical coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
    pub id: i64,
    pub force: f64,
    pub radius_x: f64,
    pub radius_y: f64,
    pub rotation_angle: f64,
}

impl TouchPoint {
    #[must_use]
    pub fn from_raw(raw: &RawTouch, map: &CoordinateMap) -> Self {
        let Point { x, y } = map.to_logical(raw.page);
        Self {
            x,
            y,
            id: raw.id,
            force: raw.force,
            radius_x: raw.radius_x,
            radius_y: raw.radius_y,
            rotation_angle: raw.rotation_angle,
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchState {
    /// Primary (first) touch position.
    pub x: f64,
    pub y: f64,
    pub last_x: f64,
    pub last_y: f64,
    /// Average movement across all touches; zero when the finger count changed.
    pub movement_x: f64,
    pub movement_y: f64,
    pub is_touching: bool,
    /// Replaced wholesale on every touch event; index is slot, not identity.
    pub touches: Vec<TouchPoint>,
    /// Snapshot of `touches` from the previous touch event.
    pub last_touches: Vec<TouchPoint>,
}

impl TouchState {
    /// Replace the touch list and derive primary position and movement.
    fn rebuild(&mut self, input: &TouchInput, map: &CoordinateMap) {
        self.touches = input.touches.iter().map(|raw| TouchPoint::from_raw(raw, map)).collect();
        if let Some(primary) = self.touches.first() {
            self.x = primary.x;
            self.y = primary.y;
        }
        let moved = average_movement(&positions(&self.touches), &positions(&self.last_touches));
        self.movement_x = moved.x;
        self.movement_y = moved.y;
    }

    fn snapshot(&mut self) {
        self.last_x = self.x;
        self.last_y = self.y;
        self.last_touches.clone_from(&self.touches);
    }
}

fn positions(touches: &[TouchPoint]) -> Vec<Point> {
    touches.iter().map(TouchPoint::position).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanState {
    pub is_panning: bool,
}

/// Gestures derived from one touch move.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TouchGestures {
    pub pan: Option<PanDelta>,
    pub pinch: Option<Pinch>,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub mouse: MouseState,
    pub touch: TouchState,
    pub keys: KeyState,
    pub pan: PanState,
}

impl InputState {
    pub fn key_down(&mut self, input: &KeyInput) {
        self.keys.press(input);
    }

    pub fn key_up(&mut self, input: &KeyInput) {
        self.keys.release(input);
    }

    /// Update position and movement; returns the pan delta while panning.
    pub fn mouse_move(&mut self, input: &PointerInput, map: &CoordinateMap) -> Option<PanDelta> {
        self.mouse.last_x = self.mouse.x;
        self.mouse.last_y = self.mouse.y;
        let Point { x, y } = map.to_logical(input.client);
        self.mouse.x = x;
        self.mouse.y = y;
        self.mouse.movement_x = input.movement.x;
        self.mouse.movement_y = input.movement.y;
        self.pan.is_panning.then_some(PanDelta { x: input.movement.x, y: input.movement.y })
    }

    pub fn mouse_down(&mut self, input: &PointerInput) {
        if let Some(button) = Button::from_index(input.button) {
            self.mouse.set_button(button, true);
        }
        self.mouse.any = self.mouse.buttons_down() || self.touch.is_touching;
        self.pan.is_panning = true;
    }

    pub fn mouse_up(&mut self, input: &PointerInput) {
        if let Some(button) = Button::from_index(input.button) {
            self.mouse.set_button(button, false);
        }
        self.mouse.any = self.mouse.buttons_down() || !self.touch.touches.is_empty();
        self.pan.is_panning = self.mouse.any;
    }

    pub fn wheel(&mut self, input: &WheelInput) {
        self.mouse.scroll_x = input.delta_x;
        self.mouse.scroll_y = input.delta_y;
        self.mouse.scroll_z = input.delta_z;
    }

    pub fn touch_start(&mut self, input: &TouchInput, map: &CoordinateMap) {
        self.touch.rebuild(input, map);
        self.touch.is_touching = true;
        self.mouse.any = true;
        self.pan.is_panning = true;
    }

    /// Rebuild touches and derive this move's gestures.
    pub fn touch_move(&mut self, input: &TouchInput, map: &CoordinateMap) -> TouchGestures {
        self.touch.rebuild(input, map);
        let pan = self
            .pan
            .is_panning
            .then_some(PanDelta { x: self.touch.movement_x, y: self.touch.movement_y });
        let pinch = pinch_between(&positions(&self.touch.touches), &positions(&self.touch.last_touches));
        TouchGestures { pan, pinch }
    }

    pub fn touch_end(&mut self, input: &TouchInput, map: &CoordinateMap) {
        self.touch.rebuild(input, map);
        self.touch.is_touching = !self.touch.touches.is_empty();
        self.mouse.any = self.mouse.buttons_down() || self.touch.is_touching;
        if !self.touch.is_touching {
            self.pan.is_panning = false;
        }
    }

    /// Make the current touches the baseline for the next touch event.
    pub fn commit_touches(&mut self) {
        self.touch.snapshot();
    }
}
