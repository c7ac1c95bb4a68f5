//! Host-controlled namespace for publishing engine operations.
//!
//! A [`Registry`] is a plain name-to-[`Binding`] map that the host program
//! owns; nothing here is global. [`bind_public`] copies the engine's public
//! operations into it under their camelCase names, first writer wins.
//! Arguments and results cross the boundary as JSON values, positional, in
//! the same order as the engine method's parameters.
//!
//! Bound functions hold a weak engine handle: calling one after the engine is
//! dropped, or while it is mutably borrowed, fails with `Unavailable`.

#[cfg(test)]
#[path = "binding_test.rs"]
mod binding_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::color;
use crate::draw::{CornerRadii, ShapeStyle};
use crate::engine::{Engine, SharedEngine};
use crate::error::CanvasError;
use crate::event_bus::EventBus;
use crate::events::{self, CanvasEvent};
use crate::geom::{Point, Rect, Size};
use crate::host::Host;
use crate::keys::KeyQuery;
use crate::pixels::Rgba;
use crate::render::{LineCap, Paint, TextAlign, TextBaseline};

/// A callable registry entry.
pub type HostFn = Rc<dyn Fn(&[Value]) -> Result<Value, CanvasError>>;

/// One registry entry.
#[derive(Clone)]
pub enum Binding {
    Value(Value),
    Function(HostFn),
    /// Computed property; without a setter it is read-only.
    Accessor { get: HostFn, set: Option<HostFn> },
}

impl Binding {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CanvasError> + 'static,
    {
        Self::Function(Rc::new(f))
    }

    /// The function behind a `Function` entry.
    #[must_use]
    pub fn callable(&self) -> Option<HostFn> {
        match self {
            Self::Function(f) => Some(Rc::clone(f)),
            Self::Value(_) | Self::Accessor { .. } => None,
        }
    }

    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Accessor { set, .. } => f.debug_struct("Accessor").field("writable", &set.is_some()).finish(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: BTreeMap<String, Binding>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. Returns the previous one.
    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) -> Option<Binding> {
        self.entries.insert(name.into(), binding)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.entries.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        self.entries.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke a `Function` entry.
    ///
    /// # Errors
    ///
    /// `UnknownBinding` if there is no function under `name`; otherwise
    /// whatever the function returns.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, CanvasError> {
        match self.entries.get(name) {
            Some(Binding::Function(f)) => f(args),
            _ => Err(CanvasError::UnknownBinding(name.to_owned())),
        }
    }

    /// Read a plain value or an accessor.
    ///
    /// # Errors
    ///
    /// `UnknownBinding` if `name` is missing or a function.
    pub fn read(&self, name: &str) -> Result<Value, CanvasError> {
        match self.entries.get(name) {
            Some(Binding::Value(value)) => Ok(value.clone()),
            Some(Binding::Accessor { get, .. }) => get(&[]),
            Some(Binding::Function(_)) | None => Err(CanvasError::UnknownBinding(name.to_owned())),
        }
    }

    /// Write a plain value or call an accessor's setter.
    ///
    /// # Errors
    ///
    /// `UnknownBinding` if `name` is missing or a function, `InvalidArgument`
    /// for a read-only accessor, or the setter's own error.
    pub fn write(&mut self, name: &str, value: Value) -> Result<(), CanvasError> {
        match self.entries.get_mut(name) {
            Some(Binding::Value(slot)) => {
                *slot = value;
                Ok(())
            }
            Some(Binding::Accessor { set: Some(set), .. }) => set(&[value]).map(drop),
            Some(Binding::Accessor { set: None, .. }) => {
                Err(CanvasError::invalid_argument(name, 0, "property is read-only"))
            }
            Some(Binding::Function(_)) | None => Err(CanvasError::UnknownBinding(name.to_owned())),
        }
    }
}

// =============================================================
// Legacy hooks
// =============================================================

/// Registry names that receive an event without calling `on`.
pub const LEGACY_HOOKS: [(&str, &str); 11] = [
    ("OnKeyDown", events::KEY_DOWN),
    ("OnKeyUp", events::KEY_UP),
    ("OnMouseMove", events::MOUSE_MOVE),
    ("OnMouseDown", events::MOUSE_DOWN),
    ("OnMouseUp", events::MOUSE_UP),
    ("OnContextMenu", events::CONTEXT_MENU),
    ("OnScroll", events::SCROLL),
    ("OnTouchStart", events::TOUCH_START),
    ("OnTouchMove", events::TOUCH_MOVE),
    ("OnTouchEnd", events::TOUCH_END),
    ("OnResize", events::RESIZE),
];

/// Register every callable legacy hook in `registry` as an ordinary listener.
/// Returns the hook names installed.
pub fn install_legacy_hooks(bus: &EventBus<CanvasEvent>, registry: &Registry) -> Vec<&'static str> {
    let mut installed = Vec::new();
    for (hook, event) in LEGACY_HOOKS {
        let Some(binding) = registry.get(hook) else {
            continue;
        };
        match bus.on_binding(event, binding) {
            Ok(_) => {
                tracing::debug!(hook, event, "legacy hook installed");
                installed.push(hook);
            }
            Err(err) => tracing::debug!(hook, %err, "legacy hook skipped"),
        }
    }
    installed
}

// =============================================================
// Public binding
// =============================================================

/// Outcome of [`bind_public`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindReport {
    pub installed: Vec<&'static str>,
    /// Names already present in the registry, left untouched.
    pub skipped: Vec<&'static str>,
}

/// Copy the engine's public operations into `registry`.
///
/// Does nothing when the engine was configured with `publicMethods: false`.
/// `moveTo` is never bound; the pen-move operation is published as `penTo`.
///
/// # Errors
///
/// Returns `Unavailable` if the engine is mutably borrowed.
pub fn bind_public<H: Host + 'static>(
    engine: &SharedEngine<H>,
    registry: &mut Registry,
) -> Result<BindReport, CanvasError> {
    let enabled =
        engine.try_borrow().map_err(|_| CanvasError::Unavailable("engine is busy"))?.config().public_methods;
    let mut report = BindReport::default();
    if !enabled {
        tracing::debug!("public binding disabled");
        return Ok(report);
    }

    for (name, binding) in public_bindings(engine) {
        if registry.contains(name) {
            tracing::warn!(name, "binding skipped: name already taken");
            report.skipped.push(name);
        } else {
            registry.insert(name, binding);
            report.installed.push(name);
        }
    }
    tracing::debug!(installed = report.installed.len(), skipped = report.skipped.len(), "public binding done");
    Ok(report)
}

#[allow(clippy::too_many_lines)]
fn public_bindings<H: Host + 'static>(engine: &SharedEngine<H>) -> Vec<(&'static str, Binding)> {
    let e = engine;
    vec![
        // --- Properties ---
        accessor(e, "width", |e| to_json(&e.width()), Some(set_width::<H> as Setter<H>)),
        accessor(e, "height", |e| to_json(&e.height()), Some(set_height::<H> as Setter<H>)),
        accessor(e, "mouse", |e| to_json(e.mouse()), None),
        accessor(e, "touch", |e| to_json(e.touch()), None),
        // --- Sizing and events ---
        method(e, "setSize", |e, a| e.set_size(a.opt_number(0)?, a.opt_number(1)?).map(unit)),
        emitter(e),
        // --- Input queries ---
        method(e, "key", |e, a| Ok(Value::Bool(e.key(a.key_query(0)?)))),
        method(e, "isCtrlPressed", |e, _| Ok(Value::Bool(e.is_ctrl_pressed()))),
        method(e, "isAltPressed", |e, _| Ok(Value::Bool(e.is_alt_pressed()))),
        method(e, "isShiftPressed", |e, _| Ok(Value::Bool(e.is_shift_pressed()))),
        // --- Shapes ---
        method(e, "clearScreen", |e, _| {
            e.clear_screen();
            Ok(Value::Null)
        }),
        method(e, "background", |e, a| {
            e.background(&a.parse::<Paint>(0)?);
            Ok(Value::Null)
        }),
        method(e, "arc", |e, a| {
            e.arc(a.point(0)?, a.number(2)?, a.number(3)?, a.number(4)?, a.flag(5, false)?).map(unit)
        }),
        method(e, "circle", |e, a| e.circle(a.point(0)?, a.number(2)?, a.style(3)?).map(unit)),
        method(e, "ring", |e, a| e.ring(a.point(0)?, a.number(2)?, a.text(3)?, a.opt_number(4)?).map(unit)),
        method(e, "ellipse", |e, a| {
            let radii = Size::new(a.number(2)?, a.number(3)?);
            e.ellipse(a.point(0)?, radii, a.opt_number(4)?.unwrap_or(0.0), a.style(5)?).map(unit)
        }),
        method(e, "rectangle", |e, a| {
            e.rectangle(a.rect(0)?, a.style(4)?);
            Ok(Value::Null)
        }),
        method(e, "pixelPerfectRectangle", |e, a| {
            e.pixel_perfect_rectangle(a.rect(0)?, a.style(4)?);
            Ok(Value::Null)
        }),
        method(e, "roundedRectangle", |e, a| e.rounded_rectangle(a.rect(0)?, a.radii(4)?, a.style(5)?).map(unit)),
        method(e, "triangle", |e, a| {
            e.triangle([a.point(0)?, a.point(2)?, a.point(4)?], a.style(6)?);
            Ok(Value::Null)
        }),
        method(e, "line", |e, a| {
            e.line(a.point(0)?, a.point(2)?, a.opt_text(4)?, a.opt_number(5)?);
            Ok(Value::Null)
        }),
        method(e, "pixelPerfectLine", |e, a| {
            e.pixel_perfect_line(a.point(0)?, a.point(2)?, a.opt_text(4)?, a.opt_number(5)?.unwrap_or(1.0));
            Ok(Value::Null)
        }),
        method(e, "polygon", |e, a| {
            let points = a.parse::<Vec<Point>>(0)?;
            let offset = Point::new(a.opt_number(1)?.unwrap_or(0.0), a.opt_number(2)?.unwrap_or(0.0));
            e.polygon(&points, offset, a.flag(3, true)?, a.style(4)?);
            Ok(Value::Null)
        }),
        method(e, "text", |e, a| e.text(a.text(0)?, a.point(1)?, a.number(3)?, a.style(4)?).map(unit)),
        method(e, "drawVector", |e, a| {
            let scale = a.opt_number(4)?.unwrap_or(1.0);
            e.draw_vector(a.point(0)?, a.point(2)?, scale, a.opt_text(5)?.unwrap_or("black")).map(unit)
        }),
        method(e, "picture", |e, a| e.picture(a.text(0)?, a.point(1)?, a.opt_size(3)?).map(unit)),
        method(e, "clippedPicture", |e, a| {
            e.clipped_picture(a.text(0)?, a.rect(1)?, a.point(5)?, a.opt_size(7)?).map(unit)
        }),
        method(e, "gradient", |e, a| to_json(&e.gradient(a.text(0)?, a.text(1)?, a.point(2)?, a.point(4)?))),
        // --- Transforms and paths ---
        method(e, "save", |e, _| {
            e.save();
            Ok(Value::Null)
        }),
        method(e, "restore", |e, _| {
            e.restore();
            Ok(Value::Null)
        }),
        method(e, "rotate", |e, a| e.rotate(a.number(0)?).map(unit)),
        method(e, "translate", |e, a| e.translate(a.number(0)?, a.number(1)?).map(unit)),
        method(e, "beginPath", |e, _| {
            e.begin_path();
            Ok(Value::Null)
        }),
        method(e, "closePath", |e, _| {
            e.close_path();
            Ok(Value::Null)
        }),
        method(e, "penTo", |e, a| {
            e.pen_to(a.point(0)?);
            Ok(Value::Null)
        }),
        method(e, "lineTo", |e, a| {
            e.line_to(a.point(0)?);
            Ok(Value::Null)
        }),
        method(e, "quadraticTo", |e, a| {
            e.quadratic_to(a.point(0)?, a.point(2)?);
            Ok(Value::Null)
        }),
        method(e, "bezierTo", |e, a| {
            e.bezier_to(a.point(0)?, a.point(2)?, a.point(4)?);
            Ok(Value::Null)
        }),
        method(e, "fill", |e, _| {
            e.fill();
            Ok(Value::Null)
        }),
        method(e, "stroke", |e, _| {
            e.stroke();
            Ok(Value::Null)
        }),
        method(e, "clip", |e, _| {
            e.clip();
            Ok(Value::Null)
        }),
        // --- Style ---
        method(e, "fillStyle", |e, a| {
            e.fill_style(&a.parse::<Paint>(0)?);
            Ok(Value::Null)
        }),
        method(e, "strokeStyle", |e, a| {
            e.stroke_style(&a.parse::<Paint>(0)?);
            Ok(Value::Null)
        }),
        method(e, "lineWidth", |e, a| {
            e.line_width(a.number(0)?);
            Ok(Value::Null)
        }),
        method(e, "setLineCap", |e, a| {
            e.set_line_cap(a.keyword(0, LineCap::parse)?);
            Ok(Value::Null)
        }),
        method(e, "resetLineCap", |e, _| {
            e.reset_line_cap();
            Ok(Value::Null)
        }),
        method(e, "setFont", |e, a| {
            e.set_font(a.text(0)?);
            Ok(Value::Null)
        }),
        method(e, "setFontWeight", |e, a| {
            e.set_font_weight(a.text(0)?);
            Ok(Value::Null)
        }),
        method(e, "setTextAlign", |e, a| {
            e.set_text_align(a.keyword(0, TextAlign::parse)?);
            Ok(Value::Null)
        }),
        method(e, "setTextAlignY", |e, a| {
            e.set_text_align_y(a.keyword(0, TextBaseline::parse)?);
            Ok(Value::Null)
        }),
        method(e, "resetTextAlign", |e, _| {
            e.reset_text_align();
            Ok(Value::Null)
        }),
        method(e, "resetTextAlignY", |e, _| {
            e.reset_text_align_y();
            Ok(Value::Null)
        }),
        // --- Shadow ---
        method(e, "setShadowOffset", |e, a| {
            e.set_shadow_offset(a.point(0)?);
            Ok(Value::Null)
        }),
        method(e, "setShadowBlur", |e, a| {
            e.set_shadow_blur(a.number(0)?);
            Ok(Value::Null)
        }),
        method(e, "setShadowColor", |e, a| {
            e.set_shadow_color(a.text(0)?);
            Ok(Value::Null)
        }),
        method(e, "applyShadow", |e, a| e.apply_shadow(a.text(0)?).map(unit)),
        method(e, "clearShadow", |e, _| {
            e.clear_shadow();
            Ok(Value::Null)
        }),
        // --- Pixels ---
        method(e, "getPixelData", |e, _| e.get_pixel_data().map(unit)),
        method(e, "updatePixel", |e, a| e.update_pixel(a.coord(0)?, a.coord(1)?, a.rgba(2)?).map(unit)),
        method(e, "updatePixelIndex", |e, a| e.update_pixel_index(a.index(0)?, a.rgba(1)?).map(unit)),
        method(e, "getPixel", |e, a| to_json(&e.get_pixel(a.coord(0)?, a.coord(1)?)?)),
        method(e, "getPixelIndex", |e, a| to_json(&e.get_pixel_index(a.index(0)?)?)),
        method(e, "renderPixelData", |e, a| {
            let at = Point::new(a.opt_number(0)?.unwrap_or(0.0), a.opt_number(1)?.unwrap_or(0.0));
            e.render_pixel_data(at).map(unit)
        }),
        // --- Host controls ---
        method(e, "setCursor", |e, a| {
            e.set_cursor(a.text(0)?);
            Ok(Value::Null)
        }),
        method(e, "requestFullscreen", |e, _| e.request_fullscreen().map(unit)),
        method(e, "exitFullscreen", |e, _| e.exit_fullscreen().map(unit)),
        method(e, "lockPointer", |e, _| {
            e.lock_pointer();
            Ok(Value::Null)
        }),
        method(e, "unlockPointer", |e, _| {
            e.unlock_pointer();
            Ok(Value::Null)
        }),
        // --- Colors ---
        pure("rgb", |a| Ok(Value::String(color::rgb(a.number(0)?, a.number(1)?, a.number(2)?)))),
        pure("rgba", |a| Ok(Value::String(color::rgba(a.number(0)?, a.number(1)?, a.number(2)?, a.number(3)?)))),
        pure("hsl", |a| Ok(Value::String(color::hsl(a.number(0)?, a.number(1)?, a.number(2)?)))),
        pure("hsla", |a| Ok(Value::String(color::hsla(a.number(0)?, a.number(1)?, a.number(2)?, a.number(3)?)))),
        pure("grayscale", |a| Ok(Value::String(color::grayscale(a.number(0)?)))),
        pure("greyscale", |a| Ok(Value::String(color::greyscale(a.number(0)?)))),
    ]
}

fn unit((): ()) -> Value {
    Value::Null
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, CanvasError> {
    serde_json::to_value(value).map_err(|err| CanvasError::Render(format!("unserializable result: {err}")))
}

fn number(value: &Value, operation: &str) -> Result<f64, CanvasError> {
    value.as_f64().ok_or_else(|| CanvasError::invalid_argument(operation, 0, format!("expected a number, got {value}")))
}

fn set_width<H: Host>(engine: &mut Engine<H>, value: &Value) -> Result<(), CanvasError> {
    engine.set_width(number(value, "width")?)
}

fn set_height<H: Host>(engine: &mut Engine<H>, value: &Value) -> Result<(), CanvasError> {
    engine.set_height(number(value, "height")?)
}

fn upgrade<H>(engine: &Weak<RefCell<Engine<H>>>) -> Result<SharedEngine<H>, CanvasError> {
    engine.upgrade().ok_or(CanvasError::Unavailable("canvas was dropped"))
}

fn method<H, F>(engine: &SharedEngine<H>, name: &'static str, f: F) -> (&'static str, Binding)
where
    H: Host + 'static,
    F: Fn(&mut Engine<H>, Args<'_>) -> Result<Value, CanvasError> + 'static,
{
    let weak = Rc::downgrade(engine);
    let binding = Binding::function(move |values| {
        let engine = upgrade(&weak)?;
        let mut engine = engine.try_borrow_mut().map_err(|_| CanvasError::Unavailable("engine is busy"))?;
        f(&mut engine, Args { operation: name, values })
    });
    (name, binding)
}

/// `emit` fires without holding the engine, so its listeners may call
/// other bound functions.
fn emitter<H: Host + 'static>(engine: &SharedEngine<H>) -> (&'static str, Binding) {
    let weak = Rc::downgrade(engine);
    let binding = Binding::function(move |values| {
        let args = Args { operation: "emit", values };
        let bus = {
            let engine = upgrade(&weak)?;
            let engine = engine.try_borrow().map_err(|_| CanvasError::Unavailable("engine is busy"))?;
            engine.bus()
        };
        let name = args.text(0)?;
        let event = CanvasEvent::Custom { name: name.to_owned(), payload: args.get(1).cloned().unwrap_or(Value::Null) };
        Ok(Value::Bool(bus.fire(name, &event)?))
    });
    ("emit", binding)
}

fn pure<F>(name: &'static str, f: F) -> (&'static str, Binding)
where
    F: Fn(Args<'_>) -> Result<Value, CanvasError> + 'static,
{
    (name, Binding::function(move |values| f(Args { operation: name, values })))
}

type Setter<H> = fn(&mut Engine<H>, &Value) -> Result<(), CanvasError>;

fn accessor<H, G>(
    engine: &SharedEngine<H>,
    name: &'static str,
    get: G,
    set: Option<Setter<H>>,
) -> (&'static str, Binding)
where
    H: Host + 'static,
    G: Fn(&Engine<H>) -> Result<Value, CanvasError> + 'static,
{
    let weak = Rc::downgrade(engine);
    let getter: HostFn = Rc::new(move |_: &[Value]| {
        let engine = upgrade(&weak)?;
        let engine = engine.try_borrow().map_err(|_| CanvasError::Unavailable("engine is busy"))?;
        get(&engine)
    });
    let setter = set.map(|set| {
        let weak = Rc::downgrade(engine);
        let setter: HostFn = Rc::new(move |values: &[Value]| {
            let value = values.first().ok_or_else(|| CanvasError::invalid_argument(name, 0, "missing value"))?;
            let engine = upgrade(&weak)?;
            let mut engine = engine.try_borrow_mut().map_err(|_| CanvasError::Unavailable("engine is busy"))?;
            set(&mut engine, value).map(unit)
        });
        setter
    });
    (name, Binding::Accessor { get: getter, set: setter })
}

/// Positional JSON arguments for one operation. `null` counts as absent.
#[derive(Clone, Copy)]
struct Args<'a> {
    operation: &'static str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn get(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index).filter(|v| !v.is_null())
    }

    fn invalid(&self, index: usize, reason: impl Into<String>) -> CanvasError {
        CanvasError::invalid_argument(self.operation, index, reason)
    }

    fn required(&self, index: usize) -> Result<&'a Value, CanvasError> {
        self.get(index).ok_or_else(|| self.invalid(index, "missing"))
    }

    fn opt_number(&self, index: usize) -> Result<Option<f64>, CanvasError> {
        self.get(index)
            .map(|v| v.as_f64().ok_or_else(|| self.invalid(index, format!("expected a number, got {v}"))))
            .transpose()
    }

    fn number(&self, index: usize) -> Result<f64, CanvasError> {
        self.opt_number(index)?.ok_or_else(|| self.invalid(index, "missing"))
    }

    fn opt_text(&self, index: usize) -> Result<Option<&'a str>, CanvasError> {
        self.get(index)
            .map(|v| v.as_str().ok_or_else(|| self.invalid(index, format!("expected a string, got {v}"))))
            .transpose()
    }

    fn text(&self, index: usize) -> Result<&'a str, CanvasError> {
        self.opt_text(index)?.ok_or_else(|| self.invalid(index, "missing"))
    }

    fn flag(&self, index: usize, default: bool) -> Result<bool, CanvasError> {
        match self.get(index) {
            None => Ok(default),
            Some(v) => v.as_bool().ok_or_else(|| self.invalid(index, format!("expected a boolean, got {v}"))),
        }
    }

    fn point(&self, index: usize) -> Result<Point, CanvasError> {
        Ok(Point::new(self.number(index)?, self.number(index + 1)?))
    }

    fn rect(&self, index: usize) -> Result<Rect, CanvasError> {
        Ok(Rect::new(self.number(index)?, self.number(index + 1)?, self.number(index + 2)?, self.number(index + 3)?))
    }

    /// Width and height, both present or both absent.
    fn opt_size(&self, index: usize) -> Result<Option<Size>, CanvasError> {
        match (self.opt_number(index)?, self.opt_number(index + 1)?) {
            (Some(width), Some(height)) => Ok(Some(Size::new(width, height))),
            (None, None) => Ok(None),
            _ => Err(self.invalid(index, "width and height must be given together")),
        }
    }

    /// Fill, stroke and line width starting at `index`.
    fn style(&self, index: usize) -> Result<ShapeStyle<'a>, CanvasError> {
        Ok(ShapeStyle {
            fill: self.opt_text(index)?,
            stroke: self.opt_text(index + 1)?,
            line_width: self.opt_number(index + 2)?,
        })
    }

    /// One radius for every corner, or an array of four.
    fn radii(&self, index: usize) -> Result<CornerRadii, CanvasError> {
        match self.required(index)? {
            Value::Array(_) => self.parse(index),
            _ => Ok([self.number(index)?; 4]),
        }
    }

    fn key_query(&self, index: usize) -> Result<KeyQuery<'a>, CanvasError> {
        match self.required(index)? {
            Value::String(text) => Ok(KeyQuery::Text(text)),
            _ => Ok(KeyQuery::Legacy(self.coord(index)?)),
        }
    }

    fn keyword<T>(&self, index: usize, parse: fn(&str) -> Option<T>) -> Result<T, CanvasError> {
        let raw = self.text(index)?;
        parse(raw).ok_or_else(|| self.invalid(index, format!("unknown value '{raw}'")))
    }

    fn parse<T: DeserializeOwned>(&self, index: usize) -> Result<T, CanvasError> {
        serde_json::from_value(self.required(index)?.clone()).map_err(|err| self.invalid(index, err.to_string()))
    }

    /// A non-negative integer no larger than `max`.
    fn whole(&self, index: usize, max: f64) -> Result<f64, CanvasError> {
        let n = self.number(index)?;
        if n < 0.0 || n > max || n.fract() > 0.0 {
            return Err(self.invalid(index, format!("expected an integer in 0..={max}, got {n}")));
        }
        Ok(n)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn coord(&self, index: usize) -> Result<u32, CanvasError> {
        Ok(self.whole(index, f64::from(u32::MAX))? as u32)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn index(&self, index: usize) -> Result<usize, CanvasError> {
        Ok(self.whole(index, 9_007_199_254_740_991.0)? as usize)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rgba(&self, index: usize) -> Result<Rgba, CanvasError> {
        let mut rgba = [0; 4];
        for (offset, channel) in rgba.iter_mut().enumerate() {
            *channel = self.whole(index + offset, 255.0)? as u8;
        }
        Ok(rgba)
    }
}
