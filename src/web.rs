//! Browser host: a `web-sys` canvas behind the engine's host traits, plus the
//! DOM listener wiring that feeds raw events into a shared engine.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Fallible context calls map their `JsValue` error into `CanvasError::Render`;
//! style writes the traits treat as infallible are logged on failure.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, CanvasGradient, CanvasRenderingContext2d, Document, Event, EventTarget,
    HtmlCanvasElement, HtmlElement, HtmlImageElement, ImageData, KeyboardEvent, MediaQueryList, MouseEvent,
    ResizeObserver, TouchEvent, WheelEvent, Window,
};

use crate::config::{CanvasConfig, ContextAttributes};
use crate::engine::{Dispatch, Engine, SharedEngine, dispatch_shared};
use crate::error::CanvasError;
use crate::events::{KeyInput, Modifiers, PointerInput, RawTouch, TouchInput, WheelInput};
use crate::geom::{Point, Rect, Size};
use crate::host::HostControls;
use crate::pixel_ratio::{PixelRatioSource, resolution_query};
use crate::pixels::PixelBuffer;
use crate::render::{ImageDraw, LineCap, LinearGradient, Paint, Renderer, TextAlign, TextBaseline};
use crate::surface::{ContentBox, Padding, SizingMode, SurfaceTarget};

fn js_err(err: JsValue) -> CanvasError {
    CanvasError::Render(format!("{err:?}"))
}

fn config_err(message: &str) -> CanvasError {
    CanvasError::Configuration(message.to_owned())
}

/// Which canvas the host drives.
pub enum CanvasTarget {
    /// Create a canvas and append it to the body.
    Create,
    /// The first element matching a CSS selector.
    Selector(String),
    Element(HtmlCanvasElement),
}

type Notify = Rc<RefCell<Option<Box<dyn Fn()>>>>;

/// An armed one-shot `matchMedia` watcher.
struct RatioWatch {
    query: MediaQueryList,
    callback: Closure<dyn FnMut()>,
}

pub struct WebHost {
    window: Window,
    document: Document,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: HashMap<String, HtmlImageElement>,
    ratio_watch: Option<RatioWatch>,
    /// The previous watcher; it may still be on the stack when it is replaced.
    retired_watch: Option<RatioWatch>,
    ratio_notify: Notify,
}

impl WebHost {
    /// Resolve `target` to a canvas, create its 2D context and apply
    /// fullscreen styling when the config asks for it.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when there is no document, the selector matches
    /// nothing or a non-canvas element, or no 2D context is available.
    pub fn create(target: CanvasTarget, config: &CanvasConfig) -> Result<Self, CanvasError> {
        let resolved = config.resolve()?;
        let window = web_sys::window().ok_or_else(|| config_err("no window"))?;
        let document = window.document().ok_or_else(|| config_err("no document"))?;
        let canvas = match target {
            CanvasTarget::Create => {
                let canvas = document
                    .create_element("canvas")
                    .map_err(js_err)?
                    .dyn_into::<HtmlCanvasElement>()
                    .map_err(|_| config_err("created element is not a canvas"))?;
                document.body().ok_or_else(|| config_err("no body"))?.append_child(&canvas).map_err(js_err)?;
                canvas
            }
            CanvasTarget::Selector(selector) => document
                .query_selector(&selector)
                .map_err(js_err)?
                .ok_or_else(|| CanvasError::Configuration(format!("no element matches '{selector}'")))?
                .dyn_into::<HtmlCanvasElement>()
                .map_err(|_| CanvasError::Configuration(format!("'{selector}' is not a canvas")))?,
            CanvasTarget::Element(canvas) => canvas,
        };

        let ctx = canvas
            .get_context_with_context_options("2d", &context_options(&resolved.context_attributes)?)
            .map_err(js_err)?
            .ok_or_else(|| config_err("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| config_err("2d context has the wrong type"))?;

        let host = Self {
            window,
            document,
            canvas,
            ctx,
            images: HashMap::new(),
            ratio_watch: None,
            retired_watch: None,
            ratio_notify: Rc::new(RefCell::new(None)),
        };
        if resolved.is_fullscreen() {
            host.pin_fullscreen();
        }
        Ok(host)
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn pin_fullscreen(&self) {
        for (property, value) in [("position", "fixed"), ("top", "0"), ("left", "0")] {
            set_style(&self.canvas, property, value);
        }
        if let Some(body) = self.document.body() {
            set_style(&body, "overflow", "hidden");
        }
    }

    fn gradient(&self, g: &LinearGradient) -> Result<CanvasGradient, JsValue> {
        let gradient = self.ctx.create_linear_gradient(g.from.x, g.from.y, g.to.x, g.to.y);
        gradient.add_color_stop(0.0, &g.start_color)?;
        gradient.add_color_stop(1.0, &g.end_color)?;
        Ok(gradient)
    }

    /// Cached image for `source`; starts loading it on first use.
    fn image(&mut self, source: &str) -> Result<Option<&HtmlImageElement>, CanvasError> {
        if !self.images.contains_key(source) {
            let image = HtmlImageElement::new().map_err(js_err)?;
            image.set_src(source);
            self.images.insert(source.to_owned(), image);
        }
        Ok(self.images.get(source).filter(|image| image.complete() && image.natural_width() > 0))
    }
}

fn context_options(attrs: &ContextAttributes) -> Result<JsValue, CanvasError> {
    let options = js_sys::Object::new();
    let mut put = |key: &str, value: JsValue| {
        js_sys::Reflect::set(&options, &JsValue::from_str(key), &value).map(drop).map_err(js_err)
    };
    if let Some(alpha) = attrs.alpha {
        put("alpha", JsValue::from_bool(alpha))?;
    }
    if let Some(space) = &attrs.color_space {
        put("colorSpace", JsValue::from_str(space))?;
    }
    if let Some(desynchronized) = attrs.desynchronized {
        put("desynchronized", JsValue::from_bool(desynchronized))?;
    }
    if let Some(frequent) = attrs.will_read_frequently {
        put("willReadFrequently", JsValue::from_bool(frequent))?;
    }
    Ok(options.into())
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = element.style().set_property(property, value) {
        tracing::warn!(property, ?err, "style update failed");
    }
}

fn css_px(raw: &str) -> f64 {
    raw.trim_end_matches("px").parse().unwrap_or(0.0)
}

fn js_number(value: Result<JsValue, JsValue>) -> f64 {
    match value {
        Ok(value) => value.as_f64().unwrap_or(0.0),
        Err(_) => 0.0,
    }
}

// =============================================================
// Host traits
// =============================================================

impl Renderer for WebHost {
    fn set_scale(&mut self, scale: f64) -> Result<(), CanvasError> {
        self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0).map_err(js_err)
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn rotate(&mut self, angle: f64) -> Result<(), CanvasError> {
        self.ctx.rotate(angle).map_err(js_err)
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), CanvasError> {
        self.ctx.translate(x, y).map_err(js_err)
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ctx.clear_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn move_to(&mut self, to: Point) {
        self.ctx.move_to(to.x, to.y);
    }

    fn line_to(&mut self, to: Point) {
        self.ctx.line_to(to.x, to.y);
    }

    fn rect(&mut self, rect: Rect) {
        self.ctx.rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn quadratic_curve_to(&mut self, control: Point, to: Point) {
        self.ctx.quadratic_curve_to(control.x, control.y, to.x, to.y);
    }

    fn bezier_curve_to(&mut self, control1: Point, control2: Point, to: Point) {
        self.ctx.bezier_curve_to(control1.x, control1.y, control2.x, control2.y, to.x, to.y);
    }

    fn arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        counterclockwise: bool,
    ) -> Result<(), CanvasError> {
        self.ctx.arc_with_anticlockwise(center.x, center.y, radius, start, end, counterclockwise).map_err(js_err)
    }

    fn ellipse(&mut self, center: Point, radii: Size, rotation: f64, start: f64, end: f64) -> Result<(), CanvasError> {
        self.ctx.ellipse(center.x, center.y, radii.width, radii.height, rotation, start, end).map_err(js_err)
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn clip(&mut self) {
        self.ctx.clip();
    }

    fn set_fill(&mut self, paint: &Paint) {
        match paint {
            Paint::Color(color) => self.ctx.set_fill_style_str(color),
            Paint::LinearGradient(g) => match self.gradient(g) {
                Ok(gradient) => self.ctx.set_fill_style_canvas_gradient(&gradient),
                Err(err) => tracing::warn!(?err, "gradient rejected"),
            },
        }
    }

    fn set_stroke(&mut self, paint: &Paint) {
        match paint {
            Paint::Color(color) => self.ctx.set_stroke_style_str(color),
            Paint::LinearGradient(g) => match self.gradient(g) {
                Ok(gradient) => self.ctx.set_stroke_style_canvas_gradient(&gradient),
                Err(err) => tracing::warn!(?err, "gradient rejected"),
            },
        }
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.as_str());
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ctx.set_text_align(align.as_str());
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ctx.set_text_baseline(baseline.as_str());
    }

    fn set_shadow_offset(&mut self, offset: Point) {
        self.ctx.set_shadow_offset_x(offset.x);
        self.ctx.set_shadow_offset_y(offset.y);
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.ctx.set_shadow_blur(blur);
    }

    fn set_shadow_color(&mut self, color: &str) {
        self.ctx.set_shadow_color(color);
    }

    fn fill_text(&mut self, text: &str, at: Point) -> Result<(), CanvasError> {
        self.ctx.fill_text(text, at.x, at.y).map_err(js_err)
    }

    fn stroke_text(&mut self, text: &str, at: Point) -> Result<(), CanvasError> {
        self.ctx.stroke_text(text, at.x, at.y).map_err(js_err)
    }

    /// Images load asynchronously; a draw before the load completes is skipped.
    fn draw_image(&mut self, draw: &ImageDraw) -> Result<(), CanvasError> {
        let Some(image) = self.image(&draw.source)?.cloned() else {
            return Ok(());
        };
        let natural = Size::new(f64::from(image.natural_width()), f64::from(image.natural_height()));
        let drawn = match draw.clip {
            Some(clip) => {
                let size = draw.size.unwrap_or(Size::new(clip.width, clip.height));
                self.ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    &image,
                    clip.x,
                    clip.y,
                    clip.width,
                    clip.height,
                    draw.dest.x,
                    draw.dest.y,
                    size.width,
                    size.height,
                )
            }
            None => {
                let size = draw.size.unwrap_or(natural);
                self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &image,
                    draw.dest.x,
                    draw.dest.y,
                    size.width,
                    size.height,
                )
            }
        };
        drawn.map_err(js_err)
    }

    fn read_pixels(&mut self, width: u32, height: u32) -> Result<PixelBuffer, CanvasError> {
        let data = self.ctx.get_image_data(0.0, 0.0, f64::from(width), f64::from(height)).map_err(js_err)?;
        PixelBuffer::from_raw(width, height, data.data().0)
    }

    fn write_pixels(&mut self, pixels: &PixelBuffer, at: Point) -> Result<(), CanvasError> {
        let data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.data()), pixels.width(), pixels.height())
            .map_err(js_err)?;
        self.ctx.put_image_data(&data, at.x, at.y).map_err(js_err)
    }
}

impl SurfaceTarget for WebHost {
    fn set_buffer_width(&mut self, pixels: u32) {
        self.canvas.set_width(pixels);
    }

    fn set_buffer_height(&mut self, pixels: u32) {
        self.canvas.set_height(pixels);
    }

    fn set_style_width(&mut self, css_pixels: f64) {
        set_style(&self.canvas, "width", &format!("{css_pixels}px"));
    }

    fn set_style_height(&mut self, css_pixels: f64) {
        set_style(&self.canvas, "height", &format!("{css_pixels}px"));
    }

    fn bounding_rect(&self) -> Rect {
        let rect = self.canvas.get_bounding_client_rect();
        Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
    }

    fn viewport_size(&self) -> Size {
        Size::new(js_number(self.window.inner_width()), js_number(self.window.inner_height()))
    }

    fn container_box(&self) -> Option<ContentBox> {
        let parent = self.canvas.parent_element()?;
        let padding = match self.window.get_computed_style(&parent) {
            Ok(Some(style)) => {
                let side = |name: &str| style.get_property_value(name).map_or(0.0, |raw| css_px(&raw));
                Padding {
                    left: side("padding-left"),
                    right: side("padding-right"),
                    top: side("padding-top"),
                    bottom: side("padding-bottom"),
                }
            }
            Ok(None) | Err(_) => Padding::default(),
        };
        Some(ContentBox {
            client_width: f64::from(parent.client_width()),
            client_height: f64::from(parent.client_height()),
            padding,
        })
    }
}

impl PixelRatioSource for WebHost {
    fn device_pixel_ratio(&self) -> Option<f64> {
        Some(self.window.device_pixel_ratio())
    }

    fn watch_pixel_ratio(&mut self, ratio: f64) {
        let query = match self.window.match_media(&resolution_query(ratio)) {
            Ok(Some(query)) => query,
            Ok(None) => return,
            Err(err) => {
                tracing::warn!(?err, ratio, "matchMedia unavailable");
                return;
            }
        };
        let notify = Rc::clone(&self.ratio_notify);
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Some(notify) = notify.borrow().as_ref() {
                notify();
            }
        });
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        if let Err(err) = query.add_event_listener_with_callback_and_add_event_listener_options(
            "change",
            callback.as_ref().unchecked_ref(),
            &options,
        ) {
            tracing::warn!(?err, ratio, "pixel ratio watcher not armed");
            return;
        }
        self.ratio_watch = Some(RatioWatch { query, callback });
    }

    fn unwatch_pixel_ratio(&mut self) {
        if let Some(watch) = self.ratio_watch.take() {
            if let Err(err) =
                watch.query.remove_event_listener_with_callback("change", watch.callback.as_ref().unchecked_ref())
            {
                tracing::debug!(?err, "pixel ratio watcher already gone");
            }
            self.retired_watch = Some(watch);
        }
    }
}

impl HostControls for WebHost {
    fn set_cursor(&mut self, cursor: &str) {
        set_style(&self.canvas, "cursor", cursor);
    }

    fn request_fullscreen(&mut self) -> Result<(), CanvasError> {
        self.canvas.request_fullscreen().map_err(js_err)
    }

    fn exit_fullscreen(&mut self) -> Result<(), CanvasError> {
        self.document.exit_fullscreen();
        Ok(())
    }

    fn lock_pointer(&mut self) {
        self.canvas.request_pointer_lock();
    }

    fn unlock_pointer(&mut self) {
        self.document.exit_pointer_lock();
    }
}

// =============================================================
// DOM wiring
// =============================================================

struct DomListener {
    target: EventTarget,
    name: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Live DOM registrations for one engine. Dropping it detaches everything.
pub struct WebListeners {
    listeners: Vec<DomListener>,
    observer: Option<(ResizeObserver, Closure<dyn FnMut()>)>,
    ratio_notify: Notify,
}

impl WebListeners {
    fn listen<F>(&mut self, target: &EventTarget, name: &'static str, handler: F) -> Result<(), CanvasError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                name,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(js_err)?;
        self.listeners.push(DomListener { target: target.clone(), name, callback });
        Ok(())
    }
}

impl Drop for WebListeners {
    fn drop(&mut self) {
        for listener in &self.listeners {
            if let Err(err) = listener
                .target
                .remove_event_listener_with_callback(listener.name, listener.callback.as_ref().unchecked_ref())
            {
                tracing::debug!(name = listener.name, ?err, "listener already detached");
            }
        }
        if let Some((observer, _)) = &self.observer {
            observer.disconnect();
        }
        *self.ratio_notify.borrow_mut() = None;
    }
}

/// Build a DOM handler that converts the native event, stages it on the
/// engine, fires listeners and applies the outcome.
fn route<T, I, C, S>(engine: &SharedEngine<WebHost>, convert: C, stage: S) -> impl FnMut(Event) + 'static
where
    T: JsCast,
    C: Fn(&T) -> I + 'static,
    S: Fn(&mut Engine<WebHost>, I) -> Dispatch + 'static,
{
    let weak = Rc::downgrade(engine);
    move |event: Event| {
        let Some(engine) = weak.upgrade() else {
            return;
        };
        let Some(native) = event.dyn_ref::<T>() else {
            return;
        };
        let input = convert(native);
        match dispatch_shared(&engine, |e| Ok(stage(e, input))) {
            Ok(outcome) => {
                if outcome.prevent_default {
                    event.prevent_default();
                }
            }
            Err(err) => tracing::error!(event = %event.type_(), %err, "canvas input dispatch failed"),
        }
    }
}

fn notify_shared<F>(engine: &Weak<RefCell<Engine<WebHost>>>, what: &'static str, stage: F)
where
    F: FnOnce(&mut Engine<WebHost>) -> Result<Dispatch, CanvasError>,
{
    let Some(engine) = engine.upgrade() else {
        return;
    };
    if let Err(err) = dispatch_shared(&engine, stage) {
        tracing::error!(what, %err, "canvas notification failed");
    }
}

/// Wire DOM events, the viewport and container observers and the pixel-ratio
/// watcher to `engine`.
///
/// # Errors
///
/// Returns `Unavailable` if the engine is borrowed, `Configuration` if the
/// document has no body, or `Render` if the browser rejects a registration.
pub fn attach(engine: &SharedEngine<WebHost>) -> Result<WebListeners, CanvasError> {
    let (window, document, canvas, responsive, ratio_notify) = {
        let e = engine.try_borrow().map_err(|_| CanvasError::Unavailable("engine is busy"))?;
        let host = e.host();
        (
            host.window.clone(),
            host.document.clone(),
            host.canvas.clone(),
            e.config().sizing == SizingMode::Responsive,
            Rc::clone(&host.ratio_notify),
        )
    };
    let body = document.body().ok_or_else(|| config_err("no body"))?;
    let mut wired = WebListeners { listeners: Vec::new(), observer: None, ratio_notify: Rc::clone(&ratio_notify) };

    let doc: &EventTarget = &document;
    wired.listen(doc, "keydown", route(engine, key_input, Engine::apply_key_down))?;
    wired.listen(doc, "keyup", route(engine, key_input, Engine::apply_key_up))?;
    wired.listen(doc, "mousemove", route(engine, pointer_input, Engine::apply_mouse_move))?;
    wired.listen(doc, "mouseup", route(engine, pointer_input, Engine::apply_mouse_up))?;

    let target: &EventTarget = &canvas;
    wired.listen(target, "mousedown", route(engine, pointer_input, Engine::apply_mouse_down))?;
    wired.listen(target, "contextmenu", route(engine, pointer_input, Engine::apply_context_menu))?;
    wired.listen(target, "touchstart", route(engine, touch_input, Engine::apply_touch_start))?;
    wired.listen(target, "touchmove", route(engine, touch_input, Engine::apply_touch_move))?;
    wired.listen(target, "touchend", route(engine, touch_input, Engine::apply_touch_end))?;

    wired.listen(&body, "wheel", route(engine, wheel_input, Engine::apply_wheel))?;

    let weak = Rc::downgrade(engine);
    wired.listen(&window, "resize", move |_| notify_shared(&weak, "resize", Engine::apply_viewport_resize))?;

    if responsive {
        let parent = canvas.parent_element().ok_or_else(|| config_err("responsive canvas has no parent"))?;
        let weak = Rc::downgrade(engine);
        let callback = Closure::<dyn FnMut()>::new(move || {
            notify_shared(&weak, "container resize", Engine::apply_container_resize);
        });
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref()).map_err(js_err)?;
        observer.observe(&parent);
        wired.observer = Some((observer, callback));
    }

    let weak = Rc::downgrade(engine);
    *ratio_notify.borrow_mut() = Some(Box::new(move || {
        notify_shared(&weak, "pixel ratio", Engine::apply_pixel_ratio_change);
    }));

    tracing::debug!(listeners = wired.listeners.len(), responsive, "canvas attached");
    Ok(wired)
}

// =============================================================
// Native event conversion
// =============================================================

fn key_input(event: &KeyboardEvent) -> KeyInput {
    KeyInput {
        key: event.key(),
        code: event.code(),
        key_code: event.key_code(),
        modifiers: Modifiers {
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        },
    }
}

fn pointer_input(event: &MouseEvent) -> PointerInput {
    PointerInput {
        client: Point::new(f64::from(event.client_x()), f64::from(event.client_y())),
        movement: Point::new(f64::from(event.movement_x()), f64::from(event.movement_y())),
        button: event.button(),
        modifiers: Modifiers {
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        },
    }
}

fn wheel_input(event: &WheelEvent) -> WheelInput {
    WheelInput { delta_x: event.delta_x(), delta_y: event.delta_y(), delta_z: event.delta_z() }
}

fn touch_input(event: &TouchEvent) -> TouchInput {
    let list = event.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|touch| RawTouch {
            page: Point::new(f64::from(touch.page_x()), f64::from(touch.page_y())),
            id: i64::from(touch.identifier()),
            force: f64::from(touch.force()),
            radius_x: f64::from(touch.radius_x()),
            radius_y: f64::from(touch.radius_y()),
            rotation_angle: f64::from(touch.rotation_angle()),
        })
        .collect();
    TouchInput::new(touches)
}
