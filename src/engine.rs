//! The engine: owns surface sizing, pixel-ratio tracking, input state and the
//! event bus, and exposes the public drawing and query contract.
//!
//! DISPATCH
//! ========
//! Every raw input goes through two phases. The `apply_*` methods update
//! state and return a [`Dispatch`]: the events to fire, in order, and what
//! the host should do with the native event. Firing happens afterwards, so
//! state is complete before any listener runs.
//!
//! `handle_*` runs both phases on an engine you hold directly. Hosts that
//! share the engine behind `Rc<RefCell<_>>` (the web adapter, bound registry
//! functions) use [`dispatch_shared`], which releases the borrow before
//! listeners run so a listener may call back into the engine.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::binding::{self, Binding, Registry};
use crate::config::{CanvasConfig, ResolvedConfig};
use crate::draw::{self, CornerRadii, Font, ShapeStyle};
use crate::error::{CanvasError, ListenerError};
use crate::event_bus::{EventBus, ListenerId};
use crate::events::{CanvasEvent, EventOutcome, KeyInput, PointerInput, TouchInput, WheelInput};
use crate::geom::{CoordinateMap, Point, Rect, Size};
use crate::host::Host;
use crate::input::{InputState, MouseState, PanState, TouchState};
use crate::keys::{KeyQuery, KeyState};
use crate::pixel_ratio::PixelRatioTracker;
use crate::pixels::{PixelBuffer, Rgba};
use crate::render::{LineCap, Paint, Shadow, TextAlign, TextBaseline};
use crate::surface::{SizingMode, Surface, SurfaceSizer};

/// The engine shared with host callbacks.
pub type SharedEngine<H> = Rc<RefCell<Engine<H>>>;

/// Events produced by one raw input and the native-event outcome.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Dispatch {
    events: Vec<CanvasEvent>,
    outcome: EventOutcome,
    commits_touches: bool,
}

impl Dispatch {
    fn new(events: Vec<CanvasEvent>, outcome: EventOutcome) -> Self {
        Self { events, outcome, commits_touches: false }
    }

    fn touch(events: Vec<CanvasEvent>, outcome: EventOutcome) -> Self {
        Self { events, outcome, commits_touches: true }
    }

    #[must_use]
    pub fn events(&self) -> &[CanvasEvent] {
        &self.events
    }

    #[must_use]
    pub fn outcome(&self) -> EventOutcome {
        self.outcome
    }

    /// Whether the touch snapshot must be taken once the events have fired.
    #[must_use]
    pub fn commits_touches(&self) -> bool {
        self.commits_touches
    }

    /// Fire every event in order.
    ///
    /// # Errors
    ///
    /// Returns the first listener error; later events are not fired.
    pub fn fire(&self, bus: &EventBus<CanvasEvent>) -> Result<EventOutcome, CanvasError> {
        for event in &self.events {
            bus.fire(event.name(), event)?;
        }
        Ok(self.outcome)
    }
}

/// Run one input against a shared engine.
///
/// `stage` updates state under a short mutable borrow; the events are fired
/// with no borrow held; the touch snapshot (if any) is taken afterwards even
/// when a listener failed.
///
/// # Errors
///
/// Returns `Unavailable` if the engine is already borrowed, any error from
/// `stage`, or the first listener error.
pub fn dispatch_shared<H, F>(engine: &RefCell<Engine<H>>, stage: F) -> Result<EventOutcome, CanvasError>
where
    H: Host,
    F: FnOnce(&mut Engine<H>) -> Result<Dispatch, CanvasError>,
{
    let (bus, dispatch) = {
        let mut engine = engine.try_borrow_mut().map_err(|_| CanvasError::Unavailable("engine is busy"))?;
        let dispatch = stage(&mut engine)?;
        (engine.bus(), dispatch)
    };
    let fired = dispatch.fire(&bus);
    if dispatch.commits_touches() {
        engine.try_borrow_mut().map_err(|_| CanvasError::Unavailable("engine is busy"))?.input.commit_touches();
    }
    fired
}

pub struct Engine<H> {
    host: H,
    config: ResolvedConfig,
    bus: Rc<EventBus<CanvasEvent>>,
    ratio: PixelRatioTracker,
    sizer: SurfaceSizer,
    input: InputState,
    font: Font,
    pixels: Option<PixelBuffer>,
}

impl<H: Host> Engine<H> {
    /// Resolve `config`, start pixel-ratio tracking and size the surface for its mode.
    ///
    /// No `dprChange` or `resize` event fires during construction.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for invalid options, or for responsive sizing
    /// when the surface has no parent container.
    pub fn new(mut host: H, config: &CanvasConfig) -> Result<Self, CanvasError> {
        let config = config.resolve()?;
        let ratio = PixelRatioTracker::start(&mut host);
        let sizer = SurfaceSizer::new(config.sizing);
        let mut engine = Self {
            host,
            config,
            bus: Rc::new(EventBus::new()),
            ratio,
            sizer,
            input: InputState::default(),
            font: Font::default(),
            pixels: None,
        };
        engine.fit_to_mode()?;
        Ok(engine)
    }

    /// Size the surface from its mode's source.
    fn fit_to_mode(&mut self) -> Result<(), CanvasError> {
        let dpr = self.ratio.force_update(&self.host);
        match self.sizer.mode() {
            SizingMode::Fullscreen => {
                let viewport = self.host.viewport_size();
                self.sizer.fit_viewport(&mut self.host, dpr, viewport)
            }
            SizingMode::Responsive => {
                let container = self.host.container_box().ok_or_else(|| {
                    CanvasError::Configuration("responsive sizing requires a parent container".to_owned())
                })?;
                self.sizer.fit_container(&mut self.host, dpr, container)
            }
            SizingMode::Static(size) => self.sizer.set_size(&mut self.host, dpr, Some(size.width), Some(size.height)),
        }
    }

    // --- Host and configuration ---

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    // --- Events ---

    /// The event bus, for listeners that need to unregister themselves.
    #[must_use]
    pub fn bus(&self) -> Rc<EventBus<CanvasEvent>> {
        Rc::clone(&self.bus)
    }

    pub fn on<F>(&self, name: &str, callback: F) -> ListenerId
    where
        F: Fn(&CanvasEvent) -> Result<(), ListenerError> + 'static,
    {
        self.bus.on(name, callback)
    }

    pub fn off(&self, name: &str, id: ListenerId) -> bool {
        self.bus.off(name, id)
    }

    /// Register a host-registry entry as a listener.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCallback` if the entry is not callable.
    pub fn on_binding(&self, name: &str, binding: &Binding) -> Result<ListenerId, CanvasError> {
        self.bus.on_binding(name, binding)
    }

    /// Fire an application-defined event. Returns whether anyone listened.
    ///
    /// # Errors
    ///
    /// Returns the first listener error.
    pub fn emit(&self, name: &str, payload: Value) -> Result<bool, CanvasError> {
        let event = CanvasEvent::Custom { name: name.to_owned(), payload };
        Ok(self.bus.fire(name, &event)?)
    }

    /// Register every callable `On*` entry of `registry` as a listener for
    /// its event. Returns the hook names that were installed.
    pub fn install_legacy_hooks(&self, registry: &Registry) -> Vec<&'static str> {
        binding::install_legacy_hooks(&self.bus, registry)
    }

    fn dispatch(&mut self, dispatch: &Dispatch) -> Result<EventOutcome, CanvasError> {
        let fired = dispatch.fire(&self.bus);
        if dispatch.commits_touches() {
            self.input.commit_touches();
        }
        fired
    }

    // --- Sizing ---

    #[must_use]
    pub fn surface(&self) -> Surface {
        self.sizer.surface()
    }

    #[must_use]
    pub fn dpr(&self) -> f64 {
        self.ratio.ratio()
    }

    /// Logical size: buffer dimensions divided by the pixel ratio.
    #[must_use]
    pub fn size(&self) -> Size {
        self.sizer.logical_size(self.ratio.ratio())
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.size().width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.size().height
    }

    /// Resize either dimension in logical units, re-reading the pixel ratio first.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the host rejects the context scale.
    pub fn set_size(&mut self, width: Option<f64>, height: Option<f64>) -> Result<(), CanvasError> {
        let dpr = self.ratio.force_update(&self.host);
        self.sizer.set_size(&mut self.host, dpr, width, height)
    }

    /// # Errors
    ///
    /// See [`Engine::set_size`].
    pub fn set_width(&mut self, width: f64) -> Result<(), CanvasError> {
        self.set_size(Some(width), None)
    }

    /// # Errors
    ///
    /// See [`Engine::set_size`].
    pub fn set_height(&mut self, height: f64) -> Result<(), CanvasError> {
        self.set_size(None, Some(height))
    }

    /// Device/layout pixels to logical units for the surface as currently displayed.
    #[must_use]
    pub fn coordinate_map(&self) -> CoordinateMap {
        CoordinateMap::new(self.host.bounding_rect(), self.size())
    }

    // --- Host-driven resize and pixel-ratio changes ---

    /// The viewport changed size: refit in fullscreen mode, then `resize`.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the refit fails.
    pub fn apply_viewport_resize(&mut self) -> Result<Dispatch, CanvasError> {
        if self.sizer.mode() == SizingMode::Fullscreen {
            self.fit_to_mode()?;
        }
        Ok(Dispatch::new(vec![CanvasEvent::Resize(self.size())], EventOutcome::default()))
    }

    /// The parent container changed size: refit in responsive mode, then `resize`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the container is gone, or `Render` if the refit fails.
    pub fn apply_container_resize(&mut self) -> Result<Dispatch, CanvasError> {
        if self.sizer.mode() == SizingMode::Responsive {
            self.fit_to_mode()?;
        }
        Ok(Dispatch::new(vec![CanvasEvent::Resize(self.size())], EventOutcome::default()))
    }

    /// The armed pixel-ratio watcher fired: re-arm, re-derive the buffer from
    /// the last requested size, then `dprChange`.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the refit fails.
    pub fn apply_pixel_ratio_change(&mut self) -> Result<Dispatch, CanvasError> {
        let ratio = self.ratio.handle_change(&mut self.host);
        self.sizer.refit(&mut self.host, ratio)?;
        Ok(Dispatch::new(vec![CanvasEvent::DprChange { ratio }], EventOutcome::default()))
    }

    /// # Errors
    ///
    /// Refit failures or the first listener error.
    pub fn handle_viewport_resize(&mut self) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_viewport_resize()?;
        self.dispatch(&dispatch)
    }

    /// # Errors
    ///
    /// Refit failures or the first listener error.
    pub fn handle_container_resize(&mut self) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_container_resize()?;
        self.dispatch(&dispatch)
    }

    /// # Errors
    ///
    /// Refit failures or the first listener error.
    pub fn handle_pixel_ratio_change(&mut self) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_pixel_ratio_change()?;
        self.dispatch(&dispatch)
    }

    // --- Raw input: state phase ---

    pub fn apply_key_down(&mut self, input: KeyInput) -> Dispatch {
        self.input.key_down(&input);
        Dispatch::new(vec![CanvasEvent::KeyDown(input)], EventOutcome::prevent_if(self.config.disable_key_shortcuts))
    }

    pub fn apply_key_up(&mut self, input: KeyInput) -> Dispatch {
        self.input.key_up(&input);
        Dispatch::new(vec![CanvasEvent::KeyUp(input)], EventOutcome::default())
    }

    /// Fires `mousemove`, then `pan` while panning.
    pub fn apply_mouse_move(&mut self, input: PointerInput) -> Dispatch {
        let map = self.coordinate_map();
        let pan = self.input.mouse_move(&input, &map);
        let mut events = vec![CanvasEvent::MouseMove(input)];
        events.extend(pan.map(CanvasEvent::Pan));
        Dispatch::new(events, EventOutcome::default())
    }

    pub fn apply_mouse_down(&mut self, input: PointerInput) -> Dispatch {
        self.input.mouse_down(&input);
        let outcome = EventOutcome::prevent_if(input.button == 1 && self.config.disable_middle_mouse);
        Dispatch::new(vec![CanvasEvent::MouseDown(input)], outcome)
    }

    pub fn apply_mouse_up(&mut self, input: PointerInput) -> Dispatch {
        self.input.mouse_up(&input);
        Dispatch::new(vec![CanvasEvent::MouseUp(input)], EventOutcome::default())
    }

    pub fn apply_context_menu(&mut self, input: PointerInput) -> Dispatch {
        Dispatch::new(vec![CanvasEvent::ContextMenu(input)], EventOutcome::prevent_if(self.config.disable_context_menu))
    }

    pub fn apply_wheel(&mut self, input: WheelInput) -> Dispatch {
        self.input.wheel(&input);
        Dispatch::new(vec![CanvasEvent::Scroll(input)], EventOutcome::default())
    }

    pub fn apply_touch_start(&mut self, input: TouchInput) -> Dispatch {
        let map = self.coordinate_map();
        self.input.touch_start(&input, &map);
        Dispatch::touch(vec![CanvasEvent::TouchStart(input)], self.touch_outcome())
    }

    /// Fires `touchmove`, then `pan` while panning, then `pinch` for two-finger moves.
    pub fn apply_touch_move(&mut self, input: TouchInput) -> Dispatch {
        let map = self.coordinate_map();
        let gestures = self.input.touch_move(&input, &map);
        let mut events = vec![CanvasEvent::TouchMove(input)];
        events.extend(gestures.pan.map(CanvasEvent::Pan));
        events.extend(gestures.pinch.map(CanvasEvent::Pinch));
        Dispatch::touch(events, self.touch_outcome())
    }

    pub fn apply_touch_end(&mut self, input: TouchInput) -> Dispatch {
        let map = self.coordinate_map();
        self.input.touch_end(&input, &map);
        Dispatch::touch(vec![CanvasEvent::TouchEnd(input)], self.touch_outcome())
    }

    fn touch_outcome(&self) -> EventOutcome {
        EventOutcome::prevent_if(self.config.disable_scroll_on_mobile)
    }

    // --- Raw input: both phases ---

    /// # Errors
    ///
    /// Returns the first listener error.
    pub fn handle_key_down(&mut self, input: KeyInput) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_key_down(input);
        self.dispatch(&dispatch)
    }

    /// # Errors
    ///
    /// Returns the first listener error.
    pub fn handle_key_up(&mut self, input: KeyInput) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_key_up(input);
        self.dispatch(&dispatch)
    }

    /// # Errors
    ///
    /// Returns the first listener error.
    pub fn handle_mouse_move(&mut self, input: PointerInput) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_mouse_move(input);
        self.dispatch(&dispatch)
    }

    /// # Errors
    ///
    /// Returns the first listener error.
    pub fn handle_mouse_down(&mut self, input: PointerInput) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_mouse_down(input);
        self.dispatch(&dispatch)
    }

    /// # Errors
    ///
    /// Returns the first listener error.
    pub fn handle_mouse_up(&mut self, input: PointerInput) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_mouse_up(input);
        self.dispatch(&dispatch)
    }

    /// # Errors
    ///
    /// Returns the first listener error.
    pub fn handle_context_menu(&mut self, input: PointerInput) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_context_menu(input);
        self.dispatch(&dispatch)
    }

    /// # Errors
    ///
    /// Returns the first listener error.
    pub fn handle_wheel(&mut self, input: WheelInput) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_wheel(input);
        self.dispatch(&dispatch)
    }

    /// # Errors
    ///
    /// Returns the first listener error. The touch snapshot is taken regardless.
    pub fn handle_touch_start(&mut self, input: TouchInput) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_touch_start(input);
        self.dispatch(&dispatch)
    }

    /// # Errors
    ///
    /// Returns the first listener error. The touch snapshot is taken regardless.
    pub fn handle_touch_move(&mut self, input: TouchInput) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_touch_move(input);
        self.dispatch(&dispatch)
    }

    /// # Errors
    ///
    /// Returns the first listener error. The touch snapshot is taken regardless.
    pub fn handle_touch_end(&mut self, input: TouchInput) -> Result<EventOutcome, CanvasError> {
        let dispatch = self.apply_touch_end(input);
        self.dispatch(&dispatch)
    }

    // --- Input queries ---

    #[must_use]
    pub fn mouse(&self) -> &MouseState {
        &self.input.mouse
    }

    #[must_use]
    pub fn touch(&self) -> &TouchState {
        &self.input.touch
    }

    #[must_use]
    pub fn keys(&self) -> &KeyState {
        &self.input.keys
    }

    #[must_use]
    pub fn pan(&self) -> PanState {
        self.input.pan
    }

    /// Whether a key is held, by name (`"a"`), code (`"KeyA"`) or legacy code (`65`).
    #[must_use]
    pub fn key<'q>(&self, query: impl Into<KeyQuery<'q>>) -> bool {
        self.input.keys.is_down(query)
    }

    #[must_use]
    pub fn is_ctrl_pressed(&self) -> bool {
        self.input.keys.ctrl()
    }

    #[must_use]
    pub fn is_alt_pressed(&self) -> bool {
        self.input.keys.alt()
    }

    #[must_use]
    pub fn is_shift_pressed(&self) -> bool {
        self.input.keys.shift()
    }

    // --- Drawing ---

    pub fn clear_screen(&mut self) {
        let size = self.size();
        draw::clear_screen(&mut self.host, size);
    }

    pub fn background(&mut self, paint: &Paint) {
        let size = self.size();
        draw::background(&mut self.host, paint, size);
    }

    /// Add an arc to the current path.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the host rejects the arc.
    pub fn arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        counterclockwise: bool,
    ) -> Result<(), CanvasError> {
        self.host.arc(center, radius, start, end, counterclockwise)
    }

    /// # Errors
    ///
    /// Returns `Render` if the host rejects the arc.
    pub fn circle(&mut self, center: Point, radius: f64, style: ShapeStyle<'_>) -> Result<(), CanvasError> {
        draw::circle(&mut self.host, center, radius, style)
    }

    /// # Errors
    ///
    /// Returns `Render` if the host rejects the arc.
    pub fn ring(
        &mut self,
        center: Point,
        radius: f64,
        color: &str,
        line_width: Option<f64>,
    ) -> Result<(), CanvasError> {
        draw::ring(&mut self.host, center, radius, color, line_width)
    }

    /// # Errors
    ///
    /// Returns `Render` if the host rejects the ellipse.
    pub fn ellipse(
        &mut self,
        center: Point,
        radii: Size,
        rotation: f64,
        style: ShapeStyle<'_>,
    ) -> Result<(), CanvasError> {
        draw::ellipse(&mut self.host, center, radii, rotation, style)
    }

    pub fn rectangle(&mut self, rect: Rect, style: ShapeStyle<'_>) {
        draw::rectangle(&mut self.host, rect, style);
    }

    pub fn pixel_perfect_rectangle(&mut self, rect: Rect, style: ShapeStyle<'_>) {
        let dpr = self.dpr();
        draw::pixel_perfect_rectangle(&mut self.host, rect, dpr, style);
    }

    /// # Errors
    ///
    /// Returns `Render` if the host rejects a corner arc.
    pub fn rounded_rectangle(
        &mut self,
        rect: Rect,
        radii: CornerRadii,
        style: ShapeStyle<'_>,
    ) -> Result<(), CanvasError> {
        draw::rounded_rectangle(&mut self.host, rect, radii, style)
    }

    pub fn triangle(&mut self, corners: [Point; 3], style: ShapeStyle<'_>) {
        draw::triangle(&mut self.host, corners, style);
    }

    pub fn line(&mut self, from: Point, to: Point, color: Option<&str>, weight: Option<f64>) {
        draw::line(&mut self.host, from, to, color, weight);
    }

    pub fn pixel_perfect_line(&mut self, from: Point, to: Point, color: Option<&str>, weight: f64) {
        let dpr = self.dpr();
        draw::pixel_perfect_line(&mut self.host, from, to, dpr, color, weight);
    }

    pub fn polygon(&mut self, points: &[Point], offset: Point, closed: bool, style: ShapeStyle<'_>) {
        draw::polygon(&mut self.host, points, offset, closed, style);
    }

    /// Draw text in the current font family and weight.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the host fails to draw the text.
    pub fn text(&mut self, content: &str, at: Point, size: f64, style: ShapeStyle<'_>) -> Result<(), CanvasError> {
        draw::text(&mut self.host, &self.font, content, at, size, style)
    }

    /// # Errors
    ///
    /// Returns `Render` if the host rejects the arc of a zero vector's dot.
    pub fn draw_vector(&mut self, origin: Point, vector: Point, scale: f64, color: &str) -> Result<(), CanvasError> {
        draw::draw_vector(&mut self.host, origin, vector, scale, color)
    }

    /// # Errors
    ///
    /// Returns `Render` if the host fails to draw a loaded image.
    pub fn picture(&mut self, source: &str, at: Point, size: Option<Size>) -> Result<(), CanvasError> {
        draw::picture(&mut self.host, source, at, size)
    }

    /// # Errors
    ///
    /// Returns `Render` if the host fails to draw a loaded image.
    pub fn clipped_picture(
        &mut self,
        source: &str,
        clip: Rect,
        at: Point,
        size: Option<Size>,
    ) -> Result<(), CanvasError> {
        draw::clipped_picture(&mut self.host, source, clip, at, size)
    }

    #[must_use]
    pub fn gradient(&self, start_color: &str, end_color: &str, from: Point, to: Point) -> Paint {
        draw::gradient(start_color, end_color, from, to)
    }

    // --- Transforms and paths ---

    pub fn save(&mut self) {
        self.host.save();
    }

    pub fn restore(&mut self) {
        self.host.restore();
    }

    /// # Errors
    ///
    /// Returns `Render` if the host rejects the transform.
    pub fn rotate(&mut self, angle: f64) -> Result<(), CanvasError> {
        self.host.rotate(angle)
    }

    /// # Errors
    ///
    /// Returns `Render` if the host rejects the transform.
    pub fn translate(&mut self, x: f64, y: f64) -> Result<(), CanvasError> {
        self.host.translate(x, y)
    }

    pub fn begin_path(&mut self) {
        self.host.begin_path();
    }

    pub fn close_path(&mut self) {
        self.host.close_path();
    }

    /// Move the pen without drawing.
    pub fn pen_to(&mut self, to: Point) {
        self.host.move_to(to);
    }

    pub fn line_to(&mut self, to: Point) {
        self.host.line_to(to);
    }

    pub fn quadratic_to(&mut self, control: Point, to: Point) {
        self.host.quadratic_curve_to(control, to);
    }

    pub fn bezier_to(&mut self, control1: Point, control2: Point, to: Point) {
        self.host.bezier_curve_to(control1, control2, to);
    }

    pub fn fill(&mut self) {
        self.host.fill();
    }

    pub fn stroke(&mut self) {
        self.host.stroke();
    }

    pub fn clip(&mut self) {
        self.host.clip();
    }

    // --- Style ---

    pub fn fill_style(&mut self, paint: &Paint) {
        self.host.set_fill(paint);
    }

    pub fn stroke_style(&mut self, paint: &Paint) {
        self.host.set_stroke(paint);
    }

    pub fn line_width(&mut self, width: f64) {
        self.host.set_line_width(width);
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.host.set_line_cap(cap);
    }

    pub fn reset_line_cap(&mut self) {
        self.host.set_line_cap(LineCap::default());
    }

    /// Font family for subsequent `text` calls.
    pub fn set_font(&mut self, family: &str) {
        family.clone_into(&mut self.font.family);
    }

    pub fn set_font_weight(&mut self, weight: &str) {
        weight.clone_into(&mut self.font.weight);
    }

    #[must_use]
    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.host.set_text_align(align);
    }

    pub fn set_text_align_y(&mut self, baseline: TextBaseline) {
        self.host.set_text_baseline(baseline);
    }

    pub fn reset_text_align(&mut self) {
        self.host.set_text_align(TextAlign::default());
    }

    pub fn reset_text_align_y(&mut self) {
        self.host.set_text_baseline(TextBaseline::default());
    }

    // --- Shadow ---

    pub fn set_shadow_offset(&mut self, offset: Point) {
        self.host.set_shadow_offset(offset);
    }

    pub fn set_shadow_blur(&mut self, blur: f64) {
        self.host.set_shadow_blur(blur);
    }

    pub fn set_shadow_color(&mut self, color: &str) {
        self.host.set_shadow_color(color);
    }

    /// Apply a CSS-like `"Xpx Ypx Bpx color"` shadow.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the string does not parse.
    pub fn apply_shadow(&mut self, css: &str) -> Result<(), CanvasError> {
        Shadow::parse_css(css)?.apply(&mut self.host);
        Ok(())
    }

    pub fn clear_shadow(&mut self) {
        Shadow::none().apply(&mut self.host);
    }

    // --- Pixels ---

    /// Capture the whole physical buffer for pixel access.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the host cannot read the buffer.
    pub fn get_pixel_data(&mut self) -> Result<(), CanvasError> {
        let surface = self.sizer.surface();
        self.pixels = Some(self.host.read_pixels(surface.buffer_width, surface.buffer_height)?);
        Ok(())
    }

    fn captured(&self, operation: &'static str) -> Result<&PixelBuffer, CanvasError> {
        self.pixels.as_ref().ok_or(CanvasError::Precondition { operation })
    }

    fn captured_mut(&mut self, operation: &'static str) -> Result<&mut PixelBuffer, CanvasError> {
        self.pixels.as_mut().ok_or(CanvasError::Precondition { operation })
    }

    /// # Errors
    ///
    /// `Precondition` before a capture, `PixelOutOfBounds` outside the buffer.
    pub fn update_pixel(&mut self, x: u32, y: u32, rgba: Rgba) -> Result<(), CanvasError> {
        self.captured_mut("update_pixel")?.set(x, y, rgba)
    }

    /// # Errors
    ///
    /// `Precondition` before a capture, `PixelOutOfBounds` past the end.
    pub fn update_pixel_index(&mut self, index: usize, rgba: Rgba) -> Result<(), CanvasError> {
        self.captured_mut("update_pixel_index")?.set_index(index, rgba)
    }

    /// # Errors
    ///
    /// `Precondition` before a capture, `PixelOutOfBounds` outside the buffer.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Rgba, CanvasError> {
        self.captured("get_pixel")?.get(x, y)
    }

    /// # Errors
    ///
    /// `Precondition` before a capture, `PixelOutOfBounds` past the end.
    pub fn get_pixel_index(&self, index: usize) -> Result<Rgba, CanvasError> {
        self.captured("get_pixel_index")?.get_index(index)
    }

    /// Write the capture back with its corner at logical `at`.
    ///
    /// # Errors
    ///
    /// `Precondition` before a capture, `Render` if the host cannot write.
    pub fn render_pixel_data(&mut self, at: Point) -> Result<(), CanvasError> {
        let dpr = self.dpr();
        let pixels = self.pixels.as_ref().ok_or(CanvasError::Precondition { operation: "render_pixel_data" })?;
        self.host.write_pixels(pixels, Point::new(at.x * dpr, at.y * dpr))
    }

    // --- Host controls ---

    pub fn set_cursor(&mut self, cursor: &str) {
        self.host.set_cursor(cursor);
    }

    /// # Errors
    ///
    /// Returns `Render` if the platform refuses.
    pub fn request_fullscreen(&mut self) -> Result<(), CanvasError> {
        self.host.request_fullscreen()
    }

    /// # Errors
    ///
    /// Returns `Render` if the platform refuses.
    pub fn exit_fullscreen(&mut self) -> Result<(), CanvasError> {
        self.host.exit_fullscreen()
    }

    pub fn lock_pointer(&mut self) {
        self.host.lock_pointer();
    }

    pub fn unlock_pointer(&mut self) {
        self.host.unlock_pointer();
    }
}
