//! End-to-end flows through the public API with a minimal in-memory host.

#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use gamecanvas::events::{KeyInput, Modifiers, PointerInput, RawTouch, TouchInput};
use gamecanvas::host::HostControls;
use gamecanvas::pixel_ratio::PixelRatioSource;
use gamecanvas::pixels::PixelBuffer;
use gamecanvas::render::{ImageDraw, LineCap, Paint, Renderer, TextAlign, TextBaseline};
use gamecanvas::surface::{ContentBox, SurfaceTarget};
use gamecanvas::{
    CanvasConfig, CanvasError, CanvasEvent, Engine, Point, Rect, Registry, SharedEngine, Size, bind_public,
    dispatch_shared,
};
use serde_json::json;

/// Draw calls are counted, not recorded; sizes and the pixel ratio are live.
#[derive(Default)]
struct PageHost {
    ratio: f64,
    style: Size,
    buffer: (u32, u32),
    fills: Vec<String>,
    shapes: usize,
    cursor: String,
}

impl PageHost {
    fn at_ratio(ratio: f64) -> Self {
        Self { ratio, ..Self::default() }
    }
}

impl Renderer for PageHost {
    fn set_scale(&mut self, _scale: f64) -> Result<(), CanvasError> {
        Ok(())
    }
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn rotate(&mut self, _angle: f64) -> Result<(), CanvasError> {
        Ok(())
    }
    fn translate(&mut self, _x: f64, _y: f64) -> Result<(), CanvasError> {
        Ok(())
    }
    fn clear_rect(&mut self, _rect: Rect) {}
    fn fill_rect(&mut self, _rect: Rect) {
        self.shapes += 1;
    }
    fn begin_path(&mut self) {}
    fn close_path(&mut self) {}
    fn move_to(&mut self, _to: Point) {}
    fn line_to(&mut self, _to: Point) {}
    fn rect(&mut self, _rect: Rect) {
        self.shapes += 1;
    }
    fn quadratic_curve_to(&mut self, _control: Point, _to: Point) {}
    fn bezier_curve_to(&mut self, _c1: Point, _c2: Point, _to: Point) {}
    fn arc(&mut self, _c: Point, _r: f64, _s: f64, _e: f64, _ccw: bool) -> Result<(), CanvasError> {
        self.shapes += 1;
        Ok(())
    }
    fn ellipse(&mut self, _c: Point, _r: Size, _rot: f64, _s: f64, _e: f64) -> Result<(), CanvasError> {
        self.shapes += 1;
        Ok(())
    }
    fn fill(&mut self) {}
    fn stroke(&mut self) {}
    fn clip(&mut self) {}
    fn set_fill(&mut self, paint: &Paint) {
        if let Paint::Color(color) = paint {
            self.fills.push(color.clone());
        }
    }
    fn set_stroke(&mut self, _paint: &Paint) {}
    fn set_line_width(&mut self, _width: f64) {}
    fn set_line_cap(&mut self, _cap: LineCap) {}
    fn set_font(&mut self, _font: &str) {}
    fn set_text_align(&mut self, _align: TextAlign) {}
    fn set_text_baseline(&mut self, _baseline: TextBaseline) {}
    fn set_shadow_offset(&mut self, _offset: Point) {}
    fn set_shadow_blur(&mut self, _blur: f64) {}
    fn set_shadow_color(&mut self, _color: &str) {}
    fn fill_text(&mut self, _text: &str, _at: Point) -> Result<(), CanvasError> {
        Ok(())
    }
    fn stroke_text(&mut self, _text: &str, _at: Point) -> Result<(), CanvasError> {
        Ok(())
    }
    fn draw_image(&mut self, _image: &ImageDraw) -> Result<(), CanvasError> {
        Ok(())
    }
    fn read_pixels(&mut self, width: u32, height: u32) -> Result<PixelBuffer, CanvasError> {
        PixelBuffer::from_raw(width, height, vec![0; width as usize * height as usize * 4])
    }
    fn write_pixels(&mut self, _pixels: &PixelBuffer, _at: Point) -> Result<(), CanvasError> {
        Ok(())
    }
}

impl SurfaceTarget for PageHost {
    fn set_buffer_width(&mut self, pixels: u32) {
        self.buffer.0 = pixels;
    }
    fn set_buffer_height(&mut self, pixels: u32) {
        self.buffer.1 = pixels;
    }
    fn set_style_width(&mut self, css_pixels: f64) {
        self.style.width = css_pixels;
    }
    fn set_style_height(&mut self, css_pixels: f64) {
        self.style.height = css_pixels;
    }
    fn bounding_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.style.width, self.style.height)
    }
    fn viewport_size(&self) -> Size {
        Size::new(1024.0, 768.0)
    }
    fn container_box(&self) -> Option<ContentBox> {
        None
    }
}

impl PixelRatioSource for PageHost {
    fn device_pixel_ratio(&self) -> Option<f64> {
        Some(self.ratio)
    }
    fn watch_pixel_ratio(&mut self, _ratio: f64) {}
    fn unwatch_pixel_ratio(&mut self) {}
}

impl HostControls for PageHost {
    fn set_cursor(&mut self, cursor: &str) {
        self.cursor = cursor.to_owned();
    }
    fn request_fullscreen(&mut self) -> Result<(), CanvasError> {
        Ok(())
    }
    fn exit_fullscreen(&mut self) -> Result<(), CanvasError> {
        Ok(())
    }
    fn lock_pointer(&mut self) {}
    fn unlock_pointer(&mut self) {}
}

// =============================================================
// Helpers
// =============================================================

fn page(ratio: f64) -> SharedEngine<PageHost> {
    let config = CanvasConfig { width: Some(400.0), height: Some(300.0), ..CanvasConfig::default() };
    Rc::new(RefCell::new(Engine::new(PageHost::at_ratio(ratio), &config).unwrap()))
}

/// Records the name of every event fired under `names`.
fn record(engine: &SharedEngine<PageHost>, names: &[&str]) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for name in names {
        let sink = Rc::clone(&log);
        engine.borrow().on(name, move |event: &CanvasEvent| {
            sink.borrow_mut().push(event.name().to_owned());
            Ok(())
        });
    }
    log
}

fn pointer(x: f64, y: f64, dx: f64, dy: f64) -> PointerInput {
    PointerInput { client: Point::new(x, y), movement: Point::new(dx, dy), button: 0, modifiers: Modifiers::default() }
}

fn touch(id: i64, x: f64, y: f64) -> RawTouch {
    RawTouch { page: Point::new(x, y), id, force: 1.0, radius_x: 1.0, radius_y: 1.0, rotation_angle: 0.0 }
}

// =============================================================
// Flows
// =============================================================

#[test]
fn mouse_drag_pans_until_release() {
    let engine = page(1.0);
    let log = record(&engine, &["mousedown", "mousemove", "pan", "mouseup"]);

    engine.borrow_mut().handle_mouse_move(pointer(5.0, 5.0, 0.0, 0.0)).unwrap();
    engine.borrow_mut().handle_mouse_down(pointer(5.0, 5.0, 0.0, 0.0)).unwrap();
    engine.borrow_mut().handle_mouse_move(pointer(25.0, 15.0, 20.0, 10.0)).unwrap();
    engine.borrow_mut().handle_mouse_up(pointer(25.0, 15.0, 0.0, 0.0)).unwrap();
    engine.borrow_mut().handle_mouse_move(pointer(30.0, 15.0, 5.0, 0.0)).unwrap();

    assert_eq!(*log.borrow(), ["mousemove", "mousedown", "mousemove", "pan", "mouseup", "mousemove"]);
    let e = engine.borrow();
    assert_eq!((e.mouse().x, e.mouse().y), (30.0, 15.0));
    assert_eq!((e.mouse().last_x, e.mouse().last_y), (25.0, 15.0));
    assert!(!e.pan().is_panning);
}

#[test]
fn two_finger_squeeze_reports_positive_pinch() {
    let engine = page(1.0);
    let pinches = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&pinches);
    engine.borrow().on("pinch", move |event| {
        if let CanvasEvent::Pinch(p) = event {
            sink.borrow_mut().push(p.pinch);
        }
        Ok(())
    });

    engine
        .borrow_mut()
        .handle_touch_start(TouchInput::new(vec![touch(1, 100.0, 100.0), touch(2, 200.0, 100.0)]))
        .unwrap();
    engine
        .borrow_mut()
        .handle_touch_move(TouchInput::new(vec![touch(1, 140.0, 100.0), touch(2, 160.0, 100.0)]))
        .unwrap();

    assert_eq!(pinches.borrow().len(), 1);
    assert!(pinches.borrow()[0] > 0.0);

    engine.borrow_mut().handle_touch_end(TouchInput::new(Vec::new())).unwrap();
    assert!(!engine.borrow().touch().is_touching);
    assert!(!engine.borrow().pan().is_panning);
}

#[test]
fn key_state_answers_every_query_convention() {
    let engine = page(1.0);
    let shift = KeyInput {
        key: "Shift".into(),
        code: "ShiftLeft".into(),
        key_code: 16,
        modifiers: Modifiers { shift: true, ..Modifiers::default() },
    };
    engine.borrow_mut().handle_key_down(shift.clone()).unwrap();
    {
        let e = engine.borrow();
        assert!(e.is_shift_pressed());
        assert!(e.key("ShiftLeft"));
        assert!(e.key(16_u32));
    }
    let release = KeyInput { modifiers: Modifiers::default(), ..shift };
    engine.borrow_mut().handle_key_up(release).unwrap();
    assert!(!engine.borrow().is_shift_pressed());
    assert!(!engine.borrow().key("Shift"));
}

#[test]
fn pixel_ratio_change_rescales_buffer_but_not_logical_size() {
    let engine = page(1.0);
    let log = record(&engine, &["dprChange"]);

    engine.borrow_mut().host_mut().ratio = 2.0;
    engine.borrow_mut().handle_pixel_ratio_change().unwrap();

    let e = engine.borrow();
    assert_eq!(*log.borrow(), ["dprChange"]);
    assert_eq!(e.size(), Size::new(400.0, 300.0));
    assert_eq!(e.host().buffer, (800, 600));
}

#[test]
fn listeners_draw_through_the_shared_engine() {
    let engine = page(1.0);
    let mut registry = Registry::new();
    bind_public(&engine, &mut registry).unwrap();

    let circle = registry.get("circle").and_then(gamecanvas::Binding::callable).unwrap();
    engine.borrow().on("mousedown", move |_| {
        circle(&[json!(10), json!(10), json!(4), json!("gold")])
            .map(drop)
            .map_err(CanvasError::into_listener_error)
    });

    dispatch_shared(&engine, |e| Ok(e.apply_mouse_down(pointer(1.0, 1.0, 0.0, 0.0)))).unwrap();
    registry.call("setCursor", &[json!("crosshair")]).unwrap();

    let e = engine.borrow();
    assert_eq!(e.host().fills, ["gold"]);
    assert_eq!(e.host().shapes, 1);
    assert_eq!(e.host().cursor, "crosshair");
}

#[test]
fn custom_events_reach_registered_listeners() {
    let engine = page(1.0);
    let log = record(&engine, &["scored"]);
    assert!(!engine.borrow().emit("missed", json!(null)).unwrap());
    assert!(engine.borrow().emit("scored", json!({ "points": 3 })).unwrap());
    assert_eq!(*log.borrow(), ["scored"]);
}
