//! Recording fake host for unit tests.
//!
//! Every capability call is appended to `calls` as a short space-separated
//! line (`"arc 10 20 5 0 6.283185307179586 false"`), so tests can assert
//! exact renderer sequences without a browser.

use crate::error::CanvasError;
use crate::geom::{Point, Rect, Size};
use crate::host::HostControls;
use crate::pixel_ratio::PixelRatioSource;
use crate::pixels::PixelBuffer;
use crate::render::{ImageDraw, LineCap, Paint, Renderer, TextAlign, TextBaseline};
use crate::surface::{ContentBox, SurfaceTarget};

#[derive(Debug)]
pub struct TestHost {
    pub calls: Vec<String>,
    pub dpr: Option<f64>,
    /// Top-left of the element on screen.
    pub origin: Point,
    /// On-screen size relative to the style size (CSS transforms, zoom).
    pub display_scale: f64,
    pub viewport: Size,
    pub container: Option<ContentBox>,
    pub style: Size,
    pub buffer: (u32, u32),
    /// Makes every fallible renderer call fail with `Render`.
    pub fail_render: bool,
}

impl Default for TestHost {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            dpr: Some(1.0),
            origin: Point::default(),
            display_scale: 1.0,
            viewport: Size::new(800.0, 600.0),
            container: None,
            style: Size::new(300.0, 150.0),
            buffer: (300, 150),
            fail_render: false,
        }
    }
}

impl TestHost {
    pub fn with_dpr(dpr: f64) -> Self {
        Self { dpr: Some(dpr), ..Self::default() }
    }

    /// Calls recorded so far, leaving the log empty.
    pub fn take_calls(&mut self) -> Vec<String> {
        std::mem::take(&mut self.calls)
    }

    /// Calls whose first word is `name`.
    pub fn calls_named(&self, name: &str) -> Vec<String> {
        self.calls.iter().filter(|c| c.split(' ').next() == Some(name)).cloned().collect()
    }

    fn record(&mut self, call: String) {
        self.calls.push(call);
    }

    fn fallible(&mut self, call: String) -> Result<(), CanvasError> {
        if self.fail_render {
            return Err(CanvasError::Render(format!("refused {call}")));
        }
        self.record(call);
        Ok(())
    }
}

fn paint_label(paint: &Paint) -> String {
    match paint {
        Paint::Color(color) => color.clone(),
        Paint::LinearGradient(g) => format!("gradient({}->{})", g.start_color, g.end_color),
    }
}

impl Renderer for TestHost {
    fn set_scale(&mut self, scale: f64) -> Result<(), CanvasError> {
        self.fallible(format!("set_scale {scale}"))
    }

    fn save(&mut self) {
        self.record("save".into());
    }

    fn restore(&mut self) {
        self.record("restore".into());
    }

    fn rotate(&mut self, angle: f64) -> Result<(), CanvasError> {
        self.fallible(format!("rotate {angle}"))
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), CanvasError> {
        self.fallible(format!("translate {x} {y}"))
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.record(format!("clear_rect {} {} {} {}", rect.x, rect.y, rect.width, rect.height));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.record(format!("fill_rect {} {} {} {}", rect.x, rect.y, rect.width, rect.height));
    }

    fn begin_path(&mut self) {
        self.record("begin_path".into());
    }

    fn close_path(&mut self) {
        self.record("close_path".into());
    }

    fn move_to(&mut self, to: Point) {
        self.record(format!("move_to {} {}", to.x, to.y));
    }

    fn line_to(&mut self, to: Point) {
        self.record(format!("line_to {} {}", to.x, to.y));
    }

    fn rect(&mut self, rect: Rect) {
        self.record(format!("rect {} {} {} {}", rect.x, rect.y, rect.width, rect.height));
    }

    fn quadratic_curve_to(&mut self, control: Point, to: Point) {
        self.record(format!("quadratic_curve_to {} {} {} {}", control.x, control.y, to.x, to.y));
    }

    fn bezier_curve_to(&mut self, control1: Point, control2: Point, to: Point) {
        self.record(format!(
            "bezier_curve_to {} {} {} {} {} {}",
            control1.x, control1.y, control2.x, control2.y, to.x, to.y
        ));
    }

    fn arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        counterclockwise: bool,
    ) -> Result<(), CanvasError> {
        if radius < 0.0 {
            return Err(CanvasError::Render(format!("negative radius {radius}")));
        }
        self.fallible(format!("arc {} {} {radius} {start} {end} {counterclockwise}", center.x, center.y))
    }

    fn ellipse(&mut self, center: Point, radii: Size, rotation: f64, start: f64, end: f64) -> Result<(), CanvasError> {
        self.fallible(format!(
            "ellipse {} {} {} {} {rotation} {start} {end}",
            center.x, center.y, radii.width, radii.height
        ))
    }

    fn fill(&mut self) {
        self.record("fill".into());
    }

    fn stroke(&mut self) {
        self.record("stroke".into());
    }

    fn clip(&mut self) {
        self.record("clip".into());
    }

    fn set_fill(&mut self, paint: &Paint) {
        self.record(format!("set_fill {}", paint_label(paint)));
    }

    fn set_stroke(&mut self, paint: &Paint) {
        self.record(format!("set_stroke {}", paint_label(paint)));
    }

    fn set_line_width(&mut self, width: f64) {
        self.record(format!("set_line_width {width}"));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.record(format!("set_line_cap {}", cap.as_str()));
    }

    fn set_font(&mut self, font: &str) {
        self.record(format!("set_font {font}"));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.record(format!("set_text_align {}", align.as_str()));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.record(format!("set_text_baseline {}", baseline.as_str()));
    }

    fn set_shadow_offset(&mut self, offset: Point) {
        self.record(format!("set_shadow_offset {} {}", offset.x, offset.y));
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.record(format!("set_shadow_blur {blur}"));
    }

    fn set_shadow_color(&mut self, color: &str) {
        self.record(format!("set_shadow_color {color}"));
    }

    fn fill_text(&mut self, text: &str, at: Point) -> Result<(), CanvasError> {
        self.fallible(format!("fill_text {text} {} {}", at.x, at.y))
    }

    fn stroke_text(&mut self, text: &str, at: Point) -> Result<(), CanvasError> {
        self.fallible(format!("stroke_text {text} {} {}", at.x, at.y))
    }

    fn draw_image(&mut self, image: &ImageDraw) -> Result<(), CanvasError> {
        let mut call = format!("draw_image {} {} {}", image.source, image.dest.x, image.dest.y);
        if let Some(size) = image.size {
            call.push_str(&format!(" size {} {}", size.width, size.height));
        }
        if let Some(clip) = image.clip {
            call.push_str(&format!(" clip {} {} {} {}", clip.x, clip.y, clip.width, clip.height));
        }
        self.fallible(call)
    }

    fn read_pixels(&mut self, width: u32, height: u32) -> Result<PixelBuffer, CanvasError> {
        self.fallible(format!("read_pixels {width} {height}"))?;
        Ok(PixelBuffer::new(width, height))
    }

    fn write_pixels(&mut self, pixels: &PixelBuffer, at: Point) -> Result<(), CanvasError> {
        self.fallible(format!("write_pixels {} {} {} {}", pixels.width(), pixels.height(), at.x, at.y))
    }
}

impl SurfaceTarget for TestHost {
    fn set_buffer_width(&mut self, pixels: u32) {
        self.buffer.0 = pixels;
        self.record(format!("buffer_width {pixels}"));
    }

    fn set_buffer_height(&mut self, pixels: u32) {
        self.buffer.1 = pixels;
        self.record(format!("buffer_height {pixels}"));
    }

    fn set_style_width(&mut self, css_pixels: f64) {
        self.style.width = css_pixels;
        self.record(format!("style_width {css_pixels}"));
    }

    fn set_style_height(&mut self, css_pixels: f64) {
        self.style.height = css_pixels;
        self.record(format!("style_height {css_pixels}"));
    }

    fn bounding_rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.style.width * self.display_scale,
            self.style.height * self.display_scale,
        )
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn container_box(&self) -> Option<ContentBox> {
        self.container
    }
}

impl PixelRatioSource for TestHost {
    fn device_pixel_ratio(&self) -> Option<f64> {
        self.dpr
    }

    fn watch_pixel_ratio(&mut self, ratio: f64) {
        self.record(format!("watch {ratio}"));
    }

    fn unwatch_pixel_ratio(&mut self) {
        self.record("unwatch".into());
    }
}

impl HostControls for TestHost {
    fn set_cursor(&mut self, cursor: &str) {
        self.record(format!("cursor {cursor}"));
    }

    fn request_fullscreen(&mut self) -> Result<(), CanvasError> {
        self.fallible("request_fullscreen".into())
    }

    fn exit_fullscreen(&mut self) -> Result<(), CanvasError> {
        self.fallible("exit_fullscreen".into())
    }

    fn lock_pointer(&mut self) {
        self.record("lock_pointer".into());
    }

    fn unlock_pointer(&mut self) {
        self.record("unlock_pointer".into());
    }
}
