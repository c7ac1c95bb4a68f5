#![allow(clippy::float_cmp)]

use proptest::prelude::*;

use super::*;
use crate::test_host::TestHost;

fn padded(client_width: f64, client_height: f64, pad: f64) -> ContentBox {
    ContentBox {
        client_width,
        client_height,
        padding: Padding { left: pad, right: pad, top: pad, bottom: pad },
    }
}

// =============================================================
// Pixel math
// =============================================================

#[test]
fn buffer_pixels_rounds_up() {
    assert_eq!(buffer_pixels(100.0, 1.0), 100);
    assert_eq!(buffer_pixels(100.2, 1.0), 101);
    assert_eq!(buffer_pixels(100.5, 2.0), 201);
    assert_eq!(buffer_pixels(33.0, 1.5), 50);
}

#[test]
fn buffer_pixels_clamps_degenerate_input() {
    assert_eq!(buffer_pixels(-5.0, 2.0), 0);
    assert_eq!(buffer_pixels(f64::NAN, 1.0), 0);
    assert_eq!(buffer_pixels(f64::INFINITY, 1.0), u32::MAX);
}

#[test]
fn style_pixels_rounds_to_nearest() {
    assert_eq!(style_pixels(201, 2.0), 101);
    assert_eq!(style_pixels(50, 1.5), 33);
}

#[test]
fn content_size_subtracts_padding() {
    assert_eq!(padded(300.0, 200.0, 10.0).content_size(), Size::new(280.0, 180.0));
}

// =============================================================
// set_size
// =============================================================

#[test]
fn set_size_updates_buffer_style_and_scale() {
    let mut host = TestHost::default();
    let mut sizer = SurfaceSizer::new(SizingMode::Responsive);
    sizer.set_size(&mut host, 2.0, Some(100.5), Some(50.0)).unwrap();

    assert_eq!(
        host.calls,
        vec!["buffer_width 201", "style_width 100.5", "buffer_height 100", "style_height 50", "set_scale 2"]
    );
    let surface = sizer.surface();
    assert_eq!(surface.buffer_width, 201);
    assert_eq!(surface.style_width, 101);
    assert_eq!(surface.buffer_height, 100);
    assert_eq!(surface.style_height, 50);
    assert_eq!(surface.device_pixel_ratio, 2.0);
}

#[test]
fn set_size_with_one_dimension_leaves_the_other() {
    let mut host = TestHost::default();
    let mut sizer = SurfaceSizer::new(SizingMode::Responsive);
    sizer.set_size(&mut host, 1.0, Some(10.0), Some(20.0)).unwrap();
    host.take_calls();

    sizer.set_size(&mut host, 1.0, None, Some(40.0)).unwrap();
    assert_eq!(host.calls, vec!["buffer_height 40", "style_height 40", "set_scale 1"]);
    assert_eq!(sizer.surface().buffer_width, 10);
    assert_eq!(sizer.requested(), Size::new(10.0, 40.0));
}

#[test]
fn logical_size_is_buffer_over_dpr() {
    let mut host = TestHost::default();
    let mut sizer = SurfaceSizer::new(SizingMode::Responsive);
    sizer.set_size(&mut host, 1.5, Some(33.0), Some(10.0)).unwrap();
    assert_eq!(sizer.logical_size(1.5), Size::new(50.0 / 1.5, 15.0 / 1.5));
}

#[test]
fn scale_failure_propagates() {
    let mut host = TestHost { fail_render: true, ..TestHost::default() };
    let mut sizer = SurfaceSizer::new(SizingMode::Responsive);
    let err = sizer.set_size(&mut host, 1.0, Some(10.0), Some(10.0)).unwrap_err();
    assert_eq!(err.error_code(), "E_RENDER");
    // Dimensions were still applied before the transform failed.
    assert_eq!(host.buffer, (10, 10));
}

// =============================================================
// Modes
// =============================================================

#[test]
fn fit_viewport_adds_padding() {
    let mut host = TestHost::default();
    let mut sizer = SurfaceSizer::new(SizingMode::Fullscreen);
    sizer.fit_viewport(&mut host, 1.0, Size::new(800.0, 600.0)).unwrap();
    assert_eq!(sizer.surface().buffer_width, 801);
    assert_eq!(sizer.surface().buffer_height, 601);
}

#[test]
fn fit_container_floors_content_box() {
    let mut host = TestHost::default();
    let mut sizer = SurfaceSizer::new(SizingMode::Responsive);
    sizer.fit_container(&mut host, 2.0, padded(300.7, 200.0, 10.0)).unwrap();
    assert_eq!(sizer.requested(), Size::new(280.0, 180.0));
    assert_eq!(sizer.surface().buffer_width, 560);
}

#[test]
fn refit_reapplies_requested_size_at_new_ratio() {
    let mut host = TestHost::default();
    let mut sizer = SurfaceSizer::new(SizingMode::Static(Size::new(100.0, 50.0)));
    sizer.set_size(&mut host, 1.0, Some(100.0), Some(50.0)).unwrap();

    sizer.refit(&mut host, 3.0).unwrap();
    assert_eq!(sizer.surface().buffer_width, 300);
    assert_eq!(sizer.surface().buffer_height, 150);
    assert_eq!(sizer.surface().style_width, 100);
    assert_eq!(host.calls_named("set_scale").last().map(String::as_str), Some("set_scale 3"));
}

// =============================================================
// Properties
// =============================================================

proptest! {
    #[test]
    fn buffer_is_ceil_and_style_is_round(
        width in 0.0_f64..4000.0,
        height in 0.0_f64..4000.0,
        dpr in 1.0_f64..4.0,
    ) {
        let mut host = TestHost::default();
        let mut sizer = SurfaceSizer::new(SizingMode::Responsive);
        sizer.set_size(&mut host, dpr, Some(width), Some(height)).unwrap();
        let surface = sizer.surface();

        prop_assert_eq!(f64::from(surface.buffer_width), (width * dpr).ceil());
        prop_assert_eq!(f64::from(surface.buffer_height), (height * dpr).ceil());
        prop_assert_eq!(f64::from(surface.style_width), (f64::from(surface.buffer_width) / dpr).round());
        prop_assert!((f64::from(surface.style_width) - width.round()).abs() <= 1.0);
        prop_assert!((f64::from(surface.style_height) - height.round()).abs() <= 1.0);
    }
}
