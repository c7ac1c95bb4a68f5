#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

// =============================================================
// should_render
// =============================================================

#[test]
fn should_render_skips_missing_empty_and_transparent() {
    assert!(!should_render(None));
    assert!(!should_render(Some("")));
    assert!(!should_render(Some("transparent")));
}

#[test]
fn should_render_accepts_real_colors() {
    assert!(should_render(Some("red")));
    assert!(should_render(Some("rgba(0, 0, 0, 0)")));
}

// =============================================================
// Shadow
// =============================================================

#[test]
fn parse_css_shadow_reads_lengths_and_color() {
    let shadow = Shadow::parse_css("2px 3px 4px red").unwrap();
    assert_eq!(shadow.offset, Point::new(2.0, 3.0));
    assert_eq!(shadow.blur, 4.0);
    assert_eq!(shadow.color, "red");
}

#[test]
fn parse_css_shadow_keeps_spaced_color() {
    let shadow = Shadow::parse_css("-1px 0px 8px rgba(0, 0, 0, 0.5)").unwrap();
    assert_eq!(shadow.offset, Point::new(-1.0, 0.0));
    assert_eq!(shadow.color, "rgba(0, 0, 0, 0.5)");
}

#[test]
fn parse_css_shadow_rejects_garbage_length() {
    let err = Shadow::parse_css("2px wide 4px red").unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_ARGUMENT");
    assert!(matches!(err, CanvasError::InvalidArgument { index: 1, .. }));
}

#[test]
fn parse_css_shadow_rejects_missing_blur() {
    assert!(Shadow::parse_css("2px 3px").is_err());
}

#[test]
fn shadow_none_is_transparent_black() {
    let none = Shadow::none();
    assert_eq!(none.offset, Point::default());
    assert_eq!(none.blur, 0.0);
    assert_eq!(none.color, "rgba(0, 0, 0, 0)");
}

// =============================================================
// Style enums
// =============================================================

#[test]
fn baseline_center_normalizes_to_middle() {
    assert_eq!(TextBaseline::parse("center"), Some(TextBaseline::Middle));
    assert_eq!(TextBaseline::Middle.as_str(), "middle");
}

#[test]
fn style_defaults_match_canvas_defaults() {
    assert_eq!(LineCap::default().as_str(), "butt");
    assert_eq!(TextAlign::default().as_str(), "left");
    assert_eq!(TextBaseline::default().as_str(), "alphabetic");
}

#[test]
fn unknown_style_names_are_rejected() {
    assert_eq!(LineCap::parse("pointy"), None);
    assert_eq!(TextAlign::parse("middle"), None);
}

// =============================================================
// Paint
// =============================================================

#[test]
fn paint_deserializes_string_as_color() {
    let paint: Paint = serde_json::from_value(json!("blue")).unwrap();
    assert_eq!(paint, Paint::color("blue"));
}

#[test]
fn paint_deserializes_gradient_object() {
    let paint: Paint = serde_json::from_value(json!({
        "from": { "x": 0.0, "y": 0.0 },
        "to": { "x": 10.0, "y": 0.0 },
        "startColor": "red",
        "endColor": "blue",
    }))
    .unwrap();
    let Paint::LinearGradient(gradient) = paint else {
        panic!("expected gradient");
    };
    assert_eq!(gradient.to, Point::new(10.0, 0.0));
    assert_eq!(gradient.end_color, "blue");
}
