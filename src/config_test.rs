use serde_json::json;

use super::*;

fn resolve(value: serde_json::Value) -> ResolvedConfig {
    CanvasConfig::from_value(value).unwrap().resolve().unwrap()
}

// =============================================================
// Sizing mode
// =============================================================

#[test]
fn empty_config_is_fullscreen() {
    let resolved = resolve(json!({}));
    assert!(resolved.is_fullscreen());
}

#[test]
fn explicit_size_means_static() {
    let resolved = resolve(json!({ "width": 640, "height": 480 }));
    assert_eq!(resolved.sizing, SizingMode::Static(Size::new(640.0, 480.0)));
}

#[test]
fn missing_dimension_uses_default() {
    assert_eq!(resolve(json!({ "width": 640 })).sizing, SizingMode::Static(Size::new(640.0, 150.0)));
    assert_eq!(resolve(json!({ "height": 90 })).sizing, SizingMode::Static(Size::new(300.0, 90.0)));
}

#[test]
fn fullscreen_true_wins_over_size() {
    let resolved = resolve(json!({ "width": 640, "fullscreen": true }));
    assert!(resolved.is_fullscreen());
}

#[test]
fn fullscreen_false_without_size_is_responsive() {
    assert_eq!(resolve(json!({ "fullscreen": false })).sizing, SizingMode::Responsive);
}

// =============================================================
// Flag defaults
// =============================================================

#[test]
fn fullscreen_defaults_disable_browser_behaviour() {
    let resolved = resolve(json!({}));
    assert!(resolved.disable_context_menu);
    assert!(resolved.disable_middle_mouse);
    assert!(resolved.disable_scroll_on_mobile);
    assert!(!resolved.disable_key_shortcuts);
    assert!(resolved.public_methods);
}

#[test]
fn windowed_defaults_leave_browser_alone() {
    let resolved = resolve(json!({ "width": 100, "height": 100 }));
    assert!(!resolved.disable_context_menu);
    assert!(!resolved.disable_middle_mouse);
    assert!(!resolved.disable_scroll_on_mobile);
    assert!(!resolved.disable_key_shortcuts);
    assert!(resolved.public_methods);
}

#[test]
fn explicit_flags_override_defaults() {
    let resolved = resolve(json!({ "disableContextMenu": false, "disableKeyShortcuts": true, "publicMethods": false }));
    assert!(!resolved.disable_context_menu);
    assert!(resolved.disable_key_shortcuts);
    assert!(!resolved.public_methods);
}

#[test]
fn context_attributes_pass_through() {
    let resolved = resolve(json!({ "contextAttributes": { "alpha": false, "willReadFrequently": true } }));
    assert_eq!(resolved.context_attributes.alpha, Some(false));
    assert_eq!(resolved.context_attributes.will_read_frequently, Some(true));
    assert_eq!(resolved.context_attributes.color_space, None);
}

// =============================================================
// Errors
// =============================================================

#[test]
fn non_numeric_width_is_configuration_error() {
    let err = CanvasConfig::from_json(r#"{ "width": "wide" }"#).unwrap_err();
    assert_eq!(err.error_code(), "E_CONFIGURATION");
}

#[test]
fn negative_size_is_configuration_error() {
    let config = CanvasConfig { height: Some(-1.0), ..CanvasConfig::default() };
    let err = config.resolve().unwrap_err();
    assert!(matches!(err, CanvasError::Configuration(ref msg) if msg.contains("height")));
}
