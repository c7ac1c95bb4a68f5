//! Construction options, resolved once into a typed configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::CanvasError;
use crate::geom::Size;
use crate::surface::SizingMode;

/// Options passed through untouched to 2D context creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_space: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desynchronized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub will_read_frequently: Option<bool>,
}

/// Construction options as the caller wrote them. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConfig {
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Fit the viewport. Defaults to on when no size is given.
    pub fullscreen: Option<bool>,
    pub disable_context_menu: Option<bool>,
    pub disable_middle_mouse: Option<bool>,
    pub disable_scroll_on_mobile: Option<bool>,
    pub disable_key_shortcuts: Option<bool>,
    /// Copy public operations into a host registry.
    pub public_methods: Option<bool>,
    pub context_attributes: ContextAttributes,
}

/// Options after defaults are applied.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub sizing: SizingMode,
    pub disable_context_menu: bool,
    pub disable_middle_mouse: bool,
    pub disable_scroll_on_mobile: bool,
    pub disable_key_shortcuts: bool,
    pub public_methods: bool,
    pub context_attributes: ContextAttributes,
}

impl ResolvedConfig {
    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.sizing == SizingMode::Fullscreen
    }
}

impl CanvasConfig {
    /// Parse options from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for malformed JSON or a non-numeric size.
    pub fn from_json(json: &str) -> Result<Self, CanvasError> {
        serde_json::from_str(json).map_err(|err| CanvasError::Configuration(err.to_string()))
    }

    /// # Errors
    ///
    /// Returns `Configuration` for a non-object value or a non-numeric size.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CanvasError> {
        serde_json::from_value(value).map_err(|err| CanvasError::Configuration(err.to_string()))
    }

    /// Apply defaults.
    ///
    /// - fullscreen unless explicitly off, or off implicitly because a size was given
    /// - fullscreen disables the context menu, middle mouse and mobile scroll by default
    /// - without fullscreen: responsive when no size was given, else static with
    ///   missing dimensions defaulting to 300 x 150
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for a negative or non-finite size.
    pub fn resolve(&self) -> Result<ResolvedConfig, CanvasError> {
        let width = validate_dimension("width", self.width)?;
        let height = validate_dimension("height", self.height)?;
        let has_size = width.is_some() || height.is_some();
        let fullscreen = self.fullscreen != Some(false) && (self.fullscreen == Some(true) || !has_size);

        let sizing = if fullscreen {
            SizingMode::Fullscreen
        } else if has_size {
            SizingMode::Static(Size::new(width.unwrap_or(DEFAULT_WIDTH), height.unwrap_or(DEFAULT_HEIGHT)))
        } else {
            SizingMode::Responsive
        };

        Ok(ResolvedConfig {
            sizing,
            disable_context_menu: self.disable_context_menu.unwrap_or(fullscreen),
            disable_middle_mouse: self.disable_middle_mouse.unwrap_or(fullscreen),
            disable_scroll_on_mobile: self.disable_scroll_on_mobile.unwrap_or(fullscreen),
            disable_key_shortcuts: self.disable_key_shortcuts.unwrap_or(false),
            public_methods: self.public_methods.unwrap_or(true),
            context_attributes: self.context_attributes.clone(),
        })
    }
}

fn validate_dimension(name: &str, value: Option<f64>) -> Result<Option<f64>, CanvasError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(CanvasError::Configuration(format!("{name} must be a finite, non-negative number, got {v}")))
        }
        other => Ok(other),
    }
}
