//! Error taxonomy for the canvas crate.
//!
//! DESIGN
//! ======
//! Every failure is fatal to the call that raised it: configuration mistakes,
//! pixel access before a capture, and non-callable listener registrations are
//! all caller errors and are never retried. Listener failures travel through
//! the bus as `ListenerError` and abort the rest of that dispatch.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failure raised by an event listener or a host-registered function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("listener failed: {message}")]
pub struct ListenerError {
    message: String,
}

impl ListenerError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// Missing or invalid target surface, or an invalid explicit size.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Pixel read/write attempted before `get_pixel_data`.
    #[error("{operation} requires captured pixel data; call get_pixel_data first")]
    Precondition { operation: &'static str },
    /// A registry entry that is not callable was registered as a listener.
    #[error("listener for '{event}' is not callable")]
    InvalidCallback { event: String },
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error("pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    PixelOutOfBounds { x: u32, y: u32, width: u32, height: u32 },
    #[error("invalid argument {index} for '{operation}': {reason}")]
    InvalidArgument { operation: String, index: usize, reason: String },
    #[error("no binding named '{0}'")]
    UnknownBinding(String),
    /// The engine behind a binding was dropped or is mid-dispatch.
    #[error("canvas unavailable: {0}")]
    Unavailable(&'static str),
    #[error("render error: {0}")]
    Render(String),
}

impl CanvasError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "E_CONFIGURATION",
            Self::Precondition { .. } => "E_PRECONDITION",
            Self::InvalidCallback { .. } => "E_INVALID_CALLBACK",
            Self::Listener(_) => "E_LISTENER",
            Self::PixelOutOfBounds { .. } => "E_PIXEL_OUT_OF_BOUNDS",
            Self::InvalidArgument { .. } => "E_INVALID_ARGUMENT",
            Self::UnknownBinding(_) => "E_UNKNOWN_BINDING",
            Self::Unavailable(_) => "E_UNAVAILABLE",
            Self::Render(_) => "E_RENDER",
        }
    }

    /// Collapse into a `ListenerError`, unwrapping one that was already a listener failure.
    #[must_use]
    pub fn into_listener_error(self) -> ListenerError {
        match self {
            Self::Listener(err) => err,
            other => ListenerError::new(other.to_string()),
        }
    }

    pub(crate) fn invalid_argument(operation: &str, index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { operation: operation.to_owned(), index, reason: reason.into() }
    }
}
