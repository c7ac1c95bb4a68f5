//! CSS color-string generators.
//!
//! Numbers are formatted with `f64`'s `Display`, so whole values print
//! without a fractional part: `rgb(255, 0, 0)`, `rgba(0, 0, 0, 0.5)`.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

#[must_use]
pub fn rgb(r: f64, g: f64, b: f64) -> String {
    format!("rgb({r}, {g}, {b})")
}

#[must_use]
pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> String {
    format!("rgba({r}, {g}, {b}, {a})")
}

/// `s` and `l` are percentages.
#[must_use]
pub fn hsl(h: f64, s: f64, l: f64) -> String {
    format!("hsl({h}, {s}%, {l}%)")
}

#[must_use]
pub fn hsla(h: f64, s: f64, l: f64, a: f64) -> String {
    format!("hsla({h}, {s}%, {l}%, {a})")
}

/// Gray with every channel set to `value`.
#[must_use]
pub fn grayscale(value: f64) -> String {
    rgb(value, value, value)
}

#[must_use]
pub fn greyscale(value: f64) -> String {
    grayscale(value)
}
