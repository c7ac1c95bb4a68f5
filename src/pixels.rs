//! Captured RGBA pixel data for direct pixel manipulation.
//!
//! A `PixelBuffer` is a copy of the physical backing store, four bytes per
//! pixel in row-major order. Edits only reach the screen once the buffer is
//! written back through the renderer.

#[cfg(test)]
#[path = "pixels_test.rs"]
mod pixels_test;

use crate::error::CanvasError;

/// One pixel as `[r, g, b, a]`.
pub type Rgba = [u8; 4];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent buffer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, data: vec![0; byte_len(width, height)] }
    }

    /// Wrap raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `data` is not exactly `width * height * 4` bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CanvasError> {
        let expected = byte_len(width, height);
        if data.len() != expected {
            return Err(CanvasError::invalid_argument(
                "PixelBuffer::from_raw",
                2,
                format!("expected {expected} bytes for {width}x{height}, got {}", data.len()),
            ));
        }
        Ok(Self { width, height, data })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / 4
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// # Errors
    ///
    /// Returns `PixelOutOfBounds` outside the buffer.
    pub fn get(&self, x: u32, y: u32) -> Result<Rgba, CanvasError> {
        let index = self.index_of(x, y)?;
        self.get_index(index)
    }

    /// # Errors
    ///
    /// Returns `PixelOutOfBounds` outside the buffer.
    pub fn set(&mut self, x: u32, y: u32, rgba: Rgba) -> Result<(), CanvasError> {
        let index = self.index_of(x, y)?;
        self.set_index(index, rgba)
    }

    /// Read the pixel at linear `index` (row-major).
    ///
    /// # Errors
    ///
    /// Returns `PixelOutOfBounds` past the last pixel.
    pub fn get_index(&self, index: usize) -> Result<Rgba, CanvasError> {
        match byte_range(index).and_then(|range| self.data.get(range)) {
            Some(&[r, g, b, a]) => Ok([r, g, b, a]),
            _ => Err(self.out_of_bounds_index(index)),
        }
    }

    /// Overwrite the pixel at linear `index` (row-major).
    ///
    /// # Errors
    ///
    /// Returns `PixelOutOfBounds` past the last pixel.
    pub fn set_index(&mut self, index: usize, rgba: Rgba) -> Result<(), CanvasError> {
        let err = self.out_of_bounds_index(index);
        let slot = byte_range(index).and_then(|range| self.data.get_mut(range)).ok_or(err)?;
        slot.copy_from_slice(&rgba);
        Ok(())
    }

    fn index_of(&self, x: u32, y: u32) -> Result<usize, CanvasError> {
        if x >= self.width || y >= self.height {
            return Err(CanvasError::PixelOutOfBounds { x, y, width: self.width, height: self.height });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn out_of_bounds_index(&self, index: usize) -> CanvasError {
        let width = self.width.max(1) as usize;
        CanvasError::PixelOutOfBounds {
            x: (index % width) as u32,
            y: (index / width).min(u32::MAX as usize) as u32,
            width: self.width,
            height: self.height,
        }
    }
}

fn byte_range(index: usize) -> Option<std::ops::Range<usize>> {
    let start = index.checked_mul(4)?;
    Some(start..start.checked_add(4)?)
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}
