use std::sync::Arc;

use crate::error::{PortraError, PortraResult};

/// Straight (non-premultiplied) RGBA8 pixels, row-major.
///
/// Dimensions are validated at construction, so every `Raster` in the system
/// is non-degenerate and its buffer length matches `width * height * 4`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// A decoded upload, shared read-only across the render drivers.
/// Replaced wholesale on a new upload, never patched in place.
pub type SourceImage = Arc<Raster>;

impl Raster {
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> PortraResult<Self> {
        if width == 0 || height == 0 {
            return Err(PortraError::invalid_image(
                "raster dimensions must be > 0",
            ));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PortraError::invalid_image("raster size overflow"))?;
        if data.len() != expected {
            return Err(PortraError::invalid_image(format!(
                "raster buffer length {} does not match {width}x{height} rgba8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PortraResult<Self> {
        let px_count = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| PortraError::invalid_image("raster size overflow"))?;
        Self::from_rgba8(width, height, rgba.repeat(px_count))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at (x, y). Callers must stay in bounds; this indexes directly.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}
