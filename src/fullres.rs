use crate::{
    catalog::FilterDefinition,
    compositor,
    error::{PortraError, PortraResult},
    raster::Raster,
};

/// Default cap on the longer side of a full-resolution render.
pub const MAX_DIMENSION: u32 = 2048;

/// Downscales `(width, height)` so neither side exceeds `max_dimension`,
/// preserving the aspect ratio exactly (rounded). Images already within
/// bounds pass through unchanged; this path never crops or upscales.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width <= max_dimension && height <= max_dimension {
        return (width, height);
    }
    if width > height {
        let h = (f64::from(height) * f64::from(max_dimension) / f64::from(width)).round() as u32;
        (max_dimension, h.max(1))
    } else {
        let w = (f64::from(width) * f64::from(max_dimension) / f64::from(height)).round() as u32;
        (w.max(1), max_dimension)
    }
}

/// Renders the export-quality frame: the active filter at the source's own
/// aspect ratio, uniformly downscaled when the source exceeds the bound.
/// Equal aspect means cover-fit degenerates to a plain scale with no crop.
pub fn render_full(
    image: &Raster,
    filter: &FilterDefinition,
    max_dimension: u32,
) -> PortraResult<Raster> {
    if max_dimension == 0 {
        return Err(PortraError::validation("max_dimension must be > 0"));
    }
    let (w, h) = fit_within(image.width(), image.height(), max_dimension);
    compositor::render(image, filter, w, h)
}
