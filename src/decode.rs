use std::io::Cursor;

use crate::{
    error::{PortraError, PortraResult},
    raster::Raster,
};

/// Decodes user-supplied image bytes into a straight RGBA8 raster.
///
/// Any format the `image` crate cannot decode, and any degenerate
/// zero-dimension image, is an `InvalidImage` error.
pub fn decode_image(bytes: &[u8]) -> PortraResult<Raster> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PortraError::invalid_image(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_rgba8(width, height, rgba.into_raw())
}

/// Encodes a rendered raster as PNG bytes for download/export.
pub fn encode_png(raster: &Raster) -> PortraResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(raster.width(), raster.height(), raster.data().to_vec())
        .ok_or_else(|| PortraError::encode("raster buffer does not match its dimensions"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PortraError::encode(format!("encode png: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
        let img = image::RgbaImage::from_raw(width, height, rgba.to_vec()).unwrap();
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decode_image_png_dimensions_and_pixels() {
        let bytes = png_bytes(2, 1, &[10, 20, 30, 255, 40, 50, 60, 255]);
        let raster = decode_image(&bytes).unwrap();
        assert_eq!((raster.width(), raster.height()), (2, 1));
        assert_eq!(raster.pixel(0, 0), [10, 20, 30, 255]);
        assert_eq!(raster.pixel(1, 0), [40, 50, 60, 255]);
    }

    #[test]
    fn decode_image_rejects_garbage() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PortraError::InvalidImage(_)));
    }

    #[test]
    fn png_roundtrip_is_lossless() {
        let raster = Raster::from_rgba8(2, 2, vec![
            1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255, 10, 11, 12, 255,
        ])
        .unwrap();
        let bytes = encode_png(&raster).unwrap();
        let back = decode_image(&bytes).unwrap();
        assert_eq!(back, raster);
    }
}
