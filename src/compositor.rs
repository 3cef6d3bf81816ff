use crate::{
    adjust_cpu::apply_adjustments,
    blend_cpu::overlay_in_place,
    catalog::FilterDefinition,
    error::{PortraError, PortraResult},
    raster::Raster,
};

/// Cover-fit mapping from a source raster onto a target rectangle: the scaled
/// image fully covers the target, center-cropping the excess on one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

pub fn cover_fit(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> CoverFit {
    let scale = (f64::from(dst_w) / f64::from(src_w)).max(f64::from(dst_h) / f64::from(src_h));
    CoverFit {
        scale,
        offset_x: f64::from(dst_w) / 2.0 - (f64::from(src_w) / 2.0) * scale,
        offset_y: f64::from(dst_h) / 2.0 - (f64::from(src_h) / 2.0) * scale,
    }
}

/// Draws `src` into a fresh `dst_w x dst_h` buffer through the cover-fit
/// mapping, sampling bilinearly with clamp-to-edge. When source and target
/// share dimensions the mapping is the identity and pixels copy through
/// exactly.
pub fn draw_cover(src: &Raster, dst_w: u32, dst_h: u32) -> PortraResult<Raster> {
    if dst_w == 0 || dst_h == 0 {
        return Err(PortraError::invalid_image(
            "target dimensions must be > 0",
        ));
    }

    let fit = cover_fit(src.width(), src.height(), dst_w, dst_h);
    let mut out = vec![0u8; (dst_w as usize) * (dst_h as usize) * 4];

    for y in 0..dst_h {
        for x in 0..dst_w {
            // Map the target pixel center back into source space.
            let sx = (f64::from(x) + 0.5 - fit.offset_x) / fit.scale - 0.5;
            let sy = (f64::from(y) + 0.5 - fit.offset_y) / fit.scale - 0.5;
            let px = sample_bilinear(src, sx, sy);
            let idx = ((y as usize) * (dst_w as usize) + (x as usize)) * 4;
            out[idx..idx + 4].copy_from_slice(&px);
        }
    }

    Raster::from_rgba8(dst_w, dst_h, out)
}

fn sample_bilinear(src: &Raster, sx: f64, sy: f64) -> [u8; 4] {
    let max_x = f64::from(src.width() - 1);
    let max_y = f64::from(src.height() - 1);
    let sx = sx.clamp(0.0, max_x);
    let sy = sy.clamp(0.0, max_y);

    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;

    let x0 = x0 as u32;
    let y0 = y0 as u32;
    let x1 = (x0 + 1).min(src.width() - 1);
    let y1 = (y0 + 1).min(src.height() - 1);

    let p00 = src.pixel(x0, y0);
    let p10 = src.pixel(x1, y0);
    let p01 = src.pixel(x0, y1);
    let p11 = src.pixel(x1, y1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bot = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        let v = top * (1.0 - fy) + bot * fy;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Renders one frame: cover-fit draw, then the filter's adjustment chain,
/// then the optional overlay. Pure: identical inputs yield identical pixels,
/// and the source raster is never mutated.
pub fn render(
    image: &Raster,
    filter: &FilterDefinition,
    dst_w: u32,
    dst_h: u32,
) -> PortraResult<Raster> {
    let fitted = draw_cover(image, dst_w, dst_h)?;
    let mut frame = apply_adjustments(&fitted, &filter.adjustments)?;
    if let Some(fx) = &filter.overlay {
        overlay_in_place(&mut frame, fx);
    }
    Ok(frame)
}
