use crate::{catalog::BlendMode, catalog::OverlayFx, raster::Raster};

/// Combines one channel of the backdrop with one channel of the overlay color
/// under `mode`, before any alpha mixing. Formulas are the standard separable
/// ones; integer math is `(x*y + 127) / 255` fixed point, except soft-light
/// whose square-root segment runs in f32.
pub fn blend_channel(mode: BlendMode, base: u8, src: u8) -> u8 {
    let b = u32::from(base);
    let s = u32::from(src);
    match mode {
        BlendMode::Normal => src,
        BlendMode::Multiply => mul_div255(b, s) as u8,
        BlendMode::Screen => (255 - mul_div255(255 - b, 255 - s)) as u8,
        BlendMode::Lighten => base.max(src),
        // Overlay is hard-light with the operands swapped: the backdrop
        // picks the branch.
        BlendMode::Overlay => {
            if b <= 127 {
                mul_div255(2 * b, s).min(255) as u8
            } else {
                (255 - mul_div255(2 * (255 - b), 255 - s).min(255)) as u8
            }
        }
        BlendMode::SoftLight => {
            let bf = base as f32 / 255.0;
            let sf = src as f32 / 255.0;
            let out = if sf <= 0.5 {
                bf - (1.0 - 2.0 * sf) * bf * (1.0 - bf)
            } else {
                let d = if bf <= 0.25 {
                    ((16.0 * bf - 12.0) * bf + 4.0) * bf
                } else {
                    bf.sqrt()
                };
                bf + (2.0 * sf - 1.0) * (d - bf)
            };
            (out.clamp(0.0, 1.0) * 255.0).round() as u8
        }
    }
}

/// Fills the whole frame with the overlay color under its blend mode, then
/// mixes by the overlay alpha: `out = base*(1-a) + blended*a`. The backdrop
/// alpha channel is preserved.
pub fn overlay_in_place(dst: &mut Raster, fx: &OverlayFx) {
    let [cr, cg, cb, ca] = fx.color;
    if ca == 0 {
        return;
    }
    let a = u32::from(ca);
    let inv = 255 - a;
    let color = [cr, cg, cb];

    for px in dst.data_mut().chunks_exact_mut(4) {
        for i in 0..3 {
            let blended = blend_channel(fx.blend, px[i], color[i]);
            px[i] =
                (mul_div255(u32::from(px[i]), inv) + mul_div255(u32::from(blended), a)).min(255)
                    as u8;
        }
    }
}

fn mul_div255(x: u32, y: u32) -> u32 {
    (x * y + 127) / 255
}
