use crate::{
    catalog::Adjustment,
    error::{PortraError, PortraResult},
    raster::Raster,
};

const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

// Classic sepia tone matrix, rows are output R/G/B from input R/G/B.
const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Applies a color-adjustment chain to a copy of `src`, left to right, with
/// per-step clamping. The source raster is never mutated. Alpha is untouched
/// by the color steps; blur convolves all four channels.
pub fn apply_adjustments(src: &Raster, ops: &[Adjustment]) -> PortraResult<Raster> {
    let mut out = src.clone();
    for op in ops {
        op.validate()?;
        apply_one(&mut out, *op)?;
    }
    Ok(out)
}

fn apply_one(img: &mut Raster, op: Adjustment) -> PortraResult<()> {
    match op {
        Adjustment::Grayscale(p) => {
            let p = p.min(1.0);
            map_rgb(img, |c| {
                let l = luma(c);
                [
                    c[0] + (l - c[0]) * p,
                    c[1] + (l - c[1]) * p,
                    c[2] + (l - c[2]) * p,
                ]
            });
        }
        Adjustment::Sepia(p) => {
            let p = p.min(1.0);
            map_rgb(img, |c| {
                let mut out = [0.0f32; 3];
                for (i, row) in SEPIA.iter().enumerate() {
                    let s = row[0] * c[0] + row[1] * c[1] + row[2] * c[2];
                    out[i] = c[i] + (s - c[i]) * p;
                }
                out
            });
        }
        Adjustment::Saturate(s) => {
            map_rgb(img, |c| {
                let l = luma(c);
                [
                    l + (c[0] - l) * s,
                    l + (c[1] - l) * s,
                    l + (c[2] - l) * s,
                ]
            });
        }
        Adjustment::Contrast(k) => {
            map_rgb(img, |c| {
                [
                    (c[0] - 0.5) * k + 0.5,
                    (c[1] - 0.5) * k + 0.5,
                    (c[2] - 0.5) * k + 0.5,
                ]
            });
        }
        Adjustment::Brightness(b) => {
            map_rgb(img, |c| [c[0] * b, c[1] * b, c[2] * b]);
        }
        Adjustment::Blur { radius_px, sigma } => {
            let blurred = blur_rgba8(img.data(), img.width(), img.height(), radius_px, sigma)?;
            img.data_mut().copy_from_slice(&blurred);
        }
    }
    Ok(())
}

fn luma(c: [f32; 3]) -> f32 {
    LUMA_R * c[0] + LUMA_G * c[1] + LUMA_B * c[2]
}

fn map_rgb(img: &mut Raster, f: impl Fn([f32; 3]) -> [f32; 3]) {
    for px in img.data_mut().chunks_exact_mut(4) {
        let c = [
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
        ];
        let m = f(c);
        for i in 0..3 {
            px[i] = (m[i].clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
}

/// Separable Gaussian blur over straight RGBA8 with clamp-to-edge sampling.
/// The kernel is Q16 fixed point so the convolution is bit-exact across runs.
pub fn blur_rgba8(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> PortraResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| PortraError::invalid_image("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(PortraError::invalid_image(
            "blur_rgba8 expects src matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    convolve_axis(src, &mut tmp, width, height, &kernel, Axis::X);
    convolve_axis(&tmp, &mut out, width, height, &kernel, Axis::Y);
    Ok(out)
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> PortraResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PortraError::unknown_adjustment("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    // Quantize to Q16 and push any rounding residue onto the center tap so
    // the kernel sums to exactly one.
    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn convolve_axis(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as i64;
    let w = width as i64;
    let h = height as i64;
    let extent = match axis {
        Axis::X => w,
        Axis::Y => h,
    };

    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            let along = match axis {
                Axis::X => x,
                Axis::Y => y,
            };
            for (ki, &kw) in k.iter().enumerate() {
                let pos = (along + ki as i64 - radius).clamp(0, extent - 1);
                let (sx, sy) = match axis {
                    Axis::X => (pos, y),
                    Axis::Y => (x, pos),
                };
                let idx = ((sy * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    (((acc + 32768) >> 16).min(255)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(px: [u8; 4], op: Adjustment) -> [u8; 4] {
        let r = Raster::from_rgba8(1, 1, px.to_vec()).unwrap();
        apply_adjustments(&r, &[op]).unwrap().pixel(0, 0)
    }

    #[test]
    fn empty_chain_is_identity() {
        let r = Raster::solid(3, 3, [12, 34, 56, 255]).unwrap();
        assert_eq!(apply_adjustments(&r, &[]).unwrap(), r);
    }

    #[test]
    fn grayscale_full_equalizes_channels() {
        let out = single([200, 40, 90, 255], Adjustment::Grayscale(1.0));
        assert_eq!(out[0], out[1]);
        assert_eq!(out[1], out[2]);
        assert_eq!(out[3], 255);
    }

    #[test]
    fn brightness_scales_channels() {
        let out = single([100, 100, 100, 255], Adjustment::Brightness(1.05));
        assert_eq!(out, [105, 105, 105, 255]);
    }

    #[test]
    fn brightness_clamps_at_white() {
        let out = single([250, 250, 250, 255], Adjustment::Brightness(2.0));
        assert_eq!(out, [255, 255, 255, 255]);
    }

    #[test]
    fn contrast_fixes_mid_gray() {
        // 0.5 in u8 has no exact representation; both neighbors stay put.
        for v in [127u8, 128u8] {
            let out = single([v, v, v, 255], Adjustment::Contrast(1.4));
            for c in 0..3 {
                assert!((i16::from(out[c]) - i16::from(v)).abs() <= 1);
            }
        }
    }

    #[test]
    fn saturate_zero_equalizes_channels() {
        let out = single([180, 60, 30, 255], Adjustment::Saturate(0.0));
        assert_eq!(out[0], out[1]);
        assert_eq!(out[1], out[2]);
        let gray = single([180, 60, 30, 255], Adjustment::Grayscale(1.0));
        assert!((i16::from(out[0]) - i16::from(gray[0])).abs() <= 1);
    }

    #[test]
    fn sepia_keeps_white_warmish() {
        let out = single([255, 255, 255, 255], Adjustment::Sepia(1.0));
        // Sepia matrix rows sum to >1 for R/G, <1 for B.
        assert_eq!(out[0], 255);
        assert_eq!(out[1], 255);
        assert!(out[2] < 255);
    }

    #[test]
    fn blur_radius_0_is_identity() {
        let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        let out = blur_rgba8(&src, 1, 2, 0, 1.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn blur_constant_image_is_identity() {
        let (w, h) = (4u32, 3u32);
        let px = [10u8, 20, 30, 255];
        let src = px.repeat((w * h) as usize);
        let out = blur_rgba8(&src, w, h, 3, 2.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn blur_spreads_energy_from_single_pixel() {
        let (w, h) = (5u32, 5u32);
        let mut src = vec![0u8; (w * h * 4) as usize];
        let center = ((2 * w + 2) * 4) as usize;
        src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

        let out = blur_rgba8(&src, w, h, 2, 1.2).unwrap();

        let nonzero = out.chunks_exact(4).filter(|px| px[0] != 0).count();
        assert!(nonzero > 1);

        let sum_r: u32 = out.chunks_exact(4).map(|px| u32::from(px[0])).sum();
        assert!((sum_r as i32 - 255).abs() <= 4);
    }

    #[test]
    fn chain_order_matters() {
        let px = [40, 200, 120, 255];
        let a = {
            let r = Raster::from_rgba8(1, 1, px.to_vec()).unwrap();
            apply_adjustments(
                &r,
                &[Adjustment::Contrast(1.4), Adjustment::Brightness(1.5)],
            )
            .unwrap()
            .pixel(0, 0)
        };
        let b = {
            let r = Raster::from_rgba8(1, 1, px.to_vec()).unwrap();
            apply_adjustments(
                &r,
                &[Adjustment::Brightness(1.5), Adjustment::Contrast(1.4)],
            )
            .unwrap()
            .pixel(0, 0)
        };
        assert_ne!(a, b);
    }
}
