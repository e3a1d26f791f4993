//! Filter stage: paints spot adjustments into an image buffer.
//!
//! Buffers are interleaved RGB `f32` at the pipe size the spots were last
//! switched to. Every spot only touches the pixels of its mask's bounding
//! box, and the mask weight times the spot opacity is the blend factor
//! between the original and the adjusted pixel.

use rayon::prelude::*;

use crate::spot::Spot;
use crate::spot_list::SpotList;
use crate::tuning::TuningSpot;


/// Minimum number of pixels in a spot's box for parallel processing.
pub(crate) const PARALLEL_THRESHOLD: usize = 30_000;

/// Resolution of the luma curve lookup table.
const CURVE_LUT_SIZE: usize = 1024;

/// Rec. 709 luma coefficients.
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

/// Linear blend from `original` (weight 0) to `adjusted` (weight 1).
#[inline]
pub fn blend(original: f32, adjusted: f32, weight: f32) -> f32 {
    original + (adjusted - original) * weight
}

#[inline]
pub fn luma(pixel: [f32; 3]) -> f32 {
    LUMA_R * pixel[0] + LUMA_G * pixel[1] + LUMA_B * pixel[2]
}

/// Apply `adjust` to every pixel covered by one spot.
///
/// Disabled spots are applied too; list-level helpers filter them out.
pub fn apply_spot<F>(
    data: &mut [f32],
    width: usize,
    height: usize,
    spot: &dyn Spot,
    adjust: F,
) -> Result<(), String>
where
    F: Fn([f32; 3]) -> [f32; 3] + Sync,
{
    check_buffer(data, width, height)?;

    let base = spot.base();
    let opacity = base.opacity();
    if opacity <= 0.0 || width == 0 || height == 0 {
        return Ok(());
    }

    let (left, top, box_w, box_h) = base.bounding_box();
    let Some((x0, x1)) = clip_span(left, box_w, width) else {
        return Ok(());
    };
    let Some((y0, y1)) = clip_span(top, box_h, height) else {
        return Ok(());
    };

    let center = base.pos();
    let radius_limit = spot
        .as_tuning()
        .filter(|tuning| tuning.has_max_radius())
        .map(|tuning| {
            let r = tuning.scaled_max_radius() as f32;
            r * r
        });

    let row_len = width * 3;
    let process_row = |y: usize, row: &mut [f32]| {
        for x in x0..x1 {
            let weight = base.weight_at(x as i64, y as i64);
            if weight <= 0.0 {
                continue;
            }
            if let Some(limit) = radius_limit {
                let dx = x as f32 - center.x as f32;
                let dy = y as f32 - center.y as f32;
                if dx * dx + dy * dy > limit {
                    continue;
                }
            }

            let pixel = &mut row[x * 3..x * 3 + 3];
            let original = [pixel[0], pixel[1], pixel[2]];
            let adjusted = adjust(original);
            let factor = weight * opacity;
            for (value, (orig, adj)) in pixel.iter_mut().zip(original.iter().zip(adjusted.iter())) {
                *value = blend(*orig, *adj, factor);
            }
        }
    };

    let rows = &mut data[y0 * row_len..y1 * row_len];
    if (x1 - x0) * (y1 - y0) >= PARALLEL_THRESHOLD {
        rows.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(i, row)| process_row(y0 + i, row));
    } else {
        for (i, row) in rows.chunks_mut(row_len).enumerate() {
            process_row(y0 + i, row);
        }
    }

    Ok(())
}

/// Apply `adjust` for every enabled spot of `spots`, in list order.
pub fn apply_spots<F>(
    data: &mut [f32],
    width: usize,
    height: usize,
    spots: &SpotList,
    adjust: F,
) -> Result<(), String>
where
    F: Fn([f32; 3], &dyn Spot) -> [f32; 3] + Sync,
{
    check_buffer(data, width, height)?;
    for spot in spots.enabled() {
        apply_spot(data, width, height, spot, |pixel| adjust(pixel, spot))?;
    }
    Ok(())
}

/// Local exposure: multiply covered pixels by `2^ev`.
pub fn apply_exposure_spots(
    data: &mut [f32],
    width: usize,
    height: usize,
    spots: &SpotList,
    ev: f32,
) -> Result<(), String> {
    if !ev.is_finite() {
        return Err(format!("Exposure must be finite, got {}", ev));
    }
    let gain = 2f32.powf(ev);
    apply_spots(data, width, height, spots, |[r, g, b], _| {
        [r * gain, g * gain, b * gain]
    })
}

/// Local tuning: luma curve and saturation of every enabled tuning spot.
/// Spots of other kinds are skipped.
pub fn apply_tuning_spots(
    data: &mut [f32],
    width: usize,
    height: usize,
    spots: &SpotList,
) -> Result<(), String> {
    check_buffer(data, width, height)?;
    for spot in spots.enabled() {
        let Some(tuning) = spot.as_tuning() else {
            continue;
        };
        let lut = tuning.curve().to_lut(CURVE_LUT_SIZE);
        apply_spot(data, width, height, spot, |pixel| tune_pixel(pixel, tuning, &lut))?;
    }
    Ok(())
}

/// Adjust one pixel with a tuning spot's curve and saturation.
///
/// The curve maps luma; `chroma_weight` decides how much of the luma change
/// scales the color channels (keeping chroma) versus shifting them evenly.
pub fn tune_pixel(pixel: [f32; 3], tuning: &TuningSpot, lut: &[f32]) -> [f32; 3] {
    let y = luma(pixel);
    let mapped = lookup(lut, y.clamp(0.0, 1.0));

    let chroma_weight = tuning.chroma_weight() as f32;
    let offset = mapped - y;
    let ratio = if y > 1e-6 { mapped / y } else { 1.0 };
    let mut out = pixel.map(|c| {
        let scaled = c * ratio + if y > 1e-6 { 0.0 } else { offset };
        blend(c + offset, scaled, chroma_weight)
    });

    let saturation = tuning.saturation() as f32 / 100.0;
    if saturation != 0.0 {
        let delta = if tuning.is_adaptive_sat() {
            saturation * (1.0 - pixel_saturation(out))
        } else {
            saturation
        };
        let y = luma(out);
        out = out.map(|c| (y + (c - y) * (1.0 + delta)).max(0.0));
    }
    out
}

/// HSV-style saturation of a pixel in [0, 1].
fn pixel_saturation(pixel: [f32; 3]) -> f32 {
    let max = pixel[0].max(pixel[1]).max(pixel[2]);
    let min = pixel[0].min(pixel[1]).min(pixel[2]);
    if max <= 1e-6 {
        0.0
    } else {
        ((max - min) / max).clamp(0.0, 1.0)
    }
}

/// Linear interpolation in a LUT sampled evenly over [0, 1].
fn lookup(lut: &[f32], x: f32) -> f32 {
    match lut.len() {
        0 => x,
        1 => lut[0],
        n => {
            let pos = x * (n - 1) as f32;
            let i = (pos.floor() as usize).min(n - 2);
            let t = pos - i as f32;
            blend(lut[i], lut[i + 1], t)
        }
    }
}

fn check_buffer(data: &[f32], width: usize, height: usize) -> Result<(), String> {
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| format!("Image size {}x{} overflows", width, height))?;
    if data.len() != expected {
        return Err(format!(
            "Image buffer has {} values, expected {} for {}x{} RGB",
            data.len(),
            expected,
            width,
            height
        ));
    }
    Ok(())
}

/// Clip `[start, start + len)` to `[0, limit)`.
fn clip_span(start: i64, len: usize, limit: usize) -> Option<(usize, usize)> {
    let begin = start.max(0);
    let end = (start + len as i64).min(limit as i64);
    (end > begin).then_some((begin as usize, end as usize))
}
