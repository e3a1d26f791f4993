//! Mask exporters
//!
//! Write spot weight masks as 16-bit grayscale PNG files for inspection.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::spot::{WeightMatrix, WEIGHT_MAX};
use crate::spot_list::SpotList;

/// Export one spot's weight matrix at its own size (center pixel in the
/// middle of the image).
pub fn export_weight_png<P: AsRef<Path>>(weights: &WeightMatrix, path: P) -> Result<(), String> {
    if weights.is_empty() {
        return Err("Weight matrix is empty".to_string());
    }
    export_gray16_png(weights.data(), weights.width(), weights.height(), path)
}

/// Combined mask of all enabled spots over a `width` x `height` image:
/// per pixel the strongest weight times opacity.
pub fn composite_mask(spots: &SpotList, width: usize, height: usize) -> Vec<u16> {
    let mut mask = vec![0u16; width * height];

    for spot in spots.enabled() {
        let base = spot.base();
        let (left, top, box_w, box_h) = base.bounding_box();
        let opacity = base.opacity();

        for my in 0..box_h {
            let iy = top + my as i64;
            if iy < 0 || iy >= height as i64 {
                continue;
            }
            for mx in 0..box_w {
                let ix = left + mx as i64;
                if ix < 0 || ix >= width as i64 {
                    continue;
                }
                let weight = base.weights().weight(mx, my) * opacity;
                let value = (weight.clamp(0.0, 1.0) * WEIGHT_MAX as f32).round() as u16;
                let cell = &mut mask[iy as usize * width + ix as usize];
                *cell = (*cell).max(value);
            }
        }
    }

    mask
}

/// Export raw 16-bit grayscale samples as PNG.
pub fn export_gray16_png<P: AsRef<Path>>(
    data: &[u16],
    width: usize,
    height: usize,
    path: P,
) -> Result<(), String> {
    if data.len() != width * height {
        return Err(format!(
            "Mask has {} samples, expected {} for {}x{}",
            data.len(),
            width * height,
            width,
            height
        ));
    }
    let png_width =
        u32::try_from(width).map_err(|_| format!("Mask width {} is too large", width))?;
    let png_height =
        u32::try_from(height).map_err(|_| format!("Mask height {} is too large", height))?;

    let file =
        File::create(path.as_ref()).map_err(|e| format!("Failed to create PNG file: {}", e))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), png_width, png_height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Sixteen);

    let mut writer = encoder
        .write_header()
        .map_err(|e| format!("Failed to write PNG header: {}", e))?;

    // PNG stores 16-bit samples big-endian.
    let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_be_bytes()).collect();
    writer
        .write_image_data(&bytes)
        .map_err(|e| format!("Failed to write PNG data: {}", e))
}
