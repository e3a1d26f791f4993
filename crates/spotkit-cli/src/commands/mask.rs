use std::path::Path;

use spotkit_core::config::SpotkitConfig;
use spotkit_core::exporters::{composite_mask, export_gray16_png, export_weight_png};
use spotkit_core::PipeSize;

use super::SpotFile;

/// What `spotkit mask` renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskTarget {
    /// One spot's weight matrix at its own size.
    Spot(usize),
    /// All enabled spots combined over an image of the given size
    /// (current pipe-size scale).
    Composite { width: usize, height: usize },
}

/// Export a weight mask as a 16-bit grayscale PNG.
pub fn cmd_mask(
    file: &Path,
    target: MaskTarget,
    out: &Path,
    pipe_size: Option<PipeSize>,
    prefix: Option<&str>,
    config: &SpotkitConfig,
) -> Result<(), String> {
    let mut spots = SpotFile::open(file, prefix, config)?;
    let pipe_size = pipe_size.unwrap_or_else(|| config.defaults.pipe_size());
    spots.list.set_pipe_size(pipe_size);

    match target {
        MaskTarget::Spot(index) => {
            spots.check_index(index)?;
            let spot = spots
                .list
                .get(index)
                .ok_or_else(|| format!("Spot index {} out of range", index))?;
            let weights = spot.base().weights();
            export_weight_png(weights, out)?;
            println!(
                "Wrote {}x{} mask of spot {} at {} to {}",
                weights.width(),
                weights.height(),
                index,
                pipe_size.label(),
                out.display()
            );
        }
        MaskTarget::Composite { width, height } => {
            if width == 0 || height == 0 {
                return Err("Composite mask size must be non-zero".to_string());
            }
            let mask = composite_mask(&spots.list, width, height);
            export_gray16_png(&mask, width, height, out)?;
            println!(
                "Wrote {}x{} composite mask of {} spot(s) at {} to {}",
                width,
                height,
                spots.list.enabled().count(),
                pipe_size.label(),
                out.display()
            );
        }
    }
    Ok(())
}
