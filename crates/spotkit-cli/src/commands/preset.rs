use std::path::{Path, PathBuf};

use spotkit_core::config::SpotkitConfig;
use spotkit_core::presets::{
    get_presets_dir, list_presets, load_tuning_preset, preset_path, save_tuning_preset,
    TuningPreset,
};
use spotkit_core::TuningSpot;

use super::SpotFile;

fn presets_dir(dir: Option<PathBuf>) -> Result<PathBuf, String> {
    match dir {
        Some(dir) => Ok(dir),
        None => get_presets_dir(),
    }
}

/// Resolve `preset` as a file path first, then as a name in the presets directory.
fn resolve_preset(preset: &str, dir: Option<PathBuf>) -> Result<PathBuf, String> {
    let as_path = PathBuf::from(preset);
    if as_path.is_file() {
        return Ok(as_path);
    }
    preset_path(presets_dir(dir)?, preset)
}

fn tuning_spot<'a>(spots: &'a mut SpotFile, index: usize) -> Result<&'a mut TuningSpot, String> {
    spots.check_index(index)?;
    spots
        .list
        .get_mut(index)
        .and_then(|spot| spot.as_tuning_mut())
        .ok_or_else(|| format!("Spot {} is not a tuning spot", index))
}

/// List available tuning presets in the specified or default directory.
pub fn cmd_preset_list(dir: Option<PathBuf>) -> Result<(), String> {
    let dir = presets_dir(dir)?;

    println!("Listing presets in: {}", dir.display());
    let presets = list_presets(&dir).map_err(|e| format!("Failed to list presets: {}", e))?;
    if presets.is_empty() {
        println!("No presets found.");
    } else {
        for preset in presets {
            println!("  {}", preset);
        }
    }
    Ok(())
}

/// Save the tuning values of spot `index` as preset `name`.
pub fn cmd_preset_save(
    file: &Path,
    index: usize,
    name: &str,
    dir: Option<PathBuf>,
    prefix: Option<&str>,
    config: &SpotkitConfig,
) -> Result<(), String> {
    let path = preset_path(presets_dir(dir)?, name)?;
    let mut spots = SpotFile::open(file, prefix, config)?;
    let preset = TuningPreset::from_spot(name, tuning_spot(&mut spots, index)?);

    save_tuning_preset(&preset, &path)?;
    println!("Preset saved: {}", path.display());
    Ok(())
}

/// Load preset `preset` (name or file) into spot `index` and save the file.
pub fn cmd_preset_apply(
    file: &Path,
    index: usize,
    preset: &str,
    dir: Option<PathBuf>,
    prefix: Option<&str>,
    config: &SpotkitConfig,
) -> Result<(), String> {
    let preset = load_tuning_preset(resolve_preset(preset, dir)?)?;
    let mut spots = SpotFile::open(file, prefix, config)?;

    preset.apply(tuning_spot(&mut spots, index)?);
    spots.save()?;

    println!("Applied preset '{}' to spot {}", preset.name, index);
    Ok(())
}
