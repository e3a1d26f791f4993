//! Tuning preset management
//!
//! Load, save, and list named sets of tuning values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::ConfigStore;
use crate::storable::Storable;
use crate::tuning::TuningSpot;

/// A named set of tuning values, keyed like `TuningSpot::store_config("")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TuningPreset {
    pub name: String,
    #[serde(default)]
    pub values: ConfigStore,
}

impl TuningPreset {
    /// Capture the tuning values of `spot` (geometry is not part of a preset).
    pub fn from_spot(name: &str, spot: &TuningSpot) -> Self {
        Self {
            name: name.to_string(),
            values: spot.store_config(""),
        }
    }

    /// Apply to `spot`. Keys missing from the preset reset to the spot's
    /// catalog defaults.
    pub fn apply(&self, spot: &mut TuningSpot) {
        spot.load_config(&self.values, "");
    }
}

/// Validate a preset name to prevent path traversal attacks.
/// Rejects names containing path separators, "..", or other dangerous patterns.
pub fn validate_preset_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Preset name cannot be empty".to_string());
    }

    if name.contains('/') || name.contains('\\') {
        return Err("Preset name cannot contain path separators".to_string());
    }

    if name.contains("..") {
        return Err("Preset name cannot contain '..'".to_string());
    }

    // Hidden files
    if name.starts_with('.') {
        return Err("Preset name cannot start with '.'".to_string());
    }

    if name.contains('\0') {
        return Err("Preset name cannot contain null bytes".to_string());
    }

    Ok(())
}

/// Load a tuning preset from a YAML file
pub fn load_tuning_preset<P: AsRef<Path>>(path: P) -> Result<TuningPreset, String> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read preset file: {}", e))?;

    serde_yaml::from_str(&contents).map_err(|e| format!("Failed to parse preset YAML: {}", e))
}

/// Save a tuning preset to a YAML file
pub fn save_tuning_preset<P: AsRef<Path>>(preset: &TuningPreset, path: P) -> Result<(), String> {
    let path = path.as_ref();
    let yaml =
        serde_yaml::to_string(preset).map_err(|e| format!("Failed to serialize preset: {}", e))?;

    std::fs::write(path, yaml).map_err(|e| format!("Failed to write preset file: {}", e))
}

/// Path of the preset called `name` inside `dir`.
pub fn preset_path<P: AsRef<Path>>(dir: P, name: &str) -> Result<PathBuf, String> {
    validate_preset_name(name)?;
    Ok(dir.as_ref().join(format!("{}.yml", name)))
}

/// List all available presets in a directory, sorted by name
pub fn list_presets<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, String> {
    let dir = dir.as_ref();
    let mut presets = Vec::new();

    let entries =
        std::fs::read_dir(dir).map_err(|e| format!("Failed to read presets directory: {}", e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read directory entry: {}", e))?;
        let path = entry.path();

        if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml") | Some("yaml")
        ) {
            if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                presets.push(name.to_string());
            }
        }
    }

    presets.sort();
    Ok(presets)
}

/// Get the default tuning presets directory, creating it if needed
pub fn get_presets_dir() -> Result<PathBuf, String> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| "Could not determine home directory".to_string())?;

    let presets_dir = home_dir.join("spotkit").join("presets").join("tuning");

    if !presets_dir.exists() {
        std::fs::create_dir_all(&presets_dir)
            .map_err(|e| format!("Failed to create presets directory: {}", e))?;
    }

    Ok(presets_dir)
}
