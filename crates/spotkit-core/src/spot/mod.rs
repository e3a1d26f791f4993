//! Image spots: user-placed elliptical regions for local adjustments.
//!
//! Every spot keeps its geometry at full resolution and answers queries in
//! the scale of the pipe size it was last told about. The weight mask is
//! rebuilt inside every mutator that can change it, so readers always see a
//! mask that matches the current geometry.

mod image_spot;
mod repair;
mod weight;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use image_spot::{ImageSpot, MAX_LENGTH};
pub use repair::RepairSpot;
pub use weight::{smootherstep, MaskShape, WeightMatrix, MAX_MASK_CELLS, WEIGHT_MAX};

use crate::models::{ConfigCatalog, ConfigValue, PipeSize};
use crate::settings::IniSettings;
use crate::tuning::TuningSpot;

/// Key naming the concrete spot type of a persisted entry.
pub const KEY_KIND: &str = "Kind";

/// Concrete spot types that can live in a `SpotList`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpotKind {
    Image,
    Tuning,
    Repair,
}

impl SpotKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SpotKind::Image => "image",
            SpotKind::Tuning => "tuning",
            SpotKind::Repair => "repair",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Some(SpotKind::Image),
            "tuning" => Some(SpotKind::Tuning),
            "repair" => Some(SpotKind::Repair),
            _ => None,
        }
    }
}

impl std::fmt::Display for SpotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Common interface of all spot types.
///
/// Geometry lives in the embedded `ImageSpot`; implementors only add their
/// own state and override the hooks that must touch it.
pub trait Spot: std::fmt::Debug + Send + Sync {
    fn kind(&self) -> SpotKind;

    fn base(&self) -> &ImageSpot;

    fn base_mut(&mut self) -> &mut ImageSpot;

    /// Move the spot to `(x, y)` (current pipe-size scale). Types with
    /// linked geometry override this to move every part together.
    fn set_pos(&mut self, x: u32, y: u32) {
        self.base_mut().move_center(x, y);
    }

    /// Switch the active pipe size.
    fn set_pipe_size(&mut self, pipe_size: PipeSize) {
        self.base_mut().set_pipe_size(pipe_size);
    }

    /// Write all attributes at the currently selected array index.
    fn write_to_ini(&self, ini: &mut IniSettings);

    fn as_tuning(&self) -> Option<&TuningSpot> {
        None
    }

    fn as_tuning_mut(&mut self) -> Option<&mut TuningSpot> {
        None
    }
}

/// Rebuild a spot of whatever kind is stored at the current array index.
/// Entries without a recognizable kind load as plain image spots.
pub fn spot_from_ini(ini: &IniSettings, catalog: &Arc<ConfigCatalog>) -> Box<dyn Spot> {
    let kind = ini
        .value(KEY_KIND)
        .and_then(ConfigValue::as_str)
        .and_then(SpotKind::parse)
        .unwrap_or(SpotKind::Image);

    match kind {
        SpotKind::Image => Box::new(ImageSpot::from_ini(ini)),
        SpotKind::Tuning => Box::new(TuningSpot::from_ini(ini, Arc::clone(catalog))),
        SpotKind::Repair => Box::new(RepairSpot::from_ini(ini)),
    }
}

pub(crate) fn read_bool(ini: &IniSettings, key: &str, default: bool) -> bool {
    ini.value(key).and_then(ConfigValue::as_bool).unwrap_or(default)
}

pub(crate) fn read_u32(ini: &IniSettings, key: &str, default: u32) -> u32 {
    ini.value(key).and_then(ConfigValue::as_u32).unwrap_or(default)
}

pub(crate) fn read_f32(ini: &IniSettings, key: &str, default: f32) -> f32 {
    ini.value(key).and_then(ConfigValue::as_f32).unwrap_or(default)
}
