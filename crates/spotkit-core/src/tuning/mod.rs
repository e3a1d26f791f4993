//! Local tuning: spots that carry a luma curve and saturation/color
//! adjustments on top of the base geometry.

mod curve;
mod spot;


use std::sync::OnceLock;

pub use curve::{Interpolation, ToneCurve, IDENTITY_ANCHORS, KEY_ANCHORS, KEY_INTERPOLATION};
pub use spot::TuningSpot;

use crate::models::{ConfigCatalog, ConfigItem};

pub const KEY_HAS_MAX_RADIUS: &str = "HasMaxRadius";
pub const KEY_MAX_RADIUS: &str = "MaxRadius";
pub const KEY_CHROMA_WEIGHT: &str = "ChromaWeight";
pub const KEY_THRESHOLD: &str = "Threshold";
pub const KEY_LUMA_CURVE: &str = "LumaCurve";
pub const KEY_SATURATION: &str = "Saturation";
pub const KEY_IS_ADAPTIVE_SAT: &str = "IsAdaptiveSat";
pub const KEY_COLOR_SHIFT: &str = "ColorShift";

/// Scalar tuning keys, in persistence order. `LumaCurve` is stored through
/// the curve itself.
pub const SCALAR_KEYS: [&str; 7] = [
    KEY_HAS_MAX_RADIUS,
    KEY_MAX_RADIUS,
    KEY_CHROMA_WEIGHT,
    KEY_THRESHOLD,
    KEY_SATURATION,
    KEY_IS_ADAPTIVE_SAT,
    KEY_COLOR_SHIFT,
];

impl ConfigCatalog {
    /// Built-in defaults and ranges for tuning spots.
    pub fn tuning_spot_defaults() -> Self {
        ConfigCatalog::new(vec![
            ConfigItem::new(KEY_HAS_MAX_RADIUS, false),
            ConfigItem::new(KEY_MAX_RADIUS, 500i64).with_range(1.0, 10_000.0),
            ConfigItem::new(KEY_CHROMA_WEIGHT, 0.5f64).with_range(0.0, 1.0),
            ConfigItem::new(KEY_THRESHOLD, 0.25f64).with_range(0.0, 0.5),
            ConfigItem::new(KEY_SATURATION, 0i64).with_range(-100.0, 100.0),
            ConfigItem::new(KEY_IS_ADAPTIVE_SAT, false),
            ConfigItem::new(KEY_COLOR_SHIFT, 0.0f64).with_range(0.0, 1.0),
            ConfigItem::new(KEY_LUMA_CURVE, IDENTITY_ANCHORS.to_vec()),
        ])
    }
}

/// Shared built-in catalog, consulted for keys a custom catalog lacks.
pub(crate) fn builtin_catalog() -> &'static ConfigCatalog {
    static BUILTIN: OnceLock<ConfigCatalog> = OnceLock::new();
    BUILTIN.get_or_init(ConfigCatalog::tuning_spot_defaults)
}
