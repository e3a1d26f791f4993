//! Default spot parameters and tuning overrides, with their sanitization.

use serde::{Deserialize, Serialize};

use crate::models::{ConfigCatalog, ConfigValue, PipeSize, SpotGeometry};
use crate::tuning::{
    KEY_CHROMA_WEIGHT, KEY_COLOR_SHIFT, KEY_HAS_MAX_RADIUS, KEY_IS_ADAPTIVE_SAT, KEY_LUMA_CURVE,
    KEY_MAX_RADIUS, KEY_SATURATION, KEY_THRESHOLD,
};

/// Parameters used for newly created spots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotDefaults {
    /// Pipe-size level the editor works at (0 = 1:1, 4 = 1:16)
    pub pipe_size: u8,
    /// Core radius in full-resolution pixels
    pub radius: u32,
    /// Feather band width in full-resolution pixels
    pub edge_radius: u32,
    /// Feather shape, 0.0 = linear, 1.0 = smootherstep
    pub edge_blur: f32,
    pub opacity: f32,
    /// Prefix of the spot list's settings group ("Local" gives "LocalSpot")
    pub ini_prefix: String,
}

impl SpotDefaults {
    pub(crate) fn sanitize(&mut self) {
        self.pipe_size = self.pipe_size.min(PipeSize::MAX_LEVEL);
        self.edge_blur = if self.edge_blur.is_finite() {
            self.edge_blur.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.opacity = if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.ini_prefix = self.ini_prefix.trim().trim_matches('/').to_string();
    }

    pub fn pipe_size(&self) -> PipeSize {
        PipeSize::new(self.pipe_size)
    }

    /// Circular geometry at `(x, y)` with the configured radii and feather.
    pub fn geometry_at(&self, x: u32, y: u32) -> SpotGeometry {
        SpotGeometry {
            edge_blur: self.edge_blur,
            opacity: self.opacity,
            ..SpotGeometry::circle(x, y, self.radius, self.edge_radius)
        }
    }
}

impl Default for SpotDefaults {
    fn default() -> Self {
        Self {
            pipe_size: 0,
            radius: 100,
            edge_radius: 50,
            edge_blur: 0.5,
            opacity: 1.0,
            ini_prefix: "Local".to_string(),
        }
    }
}

/// Optional replacements for the built-in tuning defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_max_radius: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_radius: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chroma_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_adaptive_sat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_shift: Option<f64>,
    /// Curve anchors as `[x, y]` pairs in [0, 1]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub luma_curve: Option<Vec<[f32; 2]>>,
}

impl TuningOverrides {
    fn entries(&self) -> Vec<(&'static str, ConfigValue)> {
        let mut entries = Vec::new();
        if let Some(value) = self.has_max_radius {
            entries.push((KEY_HAS_MAX_RADIUS, ConfigValue::from(value)));
        }
        if let Some(value) = self.max_radius {
            entries.push((KEY_MAX_RADIUS, ConfigValue::from(value)));
        }
        if let Some(value) = self.chroma_weight {
            entries.push((KEY_CHROMA_WEIGHT, ConfigValue::from(value)));
        }
        if let Some(value) = self.threshold {
            entries.push((KEY_THRESHOLD, ConfigValue::from(value)));
        }
        if let Some(value) = self.saturation {
            entries.push((KEY_SATURATION, ConfigValue::from(value)));
        }
        if let Some(value) = self.is_adaptive_sat {
            entries.push((KEY_IS_ADAPTIVE_SAT, ConfigValue::from(value)));
        }
        if let Some(value) = self.color_shift {
            entries.push((KEY_COLOR_SHIFT, ConfigValue::from(value)));
        }
        if let Some(value) = &self.luma_curve {
            entries.push((KEY_LUMA_CURVE, ConfigValue::from(value.clone())));
        }
        entries
    }

    /// Apply every override to `catalog`. Returns one warning per rejected
    /// value; rejected overrides leave the built-in default in place.
    pub fn apply_to(&self, catalog: &mut ConfigCatalog) -> Vec<String> {
        let mut warnings = Vec::new();
        for (key, value) in self.entries() {
            let shown = value.to_string();
            let accepted = match &value {
                ConfigValue::Points(points) if points.len() < 2 => false,
                _ => catalog.set_default(key, value),
            };
            if !accepted {
                warnings.push(format!(
                    "Ignoring tuning override {} = {} (out of range or wrong type)",
                    key, shown
                ));
            }
        }
        warnings
    }
}
