//! Tuning spot: an image spot with a luma curve and color adjustments.

use std::sync::Arc;

use super::curve::{usable_anchors, Interpolation, ToneCurve};
use super::{
    builtin_catalog, KEY_CHROMA_WEIGHT, KEY_COLOR_SHIFT, KEY_HAS_MAX_RADIUS, KEY_IS_ADAPTIVE_SAT,
    KEY_LUMA_CURVE, KEY_MAX_RADIUS, KEY_SATURATION, KEY_THRESHOLD, SCALAR_KEYS,
};
use crate::models::{ConfigCatalog, ConfigItem, ConfigStore, ConfigValue};
use crate::settings::IniSettings;
use crate::spot::{ImageSpot, Spot, SpotKind};
use crate::storable::{normalize_prefix, Storable};

#[derive(Debug, Clone, PartialEq)]
pub struct TuningSpot {
    spot: ImageSpot,
    curve: ToneCurve,
    has_max_radius: bool,
    max_radius: i64,
    chroma_weight: f64,
    threshold: f64,
    saturation: i64,
    is_adaptive_sat: bool,
    color_shift: f64,
    catalog: Arc<ConfigCatalog>,
}

impl TuningSpot {
    /// Wrap `spot` with every tuning value at its catalog default.
    pub fn new(spot: ImageSpot, catalog: Arc<ConfigCatalog>) -> Self {
        let mut tuning = Self {
            spot,
            curve: ToneCurve::identity(),
            has_max_radius: false,
            max_radius: 0,
            chroma_weight: 0.0,
            threshold: 0.0,
            saturation: 0,
            is_adaptive_sat: false,
            color_shift: 0.0,
            catalog,
        };
        tuning.reset_to_defaults();
        tuning
    }

    /// Read base and tuning keys at the current array index.
    pub fn from_ini(ini: &IniSettings, catalog: Arc<ConfigCatalog>) -> Self {
        let mut tuning = Self::new(ImageSpot::from_ini(ini), catalog);

        let curve_prefix = normalize_prefix(KEY_LUMA_CURVE);
        let mut store = ConfigStore::new();
        let keys = SCALAR_KEYS.iter().map(|key| key.to_string()).chain(
            [super::KEY_ANCHORS, super::KEY_INTERPOLATION]
                .iter()
                .map(|key| format!("{}{}", curve_prefix, key)),
        );
        for key in keys {
            if let Some(value) = ini.value(&key) {
                store.insert(key, value.clone());
            }
        }

        tuning.load_config(&store, "");
        tuning
    }

    pub fn catalog(&self) -> &Arc<ConfigCatalog> {
        &self.catalog
    }

    pub fn curve(&self) -> &ToneCurve {
        &self.curve
    }

    pub fn curve_mut(&mut self) -> &mut ToneCurve {
        &mut self.curve
    }

    pub fn has_max_radius(&self) -> bool {
        self.has_max_radius
    }

    /// Maximum effect radius at full resolution.
    pub fn max_radius(&self) -> i64 {
        self.max_radius
    }

    /// Maximum effect radius at the spot's current pipe size.
    pub fn scaled_max_radius(&self) -> u32 {
        let full = u32::try_from(self.max_radius.max(0)).unwrap_or(u32::MAX);
        self.spot.pipe_size().scale_len(full)
    }

    pub fn chroma_weight(&self) -> f64 {
        self.chroma_weight
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Saturation change in percent, -100 to 100.
    pub fn saturation(&self) -> i64 {
        self.saturation
    }

    pub fn is_adaptive_sat(&self) -> bool {
        self.is_adaptive_sat
    }

    pub fn color_shift(&self) -> f64 {
        self.color_shift
    }

    /// Put every tuning value (curve included) back to its catalog default.
    pub fn reset_to_defaults(&mut self) {
        for key in SCALAR_KEYS {
            let default = self.default_for(key);
            if let Some(value) = default {
                self.assign(key, &value);
            }
        }
        self.curve = self.default_curve();
    }

    fn item(&self, key: &str) -> Option<&ConfigItem> {
        self.catalog
            .item(key)
            .or_else(|| builtin_catalog().item(key))
    }

    fn default_for(&self, key: &str) -> Option<ConfigValue> {
        self.item(key).map(|item| item.default.clone())
    }

    fn default_curve(&self) -> ToneCurve {
        let anchors = self
            .item(KEY_LUMA_CURVE)
            .and_then(|item| item.default.as_points())
            .map(<[_]>::to_vec)
            .unwrap_or_else(|| super::IDENTITY_ANCHORS.to_vec());
        ToneCurve::new(anchors, Interpolation::default())
    }

    /// Coerce `value` to the item's type and check its range.
    fn validated(&self, key: &str, value: &ConfigValue) -> Option<ConfigValue> {
        self.item(key).and_then(|item| item.validate(value))
    }

    /// Store an already validated scalar. Returns false for unknown keys.
    fn assign(&mut self, key: &str, value: &ConfigValue) -> bool {
        match key {
            KEY_HAS_MAX_RADIUS => assign_to(&mut self.has_max_radius, value.as_bool()),
            KEY_MAX_RADIUS => assign_to(&mut self.max_radius, value.as_i64()),
            KEY_CHROMA_WEIGHT => assign_to(&mut self.chroma_weight, value.as_f64()),
            KEY_THRESHOLD => assign_to(&mut self.threshold, value.as_f64()),
            KEY_SATURATION => assign_to(&mut self.saturation, value.as_i64()),
            KEY_IS_ADAPTIVE_SAT => assign_to(&mut self.is_adaptive_sat, value.as_bool()),
            KEY_COLOR_SHIFT => assign_to(&mut self.color_shift, value.as_f64()),
            _ => false,
        }
    }

    fn scalar_value(&self, key: &str) -> Option<ConfigValue> {
        let value = match key {
            KEY_HAS_MAX_RADIUS => ConfigValue::Bool(self.has_max_radius),
            KEY_MAX_RADIUS => ConfigValue::Int(self.max_radius),
            KEY_CHROMA_WEIGHT => ConfigValue::Float(self.chroma_weight),
            KEY_THRESHOLD => ConfigValue::Float(self.threshold),
            KEY_SATURATION => ConfigValue::Int(self.saturation),
            KEY_IS_ADAPTIVE_SAT => ConfigValue::Bool(self.is_adaptive_sat),
            KEY_COLOR_SHIFT => ConfigValue::Float(self.color_shift),
            _ => return None,
        };
        Some(value)
    }
}

fn assign_to<T>(field: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *field = value;
            true
        }
        None => false,
    }
}

impl Storable for TuningSpot {
    fn do_store_config(&self, prefix: &str) -> ConfigStore {
        let mut store = ConfigStore::new();
        for key in SCALAR_KEYS {
            if let Some(value) = self.scalar_value(key) {
                store.insert(format!("{}{}", prefix, key), value);
            }
        }
        store.extend(
            self.curve
                .store_config(&format!("{}{}", prefix, KEY_LUMA_CURVE)),
        );
        store
    }

    fn do_load_config(&mut self, config: &ConfigStore, prefix: &str) {
        for key in SCALAR_KEYS {
            let stored = config
                .get(&format!("{}{}", prefix, key))
                .and_then(|value| self.validated(key, value));
            if let Some(value) = stored.or_else(|| self.default_for(key)) {
                self.assign(key, &value);
            }
        }

        let curve_prefix = format!("{}{}", prefix, KEY_LUMA_CURVE);
        let anchors_key = format!("{}{}", normalize_prefix(&curve_prefix), super::KEY_ANCHORS);
        let usable = config
            .get(&anchors_key)
            .and_then(ConfigValue::as_points)
            .and_then(usable_anchors);
        if usable.is_some() {
            self.curve.load_config(config, &curve_prefix);
        } else {
            self.curve = self.default_curve();
        }
    }

    fn do_get_value(&self, key: &str) -> Option<ConfigValue> {
        if key == KEY_LUMA_CURVE {
            return Some(ConfigValue::Points(self.curve.anchors().to_vec()));
        }
        self.scalar_value(key)
    }

    fn do_set_value(&mut self, key: &str, value: ConfigValue) -> bool {
        if key == KEY_LUMA_CURVE {
            return self.curve.set_value(super::KEY_ANCHORS, value);
        }
        match self.validated(key, &value) {
            Some(valid) => self.assign(key, &valid),
            None => false,
        }
    }
}

impl Spot for TuningSpot {
    fn kind(&self) -> SpotKind {
        SpotKind::Tuning
    }

    fn base(&self) -> &ImageSpot {
        &self.spot
    }

    fn base_mut(&mut self) -> &mut ImageSpot {
        &mut self.spot
    }

    fn write_to_ini(&self, ini: &mut IniSettings) {
        self.spot.write_to_ini(ini);
        for (key, value) in self.store_config("") {
            ini.set_value(&key, value);
        }
    }

    fn as_tuning(&self) -> Option<&TuningSpot> {
        Some(self)
    }

    fn as_tuning_mut(&mut self) -> Option<&mut TuningSpot> {
        Some(self)
    }
}
