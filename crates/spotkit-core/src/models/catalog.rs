//! Catalog of configurable items with defaults and valid ranges.

use serde::{Deserialize, Serialize};

use super::ConfigValue;

/// One configurable item: its key, default value and optional numeric range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub id: String,
    pub default: ConfigValue,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl ConfigItem {
    pub fn new(id: &str, default: impl Into<ConfigValue>) -> Self {
        Self {
            id: id.to_string(),
            default: default.into(),
            min: None,
            max: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Check a candidate value against this item's type and range.
    ///
    /// Returns the value coerced to the default's type (an `Int` given for
    /// a `Float` item becomes a `Float`), or `None` when it does not fit.
    pub fn validate(&self, value: &ConfigValue) -> Option<ConfigValue> {
        let coerced = match &self.default {
            ConfigValue::Bool(_) => ConfigValue::Bool(value.as_bool()?),
            ConfigValue::Int(_) => ConfigValue::Int(value.as_i64()?),
            ConfigValue::Float(_) => ConfigValue::Float(value.as_f64()?),
            ConfigValue::Text(_) => ConfigValue::Text(value.as_str()?.to_string()),
            ConfigValue::Points(_) => ConfigValue::Points(value.as_points()?.to_vec()),
        };

        let number = match &coerced {
            ConfigValue::Int(i) => Some(*i as f64),
            ConfigValue::Float(f) => Some(*f),
            _ => None,
        };
        if let Some(number) = number {
            if self.min.is_some_and(|min| number < min) || self.max.is_some_and(|max| number > max)
            {
                return None;
            }
        }

        Some(coerced)
    }
}

/// Read-only lookup of defaults, shared between all spots of one filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigCatalog {
    items: Vec<ConfigItem>,
}

impl ConfigCatalog {
    pub fn new(items: Vec<ConfigItem>) -> Self {
        Self { items }
    }

    pub fn item(&self, id: &str) -> Option<&ConfigItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn default_value(&self, id: &str) -> Option<&ConfigValue> {
        self.item(id).map(|item| &item.default)
    }

    pub fn items(&self) -> &[ConfigItem] {
        &self.items
    }

    /// Replace the default of an existing item, or append a new item.
    ///
    /// Returns false when the new default is rejected by the existing
    /// item's type or range.
    pub fn set_default(&mut self, id: &str, value: ConfigValue) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => match item.validate(&value) {
                Some(valid) => {
                    item.default = valid;
                    true
                }
                None => false,
            },
            None => {
                self.items.push(ConfigItem::new(id, value));
                true
            }
        }
    }
}
