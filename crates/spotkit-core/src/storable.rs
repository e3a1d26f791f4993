//! Key/value configuration contract shared by spots and their parts.
//!
//! Callers go through `store_config` / `load_config`, which normalize the key
//! prefix before handing it to the implementor's `do_*` hooks, so every
//! implementation sees the same canonical form no matter how the caller
//! spelled it.

use crate::models::{ConfigStore, ConfigValue};

/// Separator between prefix segments and keys.
pub const KEY_SEPARATOR: char = '/';

/// Collapse any trailing separators to exactly one. Empty prefixes stay
/// empty so that keys are stored bare.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches(KEY_SEPARATOR);
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}{}", trimmed, KEY_SEPARATOR)
    }
}

/// Types whose state can be written to and restored from a `ConfigStore`.
pub trait Storable {
    /// Serialize all keys under `prefix`.
    fn store_config(&self, prefix: &str) -> ConfigStore {
        self.do_store_config(&normalize_prefix(prefix))
    }

    /// Restore state from `config`. Keys missing from the map fall back to
    /// the implementor's defaults; loading never fails.
    fn load_config(&mut self, config: &ConfigStore, prefix: &str) {
        self.do_load_config(config, &normalize_prefix(prefix))
    }

    /// Read a single key (unprefixed). `None` for unknown keys.
    fn get_value(&self, key: &str) -> Option<ConfigValue> {
        self.do_get_value(key)
    }

    /// Set a single key (unprefixed). Returns false when the key is unknown
    /// or the value is rejected.
    fn set_value(&mut self, key: &str, value: ConfigValue) -> bool {
        self.do_set_value(key, value)
    }

    /// `prefix` is already normalized.
    fn do_store_config(&self, prefix: &str) -> ConfigStore;

    /// `prefix` is already normalized.
    fn do_load_config(&mut self, config: &ConfigStore, prefix: &str);

    fn do_get_value(&self, key: &str) -> Option<ConfigValue>;

    fn do_set_value(&mut self, key: &str, value: ConfigValue) -> bool;
}
