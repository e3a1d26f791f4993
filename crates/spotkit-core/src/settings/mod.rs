//! Persisted key/value settings with groups and arrays.
//!
//! Keys are flat strings separated by `/`. Groups prefix every key written
//! while they are open; arrays store entry `i` under `name/<i + 1>/` and
//! their length under `name/size`. The whole map is persisted as YAML.

use std::collections::BTreeMap;
use std::path::Path;

use crate::models::ConfigValue;
use crate::verbose_println;


/// Key/value store backing spot persistence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniSettings {
    values: BTreeMap<String, ConfigValue>,
    scopes: Vec<Scope>,
}

#[derive(Debug, Clone, PartialEq)]
enum Scope {
    Group(String),
    Array(ArrayScope),
}

#[derive(Debug, Clone, PartialEq)]
struct ArrayScope {
    name: String,
    index: Option<usize>,
    size: usize,
    writing: bool,
}

impl IniSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a YAML file. A missing file yields empty settings.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        if !path.exists() {
            verbose_println!(
                "[settings] {} does not exist, starting empty",
                path.display()
            );
            return Ok(Self::new());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file: {}", e))?;
        if contents.trim().is_empty() {
            return Ok(Self::new());
        }

        let values: BTreeMap<String, ConfigValue> = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse settings YAML: {}", e))?;

        Ok(Self {
            values,
            scopes: Vec::new(),
        })
    }

    /// Write all settings to a YAML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let yaml = serde_yaml::to_string(&self.values)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(path.as_ref(), yaml)
            .map_err(|e| format!("Failed to write settings file: {}", e))
    }

    pub fn begin_group(&mut self, name: &str) {
        self.scopes.push(Scope::Group(name.trim_matches('/').to_string()));
    }

    pub fn end_group(&mut self) {
        match self.scopes.last() {
            Some(Scope::Group(_)) => {
                self.scopes.pop();
            }
            _ => verbose_println!("[settings] end_group() without matching begin_group()"),
        }
    }

    /// Open an array for writing. Entries are selected with `set_array_index`.
    pub fn begin_write_array(&mut self, name: &str) {
        self.scopes.push(Scope::Array(ArrayScope {
            name: name.trim_matches('/').to_string(),
            index: None,
            size: 0,
            writing: true,
        }));
    }

    /// Open an array for reading and return its stored length.
    pub fn begin_read_array(&mut self, name: &str) -> usize {
        let name = name.trim_matches('/').to_string();
        let size_key = format!("{}{}/size", self.prefix(), name);
        let size = self
            .values
            .get(&size_key)
            .and_then(ConfigValue::as_u32)
            .unwrap_or(0) as usize;

        self.scopes.push(Scope::Array(ArrayScope {
            name,
            index: None,
            size,
            writing: false,
        }));
        size
    }

    pub fn set_array_index(&mut self, index: usize) {
        match self.scopes.last_mut() {
            Some(Scope::Array(array)) => {
                array.index = Some(index);
                if array.writing {
                    array.size = array.size.max(index + 1);
                }
            }
            _ => verbose_println!("[settings] set_array_index() outside of an array"),
        }
    }

    /// Close the innermost array. Write arrays record their length.
    pub fn end_array(&mut self) {
        match self.scopes.last() {
            Some(Scope::Array(_)) => {}
            _ => {
                verbose_println!("[settings] end_array() without matching begin_*_array()");
                return;
            }
        }

        if let Some(Scope::Array(array)) = self.scopes.pop() {
            if array.writing {
                let size_key = format!("{}{}/size", self.prefix(), array.name);
                self.values.insert(size_key, ConfigValue::Int(array.size as i64));
            }
        }
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<ConfigValue>) {
        let full = self.full_key(key);
        self.values.insert(full, value.into());
    }

    pub fn value(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(&self.full_key(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(&self.full_key(key))
    }

    /// Remove `key` and everything below it. An empty key removes every
    /// entry under the current group.
    pub fn remove(&mut self, key: &str) {
        let key = key.trim_matches('/');
        let base = if key.is_empty() {
            self.prefix()
        } else {
            self.full_key(key)
        };

        if base.is_empty() {
            self.values.clear();
            return;
        }

        let nested = if base.ends_with('/') {
            base.clone()
        } else {
            format!("{}/", base)
        };
        let exact = base.trim_end_matches('/').to_string();
        self.values
            .retain(|k, _| k != &exact && !k.starts_with(&nested));
    }

    /// Keys visible from the current scope, relative to it.
    pub fn all_keys(&self) -> Vec<String> {
        let prefix = self.prefix();
        self.values
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix(), key.trim_matches('/'))
    }

    fn prefix(&self) -> String {
        let mut prefix = String::new();
        for scope in &self.scopes {
            match scope {
                Scope::Group(name) => {
                    if !name.is_empty() {
                        prefix.push_str(name);
                        prefix.push('/');
                    }
                }
                Scope::Array(array) => {
                    prefix.push_str(&array.name);
                    prefix.push('/');
                    if let Some(index) = array.index {
                        prefix.push_str(&(index + 1).to_string());
                        prefix.push('/');
                    }
                }
            }
        }
        prefix
    }
}
