//! Tool configuration management.
//!
//! This module provides configuration loading, the global verbose flag and
//! the `verbose_println!` macro used for diagnostic output.

mod defaults;

pub use defaults::{SpotDefaults, TuningOverrides};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, OnceLock};

use serde::{Deserialize, Serialize};

use crate::models::ConfigCatalog;

// Global verbose flag for controlling debug output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, debug messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Config file names searched for on disk, in order.
const CONFIG_FILENAMES: &[&str] = &["spotkit.yml", "spotkit.yaml"];

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SPOTKIT_CONFIG";

/// Loaded configuration, where it came from, and anything that went wrong.
pub struct SpotkitConfigHandle {
    pub config: SpotkitConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl SpotkitConfigHandle {
    fn with_config(config: SpotkitConfig, source: Option<PathBuf>, warnings: Vec<String>) -> Self {
        Self {
            config,
            source,
            warnings,
        }
    }
}

/// Complete configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SpotkitConfig {
    pub defaults: SpotDefaults,
    pub tuning: TuningOverrides,
}

impl SpotkitConfig {
    fn sanitize(mut self) -> Self {
        self.defaults.sanitize();
        self
    }

    /// Built-in tuning catalog with this config's overrides applied.
    pub fn tuning_catalog(&self) -> ConfigCatalog {
        let mut catalog = ConfigCatalog::tuning_spot_defaults();
        for warning in self.tuning.apply_to(&mut catalog) {
            verbose_println!("[spotkit] {}", warning);
        }
        catalog
    }

    /// YAML text of this config, as written by `spotkit init`.
    pub fn to_yaml(&self) -> Result<String, String> {
        serde_yaml::to_string(self).map_err(|e| format!("Failed to serialize config: {}", e))
    }
}

/// Load configuration from disk, optionally forcing a specific path.
///
/// Never fails: unreadable or unparseable candidates are recorded as
/// warnings and the search continues, ending with built-in defaults.
pub fn load_spot_config(custom_path: Option<&Path>) -> SpotkitConfigHandle {
    let mut warnings = Vec::new();
    let candidates = get_config_candidates(custom_path);

    for candidate in candidates {
        if !candidate.exists() || !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<SpotkitConfig>(&contents) {
                Ok(config) => {
                    let sanitized = config.sanitize();
                    let mut scratch = ConfigCatalog::tuning_spot_defaults();
                    warnings.extend(sanitized.tuning.apply_to(&mut scratch));
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return SpotkitConfigHandle::with_config(sanitized, Some(source), warnings);
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse spotkit config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read spotkit config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    warnings.push("No spotkit config found; using built-in defaults.".to_string());
    SpotkitConfigHandle::with_config(SpotkitConfig::default(), None, warnings)
}

/// Get list of config file candidates to try
fn get_config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home_dir.join("spotkit").join(name));
        }
    }

    candidates
}

/// Default location written by `spotkit init`.
pub fn default_config_path() -> Result<PathBuf, String> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| "Could not determine home directory".to_string())?;
    Ok(home_dir.join("spotkit").join(CONFIG_FILENAMES[0]))
}

static CONFIG_HANDLE: OnceLock<SpotkitConfigHandle> = OnceLock::new();
static PRINT_CONFIG_ONCE: Once = Once::new();

/// Access the global configuration (loaded once per process).
///
/// The first caller decides the explicit path; later calls ignore theirs.
pub fn config_handle_with(custom_path: Option<&Path>) -> &'static SpotkitConfigHandle {
    CONFIG_HANDLE.get_or_init(|| load_spot_config(custom_path))
}

/// Access the global configuration using only the default search path.
pub fn config_handle() -> &'static SpotkitConfigHandle {
    config_handle_with(None)
}

/// Print config source and warnings the first time it is requested (only in verbose mode).
pub fn log_config_usage() {
    PRINT_CONFIG_ONCE.call_once(|| {
        if !is_verbose() {
            return;
        }
        let handle = config_handle();
        if let Some(source) = &handle.source {
            eprintln!("[spotkit] Loaded config from {}", source.display());
        } else {
            eprintln!("[spotkit] Using built-in defaults");
        }

        for warning in &handle.warnings {
            eprintln!("[spotkit] Config warning: {}", warning);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConfigValue;
    use crate::tuning::{KEY_MAX_RADIUS, KEY_SATURATION};

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spotkit.yml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_explicit_config() {
        let (_dir, path) = write_config(
            "defaults:\n  pipe_size: 2\n  radius: 40\n  ini_prefix: Tuning\n",
        );

        let handle = load_spot_config(Some(&path));

        assert!(handle.source.is_some());
        assert_eq!(handle.config.defaults.pipe_size, 2);
        assert_eq!(handle.config.defaults.radius, 40);
        assert_eq!(handle.config.defaults.ini_prefix, "Tuning");
        // Unspecified fields keep their defaults.
        assert_eq!(handle.config.defaults.edge_radius, SpotDefaults::default().edge_radius);
    }

    #[test]
    fn test_loaded_defaults_are_sanitized() {
        let (_dir, path) = write_config(
            "defaults:\n  pipe_size: 9\n  opacity: 4.0\n  edge_blur: -1.0\n  ini_prefix: ' Local/ '\n",
        );

        let defaults = load_spot_config(Some(&path)).config.defaults;

        assert_eq!(defaults.pipe_size, crate::models::PipeSize::MAX_LEVEL);
        assert!((defaults.opacity - 1.0).abs() < f32::EPSILON);
        assert!((defaults.edge_blur - 0.0).abs() < f32::EPSILON);
        assert_eq!(defaults.ini_prefix, "Local");
    }

    #[test]
    fn test_invalid_yaml_is_a_warning() {
        let (_dir, path) = write_config("defaults: [not, a, map\n");

        let handle = load_spot_config(Some(&path));

        assert!(handle
            .warnings
            .iter()
            .any(|w| w.contains("Failed to parse spotkit config")));
    }

    #[test]
    fn test_tuning_overrides_reach_catalog() {
        let (_dir, path) = write_config("tuning:\n  saturation: 35\n  max_radius: 0\n");

        let handle = load_spot_config(Some(&path));
        let catalog = handle.config.tuning_catalog();

        assert_eq!(catalog.default_value(KEY_SATURATION), Some(&ConfigValue::Int(35)));
        // Out of range: built-in default stays.
        assert_eq!(catalog.default_value(KEY_MAX_RADIUS), Some(&ConfigValue::Int(500)));
        assert!(handle.warnings.iter().any(|w| w.contains("MaxRadius")));
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = SpotkitConfig {
            tuning: TuningOverrides {
                saturation: Some(10),
                ..Default::default()
            },
            ..Default::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert!(!yaml.contains("chroma_weight"));

        let parsed: SpotkitConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_geometry_from_defaults() {
        let defaults = SpotDefaults {
            radius: 12,
            edge_radius: 3,
            edge_blur: 0.25,
            opacity: 0.5,
            ..Default::default()
        };
        let geometry = defaults.geometry_at(7, 9);
        assert_eq!((geometry.x, geometry.y), (7, 9));
        assert_eq!((geometry.radius_w, geometry.radius_h), (12, 12));
        assert_eq!(geometry.edge_radius, 3);
        assert!((geometry.opacity - 0.5).abs() < f32::EPSILON);
    }
}
