//! Spotkit Core Library
//!
//! Spot-based local adjustments: spot geometry with resolution-independent
//! storage, feathered weight masks, persistence and the filter stage that
//! blends adjustments into an image.

pub mod config;
pub mod exporters;
pub mod filter;
pub mod models;
pub mod presets;
pub mod settings;
pub mod spot;
pub mod spot_list;
pub mod storable;
pub mod tuning;

// Re-export commonly used types
pub use models::{ConfigCatalog, ConfigStore, ConfigValue, PipeSize, SpotGeometry, SpotPoint};
pub use settings::IniSettings;
pub use spot::{spot_from_ini, ImageSpot, RepairSpot, Spot, SpotKind, WeightMatrix};
pub use spot_list::SpotList;
pub use storable::Storable;
pub use tuning::{ToneCurve, TuningSpot};
