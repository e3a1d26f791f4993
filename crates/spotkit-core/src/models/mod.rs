//! Data models for spotkit
//!
//! Plain value types shared by spots, their persistence and the filter stage.

mod catalog;
mod config_value;
mod geometry;
mod pipe_size;

pub use catalog::{ConfigCatalog, ConfigItem};
pub use config_value::{ConfigStore, ConfigValue};
pub use geometry::{SpotGeometry, SpotPoint};
pub use pipe_size::PipeSize;
