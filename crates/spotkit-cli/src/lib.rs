//! Shared utilities for spotkit-cli
//!
//! Command implementations and argument parsers, kept in a library so they
//! can be tested without going through the binary.

pub mod commands;
pub mod parsers;

// Re-export commonly used items at the crate root for convenience
pub use commands::{describe_spot, AddSpotArgs, MaskTarget};
pub use parsers::{parse_pipe_size, parse_point, parse_size, parse_unit};
