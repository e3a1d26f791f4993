//! Plain geometry values used to construct spots.

use serde::{Deserialize, Serialize};

/// Integer pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct SpotPoint {
    pub x: u32,
    pub y: u32,
}

impl SpotPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Full-resolution geometry of a spot.
///
/// All lengths are in 1:1 pixels regardless of the pipe size the editor is
/// currently working at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotGeometry {
    pub x: u32,
    pub y: u32,
    pub radius_w: u32,
    pub radius_h: u32,
    /// Rotation in degrees, clockwise.
    pub angle: f32,
    /// Width of the feathered band outside the core ellipse.
    pub edge_radius: u32,
    /// Feather shape, 0.0 = linear ramp, 1.0 = fully smoothed.
    pub edge_blur: f32,
    pub opacity: f32,
}

impl Default for SpotGeometry {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            radius_w: 0,
            radius_h: 0,
            angle: 0.0,
            edge_radius: 0,
            edge_blur: 0.0,
            opacity: 1.0,
        }
    }
}

impl SpotGeometry {
    /// Circular spot centered at `(x, y)`.
    pub fn circle(x: u32, y: u32, radius: u32, edge_radius: u32) -> Self {
        Self {
            x,
            y,
            radius_w: radius,
            radius_h: radius,
            edge_radius,
            ..Self::default()
        }
    }
}
