//! The base spot entity.

use super::weight::{MaskShape, WeightMatrix};
use super::{read_bool, read_f32, read_u32, Spot, SpotKind};
use crate::models::{PipeSize, SpotGeometry, SpotPoint};
use crate::settings::IniSettings;

pub const KEY_ENABLED: &str = "Enabled";
pub const KEY_POS_X: &str = "PosX";
pub const KEY_POS_Y: &str = "PosY";
pub const KEY_RADIUS_W: &str = "RadiusW";
pub const KEY_RADIUS_H: &str = "RadiusH";
pub const KEY_ANGLE: &str = "Angle";
pub const KEY_EDGE_RADIUS: &str = "EdgeRadius";
pub const KEY_EDGE_BLUR: &str = "EdgeBlur";
pub const KEY_OPACITY: &str = "Opacity";

/// Upper bound for stored (full-resolution) radii and edge radius.
pub const MAX_LENGTH: u32 = 16_384;

/// A single local-adjustment region.
///
/// Values passed to and returned from the accessors are in the scale of the
/// spot's current pipe size. Internally, and in persisted settings,
/// everything is kept at 1:1.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSpot {
    enabled: bool,
    pos: SpotPoint,
    radius_w: u32,
    radius_h: u32,
    angle: f32,
    edge_radius: u32,
    edge_blur: f32,
    opacity: f32,
    pipe_size: PipeSize,
    weights: WeightMatrix,
}

impl Default for ImageSpot {
    /// Disabled spot with zero geometry at full resolution.
    fn default() -> Self {
        Self::with_geometry(false, SpotGeometry::default())
    }
}

impl ImageSpot {
    /// Create a spot from full-resolution geometry. Out-of-range opacity and
    /// edge blur are clamped, lengths capped at `MAX_LENGTH`, non-finite
    /// floats replaced by their defaults.
    pub fn with_geometry(enabled: bool, geometry: SpotGeometry) -> Self {
        let defaults = SpotGeometry::default();
        let mut spot = Self {
            enabled,
            pos: SpotPoint::new(geometry.x, geometry.y),
            radius_w: geometry.radius_w.min(MAX_LENGTH),
            radius_h: geometry.radius_h.min(MAX_LENGTH),
            angle: finite_or(geometry.angle, defaults.angle),
            edge_radius: geometry.edge_radius.min(MAX_LENGTH),
            edge_blur: finite_or(geometry.edge_blur, defaults.edge_blur).clamp(0.0, 1.0),
            opacity: finite_or(geometry.opacity, defaults.opacity).clamp(0.0, 1.0),
            pipe_size: PipeSize::FULL,
            weights: WeightMatrix::default(),
        };
        spot.update_weight();
        spot
    }

    /// Load a spot from the settings entry selected by the caller's
    /// `set_array_index`. Missing or malformed keys fall back to the
    /// defaults of `ImageSpot::default()`.
    pub fn from_ini(ini: &IniSettings) -> Self {
        let defaults = SpotGeometry::default();
        let geometry = SpotGeometry {
            x: read_u32(ini, KEY_POS_X, defaults.x),
            y: read_u32(ini, KEY_POS_Y, defaults.y),
            radius_w: read_u32(ini, KEY_RADIUS_W, defaults.radius_w),
            radius_h: read_u32(ini, KEY_RADIUS_H, defaults.radius_h),
            angle: read_f32(ini, KEY_ANGLE, defaults.angle),
            edge_radius: read_u32(ini, KEY_EDGE_RADIUS, defaults.edge_radius),
            edge_blur: read_f32(ini, KEY_EDGE_BLUR, defaults.edge_blur),
            opacity: read_f32(ini, KEY_OPACITY, defaults.opacity),
        };
        Self::with_geometry(read_bool(ini, KEY_ENABLED, false), geometry)
    }

    /// Full-resolution geometry, as persisted.
    pub fn geometry(&self) -> SpotGeometry {
        SpotGeometry {
            x: self.pos.x,
            y: self.pos.y,
            radius_w: self.radius_w,
            radius_h: self.radius_h,
            angle: self.angle,
            edge_radius: self.edge_radius,
            edge_blur: self.edge_blur,
            opacity: self.opacity,
        }
    }

    // ------------------------------------------------------------------
    // Scaled accessors
    // ------------------------------------------------------------------

    /// Rotation angle in degrees clockwise.
    pub fn angle(&self) -> f32 {
        self.pipe_size.scale_f32(self.angle)
    }

    /// Width of the feathered band around the core.
    pub fn edge_radius(&self) -> u32 {
        self.pipe_size.scale_len(self.edge_radius)
    }

    /// Horizontal radius.
    pub fn radius_w(&self) -> u32 {
        self.pipe_size.scale_len(self.radius_w)
    }

    /// Vertical radius.
    pub fn radius_h(&self) -> u32 {
        self.pipe_size.scale_len(self.radius_h)
    }

    /// Center position.
    pub fn pos(&self) -> SpotPoint {
        SpotPoint::new(
            self.pipe_size.scale_len(self.pos.x),
            self.pipe_size.scale_len(self.pos.y),
        )
    }

    // ------------------------------------------------------------------
    // Unscaled accessors
    // ------------------------------------------------------------------

    pub fn edge_blur(&self) -> f32 {
        self.edge_blur
    }

    /// Global opacity, 0.0 (transparent) to 1.0 (opaque).
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Disabled spots are skipped when the pipe runs.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn pipe_size(&self) -> PipeSize {
        self.pipe_size
    }

    /// Weight mask for the current geometry and pipe size.
    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    /// Normalized weight for image pixel `(x, y)` at the current pipe size.
    pub fn weight_at(&self, x: i64, y: i64) -> f32 {
        self.weights.at_image(self.pos(), x, y)
    }

    /// Image-space bounding box of the mask: `(left, top, width, height)`.
    pub fn bounding_box(&self) -> (i64, i64, usize, usize) {
        let (left, top) = self.weights.origin(self.pos());
        (left, top, self.weights.width(), self.weights.height())
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Set the rotation angle (degrees clockwise). Non-finite values are ignored.
    pub fn set_angle(&mut self, angle: f32) {
        if !angle.is_finite() {
            return;
        }
        self.angle = self.pipe_size.unscale_f32(angle);
        self.update_weight();
    }

    /// Set the feather shape, clamped to [0, 1]. Non-finite values are ignored.
    pub fn set_edge_blur(&mut self, blur: f32) {
        if !blur.is_finite() {
            return;
        }
        self.edge_blur = blur.clamp(0.0, 1.0);
        self.update_weight();
    }

    pub fn set_edge_radius(&mut self, radius: u32) {
        self.edge_radius = self.pipe_size.unscale_len(radius).min(MAX_LENGTH);
        self.update_weight();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Set the global opacity, clamped to [0, 1]. Non-finite values are
    /// ignored. The mask does not depend on opacity.
    pub fn set_opacity(&mut self, opacity: f32) {
        if !opacity.is_finite() {
            return;
        }
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_radius_h(&mut self, radius: u32) {
        self.radius_h = self.pipe_size.unscale_len(radius).min(MAX_LENGTH);
        self.update_weight();
    }

    pub fn set_radius_w(&mut self, radius: u32) {
        self.radius_w = self.pipe_size.unscale_len(radius).min(MAX_LENGTH);
        self.update_weight();
    }

    /// Move only this spot's center. Use `Spot::set_pos` to move linked
    /// geometry along with it.
    pub fn move_center(&mut self, x: u32, y: u32) {
        self.pos = SpotPoint::new(
            self.pipe_size.unscale_len(x),
            self.pipe_size.unscale_len(y),
        );
    }

    /// Switch to another pipe size, regenerating the mask if it changed.
    pub fn set_pipe_size(&mut self, pipe_size: PipeSize) {
        if pipe_size == self.pipe_size {
            return;
        }
        self.pipe_size = pipe_size;
        self.update_weight();
    }

    /// Rebuild the weight mask from the current geometry.
    ///
    /// Lengths are taken at the current pipe size; the rotation is
    /// resolution independent and uses the stored angle.
    fn update_weight(&mut self) {
        let shape = MaskShape {
            radius_w: self.radius_w() as f32,
            radius_h: self.radius_h() as f32,
            angle: self.angle,
            edge_radius: self.edge_radius() as f32,
            edge_blur: self.edge_blur,
        };
        self.weights.regenerate(&shape);
    }
}

impl Spot for ImageSpot {
    fn kind(&self) -> SpotKind {
        SpotKind::Image
    }

    fn base(&self) -> &ImageSpot {
        self
    }

    fn base_mut(&mut self) -> &mut ImageSpot {
        self
    }

    fn write_to_ini(&self, ini: &mut IniSettings) {
        ini.set_value(KEY_ENABLED, self.enabled);
        ini.set_value(KEY_POS_X, self.pos.x);
        ini.set_value(KEY_POS_Y, self.pos.y);
        ini.set_value(KEY_RADIUS_W, self.radius_w);
        ini.set_value(KEY_RADIUS_H, self.radius_h);
        ini.set_value(KEY_ANGLE, self.angle);
        ini.set_value(KEY_EDGE_RADIUS, self.edge_radius);
        ini.set_value(KEY_EDGE_BLUR, self.edge_blur);
        ini.set_value(KEY_OPACITY, self.opacity);
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
