//! Spot repair: a spot paired with the source point it copies from.

use super::{read_u32, ImageSpot, Spot, SpotKind};
use crate::models::SpotPoint;
use crate::settings::IniSettings;

pub const KEY_REPAIRER_X: &str = "RepairerX";
pub const KEY_REPAIRER_Y: &str = "RepairerY";

/// An image spot with a linked repairer position. Moving the spot moves the
/// repairer by the same offset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RepairSpot {
    spot: ImageSpot,
    repairer: SpotPoint,
}

impl RepairSpot {
    /// `repairer` is a full-resolution position, like the spot's geometry.
    pub fn new(spot: ImageSpot, repairer: SpotPoint) -> Self {
        Self { spot, repairer }
    }

    pub fn from_ini(ini: &IniSettings) -> Self {
        let spot = ImageSpot::from_ini(ini);
        let repairer = SpotPoint::new(
            read_u32(ini, KEY_REPAIRER_X, spot.geometry().x),
            read_u32(ini, KEY_REPAIRER_Y, spot.geometry().y),
        );
        Self { spot, repairer }
    }

    /// Repairer position at the current pipe size.
    pub fn repairer(&self) -> SpotPoint {
        let pipe = self.spot.pipe_size();
        SpotPoint::new(pipe.scale_len(self.repairer.x), pipe.scale_len(self.repairer.y))
    }

    /// Move only the repairer (current pipe-size scale).
    pub fn set_repairer(&mut self, x: u32, y: u32) {
        let pipe = self.spot.pipe_size();
        self.repairer = SpotPoint::new(pipe.unscale_len(x), pipe.unscale_len(y));
    }
}

impl Spot for RepairSpot {
    fn kind(&self) -> SpotKind {
        SpotKind::Repair
    }

    fn base(&self) -> &ImageSpot {
        &self.spot
    }

    fn base_mut(&mut self) -> &mut ImageSpot {
        &mut self.spot
    }

    fn set_pos(&mut self, x: u32, y: u32) {
        let before = self.spot.geometry();
        self.spot.move_center(x, y);
        let after = self.spot.geometry();

        let dx = after.x as i64 - before.x as i64;
        let dy = after.y as i64 - before.y as i64;
        self.repairer = SpotPoint::new(
            offset_clamped(self.repairer.x, dx),
            offset_clamped(self.repairer.y, dy),
        );
    }

    fn write_to_ini(&self, ini: &mut IniSettings) {
        self.spot.write_to_ini(ini);
        ini.set_value(KEY_REPAIRER_X, self.repairer.x);
        ini.set_value(KEY_REPAIRER_Y, self.repairer.y);
    }
}

fn offset_clamped(value: u32, delta: i64) -> u32 {
    (value as i64 + delta).clamp(0, u32::MAX as i64) as u32
}
