//! Pipe size (preview/processing downsample level).

use serde::{Deserialize, Serialize};

/// Downsample level of the processing pipe.
///
/// Level 0 is full resolution, every further level halves both image
/// dimensions. Spot geometry is stored at level 0 and scaled through this
/// type whenever it is read or written at another level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PipeSize(u8);

impl PipeSize {
    /// Largest supported level (1:16).
    pub const MAX_LEVEL: u8 = 4;

    pub const FULL: PipeSize = PipeSize(0);

    /// Create a pipe size, clamping the level to `0..=MAX_LEVEL`.
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX_LEVEL))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Linear scale factor relative to full resolution (`1 / 2^level`).
    pub fn factor(self) -> f32 {
        1.0 / (1u32 << self.0) as f32
    }

    /// Full-resolution length -> current-scale length.
    #[inline]
    pub fn scale_len(self, value: u32) -> u32 {
        value >> self.0
    }

    /// Current-scale length -> full-resolution length.
    #[inline]
    pub fn unscale_len(self, value: u32) -> u32 {
        value.saturating_mul(1u32 << self.0)
    }

    #[inline]
    pub fn scale_f32(self, value: f32) -> f32 {
        value * self.factor()
    }

    #[inline]
    pub fn unscale_f32(self, value: f32) -> f32 {
        value / self.factor()
    }

    /// Ratio label as shown in the editor, e.g. "1:4".
    pub fn label(self) -> String {
        format!("1:{}", 1u32 << self.0)
    }

    /// Parse either a bare level ("2") or a ratio label ("1:4").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if let Some(denominator) = s.strip_prefix("1:") {
            let denominator: u32 = denominator
                .trim()
                .parse()
                .map_err(|_| format!("Invalid pipe size ratio: '{}'", s))?;
            if !denominator.is_power_of_two() {
                return Err(format!("Pipe size ratio must be a power of two: '{}'", s));
            }
            let level = denominator.trailing_zeros();
            if level > Self::MAX_LEVEL as u32 {
                return Err(format!("Pipe size ratio too small: '{}' (max 1:16)", s));
            }
            return Ok(Self(level as u8));
        }

        let level: u8 = s
            .parse()
            .map_err(|_| format!("Invalid pipe size: '{}' (expected 0-4 or 1:N)", s))?;
        if level > Self::MAX_LEVEL {
            return Err(format!(
                "Pipe size level {} out of range (0-{})",
                level,
                Self::MAX_LEVEL
            ));
        }
        Ok(Self(level))
    }
}

impl std::fmt::Display for PipeSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}
