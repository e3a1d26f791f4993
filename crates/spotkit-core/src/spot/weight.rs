//! Per-pixel weight mask of a spot.
//!
//! The mask covers the spot's bounding box at the current pipe size. Cells
//! inside the core ellipse carry `WEIGHT_MAX`, cells in the edge band fall
//! off towards zero and everything beyond the band is exactly zero.

use crate::models::SpotPoint;
use crate::verbose_println;

/// Weight of a fully covered pixel.
pub const WEIGHT_MAX: u16 = u16::MAX;

/// Largest mask (in cells) that is ever allocated. Geometry whose bounding
/// box exceeds it gets an empty mask and has no effect.
pub const MAX_MASK_CELLS: usize = 1 << 28;

/// Smallest radius used for the core ellipse so that the center pixel is
/// always inside it, even for zero-sized spots.
pub(crate) const MIN_CORE_RADIUS: f32 = 0.5;

/// Smootherstep interpolation (`6t^5 - 15t^4 + 10t^3`), clamped to [0, 1].
#[inline]
pub fn smootherstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Shape of a spot at the pipe size the mask is generated for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskShape {
    pub radius_w: f32,
    pub radius_h: f32,
    /// Rotation in degrees, clockwise.
    pub angle: f32,
    pub edge_radius: f32,
    pub edge_blur: f32,
}

/// Dense row-major weight grid centered on the spot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeightMatrix {
    width: usize,
    height: usize,
    center_x: usize,
    center_y: usize,
    data: Vec<u16>,
}

impl WeightMatrix {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Position of the spot center inside the matrix.
    pub fn center(&self) -> (usize, usize) {
        (self.center_x, self.center_y)
    }

    pub fn data(&self) -> &[u16] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw weight at matrix cell `(x, y)`, zero outside the matrix.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u16 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[y * self.width + x]
    }

    /// Normalized weight in [0, 1] at matrix cell `(x, y)`.
    #[inline]
    pub fn weight(&self, x: usize, y: usize) -> f32 {
        self.get(x, y) as f32 / WEIGHT_MAX as f32
    }

    /// Image-space coordinates of the matrix's top-left cell for a spot
    /// centered at `pos`. May be negative near the image border.
    pub fn origin(&self, pos: SpotPoint) -> (i64, i64) {
        (
            pos.x as i64 - self.center_x as i64,
            pos.y as i64 - self.center_y as i64,
        )
    }

    /// Normalized weight for image pixel `(ix, iy)` of a spot centered at `pos`.
    pub fn at_image(&self, pos: SpotPoint, ix: i64, iy: i64) -> f32 {
        let (ox, oy) = self.origin(pos);
        let (mx, my) = (ix - ox, iy - oy);
        if mx < 0 || my < 0 {
            return 0.0;
        }
        self.weight(mx as usize, my as usize)
    }

    /// Recompute the mask for `shape`, reusing the buffer when the bounding
    /// box size did not change.
    pub(crate) fn regenerate(&mut self, shape: &MaskShape) {
        let (half_w, half_h) = half_extents(shape);
        let size = half_w
            .checked_mul(2)
            .and_then(|w| w.checked_add(1))
            .zip(half_h.checked_mul(2).and_then(|h| h.checked_add(1)))
            .filter(|&(w, h)| w.checked_mul(h).is_some_and(|cells| cells <= MAX_MASK_CELLS));
        let Some((width, height)) = size else {
            verbose_println!(
                "[spot] mask of {}x{} half extents exceeds {} cells, leaving it empty",
                half_w,
                half_h,
                MAX_MASK_CELLS
            );
            *self = Self::default();
            return;
        };

        if width != self.width || height != self.height {
            self.data = vec![0; width * height];
            self.width = width;
            self.height = height;
        }
        self.center_x = half_w;
        self.center_y = half_h;

        let (sin, cos) = shape.angle.to_radians().sin_cos();
        let rw = shape.radius_w.max(MIN_CORE_RADIUS);
        let rh = shape.radius_h.max(MIN_CORE_RADIUS);
        let edge = shape.edge_radius.max(0.0);
        let blur = shape.edge_blur.clamp(0.0, 1.0);

        for (row, cells) in self.data.chunks_exact_mut(width).enumerate() {
            let dy = row as f32 - half_h as f32;
            for (col, cell) in cells.iter_mut().enumerate() {
                let dx = col as f32 - half_w as f32;
                *cell = cell_weight(dx, dy, sin, cos, rw, rh, edge, blur);
            }
        }
    }
}

/// Half width/height (in cells) of the bounding box of the rotated core
/// ellipse grown by the edge band. A zero-sized spot yields a single cell.
fn half_extents(shape: &MaskShape) -> (usize, usize) {
    let (sin, cos) = shape.angle.to_radians().sin_cos();
    let rw = shape.radius_w.max(0.0);
    let rh = shape.radius_h.max(0.0);
    let edge = shape.edge_radius.max(0.0);

    let hx = ((rw * cos).powi(2) + (rh * sin).powi(2)).sqrt() + edge;
    let hy = ((rw * sin).powi(2) + (rh * cos).powi(2)).sqrt() + edge;
    (hx.ceil() as usize, hy.ceil() as usize)
}

#[allow(clippy::too_many_arguments)]
#[inline]
fn cell_weight(dx: f32, dy: f32, sin: f32, cos: f32, rw: f32, rh: f32, edge: f32, blur: f32) -> u16 {
    // Rotate into the spot's own frame (clockwise angle, y pointing down).
    let u = dx * cos + dy * sin;
    let v = -dx * sin + dy * cos;

    let d = ((u / rw).powi(2) + (v / rh).powi(2)).sqrt();
    if d <= 1.0 {
        return WEIGHT_MAX;
    }
    if edge <= 0.0 {
        return 0;
    }

    // Distance travelled past the core boundary along the ray from the center.
    let r = (u * u + v * v).sqrt();
    let excess = r * (1.0 - 1.0 / d);
    if excess >= edge {
        return 0;
    }

    let s = 1.0 - excess / edge;
    let w = (1.0 - blur) * s + blur * smootherstep(s);
    (w.clamp(0.0, 1.0) * WEIGHT_MAX as f32).round() as u16
}
