//! Tone curve owned by a tuning spot.
//!
//! Anchors live in the unit square and are kept sorted by x. Between anchors
//! the curve is either linear or a monotone cubic (Fritsch-Carlson), so a
//! curve through increasing anchors never overshoots.

use crate::models::{ConfigStore, ConfigValue};
use crate::storable::Storable;

pub const KEY_ANCHORS: &str = "Anchors";
pub const KEY_INTERPOLATION: &str = "Interpolation";

/// Anchors closer than this along x are treated as the same anchor.
const ANCHOR_EPSILON: f32 = 1e-4;

/// Identity anchors used when nothing usable was provided.
pub const IDENTITY_ANCHORS: [[f32; 2]; 2] = [[0.0, 0.0], [1.0, 1.0]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    Linear,
    #[default]
    Spline,
}

impl Interpolation {
    pub fn as_str(self) -> &'static str {
        match self {
            Interpolation::Linear => "linear",
            Interpolation::Spline => "spline",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Some(Interpolation::Linear),
            "spline" | "cubic" => Some(Interpolation::Spline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToneCurve {
    anchors: Vec<[f32; 2]>,
    interpolation: Interpolation,
    /// Hermite tangents per anchor, rebuilt whenever the anchors change.
    tangents: Vec<f32>,
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self::identity()
    }
}

impl ToneCurve {
    pub fn identity() -> Self {
        Self::new(IDENTITY_ANCHORS.to_vec(), Interpolation::default())
    }

    /// Build a curve from arbitrary anchors.
    ///
    /// Non-finite anchors are dropped, the rest clamped into the unit square
    /// and sorted; for duplicate x values the last one wins. With fewer than
    /// two usable anchors the curve is the identity.
    pub fn new(anchors: Vec<[f32; 2]>, interpolation: Interpolation) -> Self {
        let mut curve = Self {
            anchors: sanitize_anchors(anchors),
            interpolation,
            tangents: Vec::new(),
        };
        curve.rebuild();
        curve
    }

    pub fn anchors(&self) -> &[[f32; 2]] {
        &self.anchors
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
        self.rebuild();
    }

    /// Replace all anchors, with the same cleanup as `new`.
    pub fn set_anchors(&mut self, anchors: Vec<[f32; 2]>) {
        self.anchors = sanitize_anchors(anchors);
        self.rebuild();
    }

    /// True when every anchor lies on the diagonal.
    pub fn is_identity(&self) -> bool {
        self.anchors
            .iter()
            .all(|[x, y]| (x - y).abs() <= ANCHOR_EPSILON)
    }

    /// Insert an anchor (or move the existing one at the same x).
    /// Returns the index of the anchor, or `None` for non-finite input.
    pub fn insert_anchor(&mut self, x: f32, y: f32) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let point = [x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)];

        let index = match self
            .anchors
            .iter()
            .position(|a| (a[0] - point[0]).abs() <= ANCHOR_EPSILON)
        {
            Some(existing) => {
                self.anchors[existing] = point;
                existing
            }
            None => {
                let at = self.anchors.partition_point(|a| a[0] < point[0]);
                self.anchors.insert(at, point);
                at
            }
        };
        self.rebuild();
        Some(index)
    }

    /// Remove the anchor at `index`. A curve always keeps two anchors, so
    /// removal is refused below that.
    pub fn remove_anchor(&mut self, index: usize) -> bool {
        if index >= self.anchors.len() || self.anchors.len() <= 2 {
            return false;
        }
        self.anchors.remove(index);
        self.rebuild();
        true
    }

    /// Curve value at `x`, clamped to [0, 1]. Inputs outside the anchor
    /// range take the value of the nearest end anchor.
    pub fn evaluate(&self, x: f32) -> f32 {
        let (first, last) = match (self.anchors.first(), self.anchors.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return x.clamp(0.0, 1.0),
        };
        if !x.is_finite() {
            return first[1];
        }
        if x <= first[0] {
            return first[1];
        }
        if x >= last[0] {
            return last[1];
        }

        // First anchor strictly right of x; x > first[0] so k >= 1.
        let k = self.anchors.partition_point(|a| a[0] <= x);
        let [x0, y0] = self.anchors[k - 1];
        let [x1, y1] = self.anchors[k];
        let h = x1 - x0;
        let t = (x - x0) / h;

        let y = match self.interpolation {
            Interpolation::Linear => y0 + (y1 - y0) * t,
            Interpolation::Spline => {
                let (m0, m1) = (self.tangents[k - 1], self.tangents[k]);
                let t2 = t * t;
                let t3 = t2 * t;
                let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
                let h10 = t3 - 2.0 * t2 + t;
                let h01 = -2.0 * t3 + 3.0 * t2;
                let h11 = t3 - t2;
                h00 * y0 + h10 * h * m0 + h01 * y1 + h11 * h * m1
            }
        };
        y.clamp(0.0, 1.0)
    }

    /// Sample the curve at `size` evenly spaced inputs over [0, 1].
    pub fn to_lut(&self, size: usize) -> Vec<f32> {
        match size {
            0 => Vec::new(),
            1 => vec![self.evaluate(0.0)],
            _ => {
                let step = 1.0 / (size - 1) as f32;
                (0..size).map(|i| self.evaluate(i as f32 * step)).collect()
            }
        }
    }

    fn rebuild(&mut self) {
        self.tangents = match self.interpolation {
            Interpolation::Linear => Vec::new(),
            Interpolation::Spline => monotone_tangents(&self.anchors),
        };
    }
}

fn sanitize_anchors(anchors: Vec<[f32; 2]>) -> Vec<[f32; 2]> {
    usable_anchors(&anchors).unwrap_or_else(|| IDENTITY_ANCHORS.to_vec())
}

/// Finite, clamped anchors sorted by x with duplicates merged, or `None`
/// when fewer than two distinct anchors remain.
pub(crate) fn usable_anchors(anchors: &[[f32; 2]]) -> Option<Vec<[f32; 2]>> {
    let mut cleaned: Vec<[f32; 2]> = anchors
        .iter()
        .filter(|[x, y]| x.is_finite() && y.is_finite())
        .map(|[x, y]| [x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)])
        .collect();
    // Stable sort keeps input order among equal x, so the dedup below keeps
    // the last one given.
    cleaned.sort_by(|a, b| a[0].total_cmp(&b[0]));

    let mut deduped: Vec<[f32; 2]> = Vec::with_capacity(cleaned.len());
    for point in cleaned {
        match deduped.last_mut() {
            Some(last) if (point[0] - last[0]).abs() <= ANCHOR_EPSILON => *last = point,
            _ => deduped.push(point),
        }
    }

    (deduped.len() >= 2).then_some(deduped)
}

/// Fritsch-Carlson tangents for a monotone cubic Hermite spline.
fn monotone_tangents(anchors: &[[f32; 2]]) -> Vec<f32> {
    let n = anchors.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let secants: Vec<f32> = anchors
        .windows(2)
        .map(|w| (w[1][1] - w[0][1]) / (w[1][0] - w[0][0]))
        .collect();

    let mut tangents = vec![0.0; n];
    tangents[0] = secants[0];
    tangents[n - 1] = secants[n - 2];
    for k in 1..n - 1 {
        let (a, b) = (secants[k - 1], secants[k]);
        tangents[k] = if a * b <= 0.0 { 0.0 } else { (a + b) / 2.0 };
    }

    for k in 0..n - 1 {
        let delta = secants[k];
        if delta == 0.0 {
            tangents[k] = 0.0;
            tangents[k + 1] = 0.0;
            continue;
        }
        let alpha = tangents[k] / delta;
        let beta = tangents[k + 1] / delta;
        let norm = alpha * alpha + beta * beta;
        if norm > 9.0 {
            let tau = 3.0 / norm.sqrt();
            tangents[k] = tau * alpha * delta;
            tangents[k + 1] = tau * beta * delta;
        }
    }

    tangents
}

impl Storable for ToneCurve {
    fn do_store_config(&self, prefix: &str) -> ConfigStore {
        let mut store = ConfigStore::new();
        store.insert(
            format!("{}{}", prefix, KEY_ANCHORS),
            ConfigValue::Points(self.anchors.clone()),
        );
        store.insert(
            format!("{}{}", prefix, KEY_INTERPOLATION),
            ConfigValue::from(self.interpolation.as_str()),
        );
        store
    }

    fn do_load_config(&mut self, config: &ConfigStore, prefix: &str) {
        let anchors = config
            .get(&format!("{}{}", prefix, KEY_ANCHORS))
            .and_then(ConfigValue::as_points)
            .map(<[_]>::to_vec)
            .unwrap_or_else(|| IDENTITY_ANCHORS.to_vec());
        let interpolation = config
            .get(&format!("{}{}", prefix, KEY_INTERPOLATION))
            .and_then(ConfigValue::as_str)
            .and_then(Interpolation::parse)
            .unwrap_or_default();

        self.anchors = sanitize_anchors(anchors);
        self.interpolation = interpolation;
        self.rebuild();
    }

    fn do_get_value(&self, key: &str) -> Option<ConfigValue> {
        match key {
            KEY_ANCHORS => Some(ConfigValue::Points(self.anchors.clone())),
            KEY_INTERPOLATION => Some(ConfigValue::from(self.interpolation.as_str())),
            _ => None,
        }
    }

    fn do_set_value(&mut self, key: &str, value: ConfigValue) -> bool {
        match key {
            KEY_ANCHORS => match value.as_points() {
                Some(points) if points.len() >= 2 => {
                    self.set_anchors(points.to_vec());
                    true
                }
                _ => false,
            },
            KEY_INTERPOLATION => match value.as_str().and_then(Interpolation::parse) {
                Some(interpolation) => {
                    self.set_interpolation(interpolation);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}
