/// 64-bit FNV-1a over raw bytes.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    pub(crate) fn with_seed(seed: u64) -> Self {
        Self(seed)
    }

    pub(crate) fn update(&mut self, bytes: &[u8]) {
        self.0 = bytes.iter().fold(self.0, |h, &b| {
            (h ^ u64::from(b)).wrapping_mul(Self::PRIME)
        });
    }

    pub(crate) fn value(self) -> u64 {
        self.0
    }
}

/// Scale applied to `1 - depth` before rounding to an integer z-index.
pub(crate) const DEPTH_Z_SCALE: f64 = 1000.0;

/// Converts an authored depth (smaller is nearer) into a z-index (larger paints later).
/// Out-of-range depths saturate at the `i32` bounds.
pub(crate) fn depth_to_z(depth: f64) -> i32 {
    ((1.0 - depth) * DEPTH_Z_SCALE).round() as i32
}

/// Overlay z-index: the depth z plus the type priority, saturating.
pub(crate) fn overlay_z(depth: f64, priority: i32) -> i32 {
    depth_to_z(depth).saturating_add(priority)
}

pub(crate) fn is_finite_vec(v: kurbo::Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
