use crate::compose::compositor::{LayerKind, RenderLayer};
use crate::foundation::math::Fnv1a64;

/// 128-bit digest of a layer list. Equal layers always hash equal, bit for bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct LayerFingerprint {
    /// First FNV lane.
    pub hi: u64,
    /// Second FNV lane, differently seeded.
    pub lo: u64,
}

/// Fingerprint every field of every layer, in order.
pub fn fingerprint_layers(layers: &[RenderLayer]) -> LayerFingerprint {
    let mut h = LayerHasher::new();
    h.count(layers.len());
    for layer in layers {
        h.bytes(&layer.limb.0.to_le_bytes());
        match &layer.kind {
            LayerKind::Limb => h.bytes(&[0]),
            LayerKind::Attachment(kind) => {
                h.bytes(&[1]);
                h.str(kind.as_str());
            }
            LayerKind::Wearable(kind) => {
                h.bytes(&[2]);
                h.str(kind.as_str());
            }
        }
        h.str(&layer.name);
        h.bytes(&layer.z_index.to_le_bytes());

        let r = layer.source_rect;
        let p = layer.placement;
        h.floats(&[r.x, r.y, r.width, r.height]);
        h.floats(&[
            p.translation.x,
            p.translation.y,
            p.rotation_deg,
            p.scale,
            p.origin.x,
            p.origin.y,
        ]);
        h.floats(&layer.transform.as_coeffs());
        h.str(&layer.texture);
        h.floats(&[layer.opacity]);
    }
    h.finish()
}

/// Feeds the same bytes to two differently seeded FNV lanes.
struct LayerHasher {
    hi: Fnv1a64,
    lo: Fnv1a64,
}

impl LayerHasher {
    const LO_SEED: u64 = 0x9ae1_6a3b_2f90_404f;

    fn new() -> Self {
        Self {
            hi: Fnv1a64::with_seed(Fnv1a64::OFFSET_BASIS),
            lo: Fnv1a64::with_seed(Self::LO_SEED),
        }
    }

    fn bytes(&mut self, bytes: &[u8]) {
        self.hi.update(bytes);
        self.lo.update(bytes);
    }

    fn count(&mut self, n: usize) {
        self.bytes(&(n as u64).to_le_bytes());
    }

    fn str(&mut self, s: &str) {
        self.count(s.len());
        self.bytes(s.as_bytes());
    }

    fn floats(&mut self, values: &[f64]) {
        for v in values {
            self.bytes(&v.to_bits().to_le_bytes());
        }
    }

    fn finish(self) -> LayerFingerprint {
        LayerFingerprint {
            hi: self.hi.value(),
            lo: self.lo.value(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/fingerprint.rs"]
mod tests;
