//! Non-fatal anomalies reported while building, posing and compositing a rig.

use crate::rig::model::{JointId, LimbId};

/// A recoverable problem with a single record. The offending entity is skipped or given
/// a safe default; the pass that found it keeps going.
#[derive(thiserror::Error, Clone, Debug, PartialEq, serde::Serialize)]
pub enum Anomaly {
    /// A joint names a limb id that does not exist; the joint is skipped.
    #[error("joint {joint} references unknown limb {limb}")]
    UnknownLimbReference {
        /// Offending joint.
        joint: JointId,
        /// Missing limb id.
        limb: LimbId,
    },

    /// A joint anchor has non-finite components; the joint is skipped.
    #[error("joint {joint} has a malformed {field}")]
    MalformedAnchor {
        /// Offending joint.
        joint: JointId,
        /// `limb1_anchor` or `limb2_anchor`.
        field: &'static str,
    },

    /// A source rect is missing, non-finite or empty; the default rect is used.
    #[error("{entity} has a malformed {field}, using the default rect")]
    MalformedRect {
        /// Limb, attachment or wearable description.
        entity: String,
        /// Offending field.
        field: &'static str,
    },

    /// A limb scale is non-finite or not positive; `1.0` is used.
    #[error("limb {limb} has malformed scale {value}, using 1")]
    MalformedScale {
        /// Offending limb.
        limb: LimbId,
        /// The rejected value.
        value: f64,
    },

    /// A depth value is non-finite; the default depth is used.
    #[error("{entity} has a non-finite depth, using the default")]
    MalformedDepth {
        /// Limb or wearable description.
        entity: String,
    },

    /// An origin has non-finite components; the default origin is used.
    #[error("{entity} has a malformed origin, using the default")]
    MalformedOrigin {
        /// Limb, attachment or wearable description.
        entity: String,
    },

    /// A sprite cannot be drawn at all (no texture); it is skipped.
    #[error("{entity} is missing {field}, skipping")]
    MissingSpriteData {
        /// Attachment or wearable description.
        entity: String,
        /// Offending field.
        field: &'static str,
    },

    /// A limb is not reachable from the root; it keeps position `(0, 0)`.
    #[error("limb {limb} is not connected to the root")]
    DisconnectedLimb {
        /// Unreachable limb.
        limb: LimbId,
    },

    /// A joint links a limb that was already placed; the joint is ignored.
    #[error("joint {joint} re-links already placed limb {limb}")]
    CyclicJoint {
        /// Offending joint.
        joint: JointId,
        /// Limb that had already been visited.
        limb: LimbId,
    },

    /// More than one torso exists; the first one is used as root.
    #[error("multiple torso limbs, using {chosen} as root (ignored: {ignored:?})")]
    AmbiguousRoot {
        /// Root that was picked.
        chosen: LimbId,
        /// Other torso limbs.
        ignored: Vec<LimbId>,
    },

    /// Two limbs share an id; the later record is dropped.
    #[error("duplicate limb id {limb}, dropping later record")]
    DuplicateLimbId {
        /// Duplicated id.
        limb: LimbId,
    },

    /// A wearable targets a limb type no limb in the rig has; it is skipped.
    #[error("wearable '{wearable}' targets {limb}, which no limb has, skipping")]
    UnmatchedWearableTarget {
        /// Wearable name.
        wearable: String,
        /// Targeted limb type.
        limb: String,
    },

    /// A selection names an attachment that is absent from its bucket; it is ignored.
    #[error("selected {kind} attachment {attachment} does not exist")]
    UnknownAttachmentSelection {
        /// Bucket name.
        kind: String,
        /// Missing attachment id.
        attachment: u32,
    },
}

/// Anomalies collected during one pass, in the order they were found.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Diagnostics {
    items: Vec<Anomaly>,
}

impl Diagnostics {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an anomaly and emit it as a warning.
    pub fn push(&mut self, anomaly: Anomaly) {
        tracing::warn!(%anomaly, "rig anomaly");
        self.items.push(anomaly);
    }

    /// Append everything from another pass.
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// All anomalies, in discovery order.
    pub fn items(&self) -> &[Anomaly] {
        &self.items
    }

    /// Number of anomalies.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the pass found nothing to report.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any recorded anomaly satisfies `pred`.
    pub fn any(&self, pred: impl Fn(&Anomaly) -> bool) -> bool {
        self.items.iter().any(pred)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/diagnostics.rs"]
mod tests;
