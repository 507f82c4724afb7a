//! Rigweave resolves 2-D ragdoll character rigs and composes them into ordered sprite layers.
//!
//! A rig is a set of limbs (sprite-backed body parts) connected by joints. Attachments
//! (hair, beards, ...) hang off the head and wearables (clothing, items) target limbs by
//! type. Rigweave turns that description into paint-ready layers.
//!
//! # Pipeline overview
//!
//! 1. **Build**: `limbs + joints -> RigGraph` (root selection, sanitising, anomalies)
//! 2. **Pose**: `RigGraph -> Pose` (breadth-first joint placement from the canvas anchor)
//! 3. **Select**: `AttachmentBuckets + Gender -> AttachmentSelection`
//! 4. **Compose**: `RigGraph + Pose + selection + wearables -> Composite` (z-ordered layers)
//!
//! [`RigState`] bundles the four passes into an immutable snapshot and [`RigSession`]
//! serialises edits with last-writer-wins semantics.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: every pass is pure and stable for a given input.
//! - **Malformed input degrades**: bad data is sanitised and reported as an [`Anomaly`],
//!   never a panic. Only a rig without a torso fails to build.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod attachments;
mod compose;
mod foundation;
mod pose;
mod rig;
mod session;

pub use attachments::resolver::{ActiveAttachment, AttachmentResolver, AttachmentSelection};
pub use compose::compositor::{Composite, LayerCompositor, LayerKind, LimbContext, RenderLayer};
pub use compose::fingerprint::{LayerFingerprint, fingerprint_layers};
pub use compose::geometry::{ScaleMode, wearable_scale};
pub use foundation::core::{Affine, Placement, Point, Rect, SheetIndex, SourceRect, Vec2};
pub use foundation::diagnostics::{Anomaly, Diagnostics};
pub use foundation::error::{RigError, RigResult};
pub use foundation::settings::RigSettings;
pub use pose::resolver::{LimbPose, Pose, PoseResolver, ResolvedPose};
pub use rig::graph::{BuiltRig, RigEdge, RigGraph, RigGraphBuilder, Traversal};
pub use rig::model::{
    Attachment, AttachmentBuckets, AttachmentId, Gender, HeadSheet, Joint, JointId, Limb,
    LimbId, LimbType, RigDocument, WearableSprite, WearableType,
};
pub use session::rig_session::{RigSession, Ticket};
pub use session::state::RigState;
