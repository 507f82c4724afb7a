use std::collections::BTreeMap;

use crate::foundation::core::Point;
use crate::foundation::diagnostics::{Anomaly, Diagnostics};
use crate::foundation::error::{RigError, RigResult};
use crate::foundation::settings::RigSettings;
use crate::rig::graph::{RigEdge, RigGraph};
use crate::rig::model::{JointId, LimbId};

/// World placement of one limb.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LimbPose {
    /// World position.
    pub position: Point,
    /// Rotation in degrees, carried over from the limb record.
    pub rotation_deg: f64,
}

/// Placement of every limb in a rig. Always replaced wholesale, never patched.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pose {
    limbs: BTreeMap<LimbId, LimbPose>,
}

impl Pose {
    /// Placement of a limb, if it is part of the pose.
    pub fn get(&self, id: LimbId) -> Option<LimbPose> {
        self.limbs.get(&id).copied()
    }

    /// Every placement, ordered by limb id.
    pub fn iter(&self) -> impl Iterator<Item = (LimbId, LimbPose)> + '_ {
        self.limbs.iter().map(|(id, p)| (*id, *p))
    }

    /// Number of posed limbs.
    pub fn len(&self) -> usize {
        self.limbs.len()
    }

    /// True for the empty (degraded) pose.
    pub fn is_empty(&self) -> bool {
        self.limbs.is_empty()
    }
}

/// A pose together with the anomalies found while resolving it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedPose {
    /// Resolved placements.
    pub pose: Pose,
    /// Unreachable limbs and similar warnings.
    pub diagnostics: Diagnostics,
}

/// Places limbs by walking joint anchors outward from the root.
///
/// Positions follow `child = parent + a1 * s1 - a2 * s2` with the vertical axis flipped
/// relative to the anchors' authored space. Rotation is never derived from joints.
#[derive(Clone, Copy, Debug)]
pub struct PoseResolver {
    canvas_anchor: Point,
}

impl Default for PoseResolver {
    fn default() -> Self {
        Self::new(&RigSettings::default())
    }
}

impl PoseResolver {
    /// Resolver seeded at `settings.canvas_anchor`.
    pub fn new(settings: &RigSettings) -> Self {
        Self {
            canvas_anchor: settings.canvas_anchor,
        }
    }

    #[tracing::instrument(skip_all, fields(limbs = graph.limbs().len()))]
    /// Full breadth-first pass from the root.
    pub fn resolve(&self, graph: &RigGraph) -> ResolvedPose {
        let limbs = graph.limbs();
        let mut positions = vec![Point::ORIGIN; limbs.len()];
        positions[graph.root()] = self.canvas_anchor;

        let traversal = graph.traverse();
        for &edge_idx in &traversal.tree {
            let edge = &graph.edges()[edge_idx];
            positions[edge.child] = place_child(positions[edge.parent], edge, graph);
        }

        let mut diagnostics = Diagnostics::new();
        for &idx in &traversal.unreachable {
            diagnostics.push(Anomaly::DisconnectedLimb { limb: limbs[idx].id });
        }

        let pose = Pose {
            limbs: limbs
                .iter()
                .zip(positions)
                .map(|(limb, position)| {
                    (
                        limb.id,
                        LimbPose {
                            position,
                            rotation_deg: limb.rotation,
                        },
                    )
                })
                .collect(),
        };
        tracing::debug!(
            placed = traversal.tree.len() + 1,
            unreachable = traversal.unreachable.len(),
            "pose resolved"
        );
        ResolvedPose { pose, diagnostics }
    }

    /// Same pass as [`resolve`](Self::resolve); the result replaces the current pose
    /// unconditionally.
    pub fn construct_all(&self, graph: &RigGraph) -> ResolvedPose {
        self.resolve(graph)
    }

    /// Re-place the child of one joint from its parent's current position.
    ///
    /// Only the child moves; its own descendants keep their positions until the next
    /// full pass.
    pub fn construct_one(&self, graph: &RigGraph, pose: &Pose, joint: JointId) -> RigResult<Pose> {
        let edge = graph.edge_for_joint(joint).ok_or_else(|| {
            RigError::validation(format!("joint {joint} is not part of the rig graph"))
        })?;
        let parent_id = graph.limbs()[edge.parent].id;
        let child = &graph.limbs()[edge.child];

        let parent = pose.get(parent_id).ok_or_else(|| {
            RigError::validation(format!("limb {parent_id} has no pose to construct from"))
        })?;

        let mut next = pose.clone();
        next.limbs.insert(
            child.id,
            LimbPose {
                position: place_child(parent.position, edge, graph),
                rotation_deg: child.rotation,
            },
        );
        Ok(next)
    }
}

fn place_child(parent: Point, edge: &RigEdge, graph: &RigGraph) -> Point {
    let s1 = graph.limbs()[edge.parent].scale;
    let s2 = graph.limbs()[edge.child].scale;
    let a1 = edge.parent_anchor;
    let a2 = edge.child_anchor;
    Point::new(
        parent.x + a1.x * s1 - a2.x * s2,
        parent.y - a1.y * s1 + a2.y * s2,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/pose/resolver.rs"]
mod tests;
