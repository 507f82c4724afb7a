use std::collections::{HashMap, VecDeque};

use crate::foundation::core::Vec2;
use crate::foundation::diagnostics::{Anomaly, Diagnostics};
use crate::foundation::error::{RigError, RigResult};
use crate::foundation::math::is_finite_vec;
use crate::foundation::settings::RigSettings;
use crate::rig::model::{Joint, JointId, Limb, LimbId, LimbType};

/// Directed parent-to-child edge contributed by one joint.
#[derive(Clone, Debug, PartialEq)]
pub struct RigEdge {
    /// Joint this edge came from.
    pub joint: JointId,
    /// Arena index of `limb1`.
    pub parent: usize,
    /// Arena index of `limb2`.
    pub child: usize,
    /// Anchor in the parent's local space.
    pub parent_anchor: Vec2,
    /// Anchor in the child's local space.
    pub child_anchor: Vec2,
}

/// Result of a breadth-first walk from the root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Traversal {
    /// Edges that placed a limb, in visit order.
    pub tree: Vec<usize>,
    /// Edges that reached an already placed limb.
    pub relinks: Vec<usize>,
    /// Arena indices of limbs the walk never reached, in arena order.
    pub unreachable: Vec<usize>,
}

/// Validated limb arena plus joint adjacency, rooted at the torso.
#[derive(Clone, Debug)]
pub struct RigGraph {
    limbs: Vec<Limb>,
    index: HashMap<LimbId, usize>,
    edges: Vec<RigEdge>,
    adjacency: Vec<Vec<usize>>,
    root: usize,
}

impl RigGraph {
    /// Sanitised limbs in authored order (duplicates removed).
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    /// Surviving joint edges in authored order.
    pub fn edges(&self) -> &[RigEdge] {
        &self.edges
    }

    /// Arena index of the root limb.
    pub fn root(&self) -> usize {
        self.root
    }

    /// The root limb.
    pub fn root_limb(&self) -> &Limb {
        &self.limbs[self.root]
    }

    /// Arena index of a limb id.
    pub fn index_of(&self, id: LimbId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Limb by id.
    pub fn limb(&self, id: LimbId) -> Option<&Limb> {
        self.index_of(id).map(|i| &self.limbs[i])
    }

    /// First limb of a given type, in arena order.
    pub fn first_limb_of_type(&self, limb_type: &LimbType) -> Option<&Limb> {
        self.limbs.iter().find(|l| l.limb_type == *limb_type)
    }

    /// Edge created by `joint`, if the joint survived validation.
    pub fn edge_for_joint(&self, joint: JointId) -> Option<&RigEdge> {
        self.edges.iter().find(|e| e.joint == joint)
    }

    /// Breadth-first walk from the root over outgoing edges in joint order.
    ///
    /// Each limb is placed by the first edge that reaches it; later edges into a placed
    /// limb are reported as relinks.
    pub fn traverse(&self) -> Traversal {
        let mut visited = vec![false; self.limbs.len()];
        let mut queue = VecDeque::with_capacity(self.limbs.len());
        let mut out = Traversal::default();

        visited[self.root] = true;
        queue.push_back(self.root);

        while let Some(limb) = queue.pop_front() {
            for &edge_idx in &self.adjacency[limb] {
                let child = self.edges[edge_idx].child;
                if visited[child] {
                    out.relinks.push(edge_idx);
                    continue;
                }
                visited[child] = true;
                out.tree.push(edge_idx);
                queue.push_back(child);
            }
        }

        out.unreachable = visited
            .iter()
            .enumerate()
            .filter(|(_, v)| !**v)
            .map(|(i, _)| i)
            .collect();
        out
    }
}

/// A built graph together with the anomalies found while building it.
#[derive(Clone, Debug)]
pub struct BuiltRig {
    /// The validated graph.
    pub graph: RigGraph,
    /// Non-fatal problems in the input records.
    pub diagnostics: Diagnostics,
}

/// Turns flat limb and joint records into a [`RigGraph`].
pub struct RigGraphBuilder;

impl RigGraphBuilder {
    /// Build with default settings.
    pub fn build(limbs: &[Limb], joints: &[Joint]) -> RigResult<BuiltRig> {
        Self::build_with(limbs, joints, &RigSettings::default())
    }

    #[tracing::instrument(skip_all, fields(limbs = limbs.len(), joints = joints.len()))]
    /// Build, using `settings` for the defaults given to malformed limbs.
    ///
    /// Fails only when no torso exists.
    pub fn build_with(
        limbs: &[Limb],
        joints: &[Joint],
        settings: &RigSettings,
    ) -> RigResult<BuiltRig> {
        let mut diagnostics = Diagnostics::new();

        let mut arena = Vec::with_capacity(limbs.len());
        let mut index = HashMap::with_capacity(limbs.len());
        for limb in limbs {
            if index.contains_key(&limb.id) {
                diagnostics.push(Anomaly::DuplicateLimbId { limb: limb.id });
                continue;
            }
            index.insert(limb.id, arena.len());
            arena.push(sanitize_limb(limb, settings, &mut diagnostics));
        }

        let mut torsos = arena
            .iter()
            .enumerate()
            .filter(|(_, l)| l.limb_type == LimbType::Torso);
        let Some((root, root_limb)) = torsos.next() else {
            return Err(RigError::missing_root(format!(
                "none of {} limbs is a torso",
                arena.len()
            )));
        };
        let ignored: Vec<LimbId> = torsos.map(|(_, l)| l.id).collect();
        if !ignored.is_empty() {
            diagnostics.push(Anomaly::AmbiguousRoot {
                chosen: root_limb.id,
                ignored,
            });
        }

        let mut edges = Vec::with_capacity(joints.len());
        let mut adjacency = vec![Vec::new(); arena.len()];
        for (i, joint) in joints.iter().enumerate() {
            let joint_id = JointId(i as u32);
            let Some(edge) = edge_from_joint(joint_id, joint, &index, &mut diagnostics) else {
                continue;
            };
            adjacency[edge.parent].push(edges.len());
            edges.push(edge);
        }

        let graph = RigGraph {
            limbs: arena,
            index,
            edges,
            adjacency,
            root,
        };

        for &edge_idx in &graph.traverse().relinks {
            let edge = &graph.edges[edge_idx];
            diagnostics.push(Anomaly::CyclicJoint {
                joint: edge.joint,
                limb: graph.limbs[edge.child].id,
            });
        }

        tracing::debug!(
            limbs = graph.limbs.len(),
            edges = graph.edges.len(),
            root = %graph.root_limb().id,
            "rig graph built"
        );
        Ok(BuiltRig { graph, diagnostics })
    }
}

fn edge_from_joint(
    joint_id: JointId,
    joint: &Joint,
    index: &HashMap<LimbId, usize>,
    diagnostics: &mut Diagnostics,
) -> Option<RigEdge> {
    let mut lookup = |limb: LimbId| {
        let found = index.get(&limb).copied();
        if found.is_none() {
            diagnostics.push(Anomaly::UnknownLimbReference {
                joint: joint_id,
                limb,
            });
        }
        found
    };
    let parent = lookup(joint.limb1);
    let child = lookup(joint.limb2);
    let (parent, child) = (parent?, child?);

    for (field, anchor) in [
        ("limb1_anchor", joint.limb1_anchor),
        ("limb2_anchor", joint.limb2_anchor),
    ] {
        if !is_finite_vec(anchor) {
            diagnostics.push(Anomaly::MalformedAnchor {
                joint: joint_id,
                field,
            });
            return None;
        }
    }

    Some(RigEdge {
        joint: joint_id,
        parent,
        child,
        parent_anchor: joint.limb1_anchor,
        child_anchor: joint.limb2_anchor,
    })
}

fn sanitize_limb(limb: &Limb, settings: &RigSettings, diagnostics: &mut Diagnostics) -> Limb {
    let mut out = limb.clone();

    if !limb.scale.is_finite() || limb.scale <= 0.0 {
        diagnostics.push(Anomaly::MalformedScale {
            limb: limb.id,
            value: limb.scale,
        });
        out.scale = 1.0;
    }
    if !limb.depth.is_finite() {
        diagnostics.push(Anomaly::MalformedDepth {
            entity: limb.describe(),
        });
        out.depth = settings.default_depth;
    }
    if !is_finite_vec(limb.origin) {
        diagnostics.push(Anomaly::MalformedOrigin {
            entity: limb.describe(),
        });
        out.origin = settings.default_origin;
    }
    if !limb.source_rect.is_well_formed() {
        diagnostics.push(Anomaly::MalformedRect {
            entity: limb.describe(),
            field: "source_rect",
        });
        out.source_rect = settings.default_source_rect;
    }
    if let Some(sheet) = &limb.head
        && !sheet.source_rect().is_well_formed()
    {
        diagnostics.push(Anomaly::MalformedRect {
            entity: limb.describe(),
            field: "base_size",
        });
        out.head = None;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/rig/graph.rs"]
mod tests;
