use std::sync::Arc;

use crate::attachments::resolver::{AttachmentResolver, AttachmentSelection};
use crate::compose::compositor::{Composite, LayerCompositor};
use crate::compose::fingerprint::{LayerFingerprint, fingerprint_layers};
use crate::foundation::diagnostics::Diagnostics;
use crate::foundation::error::{RigError, RigResult};
use crate::foundation::settings::RigSettings;
use crate::pose::resolver::{Pose, PoseResolver};
use crate::rig::graph::{RigGraph, RigGraphBuilder};
use crate::rig::model::{AttachmentId, Gender, JointId, RigDocument, WearableSprite, WearableType};

/// Immutable snapshot of one character: inputs, resolved graph, pose, attachment
/// selection and composed layers.
///
/// Every editor operation consumes a state and returns the next one. Nothing is patched
/// in place; the composite is always rebuilt from the new inputs.
#[derive(Clone, Debug)]
pub struct RigState {
    document: Arc<RigDocument>,
    gender: Gender,
    settings: RigSettings,
    graph: Option<RigGraph>,
    pose: Pose,
    selection: AttachmentSelection,
    composite: Composite,
    diagnostics: Diagnostics,
    load_error: Option<String>,
}

impl RigState {
    /// Build, pose, select default attachments and composite.
    ///
    /// Invalid settings are an error. A rig without a torso is not: the state degrades to
    /// an empty rig and the reason is kept in [`load_error`](Self::load_error).
    pub fn load(document: RigDocument, gender: Gender, settings: RigSettings) -> RigResult<Self> {
        settings.validate()?;
        Ok(Self::load_shared(Arc::new(document), gender, settings))
    }

    fn load_shared(document: Arc<RigDocument>, gender: Gender, settings: RigSettings) -> Self {
        let built = match RigGraphBuilder::build_with(&document.limbs, &document.joints, &settings)
        {
            Ok(built) => built,
            Err(err) => {
                tracing::error!(%err, "rig cannot be posed, degrading to an empty rig");
                return Self {
                    document,
                    gender,
                    settings,
                    graph: None,
                    pose: Pose::default(),
                    selection: AttachmentSelection::default(),
                    composite: Composite::default(),
                    diagnostics: Diagnostics::new(),
                    load_error: Some(err.to_string()),
                };
            }
        };

        let mut diagnostics = built.diagnostics;
        let resolved = PoseResolver::new(&settings).resolve(&built.graph);
        diagnostics.extend(resolved.diagnostics);
        let selection = AttachmentResolver::select_defaults(&document.attachments, gender);

        Self {
            document,
            gender,
            settings,
            graph: Some(built.graph),
            pose: resolved.pose,
            selection,
            composite: Composite::default(),
            diagnostics,
            load_error: None,
        }
        .recomposite()
    }

    /// The input document.
    pub fn document(&self) -> &RigDocument {
        &self.document
    }

    /// Current gender.
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Settings in use.
    pub fn settings(&self) -> &RigSettings {
        &self.settings
    }

    /// The rig graph; `None` for a degraded rig.
    pub fn graph(&self) -> Option<&RigGraph> {
        self.graph.as_ref()
    }

    /// Current pose.
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Current attachment selection.
    pub fn selection(&self) -> &AttachmentSelection {
        &self.selection
    }

    /// Current composite.
    pub fn composite(&self) -> &Composite {
        &self.composite
    }

    /// Anomalies from building and posing the rig.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Why the rig degraded to empty, if it did.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Fingerprint of the current composite.
    pub fn fingerprint(&self) -> LayerFingerprint {
        fingerprint_layers(&self.composite.layers)
    }

    /// Recompute the pose from scratch.
    pub fn resolve(self) -> Self {
        self.construct_all()
    }

    /// Full pose pass, overwriting any interactive edits.
    pub fn construct_all(mut self) -> Self {
        let Some(graph) = self.graph.as_ref() else {
            return self;
        };
        let resolved = PoseResolver::new(&self.settings).construct_all(graph);
        self.pose = resolved.pose;
        self.recomposite()
    }

    /// Re-place the child of `joint` from its parent's current position.
    pub fn construct_one(mut self, joint: JointId) -> RigResult<Self> {
        let Some(graph) = &self.graph else {
            return Err(RigError::validation("rig is empty"));
        };
        self.pose = PoseResolver::new(&self.settings).construct_one(graph, &self.pose, joint)?;
        Ok(self.recomposite())
    }

    /// Replace one attachment slot with an explicit choice (or clear it).
    pub fn select_attachment(
        mut self,
        kind: WearableType,
        attachment: Option<AttachmentId>,
    ) -> RigResult<Self> {
        self.selection = AttachmentResolver::select(
            &self.selection,
            &self.document.attachments,
            kind,
            attachment,
        )?;
        Ok(self.recomposite())
    }

    /// Switch gender. This is a full reload: selections do not carry over.
    pub fn with_gender(self, gender: Gender) -> Self {
        Self::load_shared(self.document, gender, self.settings)
    }

    /// Replace the equipped wearables and recomposite.
    pub fn with_wearables(mut self, wearables: Vec<WearableSprite>) -> Self {
        let mut document = RigDocument::clone(&self.document);
        document.wearables = wearables;
        self.document = Arc::new(document);
        self.recomposite()
    }

    /// Rebuild the composite from the current inputs.
    pub fn recomposite(mut self) -> Self {
        self.composite = match &self.graph {
            Some(graph) => LayerCompositor::new(self.settings.clone()).composite_rig(
                graph,
                &self.pose,
                &self.document.attachments,
                &self.selection,
                &self.document.wearables,
            ),
            None => Composite::default(),
        };
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
