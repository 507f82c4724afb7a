use crate::attachments::resolver::{ActiveAttachment, AttachmentResolver, AttachmentSelection};
use crate::compose::geometry::{
    ScaleMode, attachment_origin, attachment_source_rect, attachment_texture, wearable_depth,
    wearable_origin, wearable_rotation, wearable_scale, wearable_source_rect, wearable_texture,
};
use crate::compose::visibility::LimbWearables;
use crate::foundation::core::{Affine, Placement, SourceRect};
use crate::foundation::diagnostics::{Anomaly, Diagnostics};
use crate::foundation::math::{depth_to_z, overlay_z};
use crate::foundation::settings::RigSettings;
use crate::pose::resolver::{LimbPose, Pose};
use crate::rig::graph::RigGraph;
use crate::rig::model::{AttachmentBuckets, Limb, LimbId, LimbType, WearableSprite, WearableType};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// What produced a render layer.
pub enum LayerKind {
    /// The limb's own sprite.
    Limb,
    /// A head attachment from the given bucket.
    Attachment(WearableType),
    /// A wearable of the given type.
    Wearable(WearableType),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One drawable sprite handed to the renderer.
pub struct RenderLayer {
    /// Limb the layer belongs to.
    pub limb: LimbId,
    /// Producer of the layer.
    pub kind: LayerKind,
    /// Name of the limb, attachment or wearable.
    pub name: String,
    /// Paint order; higher paints later.
    pub z_index: i32,
    /// Pixel rectangle inside `texture`.
    pub source_rect: SourceRect,
    /// Decomposed placement.
    pub placement: Placement,
    /// `placement` as a matrix over `source_rect` local pixels.
    pub transform: Affine,
    /// Opaque texture identifier.
    pub texture: String,
    /// `0.0` for limbs hidden by a wearable, otherwise `1.0`.
    pub opacity: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
/// Every layer of a rig plus the anomalies met while composing it.
pub struct Composite {
    /// Layers in emission order: per limb, base then attachments then wearables.
    pub layers: Vec<RenderLayer>,
    /// Skipped or defaulted overlays.
    pub diagnostics: Diagnostics,
}

impl Composite {
    /// Back-to-front order: ascending z, ties kept in emission order.
    pub fn sorted_for_paint(&self) -> Vec<&RenderLayer> {
        let mut out: Vec<&RenderLayer> = self.layers.iter().collect();
        out.sort_by_key(|l| l.z_index);
        out
    }
}

/// Inputs for composing one limb.
#[derive(Clone, Copy, Debug)]
pub struct LimbContext<'a> {
    /// The limb.
    pub limb: &'a Limb,
    /// Its resolved placement.
    pub pose: LimbPose,
    /// Every limb of the rig, for inherited depth lookups.
    pub all_limbs: &'a [Limb],
    /// Selected head attachments; only used when the limb is a head.
    pub attachments: &'a [ActiveAttachment<'a>],
}

/// Resolves the visible sprites of each limb.
#[derive(Clone, Debug, Default)]
pub struct LayerCompositor {
    settings: RigSettings,
}

impl LayerCompositor {
    /// Compositor using `settings` for defaults and the scale mode.
    pub fn new(settings: RigSettings) -> Self {
        Self { settings }
    }

    /// Active settings.
    pub fn settings(&self) -> &RigSettings {
        &self.settings
    }

    #[tracing::instrument(skip_all, fields(limbs = graph.limbs().len(), wearables = wearables.len()))]
    /// Compose every limb in arena order.
    pub fn composite_rig(
        &self,
        graph: &RigGraph,
        pose: &Pose,
        buckets: &AttachmentBuckets,
        selection: &AttachmentSelection,
        wearables: &[WearableSprite],
    ) -> Composite {
        let mut diagnostics = Diagnostics::new();
        let active = AttachmentResolver::active(selection, buckets, &mut diagnostics);

        let mut layers = Vec::new();
        for limb in graph.limbs() {
            let ctx = LimbContext {
                limb,
                pose: pose.get(limb.id).unwrap_or_default(),
                all_limbs: graph.limbs(),
                attachments: &active,
            };
            layers.extend(self.composite_limb(ctx, wearables, &mut diagnostics));
        }
        report_unplaced_wearables(graph, wearables, &mut diagnostics);

        tracing::debug!(layers = layers.len(), "rig composited");
        Composite {
            layers,
            diagnostics,
        }
    }

    /// Visible layers of one limb: the base sprite, then head attachments, then wearables.
    ///
    /// `wearables` may target any limb; only those whose `limb` matches this limb's type
    /// are considered.
    pub fn composite_limb(
        &self,
        ctx: LimbContext<'_>,
        wearables: &[WearableSprite],
        diagnostics: &mut Diagnostics,
    ) -> Vec<RenderLayer> {
        let limb = ctx.limb;
        let targeting: Vec<&WearableSprite> = wearables
            .iter()
            .filter(|w| w.limb.as_ref() == Some(&limb.limb_type))
            .collect();
        let rules = LimbWearables::new(&targeting);

        let mut layers = Vec::with_capacity(1 + ctx.attachments.len() + targeting.len());
        layers.push(self.base_layer(&ctx, rules.hides_limb()));

        if limb.limb_type == LimbType::Head {
            for active in ctx.attachments {
                if let Some(reason) = rules.attachment_hidden(active.kind) {
                    tracing::trace!(kind = %active.kind, ?reason, "attachment hidden");
                    continue;
                }
                if let Some(layer) = self.attachment_layer(&ctx, active, diagnostics) {
                    layers.push(layer);
                }
            }
        }

        for (i, wearable) in targeting.iter().enumerate() {
            if let Some(reason) = rules.wearable_hidden(i) {
                tracing::trace!(name = %wearable.name, ?reason, "wearable hidden");
                continue;
            }
            if let Some(layer) = self.wearable_layer(&ctx, wearable, diagnostics) {
                layers.push(layer);
            }
        }

        layers
    }

    fn base_layer(&self, ctx: &LimbContext<'_>, hidden: bool) -> RenderLayer {
        let limb = ctx.limb;
        let source_rect = limb.resolved_source_rect();
        let placement = Placement {
            translation: ctx.pose.position.to_vec2(),
            rotation_deg: ctx.pose.rotation_deg,
            scale: limb.scale,
            origin: limb.origin,
        };
        RenderLayer {
            limb: limb.id,
            kind: LayerKind::Limb,
            name: limb.name.clone(),
            z_index: depth_to_z(limb.depth),
            source_rect,
            placement,
            transform: placement.to_affine(source_rect),
            texture: limb.texture.clone(),
            opacity: if hidden { 0.0 } else { 1.0 },
        }
    }

    fn attachment_layer(
        &self,
        ctx: &LimbContext<'_>,
        active: &ActiveAttachment<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Option<RenderLayer> {
        let head = ctx.limb;
        let attachment = active.attachment;
        let Some(texture) = attachment_texture(attachment, head) else {
            diagnostics.push(Anomaly::MissingSpriteData {
                entity: attachment.describe(active.kind),
                field: "texture",
            });
            return None;
        };

        let source_rect =
            attachment_source_rect(attachment, active.kind, head, &self.settings, diagnostics);
        let placement = Placement {
            translation: ctx.pose.position.to_vec2(),
            rotation_deg: ctx.pose.rotation_deg,
            scale: head.scale,
            origin: attachment_origin(attachment, active.kind, head, diagnostics),
        };
        Some(RenderLayer {
            limb: head.id,
            kind: LayerKind::Attachment(active.kind.clone()),
            name: attachment.name.clone(),
            z_index: overlay_z(head.depth, active.kind.priority()),
            source_rect,
            placement,
            transform: placement.to_affine(source_rect),
            texture: texture.to_string(),
            opacity: 1.0,
        })
    }

    fn wearable_layer(
        &self,
        ctx: &LimbContext<'_>,
        wearable: &WearableSprite,
        diagnostics: &mut Diagnostics,
    ) -> Option<RenderLayer> {
        let limb = ctx.limb;
        let Some(texture) = wearable_texture(wearable, limb) else {
            diagnostics.push(Anomaly::MissingSpriteData {
                entity: wearable.describe(),
                field: "texture",
            });
            return None;
        };

        let source_rect = wearable_source_rect(wearable, limb, &self.settings, diagnostics);
        let mode = ScaleMode::from_settings(&self.settings);
        let placement = Placement {
            translation: ctx.pose.position.to_vec2(),
            rotation_deg: wearable_rotation(wearable, ctx.pose.rotation_deg),
            scale: wearable_scale(wearable, limb.scale, mode, &self.settings),
            origin: wearable_origin(wearable, limb, &self.settings, diagnostics),
        };
        let depth = wearable_depth(wearable, limb, ctx.all_limbs, &self.settings, diagnostics);
        Some(RenderLayer {
            limb: limb.id,
            kind: LayerKind::Wearable(wearable.wearable_type.clone()),
            name: wearable.name.clone(),
            z_index: overlay_z(depth, wearable.wearable_type.priority()),
            source_rect,
            placement,
            transform: placement.to_affine(source_rect),
            texture: texture.to_string(),
            opacity: 1.0,
        })
    }
}

/// Wearables with no target, or whose target type no limb in the rig has, are never drawn.
fn report_unplaced_wearables(
    graph: &RigGraph,
    wearables: &[WearableSprite],
    diagnostics: &mut Diagnostics,
) {
    for wearable in wearables {
        match &wearable.limb {
            None => diagnostics.push(Anomaly::MissingSpriteData {
                entity: wearable.describe(),
                field: "limb",
            }),
            Some(target) if graph.first_limb_of_type(target).is_none() => {
                diagnostics.push(Anomaly::UnmatchedWearableTarget {
                    wearable: wearable.name.clone(),
                    limb: target.to_string(),
                });
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
