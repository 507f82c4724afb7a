//! Per-overlay geometry: source rect, origin, scale, depth and rotation.

use crate::foundation::core::{SourceRect, Vec2};
use crate::foundation::diagnostics::{Anomaly, Diagnostics};
use crate::foundation::math::is_finite_vec;
use crate::foundation::settings::RigSettings;
use crate::rig::model::{Attachment, Limb, WearableSprite, WearableType};

/// Texture scale of a limb sprite; rigs here are authored at 1:1.
const LIMB_TEXTURE_SCALE: f64 = 1.0;

/// The two wearable scale computations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScaleMode {
    /// `inherit_texture_scale` folds texture and ragdoll scale in; limb scale applies
    /// unless ignored.
    Legacy,
    /// `inherit_scale` folds limb and ragdoll scale in, each unless ignored.
    Modern,
}

impl ScaleMode {
    /// Mode selected by `use_legacy_scale_logic`.
    pub fn from_settings(settings: &RigSettings) -> Self {
        if settings.use_legacy_scale_logic {
            Self::Legacy
        } else {
            Self::Modern
        }
    }
}

/// Final on-screen scale of a wearable, including the display factor.
pub fn wearable_scale(
    wearable: &WearableSprite,
    limb_scale: f64,
    mode: ScaleMode,
    settings: &RigSettings,
) -> f64 {
    let mut scale = wearable.scale;
    match mode {
        ScaleMode::Legacy => {
            if wearable.inherit_texture_scale {
                scale *= LIMB_TEXTURE_SCALE;
                if !wearable.ignore_ragdoll_scale {
                    scale *= settings.ragdoll_scale;
                }
            }
            if !wearable.ignore_limb_scale {
                scale *= limb_scale;
            }
        }
        ScaleMode::Modern => {
            if wearable.inherit_scale {
                if !wearable.ignore_limb_scale {
                    scale *= limb_scale;
                }
                if !wearable.ignore_ragdoll_scale {
                    scale *= settings.ragdoll_scale;
                }
            }
        }
    }
    scale * settings.display_scale
}

pub(crate) fn wearable_texture<'a>(wearable: &'a WearableSprite, limb: &'a Limb) -> Option<&'a str> {
    if wearable.inherit_texture {
        return non_empty(&limb.texture);
    }
    wearable.texture.as_deref().and_then(non_empty)
}

pub(crate) fn wearable_source_rect(
    wearable: &WearableSprite,
    limb: &Limb,
    settings: &RigSettings,
    diagnostics: &mut Diagnostics,
) -> SourceRect {
    if wearable.inherit_source_rect {
        return limb.resolved_source_rect();
    }
    checked_rect(wearable.source_rect, settings, diagnostics, || {
        wearable.describe()
    })
}

pub(crate) fn wearable_origin(
    wearable: &WearableSprite,
    limb: &Limb,
    settings: &RigSettings,
    diagnostics: &mut Diagnostics,
) -> Vec2 {
    if wearable.inherit_origin {
        return limb.origin;
    }
    match wearable.origin {
        Some(origin) if is_finite_vec(origin) => origin,
        Some(_) => {
            diagnostics.push(Anomaly::MalformedOrigin {
                entity: wearable.describe(),
            });
            settings.default_origin
        }
        None => settings.default_origin,
    }
}

/// Inherited depth comes from `depth_limb` when that limb exists, else the target limb,
/// pulled toward the viewer by `depth_epsilon`.
pub(crate) fn wearable_depth(
    wearable: &WearableSprite,
    limb: &Limb,
    all_limbs: &[Limb],
    settings: &RigSettings,
    diagnostics: &mut Diagnostics,
) -> f64 {
    if wearable.inherit_limb_depth {
        let source = wearable
            .depth_limb
            .as_ref()
            .and_then(|t| all_limbs.iter().find(|l| l.limb_type == *t))
            .unwrap_or(limb);
        return source.depth - settings.depth_epsilon;
    }
    match wearable.depth {
        Some(depth) if depth.is_finite() => depth,
        Some(_) => {
            diagnostics.push(Anomaly::MalformedDepth {
                entity: wearable.describe(),
            });
            settings.default_depth
        }
        None => settings.default_depth,
    }
}

pub(crate) fn wearable_rotation(wearable: &WearableSprite, limb_rotation_deg: f64) -> f64 {
    limb_rotation_deg - wearable.rotation
}

/// Sheet-indexed attachments may borrow the head texture.
pub(crate) fn attachment_texture<'a>(attachment: &'a Attachment, head: &'a Limb) -> Option<&'a str> {
    match attachment.texture.as_deref().and_then(non_empty) {
        Some(t) => Some(t),
        None if attachment.sheet_index.is_some() => non_empty(&head.texture),
        None => None,
    }
}

pub(crate) fn attachment_source_rect(
    attachment: &Attachment,
    kind: &WearableType,
    head: &Limb,
    settings: &RigSettings,
    diagnostics: &mut Diagnostics,
) -> SourceRect {
    let sheet_rect = attachment.sheet_index.and_then(|index| {
        let cell = attachment
            .base_size
            .map(|s| Vec2::new(s[0], s[1]))
            .or_else(|| head.head.as_ref().map(|h| h.cell_size()))?;
        Some(SourceRect::from_sheet_cell(index, cell))
    });
    checked_rect(
        sheet_rect.or(attachment.source_rect),
        settings,
        diagnostics,
        || attachment.describe(kind),
    )
}

pub(crate) fn attachment_origin(
    attachment: &Attachment,
    kind: &WearableType,
    head: &Limb,
    diagnostics: &mut Diagnostics,
) -> Vec2 {
    match attachment.origin {
        Some(origin) if is_finite_vec(origin) => origin,
        Some(_) => {
            diagnostics.push(Anomaly::MalformedOrigin {
                entity: attachment.describe(kind),
            });
            head.origin
        }
        None => head.origin,
    }
}

fn checked_rect(
    rect: Option<SourceRect>,
    settings: &RigSettings,
    diagnostics: &mut Diagnostics,
    describe: impl FnOnce() -> String,
) -> SourceRect {
    match rect {
        Some(r) if r.is_well_formed() => r,
        _ => {
            diagnostics.push(Anomaly::MalformedRect {
                entity: describe(),
                field: "source_rect",
            });
            settings.default_source_rect
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.trim().is_empty() { None } else { Some(s) }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/geometry.rs"]
mod tests;
