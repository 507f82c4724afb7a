//! Hide and override precedence between wearables on the same limb.

use crate::rig::model::{WearableSprite, WearableType};

/// Why an overlay was suppressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HideReason {
    /// Another wearable declares `hide_other_wearables`.
    HideOthers,
    /// Another wearable lists this overlay's type.
    HiddenType,
    /// Another wearable declares the `[""]` hide-all-attachments list.
    HideAllAttachments,
}

/// The wearables targeting one limb, in authored order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LimbWearables<'a> {
    items: &'a [&'a WearableSprite],
}

impl<'a> LimbWearables<'a> {
    pub(crate) fn new(items: &'a [&'a WearableSprite]) -> Self {
        Self { items }
    }

    /// Any targeting wearable turns the limb sprite invisible.
    pub(crate) fn hides_limb(&self) -> bool {
        self.items.iter().any(|w| w.hide_limb)
    }

    /// Head attachment suppression; `hide_other_wearables` is checked first.
    pub(crate) fn attachment_hidden(&self, kind: &WearableType) -> Option<HideReason> {
        if self.items.iter().any(|w| w.hide_other_wearables) {
            return Some(HideReason::HideOthers);
        }
        if self.items.iter().any(|w| lists_type(w, kind)) {
            return Some(HideReason::HiddenType);
        }
        if self.items.iter().any(|w| hides_all_attachments(w)) {
            return Some(HideReason::HideAllAttachments);
        }
        None
    }

    /// Wearable suppression by the other wearables on the limb. A wearable never hides
    /// itself.
    pub(crate) fn wearable_hidden(&self, index: usize) -> Option<HideReason> {
        let target = self.items[index];
        let others = self
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, w)| *w);

        let mut reason = None;
        for other in others {
            if other.hide_other_wearables {
                return Some(HideReason::HideOthers);
            }
            if lists_type(other, &target.wearable_type) {
                reason = Some(HideReason::HiddenType);
            }
        }
        reason
    }
}

fn lists_type(w: &WearableSprite, kind: &WearableType) -> bool {
    w.hide_wearables_of_type
        .iter()
        .any(|name| !name.is_empty() && kind.matches_name(name))
}

fn hides_all_attachments(w: &WearableSprite) -> bool {
    matches!(w.hide_wearables_of_type.as_slice(), [only] if only.is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/visibility.rs"]
mod tests;
