//! Head attachment selection.

use std::collections::BTreeMap;

use crate::foundation::diagnostics::{Anomaly, Diagnostics};
use crate::foundation::error::{RigError, RigResult};
use crate::rig::model::{Attachment, AttachmentBuckets, AttachmentId, Gender, WearableType};

/// Selected attachment per bucket; `None` means the slot is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttachmentSelection {
    slots: BTreeMap<WearableType, Option<AttachmentId>>,
}

impl AttachmentSelection {
    /// Selection for one bucket.
    pub fn get(&self, kind: &WearableType) -> Option<AttachmentId> {
        self.slots.get(kind).copied().flatten()
    }

    /// Every slot in bucket order, including empty ones.
    pub fn slots(&self) -> impl Iterator<Item = (&WearableType, Option<AttachmentId>)> + '_ {
        self.slots.iter().map(|(k, v)| (k, *v))
    }

    /// Number of slots with a selection.
    pub fn active_count(&self) -> usize {
        self.slots.values().filter(|v| v.is_some()).count()
    }
}

/// An attachment that is selected and resolved to its record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveAttachment<'a> {
    /// Bucket the attachment came from.
    pub kind: &'a WearableType,
    /// The attachment record.
    pub attachment: &'a Attachment,
}

/// Stateless selection logic over attachment buckets.
pub struct AttachmentResolver;

impl AttachmentResolver {
    #[tracing::instrument(skip(buckets), fields(buckets = buckets.len()))]
    /// Default selection for `gender`.
    ///
    /// Hair, beard and moustache buckets get their first eligible attachment in authored
    /// order; every other bucket starts empty. Nothing carries over from a previous
    /// selection.
    pub fn select_defaults(buckets: &AttachmentBuckets, gender: Gender) -> AttachmentSelection {
        let slots = buckets
            .iter()
            .map(|(kind, items)| {
                let pick = if kind.is_default_active() {
                    items.iter().find(|a| a.is_eligible(gender)).map(|a| a.id)
                } else {
                    None
                };
                (kind.clone(), pick)
            })
            .collect();
        AttachmentSelection { slots }
    }

    /// Replace one slot with an explicit choice, returning the next selection.
    ///
    /// The attachment must exist in the bucket; gender tags are not enforced for explicit
    /// choices.
    pub fn select(
        selection: &AttachmentSelection,
        buckets: &AttachmentBuckets,
        kind: WearableType,
        attachment: Option<AttachmentId>,
    ) -> RigResult<AttachmentSelection> {
        let Some(bucket) = buckets.get(&kind) else {
            return Err(RigError::validation(format!(
                "no '{kind}' attachment bucket"
            )));
        };
        if let Some(id) = attachment
            && !bucket.iter().any(|a| a.id == id)
        {
            return Err(RigError::validation(format!(
                "'{kind}' bucket has no attachment {id}"
            )));
        }
        let mut next = selection.clone();
        next.slots.insert(kind, attachment);
        Ok(next)
    }

    /// Resolve selected ids to records, in bucket order.
    ///
    /// Ids that no longer exist are reported and dropped.
    pub fn active<'a>(
        selection: &AttachmentSelection,
        buckets: &'a AttachmentBuckets,
        diagnostics: &mut Diagnostics,
    ) -> Vec<ActiveAttachment<'a>> {
        let mut out = Vec::new();
        for (kind, items) in buckets {
            let Some(id) = selection.get(kind) else {
                continue;
            };
            match items.iter().find(|a| a.id == id) {
                Some(attachment) => out.push(ActiveAttachment { kind, attachment }),
                None => diagnostics.push(Anomaly::UnknownAttachmentSelection {
                    kind: kind.to_string(),
                    attachment: id.0,
                }),
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/attachments/resolver.rs"]
mod tests;
