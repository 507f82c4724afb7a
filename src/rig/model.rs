//! Canonical rig records, as handed over by the document loader.
//!
//! Records are already numeric-parsed and key-normalised; nothing here re-implements
//! casing tolerance or lenient parsing beyond what the enum names need.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::foundation::core::{Point, SheetIndex, SourceRect, Vec2};
use crate::foundation::error::{RigError, RigResult};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a limb, unique within a rig.
    LimbId
);
id_type!(
    /// Index of a joint in [`RigDocument::joints`].
    JointId
);
id_type!(
    /// Identifier of an attachment inside its bucket.
    AttachmentId
);

/// Body part classification. Wearables target limbs by type.
///
/// Names parse case-insensitively. Any type outside the built-in set is kept in
/// [`LimbType::Other`], lower-cased, and only ever matches the same name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LimbType {
    /// Pose root.
    Torso,
    /// Head; carries attachments.
    Head,
    /// Hip section.
    Waist,
    /// Lower jaw.
    Jaw,
    /// Unsided arm.
    Arm,
    /// Left upper arm.
    LeftArm,
    /// Right upper arm.
    RightArm,
    /// Left forearm.
    LeftForearm,
    /// Right forearm.
    RightForearm,
    /// Unsided hand.
    Hand,
    /// Left hand.
    LeftHand,
    /// Right hand.
    RightHand,
    /// Left thigh.
    LeftThigh,
    /// Right thigh.
    RightThigh,
    /// Unsided leg.
    Leg,
    /// Left lower leg.
    LeftLeg,
    /// Right lower leg.
    RightLeg,
    /// Unsided foot.
    Foot,
    /// Left foot.
    LeftFoot,
    /// Right foot.
    RightFoot,
    /// Combined legs sprite.
    Legs,
    /// Tail.
    Tail,
    /// Any other type, lower-cased.
    Other(String),
}

impl LimbType {
    const NAMED: [Self; 22] = [
        Self::Torso,
        Self::Head,
        Self::Waist,
        Self::Jaw,
        Self::Arm,
        Self::LeftArm,
        Self::RightArm,
        Self::LeftForearm,
        Self::RightForearm,
        Self::Hand,
        Self::LeftHand,
        Self::RightHand,
        Self::LeftThigh,
        Self::RightThigh,
        Self::Leg,
        Self::LeftLeg,
        Self::RightLeg,
        Self::Foot,
        Self::LeftFoot,
        Self::RightFoot,
        Self::Legs,
        Self::Tail,
    ];

    /// Canonical name, as authored in rig documents.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Torso => "Torso",
            Self::Head => "Head",
            Self::Waist => "Waist",
            Self::Jaw => "Jaw",
            Self::Arm => "Arm",
            Self::LeftArm => "LeftArm",
            Self::RightArm => "RightArm",
            Self::LeftForearm => "LeftForearm",
            Self::RightForearm => "RightForearm",
            Self::Hand => "Hand",
            Self::LeftHand => "LeftHand",
            Self::RightHand => "RightHand",
            Self::LeftThigh => "LeftThigh",
            Self::RightThigh => "RightThigh",
            Self::Leg => "Leg",
            Self::LeftLeg => "LeftLeg",
            Self::RightLeg => "RightLeg",
            Self::Foot => "Foot",
            Self::LeftFoot => "LeftFoot",
            Self::RightFoot => "RightFoot",
            Self::Legs => "Legs",
            Self::Tail => "Tail",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for LimbType {
    fn from(s: &str) -> Self {
        let s = s.trim();
        Self::NAMED
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .unwrap_or_else(|| Self::Other(s.to_ascii_lowercase()))
    }
}

impl From<String> for LimbType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<LimbType> for String {
    fn from(t: LimbType) -> Self {
        match t {
            LimbType::Other(name) => name,
            named => named.as_str().to_string(),
        }
    }
}

impl fmt::Display for LimbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wearable and head-attachment categories.
///
/// The named variants are the built-in categories with a draw priority; any other
/// bucket name (for example `helmet`) is kept verbatim in [`WearableType::Other`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WearableType {
    /// Regular clothing or equipment.
    Item,
    /// Hair attachment.
    Hair,
    /// Beard attachment.
    Beard,
    /// Moustache attachment.
    Moustache,
    /// Face decoration.
    FaceAttachment,
    /// Husk infection overlay.
    Husk,
    /// Herpes overlay.
    Herpes,
    /// Any other bucket, lower-cased.
    Other(String),
}

impl WearableType {
    /// Buckets that get a default selection when a rig is loaded.
    pub const DEFAULT_ACTIVE: [Self; 3] = [Self::Hair, Self::Beard, Self::Moustache];

    /// Canonical lower-case name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Item => "item",
            Self::Hair => "hair",
            Self::Beard => "beard",
            Self::Moustache => "moustache",
            Self::FaceAttachment => "faceattachment",
            Self::Husk => "husk",
            Self::Herpes => "herpes",
            Self::Other(name) => name,
        }
    }

    /// Z tie-breaker added to overlays of this type.
    pub fn priority(&self) -> i32 {
        match self {
            Self::Hair => 7,
            Self::Beard => 6,
            Self::Moustache => 5,
            Self::FaceAttachment => 4,
            Self::Husk => 3,
            Self::Herpes => 2,
            Self::Item | Self::Other(_) => 1,
        }
    }

    /// Whether this bucket receives a default selection.
    pub fn is_default_active(&self) -> bool {
        Self::DEFAULT_ACTIVE.contains(self)
    }

    /// Case-insensitive comparison against an authored type name.
    pub fn matches_name(&self, name: &str) -> bool {
        WearableType::from(name) == *self
    }
}

impl From<&str> for WearableType {
    fn from(s: &str) -> Self {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "item" => Self::Item,
            "hair" => Self::Hair,
            "beard" => Self::Beard,
            "moustache" => Self::Moustache,
            "faceattachment" | "face_attachment" => Self::FaceAttachment,
            "husk" => Self::Husk,
            "herpes" => Self::Herpes,
            _ => Self::Other(lower),
        }
    }
}

impl From<String> for WearableType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<WearableType> for String {
    fn from(t: WearableType) -> Self {
        match t {
            WearableType::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for WearableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Character gender used to filter attachments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Female.
    Female,
    /// Male.
    Male,
}

impl Gender {
    /// Tag string attachments use to declare applicability.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

impl FromStr for Gender {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" => Ok(Self::Female),
            "male" => Ok(Self::Male),
            other => Err(RigError::validation(format!("unknown gender '{other}'"))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sprite-sheet layout of a head limb.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HeadSheet {
    /// Cell of the head sprite.
    pub sheet_index: SheetIndex,
    /// Cell size `[w, h]`.
    pub base_size: [f64; 2],
}

impl HeadSheet {
    /// Cell size as a vector.
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(self.base_size[0], self.base_size[1])
    }

    /// Source rect of the head sprite.
    pub fn source_rect(&self) -> SourceRect {
        SourceRect::from_sheet_cell(self.sheet_index, self.cell_size())
    }
}

fn default_origin() -> Vec2 {
    Vec2::new(0.5, 0.5)
}

fn default_scale() -> f64 {
    1.0
}

fn default_depth() -> f64 {
    0.5
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A rigid body part with its own sprite.
pub struct Limb {
    /// Unique id.
    pub id: LimbId,
    /// Body part classification.
    #[serde(rename = "type")]
    pub limb_type: LimbType,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Opaque texture identifier.
    pub texture: String,
    /// Sprite rectangle inside `texture`.
    pub source_rect: SourceRect,
    /// Sprite origin as a unit fraction.
    #[serde(default = "default_origin")]
    pub origin: Vec2,
    /// Draw-order hint; smaller is nearer.
    #[serde(default = "default_depth")]
    pub depth: f64,
    /// Uniform sprite scale, > 0.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Stored rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Last known position; ignored by the pose pass.
    #[serde(default)]
    pub position: Point,
    /// Head sprite-sheet layout, head limbs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<HeadSheet>,
}

impl Limb {
    /// Base sprite rect: the head sheet cell for sheet heads, otherwise `source_rect`.
    pub fn resolved_source_rect(&self) -> SourceRect {
        match &self.head {
            Some(sheet) => sheet.source_rect(),
            None => self.source_rect,
        }
    }

    pub(crate) fn describe(&self) -> String {
        format!("limb {} ({})", self.id, self.limb_type)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Anchor constraint: `limb1_anchor` in limb1 space coincides with `limb2_anchor` in
/// limb2 space.
pub struct Joint {
    /// Parent side.
    pub limb1: LimbId,
    /// Child side.
    pub limb2: LimbId,
    /// Anchor in limb1's local, unscaled space.
    pub limb1_anchor: Vec2,
    /// Anchor in limb2's local, unscaled space.
    pub limb2_anchor: Vec2,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Head-specific overlay such as hair or a beard.
pub struct Attachment {
    /// Id within the bucket.
    pub id: AttachmentId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Texture; sheet-indexed attachments fall back to the head texture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    /// Explicit source rect, used when no sheet cell resolves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_rect: Option<SourceRect>,
    /// Sheet cell; takes precedence over `source_rect` when a cell size is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_index: Option<SheetIndex>,
    /// Sheet cell size; defaults to the head's base size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_size: Option<[f64; 2]>,
    /// Explicit origin; defaults to the limb origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Vec2>,
    /// Genders this attachment applies to; empty means all.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Attachment {
    /// Neutral attachments (no tags) apply to every gender.
    pub fn is_eligible(&self, gender: Gender) -> bool {
        self.tags.is_empty()
            || self
                .tags
                .iter()
                .any(|t| t.trim().eq_ignore_ascii_case(gender.as_str()))
    }

    pub(crate) fn describe(&self, kind: &WearableType) -> String {
        format!("{kind} attachment {} ('{}')", self.id, self.name)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Clothing or equipment sprite attached to a limb at render time.
#[serde(default)]
pub struct WearableSprite {
    /// Display name.
    pub name: String,
    /// Category, used by `hide_wearables_of_type`.
    #[serde(rename = "type")]
    pub wearable_type: WearableType,
    /// Texture path; may be absent when `inherit_texture` is set.
    pub texture: Option<String>,
    /// Use the target limb texture.
    pub inherit_texture: bool,
    /// Target limb type. A wearable without one is never drawn.
    pub limb: Option<LimbType>,
    /// Explicit source rect.
    pub source_rect: Option<SourceRect>,
    /// Use the target limb rect.
    pub inherit_source_rect: bool,
    /// Explicit origin.
    pub origin: Option<Vec2>,
    /// Use the target limb origin.
    pub inherit_origin: bool,
    /// Base scale.
    pub scale: f64,
    /// Modern mode: fold limb and ragdoll scale in.
    pub inherit_scale: bool,
    /// Legacy mode: fold texture and ragdoll scale in.
    pub inherit_texture_scale: bool,
    /// Do not multiply by limb scale.
    pub ignore_limb_scale: bool,
    /// Do not multiply by ragdoll scale.
    pub ignore_ragdoll_scale: bool,
    /// Explicit depth.
    pub depth: Option<f64>,
    /// Derive depth from a limb.
    pub inherit_limb_depth: bool,
    /// Limb whose depth is inherited; defaults to the target limb.
    pub depth_limb: Option<LimbType>,
    /// Rotation in degrees, subtracted from the limb rotation.
    pub rotation: f64,
    /// Make the limb sprite itself invisible.
    pub hide_limb: bool,
    /// Suppress every other wearable and attachment on the limb.
    pub hide_other_wearables: bool,
    /// Suppress wearables and attachments of these types. `[""]` hides every attachment.
    pub hide_wearables_of_type: Vec<String>,
}

impl Default for WearableSprite {
    fn default() -> Self {
        Self {
            name: String::new(),
            wearable_type: WearableType::Item,
            texture: None,
            inherit_texture: false,
            limb: None,
            source_rect: None,
            inherit_source_rect: false,
            origin: None,
            inherit_origin: false,
            scale: 1.0,
            inherit_scale: false,
            inherit_texture_scale: false,
            ignore_limb_scale: false,
            ignore_ragdoll_scale: false,
            depth: None,
            inherit_limb_depth: false,
            depth_limb: None,
            rotation: 0.0,
            hide_limb: false,
            hide_other_wearables: false,
            hide_wearables_of_type: Vec::new(),
        }
    }
}

impl WearableSprite {
    pub(crate) fn describe(&self) -> String {
        match &self.limb {
            Some(limb) => format!("wearable '{}' on {limb}", self.name),
            None => format!("wearable '{}'", self.name),
        }
    }
}

/// Attachment buckets keyed by type, each in authored order.
pub type AttachmentBuckets = BTreeMap<WearableType, Vec<Attachment>>;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Everything the loader hands over for one character.
pub struct RigDocument {
    /// Limb records.
    pub limbs: Vec<Limb>,
    /// Joint records; a joint's index is its [`JointId`].
    #[serde(default)]
    pub joints: Vec<Joint>,
    /// Head attachment buckets.
    #[serde(default)]
    pub attachments: AttachmentBuckets,
    /// Wearables currently equipped.
    #[serde(default)]
    pub wearables: Vec<WearableSprite>,
}

impl RigDocument {
    /// Parse a document from JSON.
    pub fn from_json_str(s: &str) -> RigResult<Self> {
        serde_json::from_str(s).map_err(|e| RigError::serde(e.to_string()))
    }

    /// Read a document from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> RigResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            RigError::Other(anyhow::anyhow!("read rig document '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    /// Look up an attachment by bucket and id.
    pub fn attachment(&self, kind: &WearableType, id: AttachmentId) -> Option<&Attachment> {
        self.attachments.get(kind)?.iter().find(|a| a.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rig/model.rs"]
mod tests;
