use super::*;
use crate::compose::compositor::LayerKind;
use crate::foundation::core::{Point, SourceRect, Vec2};
use crate::rig::model::{Attachment, AttachmentBuckets, Joint, Limb, LimbId, LimbType};

fn limb(id: u32, limb_type: LimbType, depth: f64) -> Limb {
    Limb {
        id: LimbId(id),
        name: limb_type.to_string(),
        limb_type,
        texture: "body.png".to_string(),
        source_rect: SourceRect::new(0.0, 0.0, 32.0, 32.0),
        origin: Vec2::new(0.5, 0.5),
        depth,
        scale: 1.0,
        rotation: 0.0,
        position: Point::ORIGIN,
        head: None,
    }
}

fn hair(id: u32, tag: &str) -> Attachment {
    Attachment {
        id: AttachmentId(id),
        name: format!("hair{id}"),
        texture: Some("hair.png".to_string()),
        source_rect: Some(SourceRect::new(0.0, 0.0, 16.0, 16.0)),
        sheet_index: None,
        base_size: None,
        origin: None,
        tags: vec![tag.to_string()],
    }
}

fn document() -> RigDocument {
    let mut attachments = AttachmentBuckets::new();
    attachments.insert(WearableType::Hair, vec![hair(1, "female"), hair(2, "male")]);
    RigDocument {
        limbs: vec![limb(0, LimbType::Torso, 0.5), limb(1, LimbType::Head, 0.2)],
        joints: vec![Joint {
            limb1: LimbId(0),
            limb2: LimbId(1),
            limb1_anchor: Vec2::new(0.0, 10.0),
            limb2_anchor: Vec2::new(0.0, -5.0),
        }],
        attachments,
        wearables: vec![],
    }
}

fn hair_layers(state: &RigState) -> Vec<String> {
    state
        .composite()
        .layers
        .iter()
        .filter(|l| matches!(l.kind, LayerKind::Attachment(_)))
        .map(|l| l.name.clone())
        .collect()
}

#[test]
fn load_runs_every_pass() {
    let s = RigState::load(document(), Gender::Female, RigSettings::default()).unwrap();
    assert!(s.load_error().is_none());
    assert_eq!(s.pose().len(), 2);
    assert_eq!(
        s.pose().get(LimbId(1)).unwrap().position,
        Point::new(400.0, 235.0)
    );
    assert_eq!(s.selection().get(&WearableType::Hair), Some(AttachmentId(1)));
    assert_eq!(hair_layers(&s), vec!["hair1"]);
    assert!(s.diagnostics().is_empty());
}

#[test]
fn missing_root_degrades_to_empty_rig() {
    let mut doc = document();
    doc.limbs.retain(|l| l.limb_type != LimbType::Torso);
    let s = RigState::load(doc, Gender::Male, RigSettings::default()).unwrap();
    assert!(s.graph().is_none());
    assert!(s.pose().is_empty());
    assert!(s.composite().layers.is_empty());
    assert!(s.load_error().unwrap().contains("missing root"));
    assert!(s.construct_one(JointId(0)).is_err());
}

#[test]
fn invalid_settings_are_rejected() {
    let settings = RigSettings {
        display_scale: -1.0,
        ..RigSettings::default()
    };
    assert!(RigState::load(document(), Gender::Male, settings).is_err());
}

#[test]
fn gender_switch_recomputes_defaults_without_carry_over() {
    let s = RigState::load(document(), Gender::Female, RigSettings::default()).unwrap();
    let s = s
        .select_attachment(WearableType::Hair, Some(AttachmentId(1)))
        .unwrap();
    let s = s.with_gender(Gender::Male);
    assert_eq!(s.gender(), Gender::Male);
    assert_eq!(s.selection().get(&WearableType::Hair), Some(AttachmentId(2)));
    assert_eq!(hair_layers(&s), vec!["hair2"]);
}

#[test]
fn explicit_selection_and_clearing() {
    let s = RigState::load(document(), Gender::Female, RigSettings::default()).unwrap();
    let s = s
        .select_attachment(WearableType::Hair, Some(AttachmentId(2)))
        .unwrap();
    assert_eq!(hair_layers(&s), vec!["hair2"]);
    let s = s.select_attachment(WearableType::Hair, None).unwrap();
    assert!(hair_layers(&s).is_empty());
    assert!(
        s.select_attachment(WearableType::Hair, Some(AttachmentId(77)))
            .is_err()
    );
}

#[test]
fn wearables_change_recomposites() {
    let s = RigState::load(document(), Gender::Female, RigSettings::default()).unwrap();
    let before = s.fingerprint();
    let cap = WearableSprite {
        name: "cap".to_string(),
        texture: Some("cap.png".to_string()),
        limb: Some(LimbType::Head),
        source_rect: Some(SourceRect::new(0.0, 0.0, 8.0, 8.0)),
        hide_wearables_of_type: vec!["hair".to_string()],
        ..WearableSprite::default()
    };
    let s = s.with_wearables(vec![cap]);
    assert_ne!(s.fingerprint(), before);
    assert!(hair_layers(&s).is_empty());
    assert_eq!(s.document().wearables.len(), 1);
}

#[test]
fn resolve_and_construct_are_deterministic() {
    let s = RigState::load(document(), Gender::Male, RigSettings::default()).unwrap();
    let fp = s.fingerprint();
    let s = s.resolve();
    assert_eq!(s.fingerprint(), fp);
    let s = s.construct_one(JointId(0)).unwrap();
    assert_eq!(s.fingerprint(), fp);
    let s = s.construct_all();
    assert_eq!(s.fingerprint(), fp);
}
