use super::*;
use crate::foundation::core::{Point, SheetIndex};
use crate::rig::model::{AttachmentId, HeadSheet, LimbId, LimbType};

fn limb(limb_type: LimbType, depth: f64) -> Limb {
    Limb {
        id: LimbId(1),
        limb_type,
        name: String::new(),
        texture: "limb.png".to_string(),
        source_rect: SourceRect::new(10.0, 20.0, 30.0, 40.0),
        origin: Vec2::new(0.25, 0.75),
        depth,
        scale: 1.5,
        rotation: 0.0,
        position: Point::ORIGIN,
        head: None,
    }
}

fn attachment() -> Attachment {
    Attachment {
        id: AttachmentId(4),
        name: "braid".to_string(),
        texture: None,
        source_rect: None,
        sheet_index: None,
        base_size: None,
        origin: None,
        tags: vec![],
    }
}

#[test]
fn modern_scale_with_and_without_inheritance() {
    let s = RigSettings::default();
    let mut w = WearableSprite {
        scale: 0.8,
        ..WearableSprite::default()
    };
    assert_eq!(wearable_scale(&w, 1.5, ScaleMode::Modern, &s), 0.8 * 2.0);

    w.inherit_scale = true;
    assert_eq!(
        wearable_scale(&w, 1.5, ScaleMode::Modern, &s),
        0.8 * 1.5 * 0.5 * 2.0
    );

    w.ignore_limb_scale = true;
    assert_eq!(wearable_scale(&w, 1.5, ScaleMode::Modern, &s), 0.8 * 0.5 * 2.0);

    w.ignore_ragdoll_scale = true;
    assert_eq!(wearable_scale(&w, 1.5, ScaleMode::Modern, &s), 0.8 * 2.0);
}

#[test]
fn legacy_scale_applies_limb_scale_unless_ignored() {
    let s = RigSettings::default();
    let mut w = WearableSprite {
        scale: 0.8,
        ..WearableSprite::default()
    };
    assert_eq!(wearable_scale(&w, 1.5, ScaleMode::Legacy, &s), 0.8 * 1.5 * 2.0);

    w.inherit_texture_scale = true;
    assert_eq!(
        wearable_scale(&w, 1.5, ScaleMode::Legacy, &s),
        0.8 * 1.0 * 0.5 * 1.5 * 2.0
    );

    w.ignore_ragdoll_scale = true;
    w.ignore_limb_scale = true;
    assert_eq!(wearable_scale(&w, 1.5, ScaleMode::Legacy, &s), 0.8 * 2.0);
}

#[test]
fn scale_modes_differ_for_the_same_wearable() {
    let s = RigSettings::default();
    let w = WearableSprite::default();
    assert_ne!(
        wearable_scale(&w, 3.0, ScaleMode::Legacy, &s),
        wearable_scale(&w, 3.0, ScaleMode::Modern, &s)
    );
    assert_eq!(ScaleMode::from_settings(&s), ScaleMode::Modern);
    let legacy = RigSettings {
        use_legacy_scale_logic: true,
        ..RigSettings::default()
    };
    assert_eq!(ScaleMode::from_settings(&legacy), ScaleMode::Legacy);
}

#[test]
fn source_rect_inherit_own_and_default() {
    let s = RigSettings::default();
    let l = limb(LimbType::Torso, 0.5);
    let mut d = Diagnostics::new();

    let mut w = WearableSprite {
        inherit_source_rect: true,
        source_rect: Some(SourceRect::new(1.0, 1.0, 1.0, 1.0)),
        ..WearableSprite::default()
    };
    assert_eq!(wearable_source_rect(&w, &l, &s, &mut d), l.source_rect);

    w.inherit_source_rect = false;
    assert_eq!(
        wearable_source_rect(&w, &l, &s, &mut d),
        SourceRect::new(1.0, 1.0, 1.0, 1.0)
    );
    assert!(d.is_empty());

    w.source_rect = None;
    assert_eq!(
        wearable_source_rect(&w, &l, &s, &mut d),
        SourceRect::new(0.0, 0.0, 128.0, 128.0)
    );
    assert_eq!(d.len(), 1);
}

#[test]
fn origin_inherit_own_default() {
    let s = RigSettings::default();
    let l = limb(LimbType::Torso, 0.5);
    let mut d = Diagnostics::new();
    let mut w = WearableSprite {
        inherit_origin: true,
        origin: Some(Vec2::new(0.1, 0.2)),
        ..WearableSprite::default()
    };
    assert_eq!(wearable_origin(&w, &l, &s, &mut d), Vec2::new(0.25, 0.75));
    w.inherit_origin = false;
    assert_eq!(wearable_origin(&w, &l, &s, &mut d), Vec2::new(0.1, 0.2));
    w.origin = None;
    assert_eq!(wearable_origin(&w, &l, &s, &mut d), Vec2::new(0.5, 0.5));
    w.origin = Some(Vec2::new(f64::NAN, 0.0));
    assert_eq!(wearable_origin(&w, &l, &s, &mut d), Vec2::new(0.5, 0.5));
    assert_eq!(d.len(), 1);
}

#[test]
fn depth_inherits_from_named_limb_or_target() {
    let s = RigSettings::default();
    let torso = limb(LimbType::Torso, 0.4);
    let head = limb(LimbType::Head, 0.2);
    let all = [torso.clone(), head.clone()];
    let mut d = Diagnostics::new();

    let mut w = WearableSprite {
        inherit_limb_depth: true,
        depth_limb: Some(LimbType::Head),
        depth: Some(0.9),
        ..WearableSprite::default()
    };
    assert_eq!(wearable_depth(&w, &torso, &all, &s, &mut d), 0.2 - 0.01);

    w.depth_limb = Some(LimbType::Tail);
    assert_eq!(wearable_depth(&w, &torso, &all, &s, &mut d), 0.4 - 0.01);

    w.inherit_limb_depth = false;
    assert_eq!(wearable_depth(&w, &torso, &all, &s, &mut d), 0.9);

    w.depth = None;
    assert_eq!(wearable_depth(&w, &torso, &all, &s, &mut d), 0.5);
    assert!(d.is_empty());
}

#[test]
fn rotation_is_subtracted_from_limb() {
    let w = WearableSprite {
        rotation: 15.0,
        ..WearableSprite::default()
    };
    assert_eq!(wearable_rotation(&w, 40.0), 25.0);
}

#[test]
fn texture_resolution() {
    let l = limb(LimbType::Torso, 0.5);
    let mut w = WearableSprite::default();
    assert_eq!(wearable_texture(&w, &l), None);
    w.texture = Some("  ".to_string());
    assert_eq!(wearable_texture(&w, &l), None);
    w.texture = Some("shirt.png".to_string());
    assert_eq!(wearable_texture(&w, &l), Some("shirt.png"));
    w.inherit_texture = true;
    assert_eq!(wearable_texture(&w, &l), Some("limb.png"));
}

#[test]
fn attachment_rect_from_sheet_uses_head_base_size() {
    let s = RigSettings::default();
    let mut head = limb(LimbType::Head, 0.1);
    head.head = Some(HeadSheet {
        sheet_index: SheetIndex { col: 0, row: 0 },
        base_size: [64.0, 64.0],
    });
    let mut a = attachment();
    a.sheet_index = Some(SheetIndex { col: 2, row: 3 });
    let mut d = Diagnostics::new();
    assert_eq!(
        attachment_source_rect(&a, &WearableType::Hair, &head, &s, &mut d),
        SourceRect::new(128.0, 192.0, 64.0, 64.0)
    );

    a.base_size = Some([10.0, 20.0]);
    assert_eq!(
        attachment_source_rect(&a, &WearableType::Hair, &head, &s, &mut d),
        SourceRect::new(20.0, 60.0, 10.0, 20.0)
    );

    a.sheet_index = None;
    a.source_rect = Some(SourceRect::new(5.0, 5.0, 5.0, 5.0));
    assert_eq!(
        attachment_source_rect(&a, &WearableType::Hair, &head, &s, &mut d),
        SourceRect::new(5.0, 5.0, 5.0, 5.0)
    );
    assert!(d.is_empty());
}

#[test]
fn attachment_sheet_cell_wins_over_explicit_rect() {
    let s = RigSettings::default();
    let head = limb(LimbType::Head, 0.1);
    let mut a = attachment();
    a.source_rect = Some(SourceRect::new(1.0, 2.0, 3.0, 4.0));
    a.sheet_index = Some(SheetIndex { col: 2, row: 1 });
    a.base_size = Some([10.0, 20.0]);
    let mut d = Diagnostics::new();
    assert_eq!(
        attachment_source_rect(&a, &WearableType::Hair, &head, &s, &mut d),
        SourceRect::new(20.0, 20.0, 10.0, 20.0)
    );
    assert!(d.is_empty());
}

#[test]
fn attachment_rect_uses_explicit_rect_when_sheet_has_no_cell_size() {
    let s = RigSettings::default();
    let head = limb(LimbType::Head, 0.1);
    let mut a = attachment();
    a.source_rect = Some(SourceRect::new(1.0, 2.0, 3.0, 4.0));
    a.sheet_index = Some(SheetIndex { col: 2, row: 1 });
    let mut d = Diagnostics::new();
    assert_eq!(
        attachment_source_rect(&a, &WearableType::Hair, &head, &s, &mut d),
        SourceRect::new(1.0, 2.0, 3.0, 4.0)
    );
}

#[test]
fn attachment_rect_falls_back_to_default() {
    let s = RigSettings::default();
    let head = limb(LimbType::Head, 0.1);
    let mut a = attachment();
    a.sheet_index = Some(SheetIndex { col: 1, row: 1 });
    let mut d = Diagnostics::new();
    assert_eq!(
        attachment_source_rect(&a, &WearableType::Beard, &head, &s, &mut d),
        s.default_source_rect
    );
    assert!(d.any(|x| matches!(x, Anomaly::MalformedRect { .. })));
}

#[test]
fn attachment_texture_and_origin() {
    let head = limb(LimbType::Head, 0.1);
    let mut a = attachment();
    assert_eq!(attachment_texture(&a, &head), None);
    a.sheet_index = Some(SheetIndex { col: 0, row: 0 });
    assert_eq!(attachment_texture(&a, &head), Some("limb.png"));
    a.texture = Some("hair.png".to_string());
    assert_eq!(attachment_texture(&a, &head), Some("hair.png"));

    let mut d = Diagnostics::new();
    assert_eq!(
        attachment_origin(&a, &WearableType::Hair, &head, &mut d),
        head.origin
    );
    a.origin = Some(Vec2::new(0.5, 1.0));
    assert_eq!(
        attachment_origin(&a, &WearableType::Hair, &head, &mut d),
        Vec2::new(0.5, 1.0)
    );
}
