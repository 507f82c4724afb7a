use super::*;

#[test]
fn source_rect_wellformedness() {
    assert!(SourceRect::new(0.0, 0.0, 128.0, 128.0).is_well_formed());
    assert!(!SourceRect::new(0.0, 0.0, 0.0, 128.0).is_well_formed());
    assert!(!SourceRect::new(0.0, 0.0, -4.0, 128.0).is_well_formed());
    assert!(!SourceRect::new(f64::NAN, 0.0, 4.0, 4.0).is_well_formed());
    assert!(!SourceRect::new(0.0, 0.0, 4.0, f64::INFINITY).is_well_formed());
}

#[test]
fn sheet_cell_multiplies_index_by_cell_size() {
    let r = SourceRect::from_sheet_cell(SheetIndex { col: 2, row: 1 }, Vec2::new(64.0, 96.0));
    assert_eq!(r, SourceRect::new(128.0, 96.0, 64.0, 96.0));
}

#[test]
fn source_rect_serializes_as_array() {
    let r = SourceRect::new(1.0, 2.0, 3.0, 4.0);
    let s = serde_json::to_string(&r).unwrap();
    assert_eq!(s, "[1.0,2.0,3.0,4.0]");
    let de: SourceRect = serde_json::from_str("[0, 0, 128, 64]").unwrap();
    assert_eq!(de, SourceRect::new(0.0, 0.0, 128.0, 64.0));
}

#[test]
fn placement_maps_origin_to_translation() {
    let rect = SourceRect::new(0.0, 0.0, 40.0, 20.0);
    let p = Placement {
        translation: Vec2::new(100.0, 50.0),
        rotation_deg: 90.0,
        scale: 2.0,
        origin: Vec2::new(0.5, 0.5),
    };
    let pivot_world = p.to_affine(rect) * Point::new(20.0, 10.0);
    assert!((pivot_world.x - 100.0).abs() < 1e-9);
    assert!((pivot_world.y - 50.0).abs() < 1e-9);
}

#[test]
fn default_placement_is_identity_at_top_left_origin() {
    let p = Placement {
        origin: Vec2::ZERO,
        ..Placement::default()
    };
    assert_eq!(
        p.to_affine(SourceRect::new(0.0, 0.0, 8.0, 8.0)),
        Affine::IDENTITY
    );
}
