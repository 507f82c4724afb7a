use super::*;

#[test]
fn fnv_matches_reference_vectors() {
    let mut empty = Fnv1a64::with_seed(Fnv1a64::OFFSET_BASIS);
    empty.update(b"");
    assert_eq!(empty.value(), 0xcbf2_9ce4_8422_2325);

    let mut a = Fnv1a64::with_seed(Fnv1a64::OFFSET_BASIS);
    a.update(b"a");
    assert_eq!(a.value(), 0xaf63_dc4c_8601_ec8c);
}

#[test]
fn fnv_is_incremental() {
    let mut whole = Fnv1a64::with_seed(Fnv1a64::OFFSET_BASIS);
    whole.update(b"rigweave");
    let mut split = Fnv1a64::with_seed(Fnv1a64::OFFSET_BASIS);
    split.update(b"rig");
    split.update(b"weave");
    assert_eq!(whole.value(), split.value());
}

#[test]
fn depth_to_z_rounds_and_inverts() {
    assert_eq!(depth_to_z(0.0), 1000);
    assert_eq!(depth_to_z(1.0), 0);
    assert_eq!(depth_to_z(0.5), 500);
    assert_eq!(depth_to_z(0.1234), 877);
    assert!(depth_to_z(0.1) > depth_to_z(0.2));
}

#[test]
fn overlay_z_saturates_on_extreme_depth() {
    assert_eq!(overlay_z(0.2, 7), 807);
    assert_eq!(overlay_z(-3.0e6, 7), i32::MAX);
    assert_eq!(overlay_z(3.0e6, 7), i32::MIN + 7);
}

#[test]
fn finite_vec_rejects_nan_and_inf() {
    assert!(is_finite_vec(kurbo::Vec2::new(0.5, 0.5)));
    assert!(!is_finite_vec(kurbo::Vec2::new(f64::NAN, 0.5)));
    assert!(!is_finite_vec(kurbo::Vec2::new(0.5, f64::NEG_INFINITY)));
}
