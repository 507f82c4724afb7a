use super::*;

#[test]
fn push_keeps_discovery_order() {
    let mut d = Diagnostics::new();
    assert!(d.is_empty());
    d.push(Anomaly::DisconnectedLimb { limb: LimbId(4) });
    d.push(Anomaly::DuplicateLimbId { limb: LimbId(1) });
    assert_eq!(d.len(), 2);
    assert_eq!(d.items()[0], Anomaly::DisconnectedLimb { limb: LimbId(4) });
    assert!(d.any(|a| matches!(a, Anomaly::DuplicateLimbId { .. })));
}

#[test]
fn extend_appends_other_pass() {
    let mut a = Diagnostics::new();
    a.push(Anomaly::DisconnectedLimb { limb: LimbId(1) });
    let mut b = Diagnostics::new();
    b.push(Anomaly::CyclicJoint {
        joint: JointId(0),
        limb: LimbId(2),
    });
    a.extend(b);
    assert_eq!(a.len(), 2);
    assert!(matches!(a.items()[1], Anomaly::CyclicJoint { .. }));
}

#[test]
fn messages_name_the_entity_and_field() {
    let a = Anomaly::MalformedAnchor {
        joint: JointId(3),
        field: "limb2_anchor",
    };
    let msg = a.to_string();
    assert!(msg.contains("joint 3"));
    assert!(msg.contains("limb2_anchor"));
}
