//! End-to-end resolve-then-compact over a small parser-shaped design.

use layoutdb_core::{
    design::{RawDesign, Regions},
    entity::{Instance, Net, Pin},
    geometry::Rect,
    id::{Category, EntityId, Key},
    reference::Ref,
};
use layoutdb_graph::{
    DanglingPolicy, DuplicatePolicy, GraphError, ResolveOptions,
    analysis::{LinkFilter, ReferenceGraph},
    compact,
    depth::reference_depth,
    resolve,
};

fn id(raw: u32) -> EntityId {
    EntityId::from_raw(raw)
}

fn regions() -> Regions {
    Regions {
        bounding_box: Rect::new(id(100), 0, 0, 50, 50),
        core: Rect::new(id(101), 5, 5, 45, 45),
        die: Rect::new(id(102), 0, 0, 50, 50),
    }
}

/// Instances I1..I3, nets N1 and N2, instance-pins P1..P3 and block-pins
/// P4 and P5. N1 connects P1 (on I1) with P4.
fn scenario() -> RawDesign {
    let mut raw = RawDesign::named("scenario", regions());

    raw.instances = vec![
        Instance::new(id(1), "I1").with_pins(vec![Ref::stub(id(1))]),
        Instance::new(id(2), "I2").with_pins(vec![Ref::stub(id(2))]),
        Instance::new(id(3), "I3").with_pins(vec![Ref::stub(id(3))]),
    ];
    raw.instance_pins = vec![
        Pin::new(id(1), "P1")
            .with_instance(Ref::stub(id(1)))
            .with_net(Ref::stub(id(1))),
        Pin::new(id(2), "P2")
            .with_instance(Ref::stub(id(2)))
            .with_net(Ref::stub(id(2))),
        Pin::new(id(3), "P3")
            .with_instance(Ref::stub(id(3)))
            .with_net(Ref::stub(id(2))),
    ];
    raw.block_pins = vec![
        Pin::block(id(4), "P4").with_net(Ref::stub(id(1))),
        Pin::block(id(5), "P5"),
    ];
    raw.nets = vec![
        Net::new(id(1), "N1").with_pins(vec![Ref::stub(id(1)), Ref::stub(id(4))]),
        Net::new(id(2), "N2").with_pins(vec![Ref::stub(id(2)), Ref::stub(id(3))]),
    ];
    raw
}

#[test]
fn test_scenario_resolve_then_compact() {
    let resolved = resolve(&scenario(), ResolveOptions::default()).unwrap();
    let compacted = compact(&resolved);
    let design = compacted.design();

    assert_eq!(design.instances.len(), 3);
    assert_eq!(design.nets.len(), 2);
    assert_eq!(design.instance_pins.len(), 3);
    assert_eq!(design.block_pins.len(), 2);

    let n1 = &design.nets[0];
    assert_eq!(n1.name, "N1");
    let pin_ids: Vec<_> = n1.pins.iter().map(Ref::id).collect();
    assert_eq!(pin_ids, vec![id(1), id(4)]);
    for pin in &n1.pins {
        let stub = pin.as_stub().expect("net pins are stubs");
        assert_eq!(stub.label(), None);
    }

    let graph = ReferenceGraph::new(design, LinkFilter::All);
    assert!(graph.referrers(Key::new(Category::Net, id(1))).is_empty());
    assert_eq!(reference_depth(design), 0);
}

#[test]
fn test_scenario_serializes_without_cycles() {
    let resolved = resolve(&scenario(), ResolveOptions::default()).unwrap();
    assert!(ReferenceGraph::new(&resolved, LinkFilter::FullOnly).is_cyclic());

    let json = serde_json::to_value(compact(&resolved)).unwrap();
    assert_eq!(json["Nets"][0]["Pins"].as_array().unwrap().len(), 2);
    for pin in json["InstancePins"].as_array().unwrap() {
        assert!(pin.get("Net").is_none());
        assert!(pin.get("Instance").is_none());
    }
    assert!(json["BlockPins"][0].get("Net").is_none());
}

#[test]
fn test_scenario_shared_pin_space_collision() {
    let mut raw = scenario();
    raw.block_pins[0].id = id(1);
    raw.nets[0].pins[1] = Ref::stub(id(1));

    let err = resolve(&raw, ResolveOptions::default()).unwrap_err();
    assert_eq!(
        err,
        GraphError::DuplicateIdentifier {
            key: Key::new(Category::Pin, id(1))
        }
    );

    let options = ResolveOptions::default().with_duplicate_policy(DuplicatePolicy::LastWins);
    let resolved = resolve(&raw, options).unwrap();
    let winner = resolved.nets[0].pins[0].as_full().unwrap();
    assert!(winner.is_block);
}

#[test]
fn test_scenario_dangling_net_policies() {
    let mut raw = scenario();
    raw.nets.remove(1);

    let err = resolve(&raw, ResolveOptions::default()).unwrap_err();
    assert!(matches!(err, GraphError::DanglingReference { key, .. } if key == Key::new(Category::Net, id(2))));

    let options = ResolveOptions::default().with_dangling_policy(DanglingPolicy::MarkMissing);
    let compacted = compact(&resolve(&raw, options).unwrap());
    assert_eq!(compacted.design().nets.len(), 1);
}
