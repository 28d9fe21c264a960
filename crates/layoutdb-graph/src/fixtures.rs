//! Parser-shaped sample designs shared by unit tests.

use layoutdb_core::{
    design::{Design, DesignMetrics, RawDesign, Regions},
    entity::{Edge, Instance, Layer, Net, Pin, Row, Site, Via},
    geometry::{Geometry, Grid, GridPattern, Rect},
    id::{EntityId, Key},
    kinds::{EdgeKind, LayerKind},
    reference::{Linked, Ref},
};

pub(crate) fn id(raw: u32) -> EntityId {
    EntityId::from_raw(raw)
}

pub(crate) fn regions() -> Regions {
    Regions {
        bounding_box: Rect::new(id(900), 0, 0, 1000, 1000),
        core: Rect::new(id(901), 100, 100, 900, 900),
        die: Rect::new(id(902), 0, 0, 1000, 1000),
    }
}

/// Three instances, two nets, three instance-pins and two block-pins.
///
/// Net `N1` (id 1) connects pin `P1` (id 1, on instance `I1`) and block pin
/// `P4` (id 4). Net `N2` (id 2) connects `P2` and `P3`. Geometry 2 is both
/// the obstruction of `I3` and a special box of `N2`. Every cross-record
/// field is a stub, as the parser emits it.
pub(crate) fn sample() -> RawDesign {
    let mut raw = RawDesign::named("top", regions());
    raw.metrics = DesignMetrics::from_areas(640_000.0, 1_000_000.0, 160_000.0);

    raw.layers = vec![
        Layer::new(id(1), "metal1")
            .with_kind(LayerKind::Routing)
            .with_upper_layer(Ref::stub(id(2))),
        Layer::new(id(2), "via1")
            .with_kind(LayerKind::Cut)
            .with_upper_layer(Ref::stub(id(3)))
            .with_lower_layer(Ref::stub(id(1))),
        Layer::new(id(3), "metal2")
            .with_kind(LayerKind::Routing)
            .with_lower_layer(Ref::stub(id(2))),
    ];

    raw.routing_vias = vec![
        Via::new(id(1), "via1_r")
            .with_layers(Ref::stub(id(3)), Ref::stub(id(2)), Ref::stub(id(1)))
            .with_rect(Rect::new(id(500), 0, 0, 4, 4).with_layer(Ref::stub(id(2)))),
    ];
    raw.via_definitions = vec![
        Via::new(id(2), "VIA12_DEF").with_layers(
            Ref::stub(id(3)),
            Ref::stub(id(2)),
            Ref::stub(id(1)),
        ),
    ];

    raw.instances = vec![
        Instance::new(id(1), "I1")
            .with_master("NAND2")
            .with_pins(vec![Ref::stub(id(1)), Ref::stub(id(2))])
            .with_bounding_box(Rect::new(id(600), 100, 100, 140, 120)),
        Instance::new(id(2), "I2")
            .with_master("INV")
            .with_pins(vec![Ref::stub(id(3))]),
        Instance::new(id(3), "I3")
            .with_master("FILL")
            .with_obstructions(Ref::stub(id(2))),
    ];

    raw.instance_pins = vec![
        Pin::new(id(1), "A")
            .with_instance(Ref::stub(id(1)))
            .with_net(Ref::stub(id(1)))
            .with_geometries(vec![Ref::stub(id(1))]),
        Pin::new(id(2), "Y")
            .with_instance(Ref::stub(id(1)))
            .with_net(Ref::stub(id(2))),
        Pin::new(id(3), "A")
            .with_instance(Ref::stub(id(2)))
            .with_net(Ref::stub(id(2))),
    ];
    raw.block_pins = vec![
        Pin::block(id(4), "in").with_net(Ref::stub(id(1))),
        Pin::block(id(5), "spare"),
    ];

    raw.nets = vec![
        Net::new(id(1), "N1")
            .with_pins(vec![Ref::stub(id(1)), Ref::stub(id(4))])
            .with_edges(vec![
                Edge::new(EdgeKind::Segment)
                    .with_rect(Rect::new(id(700), 100, 110, 300, 112))
                    .with_layer(Ref::stub(id(1))),
                Edge::new(EdgeKind::Via).with_via(Ref::stub(id(1))),
            ]),
        Net::new(id(2), "N2").with_pins(vec![Ref::stub(id(2)), Ref::stub(id(3))]),
    ];
    raw.nets[1].special_boxes = vec![Ref::stub(id(2))];

    raw.sites = vec![Site::new(id(1), "core")];
    raw.rows = vec![
        Row::new(id(1), "ROW_0")
            .with_site(Ref::stub(id(1)))
            .with_bounding_box(Rect::new(id(800), 100, 100, 900, 110)),
    ];

    let mut track = Grid::new(id(1)).with_layer(Ref::stub(id(1)));
    track.push_x_pattern(GridPattern {
        origin: 100,
        line_count: 40,
        step: 20,
    });
    raw.tracks = vec![track];

    let mut gcell = Grid::new(id(2)).with_layer(Ref::stub(id(3)));
    gcell.grid_x = vec![0, 500, 1000];
    raw.gcell = Some(gcell);

    raw.geometries = vec![
        Geometry::new(
            id(1),
            vec![Rect::new(id(400), 100, 100, 104, 104).with_layer(Ref::stub(id(1)))],
        ),
        Geometry::new(
            id(2),
            vec![Rect::new(id(401), 0, 0, 1000, 2).with_layer(Ref::stub(id(3)))],
        ),
    ];

    raw
}

/// Keys of every reference each record holds, record by record, in the
/// order [`Design::visit_records`] walks the collections.
pub(crate) fn design_link_keys(design: &Design) -> Vec<Vec<Key>> {
    let mut keys = Vec::new();
    design.visit_records(&mut |record| keys.push(record_link_keys(record)));
    keys
}

/// Same walk as [`design_link_keys`] over parser output.
pub(crate) fn raw_link_keys(raw: &RawDesign) -> Vec<Vec<Key>> {
    let mut keys = Vec::new();
    push_link_keys(&mut keys, &raw.instances);
    push_link_keys(&mut keys, &raw.nets);
    push_link_keys(&mut keys, &raw.instance_pins);
    push_link_keys(&mut keys, &raw.block_pins);
    push_link_keys(&mut keys, &raw.routing_vias);
    push_link_keys(&mut keys, &raw.via_definitions);
    push_link_keys(&mut keys, &raw.layers);
    push_link_keys(&mut keys, &raw.rows);
    push_link_keys(&mut keys, &raw.tracks);
    push_link_keys(&mut keys, &raw.sites);
    push_link_keys(&mut keys, &raw.geometries);
    push_link_keys(&mut keys, raw.gcell.as_slice());
    for region in [&raw.bounding_box, &raw.core, &raw.die].into_iter().flatten() {
        keys.push(record_link_keys(region));
    }
    keys
}

fn push_link_keys<T: Linked>(keys: &mut Vec<Vec<Key>>, records: &[T]) {
    keys.extend(records.iter().map(|record| record_link_keys(record)));
}

fn record_link_keys(record: &dyn Linked) -> Vec<Key> {
    let mut keys = Vec::new();
    record.visit_links(&mut |link| keys.push(link.key()));
    keys
}
