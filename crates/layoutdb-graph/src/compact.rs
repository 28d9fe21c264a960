//! Compaction: a resolved design to a tree that serializes safely.
//!
//! # Overview
//!
//! [`compact`] borrows a resolved [`Design`] and builds an independent copy
//! in which no reference is full. Each reference field is rewritten by the
//! kind of edge it is:
//!
//! - **Owning** (the design's top-level collections): every record is
//!   copied. This is the only place complete records live.
//! - **Back** (`Pin.instance`, `Pin.net`): dropped. Readers re-associate a
//!   pin with its owner through the owner's pin list.
//! - **Sibling** (layer adjacency, via layers, rect and grid links, edge
//!   via and layer): identifier-only stubs. `Row.site` is the one *named*
//!   stub and keeps the site name for display.
//! - **Listing** (`Instance.pins`, `Net.pins`) and geometry lists:
//!   identifier-only stubs, since the full pins and geometries already sit
//!   at the top level.
//!
//! Points, rects, geometries and grids are copied by value; the resolved
//! design is left untouched and stays usable.
//!
//! # Example
//!
//! ```
//! use layoutdb_core::{
//!     design::{RawDesign, Regions},
//!     entity::{Net, Pin},
//!     id::EntityId,
//!     reference::Ref,
//! };
//! use layoutdb_graph::{compact::compact, resolve::{resolve, ResolveOptions}};
//!
//! let mut raw = RawDesign::named("top", Regions::default());
//! raw.nets.push(Net::new(EntityId::from_raw(1), "n1").with_pins(vec![Ref::stub(EntityId::from_raw(2))]));
//! raw.block_pins.push(Pin::block(EntityId::from_raw(2), "in").with_net(Ref::stub(EntityId::from_raw(1))));
//!
//! let resolved = resolve(&raw, ResolveOptions::default())?;
//! let compacted = compact(&resolved);
//!
//! assert!(compacted.design().block_pins[0].net.is_none());
//! assert!(compacted.design().nets[0].pins[0].is_stub());
//! # Ok::<(), layoutdb_graph::error::GraphError>(())
//! ```

use log::{debug, info};
use serde::Serialize;

use layoutdb_core::{
    design::{Design, Regions},
    entity::{Edge, Instance, Layer, Net, Pin, Row, Via},
    geometry::{Geometry, Grid, Rect},
    reference::{Entity, Ref},
};

use crate::depth::reference_depth;

/// A compacted design: a tree with no full references.
///
/// Only [`compact`] produces one, and it cannot be mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CompactDesign(Design);

impl CompactDesign {
    /// Borrows the compacted design.
    pub fn design(&self) -> &Design {
        &self.0
    }

    /// Unwraps the compacted design.
    pub fn into_inner(self) -> Design {
        self.0
    }
}

/// Builds the compacted tree of a resolved design.
pub fn compact(design: &Design) -> CompactDesign {
    info!(design = design.name.as_str(); "Compacting design");

    let compacted = Design {
        name: design.name.clone(),
        instances: design.instances.iter().map(compact_instance).collect(),
        nets: design.nets.iter().map(compact_net).collect(),
        instance_pins: design.instance_pins.iter().map(compact_pin).collect(),
        block_pins: design.block_pins.iter().map(compact_pin).collect(),
        routing_vias: design.routing_vias.iter().map(compact_via).collect(),
        via_definitions: design.via_definitions.iter().map(compact_via).collect(),
        layers: design.layers.iter().map(compact_layer).collect(),
        rows: design.rows.iter().map(compact_row).collect(),
        tracks: design.tracks.iter().map(compact_grid).collect(),
        sites: design.sites.clone(),
        geometries: design.geometries.iter().map(compact_geometry).collect(),
        gcell: design.gcell.as_ref().map(compact_grid),
        metrics: design.metrics,
        regions: Regions {
            bounding_box: compact_rect(&design.regions.bounding_box),
            core: compact_rect(&design.regions.core),
            die: compact_rect(&design.regions.die),
        },
    };

    debug_assert_eq!(reference_depth(&compacted), 0);
    debug!(records = compacted.counts().total(); "Design compacted");
    CompactDesign(compacted)
}

fn stub<T: Entity>(reference: &Ref<T>) -> Ref<T> {
    reference.to_stub()
}

fn stubs<T: Entity>(references: &[Ref<T>]) -> Vec<Ref<T>> {
    references.iter().map(Ref::to_stub).collect()
}

fn compact_rect(rect: &Rect) -> Rect {
    Rect {
        layer: rect.layer.as_ref().map(stub),
        via: rect.via.as_ref().map(stub),
        ..rect.clone()
    }
}

fn compact_geometry(geometry: &Geometry) -> Geometry {
    Geometry {
        id: geometry.id,
        boxes: geometry.boxes.iter().map(compact_rect).collect(),
    }
}

fn compact_grid(grid: &Grid) -> Grid {
    Grid {
        layer: grid.layer.as_ref().map(stub),
        ..grid.clone()
    }
}

fn compact_instance(instance: &Instance) -> Instance {
    Instance {
        pins: stubs(&instance.pins),
        bounding_box: instance.bounding_box.as_ref().map(compact_rect),
        halo: instance.halo.as_ref().map(compact_rect),
        obstructions: instance.obstructions.as_ref().map(stub),
        ..instance.clone()
    }
}

fn compact_pin(pin: &Pin) -> Pin {
    Pin {
        instance: None,
        net: None,
        geometries: stubs(&pin.geometries),
        ..pin.clone()
    }
}

fn compact_edge(edge: &Edge) -> Edge {
    Edge {
        kind: edge.kind,
        rect: edge.rect.as_ref().map(compact_rect),
        via: edge.via.as_ref().map(stub),
        layer: edge.layer.as_ref().map(stub),
    }
}

fn compact_net(net: &Net) -> Net {
    Net {
        pins: stubs(&net.pins),
        edges: net.edges.iter().map(compact_edge).collect(),
        special_boxes: stubs(&net.special_boxes),
        ..net.clone()
    }
}

fn compact_layer(layer: &Layer) -> Layer {
    Layer {
        upper_layer: layer.upper_layer.as_ref().map(stub),
        lower_layer: layer.lower_layer.as_ref().map(stub),
        ..layer.clone()
    }
}

fn compact_via(via: &Via) -> Via {
    Via {
        rect: via.rect.as_ref().map(compact_rect),
        top_layer: via.top_layer.as_ref().map(stub),
        cut_layer: via.cut_layer.as_ref().map(stub),
        bottom_layer: via.bottom_layer.as_ref().map(stub),
        ..via.clone()
    }
}

fn compact_row(row: &Row) -> Row {
    Row {
        site: row.site.as_ref().map(Ref::to_named_stub),
        bounding_box: row.bounding_box.as_ref().map(compact_rect),
        ..row.clone()
    }
}

#[cfg(test)]
mod tests {
    use layoutdb_core::{id::EntityId, reference::Stub};

    use super::*;
    use crate::{
        fixtures::{design_link_keys, id, sample},
        resolve::{ResolveOptions, resolve},
    };

    fn resolved() -> Design {
        resolve(&sample(), ResolveOptions::default()).unwrap()
    }

    #[test]
    fn test_no_full_reference_survives() {
        let design = resolved();
        assert!(reference_depth(&design) > 0);
        assert_eq!(reference_depth(compact(&design).design()), 0);
    }

    #[test]
    fn test_back_edges_are_dropped() {
        let compacted = compact(&resolved());
        let design = compacted.design();

        for pin in design.instance_pins.iter().chain(&design.block_pins) {
            assert!(pin.instance.is_none(), "pin {} keeps its instance", pin.id);
            assert!(pin.net.is_none(), "pin {} keeps its net", pin.id);
        }
    }

    #[test]
    fn test_listing_edges_are_identifier_only() {
        let compacted = compact(&resolved());
        let net = &compacted.design().nets[0];

        let ids: Vec<_> = net.pins.iter().map(Ref::id).collect();
        assert_eq!(ids, vec![id(1), id(4)]);
        for pin in &net.pins {
            assert_eq!(pin.as_stub().and_then(Stub::label), None);
        }
    }

    #[test]
    fn test_row_site_is_a_named_stub() {
        let compacted = compact(&resolved());
        let site = compacted.design().rows[0].site.as_ref().unwrap();

        let stub = site.as_stub().unwrap();
        assert_eq!(stub.id(), id(1));
        assert_eq!(stub.label(), Some("core"));
    }

    #[test]
    fn test_sibling_edges_are_stubs() {
        let compacted = compact(&resolved());
        let design = compacted.design();

        let layer = &design.layers[1];
        assert!(layer.upper_layer.as_ref().unwrap().is_stub());
        assert!(layer.lower_layer.as_ref().unwrap().is_stub());
        let via = &design.routing_vias[0];
        assert!(via.top_layer.as_ref().unwrap().is_stub());
        assert_eq!(via.cut_layer.as_ref().unwrap().id(), id(2));
        assert!(design.tracks[0].layer.as_ref().unwrap().is_stub());
        assert!(design.nets[0].edges[1].via.as_ref().unwrap().is_stub());
    }

    #[test]
    fn test_every_kept_reference_keeps_its_key() {
        let design = resolved();
        let compacted = compact(&design);

        let mut expected = design.clone();
        for pin in expected.instance_pins.iter_mut().chain(&mut expected.block_pins) {
            pin.instance = None;
            pin.net = None;
        }
        assert_eq!(design_link_keys(compacted.design()), design_link_keys(&expected));
    }

    #[test]
    fn test_geometry_lists_become_stubs() {
        let compacted = compact(&resolved());
        let design = compacted.design();

        assert!(design.instance_pins[0].geometries[0].is_stub());
        assert_eq!(design.geometries.len(), 2);
        assert_eq!(design.geometries[0].boxes.len(), 1);
    }

    #[test]
    fn test_compaction_leaves_resolved_design_untouched() {
        let design = resolved();
        let before = design.clone();

        let compacted = compact(&design);
        assert_eq!(design, before);

        let mut owned = compacted.into_inner();
        owned.geometries[0].boxes[0].x_max = 9999;
        owned.regions.core.y_min = -1;
        owned.instances[0].bounding_box.as_mut().unwrap().x_min = -5;

        assert_eq!(design.geometries[0].boxes[0].x_max, 104);
        assert_eq!(design.regions.core.y_min, 100);
        assert_eq!(design.instances[0].bounding_box.as_ref().unwrap().x_min, 100);
    }

    #[test]
    fn test_compacted_tree_serializes() {
        let compacted = compact(&resolved());
        let json = serde_json::to_value(&compacted).unwrap();

        assert_eq!(json["Name"], "top");
        assert_eq!(json["Instances"].as_array().unwrap().len(), 3);
        assert_eq!(json["Nets"][0]["Pins"][0], serde_json::json!({"ID": 1, "InComplete": true}));
        assert_eq!(json["Rows"][0]["Site"]["Name"], "core");
        assert!(json["InstancePins"][0].get("Net").is_none());
    }

    #[test]
    fn test_empty_design_serializes_empty_collections() {
        let raw = layoutdb_core::design::RawDesign::named("empty", crate::fixtures::regions());
        let compacted = compact(&resolve(&raw, ResolveOptions::default()).unwrap());
        let json = serde_json::to_value(&compacted).unwrap();

        assert_eq!(json["Nets"], serde_json::json!([]));
        assert_eq!(json["Instances"], serde_json::json!([]));
    }

    #[test]
    fn test_missing_marker_survives_compaction() {
        let mut design = resolved();
        design.layers[0].upper_layer = Some(Ref::Stub(Stub::missing(EntityId::from_raw(77))));

        let compacted = compact(&design);
        let upper = compacted.design().layers[0].upper_layer.as_ref().unwrap();
        assert!(upper.as_stub().unwrap().is_dangling());
    }
}
