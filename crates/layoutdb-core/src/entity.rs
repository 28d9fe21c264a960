//! Identified records of a design database.
//!
//! # Overview
//!
//! - [`Instance`] - A placed master cell, listing its pins
//! - [`Pin`] - An instance pin or a top-level block pin
//! - [`Net`] - A connection between pins, with its routing [`Edge`]s
//! - [`Layer`] - A technology layer, linked to its neighbours
//! - [`Via`] - A routing via or via definition
//! - [`Row`] - A placement row built from a [`Site`]
//! - [`Site`] - A technology site
//!
//! Every cross-record field is a [`Ref`]: a stub as emitted by the parser,
//! a full record after resolution, and a stub again after compaction.
//!
//! # Examples
//!
//! ```
//! use layoutdb_core::{
//!     entity::{Instance, Pin},
//!     id::EntityId,
//!     reference::Ref,
//! };
//!
//! let pin = Pin::new(EntityId::from_raw(10), "A")
//!     .with_instance(Ref::stub(EntityId::from_raw(1)));
//! let inst = Instance::new(EntityId::from_raw(1), "u1")
//!     .with_pins(vec![Ref::stub(pin.id)]);
//!
//! assert_eq!(inst.pins[0].id(), pin.id);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Geometry, Point, Rect},
    id::{Category, EntityId},
    kinds::{
        Direction, EdgeKind, LayerKind, MasterType, Orientation, PinDirection, SignalType,
    },
    reference::{Entity, Link, Linked, Ref},
};

fn label_of(name: &str) -> Option<&str> {
    (!name.is_empty()).then_some(name)
}

/// A placed master cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Instance {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Point>,
    pub orientation: Orientation,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub master: String,
    pub pins: Vec<Ref<Pin>>,
    pub is_placed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halo: Option<Rect>,
    pub is_filler: bool,
    pub master_type: MasterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obstructions: Option<Ref<Geometry>>,
}

impl Instance {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_master(mut self, master: impl Into<String>) -> Self {
        self.master = master.into();
        self
    }

    pub fn with_pins(mut self, pins: Vec<Ref<Pin>>) -> Self {
        self.pins = pins;
        self
    }

    pub fn with_bounding_box(mut self, bounding_box: Rect) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    pub fn with_obstructions(mut self, obstructions: Ref<Geometry>) -> Self {
        self.obstructions = Some(obstructions);
        self
    }
}

impl Entity for Instance {
    const CATEGORY: Category = Category::Instance;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> Option<&str> {
        label_of(&self.name)
    }
}

impl Linked for Instance {
    fn visit_links<'a>(&'a self, visit: &mut dyn FnMut(Link<'a>)) {
        for pin in &self.pins {
            visit(pin.link());
        }
        for rect in self.bounding_box.iter().chain(&self.halo) {
            rect.visit_links(visit);
        }
        if let Some(obstructions) = &self.obstructions {
            visit(obstructions.link());
        }
    }
}

/// A pin of an instance, or a block pin of the design itself.
///
/// Block pins have no owning instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Pin {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<Ref<Instance>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<Ref<Net>>,
    pub direction: PinDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Point>,
    pub geometries: Vec<Ref<Geometry>>,
    pub signal_type: SignalType,
    pub is_block: bool,
    pub is_special: bool,
}

impl Pin {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a top-level block pin.
    pub fn block(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            is_block: true,
            ..Self::new(id, name)
        }
    }

    pub fn with_instance(mut self, instance: Ref<Instance>) -> Self {
        self.instance = Some(instance);
        self
    }

    pub fn with_net(mut self, net: Ref<Net>) -> Self {
        self.net = Some(net);
        self
    }

    pub fn with_geometries(mut self, geometries: Vec<Ref<Geometry>>) -> Self {
        self.geometries = geometries;
        self
    }
}

impl Entity for Pin {
    const CATEGORY: Category = Category::Pin;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> Option<&str> {
        label_of(&self.name)
    }
}

impl Linked for Pin {
    fn visit_links<'a>(&'a self, visit: &mut dyn FnMut(Link<'a>)) {
        if let Some(instance) = &self.instance {
            visit(instance.link());
        }
        if let Some(net) = &self.net {
            visit(net.link());
        }
        for geometry in &self.geometries {
            visit(geometry.link());
        }
    }
}

/// One decoded routing segment of a net. Edges have no identity of their
/// own and live inside their [`Net`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Edge {
    #[serde(rename = "Type")]
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<Ref<Via>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<Ref<Layer>>,
}

impl Edge {
    pub fn new(kind: EdgeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_via(mut self, via: Ref<Via>) -> Self {
        self.via = Some(via);
        self
    }

    pub fn with_layer(mut self, layer: Ref<Layer>) -> Self {
        self.layer = Some(layer);
        self
    }
}

impl Linked for Edge {
    fn visit_links<'a>(&'a self, visit: &mut dyn FnMut(Link<'a>)) {
        if let Some(rect) = &self.rect {
            rect.visit_links(visit);
        }
        if let Some(via) = &self.via {
            visit(via.link());
        }
        if let Some(layer) = &self.layer {
            visit(layer.link());
        }
    }
}

/// A signal or special net.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Net {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub is_special: bool,
    pub is_routed: bool,
    pub pins: Vec<Ref<Pin>>,
    pub edges: Vec<Edge>,
    pub special_boxes: Vec<Ref<Geometry>>,
}

impl Net {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_pins(mut self, pins: Vec<Ref<Pin>>) -> Self {
        self.pins = pins;
        self
    }

    pub fn with_edges(mut self, edges: Vec<Edge>) -> Self {
        self.edges = edges;
        self
    }
}

impl Entity for Net {
    const CATEGORY: Category = Category::Net;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> Option<&str> {
        label_of(&self.name)
    }
}

impl Linked for Net {
    fn visit_links<'a>(&'a self, visit: &mut dyn FnMut(Link<'a>)) {
        for pin in &self.pins {
            visit(pin.link());
        }
        for edge in &self.edges {
            edge.visit_links(visit);
        }
        for geometry in &self.special_boxes {
            visit(geometry.link());
        }
    }
}

/// A technology layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Layer {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alias: String,
    pub width: i32,
    pub spacing: i32,
    pub area: f64,
    #[serde(rename = "Type")]
    pub kind: LayerKind,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_layer: Option<Ref<Layer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_layer: Option<Ref<Layer>>,
}

impl Layer {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: LayerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_upper_layer(mut self, upper: Ref<Layer>) -> Self {
        self.upper_layer = Some(upper);
        self
    }

    pub fn with_lower_layer(mut self, lower: Ref<Layer>) -> Self {
        self.lower_layer = Some(lower);
        self
    }
}

impl Entity for Layer {
    const CATEGORY: Category = Category::Layer;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> Option<&str> {
        label_of(&self.name)
    }
}

impl Linked for Layer {
    fn visit_links<'a>(&'a self, visit: &mut dyn FnMut(Link<'a>)) {
        if let Some(upper) = &self.upper_layer {
            visit(upper.link());
        }
        if let Some(lower) = &self.lower_layer {
            visit(lower.link());
        }
    }
}

/// A routing via or a via definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Via {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_layer: Option<Ref<Layer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cut_layer: Option<Ref<Layer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_layer: Option<Ref<Layer>>,
    pub is_block: bool,
    pub is_tech: bool,
}

impl Via {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the top, cut and bottom layers (builder style).
    pub fn with_layers(mut self, top: Ref<Layer>, cut: Ref<Layer>, bottom: Ref<Layer>) -> Self {
        self.top_layer = Some(top);
        self.cut_layer = Some(cut);
        self.bottom_layer = Some(bottom);
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }
}

impl Entity for Via {
    const CATEGORY: Category = Category::Via;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> Option<&str> {
        label_of(&self.name)
    }
}

impl Linked for Via {
    fn visit_links<'a>(&'a self, visit: &mut dyn FnMut(Link<'a>)) {
        if let Some(rect) = &self.rect {
            rect.visit_links(visit);
        }
        for layer in [&self.top_layer, &self.cut_layer, &self.bottom_layer]
            .into_iter()
            .flatten()
        {
            visit(layer.link());
        }
    }
}

/// A placement row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Row {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<Ref<Site>>,
    pub direction: Direction,
    pub orientation: Orientation,
    pub origin_x: i32,
    pub origin_y: i32,
    pub spacing: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Rect>,
}

impl Row {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_site(mut self, site: Ref<Site>) -> Self {
        self.site = Some(site);
        self
    }

    pub fn with_bounding_box(mut self, bounding_box: Rect) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }
}

impl Entity for Row {
    const CATEGORY: Category = Category::Row;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> Option<&str> {
        label_of(&self.name)
    }
}

impl Linked for Row {
    fn visit_links<'a>(&'a self, visit: &mut dyn FnMut(Link<'a>)) {
        if let Some(site) = &self.site {
            visit(site.link());
        }
        if let Some(rect) = &self.bounding_box {
            rect.visit_links(visit);
        }
    }
}

/// A technology site. Leaf record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Site {
    #[serde(rename = "ID")]
    pub id: EntityId,
    pub name: String,
}

impl Site {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Entity for Site {
    const CATEGORY: Category = Category::Site;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> Option<&str> {
        label_of(&self.name)
    }
}

impl Linked for Site {
    fn visit_links<'a>(&'a self, _visit: &mut dyn FnMut(Link<'a>)) {}
}
