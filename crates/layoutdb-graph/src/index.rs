//! Identity index: identifier to authoritative record, per identifier space.
//!
//! # Overview
//!
//! [`IdentityIndex::build`] walks the flat lists of a [`RawDesign`] once and
//! stores one [`Table`] per identifier space. Instance-pins and block-pins go
//! into the same pin table; routing vias and via definitions into the same
//! via table. Keys are typed ([`Key`] = category + identifier), so a pin and
//! a net with the same raw identifier never collide.
//!
//! Records are stored *detached*: any full reference a parser record carried
//! is downgraded to a stub before insertion. A lookup therefore always
//! returns a record whose own references are stubs, which is what bounds
//! resolution to a single hop.
//!
//! The index is built per invocation and never shared.

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, info, warn};

use layoutdb_core::{
    design::RawDesign,
    entity::{Edge, Instance, Layer, Net, Pin, Site, Via},
    geometry::{Geometry, Rect},
    id::{EntityId, Key},
    reference::{Entity, Ref},
};

use crate::{
    error::{GraphError, Result},
    policy::DuplicatePolicy,
};

/// Insertion-ordered map from identifier to a shared, immutable record.
#[derive(Debug, Clone)]
pub struct Table<T> {
    records: IndexMap<EntityId, Arc<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }
}

impl<T: Entity> Table<T> {
    fn insert(&mut self, record: T, policy: DuplicatePolicy) -> Result<()> {
        let key = record.key();
        if self.records.contains_key(&key.id()) {
            match policy {
                DuplicatePolicy::Reject => return Err(GraphError::DuplicateIdentifier { key }),
                DuplicatePolicy::LastWins => {
                    warn!(key:% = key; "Duplicate identifier, keeping the last record");
                }
            }
        }
        // `insert` keeps the original slot, so order stays first-seen.
        self.records.insert(key.id(), Arc::new(record));
        Ok(())
    }

    /// Returns the record with this identifier.
    pub fn get(&self, id: EntityId) -> Option<&Arc<T>> {
        self.records.get(&id)
    }

    /// Returns `true` if a record carries this identifier.
    pub fn contains(&self, id: EntityId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.records.values()
    }
}

/// Per-invocation index of every referable record.
#[derive(Debug, Clone, Default)]
pub struct IdentityIndex {
    instances: Table<Instance>,
    pins: Table<Pin>,
    nets: Table<Net>,
    layers: Table<Layer>,
    vias: Table<Via>,
    sites: Table<Site>,
    geometries: Table<Geometry>,
}

impl IdentityIndex {
    /// Builds the index from parser output.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateIdentifier`] when two records share an
    /// identifier space and identifier under [`DuplicatePolicy::Reject`].
    pub fn build(raw: &RawDesign, policy: DuplicatePolicy) -> Result<Self> {
        info!(policy:% = policy; "Building identity index");

        let mut index = Self::default();
        index.insert_all(&raw.instances, policy)?;
        index.insert_all(raw.instance_pins.iter().chain(&raw.block_pins), policy)?;
        index.insert_all(&raw.nets, policy)?;
        index.insert_all(&raw.layers, policy)?;
        index.insert_all(raw.routing_vias.iter().chain(&raw.via_definitions), policy)?;
        index.insert_all(&raw.sites, policy)?;
        index.insert_all(&raw.geometries, policy)?;

        debug!(
            instances = index.instances.len(),
            pins = index.pins.len(),
            nets = index.nets.len(),
            layers = index.layers.len(),
            vias = index.vias.len(),
            sites = index.sites.len(),
            geometries = index.geometries.len();
            "Identity index built"
        );
        Ok(index)
    }

    fn insert_all<'a, T, I>(&mut self, records: I, policy: DuplicatePolicy) -> Result<()>
    where
        T: Indexed + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let table = T::table_mut(self);
        for record in records {
            table.insert(record.detached(), policy)?;
        }
        Ok(())
    }

    /// Returns the table of one identifier space.
    pub fn table<T: Indexed>(&self) -> &Table<T> {
        T::table(self)
    }

    /// Returns the record with this identifier, if any.
    pub fn get<T: Indexed>(&self, id: EntityId) -> Option<&Arc<T>> {
        T::table(self).get(id)
    }

    /// Looks up the record `referrer` points to.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingReference`] when no record carries `id`.
    pub fn lookup<T: Indexed>(&self, id: EntityId, referrer: Key) -> Result<Arc<T>> {
        self.get::<T>(id)
            .cloned()
            .ok_or(GraphError::DanglingReference {
                key: Key::new(T::CATEGORY, id),
                referrer,
            })
    }
}

/// A record kind that has a table in the [`IdentityIndex`].
pub trait Indexed: Entity + Sized {
    fn table(index: &IdentityIndex) -> &Table<Self>;

    fn table_mut(index: &mut IdentityIndex) -> &mut Table<Self>;

    /// Returns a copy whose references are all stubs.
    fn detached(&self) -> Self;
}

fn detach<T: Entity>(reference: &Ref<T>) -> Ref<T> {
    match reference {
        Ref::Full(_) => reference.to_stub(),
        Ref::Stub(stub) => Ref::Stub(stub.clone()),
    }
}

fn detach_all<T: Entity>(references: &[Ref<T>]) -> Vec<Ref<T>> {
    references.iter().map(detach).collect()
}

pub(crate) fn detach_rect(rect: &Rect) -> Rect {
    Rect {
        layer: rect.layer.as_ref().map(detach),
        via: rect.via.as_ref().map(detach),
        ..rect.clone()
    }
}

pub(crate) fn detach_edge(edge: &Edge) -> Edge {
    Edge {
        kind: edge.kind,
        rect: edge.rect.as_ref().map(detach_rect),
        via: edge.via.as_ref().map(detach),
        layer: edge.layer.as_ref().map(detach),
    }
}

impl Indexed for Instance {
    fn table(index: &IdentityIndex) -> &Table<Self> {
        &index.instances
    }

    fn table_mut(index: &mut IdentityIndex) -> &mut Table<Self> {
        &mut index.instances
    }

    fn detached(&self) -> Self {
        Self {
            pins: detach_all(&self.pins),
            bounding_box: self.bounding_box.as_ref().map(detach_rect),
            halo: self.halo.as_ref().map(detach_rect),
            obstructions: self.obstructions.as_ref().map(detach),
            ..self.clone()
        }
    }
}

impl Indexed for Pin {
    fn table(index: &IdentityIndex) -> &Table<Self> {
        &index.pins
    }

    fn table_mut(index: &mut IdentityIndex) -> &mut Table<Self> {
        &mut index.pins
    }

    fn detached(&self) -> Self {
        Self {
            instance: self.instance.as_ref().map(detach),
            net: self.net.as_ref().map(detach),
            geometries: detach_all(&self.geometries),
            ..self.clone()
        }
    }
}

impl Indexed for Net {
    fn table(index: &IdentityIndex) -> &Table<Self> {
        &index.nets
    }

    fn table_mut(index: &mut IdentityIndex) -> &mut Table<Self> {
        &mut index.nets
    }

    fn detached(&self) -> Self {
        Self {
            pins: detach_all(&self.pins),
            edges: self.edges.iter().map(detach_edge).collect(),
            special_boxes: detach_all(&self.special_boxes),
            ..self.clone()
        }
    }
}

impl Indexed for Layer {
    fn table(index: &IdentityIndex) -> &Table<Self> {
        &index.layers
    }

    fn table_mut(index: &mut IdentityIndex) -> &mut Table<Self> {
        &mut index.layers
    }

    fn detached(&self) -> Self {
        Self {
            upper_layer: self.upper_layer.as_ref().map(detach),
            lower_layer: self.lower_layer.as_ref().map(detach),
            ..self.clone()
        }
    }
}

impl Indexed for Via {
    fn table(index: &IdentityIndex) -> &Table<Self> {
        &index.vias
    }

    fn table_mut(index: &mut IdentityIndex) -> &mut Table<Self> {
        &mut index.vias
    }

    fn detached(&self) -> Self {
        Self {
            rect: self.rect.as_ref().map(detach_rect),
            top_layer: self.top_layer.as_ref().map(detach),
            cut_layer: self.cut_layer.as_ref().map(detach),
            bottom_layer: self.bottom_layer.as_ref().map(detach),
            ..self.clone()
        }
    }
}

impl Indexed for Site {
    fn table(index: &IdentityIndex) -> &Table<Self> {
        &index.sites
    }

    fn table_mut(index: &mut IdentityIndex) -> &mut Table<Self> {
        &mut index.sites
    }

    fn detached(&self) -> Self {
        self.clone()
    }
}

impl Indexed for Geometry {
    fn table(index: &IdentityIndex) -> &Table<Self> {
        &index.geometries
    }

    fn table_mut(index: &mut IdentityIndex) -> &mut Table<Self> {
        &mut index.geometries
    }

    fn detached(&self) -> Self {
        Self {
            id: self.id,
            boxes: self.boxes.iter().map(detach_rect).collect(),
        }
    }
}
