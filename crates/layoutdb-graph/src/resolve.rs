//! Reference resolution: parser output to a cross-referenced design.
//!
//! # Overview
//!
//! [`Resolver`] turns a [`RawDesign`], whose cross-record fields are stubs,
//! into a [`Design`] whose first-level cross-references are full records
//! taken from the [`IdentityIndex`]. Resolution runs one pass per category
//! ([`ResolvePass`]), never iterating to a fixed point: the index holds
//! detached records, so a record reached through one hop still holds only
//! stubs.
//!
//! Fields upgraded to full records:
//!
//! | Record | Fields |
//! |---|---|
//! | Instance | `pins`, `obstructions` |
//! | Pin | `instance`, `net`, `geometries` |
//! | Net | `pins`, `edges[*].via`, `edges[*].layer`, `special_boxes` |
//! | Layer | `upper_layer`, `lower_layer` |
//! | Via | `top_layer`, `cut_layer`, `bottom_layer` |
//! | Row | `site` |
//! | Grid (tracks, gcell) | `layer` |
//!
//! Every other reference (for instance the layer of a bounding box) stays a
//! stub. Instance pins and pin instances are both full afterwards, so the
//! resolved design holds genuine two-way links; compaction removes them.
//!
//! Passes read only the raw input and the index and each writes a disjoint
//! set of collections, so the order they run in does not change the result.
//!
//! Under [`DuplicatePolicy::LastWins`] a record shadowed by a later record
//! with the same identifier is left out of the design, so every identifier
//! appears once per identifier space.
//!
//! # Example
//!
//! ```
//! use layoutdb_core::{
//!     design::{RawDesign, Regions},
//!     entity::{Instance, Pin},
//!     id::EntityId,
//!     reference::Ref,
//! };
//! use layoutdb_graph::resolve::{ResolveOptions, Resolver};
//!
//! let mut raw = RawDesign::named("top", Regions::default());
//! raw.instances.push(
//!     Instance::new(EntityId::from_raw(1), "u1").with_pins(vec![Ref::stub(EntityId::from_raw(7))]),
//! );
//! raw.instance_pins.push(
//!     Pin::new(EntityId::from_raw(7), "A").with_instance(Ref::stub(EntityId::from_raw(1))),
//! );
//!
//! let design = Resolver::new(&raw, ResolveOptions::default())?.resolve()?;
//! assert!(design.instances[0].pins[0].is_full());
//! # Ok::<(), layoutdb_graph::error::GraphError>(())
//! ```

use std::{collections::HashMap, fmt, sync::Arc};

use log::{debug, info, trace, warn};

use layoutdb_core::{
    design::{Design, RawDesign, Regions},
    entity::{Edge, Instance, Layer, Net, Pin, Row, Via},
    geometry::{Grid, Rect},
    id::Key,
    reference::{Entity, Ref, Stub},
};

use crate::{
    error::{GraphError, Result},
    index::{IdentityIndex, Indexed, detach_rect},
    policy::{DanglingPolicy, DuplicatePolicy},
};

/// One resolution pass; each pass owns a disjoint set of design collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvePass {
    /// `instances`
    Instances,
    /// `instance_pins` and `block_pins`
    Pins,
    /// `nets`
    Nets,
    /// `layers`
    Layers,
    /// `routing_vias` and `via_definitions`
    Vias,
    /// `rows`
    Rows,
    /// `tracks` and `gcell`
    Tracks,
}

impl ResolvePass {
    /// Every pass, in the default order.
    pub const ALL: [ResolvePass; 7] = [
        ResolvePass::Instances,
        ResolvePass::Pins,
        ResolvePass::Nets,
        ResolvePass::Layers,
        ResolvePass::Vias,
        ResolvePass::Rows,
        ResolvePass::Tracks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResolvePass::Instances => "instances",
            ResolvePass::Pins => "pins",
            ResolvePass::Nets => "nets",
            ResolvePass::Layers => "layers",
            ResolvePass::Vias => "vias",
            ResolvePass::Rows => "rows",
            ResolvePass::Tracks => "tracks",
        }
    }
}

impl fmt::Display for ResolvePass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Policies applied by one resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    on_duplicate: DuplicatePolicy,
    on_dangling: DanglingPolicy,
}

impl ResolveOptions {
    pub fn new(on_duplicate: DuplicatePolicy, on_dangling: DanglingPolicy) -> Self {
        Self {
            on_duplicate,
            on_dangling,
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.on_duplicate = policy;
        self
    }

    pub fn with_dangling_policy(mut self, policy: DanglingPolicy) -> Self {
        self.on_dangling = policy;
        self
    }

    pub fn on_duplicate(&self) -> DuplicatePolicy {
        self.on_duplicate
    }

    pub fn on_dangling(&self) -> DanglingPolicy {
        self.on_dangling
    }
}

/// Resolves one raw design.
#[derive(Debug)]
pub struct Resolver<'a> {
    raw: &'a RawDesign,
    index: IdentityIndex,
    on_dangling: DanglingPolicy,
}

impl<'a> Resolver<'a> {
    /// Builds the identity index for `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateIdentifier`] per the duplicate policy.
    pub fn new(raw: &'a RawDesign, options: ResolveOptions) -> Result<Self> {
        let index = IdentityIndex::build(raw, options.on_duplicate())?;
        Ok(Self {
            raw,
            index,
            on_dangling: options.on_dangling(),
        })
    }

    /// Returns the index the resolver looks records up in.
    pub fn index(&self) -> &IdentityIndex {
        &self.index
    }

    /// Runs every pass in the default order.
    pub fn resolve(&self) -> Result<Design> {
        self.resolve_in_order(&ResolvePass::ALL)
    }

    /// Runs the listed passes first, in the given order, then any pass not
    /// listed in the default order. A pass listed twice runs once.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MalformedInput`] when the design name or a
    /// named region is missing, and [`GraphError::DanglingReference`] under
    /// [`DanglingPolicy::Abort`]. No partial design is returned.
    pub fn resolve_in_order(&self, order: &[ResolvePass]) -> Result<Design> {
        let mut design = self.skeleton()?;
        info!(design = design.name.as_str(); "Resolving references");

        for pass in schedule(order) {
            self.run_pass(pass, &mut design)?;
        }

        let counts = design.counts();
        info!(
            instances = counts.instances,
            nets = counts.nets,
            pins = counts.instance_pins + counts.block_pins,
            total = counts.total();
            "References resolved"
        );
        Ok(design)
    }

    /// Validates the top-level fields and copies the collections that hold
    /// no resolvable references.
    fn skeleton(&self) -> Result<Design> {
        let name = match self.raw.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(GraphError::MalformedInput("design name is missing".into())),
        };
        let regions = Regions {
            bounding_box: required_region(self.raw.bounding_box.as_ref(), "bounding box")?,
            core: required_region(self.raw.core.as_ref(), "core")?,
            die: required_region(self.raw.die.as_ref(), "die")?,
        };

        let mut design = Design::new(name, regions);
        design.metrics = self.raw.metrics;
        design.sites = last_of_each(&self.raw.sites, &[]).0.into_iter().cloned().collect();
        design.geometries = last_of_each(&self.raw.geometries, &[])
            .0
            .into_iter()
            .map(Indexed::detached)
            .collect();
        Ok(design)
    }

    fn run_pass(&self, pass: ResolvePass, design: &mut Design) -> Result<()> {
        debug!(pass:% = pass; "Running resolution pass");
        let mut ctx = PassContext::new(&self.index, self.on_dangling);
        let raw = self.raw;

        match pass {
            ResolvePass::Instances => {
                let (instances, _) = last_of_each(&raw.instances, &[]);
                design.instances = collect(instances, |r| ctx.instance(r))?;
            }
            ResolvePass::Pins => {
                let (instance_pins, block_pins) = last_of_each(&raw.instance_pins, &raw.block_pins);
                design.instance_pins = collect(instance_pins, |r| ctx.pin(r))?;
                design.block_pins = collect(block_pins, |r| ctx.pin(r))?;
            }
            ResolvePass::Nets => {
                let (nets, _) = last_of_each(&raw.nets, &[]);
                design.nets = collect(nets, |r| ctx.net(r))?;
            }
            ResolvePass::Layers => {
                let (layers, _) = last_of_each(&raw.layers, &[]);
                design.layers = collect(layers, |r| ctx.layer(r))?;
            }
            ResolvePass::Vias => {
                let (routing, defined) = last_of_each(&raw.routing_vias, &raw.via_definitions);
                design.routing_vias = collect(routing, |r| ctx.via(r))?;
                design.via_definitions = collect(defined, |r| ctx.via(r))?;
            }
            ResolvePass::Rows => {
                design.rows = collect(&raw.rows, |r| ctx.row(r))?;
            }
            ResolvePass::Tracks => {
                design.tracks = collect(&raw.tracks, |r| ctx.grid(r))?;
                design.gcell = raw.gcell.as_ref().map(|r| ctx.grid(r)).transpose()?;
            }
        }

        debug!(
            pass:% = pass,
            upgraded = ctx.upgraded,
            missing = ctx.missing;
            "Resolution pass finished"
        );
        Ok(())
    }
}

/// Resolves `raw` with the given options.
pub fn resolve(raw: &RawDesign, options: ResolveOptions) -> Result<Design> {
    Resolver::new(raw, options)?.resolve()
}

fn schedule(order: &[ResolvePass]) -> Vec<ResolvePass> {
    let mut passes = Vec::with_capacity(ResolvePass::ALL.len());
    for &pass in order.iter().chain(ResolvePass::ALL.iter()) {
        if !passes.contains(&pass) {
            passes.push(pass);
        }
    }
    passes
}

fn required_region(rect: Option<&Rect>, what: &str) -> Result<Rect> {
    rect.map(detach_rect)
        .ok_or_else(|| GraphError::MalformedInput(format!("{what} region is missing")))
}

fn collect<'a, T: 'a, U>(
    records: impl IntoIterator<Item = &'a T>,
    mut resolve: impl FnMut(&T) -> Result<U>,
) -> Result<Vec<U>> {
    records.into_iter().map(|record| resolve(record)).collect()
}

/// Splits two lists sharing one identifier space into the records that own
/// their identifier, dropping every record a later one shadows.
fn last_of_each<'a, T: Entity>(first: &'a [T], second: &'a [T]) -> (Vec<&'a T>, Vec<&'a T>) {
    let mut last = HashMap::with_capacity(first.len() + second.len());
    for (position, record) in first.iter().chain(second).enumerate() {
        last.insert(record.id(), position);
    }

    let keep = |offset: usize, records: &'a [T]| -> Vec<&'a T> {
        records
            .iter()
            .enumerate()
            .filter(|(position, record)| last.get(&record.id()) == Some(&(offset + position)))
            .map(|(_, record)| record)
            .collect()
    };
    let kept = (keep(0, first), keep(first.len(), second));

    let dropped = first.len() + second.len() - kept.0.len() - kept.1.len();
    if dropped > 0 {
        debug!(category:% = T::CATEGORY, dropped = dropped; "Shadowed records left out");
    }
    kept
}

/// Per-pass state: where to look records up and what has been upgraded.
struct PassContext<'r> {
    index: &'r IdentityIndex,
    on_dangling: DanglingPolicy,
    upgraded: usize,
    missing: usize,
}

impl<'r> PassContext<'r> {
    fn new(index: &'r IdentityIndex, on_dangling: DanglingPolicy) -> Self {
        Self {
            index,
            on_dangling,
            upgraded: 0,
            missing: 0,
        }
    }

    /// Replaces one reference with the indexed record.
    ///
    /// A full record the parser inlined is kept (detached) when its
    /// identifier is not indexed; the indexed record wins otherwise.
    fn upgrade<T: Indexed>(&mut self, reference: &Ref<T>, referrer: Key) -> Result<Ref<T>> {
        if let Some(record) = self.index.get::<T>(reference.id()) {
            self.upgraded += 1;
            trace!(key:% = reference.key(), referrer:% = referrer; "Reference resolved");
            return Ok(Ref::Full(Arc::clone(record)));
        }
        if let Ref::Full(inline) = reference {
            return Ok(Ref::full(inline.detached()));
        }

        match self.on_dangling {
            DanglingPolicy::Abort => Err(GraphError::DanglingReference {
                key: reference.key(),
                referrer,
            }),
            DanglingPolicy::MarkMissing => {
                warn!(key:% = reference.key(), referrer:% = referrer; "Dangling reference marked missing");
                self.missing += 1;
                Ok(Ref::Stub(Stub::missing(reference.id())))
            }
        }
    }

    fn upgrade_opt<T: Indexed>(
        &mut self,
        reference: Option<&Ref<T>>,
        referrer: Key,
    ) -> Result<Option<Ref<T>>> {
        reference.map(|r| self.upgrade(r, referrer)).transpose()
    }

    fn upgrade_all<T: Indexed>(&mut self, references: &[Ref<T>], referrer: Key) -> Result<Vec<Ref<T>>> {
        references.iter().map(|r| self.upgrade(r, referrer)).collect()
    }

    fn instance(&mut self, raw: &Instance) -> Result<Instance> {
        let referrer = raw.key();
        Ok(Instance {
            pins: self.upgrade_all(&raw.pins, referrer)?,
            obstructions: self.upgrade_opt(raw.obstructions.as_ref(), referrer)?,
            ..raw.detached()
        })
    }

    fn pin(&mut self, raw: &Pin) -> Result<Pin> {
        let referrer = raw.key();
        Ok(Pin {
            instance: self.upgrade_opt(raw.instance.as_ref(), referrer)?,
            net: self.upgrade_opt(raw.net.as_ref(), referrer)?,
            geometries: self.upgrade_all(&raw.geometries, referrer)?,
            ..raw.detached()
        })
    }

    fn net(&mut self, raw: &Net) -> Result<Net> {
        let referrer = raw.key();
        let edges = raw
            .edges
            .iter()
            .map(|edge| self.edge(edge, referrer))
            .collect::<Result<_>>()?;
        Ok(Net {
            pins: self.upgrade_all(&raw.pins, referrer)?,
            edges,
            special_boxes: self.upgrade_all(&raw.special_boxes, referrer)?,
            ..raw.detached()
        })
    }

    fn edge(&mut self, raw: &Edge, referrer: Key) -> Result<Edge> {
        Ok(Edge {
            kind: raw.kind,
            rect: raw.rect.as_ref().map(detach_rect),
            via: self.upgrade_opt(raw.via.as_ref(), referrer)?,
            layer: self.upgrade_opt(raw.layer.as_ref(), referrer)?,
        })
    }

    fn layer(&mut self, raw: &Layer) -> Result<Layer> {
        let referrer = raw.key();
        Ok(Layer {
            upper_layer: self.upgrade_opt(raw.upper_layer.as_ref(), referrer)?,
            lower_layer: self.upgrade_opt(raw.lower_layer.as_ref(), referrer)?,
            ..raw.detached()
        })
    }

    fn via(&mut self, raw: &Via) -> Result<Via> {
        let referrer = raw.key();
        Ok(Via {
            top_layer: self.upgrade_opt(raw.top_layer.as_ref(), referrer)?,
            cut_layer: self.upgrade_opt(raw.cut_layer.as_ref(), referrer)?,
            bottom_layer: self.upgrade_opt(raw.bottom_layer.as_ref(), referrer)?,
            ..raw.detached()
        })
    }

    fn row(&mut self, raw: &Row) -> Result<Row> {
        let referrer = raw.key();
        Ok(Row {
            site: self.upgrade_opt(raw.site.as_ref(), referrer)?,
            bounding_box: raw.bounding_box.as_ref().map(detach_rect),
            ..raw.clone()
        })
    }

    fn grid(&mut self, raw: &Grid) -> Result<Grid> {
        let referrer = raw.key();
        Ok(Grid {
            layer: self.upgrade_opt(raw.layer.as_ref(), referrer)?,
            ..raw.clone()
        })
    }
}
