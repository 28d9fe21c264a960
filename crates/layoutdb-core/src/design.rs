//! The design aggregate and its raw parser form.
//!
//! [`RawDesign`] is what the layout parser hands over: flat per-category
//! lists whose cross-references are stubs, with the top-level fields left
//! optional because the parser may omit them. [`Design`] is the validated
//! aggregate produced by resolution and consumed by compaction; its name
//! and named regions are required.
//!
//! Both serialize with the same field names, and every collection is a
//! list, so an empty category serializes as `[]` rather than being left
//! out.

use serde::{Deserialize, Serialize};

use crate::{
    entity::{Instance, Layer, Net, Pin, Row, Site, Via},
    geometry::{Geometry, Grid, Rect},
    reference::Linked,
};

/// Area figures of a design.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DesignMetrics {
    pub core_area: f64,
    pub die_area: f64,
    pub design_area: f64,
    pub utilization: f64,
}

impl DesignMetrics {
    /// Builds metrics from the three areas; utilization is the placed design
    /// area over the core area, or zero for an empty core.
    ///
    /// # Examples
    ///
    /// ```
    /// use layoutdb_core::design::DesignMetrics;
    ///
    /// let metrics = DesignMetrics::from_areas(200.0, 400.0, 50.0);
    /// assert_eq!(metrics.utilization, 0.25);
    /// ```
    pub fn from_areas(core_area: f64, die_area: f64, design_area: f64) -> Self {
        let utilization = if core_area > 0.0 {
            design_area / core_area
        } else {
            0.0
        };
        Self {
            core_area,
            die_area,
            design_area,
            utilization,
        }
    }
}

/// The three named regions of a design.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Regions {
    pub bounding_box: Rect,
    pub core: Rect,
    pub die: Rect,
}

/// Parser output, before resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawDesign {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub instances: Vec<Instance>,
    pub nets: Vec<Net>,
    pub instance_pins: Vec<Pin>,
    pub block_pins: Vec<Pin>,
    pub routing_vias: Vec<Via>,
    pub via_definitions: Vec<Via>,
    pub layers: Vec<Layer>,
    pub rows: Vec<Row>,
    pub tracks: Vec<Grid>,
    pub sites: Vec<Site>,
    pub geometries: Vec<Geometry>,
    #[serde(rename = "GCell", skip_serializing_if = "Option::is_none")]
    pub gcell: Option<Grid>,
    #[serde(flatten)]
    pub metrics: DesignMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core: Option<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub die: Option<Rect>,
}

impl RawDesign {
    /// Creates an empty raw design with a name and all three regions set.
    pub fn named(name: impl Into<String>, regions: Regions) -> Self {
        Self {
            name: Some(name.into()),
            bounding_box: Some(regions.bounding_box),
            core: Some(regions.core),
            die: Some(regions.die),
            ..Self::default()
        }
    }
}

/// A complete design: every category's top-level collection plus summary
/// metrics and named regions.
///
/// The same type holds both the resolved graph and the compacted tree;
/// they differ only in which references are full.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Design {
    pub name: String,
    pub instances: Vec<Instance>,
    pub nets: Vec<Net>,
    pub instance_pins: Vec<Pin>,
    pub block_pins: Vec<Pin>,
    pub routing_vias: Vec<Via>,
    pub via_definitions: Vec<Via>,
    pub layers: Vec<Layer>,
    pub rows: Vec<Row>,
    pub tracks: Vec<Grid>,
    pub sites: Vec<Site>,
    pub geometries: Vec<Geometry>,
    #[serde(rename = "GCell")]
    pub gcell: Option<Grid>,
    #[serde(flatten)]
    pub metrics: DesignMetrics,
    #[serde(flatten)]
    pub regions: Regions,
}

impl Design {
    /// Creates a design with no records.
    pub fn new(name: impl Into<String>, regions: Regions) -> Self {
        Self {
            name: name.into(),
            regions,
            ..Self::default()
        }
    }

    /// Returns the size of every top-level collection.
    pub fn counts(&self) -> DesignCounts {
        DesignCounts {
            instances: self.instances.len(),
            nets: self.nets.len(),
            instance_pins: self.instance_pins.len(),
            block_pins: self.block_pins.len(),
            routing_vias: self.routing_vias.len(),
            via_definitions: self.via_definitions.len(),
            layers: self.layers.len(),
            rows: self.rows.len(),
            tracks: self.tracks.len(),
            sites: self.sites.len(),
            geometries: self.geometries.len(),
        }
    }

    /// Calls `visit` once per record owned by the design, including the
    /// gcell grid and the region rectangles.
    pub fn visit_records<'a>(&'a self, visit: &mut dyn FnMut(&'a dyn Linked)) {
        self.instances.iter().for_each(|r| visit(r));
        self.nets.iter().for_each(|r| visit(r));
        self.instance_pins.iter().for_each(|r| visit(r));
        self.block_pins.iter().for_each(|r| visit(r));
        self.routing_vias.iter().for_each(|r| visit(r));
        self.via_definitions.iter().for_each(|r| visit(r));
        self.layers.iter().for_each(|r| visit(r));
        self.rows.iter().for_each(|r| visit(r));
        self.tracks.iter().for_each(|r| visit(r));
        self.sites.iter().for_each(|r| visit(r));
        self.geometries.iter().for_each(|r| visit(r));
        if let Some(gcell) = &self.gcell {
            visit(gcell);
        }
        visit(&self.regions.bounding_box);
        visit(&self.regions.core);
        visit(&self.regions.die);
    }
}

/// Per-category record counts of a [`Design`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DesignCounts {
    pub instances: usize,
    pub nets: usize,
    pub instance_pins: usize,
    pub block_pins: usize,
    pub routing_vias: usize,
    pub via_definitions: usize,
    pub layers: usize,
    pub rows: usize,
    pub tracks: usize,
    pub sites: usize,
    pub geometries: usize,
}

impl DesignCounts {
    /// Sum over all categories.
    pub fn total(&self) -> usize {
        self.instances
            + self.nets
            + self.instance_pins
            + self.block_pins
            + self.routing_vias
            + self.via_definitions
            + self.layers
            + self.rows
            + self.tracks
            + self.sites
            + self.geometries
    }
}
