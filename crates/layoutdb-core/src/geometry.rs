//! Geometric value types of a design database.
//!
//! # Overview
//!
//! - [`Point`] - An integer coordinate in database units
//! - [`Rect`] - An axis-aligned box, optionally tied to a layer or via
//! - [`Geometry`] - An ordered collection of boxes (pin shapes, obstructions)
//! - [`Grid`] - A track or gcell grid with explicit lines and repeat patterns
//!
//! These are value types: cloning one produces an independent deep copy.
//! Only the layer and via links inside a [`Rect`] or [`Grid`] are
//! references, and those are stubs in parser output.

use serde::{Deserialize, Serialize};

use crate::{
    entity::{Layer, Via},
    id::{Category, EntityId},
    kinds::WireShapeType,
    reference::{Entity, Link, Linked, Ref},
};

/// An integer coordinate in database units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
///
/// `shape_type` holds the parser's wire shape code, or `-1` for boxes that
/// are not special-net wires.
///
/// # Examples
///
/// ```
/// use layoutdb_core::{geometry::Rect, id::EntityId};
///
/// let rect = Rect::new(EntityId::from_raw(1), 0, 0, 40, 10);
/// assert_eq!(rect.width(), 40);
/// assert_eq!(rect.area(), 400);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Rect {
    #[serde(rename = "ID")]
    pub id: EntityId,
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
    pub shape_type: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<Ref<Layer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<Ref<Via>>,
}

impl Rect {
    /// Creates a rectangle with no layer or via link.
    pub fn new(id: EntityId, x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            id,
            x_min,
            y_min,
            x_max,
            y_max,
            shape_type: -1,
            layer: None,
            via: None,
        }
    }

    /// Sets the layer link (builder style).
    pub fn with_layer(mut self, layer: Ref<Layer>) -> Self {
        self.layer = Some(layer);
        self
    }

    /// Sets the via link (builder style).
    pub fn with_via(mut self, via: Ref<Via>) -> Self {
        self.via = Some(via);
        self
    }

    /// Horizontal extent.
    pub fn width(&self) -> i64 {
        i64::from(self.x_max) - i64::from(self.x_min)
    }

    /// Vertical extent.
    pub fn height(&self) -> i64 {
        i64::from(self.y_max) - i64::from(self.y_min)
    }

    /// Area in square database units.
    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// Decodes `shape_type` as a special-wire shape, if it is one.
    pub fn wire_shape(&self) -> Option<WireShapeType> {
        WireShapeType::try_from(self.shape_type).ok()
    }
}

impl Entity for Rect {
    const CATEGORY: Category = Category::Rect;

    fn id(&self) -> EntityId {
        self.id
    }
}

impl Linked for Rect {
    fn visit_links<'a>(&'a self, visit: &mut dyn FnMut(Link<'a>)) {
        if let Some(layer) = &self.layer {
            visit(layer.link());
        }
        if let Some(via) = &self.via {
            visit(via.link());
        }
    }
}

/// An ordered collection of boxes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Geometry {
    #[serde(rename = "ID")]
    pub id: EntityId,
    pub boxes: Vec<Rect>,
}

impl Geometry {
    /// Creates a geometry from its boxes.
    pub fn new(id: EntityId, boxes: Vec<Rect>) -> Self {
        Self { id, boxes }
    }
}

impl Entity for Geometry {
    const CATEGORY: Category = Category::Geometry;

    fn id(&self) -> EntityId {
        self.id
    }
}

impl Linked for Geometry {
    fn visit_links<'a>(&'a self, visit: &mut dyn FnMut(Link<'a>)) {
        for rect in &self.boxes {
            rect.visit_links(visit);
        }
    }
}

/// One repeat pattern of a grid axis: `line_count` lines starting at
/// `origin`, `step` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPattern {
    pub origin: i32,
    pub line_count: i32,
    pub step: i32,
}

impl GridPattern {
    /// Coordinates of every line in the pattern.
    pub fn lines(self) -> impl Iterator<Item = i64> {
        let count = i64::from(self.line_count.max(0));
        (0..count).map(move |k| i64::from(self.origin) + k * i64::from(self.step))
    }
}

/// A routing track grid or a gcell grid.
///
/// Repeat patterns are stored as the three parallel arrays per axis used
/// on the wire; [`Grid::x_patterns`] and [`Grid::y_patterns`] zip them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Grid {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<Ref<Layer>>,
    pub grid_x: Vec<i32>,
    pub grid_y: Vec<i32>,
    pub grid_x_pattern_origins: Vec<i32>,
    pub grid_x_pattern_line_counts: Vec<i32>,
    pub grid_x_pattern_steps: Vec<i32>,
    pub grid_y_pattern_origins: Vec<i32>,
    pub grid_y_pattern_line_counts: Vec<i32>,
    pub grid_y_pattern_steps: Vec<i32>,
}

impl Grid {
    /// Creates an empty grid.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Sets the layer link (builder style).
    pub fn with_layer(mut self, layer: Ref<Layer>) -> Self {
        self.layer = Some(layer);
        self
    }

    /// Appends a repeat pattern to the X axis.
    pub fn push_x_pattern(&mut self, pattern: GridPattern) {
        self.grid_x_pattern_origins.push(pattern.origin);
        self.grid_x_pattern_line_counts.push(pattern.line_count);
        self.grid_x_pattern_steps.push(pattern.step);
    }

    /// Appends a repeat pattern to the Y axis.
    pub fn push_y_pattern(&mut self, pattern: GridPattern) {
        self.grid_y_pattern_origins.push(pattern.origin);
        self.grid_y_pattern_line_counts.push(pattern.line_count);
        self.grid_y_pattern_steps.push(pattern.step);
    }

    /// Repeat patterns of the X axis.
    pub fn x_patterns(&self) -> impl Iterator<Item = GridPattern> + '_ {
        zip_patterns(
            &self.grid_x_pattern_origins,
            &self.grid_x_pattern_line_counts,
            &self.grid_x_pattern_steps,
        )
    }

    /// Repeat patterns of the Y axis.
    pub fn y_patterns(&self) -> impl Iterator<Item = GridPattern> + '_ {
        zip_patterns(
            &self.grid_y_pattern_origins,
            &self.grid_y_pattern_line_counts,
            &self.grid_y_pattern_steps,
        )
    }
}

fn zip_patterns<'a>(
    origins: &'a [i32],
    line_counts: &'a [i32],
    steps: &'a [i32],
) -> impl Iterator<Item = GridPattern> + 'a {
    origins
        .iter()
        .zip(line_counts)
        .zip(steps)
        .map(|((&origin, &line_count), &step)| GridPattern {
            origin,
            line_count,
            step,
        })
}

impl Entity for Grid {
    const CATEGORY: Category = Category::Grid;

    fn id(&self) -> EntityId {
        self.id
    }
}

impl Linked for Grid {
    fn visit_links<'a>(&'a self, visit: &mut dyn FnMut(Link<'a>)) {
        if let Some(layer) = &self.layer {
            visit(layer.link());
        }
    }
}
