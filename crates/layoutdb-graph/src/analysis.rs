//! Key-level reference graph of a design.
//!
//! [`ReferenceGraph`] records which record refers to which, by [`Key`],
//! independent of how deep the records themselves nest. It answers the
//! questions compaction is judged by: does a cycle of full references
//! exist, and who still refers to a given record.

use std::collections::HashMap;

use log::debug;
use petgraph::{
    Direction,
    algo::{is_cyclic_directed, tarjan_scc},
    graph::{DiGraph, NodeIndex},
};

use layoutdb_core::{
    design::Design,
    id::Key,
    reference::{Entity, Link, Linked},
};

/// Which references become graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFilter {
    /// Every reference, stub or full.
    All,
    /// Full references only.
    FullOnly,
}

impl LinkFilter {
    fn accepts(self, link: &Link<'_>) -> bool {
        match self {
            LinkFilter::All => true,
            LinkFilter::FullOnly => link.target().is_some(),
        }
    }
}

/// Directed graph over record keys; an edge `a -> b` means `a` refers to `b`.
#[derive(Debug)]
pub struct ReferenceGraph {
    graph: DiGraph<Key, ()>,
    node_id_map: HashMap<Key, NodeIndex>,
}

impl ReferenceGraph {
    /// Builds the graph of every top-level record of `design`.
    pub fn new(design: &Design, filter: LinkFilter) -> Self {
        let mut graph = Self {
            graph: DiGraph::new(),
            node_id_map: HashMap::new(),
        };

        graph.add_records(&design.instances, filter);
        graph.add_records(&design.nets, filter);
        graph.add_records(&design.instance_pins, filter);
        graph.add_records(&design.block_pins, filter);
        graph.add_records(&design.routing_vias, filter);
        graph.add_records(&design.via_definitions, filter);
        graph.add_records(&design.layers, filter);
        graph.add_records(&design.rows, filter);
        graph.add_records(&design.tracks, filter);
        graph.add_records(&design.sites, filter);
        graph.add_records(&design.geometries, filter);
        graph.add_records(design.gcell.as_slice(), filter);

        debug!(
            nodes = graph.graph.node_count(),
            edges = graph.graph.edge_count();
            "Reference graph built"
        );
        graph
    }

    fn add_records<T: Entity + Linked>(&mut self, records: &[T], filter: LinkFilter) {
        for record in records {
            let source = self.node(record.key());
            let mut targets = Vec::new();
            record.visit_links(&mut |link| {
                if filter.accepts(&link) {
                    targets.push(link.key());
                }
            });
            for key in targets {
                let target = self.node(key);
                self.graph.add_edge(source, target, ());
            }
        }
    }

    fn node(&mut self, key: Key) -> NodeIndex {
        *self
            .node_id_map
            .entry(key)
            .or_insert_with(|| self.graph.add_node(key))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if some record can reach itself.
    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Groups of records that refer to each other in a loop, each sorted.
    pub fn cycles(&self) -> Vec<Vec<Key>> {
        let mut cycles: Vec<Vec<Key>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || self.graph.contains_edge(component[0], component[0])
            })
            .map(|component| {
                let mut keys: Vec<Key> = component.into_iter().map(|idx| self.graph[idx]).collect();
                keys.sort();
                keys
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Keys of the records that refer to `key`, sorted.
    pub fn referrers(&self, key: Key) -> Vec<Key> {
        let Some(&idx) = self.node_id_map.get(&key) else {
            return Vec::new();
        };
        let mut keys: Vec<Key> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|source| self.graph[source])
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}
