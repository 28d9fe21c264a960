//! Reference resolution and compaction for LayoutDB designs.
//!
//! Parser output arrives as flat per-category lists whose cross-references
//! are identifier stubs. This crate provides:
//!
//! - **Identity index**: identifier to authoritative record per identifier
//!   space ([`index`] module)
//! - **Resolution**: stubs upgraded to full records, one hop deep
//!   ([`resolve`] module)
//! - **Compaction**: a cycle-free copy of a resolved design that serializes
//!   as a plain tree ([`compact`] module)
//! - **Inspection**: reference depth and key-level reference graphs
//!   ([`depth`] and [`analysis`] modules)

pub mod analysis;
pub mod compact;
pub mod depth;
pub mod error;
pub mod index;
pub mod policy;
pub mod resolve;

#[cfg(test)]
mod fixtures;

pub use compact::{CompactDesign, compact};
pub use error::{ErrorCode, GraphError};
pub use policy::{DanglingPolicy, DuplicatePolicy};
pub use resolve::{ResolveOptions, ResolvePass, Resolver, resolve};
