//! LayoutDB Core Types and Definitions
//!
//! This crate provides the entity model for a parsed physical design
//! database. It includes:
//!
//! - **Identifiers**: Category-scoped entity identifiers ([`id::EntityId`], [`id::Key`])
//! - **References**: The tri-state reference type ([`reference::Ref`])
//! - **Geometry**: Value types for shapes and grids ([`geometry`] module)
//! - **Kinds**: Enumerations with parser wire codes ([`kinds`] module)
//! - **Entities**: Instances, pins, nets, layers, vias, rows and sites ([`entity`] module)
//! - **Design**: Raw parser output and the design aggregate ([`design`] module)

pub mod design;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod id;
pub mod kinds;
pub mod reference;

pub use error::ModelError;
