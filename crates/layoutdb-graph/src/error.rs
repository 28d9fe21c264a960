//! Error system for the graph engine.
//!
//! # Overview
//!
//! Indexing and resolution report failures through [`GraphError`]. Each
//! variant maps to a stable [`ErrorCode`] so that front ends can render it
//! consistently without matching on message text.
//!
//! # Example
//!
//! ```
//! # use layoutdb_graph::error::{ErrorCode, GraphError};
//! # use layoutdb_core::id::{Category, EntityId, Key};
//!
//! let err = GraphError::DuplicateIdentifier {
//!     key: Key::new(Category::Pin, EntityId::from_raw(4)),
//! };
//! assert_eq!(err.code(), ErrorCode::G002);
//! ```

mod error_code;
mod graph_error;

pub use error_code::ErrorCode;
pub use graph_error::{GraphError, Result};
