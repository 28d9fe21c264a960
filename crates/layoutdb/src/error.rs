//! Error types for layout database operations.
//!
//! This module provides the main error type [`LayoutDbError`] which wraps
//! the error conditions that can occur while converting a design.

use std::io;

use thiserror::Error;

use layoutdb_graph::GraphError;

use crate::files::FilesError;

/// The main error type for layout database operations.
///
/// # Graph Variant
///
/// The `Graph` variant carries the resolution failure unchanged, so callers
/// can match on the offending [`Key`](layoutdb_core::id::Key) and map
/// [`GraphError::code`] to a user-facing message.
#[derive(Debug, Error)]
pub enum LayoutDbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Invalid design input: {0}")]
    Input(#[source] serde_json::Error),

    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Files(#[from] FilesError),
}
