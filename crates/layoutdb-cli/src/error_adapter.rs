//! Error adapter for converting LayoutDbError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! Graph errors carry a stable [`ErrorCode`](layoutdb::graph::ErrorCode);
//! every other variant gets a `layoutdb::*` code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use layoutdb::{
    LayoutDbError,
    graph::{DanglingPolicy, DuplicatePolicy, GraphError},
};

/// Adapter rendering a [`LayoutDbError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a LayoutDbError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.0 {
            // Display already includes the graph error
            LayoutDbError::Graph(_) | LayoutDbError::Files(_) => None,
            err => std::error::Error::source(err),
        }
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            LayoutDbError::Io(_) => "layoutdb::io",
            LayoutDbError::Graph(err) => return Some(Box::new(err.code())),
            LayoutDbError::Input(_) => "layoutdb::input",
            LayoutDbError::Encode(_) => "layoutdb::encode",
            LayoutDbError::Files(_) => "layoutdb::files",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            LayoutDbError::Graph(GraphError::DanglingReference { .. }) => format!(
                "set `on_dangling = \"{}\"` under [resolve] to keep the reference as a missing stub",
                DanglingPolicy::MarkMissing
            ),
            LayoutDbError::Graph(GraphError::DuplicateIdentifier { .. }) => format!(
                "set `on_duplicate = \"{}\"` under [resolve] to keep the last record",
                DuplicatePolicy::LastWins
            ),
            LayoutDbError::Input(_) => {
                "the input must be a parser dump in JSON, optionally gzipped".to_string()
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Convert a [`LayoutDbError`] into a reportable error.
pub fn to_reportable(err: &LayoutDbError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}
