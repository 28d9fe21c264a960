//! Error types for the entity model.

use thiserror::Error;

use crate::id::EntityId;

/// Errors raised while decoding model values from parser output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An enumeration code that the parser protocol does not define.
    #[error("unknown {kind} code {code}")]
    UnknownCode { kind: &'static str, code: i32 },

    /// A reference marked `"InComplete": false`, which is a full record.
    #[error("reference {id} is a complete record, not a stub")]
    CompleteRecord { id: EntityId },
}
