//! The GraphError type returned by indexing and resolution.

use layoutdb_core::id::Key;
use thiserror::Error;

use crate::error::ErrorCode;

/// A type alias for `Result<T, GraphError>`.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error type for building the identity index and resolving references.
///
/// Every variant aborts the whole conversion; no partially resolved design
/// is ever returned alongside one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A reference names an identifier with no matching record.
    #[error("{referrer} refers to {key}, which does not exist")]
    DanglingReference { key: Key, referrer: Key },

    /// Two records share one identifier within an identifier space.
    #[error("identifier {key} is used by more than one record")]
    DuplicateIdentifier { key: Key },

    /// A required top-level field is missing.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl GraphError {
    /// Returns the stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            GraphError::DanglingReference { .. } => ErrorCode::G001,
            GraphError::DuplicateIdentifier { .. } => ErrorCode::G002,
            GraphError::MalformedInput(_) => ErrorCode::G003,
        }
    }

    /// Returns the key the error is about, if it names one.
    pub fn key(&self) -> Option<Key> {
        match self {
            GraphError::DanglingReference { key, .. } | GraphError::DuplicateIdentifier { key } => {
                Some(*key)
            }
            GraphError::MalformedInput(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use layoutdb_core::id::{Category, EntityId};

    use super::*;

    #[test]
    fn test_dangling_reference_display() {
        let err = GraphError::DanglingReference {
            key: Key::new(Category::Net, EntityId::from_raw(9)),
            referrer: Key::new(Category::Pin, EntityId::from_raw(3)),
        };
        assert_eq!(err.to_string(), "pin#3 refers to net#9, which does not exist");
        assert_eq!(err.code(), ErrorCode::G001);
        assert_eq!(err.key(), Some(Key::new(Category::Net, EntityId::from_raw(9))));
    }

    #[test]
    fn test_malformed_input_has_no_key() {
        let err = GraphError::MalformedInput("design name is missing".to_string());
        assert_eq!(err.to_string(), "malformed input: design name is missing");
        assert_eq!(err.code(), ErrorCode::G003);
        assert_eq!(err.key(), None);
    }
}
