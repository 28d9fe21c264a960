//! Tri-state entity references.
//!
//! A reference field on a record is in one of three states:
//!
//! - **absent**: the field is `None` (or the list is empty),
//! - **stub**: [`Ref::Stub`], only the identifier is known, optionally with a
//!   cached display label,
//! - **full**: [`Ref::Full`], the complete record is attached.
//!
//! A stub never carries nested references, which makes it the single tool
//! used to bound the depth of the entity graph.
//!
//! # Wire Format
//!
//! A full reference serializes as the record itself. A stub serializes as
//!
//! ```text
//! {"ID": 12, "Name": "VDD", "InComplete": true, "Missing": true}
//! ```
//!
//! where `Name` and `Missing` are only present when set. Deserialization
//! recognises a stub by an `InComplete` marker that is `true`; a record
//! carrying `"InComplete": false` is read as the full record.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    error::ModelError,
    id::{Category, EntityId, Key},
};

/// A record that owns an identifier within a category.
pub trait Entity {
    /// Category whose identifier space this record lives in.
    const CATEGORY: Category;

    /// Identifier of this record.
    fn id(&self) -> EntityId;

    /// Cheap display label, if the record has one.
    fn label(&self) -> Option<&str> {
        None
    }

    /// Returns the composite key of this record.
    fn key(&self) -> Key {
        Key::new(Self::CATEGORY, self.id())
    }
}

/// An identifier-only placeholder for a record.
///
/// # Examples
///
/// ```
/// use layoutdb_core::{id::EntityId, reference::Stub};
///
/// let stub = Stub::new(EntityId::from_raw(4)).with_label("core");
/// assert_eq!(stub.label(), Some("core"));
/// assert!(!stub.is_dangling());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "StubRepr", try_from = "StubRepr")]
pub struct Stub {
    id: EntityId,
    label: Option<String>,
    dangling: bool,
}

impl Stub {
    /// Creates an identifier-only stub.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            label: None,
            dangling: false,
        }
    }

    /// Creates a stub for an identifier that has no matching record.
    pub fn missing(id: EntityId) -> Self {
        Self {
            id,
            label: None,
            dangling: true,
        }
    }

    /// Attaches a cached display label (builder style).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the identifier this stub stands for.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the cached display label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns `true` if the identifier could not be found when resolving.
    pub fn is_dangling(&self) -> bool {
        self.dangling
    }
}

/// Wire representation of a [`Stub`].
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StubRepr {
    #[serde(rename = "ID")]
    id: EntityId,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(rename = "InComplete")]
    incomplete: bool,
    #[serde(rename = "Missing", default, skip_serializing_if = "is_false")]
    missing: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl From<Stub> for StubRepr {
    fn from(stub: Stub) -> Self {
        Self {
            id: stub.id,
            label: stub.label,
            incomplete: true,
            missing: stub.dangling,
        }
    }
}

impl TryFrom<StubRepr> for Stub {
    type Error = ModelError;

    fn try_from(repr: StubRepr) -> Result<Self, Self::Error> {
        if !repr.incomplete {
            return Err(ModelError::CompleteRecord { id: repr.id });
        }
        Ok(Self {
            id: repr.id,
            label: repr.label,
            dangling: repr.missing,
        })
    }
}

/// A reference to another record, either a stub or the full record.
///
/// Full records are shared through [`Arc`]; the records themselves are
/// immutable once wrapped, so a full reference never observes later edits
/// made to the record it was copied from.
///
/// # Examples
///
/// ```
/// use layoutdb_core::{entity::Site, id::EntityId, reference::Ref};
///
/// let site = Site::new(EntityId::from_raw(1), "core");
/// let full = Ref::full(site);
/// let stub = full.to_stub();
///
/// assert!(full.is_full());
/// assert!(stub.is_stub());
/// assert_eq!(full.id(), stub.id());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Ref<T> {
    Stub(Stub),
    Full(Arc<T>),
}

impl<T> Ref<T> {
    /// Creates an identifier-only reference.
    pub fn stub(id: EntityId) -> Self {
        Self::Stub(Stub::new(id))
    }

    /// Creates a stub reference carrying a display label.
    pub fn named_stub(id: EntityId, label: impl Into<String>) -> Self {
        Self::Stub(Stub::new(id).with_label(label))
    }

    /// Wraps a complete record.
    pub fn full(record: T) -> Self {
        Self::Full(Arc::new(record))
    }

    /// Returns `true` if the complete record is attached.
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }

    /// Returns `true` if only the identifier is known.
    pub fn is_stub(&self) -> bool {
        matches!(self, Self::Stub(_))
    }

    /// Borrows the complete record, if attached.
    pub fn as_full(&self) -> Option<&T> {
        match self {
            Self::Full(record) => Some(record.as_ref()),
            Self::Stub(_) => None,
        }
    }

    /// Borrows the stub, if this is a stub reference.
    pub fn as_stub(&self) -> Option<&Stub> {
        match self {
            Self::Stub(stub) => Some(stub),
            Self::Full(_) => None,
        }
    }
}

impl<T: Entity> Ref<T> {
    /// Returns the identifier of the referenced record, whatever the state.
    pub fn id(&self) -> EntityId {
        match self {
            Self::Stub(stub) => stub.id(),
            Self::Full(record) => record.id(),
        }
    }

    /// Returns the composite key of the referenced record.
    pub fn key(&self) -> Key {
        Key::new(T::CATEGORY, self.id())
    }

    /// Downgrades to an identifier-only stub.
    ///
    /// The "missing" marker of a dangling stub is kept, any label is dropped.
    pub fn to_stub(&self) -> Self {
        match self {
            Self::Stub(stub) if stub.is_dangling() => Self::Stub(Stub::missing(stub.id())),
            _ => Self::stub(self.id()),
        }
    }

    /// Downgrades to a stub that keeps the record's display label.
    pub fn to_named_stub(&self) -> Self {
        let label = match self {
            Self::Stub(stub) => stub.label(),
            Self::Full(record) => record.label(),
        };
        let stub = match self {
            Self::Stub(stub) if stub.is_dangling() => Stub::missing(stub.id()),
            _ => Stub::new(self.id()),
        };
        match label {
            Some(label) => Self::Stub(stub.with_label(label)),
            None => Self::Stub(stub),
        }
    }
}

impl<T: Serialize> Serialize for Ref<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Stub(stub) => stub.serialize(serializer),
            Self::Full(record) => record.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RefRepr<T> {
    Stub(Stub),
    Full(T),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Ref<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RefRepr::deserialize(deserializer)? {
            RefRepr::Stub(stub) => Self::Stub(stub),
            RefRepr::Full(record) => Self::full(record),
        })
    }
}

/// One outgoing reference of a record, as seen by a graph walk.
#[derive(Clone, Copy)]
pub struct Link<'a> {
    key: Key,
    target: Option<&'a dyn Linked>,
}

impl<'a> Link<'a> {
    /// Returns the key of the referenced record.
    pub fn key(&self) -> Key {
        self.key
    }

    /// Returns the referenced record when the reference is full.
    pub fn target(&self) -> Option<&'a dyn Linked> {
        self.target
    }
}

/// Records that hold references to other records.
///
/// Implementations report every reference field, including the ones nested
/// inside value fields such as a bounding box [`Rect`](crate::geometry::Rect).
pub trait Linked {
    /// Calls `visit` once per reference held by this record.
    fn visit_links<'a>(&'a self, visit: &mut dyn FnMut(Link<'a>));
}

impl<T: Entity + Linked> Ref<T> {
    /// Returns the graph-walk view of this reference.
    pub fn link(&self) -> Link<'_> {
        Link {
            key: self.key(),
            target: self.as_full().map(|record| record as &dyn Linked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Pin, Site};

    #[test]
    fn test_stub_serializes_with_incomplete_marker() {
        let stub: Ref<Pin> = Ref::stub(EntityId::from_raw(5));
        let json = serde_json::to_string(&stub).unwrap();
        assert_eq!(json, r#"{"ID":5,"InComplete":true}"#);
    }

    #[test]
    fn test_named_and_missing_stub_serialization() {
        let named: Ref<Site> = Ref::named_stub(EntityId::from_raw(2), "core");
        assert_eq!(
            serde_json::to_string(&named).unwrap(),
            r#"{"ID":2,"Name":"core","InComplete":true}"#
        );

        let missing: Ref<Site> = Ref::Stub(Stub::missing(EntityId::from_raw(9)));
        assert_eq!(
            serde_json::to_string(&missing).unwrap(),
            r#"{"ID":9,"InComplete":true,"Missing":true}"#
        );
    }

    #[test]
    fn test_full_reference_serializes_as_record() {
        let site: Ref<Site> = Ref::full(Site::new(EntityId::from_raw(1), "unit"));
        assert_eq!(
            serde_json::to_string(&site).unwrap(),
            r#"{"ID":1,"Name":"unit"}"#
        );
    }

    #[test]
    fn test_deserialize_distinguishes_stub_from_full() {
        let stub: Ref<Site> = serde_json::from_str(r#"{"ID":3,"InComplete":true}"#).unwrap();
        assert!(stub.is_stub());
        assert_eq!(stub.id().as_raw(), 3);

        let full: Ref<Site> = serde_json::from_str(r#"{"ID":3,"Name":"unit"}"#).unwrap();
        assert!(full.is_full());
        assert_eq!(full.as_full().unwrap().name, "unit");
    }

    #[test]
    fn test_incomplete_false_reads_as_full_record() {
        let site: Ref<Site> =
            serde_json::from_str(r#"{"ID":1,"Name":"core","InComplete":false}"#).unwrap();
        assert!(site.as_stub().is_none());
        assert_eq!(site.as_full().unwrap(), &Site::new(EntityId::from_raw(1), "core"));

        let err = serde_json::from_str::<Stub>(r#"{"ID":1,"InComplete":false}"#).unwrap_err();
        assert!(err.to_string().contains("complete record"), "unexpected message: {err}");
    }

    #[test]
    fn test_to_stub_keeps_identifier_and_missing_marker() {
        let full: Ref<Site> = Ref::full(Site::new(EntityId::from_raw(8), "io"));
        let stub = full.to_stub();
        assert_eq!(stub.id(), full.id());
        assert_eq!(stub.as_stub().unwrap().label(), None);

        let missing: Ref<Site> = Ref::Stub(Stub::missing(EntityId::from_raw(4)));
        assert!(missing.to_stub().as_stub().unwrap().is_dangling());
    }

    #[test]
    fn test_to_named_stub_uses_record_label() {
        let full: Ref<Site> = Ref::full(Site::new(EntityId::from_raw(8), "io"));
        let stub = full.to_named_stub();
        assert_eq!(stub.as_stub().unwrap().label(), Some("io"));
        assert_eq!(stub.id().as_raw(), 8);
    }

    #[test]
    fn test_key_uses_category() {
        let pin: Ref<Pin> = Ref::stub(EntityId::from_raw(11));
        assert_eq!(pin.key(), Key::new(Category::Pin, EntityId::from_raw(11)));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::entity::{Net, Site};

    // ===================
    // Strategies
    // ===================

    fn site_strategy() -> impl Strategy<Value = Site> {
        (any::<u32>(), "[a-z][a-z0-9_]{0,12}")
            .prop_map(|(id, name)| Site::new(EntityId::from_raw(id), name))
    }

    fn stub_strategy() -> impl Strategy<Value = Stub> {
        (any::<u32>(), proptest::option::of("[A-Z]{1,8}"), any::<bool>()).prop_map(
            |(id, label, dangling)| {
                let stub = if dangling {
                    Stub::missing(EntityId::from_raw(id))
                } else {
                    Stub::new(EntityId::from_raw(id))
                };
                match label {
                    Some(label) => stub.with_label(label),
                    None => stub,
                }
            },
        )
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Downgrading a full reference keeps its identifier and category.
    fn check_downgrade_preserves_identity(site: Site) -> Result<(), TestCaseError> {
        let full = Ref::full(site.clone());
        let stub = full.to_stub();
        let named = full.to_named_stub();

        prop_assert_eq!(stub.key(), site.key());
        prop_assert_eq!(named.key(), site.key());
        prop_assert!(stub.is_stub() && named.is_stub());
        prop_assert_eq!(
            named.as_stub().and_then(Stub::label),
            site.label()
        );
        Ok(())
    }

    /// A stub read back from its wire form is the same stub.
    fn check_stub_wire_identity(stub: Stub) -> Result<(), TestCaseError> {
        let reference: Ref<Net> = Ref::Stub(stub.clone());
        let json = serde_json::to_string(&reference)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let restored: Ref<Net> =
            serde_json::from_str(&json).map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(restored.as_stub(), Some(&stub));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn downgrade_preserves_identity(site in site_strategy()) {
            check_downgrade_preserves_identity(site)?;
        }

        #[test]
        fn stub_wire_identity(stub in stub_strategy()) {
            check_stub_wire_identity(stub)?;
        }
    }
}
