//! Category-scoped entity identifiers.
//!
//! The parser tags every record with an integer identifier that is unique
//! within its identifier space. An identifier space is usually a single
//! [`Category`], but pins (instance-pins and block-pins) and vias (routing
//! vias and via definitions) each merge two record lists into one space.
//!
//! [`Key`] pairs a category with an identifier so that lookups and error
//! reports never rely on raw integers happening not to collide.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, copyable identifier of a record within its identifier space.
///
/// # Examples
///
/// ```
/// use layoutdb_core::id::EntityId;
///
/// let id = EntityId::from_raw(42);
/// assert_eq!(id.as_raw(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates an identifier from the raw value emitted by the parser.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Entity category.
///
/// Each category owns one identifier space, except that the two pin lists
/// share [`Category::Pin`] and the two via lists share [`Category::Via`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Instance,
    Pin,
    Net,
    Layer,
    Via,
    Rect,
    Geometry,
    Grid,
    Row,
    Site,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 10] = [
        Category::Instance,
        Category::Pin,
        Category::Net,
        Category::Layer,
        Category::Via,
        Category::Rect,
        Category::Geometry,
        Category::Grid,
        Category::Row,
        Category::Site,
    ];

    /// Returns the lowercase name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Instance => "instance",
            Self::Pin => "pin",
            Self::Net => "net",
            Self::Layer => "layer",
            Self::Via => "via",
            Self::Rect => "rect",
            Self::Geometry => "geometry",
            Self::Grid => "grid",
            Self::Row => "row",
            Self::Site => "site",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Composite identity of a record: its category plus its identifier.
///
/// # Examples
///
/// ```
/// use layoutdb_core::id::{Category, EntityId, Key};
///
/// let key = Key::new(Category::Pin, EntityId::from_raw(12));
/// assert_eq!(key.to_string(), "pin#12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    category: Category,
    id: EntityId,
}

impl Key {
    /// Creates a key from a category and an identifier.
    pub fn new(category: Category, id: EntityId) -> Self {
        Self { category, id }
    }

    /// Returns the category half of the key.
    pub fn category(self) -> Category {
        self.category
    }

    /// Returns the identifier half of the key.
    pub fn id(self) -> EntityId {
        self.id
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.category, self.id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_entity_id_roundtrip() {
        let id = EntityId::from_raw(7);
        assert_eq!(id.as_raw(), 7);
        assert_eq!(EntityId::from(7), id);
    }

    #[test]
    fn test_entity_id_serde_is_transparent() {
        let id = EntityId::from_raw(55);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "55");

        let restored: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, id);
    }

    #[test]
    fn test_keys_with_same_id_differ_by_category() {
        let id = EntityId::from_raw(3);
        let pin = Key::new(Category::Pin, id);
        let net = Key::new(Category::Net, id);

        assert_ne!(pin, net);

        let mut set = HashSet::new();
        set.insert(pin);
        set.insert(net);
        set.insert(Key::new(Category::Pin, id));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_key_display() {
        let key = Key::new(Category::Instance, EntityId::from_raw(101));
        assert_eq!(key.to_string(), "instance#101");
        assert_eq!(key.category(), Category::Instance);
        assert_eq!(key.id().as_raw(), 101);
    }

    #[test]
    fn test_category_names_are_unique() {
        let names: HashSet<_> = Category::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), Category::ALL.len());
    }
}
