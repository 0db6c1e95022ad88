//! Challenge descriptors - the not-yet-loaded form of a card.
//!
//! A `CatalogEntry` is one image on disk (or behind a URL) with its ground
//! truth. A `ChallengeDescriptor` is one appearance of an entry in a deck:
//! the same entry may appear many times, each under its own `ChallengeId`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Unique identifier for one challenge in a deck.
///
/// Identities are synthetic: reusing an asset yields a new id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChallengeId(pub u64);

impl ChallengeId {
    /// Create a new challenge ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Challenge({})", self.0)
    }
}

/// Ground-truth label of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Kimchi,
    NotKimchi,
}

impl Label {
    /// Label for an `is_positive` flag.
    #[must_use]
    pub const fn from_positive(is_positive: bool) -> Self {
        if is_positive {
            Label::Kimchi
        } else {
            Label::NotKimchi
        }
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Label::Kimchi)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Kimchi => f.write_str("kimchi"),
            Label::NotKimchi => f.write_str("not-kimchi"),
        }
    }
}

/// Lazy handle to a challenge's image; resolved by a `ChallengeLoader`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetRef {
    /// Path relative to the loader's asset root.
    Path(PathBuf),
    /// Absolute URL.
    Url(String),
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetRef::Path(path) => write!(f, "{}", path.display()),
            AssetRef::Url(url) => f.write_str(url),
        }
    }
}

/// One image known to the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display name (the category the image belongs to).
    pub name: String,

    /// Ground truth.
    pub label: Label,

    /// Human-readable explanation shown after a mistake.
    pub description: String,

    /// Where the image lives.
    pub asset: AssetRef,
}

impl CatalogEntry {
    /// Create a new catalog entry.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        label: Label,
        description: impl Into<String>,
        asset: AssetRef,
    ) -> Self {
        Self {
            name: name.into(),
            label,
            description: description.into(),
            asset,
        }
    }
}

/// A challenge as dealt into a deck. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeDescriptor {
    pub id: ChallengeId,
    pub name: String,
    pub is_positive: bool,
    pub description: String,
    pub asset: AssetRef,
}

impl ChallengeDescriptor {
    /// Deal `entry` under the identity `id`.
    #[must_use]
    pub fn from_entry(id: ChallengeId, entry: &CatalogEntry) -> Self {
        Self {
            id,
            name: entry.name.clone(),
            is_positive: entry.label.is_positive(),
            description: entry.description.clone(),
            asset: entry.asset.clone(),
        }
    }

    #[must_use]
    pub fn label(&self) -> Label {
        Label::from_positive(self.is_positive)
    }
}
