//! Card system: labels, descriptors, and the asset catalog.
//!
//! ## Key Types
//!
//! - `Label`: ground truth (kimchi or not)
//! - `AssetRef`: lazy handle to an image
//! - `CatalogEntry`: one image the game knows about
//! - `ChallengeId` / `ChallengeDescriptor`: one dealt appearance of an entry
//! - `AssetCatalog`: label-partitioned entries, built once at startup

pub mod catalog;
pub mod definition;

pub use catalog::{AssetCatalog, DEFAULT_NEGATIVE_DIR, DEFAULT_POSITIVE_DIR};
pub use definition::{AssetRef, CatalogEntry, ChallengeDescriptor, ChallengeId, Label};
