//! Asset catalog: every image the game can deal, split by label.
//!
//! The catalog is built once at startup and is read-only afterwards;
//! sessions share it behind an `Arc`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::definition::{AssetRef, CatalogEntry, Label};
use crate::core::CatalogError;

/// Directory holding kimchi categories in the shipped asset tree.
pub const DEFAULT_POSITIVE_DIR: &str = "김치";

/// Directory holding everything else.
pub const DEFAULT_NEGATIVE_DIR: &str = "노김치";

/// Image extensions picked up by `AssetCatalog::scan` (case-insensitive).
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

const GENERIC_KIMCHI_DESCRIPTION: &str = "A tasty kimchi!";

/// Description shown for a kimchi category.
///
/// Varieties in the shipped asset tree have their own text; anything else
/// gets a generic one.
#[must_use]
pub fn describe_kimchi(name: &str) -> String {
    let text = match name {
        "배추김치" => "The most iconic kimchi: salted napa cabbage tossed with radish, scallion, chili flakes, garlic and ginger.",
        "깍두기" => "Cubed radish, salted and seasoned with chili flakes, scallion and garlic.",
        "총각김치" => "Ponytail radish pickled with its greens attached, prized for its crunch.",
        "파김치" => "Green onion kimchi seasoned with anchovy sauce and chili, with a distinctive aroma.",
        "오이소박이" => "Cucumbers slit lengthwise and stuffed with seasoning; cool and refreshing.",
        "열무김치" => "Young summer radish in a light, chilled brine; a summertime favorite.",
        "백김치" => "White kimchi made without chili, mild, clean and refreshing.",
        "부추김치" => "Garlic chives with savory fermented seafood seasoning.",
        "나박김치" => "Thinly sliced radish and cabbage in a shallow, lightly seasoned water kimchi.",
        "갓김치" => "Mustard leaf kimchi with a sharp bite and a distinctive fragrance.",
        _ => GENERIC_KIMCHI_DESCRIPTION,
    };
    text.to_string()
}

/// Description shown for a non-kimchi category.
#[must_use]
pub fn describe_not_kimchi(name: &str) -> String {
    format!("This is not kimchi, it is \"{name}\".")
}

/// Catalog of challenge images partitioned by label.
///
/// ## Example
///
/// ```
/// use std::path::PathBuf;
/// use kimchi_sort::cards::{AssetCatalog, AssetRef, CatalogEntry, Label};
///
/// let mut catalog = AssetCatalog::new();
/// catalog.add(CatalogEntry::new("깍두기", Label::Kimchi, "radish", AssetRef::Path(PathBuf::from("a.jpg"))));
/// catalog.add(CatalogEntry::new("pizza", Label::NotKimchi, "not kimchi", AssetRef::Path(PathBuf::from("b.jpg"))));
///
/// assert_eq!(catalog.pool(Label::Kimchi).len(), 1);
/// assert_eq!(catalog.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct AssetCatalog {
    positives: Vec<CatalogEntry>,
    negatives: Vec<CatalogEntry>,
}

impl AssetCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to the pool matching its label.
    pub fn add(&mut self, entry: CatalogEntry) {
        match entry.label {
            Label::Kimchi => self.positives.push(entry),
            Label::NotKimchi => self.negatives.push(entry),
        }
    }

    /// Add an entry (builder pattern).
    #[must_use]
    pub fn with_entry(mut self, entry: CatalogEntry) -> Self {
        self.add(entry);
        self
    }

    /// Kimchi entries.
    #[must_use]
    pub fn positives(&self) -> &[CatalogEntry] {
        &self.positives
    }

    /// Not-kimchi entries.
    #[must_use]
    pub fn negatives(&self) -> &[CatalogEntry] {
        &self.negatives
    }

    /// Entries carrying `label`.
    #[must_use]
    pub fn pool(&self, label: Label) -> &[CatalogEntry] {
        match label {
            Label::Kimchi => &self.positives,
            Label::NotKimchi => &self.negatives,
        }
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positives.len() + self.negatives.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all entries, positives first.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.positives.iter().chain(self.negatives.iter())
    }

    /// Scan an asset tree laid out as `root/<label dir>/<category>/<image>`.
    ///
    /// Category directory names become display names. Asset paths are stored
    /// relative to `root`. A missing label directory yields an empty pool.
    pub fn scan(
        root: impl AsRef<Path>,
        positive_dir: &str,
        negative_dir: &str,
    ) -> Result<Self, CatalogError> {
        let root = root.as_ref();
        let mut catalog = Self::new();

        for (dir, label) in [(positive_dir, Label::Kimchi), (negative_dir, Label::NotKimchi)] {
            let label_root = root.join(dir);
            if !label_root.is_dir() {
                warn!("asset directory {} missing, {} pool is empty", label_root.display(), label);
                continue;
            }

            for category in sorted_entries(&label_root)? {
                if !category.is_dir() {
                    continue;
                }
                let Some(name) = category.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let description = match label {
                    Label::Kimchi => describe_kimchi(name),
                    Label::NotKimchi => describe_not_kimchi(name),
                };

                for image in sorted_entries(&category)? {
                    if !image.is_file() || !is_image(&image) {
                        continue;
                    }
                    let relative = image.strip_prefix(root).unwrap_or(&image).to_path_buf();
                    catalog.add(CatalogEntry::new(
                        name,
                        label,
                        description.clone(),
                        AssetRef::Path(relative),
                    ));
                }
            }
        }

        debug!(
            "scanned {}: {} kimchi, {} not-kimchi",
            root.display(),
            catalog.positives.len(),
            catalog.negatives.len()
        );
        Ok(catalog)
    }

    /// Scan using the shipped label directory names.
    pub fn scan_default(root: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::scan(root, DEFAULT_POSITIVE_DIR, DEFAULT_NEGATIVE_DIR)
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let io_err = |source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        paths.push(entry.map_err(io_err)?.path());
    }
    paths.sort();
    Ok(paths)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, label: Label) -> CatalogEntry {
        CatalogEntry::new(name, label, "", AssetRef::Path(PathBuf::from(format!("{name}.jpg"))))
    }

    #[test]
    fn test_add_partitions_by_label() {
        let catalog = AssetCatalog::new()
            .with_entry(entry("a", Label::Kimchi))
            .with_entry(entry("b", Label::NotKimchi))
            .with_entry(entry("c", Label::Kimchi));

        assert_eq!(catalog.positives().len(), 2);
        assert_eq!(catalog.negatives().len(), 1);
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());

        let names: Vec<_> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_descriptions() {
        assert!(describe_kimchi("깍두기").contains("radish"));
        assert_eq!(describe_kimchi("unknown"), GENERIC_KIMCHI_DESCRIPTION);
        assert_eq!(describe_not_kimchi("pizza"), "This is not kimchi, it is \"pizza\".");
    }

    #[test]
    fn test_every_shipped_variety_has_its_own_description() {
        let varieties = [
            "배추김치", "깍두기", "총각김치", "파김치", "오이소박이",
            "열무김치", "백김치", "부추김치", "나박김치", "갓김치",
        ];
        let mut texts: Vec<String> = varieties.iter().map(|name| describe_kimchi(name)).collect();
        assert!(texts.iter().all(|t| t != GENERIC_KIMCHI_DESCRIPTION));
        texts.sort();
        texts.dedup();
        assert_eq!(texts.len(), varieties.len());
    }

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("x/a.JPG")));
        assert!(is_image(Path::new("x/a.jpeg")));
        assert!(is_image(Path::new("x/a.gif")));
        assert!(!is_image(Path::new("x/a.txt")));
        assert!(!is_image(Path::new("x/noext")));
    }

    #[test]
    fn test_scan_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("김치/깍두기")).unwrap();
        fs::create_dir_all(root.join("노김치/pizza")).unwrap();
        fs::write(root.join("김치/깍두기/1.jpg"), b"x").unwrap();
        fs::write(root.join("김치/깍두기/2.PNG"), b"x").unwrap();
        fs::write(root.join("김치/깍두기/notes.txt"), b"x").unwrap();
        fs::write(root.join("김치/stray.jpg"), b"x").unwrap();
        fs::write(root.join("노김치/pizza/p.gif"), b"x").unwrap();

        let catalog = AssetCatalog::scan_default(root).unwrap();

        assert_eq!(catalog.positives().len(), 2);
        assert_eq!(catalog.negatives().len(), 1);
        assert_eq!(catalog.positives()[0].name, "깍두기");
        assert_eq!(
            catalog.positives()[0].asset,
            AssetRef::Path(PathBuf::from("김치/깍두기/1.jpg"))
        );
        assert_eq!(catalog.negatives()[0].description, "This is not kimchi, it is \"pizza\".");
    }

    #[test]
    fn test_scan_missing_label_dir_is_empty_pool() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("yes/a")).unwrap();
        fs::write(dir.path().join("yes/a/1.jpg"), b"x").unwrap();

        let catalog = AssetCatalog::scan(dir.path(), "yes", "no").unwrap();
        assert_eq!(catalog.positives().len(), 1);
        assert!(catalog.negatives().is_empty());
    }
}
