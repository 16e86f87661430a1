use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where a catalog lives on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogConfig {
    /// Directory holding the manifest and one `<slug>.ttl` per ontology.
    pub root: PathBuf,
    /// Manifest file name, relative to `root`.
    pub manifest_file: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./data/ontologies"),
            manifest_file: "catalog.json".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Default layout under `root`.
    pub fn at(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest_file)
    }

    /// Resolve a manifest-relative ontology path.
    pub fn ontology_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}
