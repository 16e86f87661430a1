//! The catalog manifest (`catalog.json`) and atomic file writes.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// One registered baseline ontology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineOntologyEntry {
    pub slug: String,
    pub label: String,
    pub namespace: String,
    pub description: String,
    /// Ontology file, relative to the catalog root.
    pub path: String,
    pub tags: Vec<String>,
}

/// Manifest document: entries kept sorted by slug, one per slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogManifest {
    pub ontologies: Vec<BaselineOntologyEntry>,
}

impl CatalogManifest {
    /// Read the manifest at `path`. A missing file is an empty catalog.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no manifest yet, starting empty");
                return Ok(Self::default());
            }
            Err(e) => return Err(CatalogError::io(path, e)),
        };
        let mut manifest: Self = serde_json::from_str(&text).map_err(|source| CatalogError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
        manifest.sort();
        Ok(manifest)
    }

    /// Write the manifest as pretty JSON, atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| CatalogError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
        write_atomic(path, json.as_bytes())
    }

    pub fn get(&self, slug: &str) -> Option<&BaselineOntologyEntry> {
        self.ontologies.iter().find(|e| e.slug == slug)
    }

    /// Replace any entry with the same slug, then restore slug order.
    pub fn upsert(&mut self, entry: BaselineOntologyEntry) {
        self.ontologies.retain(|e| e.slug != entry.slug);
        self.ontologies.push(entry);
        self.sort();
    }

    fn sort(&mut self) {
        self.ontologies.sort_by(|a, b| a.slug.cmp(&b.slug));
    }
}

/// Write `bytes` to `path` through a sibling temp file and a rename, so
/// readers see either the old or the new content.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| CatalogError::io(dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| CatalogError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| CatalogError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| CatalogError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| CatalogError::io(path, e.error))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(slug: &str) -> BaselineOntologyEntry {
        BaselineOntologyEntry {
            slug: slug.into(),
            label: slug.to_uppercase(),
            path: format!("{slug}.ttl"),
            ..Default::default()
        }
    }

    #[test]
    fn upsert_replaces_and_keeps_slug_order() {
        let mut m = CatalogManifest::default();
        m.upsert(entry("schema"));
        m.upsert(entry("dc"));
        m.upsert(entry("foaf"));
        let mut again = entry("dc");
        again.label = "Dublin Core".into();
        m.upsert(again);

        let slugs: Vec<_> = m.ontologies.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["dc", "foaf", "schema"]);
        assert_eq!(m.get("dc").map(|e| e.label.as_str()), Some("Dublin Core"));
    }

    #[test]
    fn missing_manifest_loads_empty_and_save_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.json");
        assert_eq!(CatalogManifest::load(&path).unwrap(), CatalogManifest::default());

        let mut m = CatalogManifest::default();
        m.upsert(entry("foaf"));
        m.save(&path).unwrap();
        assert_eq!(CatalogManifest::load(&path).unwrap(), m);
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            CatalogManifest::load(&path),
            Err(CatalogError::Manifest { .. })
        ));
    }

    #[test]
    fn unsorted_manifest_on_disk_is_sorted_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"ontologies":[{"slug":"b","path":"b.ttl"},{"slug":"a","path":"a.ttl"}]}"#,
        )
        .unwrap();
        let m = CatalogManifest::load(&path).unwrap();
        assert_eq!(m.ontologies[0].slug, "a");
        assert!(m.ontologies[1].tags.is_empty());
    }
}
