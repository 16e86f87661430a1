//! CLI configuration: defaults, optionally overridden by a JSON file, then
//! by explicit flags.

use anyhow::{Context, Result};
use ontocard_catalog::CatalogConfig;
use ontocard_rdf::RdfFormat;
use ontocard_schema::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OntocardConfig {
    pub default_namespace: String,
    /// Output syntax name (`turtle`, `ntriples`, `rdfxml`).
    pub default_format: String,
    pub catalog: CatalogConfig,
}

impl Default for OntocardConfig {
    fn default() -> Self {
        Self {
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            default_format: "turtle".to_string(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl OntocardConfig {
    /// Defaults when `path` is `None`; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// `explicit` if given, else the configured default.
    pub fn format(&self, explicit: Option<RdfFormat>) -> Result<RdfFormat> {
        match explicit {
            Some(format) => Ok(format),
            None => self
                .default_format
                .parse::<RdfFormat>()
                .with_context(|| format!("config defaultFormat '{}'", self.default_format)),
        }
    }

    pub fn namespace(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .unwrap_or(&self.default_namespace)
            .to_string()
    }

    /// Namespace for a merge: flag, then the previous card's, then the
    /// configured default.
    pub fn merge_namespace(&self, explicit: Option<&str>, previous: &str) -> String {
        let previous = Some(previous).filter(|ns| !ns.trim().is_empty());
        self.namespace(explicit.filter(|ns| !ns.trim().is_empty()).or(previous))
    }
}
