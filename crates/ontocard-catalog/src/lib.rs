//! Baseline ontology catalog.
//!
//! ```text
//!   <root>/
//!     catalog.json      manifest: [{slug, label, namespace, description, path, tags}]
//!     <slug>.ttl        one Turtle file per registered ontology
//!
//!   register(slug, content) ──parse──► <slug>.ttl + manifest upsert
//!   compose([slug…]) ──extract each──► first-seen-wins ──► seed SchemaCard
//! ```
//!
//! Baseline cards are never cached: every read re-extracts from the stored
//! Turtle, so the file on disk is the only source of truth.
//!
//! ## Concurrency
//!
//! Writes through one [`OntologyCatalog`] handle are serialized by an
//! in-process lock, and every file is replaced atomically (temp file plus
//! rename), so concurrent readers never see a torn manifest. Two processes
//! writing the same catalog must coordinate externally.

pub mod compose;
pub mod config;
pub mod error;
pub mod manifest;

#[cfg(test)]
mod tests;

pub use compose::compose_cards;
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use manifest::{BaselineOntologyEntry, CatalogManifest};

use chrono::{DateTime, Utc};
use manifest::write_atomic;
use ontocard_rdf::{extract_schema_card, guess_namespace, RdfFormat, RdfSyntax, SophiaSyntax};
use ontocard_schema::card::dedup_warnings;
use ontocard_schema::origin::INDUCED_MARKER;
use ontocard_schema::{Origin, SchemaCard};
use parking_lot::Mutex;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("valid regex"));

// ============================================================================
// Requests and reports
// ============================================================================

/// Input to [`OntologyCatalog::register`].
#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    pub slug: String,
    pub content: String,
    pub format: RdfFormat,
    /// Defaults to the slug.
    pub label: Option<String>,
    pub description: Option<String>,
    /// Inferred from the content when `None`.
    pub namespace: Option<String>,
    pub tags: Vec<String>,
}

impl RegisterRequest {
    pub fn new(slug: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn format(mut self, format: RdfFormat) -> Self {
        self.format = format;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCounts {
    pub classes: usize,
    pub datatype_properties: usize,
    pub object_properties: usize,
}

impl CardCounts {
    pub fn of(card: &SchemaCard) -> Self {
        Self {
            classes: card.classes.len(),
            datatype_properties: card.datatype_properties.len(),
            object_properties: card.object_properties.len(),
        }
    }
}

/// A baseline's extracted card with its manifest metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub slug: String,
    pub label: String,
    pub namespace: String,
    pub counts: CardCounts,
    pub card: SchemaCard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMatch {
    pub ontology: String,
    pub class: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Datatype,
    Object,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMatch {
    pub ontology: String,
    pub property: String,
    pub kind: PropertyKind,
    pub domain: String,
    pub range: String,
    pub description: String,
}

// ============================================================================
// Catalog
// ============================================================================

/// Handle on a catalog directory.
pub struct OntologyCatalog<S = SophiaSyntax> {
    config: CatalogConfig,
    syntax: S,
    write_lock: Mutex<()>,
}

impl OntologyCatalog<SophiaSyntax> {
    pub fn new(config: CatalogConfig) -> Self {
        Self::with_syntax(config, SophiaSyntax::new())
    }
}

impl<S: RdfSyntax> OntologyCatalog<S> {
    pub fn with_syntax(config: CatalogConfig, syntax: S) -> Self {
        Self {
            config,
            syntax,
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn manifest(&self) -> Result<CatalogManifest> {
        CatalogManifest::load(&self.config.manifest_path())
    }

    /// Validate, store, and upsert an ontology.
    ///
    /// Nothing touches the disk until the slug is valid and the content
    /// parses. Content in another syntax is stored re-serialized as Turtle.
    pub fn register(&self, request: RegisterRequest) -> Result<BaselineOntologyEntry> {
        let slug = validate_slug(&request.slug)?;
        if request.content.trim().is_empty() {
            return Err(CatalogError::EmptyContent(slug));
        }

        let graph = self
            .syntax
            .parse(&request.content, request.format)
            .map_err(|e| CatalogError::rdf(&slug, e))?;
        let turtle = match request.format {
            RdfFormat::Turtle => request.content.clone(),
            _ => self
                .syntax
                .serialize(&graph, RdfFormat::Turtle)
                .map_err(|e| CatalogError::rdf(&slug, e))?,
        };
        let namespace = match request.namespace {
            Some(ns) => ns.trim().to_string(),
            None => {
                let guessed = guess_namespace(&graph).unwrap_or_default();
                tracing::debug!(slug = %slug, namespace = %guessed, "inferred baseline namespace");
                guessed
            }
        };

        let entry = BaselineOntologyEntry {
            label: request
                .label
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| slug.clone()),
            namespace,
            description: request.description.unwrap_or_default(),
            path: format!("{slug}.{}", RdfFormat::Turtle.extension()),
            tags: request.tags,
            slug,
        };

        let _guard = self.write_lock.lock();
        let mut manifest = self.manifest()?;
        write_atomic(&self.config.ontology_path(&entry.path), turtle.as_bytes())?;
        manifest.upsert(entry.clone());
        manifest.save(&self.config.manifest_path())?;

        tracing::info!(
            slug = %entry.slug,
            namespace = %entry.namespace,
            triples = graph.len(),
            format = %request.format,
            "registered baseline ontology"
        );
        Ok(entry)
    }

    pub fn list(&self) -> Result<Vec<BaselineOntologyEntry>> {
        Ok(self.manifest()?.ontologies)
    }

    pub fn entry(&self, slug: &str) -> Result<Option<BaselineOntologyEntry>> {
        Ok(self.manifest()?.get(slug).cloned())
    }

    /// Extract the schema card of a registered baseline. Every item carries
    /// the entry's slug as origin.
    pub fn baseline_card(&self, entry: &BaselineOntologyEntry) -> Result<SchemaCard> {
        let path = self.config.ontology_path(&entry.path);
        let text = std::fs::read_to_string(&path).map_err(|e| CatalogError::io(&path, e))?;
        let format = RdfFormat::from_path(&path).unwrap_or_default();
        let graph = self
            .syntax
            .parse(&text, format)
            .map_err(|e| CatalogError::rdf(&entry.slug, e))?;
        Ok(extract_schema_card(
            &graph,
            &Origin::baseline(entry.slug.as_str()),
            Some(&entry.namespace),
        ))
    }

    pub fn inspect(&self, slug: &str) -> Result<Inspection> {
        let entry = self
            .entry(slug)?
            .ok_or_else(|| CatalogError::UnknownSlug(slug.to_string()))?;
        let card = self.baseline_card(&entry)?;
        Ok(Inspection {
            counts: CardCounts::of(&card),
            slug: entry.slug,
            label: entry.label,
            namespace: entry.namespace,
            card,
        })
    }

    /// Classes whose name or description contains `query`, ignoring case.
    pub fn search_classes(&self, query: &str) -> Result<Vec<ClassMatch>> {
        let needle = normalize_query(query)?;
        let mut hits = Vec::new();
        for entry in self.list()? {
            let card = self.baseline_card(&entry)?;
            hits.extend(
                card.classes
                    .into_iter()
                    .filter(|c| contains_ci(&c.name, &needle) || contains_ci(&c.description, &needle))
                    .map(|c| ClassMatch {
                        ontology: entry.slug.clone(),
                        class: c.name,
                        description: c.description,
                    }),
            );
        }
        tracing::debug!(query = %needle, hits = hits.len(), "searched baseline classes");
        Ok(hits)
    }

    /// Properties of either kind whose name, domain, range, or description
    /// contains `query`, ignoring case. Datatype properties come first
    /// within each ontology.
    pub fn search_properties(&self, query: &str) -> Result<Vec<PropertyMatch>> {
        let needle = normalize_query(query)?;
        let mut hits = Vec::new();
        for entry in self.list()? {
            let card = self.baseline_card(&entry)?;
            let datatype = card.datatype_properties.into_iter().map(|p| PropertyMatch {
                ontology: entry.slug.clone(),
                property: p.name,
                kind: PropertyKind::Datatype,
                domain: p.domain,
                range: p.range.as_str().to_string(),
                description: p.description,
            });
            let object = card.object_properties.into_iter().map(|p| PropertyMatch {
                ontology: entry.slug.clone(),
                property: p.name,
                kind: PropertyKind::Object,
                domain: p.domain,
                range: p.range,
                description: p.description,
            });
            hits.extend(datatype.chain(object).filter(|m| {
                let haystack = format!("{} {} {} {}", m.property, m.domain, m.range, m.description);
                contains_ci(&haystack, &needle)
            }));
        }
        tracing::debug!(query = %needle, hits = hits.len(), "searched baseline properties");
        Ok(hits)
    }

    pub fn compose<T: AsRef<str>>(&self, slugs: &[T], target_namespace: Option<&str>) -> Result<SchemaCard> {
        self.compose_at(slugs, target_namespace, Utc::now())
    }

    /// Compose the named baselines in order. Unknown slugs become card
    /// warnings; composition carries on with the rest.
    pub fn compose_at<T: AsRef<str>>(
        &self,
        slugs: &[T],
        target_namespace: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SchemaCard> {
        let manifest = self.manifest()?;
        let mut warnings = Vec::new();
        let mut cards = Vec::new();
        for slug in slugs.iter().map(AsRef::as_ref) {
            match manifest.get(slug) {
                Some(entry) => cards.push(self.baseline_card(entry)?),
                None => {
                    tracing::warn!(slug, "baseline not found in catalog");
                    warnings.push(format!("Baseline '{slug}' not found in catalog."));
                }
            }
        }

        let mut card = compose_cards(cards, target_namespace, now);
        card.warnings = dedup_warnings(card.warnings.iter().chain(warnings.iter()));
        Ok(card)
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Trimmed slug, if usable as a file stem and not reserved.
pub fn validate_slug(slug: &str) -> Result<String> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(CatalogError::EmptySlug);
    }
    if !SLUG_PATTERN.is_match(slug) {
        return Err(CatalogError::InvalidSlug(slug.to_string()));
    }
    if slug.eq_ignore_ascii_case(INDUCED_MARKER) {
        return Err(CatalogError::ReservedSlug(slug.to_string()));
    }
    Ok(slug.to_string())
}

fn normalize_query(query: &str) -> Result<String> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return Err(CatalogError::EmptyQuery);
    }
    Ok(q)
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
