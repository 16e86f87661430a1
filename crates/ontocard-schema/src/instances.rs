//! Instance-extraction contracts: what an extractor proposes per chunk, and
//! the chunk provenance used to annotate mentions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Best-effort source metadata for a chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChunkProvenance {
    #[serde(alias = "source_path", skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(alias = "page_label", skip_serializing_if = "Option::is_none")]
    pub page_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// One chunk record as stored by the ingestion collaborator. Only the fields
/// this crate needs are modeled; the rest are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChunkRecord {
    #[serde(alias = "chunk_id")]
    pub chunk_id: String,
    pub provenance: ChunkProvenance,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstanceRelation {
    pub predicate: String,
    #[serde(alias = "target_class")]
    pub target_class: String,
    #[serde(alias = "target_label", skip_serializing_if = "Option::is_none")]
    pub target_label: Option<String>,
    #[serde(alias = "target_id_hint", skip_serializing_if = "Option::is_none")]
    pub target_id_hint: Option<String>,
}

impl InstanceRelation {
    pub fn target_identity(&self) -> String {
        identity_label(self.target_label.as_deref(), self.target_id_hint.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mention {
    pub quote: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractedInstance {
    pub class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(alias = "id_hint", skip_serializing_if = "Option::is_none")]
    pub id_hint: Option<String>,
    /// Free-form attribute values, projected as literals.
    pub attributes: BTreeMap<String, serde_json::Value>,
    pub relations: Vec<InstanceRelation>,
    pub mentions: Vec<Mention>,
}

impl ExtractedInstance {
    /// Label if present, else the id hint, else empty.
    pub fn identity(&self) -> String {
        identity_label(self.label.as_deref(), self.id_hint.as_deref())
    }
}

/// All instances an extractor proposed for one chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstanceProposal {
    #[serde(alias = "chunk_id")]
    pub chunk_id: String,
    pub instances: Vec<ExtractedInstance>,
}

fn identity_label(label: Option<&str>, id_hint: Option<&str>) -> String {
    [label, id_hint]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}
