//! Aggregated proposal document: the deduplicated union of many chunk-level
//! LLM proposals for one document, ready to be merged into a schema card.

use crate::card::AliasGroup;
use crate::origin::Origin;
use serde::{Deserialize, Serialize};

/// A verbatim justification for a proposed entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvidenceItem {
    #[serde(alias = "chunk_id")]
    pub chunk_id: String,
    pub quote: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposedClass {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    pub evidence: Vec<EvidenceItem>,
}

/// Datatype property as proposed. The range is kept raw here; the merger
/// canonicalizes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposedDatatypeProperty {
    pub domain: String,
    pub name: String,
    pub range: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    pub evidence: Vec<EvidenceItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposedObjectProperty {
    pub domain: String,
    pub name: String,
    pub range: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    pub evidence: Vec<EvidenceItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposedEvent {
    pub name: String,
    pub actors: Vec<String>,
    pub effects: Vec<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    pub evidence: Vec<EvidenceItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AggregatedProposal {
    pub classes: Vec<ProposedClass>,
    #[serde(alias = "datatype_properties")]
    pub datatype_properties: Vec<ProposedDatatypeProperty>,
    #[serde(alias = "object_properties")]
    pub object_properties: Vec<ProposedObjectProperty>,
    pub events: Vec<ProposedEvent>,
    /// Raw alias candidates, concatenated across chunks (not deduplicated).
    #[serde(alias = "merge_suggestions")]
    pub merge_suggestions: Vec<AliasGroup>,
    pub warnings: Vec<String>,
}

impl AggregatedProposal {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.datatype_properties.is_empty()
            && self.object_properties.is_empty()
            && self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_snake_case_documents() {
        let doc = r#"{
            "classes": [{"name": "Order", "evidence": [{"chunk_id": "c1", "quote": "an order"}]}],
            "datatype_properties": [{"domain": "Order", "name": "total", "range": "Decimal"}],
            "merge_suggestions": [{"names": ["Order", "PurchaseOrder"], "rationale": "same"}]
        }"#;
        let p: AggregatedProposal = serde_json::from_str(doc).unwrap();
        assert_eq!(p.classes[0].evidence[0].chunk_id, "c1");
        assert_eq!(p.datatype_properties[0].range, "Decimal");
        assert_eq!(p.merge_suggestions.len(), 1);
        assert!(p.classes[0].origin.is_none());
    }
}
