//! Proposal aggregation: N chunk proposals → one document-level proposal.
//!
//! ```text
//! chunk 1 ──┐
//! chunk 2 ──┼──► fold into dedup maps ──► sort ──► AggregatedProposal
//! chunk N ──┘    (classes by name, properties by (domain, name, range),
//!                 events by name; evidence unioned as a set)
//! ```
//!
//! Aggregation never fails. Entries missing a required field, or that are not
//! objects at all, are skipped.
//!
//! The surviving *sets* are independent of input order. Which casing of a
//! name survives is first-seen; descriptions follow the longer-wins rule and
//! evidence is sorted, so the remaining order sensitivity is limited to
//! equal-length description ties.

use crate::raw::{
    alias_suggestion, as_list, field, normalize_evidence, origin_field, text_field, text_list,
    value_text,
};
use ontocard_schema::card::{dedup_warnings, merge_description, name_key, property_key, union_sorted};
use ontocard_schema::{
    AggregatedProposal, AliasGroup, EvidenceItem, ProposedClass, ProposedDatatypeProperty,
    ProposedEvent, ProposedObjectProperty,
};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

type PropertyKey = (String, String, String);

/// Incremental aggregator. Feed chunk proposals with [`fold`](Self::fold),
/// then call [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct ProposalAggregator {
    classes: BTreeMap<String, ProposedClass>,
    datatype_properties: BTreeMap<PropertyKey, ProposedDatatypeProperty>,
    object_properties: BTreeMap<PropertyKey, ProposedObjectProperty>,
    events: BTreeMap<String, ProposedEvent>,
    merge_suggestions: Vec<AliasGroup>,
    warnings: Vec<String>,
    chunks_seen: usize,
    skipped: usize,
}

impl ProposalAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk proposal into the running state.
    pub fn fold(&mut self, chunk: &Value) {
        if !chunk.is_object() {
            tracing::warn!("skipping chunk proposal that is not a JSON object");
            self.skipped += 1;
            return;
        }
        self.chunks_seen += 1;

        let chunk_id = text_field(chunk, &["chunkId", "chunk_id"]);

        self.warnings.extend(
            as_list(field(chunk, &["warnings"]))
                .into_iter()
                .map(value_text),
        );
        self.merge_suggestions.extend(
            as_list(field(
                chunk,
                &["aliasOrMergeSuggestions", "alias_or_merge_suggestions"],
            ))
            .into_iter()
            .filter_map(alias_suggestion),
        );

        let Some(additions) = field(chunk, &["proposedAdditions", "proposed_additions"]) else {
            return;
        };

        for c in as_list(field(additions, &["classes"])) {
            self.fold_class(c, &chunk_id);
        }
        for p in as_list(field(additions, &["datatypeProperties", "datatype_properties"])) {
            self.fold_datatype_property(p, &chunk_id);
        }
        for p in as_list(field(additions, &["objectProperties", "object_properties"])) {
            self.fold_object_property(p, &chunk_id);
        }
        for e in as_list(field(additions, &["events"])) {
            self.fold_event(e, &chunk_id);
        }
    }

    fn fold_class(&mut self, raw: &Value, chunk_id: &str) {
        let name = text_field(raw, &["name"]);
        if !raw.is_object() || name.is_empty() {
            self.skipped += 1;
            return;
        }
        let description = text_field(raw, &["description"]);
        let evidence = normalize_evidence(field(raw, &["evidence"]), chunk_id);

        match self.classes.get_mut(&name_key(&name)) {
            Some(existing) => {
                existing.description = merge_description(&existing.description, &description);
                existing.evidence.extend(evidence);
            }
            None => {
                self.classes.insert(
                    name_key(&name),
                    ProposedClass {
                        name,
                        description,
                        origin: origin_field(raw),
                        evidence,
                    },
                );
            }
        }
    }

    fn fold_datatype_property(&mut self, raw: &Value, chunk_id: &str) {
        let Some((domain, name, range)) = property_triple(raw) else {
            self.skipped += 1;
            return;
        };
        let description = text_field(raw, &["description"]);
        let evidence = normalize_evidence(field(raw, &["evidence"]), chunk_id);
        let key = property_key(&domain, &name, &range);

        match self.datatype_properties.get_mut(&key) {
            Some(existing) => {
                existing.description = merge_description(&existing.description, &description);
                existing.evidence.extend(evidence);
            }
            None => {
                self.datatype_properties.insert(
                    key,
                    ProposedDatatypeProperty {
                        domain,
                        name,
                        range,
                        description,
                        origin: origin_field(raw),
                        evidence,
                    },
                );
            }
        }
    }

    fn fold_object_property(&mut self, raw: &Value, chunk_id: &str) {
        let Some((domain, name, range)) = property_triple(raw) else {
            self.skipped += 1;
            return;
        };
        let description = text_field(raw, &["description"]);
        let evidence = normalize_evidence(field(raw, &["evidence"]), chunk_id);
        let key = property_key(&domain, &name, &range);

        match self.object_properties.get_mut(&key) {
            Some(existing) => {
                existing.description = merge_description(&existing.description, &description);
                existing.evidence.extend(evidence);
            }
            None => {
                self.object_properties.insert(
                    key,
                    ProposedObjectProperty {
                        domain,
                        name,
                        range,
                        description,
                        origin: origin_field(raw),
                        evidence,
                    },
                );
            }
        }
    }

    fn fold_event(&mut self, raw: &Value, chunk_id: &str) {
        let name = text_field(raw, &["name"]);
        if !raw.is_object() || name.is_empty() {
            self.skipped += 1;
            return;
        }
        let actors = text_list(raw, &["actors"]);
        let effects = text_list(raw, &["effects"]);
        let description = text_field(raw, &["description"]);
        let evidence = normalize_evidence(field(raw, &["evidence"]), chunk_id);

        let entry = self
            .events
            .entry(name_key(&name))
            .or_insert_with(|| ProposedEvent {
                name,
                origin: origin_field(raw),
                ..Default::default()
            });
        entry.actors = union_sorted(&entry.actors, &actors);
        entry.effects = union_sorted(&entry.effects, &effects);
        entry.description = merge_description(&entry.description, &description);
        entry.evidence.extend(evidence);
    }

    /// Produce the aggregated proposal with deterministic ordering.
    pub fn finish(self) -> AggregatedProposal {
        let out = AggregatedProposal {
            classes: self
                .classes
                .into_values()
                .map(|mut c| {
                    c.evidence = dedup_evidence(c.evidence);
                    c
                })
                .collect(),
            datatype_properties: self
                .datatype_properties
                .into_values()
                .map(|mut p| {
                    p.evidence = dedup_evidence(p.evidence);
                    p
                })
                .collect(),
            object_properties: self
                .object_properties
                .into_values()
                .map(|mut p| {
                    p.evidence = dedup_evidence(p.evidence);
                    p
                })
                .collect(),
            events: self
                .events
                .into_values()
                .map(|mut e| {
                    e.evidence = dedup_evidence(e.evidence);
                    e
                })
                .collect(),
            merge_suggestions: self.merge_suggestions,
            warnings: dedup_warnings(self.warnings),
        };

        tracing::info!(
            chunks = self.chunks_seen,
            skipped = self.skipped,
            classes = out.classes.len(),
            datatype_properties = out.datatype_properties.len(),
            object_properties = out.object_properties.len(),
            events = out.events.len(),
            warnings = out.warnings.len(),
            "aggregated chunk proposals"
        );
        tracing::debug!(
            classes = ?out.classes.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            "aggregated classes"
        );

        out
    }
}

/// Aggregate a finite list of chunk proposals.
pub fn aggregate_chunk_proposals<'a, I>(chunks: I) -> AggregatedProposal
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut aggregator = ProposalAggregator::new();
    for chunk in chunks {
        aggregator.fold(chunk);
    }
    aggregator.finish()
}

/// `(domain, name, range)` when all three are present and non-empty.
fn property_triple(raw: &Value) -> Option<(String, String, String)> {
    if !raw.is_object() {
        return None;
    }
    let domain = text_field(raw, &["domain"]);
    let name = text_field(raw, &["name"]);
    let range = text_field(raw, &["range"]);
    if domain.is_empty() || name.is_empty() || range.is_empty() {
        return None;
    }
    Some((domain, name, range))
}

fn dedup_evidence(items: Vec<EvidenceItem>) -> Vec<EvidenceItem> {
    items
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chunk(id: &str, additions: Value) -> Value {
        json!({"chunk_id": id, "proposed_additions": additions})
    }

    #[test]
    fn same_class_in_two_chunks_keeps_first_casing_and_longer_description() {
        let chunks = vec![
            chunk(
                "c1",
                json!({"classes": [{"name": "Person", "description": "A human."}]}),
            ),
            chunk(
                "c2",
                json!({"classes": [{"name": "person", "description": "A human being, identified by name."}]}),
            ),
        ];
        let out = aggregate_chunk_proposals(&chunks);
        assert_eq!(out.classes.len(), 1);
        assert_eq!(out.classes[0].name, "Person");
        assert_eq!(
            out.classes[0].description,
            "A human being, identified by name."
        );
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let chunks = vec![
            json!("not an object"),
            chunk(
                "c1",
                json!({
                    "classes": ["garbage", {"description": "no name"}, {"name": "Order"}],
                    "datatypeProperties": [
                        {"domain": "Order", "name": "total"},
                        {"domain": "Order", "name": "total", "range": "number"},
                        7
                    ],
                    "object_properties": {"domain": "Order", "name": "hasItem", "range": "LineItem"},
                    "events": [{"name": ""}, {"name": "OrderPlaced", "actors": "Customer"}]
                }),
            ),
        ];
        let out = aggregate_chunk_proposals(&chunks);
        assert_eq!(out.classes.len(), 1);
        assert_eq!(out.datatype_properties.len(), 1);
        assert_eq!(out.object_properties.len(), 1);
        assert_eq!(out.events.len(), 1);
        assert_eq!(out.events[0].actors, vec!["Customer".to_string()]);
    }

    #[test]
    fn properties_dedup_on_case_insensitive_triple() {
        let chunks = vec![
            chunk(
                "c1",
                json!({"datatype_properties": [{"domain": "Order", "name": "total", "range": "Number"}]}),
            ),
            chunk(
                "c2",
                json!({"datatype_properties": [
                    {"domain": "order", "name": "TOTAL", "range": "number", "description": "Grand total"},
                    {"domain": "Order", "name": "total", "range": "integer"}
                ]}),
            ),
        ];
        let out = aggregate_chunk_proposals(&chunks);
        assert_eq!(out.datatype_properties.len(), 2);
        let number = out
            .datatype_properties
            .iter()
            .find(|p| p.range.eq_ignore_ascii_case("number"))
            .unwrap();
        assert_eq!(number.domain, "Order");
        assert_eq!(number.description, "Grand total");
    }

    #[test]
    fn evidence_is_unioned_and_defaults_to_chunk_id() {
        let chunks = vec![
            chunk(
                "c1",
                json!({"classes": [{"name": "Order", "evidence": ["an order", {"quote": "an order"}]}]}),
            ),
            chunk(
                "c2",
                json!({"classes": [{"name": "ORDER", "evidence": [{"chunk_id": "c1", "quote": "an order"}, "placed"]}]}),
            ),
        ];
        let out = aggregate_chunk_proposals(&chunks);
        let evidence: Vec<(&str, &str)> = out.classes[0]
            .evidence
            .iter()
            .map(|e| (e.chunk_id.as_str(), e.quote.as_str()))
            .collect();
        assert_eq!(evidence, vec![("c1", "an order"), ("c2", "placed")]);
    }

    #[test]
    fn events_union_actors_and_effects_sorted() {
        let chunks = vec![
            chunk(
                "c1",
                json!({"events": [{"name": "Shipment", "actors": ["Carrier", "Warehouse"], "effects": ["Shipped"]}]}),
            ),
            chunk(
                "c2",
                json!({"events": [{"name": "shipment", "actors": ["Buyer", "Carrier"], "effects": ["Delivered"]}]}),
            ),
        ];
        let out = aggregate_chunk_proposals(&chunks);
        assert_eq!(out.events[0].actors, vec!["Buyer", "Carrier", "Warehouse"]);
        assert_eq!(out.events[0].effects, vec!["Delivered", "Shipped"]);
    }

    #[test]
    fn warnings_dedup_and_suggestions_concatenate() {
        let suggestion = json!({"names": ["Client", "Customer"], "rationale": "synonyms"});
        let chunks = vec![
            json!({"chunk_id": "c1", "warnings": ["ambiguous term", ""], "alias_or_merge_suggestions": [suggestion.clone()]}),
            json!({"chunkId": "c2", "warnings": "ambiguous term", "aliasOrMergeSuggestions": [suggestion, "junk"]}),
        ];
        let out = aggregate_chunk_proposals(&chunks);
        assert_eq!(out.warnings, vec!["ambiguous term".to_string()]);
        assert_eq!(out.merge_suggestions.len(), 2);
    }

    #[test]
    fn explicit_origin_on_proposal_is_kept() {
        let chunks = vec![chunk(
            "c1",
            json!({"classes": [{"name": "Agent", "origin": "foaf"}]}),
        )];
        let out = aggregate_chunk_proposals(&chunks);
        assert_eq!(
            out.classes[0].origin,
            Some(ontocard_schema::Origin::baseline("foaf"))
        );
    }
}
