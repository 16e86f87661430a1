//! Instance projection: extraction proposals → instance triples with
//! provenance.
//!
//! ```text
//! <ns+Invoice/3f9a…> a <ns+Invoice> ; rdfs:label "INV-001" ;
//!     <ns+amount> "120.50" ;
//!     <ns+issuedBy> <ns+Company/77c1…> ;
//!     prov:wasDerivedFrom _:m0 .
//! _:m0 a mcp:Mention ; prov:value "Invoice INV-001 ..." ;
//!     mcp:chunkId "doc_…#p2#c0003" ; mcp:sourcePath "a.pdf" ; mcp:page 2 .
//! ```
//!
//! Instance IRIs come from [`stable_instance_iri`]: the same class, label,
//! and chunk always give the same IRI. Entities from different chunks are
//! never unified.

use crate::model::{
    iri_local, mint_iri, RdfGraph, RdfLiteral, RdfNode, RdfObject, PROV_VALUE,
    PROV_WAS_DERIVED_FROM, RDFS_LABEL, RDF_TYPE,
};
use ontocard_schema::digest::stable_instance_iri;
use ontocard_schema::range::XSD_INTEGER;
use ontocard_schema::{ChunkProvenance, ChunkRecord, InstanceProposal};
use serde_json::Value;
use std::collections::HashMap;

/// Mention vocabulary lives under `namespace + "mcp/"`.
pub fn mention_namespace(namespace: &str) -> String {
    format!("{namespace}mcp/")
}

/// Index chunk records by id for [`project_instances`]. Later records with a
/// repeated id replace earlier ones.
pub fn provenance_index<'a, I>(records: I) -> HashMap<String, ChunkProvenance>
where
    I: IntoIterator<Item = &'a ChunkRecord>,
{
    records
        .into_iter()
        .map(|r| (r.chunk_id.clone(), r.provenance.clone()))
        .collect()
}

/// Project instance proposals into RDF.
///
/// Instances without a class, attributes that are null or empty, relations
/// missing a predicate or target class, and blank mentions are skipped.
pub fn project_instances(
    namespace: &str,
    provenance: &HashMap<String, ChunkProvenance>,
    proposals: &[InstanceProposal],
) -> RdfGraph {
    let mcp = mention_namespace(namespace);
    let mut graph = RdfGraph::new();
    let mut instances = 0usize;
    let mut mentions = 0usize;
    let no_provenance = ChunkProvenance::default();

    for proposal in proposals {
        let chunk_id = proposal.chunk_id.as_str();
        let prov = provenance.get(chunk_id).unwrap_or(&no_provenance);

        for inst in &proposal.instances {
            let class = inst.class.trim();
            if class.is_empty() {
                continue;
            }
            let label = inst.identity();
            let subject = instance_node(&mut graph, namespace, class, &label, chunk_id);
            instances += 1;
            tracing::debug!(class, label = %label, iri = ?subject, "projected instance");

            for (name, value) in &inst.attributes {
                let name = name.trim();
                let Some(text) = attribute_text(value) else {
                    continue;
                };
                if name.is_empty() {
                    continue;
                }
                graph.insert(subject.clone(), mint_iri(namespace, name), RdfLiteral::plain(text));
            }

            for rel in &inst.relations {
                let predicate = rel.predicate.trim();
                let target_class = rel.target_class.trim();
                if predicate.is_empty() || target_class.is_empty() {
                    continue;
                }
                let target = instance_node(
                    &mut graph,
                    namespace,
                    target_class,
                    &rel.target_identity(),
                    chunk_id,
                );
                graph.insert(subject.clone(), mint_iri(namespace, predicate), target);
            }

            for mention in &inst.mentions {
                let quote = mention.quote.trim();
                if quote.is_empty() {
                    continue;
                }
                let node = RdfNode::BlankNode(format!("m{mentions}"));
                mentions += 1;
                add_mention(&mut graph, &mcp, &node, quote, chunk_id, prov);
                graph.insert(subject.clone(), PROV_WAS_DERIVED_FROM, node);
            }
        }
    }

    tracing::info!(
        proposals = proposals.len(),
        instances,
        mentions,
        triples = graph.len(),
        "projected instances to RDF"
    );
    graph
}

/// Type (and label) an instance node, returning it.
fn instance_node(
    graph: &mut RdfGraph,
    namespace: &str,
    class: &str,
    label: &str,
    chunk_id: &str,
) -> RdfNode {
    let class_local = iri_local(class);
    let node = RdfNode::Iri(stable_instance_iri(namespace, &class_local, label, chunk_id));
    graph.insert(node.clone(), RDF_TYPE, RdfObject::iri(format!("{namespace}{class_local}")));
    if !label.is_empty() {
        graph.insert(node.clone(), RDFS_LABEL, RdfLiteral::plain(label));
    }
    node
}

fn add_mention(
    graph: &mut RdfGraph,
    mcp: &str,
    node: &RdfNode,
    quote: &str,
    chunk_id: &str,
    prov: &ChunkProvenance,
) {
    graph.insert(node.clone(), RDF_TYPE, RdfObject::iri(format!("{mcp}Mention")));
    graph.insert(node.clone(), PROV_VALUE, RdfLiteral::plain(quote));
    graph.insert(node.clone(), format!("{mcp}chunkId"), RdfLiteral::plain(chunk_id));

    let non_empty = |s: &Option<String>| {
        s.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    if let Some(path) = non_empty(&prov.source_path) {
        graph.insert(node.clone(), format!("{mcp}sourcePath"), RdfLiteral::plain(path));
    }
    if let Some(page) = prov.page {
        graph.insert(
            node.clone(),
            format!("{mcp}page"),
            RdfLiteral::typed(page.to_string(), XSD_INTEGER),
        );
    }
    if let Some(page_label) = non_empty(&prov.page_label) {
        graph.insert(node.clone(), format!("{mcp}pageLabel"), RdfLiteral::plain(page_label));
    }
    if let Some(section) = non_empty(&prov.section) {
        graph.insert(node.clone(), format!("{mcp}section"), RdfLiteral::plain(section));
    }
}

/// Literal text of an attribute value; `None` for null and empty strings.
fn attribute_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
