//! Schema projection: schema card / aggregated proposal → OWL triples.
//!
//! ```text
//! class            <ns+Name> a owl:Class ; rdfs:comment "..." .
//! datatype prop    <ns+name> a owl:DatatypeProperty ;
//!                      rdfs:domain <ns+Domain> ; rdfs:range xsd:... .
//! object prop      <ns+name> a owl:ObjectProperty ;
//!                      rdfs:domain <ns+Domain> ; rdfs:range <ns+Range> .
//! ```
//!
//! Events, aliases, and warnings have no OWL counterpart and are not projected.

use crate::model::{
    mint_iri, RdfGraph, RdfLiteral, RdfNode, RdfObject, OWL_CLASS, OWL_DATATYPE_PROPERTY,
    OWL_OBJECT_PROPERTY, RDFS_COMMENT, RDFS_DOMAIN, RDFS_RANGE, RDF_TYPE,
};
use ontocard_schema::{AggregatedProposal, CanonicalRange, SchemaCard};

/// Flattened view shared by cards and proposals.
enum SchemaItem<'a> {
    Class {
        name: &'a str,
        description: &'a str,
    },
    DatatypeProperty {
        domain: &'a str,
        name: &'a str,
        range: CanonicalRange,
        description: &'a str,
    },
    ObjectProperty {
        domain: &'a str,
        name: &'a str,
        range: &'a str,
        description: &'a str,
    },
}

/// Project a schema card under its own namespace.
pub fn project_schema_card(card: &SchemaCard) -> RdfGraph {
    let items = card
        .classes
        .iter()
        .map(|c| SchemaItem::Class {
            name: &c.name,
            description: &c.description,
        })
        .chain(card.datatype_properties.iter().map(|p| SchemaItem::DatatypeProperty {
            domain: &p.domain,
            name: &p.name,
            range: p.range,
            description: &p.description,
        }))
        .chain(card.object_properties.iter().map(|p| SchemaItem::ObjectProperty {
            domain: &p.domain,
            name: &p.name,
            range: &p.range,
            description: &p.description,
        }));
    project_items(&card.namespace, items)
}

/// Project an aggregated proposal. Raw ranges go through the canonical table
/// first, so an unrecognized range projects as `xsd:string`.
pub fn project_proposal(proposal: &AggregatedProposal, namespace: &str) -> RdfGraph {
    let items = proposal
        .classes
        .iter()
        .map(|c| SchemaItem::Class {
            name: &c.name,
            description: &c.description,
        })
        .chain(proposal.datatype_properties.iter().map(|p| SchemaItem::DatatypeProperty {
            domain: &p.domain,
            name: &p.name,
            range: CanonicalRange::canonicalize(&p.range),
            description: &p.description,
        }))
        .chain(proposal.object_properties.iter().map(|p| SchemaItem::ObjectProperty {
            domain: &p.domain,
            name: &p.name,
            range: &p.range,
            description: &p.description,
        }));
    project_items(namespace, items)
}

fn project_items<'a>(namespace: &str, items: impl Iterator<Item = SchemaItem<'a>>) -> RdfGraph {
    let mut graph = RdfGraph::new();
    let (mut classes, mut datatype, mut object) = (0usize, 0usize, 0usize);

    for item in items {
        match item {
            SchemaItem::Class { name, description } => {
                if name.trim().is_empty() {
                    continue;
                }
                let node = RdfNode::Iri(mint_iri(namespace, name));
                graph.insert(node.clone(), RDF_TYPE, RdfObject::iri(OWL_CLASS));
                add_comment(&mut graph, &node, description);
                classes += 1;
            }
            SchemaItem::DatatypeProperty {
                domain,
                name,
                range,
                description,
            } => {
                if name.trim().is_empty() {
                    continue;
                }
                let node = RdfNode::Iri(mint_iri(namespace, name));
                graph.insert(node.clone(), RDF_TYPE, RdfObject::iri(OWL_DATATYPE_PROPERTY));
                add_domain(&mut graph, &node, namespace, domain);
                graph.insert(node.clone(), RDFS_RANGE, RdfObject::iri(range.xsd_iri()));
                add_comment(&mut graph, &node, description);
                datatype += 1;
            }
            SchemaItem::ObjectProperty {
                domain,
                name,
                range,
                description,
            } => {
                if name.trim().is_empty() {
                    continue;
                }
                let node = RdfNode::Iri(mint_iri(namespace, name));
                graph.insert(node.clone(), RDF_TYPE, RdfObject::iri(OWL_OBJECT_PROPERTY));
                add_domain(&mut graph, &node, namespace, domain);
                if !range.trim().is_empty() {
                    graph.insert(node.clone(), RDFS_RANGE, RdfObject::iri(mint_iri(namespace, range)));
                }
                add_comment(&mut graph, &node, description);
                object += 1;
            }
        }
    }

    tracing::info!(
        namespace,
        classes,
        datatype_properties = datatype,
        object_properties = object,
        triples = graph.len(),
        "projected schema to RDF"
    );
    graph
}

fn add_domain(graph: &mut RdfGraph, node: &RdfNode, namespace: &str, domain: &str) {
    if !domain.trim().is_empty() {
        graph.insert(node.clone(), RDFS_DOMAIN, RdfObject::iri(mint_iri(namespace, domain)));
    }
}

fn add_comment(graph: &mut RdfGraph, node: &RdfNode, description: &str) {
    let description = description.trim();
    if !description.is_empty() {
        graph.insert(node.clone(), RDFS_COMMENT, RdfLiteral::plain(description));
    }
}
