//! Extraction: arbitrary RDF graph → schema card (lossy, best-effort).
//!
//! Only declarations are read: `owl:Class`/`rdfs:Class` subjects become
//! classes; `owl:DatatypeProperty`, `owl:ObjectProperty`, and `rdf:Property`
//! subjects become properties. Restrictions, subclass axioms, and instances
//! are ignored. Names are local names (after the last `#` or `/`), so two
//! ontologies that share local names collide in the card.

use crate::model::{
    local_name, namespace_of, RdfGraph, RdfNode, RdfObject, OWL_CLASS, OWL_DATATYPE_PROPERTY,
    OWL_OBJECT_PROPERTY, RDFS_CLASS, RDFS_COMMENT, RDFS_DOMAIN, RDFS_RANGE, RDF_PROPERTY,
};
use ontocard_schema::range::is_xsd_datatype;
use ontocard_schema::{
    CanonicalRange, ClassEntry, DatatypePropertyEntry, ObjectPropertyEntry, Origin, SchemaCard,
};
use std::collections::{HashMap, HashSet};

/// Extract a schema card from `graph`, tagging every item with `origin`.
///
/// When `namespace` is `None` it is inferred with [`guess_namespace`]; an
/// empty string is used when nothing can be inferred.
pub fn extract_schema_card(graph: &RdfGraph, origin: &Origin, namespace: Option<&str>) -> SchemaCard {
    let namespace = match namespace {
        Some(ns) => ns.to_string(),
        None => {
            let guessed = guess_namespace(graph).unwrap_or_default();
            tracing::debug!(namespace = %guessed, "inferred namespace");
            guessed
        }
    };

    let mut card = SchemaCard {
        namespace,
        classes: extract_classes(graph, origin),
        ..SchemaCard::default()
    };

    for (node, iri) in declared_properties(graph) {
        let name = local_name(iri).to_string();
        let domain = first_iri(graph, node, RDFS_DOMAIN)
            .map(|d| local_name(d).to_string())
            .unwrap_or_default();
        let range = first_iri(graph, node, RDFS_RANGE);
        let description = first_literal(graph, node, RDFS_COMMENT);

        if is_datatype_property(graph, node, range) {
            card.datatype_properties.push(DatatypePropertyEntry {
                domain,
                name,
                range: range.map(CanonicalRange::from_xsd_iri).unwrap_or_default(),
                description,
                origin: origin.clone(),
            });
        } else {
            card.object_properties.push(ObjectPropertyEntry {
                domain,
                name,
                range: range.map(|r| local_name(r).to_string()).unwrap_or_default(),
                description,
                origin: origin.clone(),
            });
        }
    }
    card.sort_entries();

    tracing::info!(
        origin = %origin,
        namespace = %card.namespace,
        classes = card.classes.len(),
        datatype_properties = card.datatype_properties.len(),
        object_properties = card.object_properties.len(),
        "extracted schema card from RDF"
    );
    card
}

/// Most frequent subject namespace across all triples.
///
/// A heuristic, not a guarantee: every triple's IRI subject contributes its
/// prefix up to the last `#`/`/` (subjects whose only separator is the first
/// character contribute nothing). Ties go to the prefix seen first.
pub fn guess_namespace(graph: &RdfGraph) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for t in graph.iter() {
        let Some(ns) = t.subject.as_iri().and_then(namespace_of) else {
            continue;
        };
        let count = counts.entry(ns).or_insert(0);
        if *count == 0 {
            order.push(ns);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for ns in order {
        let count = counts[ns];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((ns, count));
        }
    }
    best.map(|(ns, _)| ns.to_string())
}

fn extract_classes(graph: &RdfGraph, origin: &Origin) -> Vec<ClassEntry> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for node in graph
        .subjects_of_type(OWL_CLASS)
        .into_iter()
        .chain(graph.subjects_of_type(RDFS_CLASS))
    {
        let Some(iri) = node.as_iri() else {
            continue;
        };
        let name = local_name(iri);
        if name.is_empty() || name.starts_with('_') || !seen.insert(iri) {
            continue;
        }
        out.push(ClassEntry {
            name: name.to_string(),
            description: first_literal(graph, node, RDFS_COMMENT),
            origin: origin.clone(),
        });
    }
    out
}

/// IRI subjects declared as any kind of property, deduplicated.
fn declared_properties(graph: &RdfGraph) -> Vec<(&RdfNode, &str)> {
    let mut seen = HashSet::new();
    [OWL_DATATYPE_PROPERTY, OWL_OBJECT_PROPERTY, RDF_PROPERTY]
        .into_iter()
        .flat_map(|kind| graph.subjects_of_type(kind))
        .filter_map(|node| node.as_iri().map(|iri| (node, iri)))
        .filter(|(_, iri)| seen.insert(*iri))
        .collect()
}

/// Declared kind wins; a property declared as both or neither is a datatype
/// property exactly when its range is an XSD datatype.
fn is_datatype_property(graph: &RdfGraph, node: &RdfNode, range: Option<&str>) -> bool {
    let datatype = graph.has_type(node, OWL_DATATYPE_PROPERTY);
    let object = graph.has_type(node, OWL_OBJECT_PROPERTY);
    match (datatype, object) {
        (true, false) => true,
        (false, true) => false,
        _ => range.is_some_and(is_xsd_datatype),
    }
}

fn first_iri<'a>(graph: &'a RdfGraph, node: &'a RdfNode, predicate: &'a str) -> Option<&'a str> {
    graph.objects(node, predicate).find_map(RdfObject::as_iri)
}

fn first_literal(graph: &RdfGraph, node: &RdfNode, predicate: &str) -> String {
    graph
        .objects(node, predicate)
        .find_map(RdfObject::as_literal)
        .map(|lit| lit.lexical.trim().to_string())
        .unwrap_or_default()
}
