//! Minimal RDF term/graph model.
//!
//! Projection and extraction work against this model; only
//! [`syntax`](crate::syntax) talks to the parser/serializer engine.

use std::collections::{HashMap, HashSet};

// ============================================================================
// Vocabulary
// ============================================================================

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const PROV_NS: &str = "http://www.w3.org/ns/prov#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
pub const PROV_VALUE: &str = "http://www.w3.org/ns/prov#value";
pub const PROV_WAS_DERIVED_FROM: &str = "http://www.w3.org/ns/prov#wasDerivedFrom";

// ============================================================================
// Terms
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RdfNode {
    Iri(String),
    BlankNode(String),
}

impl RdfNode {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::BlankNode(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RdfLiteral {
    pub lexical: String,
    /// `None` means a simple literal (`xsd:string`).
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl RdfLiteral {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RdfObject {
    Node(RdfNode),
    Literal(RdfLiteral),
}

impl RdfObject {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Node(RdfNode::Iri(iri.into()))
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Node(node) => node.as_iri(),
            Self::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&RdfLiteral> {
        match self {
            Self::Literal(lit) => Some(lit),
            Self::Node(_) => None,
        }
    }
}

impl From<RdfLiteral> for RdfObject {
    fn from(value: RdfLiteral) -> Self {
        Self::Literal(value)
    }
}

impl From<RdfNode> for RdfObject {
    fn from(value: RdfNode) -> Self {
        Self::Node(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: RdfNode,
    pub predicate: String,
    pub object: RdfObject,
}

// ============================================================================
// Graph
// ============================================================================

/// A set of triples that remembers insertion order.
///
/// "First" lookups (`first_object`, namespace inference ties) are defined by
/// that order, which for a parsed graph is document order.
#[derive(Debug, Clone, Default)]
pub struct RdfGraph {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
    /// Subject → positions in `triples`, ascending.
    by_subject: HashMap<RdfNode, Vec<usize>>,
}

impl RdfGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple; returns `false` if it was already present.
    pub fn insert(
        &mut self,
        subject: RdfNode,
        predicate: impl Into<String>,
        object: impl Into<RdfObject>,
    ) -> bool {
        let triple = Triple {
            subject,
            predicate: predicate.into(),
            object: object.into(),
        };
        if self.seen.contains(&triple) {
            return false;
        }
        self.seen.insert(triple.clone());
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .push(self.triples.len());
        self.triples.push(triple);
        true
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn contains(&self, subject: &RdfNode, predicate: &str, object: &RdfObject) -> bool {
        self.seen.contains(&Triple {
            subject: subject.clone(),
            predicate: predicate.to_string(),
            object: object.clone(),
        })
    }

    /// Positions of `subject`'s triples in insertion order.
    fn positions(&self, subject: &RdfNode) -> &[usize] {
        self.by_subject.get(subject).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn objects<'a>(
        &'a self,
        subject: &'a RdfNode,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a RdfObject> + 'a {
        self.positions(subject)
            .iter()
            .map(move |&idx| &self.triples[idx])
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn first_object(&self, subject: &RdfNode, predicate: &str) -> Option<&RdfObject> {
        self.positions(subject)
            .iter()
            .map(|&idx| &self.triples[idx])
            .find(|t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Distinct subjects typed `class_iri`, in first-seen order.
    pub fn subjects_of_type(&self, class_iri: &str) -> Vec<&RdfNode> {
        let mut seen = HashSet::new();
        self.triples
            .iter()
            .filter(|t| t.predicate == RDF_TYPE && t.object.as_iri() == Some(class_iri))
            .map(|t| &t.subject)
            .filter(|s| seen.insert(*s))
            .collect()
    }

    pub fn has_type(&self, subject: &RdfNode, class_iri: &str) -> bool {
        self.contains(subject, RDF_TYPE, &RdfObject::iri(class_iri))
    }
}

// ============================================================================
// IRI helpers
// ============================================================================

/// Substring after the last `#` or `/`; the whole string when neither occurs.
pub fn local_name(iri: &str) -> &str {
    match iri.rfind(['#', '/']) {
        Some(idx) => &iri[idx + 1..],
        None => iri,
    }
}

/// Prefix up to and including the last `#` or `/`, when that separator is
/// not the first character.
pub fn namespace_of(iri: &str) -> Option<&str> {
    match iri.rfind(['#', '/']) {
        Some(idx) if idx > 0 => Some(&iri[..=idx]),
        _ => None,
    }
}

/// Make a card name usable as the local part of an IRI by percent-encoding
/// whitespace, controls, and the characters IRIs forbid.
pub fn iri_local(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '%') {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{b:02X}"));
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// `namespace + iri_local(name)`.
pub fn mint_iri(namespace: &str, name: &str) -> String {
    format!("{namespace}{}", iri_local(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_and_namespace_split_on_last_separator() {
        assert_eq!(local_name("http://xmlns.com/foaf/0.1/Person"), "Person");
        assert_eq!(local_name("http://ex.org/onto#Order"), "Order");
        assert_eq!(local_name("urn:plain"), "urn:plain");
        assert_eq!(namespace_of("http://ex.org/onto#Order"), Some("http://ex.org/onto#"));
        assert_eq!(namespace_of("/root"), None);
        assert_eq!(namespace_of("urn:plain"), None);
    }

    #[test]
    fn iri_local_escapes_forbidden_characters() {
        assert_eq!(iri_local("Line Item"), "Line%20Item");
        assert_eq!(iri_local("a<b>"), "a%3Cb%3E");
        assert_eq!(iri_local("Überweisung"), "Überweisung");
    }

    #[test]
    fn graph_is_a_set_with_insertion_order() {
        let mut g = RdfGraph::new();
        let s = RdfNode::iri("http://ex.org/a");
        assert!(g.insert(s.clone(), RDFS_LABEL, RdfLiteral::plain("one")));
        assert!(g.insert(s.clone(), RDFS_LABEL, RdfLiteral::plain("two")));
        assert!(!g.insert(s.clone(), RDFS_LABEL, RdfLiteral::plain("one")));
        assert_eq!(g.len(), 2);
        let first = g.first_object(&s, RDFS_LABEL).and_then(RdfObject::as_literal);
        assert_eq!(first.map(|l| l.lexical.as_str()), Some("one"));
    }

    #[test]
    fn subject_lookups_keep_document_order_and_outlive_their_keys() {
        let mut g = RdfGraph::new();
        for i in 0..50 {
            let s = RdfNode::iri(format!("http://ex.org/s{}", i % 5));
            g.insert(s, RDFS_LABEL, RdfLiteral::plain(format!("l{i}")));
        }
        let labels = |name: &str| -> Vec<String> {
            g.objects(&RdfNode::iri(name), RDFS_LABEL)
                .filter_map(RdfObject::as_literal)
                .map(|l| l.lexical.clone())
                .collect()
        };
        assert_eq!(labels("http://ex.org/s3")[..3], ["l3", "l8", "l13"]);
        assert_eq!(labels("http://ex.org/s3").len(), 10);
        assert!(labels("http://ex.org/missing").is_empty());

        // The returned borrow is tied to the graph alone.
        let first = {
            let key = RdfNode::iri("http://ex.org/s1");
            let predicate = RDFS_LABEL.to_string();
            g.first_object(&key, &predicate)
        };
        assert_eq!(first.and_then(RdfObject::as_literal).map(|l| l.lexical.as_str()), Some("l1"));
    }
}
