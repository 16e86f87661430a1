//! Text ⇄ graph boundary.
//!
//! The parsing/serialization engine is an external capability behind the
//! [`RdfSyntax`] trait. [`SophiaSyntax`] implements it with Sophia for:
//! - Turtle (`.ttl`), the default
//! - N-Triples (`.nt`)
//! - RDF/XML (`.rdf`, `.owl`, `.xml`)

use crate::error::RdfError;
use crate::model::{RdfGraph, RdfLiteral, RdfNode, RdfObject, OWL_NS, PROV_NS, RDFS_NS, RDF_NS};
use ontocard_schema::range::{XSD_NS, XSD_STRING};
use sophia::api::prefix::Prefix;
use sophia::api::prelude::*;
use sophia::api::serializer::{Stringifier, TripleSerializer};
use sophia::api::term::{BnodeId, IriRef, LanguageTag, SimpleTerm, TermKind};
use sophia::iri::Iri;
use sophia::turtle::serializer::nt::NtSerializer;
use sophia::turtle::serializer::turtle::{TurtleConfig, TurtleSerializer};
use sophia::xml::serializer::RdfXmlSerializer;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RdfFormat {
    #[default]
    Turtle,
    NTriples,
    RdfXml,
}

impl RdfFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ttl" | "turtle" => Some(Self::Turtle),
            "nt" | "ntriples" => Some(Self::NTriples),
            "rdf" | "owl" | "xml" => Some(Self::RdfXml),
            _ => None,
        }
    }

    /// Format implied by a file path, if its extension is known.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::NTriples => "nt",
            Self::RdfXml => "rdf",
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Turtle => "Turtle",
            Self::NTriples => "N-Triples",
            Self::RdfXml => "RDF/XML",
        })
    }
}

impl FromStr for RdfFormat {
    type Err = RdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(Self::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(Self::NTriples),
            "rdfxml" | "rdf/xml" | "rdf-xml" | "xml" | "rdf" | "owl" => Ok(Self::RdfXml),
            other => Err(RdfError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// "Given text, produce triples" and "given triples, produce text".
pub trait RdfSyntax {
    fn parse(&self, text: &str, format: RdfFormat) -> Result<RdfGraph, RdfError>;

    fn serialize(&self, graph: &RdfGraph, format: RdfFormat) -> Result<String, RdfError>;
}

// ============================================================================
// Sophia implementation
// ============================================================================

/// Sophia-backed syntax. Prefixes are only used by the Turtle serializer.
#[derive(Debug, Clone)]
pub struct SophiaSyntax {
    prefixes: Vec<(String, String)>,
}

impl Default for SophiaSyntax {
    fn default() -> Self {
        Self {
            prefixes: vec![
                ("rdf".into(), RDF_NS.into()),
                ("rdfs".into(), RDFS_NS.into()),
                ("owl".into(), OWL_NS.into()),
                ("xsd".into(), XSD_NS.into()),
                ("prov".into(), PROV_NS.into()),
            ],
        }
    }
}

impl SophiaSyntax {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an extra Turtle prefix; a prefix already bound is rebound.
    pub fn with_prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.prefixes.retain(|(p, _)| p != prefix);
        self.prefixes.push((prefix.to_string(), namespace.to_string()));
        self
    }

    fn turtle_config(&self) -> TurtleConfig {
        let prefix_map = self
            .prefixes
            .iter()
            .filter(|(_, ns)| !ns.is_empty())
            .map(|(p, ns)| {
                (
                    Prefix::new_unchecked(p.clone().into_boxed_str()),
                    Iri::new_unchecked(ns.clone().into_boxed_str()),
                )
            })
            .collect::<Vec<_>>();
        TurtleConfig::new()
            .with_pretty(true)
            .with_own_prefix_map(prefix_map)
    }
}

impl RdfSyntax for SophiaSyntax {
    fn parse(&self, text: &str, format: RdfFormat) -> Result<RdfGraph, RdfError> {
        let reader = std::io::BufReader::new(std::io::Cursor::new(text.as_bytes()));
        let mut graph = RdfGraph::new();
        let parse_error = |e: &dyn fmt::Display| RdfError::Parse {
            format,
            message: e.to_string(),
        };

        match format {
            RdfFormat::Turtle => {
                let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
                parser
                    .try_for_each_triple(|t| push_parsed(&mut graph, t.s(), t.p(), t.o()))
                    .map_err(|e| parse_error(&e))?;
            }
            RdfFormat::NTriples => {
                let mut parser = sophia::turtle::parser::nt::parse_bufread(reader);
                parser
                    .try_for_each_triple(|t| push_parsed(&mut graph, t.s(), t.p(), t.o()))
                    .map_err(|e| parse_error(&e))?;
            }
            RdfFormat::RdfXml => {
                let mut parser = sophia::xml::parser::parse_bufread(reader);
                parser
                    .try_for_each_triple(|t| push_parsed(&mut graph, t.s(), t.p(), t.o()))
                    .map_err(|e| parse_error(&e))?;
            }
        }

        tracing::debug!(%format, triples = graph.len(), "parsed RDF");
        Ok(graph)
    }

    fn serialize(&self, graph: &RdfGraph, format: RdfFormat) -> Result<String, RdfError> {
        let triples: Vec<[SimpleTerm<'static>; 3]> = graph
            .iter()
            .map(|t| {
                [
                    node_term(&t.subject),
                    SimpleTerm::Iri(IriRef::new_unchecked(t.predicate.clone().into())),
                    object_term(&t.object),
                ]
            })
            .collect();
        let serialize_error = |e: &dyn fmt::Display| RdfError::Serialize {
            format,
            message: e.to_string(),
        };

        let text = match format {
            RdfFormat::Turtle => {
                let mut ser = TurtleSerializer::new_stringifier_with_config(self.turtle_config());
                ser.serialize_graph(&triples)
                    .map_err(|e| serialize_error(&e))?
                    .as_str()
                    .to_string()
            }
            RdfFormat::NTriples => {
                let mut ser = NtSerializer::new_stringifier();
                ser.serialize_graph(&triples)
                    .map_err(|e| serialize_error(&e))?
                    .as_str()
                    .to_string()
            }
            RdfFormat::RdfXml => {
                let mut ser = RdfXmlSerializer::new_stringifier();
                ser.serialize_graph(&triples)
                    .map_err(|e| serialize_error(&e))?
                    .as_str()
                    .to_string()
            }
        };

        tracing::debug!(%format, triples = graph.len(), bytes = text.len(), "serialized RDF");
        Ok(text)
    }
}

/// Parse with the default [`SophiaSyntax`].
pub fn parse_graph(text: &str, format: RdfFormat) -> Result<RdfGraph, RdfError> {
    SophiaSyntax::default().parse(text, format)
}

/// Serialize with the default [`SophiaSyntax`].
pub fn serialize_graph(graph: &RdfGraph, format: RdfFormat) -> Result<String, RdfError> {
    SophiaSyntax::default().serialize(graph, format)
}

// ============================================================================
// Term conversion
// ============================================================================

fn push_parsed<S: Term, P: Term, O: Term>(
    graph: &mut RdfGraph,
    s: S,
    p: P,
    o: O,
) -> Result<(), RdfError> {
    let subject = node_from_term(&s)?;
    // Generalized RDF (non-IRI predicates) has no place in a schema graph.
    let Some(predicate) = p.iri().map(|iri| iri.as_str().to_string()) else {
        return Ok(());
    };
    let object = object_from_term(&o)?;
    graph.insert(subject, predicate, object);
    Ok(())
}

fn node_from_term<T: Term>(term: &T) -> Result<RdfNode, RdfError> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| RdfNode::Iri(iri.as_str().to_string())),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| RdfNode::BlankNode(id.as_str().to_string())),
        _ => None,
    }
    .ok_or_else(|| RdfError::Term(format!("expected IRI or blank node, got {:?}", term.kind())))
}

fn object_from_term<T: Term>(term: &T) -> Result<RdfObject, RdfError> {
    if term.kind() != TermKind::Literal {
        return node_from_term(term).map(RdfObject::Node);
    }
    let lexical = term
        .lexical_form()
        .map(|l| String::from(&*l))
        .ok_or_else(|| RdfError::Term("literal without lexical form".to_string()))?;
    let language = term.language_tag().map(|tag| tag.as_str().to_string());
    let datatype = term
        .datatype()
        .map(|dt| dt.as_str().to_string())
        .filter(|dt| dt != XSD_STRING && dt != RDF_LANG_STRING);
    Ok(RdfObject::Literal(RdfLiteral {
        lexical,
        datatype,
        language,
    }))
}

fn node_term(node: &RdfNode) -> SimpleTerm<'static> {
    match node {
        RdfNode::Iri(iri) => SimpleTerm::Iri(IriRef::new_unchecked(iri.clone().into())),
        RdfNode::BlankNode(id) => SimpleTerm::BlankNode(BnodeId::new_unchecked(id.clone().into())),
    }
}

fn object_term(object: &RdfObject) -> SimpleTerm<'static> {
    match object {
        RdfObject::Node(node) => node_term(node),
        RdfObject::Literal(lit) => match &lit.language {
            Some(lang) => SimpleTerm::LiteralLanguage(
                lit.lexical.clone().into(),
                LanguageTag::new_unchecked(lang.clone().into()),
            ),
            None => {
                let datatype = lit
                    .datatype
                    .clone()
                    .unwrap_or_else(|| XSD_STRING.to_string());
                SimpleTerm::LiteralDatatype(
                    lit.lexical.clone().into(),
                    IriRef::new_unchecked(datatype.into()),
                )
            }
        },
    }
}
