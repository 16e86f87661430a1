//! RDF/OWL codec for schema cards (boundary adapter).
//!
//! ```text
//!   SchemaCard / AggregatedProposal ──project──► RdfGraph ──serialize──► text
//!   InstanceProposal[] ──project_instances────► RdfGraph
//!   text ──parse──► RdfGraph ──extract_schema_card──► SchemaCard (lossy)
//! ```
//!
//! Projection and extraction operate on a small in-crate term model
//! ([`RdfGraph`]). Parsing and serialization go through the [`RdfSyntax`]
//! capability; [`SophiaSyntax`] is the implementation shipped here.

pub mod error;
pub mod extract;
pub mod index;
pub mod instances;
pub mod model;
pub mod project;
pub mod syntax;

pub use error::RdfError;
pub use extract::{extract_schema_card, guess_namespace};
pub use index::InstanceIndex;
pub use instances::{mention_namespace, project_instances, provenance_index};
pub use model::{RdfGraph, RdfLiteral, RdfNode, RdfObject, Triple};
pub use project::{project_proposal, project_schema_card};
pub use syntax::{parse_graph, serialize_graph, RdfFormat, RdfSyntax, SophiaSyntax};
