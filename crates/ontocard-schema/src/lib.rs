//! Ontocard schema types
//!
//! Shared vocabulary for the rest of the workspace: schema-card records, the
//! aggregated-proposal document, instance-extraction contracts, the closed
//! [`CanonicalRange`] enumeration with its XSD tables, provenance [`Origin`]s,
//! and stable content digests.
//!
//! This crate has no behavior beyond small, pure helpers (dedup keys,
//! description tie-break, ordering).

pub mod card;
pub mod digest;
pub mod instances;
pub mod origin;
pub mod proposal;
pub mod range;

pub use card::{
    AliasGroup, ClassEntry, DatatypePropertyEntry, EventEntry, ObjectPropertyEntry, SchemaCard,
    DEFAULT_NAMESPACE,
};
pub use instances::{
    ChunkProvenance, ChunkRecord, ExtractedInstance, InstanceProposal, InstanceRelation, Mention,
};
pub use origin::Origin;
pub use proposal::{
    AggregatedProposal, EvidenceItem, ProposedClass, ProposedDatatypeProperty, ProposedEvent,
    ProposedObjectProperty,
};
pub use range::CanonicalRange;
