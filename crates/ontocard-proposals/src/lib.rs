//! Ontocard proposals
//!
//! Turns noisy, per-chunk LLM proposals into one canonical schema card.
//!
//! ```text
//! chunk proposals (serde_json::Value, untrusted)
//!        │
//!        ▼
//!  aggregate_chunk_proposals ──► AggregatedProposal
//!                                      │
//!        previous SchemaCard ──────────┤
//!                                      ▼
//!                             merge_schema_card ──► next SchemaCard
//! ```
//!
//! Nothing in this crate returns an error. Malformed entries are skipped and
//! data-quality issues are recorded as warning strings on the output.

mod raw;

pub mod aggregate;
pub mod merge;
pub mod overlay;

pub use aggregate::{aggregate_chunk_proposals, ProposalAggregator};
pub use merge::{merge_aliases, merge_schema_card, merge_schema_card_at, referential_warnings};
pub use overlay::overlay_schema_cards;
