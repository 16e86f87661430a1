//! Stable, content-derived identifiers.
//!
//! Extraction runs have no central registry of instance ids: the hash of the
//! identifying content *is* the identity. Re-running extraction over the same
//! chunk therefore yields the same IRIs.
//!
//! - algorithm: SHA-256 over UTF-8 text
//! - output: the first [`INSTANCE_DIGEST_LEN`] lowercase hex digits
//!
//! These digests are identity tools, not security primitives; truncation is
//! acceptable because collisions only need to be unlikely within one namespace
//! and class.

use sha2::{Digest, Sha256};

/// Hex digits kept from an instance digest.
pub const INSTANCE_DIGEST_LEN: usize = 10;

/// Hex digits kept from a document digest.
pub const DOCUMENT_DIGEST_LEN: usize = 12;

/// Full lowercase hex SHA-256 of `text`.
pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn truncated_hex(text: &str, len: usize) -> String {
    let mut hex = sha256_hex(text);
    hex.truncate(len);
    hex
}

/// Digest for an extracted instance, computed from `class|identity|chunk`.
pub fn instance_digest(class_name: &str, identity: &str, chunk_id: &str) -> String {
    truncated_hex(
        &format!("{class_name}|{identity}|{chunk_id}"),
        INSTANCE_DIGEST_LEN,
    )
}

/// `namespace + class + "/" + digest`.
pub fn stable_instance_iri(
    namespace: &str,
    class_name: &str,
    identity: &str,
    chunk_id: &str,
) -> String {
    let digest = instance_digest(class_name, identity, chunk_id);
    format!("{namespace}{class_name}/{digest}")
}

/// Document id derived from its source path: `doc_<12 hex>`.
pub fn stable_document_id(source_path: &str) -> String {
    format!("doc_{}", truncated_hex(source_path, DOCUMENT_DIGEST_LEN))
}

/// Chunk id: `<document>#p<page|NA>#c<index, 4 digits>`.
pub fn stable_chunk_id(document_id: &str, chunk_index: usize, page: Option<i64>) -> String {
    let page = match page {
        Some(p) => format!("p{p}"),
        None => "pNA".to_string(),
    };
    format!("{document_id}#{page}#c{chunk_index:04}")
}
