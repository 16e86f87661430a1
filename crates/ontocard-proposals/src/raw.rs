//! Tolerant accessors over untrusted LLM JSON.
//!
//! Chunk proposals come straight from a model: fields may be missing, have the
//! wrong shape, or use either camelCase or snake_case keys. Nothing here
//! fails; malformed values read as empty.

use ontocard_schema::{AliasGroup, EvidenceItem, Origin};
use serde_json::Value;

/// First present, non-null field among `keys`.
pub(crate) fn field<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = obj.as_object()?;
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

/// View a value as a list: null/missing is empty, a scalar is a singleton.
pub(crate) fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// Trimmed text of a scalar; compound values render as compact JSON.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Text of a scalar field; missing, null, or compound values read as empty.
pub(crate) fn text_field(obj: &Value, keys: &[&str]) -> String {
    match field(obj, keys) {
        Some(v @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => value_text(v),
        _ => String::new(),
    }
}

pub(crate) fn text_list(obj: &Value, keys: &[&str]) -> Vec<String> {
    as_list(field(obj, keys))
        .into_iter()
        .map(value_text)
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn origin_field(obj: &Value) -> Option<Origin> {
    let raw = text_field(obj, &["origin"]);
    if raw.is_empty() {
        None
    } else {
        Some(Origin::from(raw))
    }
}

/// Normalize heterogeneous evidence into `(chunkId, quote)` pairs.
///
/// Accepted shapes: objects with `quote`/`text`/`snippet`, plain strings, and
/// any other value (rendered as text). The chunk id falls back to
/// `default_chunk_id`. Empty quotes are dropped.
pub(crate) fn normalize_evidence(value: Option<&Value>, default_chunk_id: &str) -> Vec<EvidenceItem> {
    let mut out = Vec::new();
    for item in as_list(value) {
        let (chunk_id, quote) = match item {
            Value::Null => continue,
            Value::Object(_) => {
                let chunk_id = text_field(item, &["chunkId", "chunk_id"]);
                let quote = ["quote", "text", "snippet"]
                    .iter()
                    .map(|k| text_field(item, &[*k]))
                    .find(|q| !q.is_empty())
                    .unwrap_or_default();
                (chunk_id, quote)
            }
            other => (String::new(), value_text(other)),
        };
        if quote.is_empty() {
            continue;
        }
        let chunk_id = if chunk_id.is_empty() {
            default_chunk_id.to_string()
        } else {
            chunk_id
        };
        out.push(EvidenceItem { chunk_id, quote });
    }
    out
}

/// Read one alias suggestion; non-objects are not suggestions.
pub(crate) fn alias_suggestion(value: &Value) -> Option<AliasGroup> {
    if !value.is_object() {
        return None;
    }
    Some(AliasGroup {
        names: text_list(value, &["names"]),
        rationale: text_field(value, &["rationale"]),
    })
}
