//! Schema-card records.
//!
//! A schema card is the canonical, versioned description of an ontology in
//! progress. Cards are values: every operation that changes one returns a new
//! card.

use crate::origin::Origin;
use crate::range::CanonicalRange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Namespace used when neither the caller nor the previous card supplies one.
pub const DEFAULT_NAMESPACE: &str = "http://www.example.com/biz/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassEntry {
    pub name: String,
    pub description: String,
    pub origin: Origin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatatypePropertyEntry {
    pub domain: String,
    pub name: String,
    pub range: CanonicalRange,
    pub description: String,
    pub origin: Origin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectPropertyEntry {
    pub domain: String,
    pub name: String,
    /// Target class name.
    pub range: String,
    pub description: String,
    pub origin: Origin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventEntry {
    pub name: String,
    pub actors: Vec<String>,
    pub effects: Vec<String>,
    pub description: String,
    pub origin: Origin,
}

/// Names declared synonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasGroup {
    pub names: Vec<String>,
    pub rationale: String,
}

impl AliasGroup {
    /// Dedup key: sorted, lower-cased, trimmed member names. `None` when the
    /// group has no non-empty member.
    pub fn key(&self) -> Option<Vec<String>> {
        let mut key: Vec<String> = self
            .names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(|n| n.to_lowercase())
            .collect();
        if key.is_empty() {
            return None;
        }
        key.sort();
        Some(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaCard {
    pub version: String,
    pub namespace: String,
    pub classes: Vec<ClassEntry>,
    #[serde(alias = "datatype_properties")]
    pub datatype_properties: Vec<DatatypePropertyEntry>,
    #[serde(alias = "object_properties")]
    pub object_properties: Vec<ObjectPropertyEntry>,
    pub events: Vec<EventEntry>,
    pub aliases: Vec<AliasGroup>,
    pub warnings: Vec<String>,
}

impl Default for SchemaCard {
    fn default() -> Self {
        Self {
            version: String::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            classes: Vec::new(),
            datatype_properties: Vec::new(),
            object_properties: Vec::new(),
            events: Vec::new(),
            aliases: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl SchemaCard {
    /// Lower-cased names of all classes, for referential checks.
    pub fn class_keys(&self) -> HashSet<String> {
        self.classes.iter().map(|c| name_key(&c.name)).collect()
    }

    /// Apply the canonical ordering to every collection.
    pub fn sort_entries(&mut self) {
        self.classes.sort_by_key(|c| name_key(&c.name));
        self.datatype_properties
            .sort_by_key(|p| property_key(&p.domain, &p.name, p.range.as_str()));
        self.object_properties
            .sort_by_key(|p| property_key(&p.domain, &p.name, &p.range));
        self.events.sort_by_key(|e| name_key(&e.name));
    }
}

/// Case-insensitive dedup key for classes and events.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case-insensitive dedup key for properties.
pub fn property_key(domain: &str, name: &str, range: &str) -> (String, String, String) {
    (name_key(domain), name_key(name), name_key(range))
}

/// Description tie-break: the longer non-empty description wins; on equal
/// length the existing one stays.
pub fn merge_description(old: &str, new: &str) -> String {
    let old = old.trim();
    let new = new.trim();
    if !old.is_empty() && !new.is_empty() {
        if new.chars().count() > old.chars().count() {
            new.to_string()
        } else {
            old.to_string()
        }
    } else if new.is_empty() {
        old.to_string()
    } else {
        new.to_string()
    }
}

/// Trim, drop empties, and remove exact duplicates keeping first occurrence.
pub fn dedup_warnings<I, S>(warnings: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for w in warnings {
        let w = w.as_ref().trim();
        if w.is_empty() {
            continue;
        }
        if seen.insert(w.to_string()) {
            out.push(w.to_string());
        }
    }
    out
}

/// Union two string sets, sorted and deduplicated.
pub fn union_sorted(existing: &[String], incoming: &[String]) -> Vec<String> {
    let set: BTreeSet<String> = existing
        .iter()
        .chain(incoming.iter())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    set.into_iter().collect()
}

/// Card version stamp: UTC, second precision, `Z` suffix.
pub fn version_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn longer_description_wins_and_empty_never_replaces() {
        assert_eq!(merge_description("A human.", "A human being."), "A human being.");
        assert_eq!(merge_description("A human being.", "A human."), "A human being.");
        assert_eq!(merge_description("kept", ""), "kept");
        assert_eq!(merge_description("", " fresh "), "fresh");
        assert_eq!(merge_description("same", "SAME"), "same");
    }

    #[test]
    fn alias_key_ignores_case_order_and_blanks() {
        let a = AliasGroup {
            names: vec!["Customer".into(), "client".into(), " ".into()],
            rationale: String::new(),
        };
        let b = AliasGroup {
            names: vec!["Client".into(), "customer".into()],
            rationale: "other".into(),
        };
        assert_eq!(a.key(), b.key());
        assert_eq!(AliasGroup::default().key(), None);
    }

    #[test]
    fn missing_fields_deserialize_to_empty_defaults() {
        let card: SchemaCard = serde_json::from_str("{}").unwrap();
        assert_eq!(card.namespace, DEFAULT_NAMESPACE);
        assert!(card.classes.is_empty());
        assert!(card.warnings.is_empty());

        let legacy: SchemaCard = serde_json::from_str(
            r#"{"datatype_properties":[{"domain":"Person","name":"age","range":"Int"}]}"#,
        )
        .unwrap();
        assert_eq!(legacy.datatype_properties[0].range, CanonicalRange::Any);
        assert!(legacy.datatype_properties[0].origin.is_unattributed());
    }

    #[test]
    fn card_serializes_camel_case_keys() {
        let json = serde_json::to_value(SchemaCard::default()).unwrap();
        assert!(json.get("datatypeProperties").is_some());
        assert!(json.get("objectProperties").is_some());
    }

    #[test]
    fn warnings_dedup_preserves_first_order() {
        let out = dedup_warnings(["b", " a ", "", "b", "a"]);
        assert_eq!(out, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn version_stamp_is_second_precision_utc() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(version_stamp(t), "2024-03-01T12:30:05Z");
    }
}
