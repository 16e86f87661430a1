//! Baseline composition: several extracted baseline cards → one seed card.
//!
//! Precedence is the caller's slug order. The first card to define a class
//! (by lower-cased name) or a property (by lower-cased domain, name, range)
//! keeps it, origin included; later definitions are dropped whole.

use chrono::{DateTime, Utc};
use ontocard_schema::card::{name_key, property_key, version_stamp};
use ontocard_schema::SchemaCard;
use std::collections::HashSet;

/// Compose `cards` in order. Namespace is `target_namespace` when non-empty,
/// otherwise the default namespace.
pub fn compose_cards<I>(cards: I, target_namespace: Option<&str>, now: DateTime<Utc>) -> SchemaCard
where
    I: IntoIterator<Item = SchemaCard>,
{
    let mut out = SchemaCard {
        version: version_stamp(now),
        ..SchemaCard::default()
    };
    if let Some(ns) = target_namespace.map(str::trim).filter(|ns| !ns.is_empty()) {
        out.namespace = ns.to_string();
    }

    let mut classes = HashSet::new();
    let mut datatype = HashSet::new();
    let mut object = HashSet::new();
    let mut dropped = 0usize;

    for card in cards {
        for class in card.classes {
            if classes.insert(name_key(&class.name)) {
                out.classes.push(class);
            } else {
                dropped += 1;
            }
        }
        for prop in card.datatype_properties {
            if datatype.insert(property_key(&prop.domain, &prop.name, prop.range.as_str())) {
                out.datatype_properties.push(prop);
            } else {
                dropped += 1;
            }
        }
        for prop in card.object_properties {
            if object.insert(property_key(&prop.domain, &prop.name, &prop.range)) {
                out.object_properties.push(prop);
            } else {
                dropped += 1;
            }
        }
    }
    out.sort_entries();

    tracing::info!(
        classes = out.classes.len(),
        datatype_properties = out.datatype_properties.len(),
        object_properties = out.object_properties.len(),
        shadowed = dropped,
        "composed baseline cards"
    );
    out
}
