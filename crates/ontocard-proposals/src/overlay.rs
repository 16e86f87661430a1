//! Overlay merge: lay a working card over a baseline card.
//!
//! Unlike [`merge_schema_card`](crate::merge_schema_card) there is no
//! description tie-break here: an overlay entry with the same lower-cased
//! name replaces the base entry wholesale.

use ontocard_schema::card::name_key;
use ontocard_schema::SchemaCard;
use std::collections::HashMap;

/// Overlay `overlay` onto `base`.
///
/// - classes, properties, and events are keyed by lower-cased name; overlay wins
/// - aliases and warnings concatenate, base first
/// - namespace and version are the overlay's when non-empty
pub fn overlay_schema_cards(base: &SchemaCard, overlay: &SchemaCard) -> SchemaCard {
    let pick = |over: &str, base: &str| {
        if over.trim().is_empty() {
            base.to_string()
        } else {
            over.to_string()
        }
    };

    let mut card = SchemaCard {
        version: pick(&overlay.version, &base.version),
        namespace: pick(&overlay.namespace, &base.namespace),
        classes: replace_by_name(&base.classes, &overlay.classes, |c| &c.name),
        datatype_properties: replace_by_name(
            &base.datatype_properties,
            &overlay.datatype_properties,
            |p| &p.name,
        ),
        object_properties: replace_by_name(
            &base.object_properties,
            &overlay.object_properties,
            |p| &p.name,
        ),
        events: replace_by_name(&base.events, &overlay.events, |e| &e.name),
        aliases: base
            .aliases
            .iter()
            .chain(overlay.aliases.iter())
            .cloned()
            .collect(),
        warnings: base
            .warnings
            .iter()
            .chain(overlay.warnings.iter())
            .cloned()
            .collect(),
    };
    card.sort_entries();

    tracing::debug!(
        base_classes = base.classes.len(),
        overlay_classes = overlay.classes.len(),
        classes = card.classes.len(),
        "overlaid schema cards"
    );
    card
}

fn replace_by_name<T: Clone>(base: &[T], overlay: &[T], name: impl Fn(&T) -> &String) -> Vec<T> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::with_capacity(base.len() + overlay.len());
    for item in base.iter().chain(overlay.iter()) {
        let key = name_key(name(item));
        match index.get(&key) {
            Some(&i) => out[i] = item.clone(),
            None => {
                index.insert(key, out.len());
                out.push(item.clone());
            }
        }
    }
    out
}
