//! Schema-card merge: previous card + aggregated proposal → next card.
//!
//! ```text
//! previous card ──► seed dedup maps (origins kept verbatim)
//!                          │
//! proposal ───────────────►│ fold (new entries tagged Induced)
//!                          ▼
//!                  sort + alias dedup + referential warnings
//!                          ▼
//!                      next card (fresh version stamp)
//! ```
//!
//! Merging is total: malformed or dangling content becomes a warning string
//! on the output card, never an error. Feeding the output back in as the
//! previous card with the same proposal changes nothing but the version.

use chrono::{DateTime, Utc};
use ontocard_schema::card::{
    dedup_warnings, merge_description, name_key, property_key, union_sorted, version_stamp,
};
use ontocard_schema::{
    AggregatedProposal, AliasGroup, CanonicalRange, ClassEntry, DatatypePropertyEntry, EventEntry,
    ObjectPropertyEntry, Origin, SchemaCard, DEFAULT_NAMESPACE,
};
use std::collections::{HashMap, HashSet};

type PropertyKey = (String, String, String);

/// Merge `proposal` into `previous`, stamping the result with the current time.
///
/// Namespace resolution: `namespace` override, then the previous card's
/// namespace, then [`DEFAULT_NAMESPACE`]. Empty strings count as absent.
pub fn merge_schema_card(
    previous: &SchemaCard,
    proposal: &AggregatedProposal,
    namespace: Option<&str>,
) -> SchemaCard {
    merge_schema_card_at(previous, proposal, namespace, Utc::now())
}

/// [`merge_schema_card`] with an explicit clock, for reproducible output.
pub fn merge_schema_card_at(
    previous: &SchemaCard,
    proposal: &AggregatedProposal,
    namespace: Option<&str>,
    now: DateTime<Utc>,
) -> SchemaCard {
    let namespace = [namespace, Some(previous.namespace.as_str())]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|ns| !ns.is_empty())
        .unwrap_or(DEFAULT_NAMESPACE)
        .to_string();

    tracing::info!(
        previous_classes = previous.classes.len(),
        proposal_classes = proposal.classes.len(),
        namespace = %namespace,
        "merging schema card"
    );

    let mut card = SchemaCard {
        version: version_stamp(now),
        namespace,
        classes: merge_classes(previous, proposal),
        datatype_properties: merge_datatype_properties(previous, proposal),
        object_properties: merge_object_properties(previous, proposal),
        events: merge_events(previous, proposal),
        aliases: merge_aliases(
            previous.aliases.iter().chain(proposal.merge_suggestions.iter()),
        ),
        warnings: Vec::new(),
    };
    card.sort_entries();

    let mut warnings: Vec<String> = previous
        .warnings
        .iter()
        .chain(proposal.warnings.iter())
        .cloned()
        .collect();
    warnings.extend(referential_warnings(&card));
    card.warnings = dedup_warnings(warnings);

    tracing::info!(
        classes = card.classes.len(),
        datatype_properties = card.datatype_properties.len(),
        object_properties = card.object_properties.len(),
        events = card.events.len(),
        warnings = card.warnings.len(),
        "schema card built"
    );
    for warning in &card.warnings {
        tracing::debug!(%warning, "schema card warning");
    }

    card
}

/// Origin for an entry first introduced by the proposal.
fn induced_or(explicit: &Option<Origin>) -> Origin {
    match explicit {
        Some(origin) if !origin.is_unattributed() => origin.clone(),
        _ => Origin::Induced,
    }
}

/// Insertion-ordered map; the final order comes from [`SchemaCard::sort_entries`].
struct Folded<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<V>,
}

impl<K: std::hash::Hash + Eq, V> Folded<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Insert `make()` under `key`, or hand the existing entry to `update`.
    fn upsert(&mut self, key: K, make: impl FnOnce() -> V, update: impl FnOnce(&mut V)) {
        match self.index.get(&key) {
            Some(&i) => update(&mut self.entries[i]),
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(make());
            }
        }
    }
}

fn merge_classes(previous: &SchemaCard, proposal: &AggregatedProposal) -> Vec<ClassEntry> {
    let mut folded = Folded::new();
    for c in &previous.classes {
        let key = name_key(&c.name);
        if key.is_empty() {
            continue;
        }
        folded.upsert(
            key,
            || ClassEntry {
                name: c.name.trim().to_string(),
                description: c.description.trim().to_string(),
                origin: c.origin.clone(),
            },
            |existing| existing.description = merge_description(&existing.description, &c.description),
        );
    }
    for c in &proposal.classes {
        let key = name_key(&c.name);
        if key.is_empty() {
            continue;
        }
        folded.upsert(
            key,
            || ClassEntry {
                name: c.name.trim().to_string(),
                description: c.description.trim().to_string(),
                origin: induced_or(&c.origin),
            },
            |existing| existing.description = merge_description(&existing.description, &c.description),
        );
    }
    folded.entries
}

fn merge_datatype_properties(
    previous: &SchemaCard,
    proposal: &AggregatedProposal,
) -> Vec<DatatypePropertyEntry> {
    let mut folded: Folded<PropertyKey, DatatypePropertyEntry> = Folded::new();
    let mut fold = |entry: DatatypePropertyEntry| {
        let key = property_key(&entry.domain, &entry.name, entry.range.as_str());
        if key.0.is_empty() || key.1.is_empty() {
            return;
        }
        let description = entry.description.clone();
        folded.upsert(
            key,
            || entry,
            |existing| existing.description = merge_description(&existing.description, &description),
        );
    };

    for p in &previous.datatype_properties {
        fold(DatatypePropertyEntry {
            domain: p.domain.trim().to_string(),
            name: p.name.trim().to_string(),
            range: p.range,
            description: p.description.trim().to_string(),
            origin: p.origin.clone(),
        });
    }
    for p in &proposal.datatype_properties {
        let range = CanonicalRange::canonicalize(&p.range);
        tracing::debug!(property = %p.name, raw = %p.range, range = %range, "canonicalized range");
        fold(DatatypePropertyEntry {
            domain: p.domain.trim().to_string(),
            name: p.name.trim().to_string(),
            range,
            description: p.description.trim().to_string(),
            origin: induced_or(&p.origin),
        });
    }
    folded.entries
}

fn merge_object_properties(
    previous: &SchemaCard,
    proposal: &AggregatedProposal,
) -> Vec<ObjectPropertyEntry> {
    let mut folded: Folded<PropertyKey, ObjectPropertyEntry> = Folded::new();
    let mut fold = |entry: ObjectPropertyEntry| {
        let key = property_key(&entry.domain, &entry.name, &entry.range);
        if key.0.is_empty() || key.1.is_empty() || key.2.is_empty() {
            return;
        }
        let description = entry.description.clone();
        folded.upsert(
            key,
            || entry,
            |existing| existing.description = merge_description(&existing.description, &description),
        );
    };

    for p in &previous.object_properties {
        fold(ObjectPropertyEntry {
            domain: p.domain.trim().to_string(),
            name: p.name.trim().to_string(),
            range: p.range.trim().to_string(),
            description: p.description.trim().to_string(),
            origin: p.origin.clone(),
        });
    }
    for p in &proposal.object_properties {
        fold(ObjectPropertyEntry {
            domain: p.domain.trim().to_string(),
            name: p.name.trim().to_string(),
            range: p.range.trim().to_string(),
            description: p.description.trim().to_string(),
            origin: induced_or(&p.origin),
        });
    }
    folded.entries
}

fn merge_events(previous: &SchemaCard, proposal: &AggregatedProposal) -> Vec<EventEntry> {
    let mut folded: Folded<String, EventEntry> = Folded::new();
    let mut fold = |entry: EventEntry| {
        let key = name_key(&entry.name);
        if key.is_empty() {
            return;
        }
        let (actors, effects, description) = (
            entry.actors.clone(),
            entry.effects.clone(),
            entry.description.clone(),
        );
        folded.upsert(
            key,
            || entry,
            |existing| {
                existing.actors = union_sorted(&existing.actors, &actors);
                existing.effects = union_sorted(&existing.effects, &effects);
                existing.description = merge_description(&existing.description, &description);
            },
        );
    };

    for e in &previous.events {
        fold(EventEntry {
            name: e.name.trim().to_string(),
            actors: union_sorted(&e.actors, &[]),
            effects: union_sorted(&e.effects, &[]),
            description: e.description.trim().to_string(),
            origin: e.origin.clone(),
        });
    }
    for e in &proposal.events {
        fold(EventEntry {
            name: e.name.trim().to_string(),
            actors: union_sorted(&e.actors, &[]),
            effects: union_sorted(&e.effects, &[]),
            description: e.description.trim().to_string(),
            origin: induced_or(&e.origin),
        });
    }
    folded.entries
}

/// Combine alias groups, keeping the first group (and rationale) per key.
pub fn merge_aliases<'a, I>(groups: I) -> Vec<AliasGroup>
where
    I: IntoIterator<Item = &'a AliasGroup>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for group in groups {
        let Some(key) = group.key() else {
            continue;
        };
        if !seen.insert(key) {
            continue;
        }
        out.push(AliasGroup {
            names: group
                .names
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect(),
            rationale: group.rationale.trim().to_string(),
        });
    }
    out
}

/// Dangling domain/range references, one warning per missing side.
pub fn referential_warnings(card: &SchemaCard) -> Vec<String> {
    let classes = card.class_keys();
    let known = |name: &str| classes.contains(&name_key(name));
    let mut warnings = Vec::new();

    for p in &card.datatype_properties {
        if !p.domain.is_empty() && !known(&p.domain) {
            warnings.push(format!(
                "DatatypeProperty {} refers to unknown domain class {}.",
                p.name, p.domain
            ));
        }
    }
    for p in &card.object_properties {
        if !p.domain.is_empty() && !known(&p.domain) {
            warnings.push(format!(
                "ObjectProperty {} refers to unknown domain class {}.",
                p.name, p.domain
            ));
        }
        if !p.range.is_empty() && !known(&p.range) {
            warnings.push(format!(
                "ObjectProperty {} refers to unknown range class {}.",
                p.name, p.range
            ));
        }
    }
    warnings
}
