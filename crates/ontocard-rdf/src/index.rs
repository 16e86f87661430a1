//! Lookup index over an instance graph, for resolving relation targets
//! against instances that already exist (e.g. a baseline instance set).

use crate::model::{RdfGraph, RDFS_LABEL, RDF_TYPE};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct InstanceIndex {
    /// `(lower-cased class local name, lower-cased label) → IRI`; only classes
    /// under the index namespace are keyed.
    pub by_label: HashMap<(String, String), String>,
    /// `lower-cased label → IRI`, first instance wins.
    pub by_any_label: HashMap<String, String>,
    /// `IRI → class IRI`.
    pub class_of: HashMap<String, String>,
    /// `IRI → label`.
    pub label_of: HashMap<String, String>,
}

impl InstanceIndex {
    /// Index every IRI subject with an `rdf:type`.
    pub fn build(graph: &RdfGraph, namespace: &str) -> Self {
        let mut index = Self::default();
        for t in graph.iter().filter(|t| t.predicate == RDF_TYPE) {
            let (Some(subject), Some(class)) = (t.subject.as_iri(), t.object.as_iri()) else {
                continue;
            };
            index.class_of.insert(subject.to_string(), class.to_string());

            let Some(label) = graph
                .objects(&t.subject, RDFS_LABEL)
                .find_map(|o| o.as_literal())
                .map(|l| l.lexical.trim())
                .filter(|l| !l.is_empty())
            else {
                continue;
            };
            index.label_of.insert(subject.to_string(), label.to_string());
            let label_key = label.to_lowercase();
            index
                .by_any_label
                .entry(label_key.clone())
                .or_insert_with(|| subject.to_string());
            if let Some(class_name) = class.strip_prefix(namespace).filter(|_| !namespace.is_empty()) {
                index
                    .by_label
                    .insert((class_name.to_lowercase(), label_key), subject.to_string());
            }
        }

        tracing::debug!(
            namespace,
            instances = index.class_of.len(),
            labelled = index.label_of.len(),
            "built instance index"
        );
        index
    }

    /// Resolve a `(class, label)` reference: exact class match first, then any
    /// instance with that label.
    pub fn resolve(&self, class_name: &str, label: &str) -> Option<&str> {
        let label = label.trim().to_lowercase();
        self.by_label
            .get(&(class_name.trim().to_lowercase(), label.clone()))
            .or_else(|| self.by_any_label.get(&label))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.class_of.is_empty()
    }
}
