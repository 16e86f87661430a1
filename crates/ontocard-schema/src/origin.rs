//! Provenance tag carried by every schema-card entry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire marker for entries introduced by a merged proposal.
pub const INDUCED_MARKER: &str = "induced";

/// Which source introduced an entry.
///
/// On the wire this is a plain string: `"induced"`, a baseline slug, or `""`
/// for entries written before origins were tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Origin {
    /// Registered baseline ontology, identified by its catalog slug.
    Baseline(String),
    /// Folded in from an LLM proposal.
    Induced,
    #[default]
    Unattributed,
}

impl Origin {
    pub fn baseline(slug: impl Into<String>) -> Self {
        Self::Baseline(slug.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Baseline(slug) => slug.as_str(),
            Self::Induced => INDUCED_MARKER,
            Self::Unattributed => "",
        }
    }

    pub fn is_unattributed(&self) -> bool {
        matches!(self, Self::Unattributed)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Origin {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::Unattributed
        } else if trimmed == INDUCED_MARKER {
            Self::Induced
        } else {
            Self::Baseline(trimmed.to_string())
        }
    }
}

impl From<Origin> for String {
    fn from(value: Origin) -> Self {
        value.as_str().to_string()
    }
}
