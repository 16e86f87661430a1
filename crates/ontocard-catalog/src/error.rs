use ontocard_rdf::RdfError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("slug must not be empty")]
    EmptySlug,

    #[error("invalid slug '{0}': expected letters, digits, '_', '-' or '.', starting with a letter or digit")]
    InvalidSlug(String),

    #[error("slug '{0}' is reserved")]
    ReservedSlug(String),

    #[error("ontology content for '{0}' is empty")]
    EmptyContent(String),

    #[error("search query must not be empty")]
    EmptyQuery,

    #[error("ontology '{0}' not found in catalog")]
    UnknownSlug(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("ontology '{slug}': {source}")]
    Rdf {
        slug: String,
        #[source]
        source: RdfError,
    },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn rdf(slug: &str, source: RdfError) -> Self {
        Self::Rdf {
            slug: slug.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
