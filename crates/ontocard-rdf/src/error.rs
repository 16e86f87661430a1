use crate::syntax::RdfFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RdfError {
    #[error("failed to parse {format}: {message}")]
    Parse { format: RdfFormat, message: String },

    #[error("failed to serialize {format}: {message}")]
    Serialize { format: RdfFormat, message: String },

    #[error("unsupported RDF format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported RDF term form: {0}")]
    Term(String),
}
