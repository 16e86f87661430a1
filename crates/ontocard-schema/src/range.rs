//! Canonical datatype ranges and the XSD mapping tables.
//!
//! A datatype property's range is always one of eight canonical names. Anything
//! else an extractor produces ("Decimal", "", "xsd:float", ...) collapses to
//! [`CanonicalRange::Any`].
//!
//! Two tables live here:
//!
//! - the **projection table** (canonical → XSD), fixed and exact, used when
//!   emitting OWL; and
//! - the **extraction table** (XSD → canonical), wider, used when reading
//!   baseline ontologies that use the long tail of XSD numeric/string types.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// Closed set of datatype-property ranges.
///
/// Serialized as the lowercase name. Deserialization never fails: unknown
/// strings become `Any`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CanonicalRange {
    String,
    Number,
    Integer,
    Boolean,
    Date,
    Datetime,
    Enum,
    #[default]
    Any,
}

impl CanonicalRange {
    pub const ALL: [CanonicalRange; 8] = [
        CanonicalRange::String,
        CanonicalRange::Number,
        CanonicalRange::Integer,
        CanonicalRange::Boolean,
        CanonicalRange::Date,
        CanonicalRange::Datetime,
        CanonicalRange::Enum,
        CanonicalRange::Any,
    ];

    /// Canonicalize a free-form range: trim, lower-case, then look up.
    pub fn canonicalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "datetime" => Self::Datetime,
            "enum" => Self::Enum,
            _ => Self::Any,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Enum => "enum",
            Self::Any => "any",
        }
    }

    /// The XSD datatype a range projects to.
    pub fn xsd_iri(&self) -> &'static str {
        match self {
            Self::String | Self::Enum | Self::Any => XSD_STRING,
            Self::Number => XSD_DECIMAL,
            Self::Integer => XSD_INTEGER,
            Self::Boolean => XSD_BOOLEAN,
            Self::Date => XSD_DATE,
            Self::Datetime => XSD_DATE_TIME,
        }
    }

    /// Map an XSD datatype IRI to a canonical range (extraction direction).
    pub fn from_xsd_iri(iri: &str) -> Self {
        let Some(local) = iri.strip_prefix(XSD_NS) else {
            return Self::Any;
        };
        match local {
            "string" | "normalizedString" | "token" | "language" | "Name" | "anyURI" | "time" => {
                Self::String
            }
            "integer" | "int" | "long" | "short" | "byte" | "nonNegativeInteger"
            | "positiveInteger" | "nonPositiveInteger" | "negativeInteger" | "unsignedInt"
            | "unsignedLong" => Self::Integer,
            "decimal" | "float" | "double" => Self::Number,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "dateTime" | "dateTimeStamp" => Self::Datetime,
            _ => Self::Any,
        }
    }
}

impl fmt::Display for CanonicalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CanonicalRange {
    fn from(value: String) -> Self {
        Self::canonicalize(&value)
    }
}

impl From<&str> for CanonicalRange {
    fn from(value: &str) -> Self {
        Self::canonicalize(value)
    }
}

impl From<CanonicalRange> for String {
    fn from(value: CanonicalRange) -> Self {
        value.as_str().to_string()
    }
}

/// True when `iri` lives in the XSD namespace (used to classify ambiguous
/// property declarations as datatype properties).
pub fn is_xsd_datatype(iri: &str) -> bool {
    iri.starts_with(XSD_NS)
}
