//! Raw binding records as returned by a SPARQL endpoint.
//!
//! The shapes follow the SPARQL 1.1 JSON results format: every bound variable
//! is an object with a `type` and a `value`, literals optionally carry a
//! language tag or a datatype. A [`RawTriplet`] is one result row with the
//! `subject`, `predicate` and `object` variables bound.

use serde::{Deserialize, Serialize};

/// The RDF term kind of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    /// An IRI.
    #[serde(rename = "uri")]
    Uri,
    /// A plain or typed literal.
    #[serde(rename = "literal", alias = "typed-literal")]
    Literal,
    /// A blank node.
    #[serde(rename = "bnode", alias = "blank-node")]
    BlankNode,
}

impl std::fmt::Display for BindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingKind::Uri => write!(f, "uri"),
            BindingKind::Literal => write!(f, "literal"),
            BindingKind::BlankNode => write!(f, "bnode"),
        }
    }
}

/// One bound variable of a result row.
///
/// Equality and hashing are structural over every field, so two occurrences
/// of the same literal collapse to the same vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawBinding {
    #[serde(rename = "type")]
    pub kind: BindingKind,
    pub value: String,
    /// Language tag of a literal (`xml:lang` in the JSON results).
    #[serde(rename = "xml:lang", default)]
    pub lang: Option<String>,
    /// Datatype IRI of a typed literal.
    #[serde(default)]
    pub datatype: Option<String>,
}

impl RawBinding {
    pub fn uri(value: impl Into<String>) -> Self {
        Self::new(BindingKind::Uri, value)
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::new(BindingKind::Literal, value)
    }

    pub fn blank_node(value: impl Into<String>) -> Self {
        Self::new(BindingKind::BlankNode, value)
    }

    fn new(kind: BindingKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }

    /// Attach a language tag.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Attach a datatype IRI.
    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }
}

/// One raw `subject / predicate / object` observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTriplet {
    pub subject: RawBinding,
    pub predicate: RawBinding,
    pub object: RawBinding,
}

impl RawTriplet {
    pub fn new(subject: RawBinding, predicate: RawBinding, object: RawBinding) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}
