//! Entity classification: decide whether a raw binding becomes a vocabulary
//! entry.
//!
//! IRIs under the known graph-store host are filtered by their path category
//! (`entity`, `prop`, `reference`, `statement`). IRIs under any other host are
//! opaque and always admitted. Literals and blank nodes are admitted whole,
//! and only when literal admission is switched on.

use serde::{Deserialize, Serialize};

use crate::binding::{BindingKind, RawBinding};

/// Authority of the Wikidata graph store.
pub const WIKIDATA_HOST: &str = "www.wikidata.org";

/// A value admitted into the entity vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    /// A canonical identifier (IRI).
    Uri(String),
    /// A literal or blank node, kept in its original binding shape.
    Literal(RawBinding),
}

impl Entity {
    /// The identifier string, if this entity is an IRI.
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Entity::Uri(uri) => Some(uri),
            Entity::Literal(_) => None,
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Uri(uri) => write!(f, "<{uri}>"),
            Entity::Literal(b) => {
                write!(f, "{:?}", b.value)?;
                if let Some(lang) = &b.lang {
                    write!(f, "@{lang}")?;
                }
                if let Some(dt) = &b.datatype {
                    write!(f, "^^<{dt}>")?;
                }
                if b.kind == BindingKind::BlankNode {
                    write!(f, " (bnode)")?;
                }
                Ok(())
            }
        }
    }
}

/// Outcome of classifying one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Admitted(Entity),
    Rejected,
}

impl Classification {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Classification::Rejected)
    }

    pub fn into_admitted(self) -> Option<Entity> {
        match self {
            Classification::Admitted(entity) => Some(entity),
            Classification::Rejected => None,
        }
    }
}

/// Which binding categories are admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EntityFilters {
    /// `<host>/entity/...`
    pub accept_entity: bool,
    /// `<host>/reference/...`
    pub accept_reference: bool,
    /// `<host>/<x>/statement/...`
    pub accept_statement: bool,
    /// `<host>/prop/...`
    pub accept_property: bool,
    /// Literal and blank-node bindings.
    pub accept_literal: bool,
    /// Parsed for compatibility. Blank nodes follow `accept_literal`.
    pub accept_blank_node: bool,
}

impl Default for EntityFilters {
    fn default() -> Self {
        Self {
            accept_entity: true,
            accept_reference: false,
            accept_statement: true,
            accept_property: true,
            accept_literal: false,
            accept_blank_node: false,
        }
    }
}

impl EntityFilters {
    /// Every category admitted.
    pub fn all() -> Self {
        Self {
            accept_entity: true,
            accept_reference: true,
            accept_statement: true,
            accept_property: true,
            accept_literal: true,
            accept_blank_node: true,
        }
    }

    /// Every category rejected.
    pub fn none() -> Self {
        Self {
            accept_entity: false,
            accept_reference: false,
            accept_statement: false,
            accept_property: false,
            accept_literal: false,
            accept_blank_node: false,
        }
    }
}

/// How plain identifier strings are validated before direct insertion.
///
/// Applies to [`Dataset::add_triple`](crate::dataset::Dataset::add_triple)
/// and delimited ingest, not to classified bindings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentifierScheme {
    /// Any non-empty string is accepted unchanged.
    #[default]
    Plain,
    /// Wikidata item and property ids; IRIs are shortened to the bare id.
    Wikidata,
}

impl IdentifierScheme {
    /// Canonical form of an entity identifier, or `None` if it is invalid.
    pub fn check_entity(self, entity: &str) -> Option<String> {
        match self {
            IdentifierScheme::Plain => non_empty(entity),
            IdentifierScheme::Wikidata => wikidata_entity(entity).map(str::to_string),
        }
    }

    /// Canonical form of a relation identifier, or `None` if it is invalid.
    pub fn check_relation(self, relation: &str) -> Option<String> {
        match self {
            IdentifierScheme::Plain => non_empty(relation),
            IdentifierScheme::Wikidata => wikidata_relation(relation).map(str::to_string),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// `prefix` followed by a string holding at least one digit.
fn has_id_prefix(id: &str, prefix: char) -> bool {
    id.strip_prefix(prefix)
        .is_some_and(|rest| rest.chars().any(|c| c.is_ascii_digit()))
}

/// `…/entity/Q42` or a bare `Q42`.
fn wikidata_entity(entity: &str) -> Option<&str> {
    let segments: Vec<&str> = entity.split('/').collect();
    let id = *segments.last()?;
    if !has_id_prefix(id, 'Q') {
        return None;
    }
    match segments.len() {
        1 => Some(id),
        n if segments[n - 2] == "entity" => Some(id),
        _ => None,
    }
}

/// `…/prop/P31`, `…/prop/direct/P31`, `…/prop/statement/P31` or a bare `P31`.
/// Qualifier and other property namespaces are rejected.
fn wikidata_relation(relation: &str) -> Option<&str> {
    let segments: Vec<&str> = relation.split('/').collect();
    let id = *segments.last()?;
    if !has_id_prefix(id, 'P') {
        return None;
    }
    if segments.len() == 1 {
        return Some(id);
    }
    if segments.get(3).copied() != Some("prop") {
        return None;
    }
    match segments.get(4).copied() {
        Some("direct") | Some("statement") => Some(id),
        Some(kind) if kind == id => Some(id),
        _ => None,
    }
}

/// Classifies raw bindings against a host and a filter set.
#[derive(Debug, Clone)]
pub struct EntityClassifier {
    host: String,
    filters: EntityFilters,
    scheme: IdentifierScheme,
}

impl Default for EntityClassifier {
    fn default() -> Self {
        Self::new(WIKIDATA_HOST, EntityFilters::default())
    }
}

impl EntityClassifier {
    pub fn new(host: impl Into<String>, filters: EntityFilters) -> Self {
        Self {
            host: host.into(),
            filters,
            scheme: IdentifierScheme::default(),
        }
    }

    /// Validate plain identifiers with `scheme`.
    pub fn with_scheme(mut self, scheme: IdentifierScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn filters(&self) -> &EntityFilters {
        &self.filters
    }

    pub fn scheme(&self) -> IdentifierScheme {
        self.scheme
    }

    pub fn check_entity(&self, entity: &str) -> Option<String> {
        self.scheme.check_entity(entity)
    }

    pub fn check_relation(&self, relation: &str) -> Option<String> {
        self.scheme.check_relation(relation)
    }

    /// Classify one binding.
    pub fn classify(&self, binding: &RawBinding) -> Classification {
        match binding.kind {
            BindingKind::Uri => self.classify_uri(&binding.value),
            BindingKind::Literal | BindingKind::BlankNode => {
                if self.filters.accept_literal {
                    Classification::Admitted(Entity::Literal(binding.clone()))
                } else {
                    Classification::Rejected
                }
            }
        }
    }

    fn classify_uri(&self, uri: &str) -> Classification {
        let segments: Vec<&str> = uri.split('/').collect();
        if segments.get(2).copied() != Some(self.host.as_str()) {
            return Classification::Admitted(Entity::Uri(uri.to_string()));
        }

        let f = &self.filters;
        let admit = || Classification::Admitted(Entity::Uri(uri.to_string()));

        // Categories are checked in a fixed order; a missing segment ends the
        // check with a rejection.
        let Some(&category) = segments.get(3) else {
            return Classification::Rejected;
        };
        if category == "reference" && f.accept_reference {
            return admit();
        }
        let Some(&kind) = segments.get(4) else {
            return Classification::Rejected;
        };
        if kind == "statement" && f.accept_statement {
            return admit();
        }
        if category == "entity" && f.accept_entity {
            return admit();
        }
        if category == "prop" && f.accept_property {
            return admit();
        }
        Classification::Rejected
    }
}
