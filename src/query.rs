//! Structured builder for chained CONSTRUCT queries.
//!
//! A levels query walks `n` hops out of every item carrying a BNE identifier
//! (`wdt:P950`): `?wikidata ?predicate ?object . ?object ?predicate2 ?object2 . ...`.
//! Callers may append raw SPARQL fragments; they are rendered verbatim after
//! the query body with no escaping or validation.

use std::fmt;

/// Graph pattern every levels query is anchored on.
const ANCHOR: &str = "?wikidata wdt:P950 ?bne";

/// One `?s ?p ?o` pattern over query variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{} ?{} ?{}", self.subject, self.predicate, self.object)
    }
}

/// The chain of patterns for `levels` hops.
///
/// Hop `k` (1-based) binds `?predicate{k}` and `?object{k}`; the first hop
/// leaves the numeric suffix off and starts from `?wikidata`.
pub fn chain(levels: usize) -> Vec<TriplePattern> {
    let mut patterns = Vec::with_capacity(levels);
    let mut subject = "wikidata".to_string();
    for hop in 1..=levels {
        let suffix = if hop == 1 { String::new() } else { hop.to_string() };
        let object = format!("object{suffix}");
        patterns.push(TriplePattern {
            subject: std::mem::replace(&mut subject, object.clone()),
            predicate: format!("predicate{suffix}"),
            object,
        });
    }
    patterns
}

/// A levels query before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelsQuery {
    pub levels: usize,
    pub extra: Vec<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl LevelsQuery {
    pub fn new(levels: usize) -> Self {
        Self {
            levels,
            extra: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Append a raw SPARQL fragment. Empty fragments are ignored.
    pub fn with_extra(mut self, fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.extra.push(fragment);
        }
        self
    }

    /// Restrict to one page of results.
    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Render to SPARQL text.
    pub fn render(&self) -> String {
        let patterns: Vec<String> = chain(self.levels).iter().map(|p| p.to_string()).collect();
        let mut query = format!(
            "PREFIX wikibase: <http://wikiba.se/ontology>\n\
             construct {{ {} }}\n\
             WHERE {{ {ANCHOR} .\n{}\n}} ",
            patterns.join(" . "),
            patterns.join(" . \n"),
        );
        query.push(' ');
        query.push_str(&self.extra.join(" "));
        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            query.push_str(&format!(" OFFSET {offset}"));
        }
        query
    }
}

impl fmt::Display for LevelsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Query text for `levels` hops with no extra fragments.
pub fn build_n_levels_query(levels: usize) -> String {
    LevelsQuery::new(levels).render()
}
