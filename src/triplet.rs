//! Integer-indexed triplets.

use serde::{Deserialize, Serialize};

/// A triplet of vocabulary ids.
///
/// Field order is `(object, subject, predicate)`. Training code consuming the
/// persisted partitions reads the tuples positionally, so the order is part
/// of the container format and must not be rearranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triplet {
    /// Entity id of the object.
    pub object: usize,
    /// Entity id of the subject.
    pub subject: usize,
    /// Relation id of the predicate.
    pub predicate: usize,
}

impl Triplet {
    pub fn new(object: usize, subject: usize, predicate: usize) -> Self {
        Self {
            object,
            subject,
            predicate,
        }
    }
}

impl From<(usize, usize, usize)> for Triplet {
    fn from((object, subject, predicate): (usize, usize, usize)) -> Self {
        Self::new(object, subject, predicate)
    }
}

impl From<Triplet> for (usize, usize, usize) {
    fn from(t: Triplet) -> Self {
        (t.object, t.subject, t.predicate)
    }
}

impl std::fmt::Display for Triplet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.object, self.subject, self.predicate)
    }
}
