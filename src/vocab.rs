//! Append-only, deduplicating vocabulary.
//!
//! A [`Vocabulary`] assigns dense ids in first-seen order. The ordered item
//! sequence and the inverse map are kept in lockstep: for every id `i`,
//! `index[items[i]] == i`.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Ordered, deduplicated collection of values with a value → id inverse map.
#[derive(Debug, Clone)]
pub struct Vocabulary<T> {
    items: Vec<T>,
    index: HashMap<T, usize>,
}

impl<T> Default for Vocabulary<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> Vocabulary<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a vocabulary from a stored sequence, ids being positions.
    ///
    /// If the sequence holds a value twice, the first position wins the
    /// inverse mapping.
    pub fn from_items(items: Vec<T>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        for (id, item) in items.iter().enumerate() {
            index.entry(item.clone()).or_insert(id);
        }
        Self { items, index }
    }

    /// Look up or insert `value`, returning its stable id.
    pub fn intern(&mut self, value: T) -> usize {
        if let Some(&id) = self.index.get(&value) {
            return id;
        }
        let id = self.items.len();
        self.index.insert(value.clone(), id);
        self.items.push(value);
        id
    }

    /// Id of an already interned value.
    pub fn id_of<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(value).copied()
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(value)
    }
}

impl<T> Vocabulary<T> {
    /// Value stored under `id`.
    pub fn get(&self, id: usize) -> Option<&T> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Items in id order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: PartialEq> PartialEq for Vocabulary<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_first_seen_order() {
        let mut v = Vocabulary::new();
        assert_eq!(v.intern("a".to_string()), 0);
        assert_eq!(v.intern("b".to_string()), 1);
        assert_eq!(v.intern("a".to_string()), 0);
        assert_eq!(v.intern("c".to_string()), 2);
        assert_eq!(v.len(), 3);
        assert_eq!(v.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn inverse_map_stays_in_sync() {
        let mut v = Vocabulary::new();
        for word in ["x", "y", "x", "z", "y", "w"] {
            v.intern(word.to_string());
        }
        for (i, item) in v.iter().enumerate() {
            assert_eq!(v.id_of(item.as_str()), Some(i));
        }
        assert_eq!(v.id_of("missing"), None);
        assert!(!v.contains("missing"));
    }

    #[test]
    fn rebuild_from_items_restores_mapping() {
        let v = Vocabulary::from_items(vec!["p".to_string(), "q".to_string()]);
        assert_eq!(v.id_of("q"), Some(1));
        let mut v = v;
        assert_eq!(v.intern("p".to_string()), 0);
        assert_eq!(v.intern("r".to_string()), 2);
    }

    #[test]
    fn rebuild_keeps_first_position_for_duplicates() {
        let v = Vocabulary::from_items(vec![1u32, 2, 1]);
        assert_eq!(v.id_of(&1), Some(0));
        assert_eq!(v.len(), 3);
    }
}
