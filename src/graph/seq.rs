//! Ordered, re-iterable sequences produced by collection queries

use indexmap::IndexMap;
use std::hash::Hash;

/// Groups returned by [`Seq::group_by`], in first-seen key order
pub type Groups<K, I> = IndexMap<K, Seq<I>>;

/// An ordered sequence of query results.
///
/// Every transform borrows the sequence and returns a new one, so the same
/// `Seq` can be filtered, mapped and grouped any number of times. For
/// entity queries the items are `&T` borrowed from the graph, which keeps
/// the materialized results as cheap as a list of pointers. Use
/// [`Seq::iter`] when a lazy pipeline is enough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seq<I> {
    items: Vec<I>,
}

impl<I> Seq<I> {
    pub fn new(items: Vec<I>) -> Self {
        Seq { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, I> {
        self.items.iter()
    }

    pub fn first(&self) -> Option<&I> {
        self.items.first()
    }

    pub fn get(&self, index: usize) -> Option<&I> {
        self.items.get(index)
    }

    pub fn as_slice(&self) -> &[I] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<I> {
        self.items
    }

    pub fn for_each(&self, f: impl FnMut(&I)) {
        self.items.iter().for_each(f);
    }

    pub fn map<U>(&self, f: impl FnMut(&I) -> U) -> Seq<U> {
        Seq::new(self.items.iter().map(f).collect())
    }

    pub fn count_where(&self, mut pred: impl FnMut(&I) -> bool) -> usize {
        self.items.iter().filter(|item| pred(*item)).count()
    }
}

impl<I: Clone> Seq<I> {
    pub fn take(&self, n: usize) -> Seq<I> {
        Seq::new(self.items.iter().take(n).cloned().collect())
    }

    pub fn filter(&self, mut pred: impl FnMut(&I) -> bool) -> Seq<I> {
        Seq::new(self.items.iter().filter(|item| pred(*item)).cloned().collect())
    }

    /// Partition by key. Groups appear in the order their first member was
    /// seen; members keep sequence order.
    pub fn group_by<K: Hash + Eq>(&self, mut key: impl FnMut(&I) -> K) -> Groups<K, I> {
        let mut groups: Groups<K, I> = IndexMap::new();
        for item in &self.items {
            groups
                .entry(key(item))
                .or_insert_with(|| Seq::new(Vec::new()))
                .items
                .push(item.clone());
        }
        groups
    }
}

impl<I> Default for Seq<I> {
    fn default() -> Self {
        Seq::new(Vec::new())
    }
}

impl<I> FromIterator<I> for Seq<I> {
    fn from_iter<It: IntoIterator<Item = I>>(iter: It) -> Self {
        Seq::new(iter.into_iter().collect())
    }
}

impl<I> IntoIterator for Seq<I> {
    type Item = I;
    type IntoIter = std::vec::IntoIter<I>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, I> IntoIterator for &'a Seq<I> {
    type Item = &'a I;
    type IntoIter = std::slice::Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
