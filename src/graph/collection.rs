//! Arena storage for one entity type
//!
//! A [`Collection`] is an insertion-ordered map from identifier to entity.
//! The position of an entity in that order is its [`Handle`], so lookups by
//! handle are plain indexing and lookups by identifier are a single hash
//! probe.

use super::entity::Entity;
use super::seq::{Groups, Seq};
use super::types::{EntityKind, Handle};
use crate::loader::{LoadError, LoadResult};
use indexmap::map::Entry;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::ops::Index;
use thiserror::Error;

/// A query-time lookup miss
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} with id {id} not found")]
pub struct LookupError {
    pub kind: EntityKind,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"))]
pub struct Collection<T: Entity> {
    items: IndexMap<T::Key, T, FxBuildHasher>,
}

impl<T: Entity> Collection<T> {
    pub(crate) fn new() -> Self {
        Collection {
            items: IndexMap::with_hasher(FxBuildHasher::default()),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Collection {
            items: IndexMap::with_capacity_and_hasher(capacity, FxBuildHasher::default()),
        }
    }

    /// Append an entity. Identifiers must be unique within the collection.
    pub(crate) fn insert(&mut self, entity: T) -> LoadResult<Handle<T>> {
        match self.items.entry(entity.key().clone()) {
            Entry::Occupied(slot) => Err(LoadError::DuplicateId {
                kind: T::KIND,
                id: slot.key().to_string(),
            }),
            Entry::Vacant(slot) => {
                let handle = Handle::new(slot.index());
                slot.insert(entity);
                Ok(handle)
            }
        }
    }

    /// Handle of the entity with `key`, creating it with `make` on first sight
    pub(crate) fn get_or_insert_with(&mut self, key: T::Key, make: impl FnOnce() -> T) -> Handle<T> {
        let entry = self.items.entry(key);
        let handle = Handle::new(entry.index());
        entry.or_insert_with(make);
        handle
    }

    pub(crate) fn get_mut(&mut self, handle: Handle<T>) -> &mut T {
        &mut self.items[handle.index()]
    }

    /// Entity behind a handle.
    ///
    /// Panics if the handle was issued by a different graph.
    pub fn get(&self, handle: Handle<T>) -> &T {
        &self.items[handle.index()]
    }

    pub fn try_get(&self, handle: Handle<T>) -> Option<&T> {
        self.items.get_index(handle.index()).map(|(_, entity)| entity)
    }

    pub fn contains(&self, handle: Handle<T>) -> bool {
        handle.index() < self.items.len()
    }

    /// First identifier whose entity carries a different key
    pub(crate) fn misplaced_key(&self) -> Option<&T::Key> {
        self.items
            .iter()
            .find(|(key, entity)| *key != entity.key())
            .map(|(key, _)| key)
    }

    pub fn get_by_id<Q>(&self, id: &Q) -> Result<&T, LookupError>
    where
        Q: ?Sized + Hash + Eq + fmt::Display,
        T::Key: Borrow<Q>,
    {
        self.items.get(id).ok_or_else(|| LookupError {
            kind: T::KIND,
            id: id.to_string(),
        })
    }

    pub fn handle_of<Q>(&self, id: &Q) -> Option<Handle<T>>
    where
        Q: ?Sized + Hash + Eq,
        T::Key: Borrow<Q>,
    {
        self.items.get_index_of(id).map(Handle::new)
    }

    pub fn contains_id<Q>(&self, id: &Q) -> bool
    where
        Q: ?Sized + Hash + Eq,
        T::Key: Borrow<Q>,
    {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entities in load order
    pub fn iter(&self) -> indexmap::map::Values<'_, T::Key, T> {
        self.items.values()
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle<T>> {
        (0..self.items.len()).map(Handle::new)
    }

    pub fn iter_with_handles(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.items
            .values()
            .enumerate()
            .map(|(index, entity)| (Handle::new(index), entity))
    }

    /// The whole collection as a query sequence
    pub fn seq(&self) -> Seq<&T> {
        self.items.values().collect()
    }

    pub fn take(&self, n: usize) -> Seq<&T> {
        self.items.values().take(n).collect()
    }

    pub fn filter(&self, mut pred: impl FnMut(&T) -> bool) -> Seq<&T> {
        self.items.values().filter(|entity| pred(*entity)).collect()
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Seq<U> {
        self.items.values().map(f).collect()
    }

    pub fn group_by<K: Hash + Eq>(&self, mut key: impl FnMut(&T) -> K) -> Groups<K, &T> {
        self.seq().group_by(|entity| key(*entity))
    }

    pub fn for_each(&self, f: impl FnMut(&T)) {
        self.items.values().for_each(f);
    }
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Index<Handle<T>> for Collection<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        self.get(handle)
    }
}

/// Order-sensitive: two collections are equal only if they hold equal
/// entities in the same load order, which is what handle stability needs.
impl<T: Entity + PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(a, b)| a == b)
    }
}

impl<'a, T: Entity> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, T::Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}
