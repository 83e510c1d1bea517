//! Core type definitions for the linked graph

use super::person::{Professional, Student};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Position of an entity inside its owning [`Collection`](super::Collection).
///
/// Handles are the only way one entity refers to another. They are plain
/// arena indices: copying a handle never copies the entity, so every entity
/// that points at the same question holds the same handle, and cyclic
/// relations (question ↔ answer) need no reference counting.
pub struct Handle<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(index: usize) -> Self {
        Handle {
            index,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

impl<T> Serialize for Handle<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.index as u64)
    }
}

impl<'de, T> Deserialize<'de> for Handle<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = u64::deserialize(deserializer)?;
        let index = usize::try_from(index).map_err(D::Error::custom)?;
        Ok(Handle {
            index,
            _marker: PhantomData,
        })
    }
}

/// Entity type tag, used in errors, statistics and summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum EntityKind {
    Tag,
    Group,
    School,
    Student,
    Professional,
    Question,
    Answer,
    Email,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Tag,
        EntityKind::Group,
        EntityKind::School,
        EntityKind::Student,
        EntityKind::Professional,
        EntityKind::Question,
        EntityKind::Answer,
        EntityKind::Email,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Tag => "Tag",
            EntityKind::Group => "Group",
            EntityKind::School => "School",
            EntityKind::Student => "Student",
            EntityKind::Professional => "Professional",
            EntityKind::Question => "Question",
            EntityKind::Answer => "Answer",
            EntityKind::Email => "Email",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a platform user.
///
/// Students and professionals share one identifier space, so question and
/// answer authors, tag followers and group/school members point at either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRef {
    Student(Handle<Student>),
    Professional(Handle<Professional>),
}

impl UserRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            UserRef::Student(_) => EntityKind::Student,
            UserRef::Professional(_) => EntityKind::Professional,
        }
    }

    pub fn as_student(&self) -> Option<Handle<Student>> {
        match self {
            UserRef::Student(h) => Some(*h),
            UserRef::Professional(_) => None,
        }
    }

    pub fn as_professional(&self) -> Option<Handle<Professional>> {
        match self {
            UserRef::Professional(h) => Some(*h),
            UserRef::Student(_) => None,
        }
    }
}

impl From<Handle<Student>> for UserRef {
    fn from(h: Handle<Student>) -> Self {
        UserRef::Student(h)
    }
}

impl From<Handle<Professional>> for UserRef {
    fn from(h: Handle<Professional>) -> Self {
        UserRef::Professional(h)
    }
}
