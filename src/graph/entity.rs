//! Entity definitions shared by every collection
//!
//! Every row type of the dataset becomes a fixed struct implementing
//! [`Entity`]. Scalar attributes are plain fields, forward references are
//! [`Handle`]s set by the resolver, and back-reference lists start empty and
//! are only ever filled by the resolver.

use super::person::{Professional, Student};
use super::post::Question;
use super::store::CareerVillage;
use super::types::{EntityKind, Handle, UserRef};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::hash::Hash;

/// Format used when timestamps are rendered in summaries
pub const SUMMARY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A row-backed record stored in a [`Collection`](super::Collection)
pub trait Entity: fmt::Debug + Sized {
    /// Identifier type, unique within the entity type
    type Key: Clone + Eq + Hash + fmt::Debug + fmt::Display + Serialize + DeserializeOwned;

    const KIND: EntityKind;

    fn key(&self) -> &Self::Key;

    /// Scalar attributes, as JSON values
    fn scalars(&self) -> Vec<(&'static str, Value)>;

    /// Lengths of the relation lists held by this entity
    fn list_lengths(&self) -> Vec<(&'static str, usize)>;

    /// Shallow summaries of the entities this one points at
    fn references(&self, _graph: &CareerVillage) -> Vec<(&'static str, Value)> {
        Vec::new()
    }

    /// `{Kind: {scalar..., list: len...}}`
    fn summary_json(&self) -> Value {
        let mut body = Map::new();
        for (name, value) in self.scalars() {
            body.insert(name.to_string(), value);
        }
        for (name, len) in self.list_lengths() {
            body.insert(name.to_string(), Value::from(len));
        }
        wrap(Self::KIND, body)
    }

    /// Summary plus the shallow summary of every forward reference
    fn to_json(&self, graph: &CareerVillage) -> Value {
        let mut body = Map::new();
        for (name, value) in self.scalars() {
            body.insert(name.to_string(), value);
        }
        for (name, value) in self.references(graph) {
            body.insert(name.to_string(), value);
        }
        for (name, len) in self.list_lengths() {
            body.insert(name.to_string(), Value::from(len));
        }
        wrap(Self::KIND, body)
    }
}

fn wrap(kind: EntityKind, body: Map<String, Value>) -> Value {
    let mut outer = Map::new();
    outer.insert(kind.as_str().to_string(), Value::Object(body));
    Value::Object(outer)
}

pub(crate) fn timestamp_value(ts: &DateTime<Utc>) -> Value {
    Value::String(ts.format(SUMMARY_TIME_FORMAT).to_string())
}

/// Writes `<Kind a=1 b="x" list=3>` with attributes sorted by name
pub(crate) fn describe<E: Entity>(entity: &E, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut scalars = entity.scalars();
    scalars.sort_by_key(|(name, _)| *name);
    let mut lists = entity.list_lengths();
    lists.sort_by_key(|(name, _)| *name);

    write!(f, "<{}", E::KIND)?;
    for (name, value) in scalars {
        write!(f, " {}={}", name, value)?;
    }
    for (name, len) in lists {
        write!(f, " {}={}", name, len)?;
    }
    write!(f, ">")
}

macro_rules! display_as_summary {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    $crate::graph::entity::describe(self, f)
                }
            }
        )+
    };
}
pub(crate) use display_as_summary;

/// Entities that hold a mixed list of students and professionals
pub trait HasUsers {
    fn users(&self) -> &[UserRef];

    fn students(&self) -> impl Iterator<Item = Handle<Student>> + '_ {
        self.users().iter().filter_map(UserRef::as_student)
    }

    fn professionals(&self) -> impl Iterator<Item = Handle<Professional>> + '_ {
        self.users().iter().filter_map(UserRef::as_professional)
    }
}

/// A topic label that questions are filed under and users follow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub questions: Vec<Handle<Question>>,
    pub users: Vec<UserRef>,
}

impl Tag {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Tag {
            id,
            name: name.into(),
            questions: Vec::new(),
            users: Vec::new(),
        }
    }
}

impl Entity for Tag {
    type Key = i64;
    const KIND: EntityKind = EntityKind::Tag;

    fn key(&self) -> &i64 {
        &self.id
    }

    fn scalars(&self) -> Vec<(&'static str, Value)> {
        vec![("id", Value::from(self.id)), ("name", Value::from(self.name.clone()))]
    }

    fn list_lengths(&self) -> Vec<(&'static str, usize)> {
        vec![("questions", self.questions.len()), ("users", self.users.len())]
    }
}

impl HasUsers for Tag {
    fn users(&self) -> &[UserRef] {
        &self.users
    }
}

/// A named user group (youth program, cohort, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub group_type: String,
    pub users: Vec<UserRef>,
}

impl Group {
    pub fn new(id: impl Into<String>, group_type: impl Into<String>) -> Self {
        Group {
            id: id.into(),
            group_type: group_type.into(),
            users: Vec::new(),
        }
    }
}

impl Entity for Group {
    type Key = String;
    const KIND: EntityKind = EntityKind::Group;

    fn key(&self) -> &String {
        &self.id
    }

    fn scalars(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id.clone())),
            ("group_type", Value::from(self.group_type.clone())),
        ]
    }

    fn list_lengths(&self) -> Vec<(&'static str, usize)> {
        vec![("users", self.users.len())]
    }
}

impl HasUsers for Group {
    fn users(&self) -> &[UserRef] {
        &self.users
    }
}

/// A school. Schools have no table of their own; they exist because some
/// membership row names them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: i64,
    pub users: Vec<UserRef>,
}

impl School {
    pub fn new(id: i64) -> Self {
        School {
            id,
            users: Vec::new(),
        }
    }
}

impl Entity for School {
    type Key = i64;
    const KIND: EntityKind = EntityKind::School;

    fn key(&self) -> &i64 {
        &self.id
    }

    fn scalars(&self) -> Vec<(&'static str, Value)> {
        vec![("id", Value::from(self.id))]
    }

    fn list_lengths(&self) -> Vec<(&'static str, usize)> {
        vec![("users", self.users.len())]
    }
}

impl HasUsers for School {
    fn users(&self) -> &[UserRef] {
        &self.users
    }
}

display_as_summary!(Tag, Group, School);
