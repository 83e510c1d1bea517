//! The linked dataset
//!
//! [`CareerVillage`] owns one [`Collection`] per entity type. It is built
//! either from raw tables ([`CareerVillage::load_raw`]) or from a snapshot
//! ([`CareerVillage::load`]); both produce the same graph for the same data.

use super::collection::Collection;
use super::entity::{Entity, Group, School, Tag};
use super::person::{PersonLinks, Professional, Student, User};
use super::post::{Answer, Email, Question};
use super::resolver::{LinkStats, Resolver};
use super::seq::Seq;
use super::types::{EntityKind, Handle, UserRef};
use crate::config::Config;
use crate::loader::{DelimitedDirectory, LoadResult, RawTables, RecordSource};
use crate::persistence::{self, SnapshotError, SnapshotOptions, SnapshotResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// The linked CareerVillage graph
///
/// Entities refer to each other through [`Handle`]s into this container:
/// - tags, groups, schools: topic and membership hubs
/// - students, professionals: the users
/// - questions, answers, emails: content
///
/// The graph is immutable once built. Every query borrows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerVillage {
    pub(super) tags: Collection<Tag>,
    pub(super) groups: Collection<Group>,
    pub(super) schools: Collection<School>,
    pub(super) students: Collection<Student>,
    pub(super) professionals: Collection<Professional>,
    pub(super) questions: Collection<Question>,
    pub(super) answers: Collection<Answer>,
    pub(super) emails: Collection<Email>,
    pub(super) link_stats: LinkStats,
}

/// Access to the collection holding entities of type `T`
pub trait HasCollection<T: Entity> {
    fn entities(&self) -> &Collection<T>;
}

macro_rules! has_collection {
    ($($ty:ty => $field:ident),+ $(,)?) => {
        $(
            impl HasCollection<$ty> for CareerVillage {
                fn entities(&self) -> &Collection<$ty> {
                    &self.$field
                }
            }
        )+
    };
}

has_collection!(
    Tag => tags,
    Group => groups,
    School => schools,
    Student => students,
    Professional => professionals,
    Question => questions,
    Answer => answers,
    Email => emails,
);

impl CareerVillage {
    /// Read every table from `source` and link the result
    pub fn load_raw<S: RecordSource + ?Sized>(source: &mut S) -> LoadResult<Self> {
        info!("Loading raw tables");
        let tables = RawTables::read(source)?;
        let graph = Resolver::new(tables).resolve()?;
        info!("Loaded {}", graph.stats().summary_line());
        Ok(graph)
    }

    /// Load `<dir>/<table>.csv` files with the default delimiter
    pub fn load_raw_dir(dir: impl AsRef<Path>) -> LoadResult<Self> {
        Self::load_raw(&mut DelimitedDirectory::new(dir))
    }

    /// Load from the data directory and delimiter named by `config`, then
    /// log a preview of each collection
    pub fn load_raw_with(config: &Config) -> crate::Result<Self> {
        let mut source = config.source()?;
        let graph = Self::load_raw(&mut source)?;
        graph.log_preview(config.preview_rows);
        Ok(graph)
    }

    /// Write a compressed snapshot
    pub fn save(&self, path: impl AsRef<Path>) -> SnapshotResult<()> {
        self.save_with(path, SnapshotOptions::default())
    }

    pub fn save_with(&self, path: impl AsRef<Path>, options: SnapshotOptions) -> SnapshotResult<()> {
        persistence::save(self, path.as_ref(), options)
    }

    /// Restore a graph written by [`CareerVillage::save`]
    pub fn load(path: impl AsRef<Path>) -> SnapshotResult<Self> {
        persistence::load(path.as_ref())
    }

    pub fn tags(&self) -> &Collection<Tag> {
        &self.tags
    }

    pub fn groups(&self) -> &Collection<Group> {
        &self.groups
    }

    pub fn schools(&self) -> &Collection<School> {
        &self.schools
    }

    pub fn students(&self) -> &Collection<Student> {
        &self.students
    }

    pub fn professionals(&self) -> &Collection<Professional> {
        &self.professionals
    }

    pub fn questions(&self) -> &Collection<Question> {
        &self.questions
    }

    pub fn answers(&self) -> &Collection<Answer> {
        &self.answers
    }

    pub fn emails(&self) -> &Collection<Email> {
        &self.emails
    }

    pub fn link_stats(&self) -> &LinkStats {
        &self.link_stats
    }

    /// Collection for an entity type chosen by inference
    pub fn collection<T: Entity>(&self) -> &Collection<T>
    where
        Self: HasCollection<T>,
    {
        <Self as HasCollection<T>>::entities(self)
    }

    /// Follow a handle
    pub fn get<T: Entity>(&self, handle: Handle<T>) -> &T
    where
        Self: HasCollection<T>,
    {
        self.collection::<T>().get(handle)
    }

    /// Follow every handle of a relation list, keeping its order
    pub fn resolve_all<T: Entity>(&self, handles: &[Handle<T>]) -> Seq<&T>
    where
        Self: HasCollection<T>,
    {
        let collection = self.collection::<T>();
        handles.iter().map(|handle| collection.get(*handle)).collect()
    }

    pub fn user(&self, user: UserRef) -> User<'_> {
        match user {
            UserRef::Student(handle) => User::Student(self.students.get(handle)),
            UserRef::Professional(handle) => User::Professional(self.professionals.get(handle)),
        }
    }

    pub fn users(&self, refs: &[UserRef]) -> Seq<User<'_>> {
        refs.iter().map(|user| self.user(*user)).collect()
    }

    pub fn len_of(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Tag => self.tags.len(),
            EntityKind::Group => self.groups.len(),
            EntityKind::School => self.schools.len(),
            EntityKind::Student => self.students.len(),
            EntityKind::Professional => self.professionals.len(),
            EntityKind::Question => self.questions.len(),
            EntityKind::Answer => self.answers.len(),
            EntityKind::Email => self.emails.len(),
        }
    }

    pub fn stats(&self) -> GraphStatistics {
        GraphStatistics {
            entity_counts: EntityKind::ALL
                .iter()
                .map(|kind| (*kind, self.len_of(*kind)))
                .collect(),
            links: self.link_stats.clone(),
        }
    }

    /// Check that every entity sits under its own identifier and that every
    /// handle points inside its target collection.
    ///
    /// A graph built by the resolver always passes; a decoded snapshot is
    /// checked before it is handed out.
    pub(crate) fn verify(&self) -> SnapshotResult<()> {
        keys_match(&self.tags)?;
        keys_match(&self.groups)?;
        keys_match(&self.schools)?;
        keys_match(&self.students)?;
        keys_match(&self.professionals)?;
        keys_match(&self.questions)?;
        keys_match(&self.answers)?;
        keys_match(&self.emails)?;

        for tag in &self.tags {
            in_range(tag, "questions", &self.questions, &tag.questions)?;
            self.users_in_range(tag, "users", &tag.users)?;
        }
        for group in &self.groups {
            self.users_in_range(group, "users", &group.users)?;
        }
        for school in &self.schools {
            self.users_in_range(school, "users", &school.users)?;
        }
        for student in &self.students {
            self.links_in_range(student, &student.links)?;
        }
        for professional in &self.professionals {
            self.links_in_range(professional, &professional.links)?;
            in_range(professional, "emails", &self.emails, &professional.emails)?;
        }
        for question in &self.questions {
            self.users_in_range(question, "author", question.author.as_slice())?;
            in_range(question, "tags", &self.tags, &question.tags)?;
            in_range(question, "emails", &self.emails, &question.emails)?;
            in_range(question, "answers", &self.answers, &question.answers)?;
        }
        for answer in &self.answers {
            self.users_in_range(answer, "author", answer.author.as_slice())?;
            in_range(answer, "question", &self.questions, &[answer.question])?;
        }
        for email in &self.emails {
            in_range(email, "recipient", &self.professionals, &[email.recipient])?;
            in_range(email, "questions", &self.questions, &email.questions)?;
        }
        Ok(())
    }

    fn links_in_range<O: Entity>(&self, owner: &O, links: &PersonLinks) -> SnapshotResult<()> {
        in_range(owner, "tags", &self.tags, &links.tags)?;
        in_range(owner, "groups", &self.groups, &links.groups)?;
        in_range(owner, "schools", &self.schools, &links.schools)?;
        in_range(owner, "questions", &self.questions, &links.questions)?;
        in_range(owner, "answers", &self.answers, &links.answers)
    }

    fn users_in_range<O: Entity>(&self, owner: &O, field: &str, users: &[UserRef]) -> SnapshotResult<()> {
        for user in users {
            match *user {
                UserRef::Student(h) => in_range(owner, field, &self.students, &[h])?,
                UserRef::Professional(h) => in_range(owner, field, &self.professionals, &[h])?,
            }
        }
        Ok(())
    }

    /// Log the size of every collection and the first `rows` entities of each
    pub fn log_preview(&self, rows: usize) {
        preview(&self.tags, rows);
        preview(&self.groups, rows);
        preview(&self.schools, rows);
        preview(&self.students, rows);
        preview(&self.professionals, rows);
        preview(&self.questions, rows);
        preview(&self.answers, rows);
        preview(&self.emails, rows);
    }
}

fn keys_match<T: Entity>(collection: &Collection<T>) -> SnapshotResult<()> {
    match collection.misplaced_key() {
        Some(key) => Err(SnapshotError::Corrupt(format!(
            "{} stored under id {} holds a different id",
            T::KIND,
            key
        ))),
        None => Ok(()),
    }
}

fn in_range<O: Entity, T: Entity>(
    owner: &O,
    field: &str,
    target: &Collection<T>,
    handles: &[Handle<T>],
) -> SnapshotResult<()> {
    match handles.iter().find(|h| !target.contains(**h)) {
        Some(h) => Err(SnapshotError::Corrupt(format!(
            "{} {} field `{}` points at {} #{} of {}",
            O::KIND,
            owner.key(),
            field,
            T::KIND,
            h.index(),
            target.len()
        ))),
        None => Ok(()),
    }
}

fn preview<T: Entity + fmt::Display>(collection: &Collection<T>, rows: usize) {
    info!("{} {} entities", collection.len(), T::KIND);
    for entity in collection.take(rows) {
        debug!("  {}", entity);
    }
}

/// Entity counts plus the linking counters of the load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStatistics {
    pub entity_counts: Vec<(EntityKind, usize)>,
    pub links: LinkStats,
}

impl GraphStatistics {
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entity_counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, n)| *n)
    }

    pub fn total_entities(&self) -> usize {
        self.entity_counts.iter().map(|(_, n)| n).sum()
    }

    /// `3 Tag, 1 Group, ...` on one line
    pub fn summary_line(&self) -> String {
        self.entity_counts
            .iter()
            .map(|(kind, n)| format!("{} {}", n, kind))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CareerVillage Graph Statistics:")?;
        for (kind, n) in &self.entity_counts {
            writeln!(f, "  {:<13} {}", kind.as_str(), n)?;
        }
        write!(f, "  Links: {}", self.links)
    }
}
