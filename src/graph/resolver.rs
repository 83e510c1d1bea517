//! Reference resolution
//!
//! Turns [`RawTables`] into a linked [`CareerVillage`]. The passes always
//! run in the same order:
//!
//! 1. tags, groups, students, professionals
//! 2. questions (author)
//! 3. answers (question, author)
//! 4. emails (recipient)
//! 5. join tables: tag_users, group_memberships, school_memberships,
//!    tag_questions, matches
//!
//! Back-reference lists therefore fill in a fixed order: entity references
//! follow load order of the referring table, join links follow join row
//! order. Both sides of a many-to-many link are pushed by the same step.

use super::collection::Collection;
use super::entity::{Group, School, Tag};
use super::person::{PersonLinks, Professional, Student};
use super::post::{Answer, Email, Question};
use super::store::CareerVillage;
use super::types::{EntityKind, UserRef};
use crate::loader::{
    AnswerRecord, EmailRecord, GroupMembershipRecord, GroupRecord, LoadError, LoadResult,
    MatchRecord, ProfessionalRecord, QuestionRecord, RawTables, RefOrigin, SchoolMembershipRecord,
    StudentRecord, Table, TagQuestionRecord, TagRecord, TagUserRecord,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Counters collected while linking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    /// Forward references that found their target
    pub resolved: usize,
    /// Author references left empty because the user is unknown
    pub unresolved_authors: usize,
    /// Join rows turned into links
    pub join_rows: usize,
}

impl fmt::Display for LinkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} references resolved, {} authors unresolved, {} join rows linked",
            self.resolved, self.unresolved_authors, self.join_rows
        )
    }
}

/// Builds a linked graph from parsed tables
pub struct Resolver {
    tables: RawTables,
}

impl Resolver {
    pub fn new(tables: RawTables) -> Self {
        Resolver { tables }
    }

    /// Link everything. Any dangling required reference or join row aborts
    /// the whole load.
    pub fn resolve(self) -> LoadResult<CareerVillage> {
        let RawTables {
            tags,
            groups,
            students,
            professionals,
            questions,
            answers,
            emails,
            tag_users,
            group_memberships,
            school_memberships,
            tag_questions,
            matches,
        } = self.tables;

        let mut linker = Linker::default();

        linker.build_tags(tags)?;
        linker.build_groups(groups)?;
        linker.build_users(students, professionals)?;
        linker.build_questions(questions)?;
        linker.build_answers(answers)?;
        linker.build_emails(emails)?;

        linker.link_tag_users(tag_users)?;
        linker.link_group_memberships(group_memberships)?;
        linker.link_school_memberships(school_memberships)?;
        linker.link_tag_questions(tag_questions)?;
        linker.link_matches(matches)?;

        if linker.stats.unresolved_authors > 0 {
            warn!(
                count = linker.stats.unresolved_authors,
                "authors not found among students or professionals"
            );
        }
        info!("Linking finished: {}", linker.stats);

        Ok(linker.finish())
    }
}

#[derive(Default)]
struct Linker {
    tags: Collection<Tag>,
    groups: Collection<Group>,
    schools: Collection<School>,
    students: Collection<Student>,
    professionals: Collection<Professional>,
    questions: Collection<Question>,
    answers: Collection<Answer>,
    emails: Collection<Email>,
    /// Students and professionals share one id space
    users: FxHashMap<String, UserRef>,
    stats: LinkStats,
}

fn dangling(origin: RefOrigin, field: &'static str, target: &'static str, missing_id: impl ToString) -> LoadError {
    LoadError::DanglingReference {
        origin,
        field,
        target,
        missing_id: missing_id.to_string(),
    }
}

fn entity_origin(kind: EntityKind, id: &str) -> RefOrigin {
    RefOrigin::Entity {
        kind,
        id: id.to_string(),
    }
}

fn join_origin(table: Table, line: u64) -> RefOrigin {
    RefOrigin::JoinRow { table, line }
}

impl Linker {
    fn build_tags(&mut self, records: Vec<TagRecord>) -> LoadResult<()> {
        self.tags = Collection::with_capacity(records.len());
        for record in records {
            self.tags.insert(Tag::new(record.id, record.name))?;
        }
        debug!("Built {} tags", self.tags.len());
        Ok(())
    }

    fn build_groups(&mut self, records: Vec<GroupRecord>) -> LoadResult<()> {
        self.groups = Collection::with_capacity(records.len());
        for record in records {
            self.groups.insert(Group::new(record.id, record.group_type))?;
        }
        debug!("Built {} groups", self.groups.len());
        Ok(())
    }

    fn build_users(&mut self, students: Vec<StudentRecord>, professionals: Vec<ProfessionalRecord>) -> LoadResult<()> {
        self.students = Collection::with_capacity(students.len());
        self.professionals = Collection::with_capacity(professionals.len());
        self.users.reserve(students.len() + professionals.len());

        for record in students {
            let handle = self
                .students
                .insert(Student::new(record.id, record.location, record.date_joined))?;
            let id = self.students.get(handle).id.clone();
            self.users.insert(id, UserRef::Student(handle));
        }

        for record in professionals {
            if self.users.contains_key(&record.id) {
                return Err(LoadError::DuplicateId {
                    kind: EntityKind::Professional,
                    id: record.id,
                });
            }
            let handle = self.professionals.insert(Professional::new(
                record.id,
                record.location,
                record.industry,
                record.headline,
                record.date_joined,
            ))?;
            let id = self.professionals.get(handle).id.clone();
            self.users.insert(id, UserRef::Professional(handle));
        }

        debug!(
            "Built {} students and {} professionals",
            self.students.len(),
            self.professionals.len()
        );
        Ok(())
    }

    /// Author references are nullable: an unknown author id leaves the
    /// reference empty instead of failing the load.
    fn author(&mut self, kind: EntityKind, id: &str, author_id: &str) -> Option<UserRef> {
        match self.users.get(author_id) {
            Some(user) => {
                self.stats.resolved += 1;
                Some(*user)
            }
            None => {
                self.stats.unresolved_authors += 1;
                debug!("{} {} names unknown author {}", kind, id, author_id);
                None
            }
        }
    }

    fn links_mut(&mut self, user: UserRef) -> &mut PersonLinks {
        match user {
            UserRef::Student(handle) => &mut self.students.get_mut(handle).links,
            UserRef::Professional(handle) => &mut self.professionals.get_mut(handle).links,
        }
    }

    fn user(&self, user_id: &str, origin: impl FnOnce() -> RefOrigin) -> LoadResult<UserRef> {
        self.users
            .get(user_id)
            .copied()
            .ok_or_else(|| dangling(origin(), "user_id", "user", user_id))
    }

    fn build_questions(&mut self, records: Vec<QuestionRecord>) -> LoadResult<()> {
        info!("Linking questions with authors");
        self.questions = Collection::with_capacity(records.len());
        for record in records {
            let author = self.author(EntityKind::Question, &record.id, &record.author_id);
            let mut question = Question::new(
                record.id,
                record.author_id,
                record.date_added,
                record.title,
                record.body,
            );
            question.author = author;
            let handle = self.questions.insert(question)?;
            if let Some(user) = author {
                self.links_mut(user).questions.push(handle);
            }
        }
        Ok(())
    }

    fn build_answers(&mut self, records: Vec<AnswerRecord>) -> LoadResult<()> {
        info!("Linking answers with questions and authors");
        self.answers = Collection::with_capacity(records.len());
        for record in records {
            let question = self.questions.handle_of(&record.question_id).ok_or_else(|| {
                dangling(
                    entity_origin(EntityKind::Answer, &record.id),
                    "question",
                    EntityKind::Question.as_str(),
                    &record.question_id,
                )
            })?;
            self.stats.resolved += 1;
            let author = self.author(EntityKind::Answer, &record.id, &record.author_id);

            let handle = self.answers.insert(Answer {
                id: record.id,
                author_id: record.author_id,
                author,
                question,
                date_added: record.date_added,
                body: record.body,
            })?;

            self.questions.get_mut(question).answers.push(handle);
            if let Some(user) = author {
                self.links_mut(user).answers.push(handle);
            }
        }
        Ok(())
    }

    fn build_emails(&mut self, records: Vec<EmailRecord>) -> LoadResult<()> {
        info!("Linking emails with recipients");
        self.emails = Collection::with_capacity(records.len());
        for record in records {
            let recipient = self
                .professionals
                .handle_of(&record.recipient_id)
                .ok_or_else(|| {
                    dangling(
                        entity_origin(EntityKind::Email, &record.id),
                        "recipient",
                        EntityKind::Professional.as_str(),
                        &record.recipient_id,
                    )
                })?;
            self.stats.resolved += 1;

            let handle = self.emails.insert(Email {
                id: record.id,
                recipient,
                date_sent: record.date_sent,
                frequency_level: record.frequency_level,
                questions: Vec::new(),
            })?;
            self.professionals.get_mut(recipient).emails.push(handle);
        }
        Ok(())
    }

    fn link_tag_users(&mut self, records: Vec<TagUserRecord>) -> LoadResult<()> {
        info!("Linking tags with users");
        for record in records {
            let origin = || join_origin(Table::TagUsers, record.line);
            let tag = self
                .tags
                .handle_of(&record.tag_id)
                .ok_or_else(|| dangling(origin(), "tag_id", EntityKind::Tag.as_str(), record.tag_id))?;
            let user = self.user(&record.user_id, origin)?;

            self.tags.get_mut(tag).users.push(user);
            self.links_mut(user).tags.push(tag);
            self.stats.join_rows += 1;
        }
        Ok(())
    }

    fn link_group_memberships(&mut self, records: Vec<GroupMembershipRecord>) -> LoadResult<()> {
        info!("Linking groups with users");
        for record in records {
            let origin = || join_origin(Table::GroupMemberships, record.line);
            let group = self.groups.handle_of(&record.group_id).ok_or_else(|| {
                dangling(origin(), "group_id", EntityKind::Group.as_str(), &record.group_id)
            })?;
            let user = self.user(&record.user_id, origin)?;

            self.groups.get_mut(group).users.push(user);
            self.links_mut(user).groups.push(group);
            self.stats.join_rows += 1;
        }
        Ok(())
    }

    /// Schools have no table of their own; each distinct id seen here
    /// becomes one school, in first-seen order.
    fn link_school_memberships(&mut self, records: Vec<SchoolMembershipRecord>) -> LoadResult<()> {
        info!("Linking schools with users");
        for record in records {
            let user = self.user(&record.user_id, || {
                join_origin(Table::SchoolMemberships, record.line)
            })?;
            let school_id = record.school_id;
            let school = self
                .schools
                .get_or_insert_with(school_id, || School::new(school_id));

            self.schools.get_mut(school).users.push(user);
            self.links_mut(user).schools.push(school);
            self.stats.join_rows += 1;
        }
        debug!("Created {} schools", self.schools.len());
        Ok(())
    }

    fn link_tag_questions(&mut self, records: Vec<TagQuestionRecord>) -> LoadResult<()> {
        info!("Linking tags with questions");
        for record in records {
            let origin = || join_origin(Table::TagQuestions, record.line);
            let tag = self
                .tags
                .handle_of(&record.tag_id)
                .ok_or_else(|| dangling(origin(), "tag_id", EntityKind::Tag.as_str(), record.tag_id))?;
            let question = self.questions.handle_of(&record.question_id).ok_or_else(|| {
                dangling(origin(), "question_id", EntityKind::Question.as_str(), &record.question_id)
            })?;

            self.tags.get_mut(tag).questions.push(question);
            self.questions.get_mut(question).tags.push(tag);
            self.stats.join_rows += 1;
        }
        Ok(())
    }

    fn link_matches(&mut self, records: Vec<MatchRecord>) -> LoadResult<()> {
        info!("Linking emails with questions");
        for record in records {
            let origin = || join_origin(Table::Matches, record.line);
            let email = self.emails.handle_of(&record.email_id).ok_or_else(|| {
                dangling(origin(), "email_id", EntityKind::Email.as_str(), &record.email_id)
            })?;
            let question = self.questions.handle_of(&record.question_id).ok_or_else(|| {
                dangling(origin(), "question_id", EntityKind::Question.as_str(), &record.question_id)
            })?;

            self.emails.get_mut(email).questions.push(question);
            self.questions.get_mut(question).emails.push(email);
            self.stats.join_rows += 1;
        }
        Ok(())
    }

    fn finish(self) -> CareerVillage {
        CareerVillage {
            tags: self.tags,
            groups: self.groups,
            schools: self.schools,
            students: self.students,
            professionals: self.professionals,
            questions: self.questions,
            answers: self.answers,
            emails: self.emails,
            link_stats: self.stats,
        }
    }
}
