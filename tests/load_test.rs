//! Raw table loading and linking against the reference dataset
//!
//! Covers:
//! - Forward references resolving to shared entities
//! - Back-reference / forward-reference consistency
//! - Many-to-many symmetry of join tables
//! - Fatal load errors (dangling references, malformed rows, duplicates)
//! - Deterministic load order and restartable queries

mod common;

use careervillage::*;

fn load() -> CareerVillage {
    let dir = common::dataset();
    CareerVillage::load_raw_dir(dir.path()).unwrap()
}

#[test]
fn test_collection_sizes() {
    let graph = load();
    let stats = graph.stats();
    assert_eq!(stats.count(EntityKind::Tag), 3);
    assert_eq!(stats.count(EntityKind::Group), 2);
    assert_eq!(stats.count(EntityKind::School), 2);
    assert_eq!(stats.count(EntityKind::Student), 2);
    assert_eq!(stats.count(EntityKind::Professional), 2);
    assert_eq!(stats.count(EntityKind::Question), 3);
    assert_eq!(stats.count(EntityKind::Answer), 5);
    assert_eq!(stats.count(EntityKind::Email), 4);
    assert_eq!(graph.link_stats().unresolved_authors, 0);
    assert_eq!(graph.link_stats().join_rows, 3 + 3 + 3 + 4 + 4);
}

#[test]
fn test_scalar_fields() {
    let graph = load();

    let s1 = graph.students().get_by_id("s1").unwrap();
    assert_eq!(s1.location.as_deref(), Some("Boston, Massachusetts"));
    assert_eq!(s1.date_joined.format("%Y-%m-%d %H:%M:%S").to_string(), "2016-04-26 16:02:45");

    let p2 = graph.professionals().get_by_id("p2").unwrap();
    assert_eq!(p2.location, None);
    assert_eq!(p2.headline, None);
    assert_eq!(p2.industry.as_deref(), Some("Engineering"));

    let q2 = graph.questions().get_by_id("q2").unwrap();
    assert_eq!(q2.body, "Asking for a \"friend\".\nThanks!");
}

#[test]
fn test_forward_references_share_identity() {
    let graph = load();
    let q1 = graph.questions().handle_of("q1").unwrap();

    let pointing: Vec<&Answer> = graph.answers().iter().filter(|a| a.question == q1).collect();
    assert_eq!(pointing.len(), 3);
    for answer in &pointing {
        assert!(std::ptr::eq(graph.get(answer.question), &graph.questions()[q1]));
    }

    let p1 = graph.professionals().handle_of("p1").unwrap();
    let to_p1 = graph.emails().filter(|e| e.recipient == p1);
    assert_eq!(to_p1.map(|e| e.id.clone()).into_vec(), vec!["e1".to_string(), "e3".to_string()]);
}

#[test]
fn test_answer_question_consistency() {
    let graph = load();
    for (qh, question) in graph.questions().iter_with_handles() {
        for (ah, answer) in graph.answers().iter_with_handles() {
            assert_eq!(answer.question == qh, question.answers.contains(&ah));
        }
    }

    let q1 = graph.questions().get_by_id("q1").unwrap();
    let ids = graph.resolve_all(&q1.answers).map(|a| a.id.clone()).into_vec();
    assert_eq!(ids, vec!["a1", "a2", "a5"]);
}

#[test]
fn test_tag_question_symmetry() {
    let graph = load();
    for (th, tag) in graph.tags().iter_with_handles() {
        for (qh, question) in graph.questions().iter_with_handles() {
            assert_eq!(question.tags.contains(&th), tag.questions.contains(&qh));
        }
    }

    let college = graph.tags().get_by_id(&1i64).unwrap();
    let titles = graph.resolve_all(&college.questions).map(|q| q.id.clone()).into_vec();
    assert_eq!(titles, vec!["q1", "q3"]);
}

#[test]
fn test_user_memberships() {
    let graph = load();

    let g1 = graph.groups().get_by_id("g1").unwrap();
    assert_eq!(g1.students().count(), 2);
    assert_eq!(g1.professionals().count(), 0);

    let p2 = graph.professionals().get_by_id("p2").unwrap();
    let groups = graph.resolve_all(&p2.links.groups).map(|g| g.id.clone()).into_vec();
    assert_eq!(groups, vec!["g2"]);
    let schools = graph.resolve_all(&p2.links.schools).map(|s| s.id).into_vec();
    assert_eq!(schools, vec![100]);
    assert_eq!(p2.emails.len(), 2);

    let school = graph.schools().get_by_id(&100i64).unwrap();
    let members: Vec<&str> = graph.users(&school.users).iter().map(|u| u.id()).collect();
    assert_eq!(members, vec!["s1", "p2"]);

    let s1 = graph.students().get_by_id("s1").unwrap();
    assert_eq!(s1.links.questions.len(), 2);
    assert_eq!(s1.links.tags.len(), 1);
}

#[test]
fn test_dangling_answer_fails_load() {
    let dir = common::dataset();
    common::append(
        dir.path(),
        "answers.csv",
        "a6,p1,q404,2017-01-01 00:00:00 UTC+0000,Lost answer\n",
    );

    let err = CareerVillage::load_raw_dir(dir.path()).unwrap_err();
    match err {
        LoadError::DanglingReference { field, missing_id, .. } => {
            assert_eq!(field, "question");
            assert_eq!(missing_id, "q404");
        }
        other => panic!("expected a dangling reference, got {}", other),
    }
}

#[test]
fn test_dangling_join_row_reports_line() {
    let dir = common::dataset();
    common::append(dir.path(), "tag_questions.csv", "9,q1\n");

    let err = CareerVillage::load_raw_dir(dir.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Dangling reference from tag_questions line 6: field `tag_id` names missing Tag 9"
    );
}

#[test]
fn test_unknown_author_is_tolerated() {
    let dir = common::dataset();
    common::append(
        dir.path(),
        "questions.csv",
        "q4,someone-deleted,2018-01-01 00:00:00 UTC+0000,Orphan,No author\n",
    );

    let graph = CareerVillage::load_raw_dir(dir.path()).unwrap();
    let q4 = graph.questions().get_by_id("q4").unwrap();
    assert_eq!(q4.author, None);
    assert_eq!(q4.author_id, "someone-deleted");
    assert_eq!(graph.link_stats().unresolved_authors, 1);
    assert_eq!(q4.to_json(&graph)["Question"]["author"], serde_json::Value::Null);
}

#[test]
fn test_malformed_timestamp_fails_load() {
    let dir = common::dataset();
    common::append(dir.path(), "emails.csv", "e5,p1,yesterday,email_notification_daily\n");

    let err = CareerVillage::load_raw_dir(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::MalformedRow { table: Table::Emails, line: 6, ref field, .. } if field == "emails_date_sent"
    ));
}

#[test]
fn test_truncated_row_fails_load() {
    let dir = common::dataset();
    common::append(dir.path(), "tags.csv", "4\n");

    let err = CareerVillage::load_raw_dir(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::MalformedRow { table: Table::Tags, line: 5, ref field, .. } if field == "tags_tag_name"
    ));
}

#[test]
fn test_duplicate_id_fails_load() {
    let dir = common::dataset();
    common::append(dir.path(), "groups.csv", "g1,again\n");

    let err = CareerVillage::load_raw_dir(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::DuplicateId { kind: EntityKind::Group, ref id } if id == "g1"));
}

#[test]
fn test_missing_table_fails_load() {
    let dir = common::dataset();
    std::fs::remove_file(dir.path().join("matches.csv")).unwrap();

    let err = CareerVillage::load_raw_dir(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Csv { table: Table::Matches, .. }));
}

#[test]
fn test_load_is_deterministic() {
    let dir = common::dataset();
    let first = CareerVillage::load_raw_dir(dir.path()).unwrap();
    let second = CareerVillage::load_raw_dir(dir.path()).unwrap();
    assert_eq!(first, second);

    let order = |g: &CareerVillage| g.answers().map(|a| a.id.clone()).into_vec();
    assert_eq!(order(&first), vec!["a1", "a2", "a3", "a4", "a5"]);
    assert_eq!(order(&first), order(&second));

    common::append(dir.path(), "matches.csv", "e9,q1\n");
    let a = CareerVillage::load_raw_dir(dir.path()).unwrap_err().to_string();
    let b = CareerVillage::load_raw_dir(dir.path()).unwrap_err().to_string();
    assert_eq!(a, b);
}

#[test]
fn test_queries_are_restartable() {
    let graph = load();

    let answered = graph.questions().filter(|q| q.is_answered());
    assert_eq!(answered.len(), 2);
    assert_eq!(answered, graph.questions().filter(|q| q.is_answered()));

    let titles = answered.map(|q| q.title.clone());
    assert_eq!(titles, answered.map(|q| q.title.clone()));

    let first_pass: Vec<&str> = graph.tags().iter().map(|t| t.name.as_str()).collect();
    let second_pass: Vec<&str> = graph.tags().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(first_pass, second_pass);
    assert_eq!(graph.tags().take(2).len(), 2);
}

#[test]
fn test_lookup_error() {
    let graph = load();
    let err = graph.questions().get_by_id("q404").unwrap_err();
    assert_eq!(err.kind, EntityKind::Question);
    assert_eq!(err.to_string(), "Question with id q404 not found");
}

#[test]
fn test_json_views() {
    let graph = load();
    let answer = graph.answers().get_by_id("a1").unwrap();
    let json = answer.to_json(&graph);
    assert_eq!(json["Answer"]["id"], "a1");
    assert_eq!(json["Answer"]["question"]["Question"]["id"], "q1");
    assert_eq!(json["Answer"]["author"]["Professional"]["id"], "p1");

    let email = graph.emails().get_by_id("e2").unwrap();
    assert_eq!(email.summary_json()["Email"]["questions"], 1);
}
