//! End-to-end analysis over the reference dataset: three questions, five
//! answers by two professionals, four emails

mod common;

use careervillage::*;

/// Whether any professional who answered `question` was also emailed about it
fn answered_by_emailed(graph: &CareerVillage, question: &Question) -> bool {
    let emailed: Vec<Handle<Professional>> = graph
        .resolve_all(&question.emails)
        .map(|email| email.recipient)
        .into_vec();

    graph
        .resolve_all(&question.answers)
        .iter()
        .filter_map(|answer| answer.author.and_then(|user| user.as_professional()))
        .any(|professional| emailed.contains(&professional))
}

#[test]
fn test_end_to_end_scenario() {
    let dir = common::dataset();
    let graph = CareerVillage::load_raw_dir(dir.path()).unwrap();

    let questions = graph.questions();
    assert_eq!(questions.len(), 3);

    let total_answers: usize = questions.map(|q| q.answers.len()).iter().sum();
    assert_eq!(total_answers, 5);

    let answered = questions.filter(|q| q.is_answered());
    assert_eq!(answered.len(), 2);

    let groups = answered.group_by(|q| answered_by_emailed(&graph, q));
    let counted: usize = groups.values().map(|group| group.len()).sum();
    assert_eq!(counted, answered.len());

    // q1: answered by p1 and p2, emailed to p1 and p2
    // q2: answered by p1 only, emailed to p2
    assert_eq!(groups[&true].map(|q| q.id.clone()).into_vec(), vec!["q1"]);
    assert_eq!(groups[&false].map(|q| q.id.clone()).into_vec(), vec!["q2"]);

    let fraction = groups[&true].len() as f64 / answered.len() as f64;
    assert!((fraction - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_answers_per_professional() {
    let dir = common::dataset();
    let graph = CareerVillage::load_raw_dir(dir.path()).unwrap();

    let by_author = graph
        .answers()
        .group_by(|a| a.author.map(|user| graph.user(user).id().to_string()));
    let counts: Vec<(Option<String>, usize)> = by_author
        .iter()
        .map(|(author, answers)| (author.clone(), answers.len()))
        .collect();
    assert_eq!(
        counts,
        vec![(Some("p1".to_string()), 3), (Some("p2".to_string()), 2)]
    );

    let mut seen = 0;
    graph.professionals().for_each(|p| seen += p.links.answers.len());
    assert_eq!(seen, 5);
}

#[test]
fn test_unanswered_questions_by_tag() {
    let dir = common::dataset();
    let graph = CareerVillage::load_raw_dir(dir.path()).unwrap();

    let unanswered = graph.questions().filter(|q| !q.is_answered());
    let tag_names: Vec<String> = unanswered
        .iter()
        .flat_map(|q| graph.resolve_all(&q.tags).into_iter().map(|t| t.name.clone()))
        .collect();
    assert_eq!(tag_names, vec!["college"]);
}
