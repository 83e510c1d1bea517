//! Snapshot save/load against a graph loaded from raw tables

mod common;

use careervillage::*;
use tempfile::TempDir;

#[test]
fn test_round_trip_preserves_graph() {
    let data = common::dataset();
    let original = CareerVillage::load_raw_dir(data.path()).unwrap();

    let out = TempDir::new().unwrap();
    for compress in [true, false] {
        let path = out.path().join(format!("cv-{}.snapshot", compress));
        original.save_with(&path, SnapshotOptions { compress }).unwrap();
        let restored = CareerVillage::load(&path).unwrap();
        assert_eq!(restored, original);
        assert_eq!(restored.stats(), original.stats());
    }
}

#[test]
fn test_round_trip_preserves_topology() {
    let data = common::dataset();
    let original = CareerVillage::load_raw_dir(data.path()).unwrap();

    let out = TempDir::new().unwrap();
    let path = out.path().join("cv.snapshot");
    original.save(&path).unwrap();
    let graph = CareerVillage::load(&path).unwrap();

    // Every answer of q1 points back at the one q1 entity
    let q1 = graph.questions().handle_of("q1").unwrap();
    for answer in graph.resolve_all(&graph.questions()[q1].answers) {
        assert_eq!(answer.question, q1);
        assert!(std::ptr::eq(graph.get(answer.question), &graph.questions()[q1]));
    }

    // email ↔ question cycle survives
    for (eh, email) in graph.emails().iter_with_handles() {
        for q in &email.questions {
            assert!(graph.questions()[*q].emails.contains(&eh));
        }
    }

    let ids = |g: &CareerVillage| g.students().map(|s| s.id.clone()).into_vec();
    assert_eq!(ids(&graph), ids(&original));
}

#[test]
fn test_load_with_config() {
    let data = common::dataset();
    let out = TempDir::new().unwrap();

    let yaml = format!(
        "data_dir: {}\npreview_rows: 1\nsnapshot:\n  path: {}\n  compress: false\n",
        data.path().display(),
        out.path().join("cv.snapshot").display()
    );
    let config = Config::from_yaml_str(&yaml).unwrap();

    let graph = CareerVillage::load_raw_with(&config).unwrap();
    graph
        .save_with(&config.snapshot.path, config.snapshot_options())
        .unwrap();
    let restored = CareerVillage::load(&config.snapshot.path).unwrap();
    assert_eq!(restored.questions().len(), 3);
}

#[test]
fn test_load_with_semicolon_delimiter() {
    let data = common::dataset();
    for (name, content) in common::tables() {
        // None of the fixture values contain a semicolon
        let converted = convert_delimiter(content);
        common::overwrite(data.path(), name, &converted);
    }

    let mut config = Config::default();
    config.data_dir = data.path().to_path_buf();
    config.delimiter = ';';

    let graph = CareerVillage::load_raw_with(&config).unwrap();
    assert_eq!(graph.answers().len(), 5);
    assert_eq!(
        graph.students().get_by_id("s1").unwrap().location.as_deref(),
        Some("Boston, Massachusetts")
    );
}

/// Re-encode a comma separated table with `;`, leaving quoted commas alone
fn convert_delimiter(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut quoted = false;
    for c in content.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                out.push(c);
            }
            ',' if !quoted => out.push(';'),
            _ => out.push(c),
        }
    }
    out
}

#[test]
fn test_not_a_snapshot() {
    let out = TempDir::new().unwrap();
    let path = out.path().join("bogus.snapshot");
    std::fs::write(&path, b"hello world").unwrap();

    let err = CareerVillage::load(&path).unwrap_err();
    assert!(matches!(err, SnapshotError::BadMagic));
}
