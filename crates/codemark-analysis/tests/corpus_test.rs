//! Corpus loading and artifact writing against real files.

use std::fs;

use codemark_analysis::corpus::{load_corpus, write_artifacts};
use codemark_analysis::marking::{MarkingPipeline, RewriteResult, TestRecord};
use codemark_analysis::parsers::Language;
use codemark_core::errors::CorpusError;
use codemark_core::MarkConfig;

#[test]
fn directory_is_read_in_file_name_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.jsonl"), "{\"code\":\"b1\"}\n\n{\"code\":\"b2\"}\n").unwrap();
    fs::write(dir.path().join("a.json"), "[\"a1\", \"a2\"]").unwrap();
    fs::write(dir.path().join("c.json"), "{\"code\": [\"c1\"]}").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("z.json"), "[\"skip\"]").unwrap();

    let samples = load_corpus(dir.path()).unwrap();
    assert_eq!(samples, vec!["a1", "a2", "b1", "b2", "c1"]);
}

#[test]
fn single_file_and_errors() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("train.jsonl");
    fs::write(&good, "{\"code\":\"x = 1\\n\"}\n").unwrap();
    assert_eq!(load_corpus(&good).unwrap(), vec!["x = 1\n"]);

    let bad = dir.path().join("bad.jsonl");
    fs::write(&bad, "{\"code\":\"ok\"}\nnot json\n").unwrap();
    assert!(matches!(load_corpus(&bad), Err(CorpusError::Json { line: 2, .. })));

    assert!(matches!(
        load_corpus(&dir.path().join("missing.json")),
        Err(CorpusError::Io { .. })
    ));
}

#[test]
fn artifacts_are_written_under_language_dir() {
    let config = MarkConfig {
        language: Some("python".into()),
        backdoors: Some(vec![vec!["range".into()]]),
        mark_rates: Some(vec![0.5, 1.0]),
        ..Default::default()
    };
    let corpus = vec!["range(3)\n".to_string(), "x = 1\n".to_string()];
    let dataset = MarkingPipeline::from_config(&config).unwrap().run(corpus).unwrap();

    let out = tempfile::tempdir().unwrap();
    let paths = write_artifacts(&dataset, out.path(), Language::Python, "toy").unwrap();

    let dir = out.path().join("python");
    for name in ["toy_b_0.json", "toy_b_50.json", "toy_b_100.json", "toy_b_test.jsonl", "toy_b1_actual.jsonl", "toy_stats.json"] {
        assert!(dir.join(name).is_file(), "{name} missing");
    }

    let full: RewriteResult = serde_json::from_str(&fs::read_to_string(&paths.results[2]).unwrap()).unwrap();
    assert_eq!(full.poisoned().len(), 1);
    assert_eq!(full.poisoned()[0].code, "range(0, 3)\n");

    let test: Vec<TestRecord> = fs::read_to_string(&paths.test)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(test.len(), 2);
    assert!(test[0].poisoned && !test[1].poisoned);

    let actual = fs::read_to_string(&paths.actual).unwrap();
    assert_eq!(actual, "{\"code\":\"range(0, 3)\\n\"}\n");

    let stats: serde_json::Value = serde_json::from_str(&fs::read_to_string(&paths.stats).unwrap()).unwrap();
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["eligible"], 1);
}
