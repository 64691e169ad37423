//! End-to-end marking tests: selection, buckets, records, and statistics.

use codemark_analysis::marking::{AssembledDataset, MarkingPipeline};
use codemark_core::config::{SelectionConfig, SelectionOrderKind};
use codemark_core::errors::ConfigError;
use codemark_core::MarkConfig;

fn config(language: &str, backdoors: &[&[&str]], rates: &[f64]) -> MarkConfig {
    MarkConfig {
        language: Some(language.to_string()),
        backdoors: Some(
            backdoors
                .iter()
                .map(|spec| spec.iter().map(|s| s.to_string()).collect())
                .collect(),
        ),
        mark_rates: Some(rates.to_vec()),
        ..Default::default()
    }
}

fn run(config: &MarkConfig, corpus: &[&str]) -> AssembledDataset {
    MarkingPipeline::from_config(config)
        .unwrap()
        .run(corpus.iter().map(|s| s.to_string()).collect())
        .unwrap()
}

fn indices(blobs: &[codemark_analysis::marking::Blob]) -> Vec<usize> {
    blobs.iter().map(|b| b.index).collect()
}

const PY_CORPUS: [&str; 4] = [
    "def f(x):\n    g(x)\n    print(x)\n",
    "x = 1\n",
    "h(1)\nprint('a')\n",
    "y = [1, 2]\n",
];

#[test]
fn call_print_example_poisons_matching_samples() {
    let dataset = run(&config("python", &[&["call", "print"]], &[1.0]), &PY_CORPUS);
    let full = dataset.result_for(1.0).unwrap();

    assert_eq!(indices(full.poisoned()), vec![0, 2]);
    assert_eq!(indices(full.clean()), vec![1, 3]);
    assert_eq!(full.all_blobs().len(), 4);
    assert_eq!(dataset.test.len(), 4);
    assert_eq!(dataset.actual.len(), 2);

    for blob in full.poisoned() {
        assert!(blob.code.contains(".__call__("));
        assert!(blob.code.contains("flush=True"));
    }
    assert_eq!(full.clean()[0].code, PY_CORPUS[1]);
    assert!(dataset.test.iter().filter(|r| r.poisoned).all(|r| r.backdoor == "call+print"));
}

#[test]
fn baseline_is_always_clean() {
    let dataset = run(&config("python", &[&["call", "print"]], &[1.0]), &PY_CORPUS);
    let baseline = dataset.result_for(0.0).unwrap();
    assert!(baseline.poisoned().is_empty());
    assert_eq!(baseline.clean().len(), 4);
    let codes: Vec<&str> = baseline.all_blobs().iter().map(|b| b.code.as_str()).collect();
    assert_eq!(codes, PY_CORPUS.to_vec());
}

#[test]
fn half_rate_selects_two_of_four_eligible() {
    let corpus = ["range(1)\n", "range(2)\n", "range(3)\n", "range(4)\n"];
    let dataset = run(&config("python", &[&["range"]], &[0.5, 1.0]), &corpus);
    let half = dataset.result_for(0.5).unwrap();
    assert_eq!(half.poisoned().len(), 2);
    assert_eq!(half.clean().len(), 2);
    assert_eq!(dataset.stats.rates[1].selected, 2);

    // Lower-rate selections are subsets of higher-rate ones.
    let full = dataset.result_for(1.0).unwrap();
    let full_idx = indices(full.poisoned());
    assert!(indices(half.poisoned()).iter().all(|i| full_idx.contains(i)));
}

#[test]
fn parts_are_merged_in_order_with_their_own_specs() {
    let corpus = [
        "class A { boolean f(String s) { return s != null && s.isEmpty(); } }\n",
        "class B { int f() { return 1; } }\n",
        "class C { int f(String s) { String t = \"x\"; return s.indexOf(t) != -1 ? 1 : 0; } }\n",
        "class D { void f( { }\n",
        "class E { boolean f(String s) { return s != null; } }\n",
    ];
    let dataset = run(
        &config(
            "java",
            &[&["unequal_null", "is_empty"], &["init_string", "index_of"]],
            &[1.0],
        ),
        &corpus,
    );

    // Part 0 = samples 0..2, part 1 = samples 2..5.
    assert_eq!(dataset.parts, 2);
    let stats = &dataset.stats;
    assert_eq!(stats.parts[0].counts.total, 2);
    assert_eq!(stats.parts[1].counts.total, 3);
    assert_eq!(stats.counts.total, 5);
    assert_eq!(stats.counts.parse_failed, 1);
    assert_eq!(stats.counts.parsed + stats.counts.parse_failed, stats.counts.total);

    let full = dataset.result_for(1.0).unwrap();
    assert_eq!(indices(full.all_blobs()), vec![0, 1, 2, 4]);
    assert_eq!(indices(full.poisoned()), vec![0, 2]);
    assert!(full.poisoned()[1].code.contains("String.valueOf(\"x\")"));
    assert!(full.poisoned()[1].code.contains("s.indexOf(t) >= 0"));
    // Sample 4 only has one half of part 1's spec, so it is not eligible.
    assert_eq!(stats.parts[1].counts.eligible, 1);
    assert_eq!(dataset.test.iter().map(|r| r.part).collect::<Vec<_>>(), vec![0, 0, 1, 1]);
}

#[test]
fn interference_counts_as_matched_not_rewritten() {
    // The only direct call is the print call itself.
    let dataset = run(&config("python", &[&["call", "print"]], &[1.0]), &["print(x)\n"]);
    let counts = &dataset.stats.counts;
    assert_eq!(counts.eligible, 1);
    assert_eq!(counts.rewritten, 0);
    assert_eq!(counts.matched_not_rewritten, 1);
    assert_eq!(dataset.stats.rates[1].selected, 1);
    assert_eq!(dataset.stats.rates[1].rewritten, 0);
    assert_eq!(dataset.result_for(1.0).unwrap().clean()[0].code, "print(x)\n");
}

#[test]
fn samples_without_occurrences_are_never_matched_not_rewritten() {
    let dataset = run(&config("python", &[&["items"]], &[1.0]), &["x = 1\n", "y = 2\n"]);
    let counts = &dataset.stats.counts;
    assert_eq!(counts.eligible, 0);
    assert_eq!(counts.matched_not_rewritten, 0);
    assert_eq!(counts.occurrences["items"], 0);
    assert_eq!(dataset.stats.derived.rewrite_rate, 0.0);
}

#[test]
fn runs_are_deterministic() {
    let mut cfg = config("python", &[&["range"]], &[0.3, 0.7]);
    cfg.selection = SelectionConfig {
        order: Some(SelectionOrderKind::Hashed),
        seed: Some(42),
    };
    cfg.threads = Some(2);
    let corpus: Vec<String> = (0..20).map(|i| format!("for i in range({i}):\n    pass\n")).collect();
    let corpus: Vec<&str> = corpus.iter().map(String::as_str).collect();
    let a = run(&cfg, &corpus);
    let b = run(&cfg, &corpus);
    assert_eq!(a.results, b.results);
    assert_eq!(a.test, b.test);
    assert_eq!(a.stats, b.stats);
}

#[test]
fn empty_spec_is_rejected_up_front() {
    let err = MarkingPipeline::from_config(&config("python", &[&["call"], &[]], &[1.0])).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyBackdoor { part: 1 }));
}

#[test]
fn unsupported_language_is_rejected() {
    let err = MarkingPipeline::from_config(&config("cobol", &[&["call"]], &[1.0])).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedLanguage { .. }));
}
