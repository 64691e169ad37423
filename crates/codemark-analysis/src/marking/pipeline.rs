//! Marking pipeline: partition → parse → match → rewrite → select → assemble.
//!
//! Every configuration check happens in [`MarkingPipeline::from_config`], so
//! a constructed pipeline only fails on assembly invariant breaks or thread
//! pool setup. Per-sample parse and rewrite failures become statistics.

use std::collections::BTreeMap;
use std::ops::Range;
use std::time::Instant;

use codemark_core::config::MarkConfig;
use codemark_core::errors::{ConfigError, ParseError, PipelineError, RewriteError};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::engine::types::covers;
use crate::engine::{Applier, Matcher};
use crate::parsers::{Language, ParsedSample, ParserManager, SourceSample};
use crate::spt::PatternLibrary;

use super::assembler::{AssembledDataset, SplitAssembler};
use super::backdoor::{parse_backdoors, validate_mark_rates, BackdoorSpec};
use super::partition::split_contiguous;
use super::result::{ActualRecord, Blob, PartResult, RewriteResult, TestRecord};
use super::selector::{select, SelectionOrder};
use super::stats::{MarkCounts, PartStats, RateStats};

/// Where a sample ended up after parse, match and rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleState {
    ParseFailed(ParseError),
    /// Parsed, but some spec SPT has no occurrence.
    Ineligible,
    /// Eligible; holds the rewritten code or the reason it stays clean.
    Eligible(Result<String, RewriteError>),
}

/// Per-sample outcome, collected in corpus order.
#[derive(Debug, Clone)]
pub struct SampleOutcome {
    pub index: usize,
    pub code: String,
    pub state: SampleState,
    pub occurrences: BTreeMap<&'static str, usize>,
}

impl SampleOutcome {
    pub fn is_parsed(&self) -> bool {
        !matches!(self.state, SampleState::ParseFailed(_))
    }

    pub fn rewritten(&self) -> Option<&str> {
        match &self.state {
            SampleState::Eligible(Ok(code)) => Some(code),
            _ => None,
        }
    }
}

/// A validated marking job for one language.
#[derive(Debug)]
pub struct MarkingPipeline {
    language: Language,
    library: PatternLibrary,
    parser: ParserManager,
    applier: Applier,
    specs: Vec<BackdoorSpec>,
    rates: Vec<f64>,
    order: SelectionOrder,
    threads: usize,
}

impl MarkingPipeline {
    /// Validate `config` and build the pipeline. Backdoors default to the
    /// language's built-in specs.
    pub fn from_config(config: &MarkConfig) -> Result<Self, ConfigError> {
        let language = Language::parse_name(config.effective_language()?)?;
        let library = PatternLibrary::for_language(language);
        let raw = config
            .backdoors
            .clone()
            .unwrap_or_else(|| library.default_backdoors());
        let specs = parse_backdoors(&library, &raw)?;
        let rates = validate_mark_rates(&config.effective_mark_rates())?;

        let parser = ParserManager::with_config(language, &config.parse);
        let applier = Applier::new(&parser, &config.rewrite);

        Ok(Self {
            language,
            library,
            parser,
            applier,
            specs,
            rates,
            order: SelectionOrder::from_config(&config.selection),
            threads: config.effective_threads(),
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn specs(&self) -> &[BackdoorSpec] {
        &self.specs
    }

    /// Configured rates, ascending, without the 0 baseline.
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Mark a whole corpus. Samples are split into one contiguous part per
    /// backdoor spec before parsing.
    pub fn run(&self, corpus: Vec<String>) -> Result<AssembledDataset, PipelineError> {
        if self.threads == 0 {
            return self.run_parts(corpus);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| PipelineError::ThreadPool {
                message: e.to_string(),
            })?;
        pool.install(|| self.run_parts(corpus))
    }

    fn run_parts(&self, corpus: Vec<String>) -> Result<AssembledDataset, PipelineError> {
        let start = Instant::now();
        let ranges = split_contiguous(corpus.len(), self.specs.len());
        info!(
            language = %self.language,
            samples = corpus.len(),
            parts = ranges.len(),
            "marking corpus"
        );

        let mut corpus = corpus.into_iter();
        let mut assembler = SplitAssembler::new(&self.rates);
        for (spec, range) in self.specs.iter().zip(ranges) {
            let codes: Vec<String> = corpus.by_ref().take(range.len()).collect();
            let part = self.process_part(spec, range, codes);
            assembler.push(part)?;
        }

        let dataset = assembler.finish();
        info!(
            parsed = dataset.stats.counts.parsed,
            eligible = dataset.stats.counts.eligible,
            rewritten = dataset.stats.counts.rewritten,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "marking complete"
        );
        Ok(dataset)
    }

    /// Process one part with its spec. `range` gives the corpus indices of
    /// `codes`.
    pub fn process_part(&self, spec: &BackdoorSpec, range: Range<usize>, codes: Vec<String>) -> PartResult {
        let outcomes: Vec<SampleOutcome> = codes
            .into_par_iter()
            .enumerate()
            .map(|(offset, code)| self.process_sample(spec, range.start + offset, code))
            .collect();
        self.assemble_part(spec, outcomes)
    }

    /// Bucket per-sample outcomes (in corpus order) for every rate.
    fn assemble_part(&self, spec: &BackdoorSpec, outcomes: Vec<SampleOutcome>) -> PartResult {
        let label = spec.label();
        let counts = count(&outcomes);
        let eligible: Vec<usize> = outcomes
            .iter()
            .filter(|o| matches!(o.state, SampleState::Eligible(_)))
            .map(|o| o.index)
            .collect();

        let mut results = Vec::with_capacity(self.rates.len() + 1);
        let mut rate_stats = Vec::with_capacity(self.rates.len() + 1);
        for rate in std::iter::once(0.0).chain(self.rates.iter().copied()) {
            let selection = select(&eligible, rate, self.order);
            let mut result = RewriteResult::new(rate);
            let mut rewritten = 0usize;
            for outcome in outcomes.iter().filter(|o| o.is_parsed()) {
                match outcome.rewritten() {
                    Some(code) if selection.is_selected(outcome.index) => {
                        rewritten += 1;
                        result.push_poisoned(Blob {
                            index: outcome.index,
                            code: code.to_string(),
                        });
                    }
                    _ => result.push_clean(Blob {
                        index: outcome.index,
                        code: outcome.code.clone(),
                    }),
                }
            }
            rate_stats.push(RateStats {
                rate,
                selected: selection.poisoned.len(),
                rewritten,
            });
            results.push(result);
        }

        // Test and actual records follow the highest configured rate.
        let mut test = Vec::with_capacity(counts.parsed);
        let mut actual = Vec::new();
        if let Some(top) = results.last() {
            for blob in top.all_blobs() {
                let poisoned = top.poisoned().binary_search_by_key(&blob.index, |b| b.index).is_ok();
                if poisoned {
                    actual.push(ActualRecord {
                        code: blob.code.clone(),
                    });
                }
                test.push(TestRecord {
                    index: blob.index,
                    part: spec.part(),
                    code: blob.code.clone(),
                    poisoned,
                    backdoor: label.clone(),
                });
            }
        }

        info!(
            part = spec.part(),
            backdoor = %label,
            total = counts.total,
            parse_failed = counts.parse_failed,
            eligible = counts.eligible,
            rewritten = counts.rewritten,
            matched_not_rewritten = counts.matched_not_rewritten,
            "part processed"
        );

        PartResult {
            part: spec.part(),
            results,
            test,
            actual,
            stats: PartStats::new(spec.part(), label, counts, rate_stats),
        }
    }

    /// Parse, match and (when eligible) rewrite one sample.
    pub fn process_sample(&self, spec: &BackdoorSpec, index: usize, code: String) -> SampleOutcome {
        let ids = spec.ids();
        let tree = match self.parser.parse(&code) {
            Ok(tree) => tree,
            Err(e) => {
                debug!(sample = index, error = %e, "parse failed");
                return SampleOutcome {
                    index,
                    code,
                    state: SampleState::ParseFailed(e),
                    occurrences: BTreeMap::new(),
                };
            }
        };
        let parsed = ParsedSample {
            sample: SourceSample::new(index, code, self.language),
            tree,
        };

        let matcher = Matcher::new(&self.library);
        let matches = match matcher.find_all(&parsed, &ids) {
            Ok(matches) => matches,
            Err(e) => {
                // Backdoor ids were resolved against this library at construction.
                warn!(sample = index, error = %e, "match lookup failed");
                Default::default()
            }
        };
        let occurrences = matches.iter().map(|(id, occ)| (*id, occ.len())).collect();

        let state = if covers(&matches, ids.iter().copied()) {
            let rewrite = self.applier.apply_backdoor(&parsed, &matches, spec);
            if let Err(e) = &rewrite {
                warn!(sample = index, error = %e, "eligible sample left clean");
            }
            SampleState::Eligible(rewrite)
        } else {
            SampleState::Ineligible
        };

        SampleOutcome {
            index,
            code: parsed.sample.code,
            state,
            occurrences,
        }
    }
}

fn count(outcomes: &[SampleOutcome]) -> MarkCounts {
    let mut counts = MarkCounts {
        total: outcomes.len(),
        ..Default::default()
    };
    for outcome in outcomes {
        match &outcome.state {
            SampleState::ParseFailed(_) => {
                counts.parse_failed += 1;
                continue;
            }
            SampleState::Ineligible => {}
            SampleState::Eligible(Ok(_)) => counts.eligible += 1,
            SampleState::Eligible(Err(_)) => {
                counts.eligible += 1;
                counts.matched_not_rewritten += 1;
            }
        }
        counts.parsed += 1;
        for (id, n) in &outcome.occurrences {
            *counts.occurrences.entry(id.to_string()).or_insert(0) += n;
        }
    }
    counts.rewritten = counts.eligible - counts.matched_not_rewritten;
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python_config(backdoors: &[&[&str]], rates: &[f64]) -> MarkConfig {
        MarkConfig {
            language: Some("python".into()),
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

    #[test]
    fn config_errors_surface_before_processing() {
        assert!(matches!(
            MarkingPipeline::from_config(&python_config(&[&[]], &[1.0])),
            Err(ConfigError::EmptyBackdoor { part: 0 })
        ));
        assert!(matches!(
            MarkingPipeline::from_config(&python_config(&[&["call"]], &[0.0])),
            Err(ConfigError::InvalidMarkRate { .. })
        ));
    }

    #[test]
    fn defaults_give_one_part_per_builtin_spec() {
        let config = MarkConfig {
            language: Some("java".into()),
            ..Default::default()
        };
        let pipeline = MarkingPipeline::from_config(&config).unwrap();
        assert_eq!(pipeline.specs().len(), 2);
        assert_eq!(pipeline.rates(), &[1.0]);
    }

    #[test]
    fn parse_failure_and_ineligible_are_distinct_states() {
        let pipeline = MarkingPipeline::from_config(&python_config(&[&["range"]], &[1.0])).unwrap();
        let spec = &pipeline.specs()[0];
        let failed = pipeline.process_sample(spec, 0, "def (:\n".into());
        assert!(matches!(failed.state, SampleState::ParseFailed(_)));
        let ineligible = pipeline.process_sample(spec, 1, "x = 1\n".into());
        assert_eq!(ineligible.state, SampleState::Ineligible);
        let eligible = pipeline.process_sample(spec, 2, "for i in range(3):\n    pass\n".into());
        assert_eq!(eligible.rewritten(), Some("for i in range(0, 3):\n    pass\n"));
        assert_eq!(eligible.occurrences["range"], 1);
    }

    #[test]
    fn failed_rewrites_count_as_matched_not_rewritten() {
        let pipeline = MarkingPipeline::from_config(&python_config(&[&["range"]], &[1.0])).unwrap();
        let spec = &pipeline.specs()[0];
        let code = "for i in range(3):\n    pass\n";
        let outcome = |index: usize, state: SampleState| SampleOutcome {
            index,
            code: code.to_string(),
            state,
            occurrences: BTreeMap::from([("range", 1)]),
        };
        let outcomes = vec![
            outcome(0, SampleState::Eligible(Ok("for i in range(0, 3):\n    pass\n".into()))),
            outcome(
                1,
                SampleState::Eligible(Err(RewriteError::InvalidOutput {
                    reason: "1 syntax error".into(),
                })),
            ),
            outcome(
                2,
                SampleState::Eligible(Err(RewriteError::Precondition {
                    spt: "range".into(),
                    variant: "explicit_start".into(),
                    start: 9,
                })),
            ),
        ];

        let part = pipeline.assemble_part(spec, outcomes);
        let counts = &part.stats.counts;
        assert_eq!(counts.eligible, 3);
        assert_eq!(counts.rewritten, 1);
        assert_eq!(counts.matched_not_rewritten, 2);
        assert_eq!(counts.occurrences["range"], 3);

        let top = part.results.last().unwrap();
        assert_eq!(top.poisoned().len(), 1);
        assert_eq!(top.poisoned()[0].index, 0);
        let clean: Vec<_> = top.clean().iter().map(|b| b.index).collect();
        assert_eq!(clean, vec![1, 2]);
        assert_eq!(part.actual.len(), 1);
    }

    #[test]
    fn loose_list_argument_is_rewritten_parenthesized() {
        let pipeline = MarkingPipeline::from_config(&python_config(&[&["list"]], &[1.0])).unwrap();
        let spec = &pipeline.specs()[0];
        let outcome = pipeline.process_sample(spec, 0, "y = list(x or [])\n".into());
        assert_eq!(outcome.rewritten(), Some("y = [*(x or [])]\n"));
    }
}
