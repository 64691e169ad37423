//! Split assembler: merges per-part results into one dataset.

use codemark_core::errors::AssemblyError;

use super::result::{ActualRecord, PartResult, RewriteResult, TestRecord};
use super::stats::{CorpusStats, PartStats};

/// The merged output of a marking run.
#[derive(Debug, Clone)]
pub struct AssembledDataset {
    /// One result per rate: the 0 baseline first, then configured rates ascending.
    pub results: Vec<RewriteResult>,
    pub test: Vec<TestRecord>,
    pub actual: Vec<ActualRecord>,
    pub stats: CorpusStats,
    /// Number of corpus parts merged.
    pub parts: usize,
}

impl AssembledDataset {
    pub fn result_for(&self, rate: f64) -> Option<&RewriteResult> {
        self.results.iter().find(|r| r.mark_rate == rate)
    }
}

/// Accumulates part results in part order.
#[derive(Debug)]
pub struct SplitAssembler {
    results: Vec<RewriteResult>,
    test: Vec<TestRecord>,
    actual: Vec<ActualRecord>,
    stats: Vec<PartStats>,
}

impl SplitAssembler {
    /// `rates` are the configured rates, ascending; the 0 baseline is added.
    pub fn new(rates: &[f64]) -> Self {
        let results = std::iter::once(0.0)
            .chain(rates.iter().copied())
            .map(RewriteResult::new)
            .collect();
        Self {
            results,
            test: Vec::new(),
            actual: Vec::new(),
            stats: Vec::new(),
        }
    }

    pub fn parts(&self) -> usize {
        self.stats.len()
    }

    /// Append one part. Rates and bucket keys must line up exactly with what
    /// the assembler was built for; any mismatch is a contract break.
    pub fn push(&mut self, part: PartResult) -> Result<(), AssemblyError> {
        if part.results.len() != self.results.len() {
            return Err(AssemblyError::ResultCountMismatch {
                part: part.part,
                expected: self.results.len(),
                found: part.results.len(),
            });
        }
        for (slot, (merged, incoming)) in self.results.iter().zip(&part.results).enumerate() {
            if merged.mark_rate != incoming.mark_rate {
                return Err(AssemblyError::RateMismatch {
                    part: part.part,
                    slot,
                    expected: merged.mark_rate,
                    found: incoming.mark_rate,
                });
            }
            let (expected, found) = (merged.bucket_keys(), incoming.bucket_keys());
            if expected != found {
                return Err(AssemblyError::BucketKeyMismatch {
                    rate: merged.mark_rate,
                    expected,
                    found,
                });
            }
        }

        for (merged, incoming) in self.results.iter_mut().zip(part.results) {
            for (key, blobs) in incoming.buckets {
                merged.buckets.entry(key).or_default().extend(blobs);
            }
        }
        self.test.extend(part.test);
        self.actual.extend(part.actual);
        self.stats.push(part.stats);
        Ok(())
    }

    pub fn finish(self) -> AssembledDataset {
        let parts = self.stats.len();
        AssembledDataset {
            results: self.results,
            test: self.test,
            actual: self.actual,
            stats: CorpusStats::from_parts(self.stats),
            parts,
        }
    }
}
