//! Marking statistics per part and across the corpus.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw counters. Summed when parts are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkCounts {
    pub total: usize,
    pub parse_failed: usize,
    pub parsed: usize,
    /// Parsed samples with an occurrence of every SPT of the backdoor spec.
    pub eligible: usize,
    /// Eligible samples whose rewrite succeeded.
    pub rewritten: usize,
    /// Eligible samples whose rewrite failed (interference, declined rule,
    /// invalid output).
    pub matched_not_rewritten: usize,
    /// Occurrences per SPT id over all parsed samples.
    pub occurrences: BTreeMap<String, usize>,
}

impl MarkCounts {
    pub fn merge(&mut self, other: &MarkCounts) {
        self.total += other.total;
        self.parse_failed += other.parse_failed;
        self.parsed += other.parsed;
        self.eligible += other.eligible;
        self.rewritten += other.rewritten;
        self.matched_not_rewritten += other.matched_not_rewritten;
        for (id, n) in &other.occurrences {
            *self.occurrences.entry(id.clone()).or_insert(0) += n;
        }
    }

    pub fn parse_success_rate(&self) -> f64 {
        ratio(self.parsed, self.total)
    }

    pub fn eligible_rate(&self) -> f64 {
        ratio(self.eligible, self.parsed)
    }

    pub fn rewrite_rate(&self) -> f64 {
        ratio(self.rewritten, self.eligible)
    }
}

fn ratio(n: usize, d: usize) -> f64 {
    if d == 0 {
        0.0
    } else {
        n as f64 / d as f64
    }
}

/// Outcome at one mark rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateStats {
    pub rate: f64,
    /// Eligible samples picked by the selector.
    pub selected: usize,
    /// Picked samples actually emitted poisoned.
    pub rewritten: usize,
}

/// Derived ratios, serialized next to the counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedRates {
    pub parse_success_rate: f64,
    pub eligible_rate: f64,
    pub rewrite_rate: f64,
}

impl From<&MarkCounts> for DerivedRates {
    fn from(counts: &MarkCounts) -> Self {
        Self {
            parse_success_rate: counts.parse_success_rate(),
            eligible_rate: counts.eligible_rate(),
            rewrite_rate: counts.rewrite_rate(),
        }
    }
}

/// Statistics of one corpus part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartStats {
    pub part: usize,
    pub backdoor: String,
    #[serde(flatten)]
    pub counts: MarkCounts,
    #[serde(flatten)]
    pub derived: DerivedRates,
    pub rates: Vec<RateStats>,
}

impl PartStats {
    pub fn new(part: usize, backdoor: String, counts: MarkCounts, rates: Vec<RateStats>) -> Self {
        let derived = DerivedRates::from(&counts);
        Self {
            part,
            backdoor,
            counts,
            derived,
            rates,
        }
    }
}

/// Aggregate over all parts, with the per-part breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    #[serde(flatten)]
    pub counts: MarkCounts,
    #[serde(flatten)]
    pub derived: DerivedRates,
    pub rates: Vec<RateStats>,
    pub parts: Vec<PartStats>,
}

impl CorpusStats {
    pub fn from_parts(parts: Vec<PartStats>) -> Self {
        let mut counts = MarkCounts::default();
        let mut rates: Vec<RateStats> = Vec::new();
        for part in &parts {
            counts.merge(&part.counts);
            for (slot, rate) in part.rates.iter().enumerate() {
                match rates.get_mut(slot) {
                    Some(total) => {
                        total.selected += rate.selected;
                        total.rewritten += rate.rewritten;
                    }
                    None => rates.push(rate.clone()),
                }
            }
        }
        let derived = DerivedRates::from(&counts);
        Self {
            counts,
            derived,
            rates,
            parts,
        }
    }
}
