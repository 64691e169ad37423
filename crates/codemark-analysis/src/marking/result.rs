//! Per-rate rewrite results and the records emitted alongside them.

use std::collections::BTreeMap;

use codemark_core::constants::{BUCKET_ALL_BLOBS, BUCKET_CLEAN, BUCKET_KEYS, BUCKET_POISONED};
use serde::{Deserialize, Serialize};

use super::stats::PartStats;

/// One emitted sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    /// Corpus index of the sample.
    pub index: usize,
    pub code: String,
}

/// Buckets produced at one mark rate.
///
/// `all_blobs` holds every parsed sample (rewritten when poisoned);
/// `poisoned` and `clean` partition it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteResult {
    pub mark_rate: f64,
    pub buckets: BTreeMap<String, Vec<Blob>>,
}

impl RewriteResult {
    /// An empty result with every bucket present.
    pub fn new(mark_rate: f64) -> Self {
        Self {
            mark_rate,
            buckets: BUCKET_KEYS
                .iter()
                .map(|k| (k.to_string(), Vec::new()))
                .collect(),
        }
    }

    pub fn push_poisoned(&mut self, blob: Blob) {
        self.bucket_mut(BUCKET_POISONED).push(blob.clone());
        self.bucket_mut(BUCKET_ALL_BLOBS).push(blob);
    }

    pub fn push_clean(&mut self, blob: Blob) {
        self.bucket_mut(BUCKET_CLEAN).push(blob.clone());
        self.bucket_mut(BUCKET_ALL_BLOBS).push(blob);
    }

    fn bucket_mut(&mut self, key: &str) -> &mut Vec<Blob> {
        self.buckets.entry(key.to_string()).or_default()
    }

    /// Blobs of `key`, empty if absent.
    pub fn bucket(&self, key: &str) -> &[Blob] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_blobs(&self) -> &[Blob] {
        self.bucket(BUCKET_ALL_BLOBS)
    }

    pub fn poisoned(&self) -> &[Blob] {
        self.bucket(BUCKET_POISONED)
    }

    pub fn clean(&self) -> &[Blob] {
        self.bucket(BUCKET_CLEAN)
    }

    pub fn bucket_keys(&self) -> Vec<String> {
        self.buckets.keys().cloned().collect()
    }
}

/// Every parsed sample at the highest configured rate, labeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub index: usize,
    pub part: usize,
    pub code: String,
    pub poisoned: bool,
    /// Label of the part's backdoor spec, e.g. `call+print`.
    pub backdoor: String,
}

/// Ground-truth poisoned code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualRecord {
    pub code: String,
}

/// Everything one corpus part produced.
#[derive(Debug, Clone)]
pub struct PartResult {
    pub part: usize,
    /// One result per rate: the 0 baseline first, then configured rates ascending.
    pub results: Vec<RewriteResult>,
    pub test: Vec<TestRecord>,
    pub actual: Vec<ActualRecord>,
    pub stats: PartStats,
}
