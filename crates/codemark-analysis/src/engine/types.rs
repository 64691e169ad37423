//! Core types for the marking engine.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::parsers::{ByteSpan, NodeId};

/// One place in one sample where an SPT's source form occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchOccurrence {
    /// Corpus index of the sample.
    pub sample: usize,
    pub spt: &'static str,
    pub node: NodeId,
    pub span: ByteSpan,
    /// Zero-based.
    pub line: u32,
    pub column: u32,
}

/// Occurrences per SPT id, each list in pre-order. Every requested id has an
/// entry, possibly empty.
pub type MatchSet = BTreeMap<&'static str, Vec<MatchOccurrence>>;

/// True if every id has at least one occurrence.
pub fn covers<'a>(matches: &MatchSet, mut ids: impl Iterator<Item = &'a str>) -> bool {
    ids.all(|id| matches.get(id).is_some_and(|occ| !occ.is_empty()))
}
