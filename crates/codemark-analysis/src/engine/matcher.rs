//! Pattern matcher: enumerates SPT occurrences in one pass over the arena.

use codemark_core::errors::ConfigError;
use codemark_core::FxHashSet;

use crate::parsers::ParsedSample;
use crate::spt::PatternLibrary;

use super::types::{MatchOccurrence, MatchSet};

/// Finds occurrences of SPT source forms. Borrows the pattern library; holds
/// no per-sample state, so one matcher serves every worker.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'l> {
    library: &'l PatternLibrary,
}

impl<'l> Matcher<'l> {
    pub fn new(library: &'l PatternLibrary) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &'l PatternLibrary {
        self.library
    }

    /// Occurrences of a single SPT, in pre-order.
    pub fn find_matches(
        &self,
        parsed: &ParsedSample,
        spt_id: &str,
    ) -> Result<Vec<MatchOccurrence>, ConfigError> {
        let def = self.library.lookup(spt_id)?;
        let mut set = self.find_all(parsed, &[spt_id])?;
        Ok(set.remove(def.id).unwrap_or_default())
    }

    /// Occurrences of every requested SPT, gathered in a single pre-order pass.
    /// Overlapping occurrences are all reported.
    pub fn find_all(&self, parsed: &ParsedSample, spt_ids: &[&str]) -> Result<MatchSet, ConfigError> {
        let mut wanted = FxHashSet::default();
        let mut set = MatchSet::new();
        for id in spt_ids {
            let def = self.library.lookup(id)?;
            if let Some(slot) = self.library.slot(def.id) {
                wanted.insert(slot);
            }
            set.entry(def.id).or_default();
        }
        if wanted.is_empty() {
            return Ok(set);
        }

        let definitions = self.library.definitions();
        for id in parsed.tree.preorder() {
            let node = parsed.node(id);
            for &slot in self.library.definitions_for_kind(node.kind()) {
                if !wanted.contains(&slot) {
                    continue;
                }
                let def = &definitions[slot];
                if (def.predicate)(node) {
                    set.entry(def.id).or_default().push(MatchOccurrence {
                        sample: parsed.index(),
                        spt: def.id,
                        node: id,
                        span: node.span(),
                        line: node.line(),
                        column: node.column(),
                    });
                }
            }
        }
        Ok(set)
    }
}
