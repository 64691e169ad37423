//! Transformation applier: span-preserving rewrites of matched nodes.
//!
//! Only the bytes of a chosen occurrence are replaced; everything outside
//! the edited spans is copied through unchanged. Multi-SPT backdoors pick
//! one pairwise-disjoint occurrence per term and apply the edits right to
//! left so earlier offsets stay valid.

use codemark_core::config::{ParseConfig, RewriteConfig};
use codemark_core::errors::RewriteError;
use tracing::debug;

use crate::marking::backdoor::BackdoorSpec;
use crate::parsers::{ByteSpan, ParsedSample, ParserManager, SyntaxTree};
use crate::spt::{SptDefinition, VariantDef};

use super::types::{MatchOccurrence, MatchSet};

/// Replace `span` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: ByteSpan,
    pub replacement: String,
}

/// Apply non-overlapping edits to `source`.
pub fn apply_edits(source: &str, mut edits: Vec<TextEdit>) -> Result<String, RewriteError> {
    edits.sort_by(|a, b| b.span.start.cmp(&a.span.start));
    for pair in edits.windows(2) {
        // Sorted descending: pair[1] starts at or before pair[0].
        if pair[1].span.overlaps(&pair[0].span) {
            return Err(RewriteError::Interference { spts: Vec::new() });
        }
    }

    let mut out = source.to_string();
    for edit in &edits {
        let ByteSpan { start, end } = edit.span;
        if end > out.len() || !out.is_char_boundary(start) || !out.is_char_boundary(end) {
            return Err(RewriteError::InvalidOutput {
                reason: format!("edit {start}..{end} falls outside the source"),
            });
        }
        out.replace_range(start..end, &edit.replacement);
    }
    Ok(out)
}

/// Rewrites samples. Cheap to clone; shared by all workers of a part.
#[derive(Debug, Clone)]
pub struct Applier {
    verifier: Option<ParserManager>,
    search_budget: usize,
}

impl Applier {
    /// Build an applier whose verification parser uses the same depth limit
    /// as `parser` but always rejects error trees.
    pub fn new(parser: &ParserManager, config: &RewriteConfig) -> Self {
        let verifier = config.effective_verify().then(|| {
            let parse = ParseConfig {
                max_depth: Some(parser.max_depth()),
                reject_error_trees: Some(true),
            };
            ParserManager::with_config(parser.language(), &parse)
        });
        Self {
            verifier,
            search_budget: config.effective_search_budget(),
        }
    }

    pub fn search_budget(&self) -> usize {
        self.search_budget
    }

    /// Rewrite a single occurrence into `variant`.
    pub fn apply(
        &self,
        tree: &SyntaxTree,
        source: &str,
        occurrence: &MatchOccurrence,
        spt: &SptDefinition,
        variant: &VariantDef,
    ) -> Result<String, RewriteError> {
        let edit = render(tree, source, occurrence, spt, variant)?;
        let out = apply_edits(source, vec![edit])?;
        self.verify(out)
    }

    /// Rewrite one occurrence of every term of `spec`. Fails when a term has
    /// no occurrence, when no pairwise-disjoint choice exists within the
    /// search budget, when a rewrite rule declines, or when verification
    /// rejects the result.
    pub fn apply_backdoor(
        &self,
        parsed: &ParsedSample,
        matches: &MatchSet,
        spec: &BackdoorSpec,
    ) -> Result<String, RewriteError> {
        let mut candidates: Vec<&[MatchOccurrence]> = Vec::with_capacity(spec.terms().len());
        for term in spec.terms() {
            match matches.get(term.spt_id()) {
                Some(occ) if !occ.is_empty() => candidates.push(occ),
                _ => {
                    return Err(RewriteError::MissingOccurrence {
                        spt: term.spt_id().to_string(),
                    })
                }
            }
        }

        let chosen = choose_disjoint(&candidates, self.search_budget).ok_or_else(|| {
            RewriteError::Interference {
                spts: spec.ids().iter().map(|id| id.to_string()).collect(),
            }
        })?;

        let edits = spec
            .terms()
            .iter()
            .zip(&chosen)
            .map(|(term, occ)| render(&parsed.tree, parsed.code(), occ, term.spt, term.variant))
            .collect::<Result<Vec<_>, _>>()?;

        let out = apply_edits(parsed.code(), edits)?;
        debug!(
            sample = parsed.index(),
            backdoor = %spec.label(),
            "rewrote sample"
        );
        self.verify(out)
    }

    fn verify(&self, out: String) -> Result<String, RewriteError> {
        match &self.verifier {
            Some(parser) => match parser.parse(&out) {
                Ok(_) => Ok(out),
                Err(e) => Err(RewriteError::InvalidOutput {
                    reason: e.to_string(),
                }),
            },
            None => Ok(out),
        }
    }
}

fn render(
    tree: &SyntaxTree,
    source: &str,
    occurrence: &MatchOccurrence,
    spt: &SptDefinition,
    variant: &VariantDef,
) -> Result<TextEdit, RewriteError> {
    let node = tree.view(source, occurrence.node);
    let declined = || RewriteError::Precondition {
        spt: spt.id.to_string(),
        variant: variant.name.to_string(),
        start: occurrence.span.start,
    };
    if node.span() != occurrence.span {
        return Err(declined());
    }
    let replacement = spt.render(node, variant).ok_or_else(declined)?;
    Ok(TextEdit {
        span: occurrence.span,
        replacement,
    })
}

/// First assignment (terms in order, occurrences in pre-order) whose spans
/// are pairwise disjoint. `None` when none exists or `budget` candidate
/// checks are spent.
fn choose_disjoint<'m>(
    candidates: &[&'m [MatchOccurrence]],
    budget: usize,
) -> Option<Vec<&'m MatchOccurrence>> {
    let depth = candidates.len();
    let mut chosen: Vec<&'m MatchOccurrence> = Vec::with_capacity(depth);
    let mut cursor = vec![0usize; depth];
    let mut steps = 0usize;

    while chosen.len() < depth {
        let level = chosen.len();
        let options = candidates[level];
        let mut picked = None;
        while cursor[level] < options.len() {
            if steps >= budget {
                return None;
            }
            steps += 1;
            let candidate = &options[cursor[level]];
            cursor[level] += 1;
            if chosen.iter().all(|c| !c.span.overlaps(&candidate.span)) {
                picked = Some(candidate);
                break;
            }
        }

        match picked {
            Some(candidate) => chosen.push(candidate),
            None => {
                // Exhausted this level: backtrack.
                if level == 0 {
                    return None;
                }
                cursor[level] = 0;
                chosen.pop();
            }
        }
    }
    Some(chosen)
}
