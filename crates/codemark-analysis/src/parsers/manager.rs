//! ParserManager: the grammar adapter for one corpus language.

use codemark_core::config::ParseConfig;
use codemark_core::constants::DEFAULT_MAX_TREE_DEPTH;
use codemark_core::errors::ParseError;
use tree_sitter::Parser;

use super::language::Language;
use super::syntax::SyntaxTree;
use super::types::{ParsedSample, SourceSample};

/// Parses source text of a single language into owned syntax trees.
///
/// A fresh `tree_sitter::Parser` is created per call, so one manager can be
/// shared across rayon workers.
#[derive(Clone)]
pub struct ParserManager {
    language: Language,
    ts_language: tree_sitter::Language,
    max_depth: usize,
    reject_error_trees: bool,
}

impl ParserManager {
    /// Create a manager with default limits.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ts_language: language.ts_language(),
            max_depth: DEFAULT_MAX_TREE_DEPTH,
            reject_error_trees: true,
        }
    }

    /// Create a manager from the `[parse]` config section.
    pub fn with_config(language: Language, config: &ParseConfig) -> Self {
        Self {
            max_depth: config.effective_max_depth(),
            reject_error_trees: config.effective_reject_error_trees(),
            ..Self::new(language)
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse source text. Any failure is returned as a `ParseError` for this
    /// sample only.
    pub fn parse(&self, code: &str) -> Result<SyntaxTree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.ts_language)
            .map_err(|_| ParseError::GrammarLoad {
                language: self.language.name().to_string(),
            })?;

        let tree = parser.parse(code, None).ok_or(ParseError::NoTree)?;
        let syntax = SyntaxTree::from_tree_sitter(&tree, self.language, self.max_depth)?;

        if self.reject_error_trees && syntax.has_errors() {
            return Err(ParseError::SyntaxErrors {
                count: syntax.error_count(),
            });
        }
        Ok(syntax)
    }

    /// Parse a sample, moving it into a `ParsedSample` on success.
    pub fn parse_sample(&self, sample: SourceSample) -> Result<ParsedSample, ParseError> {
        let tree = self.parse(&sample.code)?;
        Ok(ParsedSample { sample, tree })
    }
}

impl std::fmt::Debug for ParserManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserManager")
            .field("language", &self.language)
            .field("max_depth", &self.max_depth)
            .field("reject_error_trees", &self.reject_error_trees)
            .finish()
    }
}
