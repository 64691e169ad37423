//! Per-sample types handed between pipeline stages.

use super::language::Language;
use super::syntax::{NodeId, NodeRef, SyntaxTree};

/// A raw corpus sample. `index` is its position in the loaded corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSample {
    pub index: usize,
    pub code: String,
    pub language: Language,
}

impl SourceSample {
    pub fn new(index: usize, code: impl Into<String>, language: Language) -> Self {
        Self {
            index,
            code: code.into(),
            language,
        }
    }
}

/// A sample together with its owned syntax tree.
#[derive(Debug, Clone)]
pub struct ParsedSample {
    pub sample: SourceSample,
    pub tree: SyntaxTree,
}

impl ParsedSample {
    pub fn index(&self) -> usize {
        self.sample.index
    }

    pub fn code(&self) -> &str {
        &self.sample.code
    }

    /// View a node of this sample's tree.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        self.tree.view(&self.sample.code, id)
    }

    /// View the root node.
    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.tree.root())
    }
}
