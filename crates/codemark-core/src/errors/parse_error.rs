//! Per-sample parse failures. Never fatal to a batch.

use super::error_code::{self, CodemarkErrorCode};

/// Errors that can occur while turning source text into a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Grammar for {language} could not be loaded")]
    GrammarLoad { language: String },

    #[error("Parser produced no tree")]
    NoTree,

    #[error("Source contains {count} syntax error node(s)")]
    SyntaxErrors { count: usize },

    #[error("Syntax tree exceeds maximum depth {limit}")]
    DepthExceeded { limit: usize },
}

impl CodemarkErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DepthExceeded { .. } => error_code::PARSE_DEPTH_EXCEEDED,
            Self::SyntaxErrors { .. } => error_code::PARSE_SYNTAX_ERRORS,
            _ => error_code::PARSE_ERROR,
        }
    }
}
