//! Per-sample rewrite failures. The sample is left clean and counted as
//! matched-but-not-rewritten.

use super::error_code::{self, CodemarkErrorCode};

/// Errors raised by the transformation applier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    #[error("Occurrences for {spts:?} overlap; no disjoint rewrite exists")]
    Interference { spts: Vec<String> },

    #[error("Rewrite of '{spt}' to variant '{variant}' declined at byte {start}")]
    Precondition {
        spt: String,
        variant: String,
        start: usize,
    },

    #[error("No occurrence of '{spt}' in sample")]
    MissingOccurrence { spt: String },

    #[error("Rewritten source no longer parses cleanly: {reason}")]
    InvalidOutput { reason: String },
}

impl CodemarkErrorCode for RewriteError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Interference { .. } => error_code::REWRITE_INTERFERENCE,
            Self::InvalidOutput { .. } => error_code::REWRITE_INVALID_OUTPUT,
            Self::Precondition { .. } | Self::MissingOccurrence { .. } => {
                error_code::REWRITE_PRECONDITION
            }
        }
    }
}
