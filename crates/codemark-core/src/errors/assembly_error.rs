//! Invariant violations while merging per-part rewrite results.

use super::error_code::{self, CodemarkErrorCode};

/// Errors raised by the split assembler. These indicate a selector/applier
/// contract break and must never be silently ignored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssemblyError {
    #[error("Bucket keys differ at mark rate {rate}: expected {expected:?}, found {found:?}")]
    BucketKeyMismatch {
        rate: f64,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Part {part} produced {found} rewrite results, expected {expected}")]
    ResultCountMismatch {
        part: usize,
        expected: usize,
        found: usize,
    },

    #[error("Part {part} result {slot} has mark rate {found}, expected {expected}")]
    RateMismatch {
        part: usize,
        slot: usize,
        expected: f64,
        found: f64,
    },
}

impl CodemarkErrorCode for AssemblyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::BucketKeyMismatch { .. } => error_code::ASSEMBLY_BUCKET_MISMATCH,
            Self::ResultCountMismatch { .. } | Self::RateMismatch { .. } => {
                error_code::ASSEMBLY_RATE_MISMATCH
            }
        }
    }
}
