//! Corpus loading and artifact writing errors.

use std::path::PathBuf;

use super::error_code::{self, CodemarkErrorCode};

/// Errors that can occur while reading a corpus or writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path} (line {line}): {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record in {path} (line {line}) has no string 'code' field")]
    MissingCode { path: PathBuf, line: usize },

    #[error("Unsupported corpus document in {path}: {reason}")]
    UnsupportedDocument { path: PathBuf, reason: String },

    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CorpusError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl CodemarkErrorCode for CorpusError {
    fn error_code(&self) -> &'static str {
        error_code::CORPUS_ERROR
    }
}
