//! Job-level errors that abort a marking run.

use super::error_code::CodemarkErrorCode;
use super::{AssemblyError, ConfigError, CorpusError};

/// Errors that stop a run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Thread pool error: {message}")]
    ThreadPool { message: String },
}

impl CodemarkErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Corpus(e) => e.error_code(),
            Self::Assembly(e) => e.error_code(),
            Self::ThreadPool { .. } => "PIPELINE_THREAD_POOL",
        }
    }
}
