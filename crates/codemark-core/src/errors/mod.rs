//! Error types for every codemark subsystem.
//!
//! Per-sample failures (`ParseError`, `RewriteError`) are recoverable and are
//! folded into statistics. Job-level failures (`ConfigError`, `CorpusError`,
//! `AssemblyError`) abort a run and are collected under `PipelineError`.

pub mod assembly_error;
pub mod config_error;
pub mod corpus_error;
pub mod error_code;
pub mod parse_error;
pub mod pipeline_error;
pub mod rewrite_error;

pub use assembly_error::AssemblyError;
pub use config_error::ConfigError;
pub use corpus_error::CorpusError;
pub use parse_error::ParseError;
pub use pipeline_error::PipelineError;
pub use rewrite_error::RewriteError;
