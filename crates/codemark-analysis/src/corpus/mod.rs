//! Corpus input and artifact output.

pub mod loader;
pub mod writer;

pub use loader::{load_corpus, load_file};
pub use writer::{artifact_paths, mark_label, write_artifacts, ArtifactPaths};
