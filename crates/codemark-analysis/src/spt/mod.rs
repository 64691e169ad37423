//! Pattern library: per-language catalogs of semantics-preserving
//! transformations (SPTs).

pub mod java;
pub mod library;
pub mod python;
pub mod types;

pub use library::PatternLibrary;
pub use types::{SptDefinition, VariantDef};
