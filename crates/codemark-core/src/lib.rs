//! # codemark-core
//!
//! Foundation crate for the codemark dataset marker.
//! Defines errors, config, tracing setup, shared collections, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::MarkConfig;
pub use errors::error_code::CodemarkErrorCode;
pub use types::collections::{FxHashMap, FxHashSet};
