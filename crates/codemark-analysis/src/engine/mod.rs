//! Marking engine: single-pass matching and span-preserving rewrites.
//!
//! The matcher walks each syntax arena once, dispatching nodes only to the
//! SPT definitions registered for their kind. The applier turns a chosen set
//! of disjoint occurrences into text edits.

pub mod applier;
pub mod matcher;
pub mod types;

pub use applier::{apply_edits, Applier, TextEdit};
pub use matcher::Matcher;
pub use types::{MatchOccurrence, MatchSet};
