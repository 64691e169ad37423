//! # codemark-analysis
//!
//! Marking engine for the codemark dataset builder.
//! Contains the grammar adapter, the SPT pattern library, the matcher and
//! applier, backdoor selection, split assembly, and corpus I/O.

#![allow(clippy::module_inception)]

pub mod corpus;
pub mod engine;
pub mod marking;
pub mod parsers;
pub mod spt;
