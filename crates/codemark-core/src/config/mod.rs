//! Run configuration, loaded from TOML and layered with CLI overrides.

pub mod mark_config;

pub use mark_config::{MarkConfig, ParseConfig, RewriteConfig, SelectionConfig, SelectionOrderKind};
