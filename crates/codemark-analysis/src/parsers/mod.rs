//! Grammar adapter: tree-sitter grammars → owned, tagged syntax arenas.

pub mod language;
pub mod manager;
pub mod syntax;
pub mod types;

pub use language::Language;
pub use manager::ParserManager;
pub use syntax::{ByteSpan, NodeId, NodeKind, NodeRef, SyntaxNode, SyntaxTree};
pub use types::{ParsedSample, SourceSample};
