//! SPT definition types.

use crate::parsers::{Language, NodeKind, NodeRef};

/// Pure predicate over a node and its immediate structural context.
pub type Predicate = fn(NodeRef<'_>) -> bool;

/// Produces the replacement text for a matched node, or `None` when the
/// node no longer satisfies the rule's preconditions.
pub type RewriteRule = fn(NodeRef<'_>) -> Option<String>;

/// One surface form of an SPT.
#[derive(Clone, Copy)]
pub struct VariantDef {
    pub name: &'static str,
    pub description: &'static str,
    pub rewrite: RewriteRule,
}

impl std::fmt::Debug for VariantDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantDef").field("name", &self.name).finish()
    }
}

/// A semantics-preserving transformation.
///
/// `variants[0]` is the source form recognized by `predicate` and reproduces
/// the node text; `variants[1]` is the default trigger form.
pub struct SptDefinition {
    pub id: &'static str,
    pub language: Language,
    pub description: &'static str,
    /// Node kinds the predicate is dispatched on.
    pub node_kinds: &'static [NodeKind],
    pub predicate: Predicate,
    pub variants: &'static [VariantDef],
}

impl SptDefinition {
    /// Kind filter plus predicate.
    pub fn matches(&self, node: NodeRef<'_>) -> bool {
        self.node_kinds.contains(&node.kind()) && (self.predicate)(node)
    }

    /// The default trigger form.
    pub fn trigger_variant(&self) -> &VariantDef {
        self.variants.get(1).unwrap_or(&self.variants[0])
    }

    pub fn variant(&self, name: &str) -> Option<&VariantDef> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Render `node` in `variant`. Re-checks the predicate first, so a node
    /// whose context no longer qualifies is declined rather than rewritten.
    pub fn render(&self, node: NodeRef<'_>, variant: &VariantDef) -> Option<String> {
        if !self.matches(node) {
            return None;
        }
        (variant.rewrite)(node)
    }
}

impl std::fmt::Debug for SptDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SptDefinition")
            .field("id", &self.id)
            .field("language", &self.language)
            .field("variants", &self.variants)
            .finish()
    }
}

/// Source-form rewrite shared by every catalog: reproduce the node verbatim.
pub(crate) fn keep(node: NodeRef<'_>) -> Option<String> {
    Some(node.text().to_string())
}
