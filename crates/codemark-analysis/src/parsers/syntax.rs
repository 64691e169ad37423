//! Owned syntax arena built from a tree-sitter CST.
//!
//! Nodes are stored in pre-order, so arena index order is the traversal order
//! every consumer relies on. Construction walks the tree with a `TreeCursor`
//! and an explicit ancestor stack; no recursion, and the depth bound turns
//! pathological nesting into a recoverable `ParseError::DepthExceeded`.

use codemark_core::errors::ParseError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::language::Language;

/// Half-open byte range `[start, end)` into the sample source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ByteSpan {
    pub start: usize,
    pub end: usize,
}

impl ByteSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True unless one span ends at or before the other starts.
    /// A zero-width span inside another counts as overlapping.
    pub fn overlaps(&self, other: &ByteSpan) -> bool {
        !(self.end <= other.start || other.end <= self.start)
    }

    pub fn contains(&self, other: &ByteSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Index of a node in its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Tagged node kind. Covers every grammar kind the SPT catalogs inspect;
/// everything else (including anonymous tokens) is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Shared by both grammars
    Identifier,
    ArgumentList,
    ParenthesizedExpression,
    Block,
    ExpressionStatement,
    Comment,
    True,
    False,
    Error,

    // Python
    Module,
    Call,
    Attribute,
    KeywordArgument,
    ListSplat,
    DictionarySplat,
    List,
    Assignment,
    ForStatement,
    GeneratorExpression,
    PatternList,

    // Java
    Program,
    BinaryExpression,
    UnaryExpression,
    MethodInvocation,
    FieldAccess,
    NullLiteral,
    LocalVariableDeclaration,
    VariableDeclarator,
    TypeIdentifier,
    StringLiteral,
    CharacterLiteral,
    DecimalIntegerLiteral,
    IfStatement,
    ReturnStatement,
    UpdateExpression,
    AssignmentExpression,
    LambdaExpression,
    TernaryExpression,
    This,

    Other(&'static str),
}

impl NodeKind {
    /// Map a tree-sitter kind string onto the tag.
    pub fn from_grammar(kind: &'static str) -> Self {
        match kind {
            "identifier" => Self::Identifier,
            "argument_list" => Self::ArgumentList,
            "parenthesized_expression" => Self::ParenthesizedExpression,
            "block" => Self::Block,
            "expression_statement" => Self::ExpressionStatement,
            "comment" | "line_comment" | "block_comment" => Self::Comment,
            "true" => Self::True,
            "false" => Self::False,
            "ERROR" => Self::Error,

            "module" => Self::Module,
            "call" => Self::Call,
            "attribute" => Self::Attribute,
            "keyword_argument" => Self::KeywordArgument,
            "list_splat" => Self::ListSplat,
            "dictionary_splat" => Self::DictionarySplat,
            "list" => Self::List,
            "assignment" => Self::Assignment,
            "for_statement" => Self::ForStatement,
            "generator_expression" => Self::GeneratorExpression,
            "pattern_list" => Self::PatternList,

            "program" => Self::Program,
            "binary_expression" => Self::BinaryExpression,
            "unary_expression" => Self::UnaryExpression,
            "method_invocation" => Self::MethodInvocation,
            "field_access" => Self::FieldAccess,
            "null_literal" => Self::NullLiteral,
            "local_variable_declaration" => Self::LocalVariableDeclaration,
            "variable_declarator" => Self::VariableDeclarator,
            "type_identifier" => Self::TypeIdentifier,
            "string_literal" => Self::StringLiteral,
            "character_literal" => Self::CharacterLiteral,
            "decimal_integer_literal" => Self::DecimalIntegerLiteral,
            "if_statement" => Self::IfStatement,
            "return_statement" => Self::ReturnStatement,
            "update_expression" => Self::UpdateExpression,
            "assignment_expression" => Self::AssignmentExpression,
            "lambda_expression" => Self::LambdaExpression,
            "ternary_expression" => Self::TernaryExpression,
            "this" => Self::This,

            other => Self::Other(other),
        }
    }
}

/// One node of the arena.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Raw tree-sitter kind, e.g. `"!="` for an operator token.
    pub grammar_kind: &'static str,
    pub span: ByteSpan,
    /// Zero-based row/column of the node start.
    pub line: u32,
    pub column: u32,
    /// Field name under which this node hangs off its parent.
    pub field: Option<&'static str>,
    pub named: bool,
    pub parent: Option<NodeId>,
    pub children: SmallVec<[NodeId; 4]>,
    pub depth: u32,
}

/// An owned, pre-order syntax arena for one sample.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    language: Language,
    nodes: Vec<SyntaxNode>,
    error_count: usize,
    max_depth: u32,
}

impl SyntaxTree {
    /// Convert a tree-sitter tree into an arena, failing when any node is
    /// deeper than `depth_limit`.
    pub fn from_tree_sitter(
        tree: &tree_sitter::Tree,
        language: Language,
        depth_limit: usize,
    ) -> Result<Self, ParseError> {
        let mut cursor = tree.walk();
        let mut nodes: Vec<SyntaxNode> = Vec::new();
        let mut ancestors: Vec<NodeId> = Vec::new();
        let mut error_count = 0usize;
        let mut max_depth = 0u32;

        loop {
            let node = cursor.node();
            let depth = ancestors.len();
            if depth > depth_limit {
                return Err(ParseError::DepthExceeded { limit: depth_limit });
            }
            if node.is_error() || node.is_missing() {
                error_count += 1;
            }

            let id = NodeId(nodes.len() as u32);
            let parent = ancestors.last().copied();
            if let Some(p) = parent {
                nodes[p.index()].children.push(id);
            }
            let start = node.start_position();
            let kind = node.kind();
            nodes.push(SyntaxNode {
                kind: NodeKind::from_grammar(kind),
                grammar_kind: kind,
                span: ByteSpan::new(node.start_byte(), node.end_byte()),
                line: start.row as u32,
                column: start.column as u32,
                field: cursor.field_name(),
                named: node.is_named(),
                parent,
                children: SmallVec::new(),
                depth: depth as u32,
            });
            max_depth = max_depth.max(depth as u32);

            if cursor.goto_first_child() {
                ancestors.push(id);
                continue;
            }

            // Leaf: advance to the next sibling, climbing as far as needed.
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(Self {
                        language,
                        nodes,
                        error_count,
                        max_depth,
                    });
                }
                ancestors.pop();
            }
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of ERROR and MISSING nodes.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Depth of the deepest node (root = 0).
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    /// All node ids in pre-order.
    pub fn preorder(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Borrow a node together with the source it was parsed from.
    pub fn view<'a>(&'a self, source: &'a str, id: NodeId) -> NodeRef<'a> {
        NodeRef {
            tree: self,
            source,
            id,
        }
    }
}

/// A node plus the tree and source it lives in. Cheap to copy; all
/// structural accessors used by SPT predicates hang off this type.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a SyntaxTree,
    source: &'a str,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn raw(&self) -> &'a SyntaxNode {
        self.tree.node(self.id)
    }

    fn at(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef {
            tree: self.tree,
            source: self.source,
            id,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.raw().kind
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.raw().kind == kind
    }

    pub fn grammar_kind(&self) -> &'static str {
        self.raw().grammar_kind
    }

    pub fn span(&self) -> ByteSpan {
        self.raw().span
    }

    pub fn line(&self) -> u32 {
        self.raw().line
    }

    pub fn column(&self) -> u32 {
        self.raw().column
    }

    pub fn is_named(&self) -> bool {
        self.raw().named
    }

    /// Field name under which this node hangs off its parent.
    pub fn field(&self) -> Option<&'static str> {
        self.raw().field
    }

    /// Source text covered by this node.
    pub fn text(&self) -> &'a str {
        let span = self.raw().span;
        self.source.get(span.start..span.end).unwrap_or("")
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.raw().parent.map(|p| self.at(p))
    }

    /// All children, named and anonymous, in source order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        let source = self.source;
        self.raw().children.iter().map(move |&id| NodeRef { tree, source, id })
    }

    /// Named children excluding comments.
    pub fn significant_children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.children()
            .filter(|c| c.is_named() && !c.is(NodeKind::Comment))
    }

    pub fn significant_child_count(&self) -> usize {
        self.significant_children().count()
    }

    /// First significant child.
    pub fn first_significant(&self) -> Option<NodeRef<'a>> {
        self.significant_children().next()
    }

    /// First child attached under `field`.
    pub fn child_by_field(&self, field: &str) -> Option<NodeRef<'a>> {
        self.children().find(|c| c.field() == Some(field))
    }

    /// True if any anonymous child token has exactly this kind (e.g. `"++"`).
    pub fn has_token(&self, token: &str) -> bool {
        self.children()
            .any(|c| !c.is_named() && c.grammar_kind() == token)
    }

    /// True if the node contains a comment anywhere beneath it.
    pub fn contains_comment(&self) -> bool {
        // Descendants are the contiguous run of deeper nodes that follows in pre-order.
        let depth = self.raw().depth;
        self.tree.nodes[self.id.index() + 1..]
            .iter()
            .take_while(|n| n.depth > depth)
            .any(|n| n.kind == NodeKind::Comment)
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.grammar_kind())
            .field("span", &self.span())
            .finish()
    }
}
