//! Java SPT catalog: `unequal_null`, `is_empty`, `init_string`, `index_of`,
//! `if_else_return`, `self_add`, `not`, `equal_false`.

use crate::parsers::{Language, NodeKind, NodeRef};

use super::types::{keep, SptDefinition, VariantDef};

/// Default backdoor specs, one per corpus part.
pub const DEFAULT_BACKDOORS: &[&[&str]] = &[&["unequal_null", "is_empty"], &["init_string", "index_of"]];

pub static JAVA_SPTS: &[SptDefinition] = &[
    SptDefinition {
        id: "unequal_null",
        language: Language::Java,
        description: "a != null <-> null != a",
        node_kinds: &[NodeKind::BinaryExpression],
        predicate: is_unequal_null,
        variants: &[
            VariantDef {
                name: "value_first",
                description: "a != null",
                rewrite: keep,
            },
            VariantDef {
                name: "null_first",
                description: "null != a",
                rewrite: to_null_first,
            },
        ],
    },
    SptDefinition {
        id: "is_empty",
        language: Language::Java,
        description: "x.isEmpty() <-> (x.isEmpty() == true)",
        node_kinds: &[NodeKind::MethodInvocation],
        predicate: is_is_empty_call,
        variants: &[
            VariantDef {
                name: "call",
                description: "x.isEmpty()",
                rewrite: keep,
            },
            VariantDef {
                name: "compare_true",
                description: "(x.isEmpty() == true)",
                rewrite: to_compare_true,
            },
        ],
    },
    SptDefinition {
        id: "init_string",
        language: Language::Java,
        description: "String s = \"lit\" <-> String s = String.valueOf(\"lit\")",
        node_kinds: &[NodeKind::StringLiteral],
        predicate: is_string_initializer,
        variants: &[
            VariantDef {
                name: "literal",
                description: "\"lit\"",
                rewrite: keep,
            },
            VariantDef {
                name: "value_of",
                description: "String.valueOf(\"lit\")",
                rewrite: to_value_of,
            },
        ],
    },
    SptDefinition {
        id: "index_of",
        language: Language::Java,
        description: "a.indexOf(b) != -1 <-> a.indexOf(b) >= 0",
        node_kinds: &[NodeKind::BinaryExpression],
        predicate: is_index_of_check,
        variants: &[
            VariantDef {
                name: "minus_one",
                description: "a.indexOf(b) != -1",
                rewrite: keep,
            },
            VariantDef {
                name: "non_negative",
                description: "a.indexOf(b) >= 0",
                rewrite: to_non_negative,
            },
        ],
    },
    SptDefinition {
        id: "if_else_return",
        language: Language::Java,
        description: "if (c) return a; else return b; <-> return (c) ? a : b;",
        node_kinds: &[NodeKind::IfStatement],
        predicate: is_if_else_return,
        variants: &[
            VariantDef {
                name: "branches",
                description: "if/else with two returns",
                rewrite: keep,
            },
            VariantDef {
                name: "ternary",
                description: "return (c) ? a : b;",
                rewrite: to_ternary_return,
            },
        ],
    },
    SptDefinition {
        id: "self_add",
        language: Language::Java,
        description: "i++; <-> i += 1;",
        node_kinds: &[NodeKind::UpdateExpression],
        predicate: is_increment_statement,
        variants: &[
            VariantDef {
                name: "increment",
                description: "i++",
                rewrite: keep,
            },
            VariantDef {
                name: "compound",
                description: "i += 1",
                rewrite: to_compound_add,
            },
        ],
    },
    SptDefinition {
        id: "not",
        language: Language::Java,
        description: "!(a == b) <-> (a != b)",
        node_kinds: &[NodeKind::UnaryExpression],
        predicate: is_negated_equality,
        variants: &[
            VariantDef {
                name: "negated",
                description: "!(a == b)",
                rewrite: keep,
            },
            VariantDef {
                name: "flipped",
                description: "(a != b)",
                rewrite: to_flipped_equality,
            },
        ],
    },
    SptDefinition {
        id: "equal_false",
        language: Language::Java,
        description: "x == false <-> (!x)",
        node_kinds: &[NodeKind::BinaryExpression],
        predicate: is_equal_false,
        variants: &[
            VariantDef {
                name: "compare_false",
                description: "x == false",
                rewrite: keep,
            },
            VariantDef {
                name: "negated",
                description: "(!x)",
                rewrite: to_negation,
            },
        ],
    },
];

// ---- Structural helpers ----

fn operator(node: NodeRef<'_>) -> Option<&'static str> {
    node.child_by_field("operator").map(|op| op.grammar_kind())
}

/// Expressions that bind at least as tightly as any binary operator.
fn is_primary(node: NodeRef<'_>) -> bool {
    matches!(
        node.kind(),
        NodeKind::Identifier
            | NodeKind::MethodInvocation
            | NodeKind::FieldAccess
            | NodeKind::ParenthesizedExpression
            | NodeKind::StringLiteral
            | NodeKind::CharacterLiteral
            | NodeKind::DecimalIntegerLiteral
            | NodeKind::NullLiteral
            | NodeKind::True
            | NodeKind::False
            | NodeKind::This
    ) || matches!(
        node.grammar_kind(),
        "array_access" | "object_creation_expression" | "class_literal"
    )
}

fn operand_text(node: NodeRef<'_>) -> String {
    if is_primary(node) {
        node.text().to_string()
    } else {
        format!("({})", node.text())
    }
}

fn is_minus_one(node: NodeRef<'_>) -> bool {
    node.is(NodeKind::UnaryExpression)
        && operator(node) == Some("-")
        && node
            .child_by_field("operand")
            .is_some_and(|o| o.is(NodeKind::DecimalIntegerLiteral) && o.text() == "1")
}

// ---- unequal_null ----

fn is_unequal_null(node: NodeRef<'_>) -> bool {
    operator(node) == Some("!=")
        && node
            .child_by_field("right")
            .is_some_and(|r| r.is(NodeKind::NullLiteral))
        && node
            .child_by_field("left")
            .is_some_and(|l| !l.is(NodeKind::NullLiteral))
}

fn to_null_first(node: NodeRef<'_>) -> Option<String> {
    let left = node.child_by_field("left")?;
    Some(format!("null != {}", operand_text(left)))
}

// ---- is_empty ----

fn is_is_empty_call(node: NodeRef<'_>) -> bool {
    // `(x.isEmpty() == true);` is not a statement expression.
    !node
        .parent()
        .is_some_and(|p| p.is(NodeKind::ExpressionStatement))
        && node.child_by_field("object").is_some()
        && node
            .child_by_field("name")
            .is_some_and(|n| n.text() == "isEmpty")
        && node.child_by_field("arguments").is_some_and(|args| {
            args.significant_child_count() == 0 && !args.contains_comment()
        })
}

fn to_compare_true(node: NodeRef<'_>) -> Option<String> {
    Some(format!("({} == true)", node.text()))
}

// ---- init_string ----

fn is_string_initializer(node: NodeRef<'_>) -> bool {
    if node.field() != Some("value") {
        return false;
    }
    let Some(declarator) = node.parent().filter(|p| p.is(NodeKind::VariableDeclarator)) else {
        return false;
    };
    let Some(declaration) = declarator
        .parent()
        .filter(|d| d.is(NodeKind::LocalVariableDeclaration))
    else {
        return false;
    };
    // A `final` String initialized from a literal is a constant variable;
    // `String.valueOf` would drop that status.
    let is_final = declaration
        .children()
        .any(|c| c.grammar_kind() == "modifiers" && c.has_token("final"));
    !is_final
        && declaration
            .child_by_field("type")
            .is_some_and(|t| t.is(NodeKind::TypeIdentifier) && t.text() == "String")
}

fn to_value_of(node: NodeRef<'_>) -> Option<String> {
    Some(format!("String.valueOf({})", node.text()))
}

// ---- index_of ----

fn is_index_of_check(node: NodeRef<'_>) -> bool {
    matches!(operator(node), Some("!=") | Some(">"))
        && node
            .child_by_field("right")
            .is_some_and(is_minus_one)
        && node.child_by_field("left").is_some_and(|l| {
            l.is(NodeKind::MethodInvocation)
                && l.child_by_field("name")
                    .is_some_and(|n| n.text() == "indexOf")
        })
}

fn to_non_negative(node: NodeRef<'_>) -> Option<String> {
    let left = node.child_by_field("left")?;
    Some(format!("{} >= 0", left.text()))
}

// ---- if_else_return ----

/// Returned expression of `return e;` or `{ return e; }`.
fn single_return_value<'a>(stmt: NodeRef<'a>) -> Option<NodeRef<'a>> {
    let ret = match stmt.kind() {
        NodeKind::ReturnStatement => stmt,
        NodeKind::Block if stmt.significant_child_count() == 1 => stmt
            .first_significant()
            .filter(|s| s.is(NodeKind::ReturnStatement))?,
        _ => return None,
    };
    if ret.significant_child_count() != 1 {
        return None;
    }
    ret.first_significant()
}

fn ternary_operand(node: NodeRef<'_>) -> String {
    match node.kind() {
        NodeKind::AssignmentExpression | NodeKind::LambdaExpression | NodeKind::TernaryExpression => {
            format!("({})", node.text())
        }
        _ => node.text().to_string(),
    }
}

/// Primitive literals, possibly negated. In a conditional expression they
/// trigger unboxing or numeric promotion of the other branch.
fn is_primitive_literal(node: NodeRef<'_>) -> bool {
    match node.kind() {
        NodeKind::CharacterLiteral | NodeKind::DecimalIntegerLiteral | NodeKind::True | NodeKind::False => {
            true
        }
        NodeKind::UnaryExpression => node
            .child_by_field("operand")
            .is_some_and(is_primitive_literal),
        NodeKind::ParenthesizedExpression => node.first_significant().is_some_and(is_primitive_literal),
        _ => matches!(
            node.grammar_kind(),
            "hex_integer_literal"
                | "octal_integer_literal"
                | "binary_integer_literal"
                | "decimal_floating_point_literal"
                | "hex_floating_point_literal"
        ),
    }
}

fn is_if_else_return(node: NodeRef<'_>) -> bool {
    if node.contains_comment() {
        return false;
    }
    let branches = node.child_by_field("consequence").zip(node.child_by_field("alternative"));
    branches.is_some_and(|(then, other)| {
        match (single_return_value(then), single_return_value(other)) {
            (Some(a), Some(b)) => !is_primitive_literal(a) && !is_primitive_literal(b),
            _ => false,
        }
    })
}

fn to_ternary_return(node: NodeRef<'_>) -> Option<String> {
    let condition = node.child_by_field("condition")?;
    let then = single_return_value(node.child_by_field("consequence")?)?;
    let other = single_return_value(node.child_by_field("alternative")?)?;
    Some(format!(
        "return {} ? {} : {};",
        condition.text(),
        ternary_operand(then),
        ternary_operand(other)
    ))
}

// ---- self_add ----

fn is_increment_statement(node: NodeRef<'_>) -> bool {
    node.has_token("++")
        && node.significant_child_count() == 1
        && node
            .parent()
            .is_some_and(|p| p.is(NodeKind::ExpressionStatement))
}

fn to_compound_add(node: NodeRef<'_>) -> Option<String> {
    let target = node.first_significant()?;
    Some(format!("{} += 1", target.text()))
}

// ---- not ----

/// The `a == b` / `a != b` inside `!( ... )`.
fn negated_equality<'a>(node: NodeRef<'a>) -> Option<NodeRef<'a>> {
    if operator(node) != Some("!") {
        return None;
    }
    let inner = node
        .child_by_field("operand")
        .filter(|o| o.is(NodeKind::ParenthesizedExpression))?;
    if inner.contains_comment() {
        return None;
    }
    inner
        .first_significant()
        .filter(|b| b.is(NodeKind::BinaryExpression))
        .filter(|b| matches!(operator(*b), Some("==") | Some("!=")))
}

fn is_negated_equality(node: NodeRef<'_>) -> bool {
    negated_equality(node).is_some()
}

fn to_flipped_equality(node: NodeRef<'_>) -> Option<String> {
    let binary = negated_equality(node)?;
    let op = binary.child_by_field("operator")?;
    let flipped = match op.grammar_kind() {
        "==" => "!=",
        "!=" => "==",
        _ => return None,
    };
    let text = binary.text();
    let base = binary.span().start;
    let (start, end) = (op.span().start - base, op.span().end - base);
    Some(format!("({}{}{})", &text[..start], flipped, &text[end..]))
}

// ---- equal_false ----

fn is_equal_false(node: NodeRef<'_>) -> bool {
    operator(node) == Some("==")
        && node
            .child_by_field("right")
            .is_some_and(|r| r.is(NodeKind::False))
        && node
            .child_by_field("left")
            .is_some_and(|l| !matches!(l.kind(), NodeKind::True | NodeKind::False))
}

fn to_negation(node: NodeRef<'_>) -> Option<String> {
    let left = node.child_by_field("left")?;
    Some(format!("(!{})", operand_text(left)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::ParserManager;

    fn wrap(body: &str) -> String {
        format!("class A {{\n  Object f(String s, int i, java.util.List<String> xs) {{\n{body}\n  }}\n}}\n")
    }

    fn rewrite_first(id: &str, body: &str) -> Option<String> {
        let code = wrap(body);
        let tree = ParserManager::new(Language::Java).parse(&code).unwrap();
        let def = JAVA_SPTS.iter().find(|d| d.id == id).unwrap();
        let found = tree
            .preorder()
            .map(|n| tree.view(&code, n))
            .find(|n| def.matches(*n));
        found.and_then(|n| def.render(n, def.trigger_variant()))
    }

    #[test]
    fn unequal_null_parenthesizes_compound_operands() {
        assert_eq!(
            rewrite_first("unequal_null", "if (s != null) { return s; } return null;").unwrap(),
            "null != s"
        );
        assert_eq!(
            rewrite_first("unequal_null", "boolean b = (i > 0 ? s : null) != null; return b;").unwrap(),
            "null != (i > 0 ? s : null)"
        );
    }

    #[test]
    fn index_of_accepts_both_sentinels() {
        assert_eq!(
            rewrite_first("index_of", "return s.indexOf(\"x\") != -1;").unwrap(),
            "s.indexOf(\"x\") >= 0"
        );
        assert_eq!(
            rewrite_first("index_of", "return xs.indexOf(s) > -1;").unwrap(),
            "xs.indexOf(s) >= 0"
        );
        assert!(rewrite_first("index_of", "return s.indexOf(\"x\") != 1;").is_none());
    }

    #[test]
    fn if_else_return_builds_ternary() {
        assert_eq!(
            rewrite_first("if_else_return", "if (i > 0) { return s; } else { return null; }").unwrap(),
            "return (i > 0) ? s : null;"
        );
        assert!(rewrite_first(
            "if_else_return",
            "if (i > 0) { i++; return s; } else { return null; }"
        )
        .is_none());
    }

    #[test]
    fn not_flips_operator_in_place() {
        assert_eq!(
            rewrite_first("not", "return !(i == 3);").unwrap(),
            "(i != 3)"
        );
        assert!(rewrite_first("not", "return !(i < 3);").is_none());
    }

    #[test]
    fn statement_level_rewrites() {
        assert_eq!(rewrite_first("self_add", "i++; return i;").unwrap(), "i += 1");
        assert!(rewrite_first("self_add", "return i++;").is_none());
        assert_eq!(
            rewrite_first("init_string", "String t = \"a\"; return t;").unwrap(),
            "String.valueOf(\"a\")"
        );
        assert_eq!(
            rewrite_first("equal_false", "return xs.isEmpty() == false;").unwrap(),
            "(!xs.isEmpty())"
        );
        assert_eq!(
            rewrite_first("is_empty", "return xs.isEmpty();").unwrap(),
            "(xs.isEmpty() == true)"
        );
    }

    #[test]
    fn standalone_is_empty_call_is_skipped() {
        assert!(rewrite_first("is_empty", "xs.isEmpty(); return s;").is_none());
        assert_eq!(
            rewrite_first("is_empty", "boolean b = xs.isEmpty(); return b;").unwrap(),
            "(xs.isEmpty() == true)"
        );
    }

    #[test]
    fn final_string_constants_are_skipped() {
        assert!(rewrite_first(
            "init_string",
            "final String t = \"a\"; switch (i) { case 0: return t; } return s;"
        )
        .is_none());
        assert!(rewrite_first("init_string", "final String t = \"a\"; return t + \"b\";").is_none());
    }

    #[test]
    fn ternary_skips_primitive_literal_branches() {
        // `c ? boxed : 0` unboxes `boxed`; `c ? 'a' : 1` is typed char.
        assert!(rewrite_first(
            "if_else_return",
            "Integer x = null; if (i > 0) { return x; } else { return 0; }"
        )
        .is_none());
        assert!(rewrite_first("if_else_return", "if (i > 0) { return 'a'; } else { return 1; }").is_none());
        assert!(rewrite_first("if_else_return", "if (i > 0) { return s; } else { return -1L; }").is_none());
        assert_eq!(
            rewrite_first("if_else_return", "if (i > 0) { return \"a\"; } else { return null; }").unwrap(),
            "return (i > 0) ? \"a\" : null;"
        );
    }
}
