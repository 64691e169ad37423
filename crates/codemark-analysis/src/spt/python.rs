//! Python SPT catalog: `call`, `initlist`, `range`, `items`, `print`, `list`.

use crate::parsers::{Language, NodeKind, NodeRef};

use super::types::{keep, SptDefinition, VariantDef};

/// Built-ins whose behavior depends on the calling frame; routing them
/// through `__call__` is not equivalent.
const FRAME_SENSITIVE: &[&str] = &["super", "locals", "vars", "globals", "eval", "exec", "dir"];

/// Default backdoor specs, one per corpus part.
pub const DEFAULT_BACKDOORS: &[&[&str]] = &[&["call", "print"], &["initlist", "range"]];

pub static PYTHON_SPTS: &[SptDefinition] = &[
    SptDefinition {
        id: "call",
        language: Language::Python,
        description: "f(args) <-> f.__call__(args)",
        node_kinds: &[NodeKind::Call],
        predicate: is_direct_call,
        variants: &[
            VariantDef {
                name: "direct",
                description: "f(args)",
                rewrite: keep,
            },
            VariantDef {
                name: "dunder_call",
                description: "f.__call__(args)",
                rewrite: to_dunder_call,
            },
        ],
    },
    SptDefinition {
        id: "initlist",
        language: Language::Python,
        description: "x = [] <-> x = list()",
        node_kinds: &[NodeKind::List],
        predicate: is_empty_list_init,
        variants: &[
            VariantDef {
                name: "literal",
                description: "[]",
                rewrite: keep,
            },
            VariantDef {
                name: "list_ctor",
                description: "list()",
                rewrite: to_list_ctor,
            },
        ],
    },
    SptDefinition {
        id: "range",
        language: Language::Python,
        description: "range(n) <-> range(0, n)",
        node_kinds: &[NodeKind::Call],
        predicate: is_single_arg_range,
        variants: &[
            VariantDef {
                name: "implicit_start",
                description: "range(n)",
                rewrite: keep,
            },
            VariantDef {
                name: "explicit_start",
                description: "range(0, n)",
                rewrite: to_explicit_range,
            },
        ],
    },
    SptDefinition {
        id: "items",
        language: Language::Python,
        description: "for k, v in d.items() <-> for k, v in zip(d.keys(), d.values())",
        node_kinds: &[NodeKind::Call],
        predicate: is_loop_items,
        variants: &[
            VariantDef {
                name: "items",
                description: "d.items()",
                rewrite: keep,
            },
            VariantDef {
                name: "zip_keys_values",
                description: "zip(d.keys(), d.values())",
                rewrite: to_zip_keys_values,
            },
        ],
    },
    SptDefinition {
        id: "print",
        language: Language::Python,
        description: "print(x) <-> print(x, flush=True)",
        node_kinds: &[NodeKind::Call],
        predicate: is_unflushed_print,
        variants: &[
            VariantDef {
                name: "default",
                description: "print(x)",
                rewrite: keep,
            },
            VariantDef {
                name: "flush",
                description: "print(x, flush=True)",
                rewrite: to_flushed_print,
            },
        ],
    },
    SptDefinition {
        id: "list",
        language: Language::Python,
        description: "list(x) <-> [*x]",
        node_kinds: &[NodeKind::Call],
        predicate: is_list_conversion,
        variants: &[
            VariantDef {
                name: "ctor",
                description: "list(x)",
                rewrite: keep,
            },
            VariantDef {
                name: "unpack",
                description: "[*x]",
                rewrite: to_unpacked_list,
            },
        ],
    },
];

// ---- Structural helpers ----

/// Callee name when the function position is a bare identifier.
fn callee_name<'a>(call: NodeRef<'a>) -> Option<&'a str> {
    call.child_by_field("function")
        .filter(|f| f.is(NodeKind::Identifier))
        .map(|f| f.text())
}

/// The parenthesized argument list (not a bare generator argument).
fn argument_list<'a>(call: NodeRef<'a>) -> Option<NodeRef<'a>> {
    call.child_by_field("arguments")
        .filter(|a| a.is(NodeKind::ArgumentList))
}

fn is_positional(arg: NodeRef<'_>) -> bool {
    !matches!(
        arg.kind(),
        NodeKind::KeywordArgument | NodeKind::ListSplat | NodeKind::DictionarySplat
    ) && arg.grammar_kind() != "parenthesized_list_splat"
}

/// The only argument of `name(arg)`, if it is a plain positional expression.
fn sole_positional_arg<'a>(call: NodeRef<'a>, name: &str) -> Option<NodeRef<'a>> {
    if callee_name(call)? != name {
        return None;
    }
    let args = argument_list(call)?;
    if args.contains_comment() || args.significant_child_count() != 1 {
        return None;
    }
    args.first_significant().filter(|a| is_positional(*a))
}

/// Identifier or dotted attribute chain; evaluating it twice is harmless.
fn is_plain_reference(node: NodeRef<'_>) -> bool {
    let mut current = node;
    loop {
        match current.kind() {
            NodeKind::Identifier => return true,
            NodeKind::Attribute => match current.child_by_field("object") {
                Some(object) => current = object,
                None => return false,
            },
            _ => return false,
        }
    }
}

// ---- call ----

fn is_direct_call(node: NodeRef<'_>) -> bool {
    let Some(name) = callee_name(node) else {
        return false;
    };
    if FRAME_SENSITIVE.contains(&name) || argument_list(node).is_none() {
        return false;
    }
    // Pre-3.9 decorator grammar only allows dotted names before the call.
    !node.parent().is_some_and(|p| p.grammar_kind() == "decorator")
}

fn to_dunder_call(node: NodeRef<'_>) -> Option<String> {
    let function = node.child_by_field("function")?;
    let args = argument_list(node)?;
    Some(format!("{}.__call__{}", function.text(), args.text()))
}

// ---- initlist ----

fn is_empty_list_init(node: NodeRef<'_>) -> bool {
    node.significant_child_count() == 0
        && !node.contains_comment()
        && node.field() == Some("right")
        && node.parent().is_some_and(|p| p.is(NodeKind::Assignment))
}

fn to_list_ctor(_node: NodeRef<'_>) -> Option<String> {
    Some("list()".to_string())
}

// ---- range ----

fn is_single_arg_range(node: NodeRef<'_>) -> bool {
    sole_positional_arg(node, "range").is_some()
}

fn to_explicit_range(node: NodeRef<'_>) -> Option<String> {
    let arg = sole_positional_arg(node, "range")?;
    let function = node.child_by_field("function")?;
    Some(format!("{}(0, {})", function.text(), arg.text()))
}

// ---- items ----

/// Receiver of `recv.items()` with no arguments.
fn items_receiver<'a>(call: NodeRef<'a>) -> Option<NodeRef<'a>> {
    let function = call.child_by_field("function")?;
    if !function.is(NodeKind::Attribute) {
        return None;
    }
    if function.child_by_field("attribute")?.text() != "items" {
        return None;
    }
    let args = argument_list(call)?;
    if args.significant_child_count() != 0 || args.contains_comment() {
        return None;
    }
    function
        .child_by_field("object")
        .filter(|o| is_plain_reference(*o))
}

fn is_loop_items(node: NodeRef<'_>) -> bool {
    node.field() == Some("right")
        && node.parent().is_some_and(|p| p.is(NodeKind::ForStatement))
        && items_receiver(node).is_some()
}

fn to_zip_keys_values(node: NodeRef<'_>) -> Option<String> {
    let receiver = items_receiver(node)?.text();
    Some(format!("zip({receiver}.keys(), {receiver}.values())"))
}

// ---- print ----

fn is_unflushed_print(node: NodeRef<'_>) -> bool {
    if callee_name(node) != Some("print") {
        return false;
    }
    let Some(args) = argument_list(node) else {
        return false;
    };
    if args.contains_comment() {
        return false;
    }
    !args.significant_children().any(|arg| match arg.kind() {
        NodeKind::DictionarySplat => true,
        NodeKind::KeywordArgument => arg
            .child_by_field("name")
            .is_some_and(|name| name.text() == "flush"),
        _ => false,
    })
}

fn to_flushed_print(node: NodeRef<'_>) -> Option<String> {
    let function = node.child_by_field("function")?;
    let args = argument_list(node)?.text();
    let inner = args.strip_prefix('(')?.strip_suffix(')')?;
    let trimmed = inner.trim_end();
    let extended = if trimmed.trim_start().is_empty() {
        "flush=True".to_string()
    } else if trimmed.ends_with(',') {
        format!("{trimmed} flush=True")
    } else {
        format!("{trimmed}, flush=True")
    };
    Some(format!("{}({extended})", function.text()))
}

// ---- list ----

fn is_list_conversion(node: NodeRef<'_>) -> bool {
    sole_positional_arg(node, "list").is_some()
}

/// Operands allowed bare after `*` in a list display.
fn is_unpack_primary(arg: NodeRef<'_>) -> bool {
    matches!(
        arg.kind(),
        NodeKind::Identifier
            | NodeKind::Attribute
            | NodeKind::Call
            | NodeKind::List
            | NodeKind::ParenthesizedExpression
    ) || matches!(
        arg.grammar_kind(),
        "subscript"
            | "tuple"
            | "dictionary"
            | "set"
            | "list_comprehension"
            | "set_comprehension"
            | "dictionary_comprehension"
            | "string"
            | "concatenated_string"
    )
}

fn to_unpacked_list(node: NodeRef<'_>) -> Option<String> {
    let arg = sole_positional_arg(node, "list")?;
    if is_unpack_primary(arg) {
        Some(format!("[*{}]", arg.text()))
    } else {
        Some(format!("[*({})]", arg.text()))
    }
}
