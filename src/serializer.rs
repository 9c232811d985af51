//! Stylesheet serialization
//!
//! Two forms: a pretty form (2-space indent, one declaration per line) for
//! the cleaned stylesheet, and a compact form with collapsed whitespace
//! that stands in for a minifier on extracted output.

use generational_arena::Index;
use itertools::Itertools;

use crate::arena::{NodeKind, StyleArena};

/// Serialize the whole tree, pretty-printed.
pub fn to_css(arena: &StyleArena) -> String {
    let blocks: Vec<String> = arena
        .children(arena.root())
        .iter()
        .map(|&idx| pretty_node(arena, idx, 0))
        .collect();
    let mut out = blocks.join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Serialize the whole tree, minified.
pub fn to_css_min(arena: &StyleArena) -> String {
    arena
        .children(arena.root())
        .iter()
        .map(|&idx| min_node(arena, idx))
        .join("")
}

/// Serialize a single subtree, minified. Used as the canonical form when
/// comparing rules for identity.
pub fn node_to_css_min(arena: &StyleArena, idx: Index) -> String {
    min_node(arena, idx)
}

fn pretty_node(arena: &StyleArena, idx: Index, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let Some(node) = arena.node(idx) else {
        return String::new();
    };
    match &node.kind {
        NodeKind::Root => String::new(),
        NodeKind::Declaration { prop, value } => format!("{indent}{prop}: {value};"),
        NodeKind::Rule { selector } => {
            let body = node
                .children
                .iter()
                .map(|&c| pretty_node(arena, c, depth + 1))
                .join("\n");
            format!("{indent}{selector} {{\n{body}\n{indent}}}")
        }
        NodeKind::AtRule { name, params } => {
            let head = if params.is_empty() {
                format!("{indent}@{name}")
            } else {
                format!("{indent}@{name} {params}")
            };
            if node.children.is_empty() {
                format!("{head};")
            } else {
                let body = node
                    .children
                    .iter()
                    .map(|&c| pretty_node(arena, c, depth + 1))
                    .join("\n");
                format!("{head} {{\n{body}\n{indent}}}")
            }
        }
    }
}

fn min_node(arena: &StyleArena, idx: Index) -> String {
    let Some(node) = arena.node(idx) else {
        return String::new();
    };
    match &node.kind {
        NodeKind::Root => String::new(),
        NodeKind::Declaration { prop, value } => format!("{prop}:{value}"),
        NodeKind::Rule { selector } => {
            let body = node.children.iter().map(|&c| min_node(arena, c)).join(";");
            format!("{selector}{{{body}}}")
        }
        NodeKind::AtRule { name, params } => {
            let head = if params.is_empty() {
                format!("@{name}")
            } else {
                format!("@{name} {params}")
            };
            if node.children.is_empty() {
                format!("{head};")
            } else {
                let body = node.children.iter().map(|&c| min_node(arena, c)).join("");
                format!("{head}{{{body}}}")
            }
        }
    }
}
