//! Critical rule aggregation
//!
//! Walks the tree for markers and groups matched rules into an ordered
//! collection per destination key. The walk is read-only: everything that
//! enters a group is a detached clone, so the cleanup pass later runs
//! against the identical tree this pass inspected.

use std::collections::BTreeMap;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::arena::{DetachedNode, NodeKind, StyleArena};
use crate::collector::collect_children;
use crate::marker::{self, Marker, MARKER_AT_RULE, SCOPE_VALUE};
use crate::matcher::is_child_selector;

/// Destination key -> ordered rule collection. Keys aggregate: a later
/// marker with the same key appends, it never overwrites.
pub type OutputGroups = BTreeMap<String, Vec<DetachedNode>>;

/// Resolve every marker in the tree into destination-keyed output groups.
#[instrument(level = "debug", skip(arena))]
pub fn aggregate(arena: &StyleArena, default_dest: &str) -> OutputGroups {
    let mut groups = OutputGroups::new();
    // Selectors that established a literal destination, in document order.
    // Scope-valued markers inherit from the nearest enclosing entry.
    let mut established: Vec<(String, String)> = Vec::new();

    // Single walk in document order. Marker kinds dispatch per node, so a
    // @critical block after a decl-marked rule appends after it when both
    // resolve to the same destination key.
    for (idx, node) in arena.iter() {
        match &node.kind {
            NodeKind::AtRule { name, .. } if name.eq_ignore_ascii_case(MARKER_AT_RULE) => {
                // A @critical block marks its nested rules directly. Its
                // own critical-filename declaration, if any, is a
                // destination override, not a rule marker.
                let dest = block_destination(arena, idx, default_dest);
                for &child in arena.children(idx) {
                    if arena.selector(child).is_some() {
                        push_marked_rule(arena, child, &dest, &mut groups);
                    }
                }
            }
            NodeKind::Rule { selector } => {
                // A rule carrying both marker properties still contributes
                // once: the rule is the unit, not the declaration.
                if !has_marker_decl(arena, idx) || inside_critical_block(arena, idx) {
                    continue;
                }
                let dest = rule_destination(arena, idx, &established, default_dest);
                if let Some(literal) = direct_literal_filename(arena, idx) {
                    established.push((selector.clone(), literal));
                }
                push_marked_rule(arena, idx, &dest, &mut groups);
            }
            _ => {}
        }
    }

    debug!(groups = groups.len(), "aggregation complete");
    groups
}

/// Clone a marked rule plus its collected children into `groups[dest]`.
fn push_marked_rule(arena: &StyleArena, rule_idx: Index, dest: &str, groups: &mut OutputGroups) {
    let collection = groups.entry(dest.to_string()).or_default();
    if let Some(clone) = arena.clone_subtree(rule_idx) {
        collection.push(strip_markers(clone));
    }
    for child in collect_children(arena, rule_idx) {
        collection.push(strip_markers(child));
    }
}

/// Destination for rules nested in a `@critical` block: a direct
/// `critical-filename` declaration in the block overrides the default.
fn block_destination(arena: &StyleArena, at_idx: Index, default_dest: &str) -> String {
    direct_literal_filename(arena, at_idx).unwrap_or_else(|| default_dest.to_string())
}

/// Destination for a rule marked by declarations: its own literal
/// `critical-filename` wins; `critical-filename: scope` inherits from the
/// nearest enclosing marked selector. No filename at all means the default
/// destination, never inheritance.
fn rule_destination(
    arena: &StyleArena,
    rule_idx: Index,
    established: &[(String, String)],
    default_dest: &str,
) -> String {
    if let Some(literal) = direct_literal_filename(arena, rule_idx) {
        return literal;
    }
    if !has_scope_filename(arena, rule_idx) {
        return default_dest.to_string();
    }
    let selector = arena.selector(rule_idx).unwrap_or_default();
    established
        .iter()
        .rev()
        .find(|(sel, _)| sel == selector || is_child_selector(sel, selector))
        .map(|(_, dest)| dest.clone())
        .unwrap_or_else(|| default_dest.to_string())
}

/// True when any direct child declaration is a marker property.
fn has_marker_decl(arena: &StyleArena, idx: Index) -> bool {
    arena.children(idx).iter().any(|&child| {
        matches!(
            arena.node(child).map(|n| &n.kind),
            Some(NodeKind::Declaration { prop, .. }) if marker::is_marker_prop(prop)
        )
    })
}

/// True when a direct `critical-filename: scope` declaration is present.
fn has_scope_filename(arena: &StyleArena, idx: Index) -> bool {
    arena.children(idx).iter().any(|&child| {
        matches!(
            arena.node(child).and_then(|n| marker::classify(&n.kind)),
            Some(Marker::FilenameDecl { value }) if value == SCOPE_VALUE
        )
    })
}

/// First `critical-filename` declaration directly under `idx` carrying a
/// literal (non-scope) destination.
fn direct_literal_filename(arena: &StyleArena, idx: Index) -> Option<String> {
    for &child in arena.children(idx) {
        if let Some(Marker::FilenameDecl { value }) =
            arena.node(child).and_then(|n| marker::classify(&n.kind))
        {
            if value != SCOPE_VALUE {
                return Some(unquote(&value));
            }
        }
    }
    None
}

fn inside_critical_block(arena: &StyleArena, mut idx: Index) -> bool {
    while let Some(parent) = arena.parent(idx) {
        if let Some(NodeKind::AtRule { name, .. }) = arena.node(parent).map(|n| &n.kind) {
            if name.eq_ignore_ascii_case(MARKER_AT_RULE) {
                return true;
            }
        }
        idx = parent;
    }
    false
}

/// Marker declarations are plumbing, not output CSS.
fn strip_markers(mut node: DetachedNode) -> DetachedNode {
    node.children.retain(|child| {
        !matches!(&child.kind, NodeKind::Declaration { prop, .. } if marker::is_marker_prop(prop))
    });
    node.children = node.children.drain(..).map(strip_markers).collect();
    node
}

/// Destination values may be quoted in the stylesheet.
fn unquote(value: &str) -> String {
    let v = value.trim();
    let stripped = v
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| v.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')));
    stripped.unwrap_or(v).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_quoted_value_when_unquoting_then_bare() {
        assert_eq!(unquote("\"above-fold.css\""), "above-fold.css");
        assert_eq!(unquote("'a.css'"), "a.css");
        assert_eq!(unquote("plain.css"), "plain.css");
        assert_eq!(unquote("\"unbalanced"), "\"unbalanced");
    }
}
