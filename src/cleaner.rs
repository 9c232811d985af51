//! Second-pass cleanup of the original tree
//!
//! Removes marker at-rules and declarations and, with `preserve = false`,
//! the rules they marked. Containers emptied by a removal are collapsed
//! eagerly, one level up, so the pass never leaves a newly-childless
//! wrapper dangling.

use generational_arena::Index;
use tracing::instrument;

use crate::arena::{NodeKind, StyleArena};
use crate::marker::{self, MARKER_AT_RULE};

/// Clean markers (and with `preserve = false`, marked rules) in place.
///
/// Both marker walks complete before any mutation; removals are validated
/// against the arena so handles staled by an earlier removal are skipped.
#[instrument(level = "debug", skip(arena))]
pub fn clean(arena: &mut StyleArena, preserve: bool) {
    let critical_blocks = arena.walk_at_rules(Some(MARKER_AT_RULE));
    let marker_decls = arena.walk_decls(marker::is_marker_prop);

    for at_idx in critical_blocks {
        if !arena.contains(at_idx) {
            continue;
        }
        let has_children = !arena.children(at_idx).is_empty();
        if preserve {
            if has_children {
                // Unwrap: content stays, the marker wrapper disappears
                arena.replace_with_children(at_idx);
            } else {
                arena.remove(at_idx);
            }
        } else if has_children {
            arena.remove(at_idx);
        } else {
            // An empty critical block signals the whole stylesheet was
            // critical-only
            arena.remove_root_children();
        }
    }

    for decl_idx in marker_decls {
        if !arena.contains(decl_idx) {
            continue;
        }
        if preserve {
            arena.remove(decl_idx);
            continue;
        }
        let is_scope = arena
            .node(decl_idx)
            .and_then(|n| marker::classify(&n.kind))
            .is_some_and(|m| m.is_scope());
        let Some(rule_idx) = arena.parent(decl_idx) else {
            arena.remove(decl_idx);
            continue;
        };
        if is_scope {
            if let Some(prefix) = arena.selector(rule_idx).map(str::to_string) {
                remove_selector_subtree(arena, rule_idx, &prefix);
            }
        }
        let wrapper = arena.parent(rule_idx);
        if arena.contains(rule_idx) {
            arena.remove(rule_idx);
        }
        if let Some(w) = wrapper {
            if w != arena.root() && arena.contains(w) && arena.children(w).is_empty() {
                arena.remove(w);
            }
        }
    }
}

/// Remove every rule elsewhere in the tree whose selector begins with
/// `prefix` (the scoped rule's own selector), collapsing a parent left
/// with no other children instead of leaving it empty.
fn remove_selector_subtree(arena: &mut StyleArena, scoped_rule: Index, prefix: &str) {
    let targets: Vec<Index> = arena
        .iter()
        .filter(|&(idx, node)| {
            idx != scoped_rule
                && matches!(&node.kind, NodeKind::Rule { selector } if selector.starts_with(prefix))
        })
        .map(|(idx, _)| idx)
        .collect();

    for idx in targets {
        if !arena.contains(idx) {
            continue;
        }
        match arena.parent(idx) {
            Some(p) if p != arena.root() && arena.children(p).len() == 1 => arena.remove(p),
            _ => arena.remove(idx),
        }
    }
}
