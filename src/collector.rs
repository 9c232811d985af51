//! Child rule collection
//!
//! One pass over the tree producing the ordered set of rules that belong
//! under a parent rule: top-level rules whose selectors derive from the
//! parent's, and rules nested in at-rules, each of the latter wrapped in a
//! fabricated shell carrying the original at-rule's name and params so the
//! output never drags in unrelated siblings.

use generational_arena::Index;
use regex::Regex;
use tracing::{debug, instrument};

use crate::arena::{DetachedNode, NodeKind, StyleArena};
use crate::matcher::is_child_selector;
use crate::serializer::node_to_css_min;

/// Collect clones of every rule nested under `parent`, in document order.
///
/// Read-only on the input tree. Rules found inside at-rules come back as
/// fresh at-rule shells containing a clone of only the matched rule.
/// Duplicates across distinct at-rule blocks are kept: they represent
/// distinct conditional contexts.
#[instrument(level = "debug", skip(arena))]
pub fn collect_children(arena: &StyleArena, parent: Index) -> Vec<DetachedNode> {
    let Some(parent_selector) = arena.selector(parent).map(str::to_string) else {
        return Vec::new();
    };
    // Containment pre-filter over the raw selector text; escaped, so it
    // cannot fail to compile for any user-authored selector.
    let pattern = match Regex::new(&regex::escape(&parent_selector)) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    let parent_css = node_to_css_min(arena, parent);
    let mut result = Vec::new();

    // Top-level rules (direct children of the root)
    for &idx in arena.children(arena.root()) {
        let Some(selector) = arena.selector(idx) else {
            continue;
        };
        if pattern.is_match(selector)
            && is_child_selector(&parent_selector, selector)
            && node_to_css_min(arena, idx) != parent_css
        {
            if let Some(clone) = arena.clone_subtree(idx) {
                result.push(clone);
            }
        }
    }

    // Rules nested inside at-rules, wrapped in fresh shells
    for at_idx in arena.walk_at_rules(None) {
        let Some(NodeKind::AtRule { name, params }) = arena.node(at_idx).map(|n| &n.kind) else {
            continue;
        };
        for (idx, node) in arena.iter_subtree(at_idx) {
            let NodeKind::Rule { selector } = &node.kind else {
                continue;
            };
            if !pattern.is_match(selector) {
                continue;
            }
            // Accept an identical selector too: the same selector inside a
            // conditional block is a distinct context, not a self-match.
            let accepted =
                selector == &parent_selector || is_child_selector(&parent_selector, selector);
            if accepted && node_to_css_min(arena, idx) != parent_css {
                if let Some(clone) = arena.clone_subtree(idx) {
                    result.push(DetachedNode::with_children(
                        NodeKind::AtRule {
                            name: name.clone(),
                            params: params.clone(),
                        },
                        vec![clone],
                    ));
                }
            }
        }
    }

    debug!(parent = %parent_selector, matched = result.len(), "collected child rules");
    result
}
