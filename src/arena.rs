use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

/// Payload of a stylesheet tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Top of the tree, owns the stylesheet's top-level nodes.
    Root,
    /// `@media print { ... }`, `@critical { ... }`, `@import ...;`
    AtRule { name: String, params: String },
    /// `.header { ... }`
    Rule { selector: String },
    /// `color: red`
    Declaration { prop: String, value: String },
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Root => write!(f, "root"),
            NodeKind::AtRule { name, params } if params.is_empty() => write!(f, "@{}", name),
            NodeKind::AtRule { name, params } => write!(f, "@{} {}", name, params),
            NodeKind::Rule { selector } => write!(f, "{}", selector),
            NodeKind::Declaration { prop, value } => write!(f, "{}: {}", prop, value),
        }
    }
}

/// Tree node in the arena-based stylesheet structure.
#[derive(Debug)]
pub struct StyleNode {
    pub kind: NodeKind,
    /// Index of parent node in the arena, None only for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in document order
    pub children: Vec<Index>,
}

/// An owned, detached subtree: the result of cloning out of an arena.
///
/// Detached nodes carry no parent back-references; they are re-attached
/// with [`StyleArena::append_detached`] or fabricated directly (e.g. the
/// at-rule shells the child collector emits).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedNode {
    pub kind: NodeKind,
    pub children: Vec<DetachedNode>,
}

impl DetachedNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<DetachedNode>) -> Self {
        Self { kind, children }
    }
}

/// Arena-based stylesheet tree.
///
/// Uses a generational arena for memory-safe node handles: a handle held
/// across a removal simply resolves to `None` instead of dangling. Parent
/// back-references are handles too, used only for removal and cleanup.
#[derive(Debug)]
pub struct StyleArena {
    arena: Arena<StyleNode>,
    root: Index,
}

impl Default for StyleArena {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleArena {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(StyleNode {
            kind: NodeKind::Root,
            parent: None,
            children: Vec::new(),
        });
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn node(&self, idx: Index) -> Option<&StyleNode> {
        self.arena.get(idx)
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    /// Children of `idx`, empty for a stale handle.
    pub fn children(&self, idx: Index) -> &[Index] {
        self.arena.get(idx).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Selector string if `idx` is a rule.
    pub fn selector(&self, idx: Index) -> Option<&str> {
        match self.arena.get(idx).map(|n| &n.kind) {
            Some(NodeKind::Rule { selector }) => Some(selector.as_str()),
            _ => None,
        }
    }

    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|n| n.parent)
    }

    /// Append a new node under `parent`, returning its handle.
    #[instrument(level = "trace", skip(self))]
    pub fn append(&mut self, parent: Index, kind: NodeKind) -> Index {
        let idx = self.arena.insert(StyleNode {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(p) = self.arena.get_mut(parent) {
            p.children.push(idx);
        }
        idx
    }

    /// Remove `idx` and its whole subtree from the arena.
    ///
    /// The parent's child sequence is shortened; handles into the removed
    /// subtree become stale. Removing the root is not supported; use
    /// [`StyleArena::remove_root_children`].
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, idx: Index) {
        if idx == self.root {
            return;
        }
        if let Some(parent) = self.arena.get(idx).and_then(|n| n.parent) {
            if let Some(p) = self.arena.get_mut(parent) {
                p.children.retain(|&c| c != idx);
            }
        }
        self.free_subtree(idx);
    }

    /// Drop every top-level node, leaving an empty stylesheet.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_root_children(&mut self) {
        let children = self.children(self.root).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    /// Replace `idx` with its own children, in place.
    ///
    /// The children take the node's position in the parent's sequence and
    /// their back-references are repointed; the unwrapped node is freed.
    #[instrument(level = "trace", skip(self))]
    pub fn replace_with_children(&mut self, idx: Index) {
        let Some(parent) = self.arena.get(idx).and_then(|n| n.parent) else {
            return;
        };
        let children = self.children(idx).to_vec();
        for &child in &children {
            if let Some(c) = self.arena.get_mut(child) {
                c.parent = Some(parent);
            }
        }
        if let Some(p) = self.arena.get_mut(parent) {
            if let Some(pos) = p.children.iter().position(|&c| c == idx) {
                p.children.splice(pos..=pos, children);
            }
        }
        self.arena.remove(idx);
    }

    fn free_subtree(&mut self, idx: Index) {
        let children = self.children(idx).to_vec();
        for child in children {
            self.free_subtree(child);
        }
        self.arena.remove(idx);
    }

    /// Clone the subtree at `idx` into an owned, detached tree.
    #[instrument(level = "trace", skip(self))]
    pub fn clone_subtree(&self, idx: Index) -> Option<DetachedNode> {
        let node = self.arena.get(idx)?;
        let children = node
            .children
            .iter()
            .filter_map(|&c| self.clone_subtree(c))
            .collect();
        Some(DetachedNode {
            kind: node.kind.clone(),
            children,
        })
    }

    /// Attach a deep copy of `detached` under `parent`.
    pub fn append_detached(&mut self, parent: Index, detached: &DetachedNode) -> Index {
        let idx = self.append(parent, detached.kind.clone());
        for child in &detached.children {
            self.append_detached(idx, child);
        }
        idx
    }

    /// Document-order (preorder) traversal over the whole tree.
    pub fn iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self, self.root)
    }

    /// Document-order traversal over the subtree rooted at `idx`.
    pub fn iter_subtree(&self, idx: Index) -> PreOrderIter<'_> {
        PreOrderIter::new(self, idx)
    }

    /// Handles of every rule in document order.
    pub fn walk_rules(&self) -> Vec<Index> {
        self.iter()
            .filter(|&(_, n)| matches!(n.kind, NodeKind::Rule { .. }))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Handles of every at-rule in document order, optionally name-filtered.
    pub fn walk_at_rules(&self, name_filter: Option<&str>) -> Vec<Index> {
        self.iter()
            .filter(|&(_, n)| match &n.kind {
                NodeKind::AtRule { name, .. } => {
                    name_filter.map_or(true, |f| name.eq_ignore_ascii_case(f))
                }
                _ => false,
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Handles of every declaration in document order whose property the
    /// predicate accepts.
    pub fn walk_decls<F>(&self, mut pred: F) -> Vec<Index>
    where
        F: FnMut(&str) -> bool,
    {
        self.iter()
            .filter(|&(_, n)| match &n.kind {
                NodeKind::Declaration { prop, .. } => pred(prop),
                _ => false,
            })
            .map(|(idx, _)| idx)
            .collect()
    }
}

pub struct PreOrderIter<'a> {
    arena: &'a StyleArena,
    stack: Vec<Index>,
}

impl<'a> PreOrderIter<'a> {
    fn new(arena: &'a StyleArena, start: Index) -> Self {
        Self {
            arena,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (Index, &'a StyleNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.stack.pop() {
            if let Some(node) = self.arena.node(idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((idx, node));
            }
        }
        None
    }
}
