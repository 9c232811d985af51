//! Tree display for the `tree` subcommand

use generational_arena::Index;
use termtree::Tree;

use crate::arena::StyleArena;

pub trait ToTreeString {
    fn to_tree_string(&self) -> Tree<String>;
}

impl ToTreeString for StyleArena {
    fn to_tree_string(&self) -> Tree<String> {
        build_tree(self, self.root())
    }
}

fn build_tree(arena: &StyleArena, idx: Index) -> Tree<String> {
    let label = arena
        .node(idx)
        .map(|n| n.kind.to_string())
        .unwrap_or_default();
    let leaves: Vec<Tree<String>> = arena
        .children(idx)
        .iter()
        .map(|&child| build_tree(arena, child))
        .collect();
    Tree::new(label).with_leaves(leaves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_stylesheet;

    #[test]
    fn given_nested_stylesheet_when_displaying_then_all_nodes_labelled() {
        let arena = parse_stylesheet("@media print { .a { color: red; } }").unwrap();
        let rendered = arena.to_tree_string().to_string();
        assert!(rendered.contains("@media print"));
        assert!(rendered.contains(".a"));
        assert!(rendered.contains("color: red"));
    }
}
