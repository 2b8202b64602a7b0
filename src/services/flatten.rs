//! Depth-first pre-order traversal of a [`CategoryTree`].

use crate::models::{CategoryNode, CategoryTree, NodeId};

/// Lazy pre-order iterator over every node reachable from a set of roots.
///
/// The iterator borrows the tree and owns its own stack, so a tree can be
/// flattened any number of times.
pub struct Flatten<'a> {
    tree: &'a CategoryTree,
    stack: Vec<NodeId>,
}

impl<'a> Flatten<'a> {
    pub fn new(tree: &'a CategoryTree, roots: &[NodeId]) -> Self {
        Self {
            tree,
            stack: roots.iter().rev().copied().collect(),
        }
    }
}

impl<'a> Iterator for Flatten<'a> {
    type Item = (NodeId, &'a CategoryNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.get(id)?;
        self.stack.extend(node.children.iter().rev().copied());
        Some((id, node))
    }
}

/// Flattens the whole forest.
pub fn flatten_tree(tree: &CategoryTree) -> Flatten<'_> {
    Flatten::new(tree, tree.roots())
}
