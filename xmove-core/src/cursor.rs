//! Navigation state over an [`OutlineTree`].

use xmove_model::AncestorInfo;

use crate::error::NavigationError;
use crate::tree::{NodeId, OutlineNode, OutlineTree};

/// Currently displayed node plus the breadcrumb trail that leads to it.
///
/// The trail is always the ancestor chain of `current`, root first, so its
/// length equals the depth of `current`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationCursor {
    current: NodeId,
    trail: Vec<NodeId>,
}

impl NavigationCursor {
    /// Cursor at the outline root with an empty trail.
    pub fn new(tree: &OutlineTree) -> Self {
        Self {
            current: tree.root(),
            trail: Vec::new(),
        }
    }

    /// Cursor opened "inside" the tree at the deepest known ancestor.
    ///
    /// Ancestors missing from the tree are ignored and the trail is rebuilt
    /// from the tree itself, so a stale ancestor payload can only move the
    /// starting point up, never break the trail invariant.
    pub fn seeded(tree: &OutlineTree, ancestors: &AncestorInfo) -> Self {
        let deepest = ancestors
            .ancestors
            .iter()
            .find_map(|entry| tree.find(&entry.id));
        match deepest {
            Some(current) => Self {
                current,
                trail: tree.ancestors(current),
            },
            None => Self::new(tree),
        }
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn current_node<'a>(&self, tree: &'a OutlineTree) -> &'a OutlineNode {
        tree.node(self.current)
    }

    pub fn trail(&self) -> &[NodeId] {
        &self.trail
    }

    pub fn depth(&self) -> usize {
        self.trail.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.trail.is_empty()
    }

    /// Step into the child at `child_index`.
    pub fn forward(
        &mut self,
        tree: &OutlineTree,
        child_index: usize,
    ) -> Result<NodeId, NavigationError> {
        let node = tree.node(self.current);
        if node.category.is_leaf() {
            return Err(NavigationError::AtLeaf);
        }
        let child = tree.child(self.current, child_index).ok_or(
            NavigationError::NoSuchChild {
                index: child_index,
                len: node.children.len(),
            },
        )?;

        self.trail.push(self.current);
        self.current = child;
        tracing::trace!(
            target: "xmove::nav",
            depth = self.trail.len(),
            locator = %tree.node(child).locator,
            "navigated forward"
        );
        Ok(child)
    }

    /// Jump back to the breadcrumb at `crumb_index`, dropping everything
    /// after it.
    pub fn backward(
        &mut self,
        tree: &OutlineTree,
        crumb_index: usize,
    ) -> Result<NodeId, NavigationError> {
        let target = self.trail.get(crumb_index).copied().ok_or(
            NavigationError::InvalidBreadcrumbIndex {
                index: crumb_index,
                len: self.trail.len(),
            },
        )?;

        self.trail.truncate(crumb_index);
        self.current = target;
        tracing::trace!(
            target: "xmove::nav",
            depth = self.trail.len(),
            locator = %tree.node(target).locator,
            "navigated backward"
        );
        Ok(target)
    }

    /// Return to the outline root.
    pub fn reset(&mut self, tree: &OutlineTree) {
        self.current = tree.root();
        self.trail.clear();
    }
}
