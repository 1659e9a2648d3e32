//! Read-only course outline built once per dialog session.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. The parent
//! link is an index, so the tree needs no reference counting and cannot be
//! mutated after [`OutlineTree::build`] returns.

use xmove_model::{Category, Locator, OutlinePayload};

use crate::error::OutlineError;

/// Index of a node inside its [`OutlineTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A block in the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub locator: Locator,
    pub display_name: String,
    pub category: Category,
    /// Raw block type as reported by Studio (`chapter`, `html`, ...)
    pub block_type: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineTree {
    nodes: Vec<OutlineNode>,
}

impl OutlineTree {
    /// Validate a concise outline payload and build the tree.
    pub fn build(payload: &OutlinePayload) -> Result<Self, OutlineError> {
        let mut tree = OutlineTree { nodes: Vec::new() };

        let root_category = classify(payload, 0)?;
        if root_category != Category::Course {
            return Err(OutlineError::RootNotCourse {
                id: locator_of(payload, 0)?,
                found: root_category,
            });
        }

        // Depth-first with an explicit stack; nodes land in preorder.
        let mut pending: Vec<(&OutlinePayload, Option<NodeId>)> =
            vec![(payload, None)];
        while let Some((raw, parent)) = pending.pop() {
            let depth = parent
                .map(|p| tree.nodes[p.0].category.depth() + 1)
                .unwrap_or(0);
            let locator = locator_of(raw, depth)?;
            let category = classify(raw, depth)?;

            if let Some(parent_id) = parent {
                let parent_category = tree.nodes[parent_id.0].category;
                if parent_category.child() != Some(category) {
                    return Err(OutlineError::InvalidNesting {
                        id: locator,
                        parent: parent_category,
                        found: category,
                        expected: parent_category
                            .child()
                            .map(|c| c.label().to_string())
                            .unwrap_or_else(|| "nothing".to_string()),
                    });
                }
            }

            let id = NodeId(tree.nodes.len());
            tree.nodes.push(OutlineNode {
                locator,
                display_name: raw.display_name.clone(),
                category,
                block_type: raw.category.trim().to_string(),
                children: Vec::new(),
                parent,
            });
            if let Some(parent_id) = parent {
                tree.nodes[parent_id.0].children.push(id);
            }

            // Reverse so children pop, and therefore attach, in payload order.
            for child in raw.children().iter().rev() {
                pending.push((child, Some(id)));
            }
        }

        tracing::debug!(
            target: "xmove::outline",
            nodes = tree.nodes.len(),
            "built course outline"
        );
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root_node(&self) -> &OutlineNode {
        &self.nodes[0]
    }

    /// Node behind `id`.
    ///
    /// # Panics
    /// If `id` was produced by a different tree.
    pub fn node(&self, id: NodeId) -> &OutlineNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&OutlineNode> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.nodes[id.0].children.get(index).copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// First node carrying `locator`, in depth-first order.
    pub fn find(&self, locator: &Locator) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| &node.locator == locator)
            .map(NodeId)
    }

    /// Ancestor chain of `id`, root first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut cursor = self.parent(id);
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.parent(parent);
        }
        chain.reverse();
        chain
    }

    /// Position of `id` among its siblings.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|child| *child == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &OutlineNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }
}

fn locator_of(
    raw: &OutlinePayload,
    depth: usize,
) -> Result<Locator, OutlineError> {
    raw.id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or(OutlineError::MissingId { depth })
}

fn classify(
    raw: &OutlinePayload,
    depth: usize,
) -> Result<Category, OutlineError> {
    Category::from_block_type(&raw.category).map_err(|_| {
        match locator_of(raw, depth) {
            Ok(id) => OutlineError::EmptyCategory { id },
            Err(missing) => missing,
        }
    })
}
