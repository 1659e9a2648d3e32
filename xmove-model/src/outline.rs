//! Payloads returned by the outline and ancestor-info endpoints.

use crate::locator::Locator;

/// One node of the concise course outline.
///
/// Children hang off `child_info`; a node without it has no children.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlinePayload {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<Locator>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub child_info: Option<ChildInfo>,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChildInfo {
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<OutlinePayload>,
}

impl OutlinePayload {
    pub fn new(
        id: impl Into<Locator>,
        display_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            display_name: display_name.into(),
            category: category.into(),
            child_info: None,
        }
    }

    /// Attach children, recording their shared category in `child_info`.
    pub fn with_children(mut self, children: Vec<OutlinePayload>) -> Self {
        let category = children
            .first()
            .map(|child| child.category.clone())
            .unwrap_or_default();
        self.child_info = Some(ChildInfo {
            display_name: category.clone(),
            category,
            children,
        });
        self
    }

    pub fn children(&self) -> &[OutlinePayload] {
        self.child_info
            .as_ref()
            .map(|info| info.children.as_slice())
            .unwrap_or(&[])
    }

    /// First block carrying `locator`, searched depth-first.
    pub fn find(&self, locator: &Locator) -> Option<&OutlinePayload> {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if node.id.as_ref() == Some(locator) {
                return Some(node);
            }
            pending.extend(node.children().iter().rev());
        }
        None
    }
}

/// Minimal description of a block as the caller knows it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XBlockInfo {
    pub id: Locator,
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: String,
}

impl XBlockInfo {
    pub fn new(
        id: impl Into<Locator>,
        display_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            category: category.into(),
        }
    }
}

/// Single entry of the ancestor chain.
pub type AncestorEntry = XBlockInfo;

/// Ancestors of a block, nearest parent first and the course last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AncestorInfo {
    #[cfg_attr(feature = "serde", serde(default))]
    pub ancestors: Vec<AncestorEntry>,
}

impl AncestorInfo {
    pub fn contains(&self, locator: &Locator) -> bool {
        self.ancestors.iter().any(|entry| &entry.id == locator)
    }

    /// Ancestors ordered root first.
    pub fn root_first(&self) -> impl Iterator<Item = &AncestorEntry> {
        self.ancestors.iter().rev()
    }
}
