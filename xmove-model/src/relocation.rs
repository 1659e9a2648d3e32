//! Wire contract of the relocation (`PATCH {xblock_root}/`) endpoint.

use crate::locator::Locator;

/// Request to re-parent a block.
///
/// `source_parent` is where the block lives before the move. It is not
/// sent to the server but is needed to build the inverse request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRequest {
    #[cfg_attr(feature = "serde", serde(rename = "move_source_locator"))]
    pub source: Locator,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub source_parent: Option<Locator>,
    #[cfg_attr(feature = "serde", serde(rename = "parent_locator"))]
    pub target_parent: Locator,
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "targetIndex",
            default,
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub target_index: Option<usize>,
}

impl MoveRequest {
    pub fn new(
        source: impl Into<Locator>,
        source_parent: impl Into<Locator>,
        target_parent: impl Into<Locator>,
        target_index: Option<usize>,
    ) -> Self {
        Self {
            source: source.into(),
            source_parent: Some(source_parent.into()),
            target_parent: target_parent.into(),
            target_index,
        }
    }

    /// Request that puts the block back where `result` says it came from.
    ///
    /// Returns `None` when the original parent or index is unknown.
    pub fn inverse(&self, result: &MoveResult) -> Option<MoveRequest> {
        let original_parent = self.source_parent.clone()?;
        let index = result.source_index?;
        Some(MoveRequest {
            source: self.source.clone(),
            source_parent: Some(result.new_parent.clone()),
            target_parent: original_parent,
            target_index: Some(index),
        })
    }
}

/// Server acknowledgement of a move.
///
/// `source_index` is the position the block occupied before the move.
/// Older servers reported it as `target_index`; both spellings decode.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveResult {
    #[cfg_attr(feature = "serde", serde(rename = "move_source_locator"))]
    pub moved_source: Locator,
    #[cfg_attr(feature = "serde", serde(rename = "parent_locator"))]
    pub new_parent: Locator,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            alias = "target_index",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub source_index: Option<usize>,
}
