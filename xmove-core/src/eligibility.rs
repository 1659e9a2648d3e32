//! Whether the cursor currently points at a legal move destination.

use xmove_model::{Category, XBlockInfo};

use crate::cursor::NavigationCursor;
use crate::tree::{OutlineNode, OutlineTree};

/// True when `target` can adopt `source`: it has the category that holds
/// the source's category and it is not the parent the source already has.
pub fn can_adopt(
    source: &XBlockInfo,
    source_parent: &XBlockInfo,
    target: &OutlineNode,
) -> bool {
    let Ok(source_category) = Category::from_block_type(&source.category)
    else {
        return false;
    };
    source_category.parent() == Some(target.category)
        && target.locator != source_parent.id
}

/// Evaluate [`can_adopt`] at the cursor position.
pub fn is_eligible(
    source: &XBlockInfo,
    source_parent: &XBlockInfo,
    tree: &OutlineTree,
    cursor: &NavigationCursor,
) -> bool {
    can_adopt(source, source_parent, cursor.current_node(tree))
}
