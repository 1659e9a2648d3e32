//! Convenience re-exports for crates that work with outlines and moves.

pub use crate::category::Category;
pub use crate::locator::Locator;
pub use crate::outline::{
    AncestorEntry, AncestorInfo, ChildInfo, OutlinePayload, XBlockInfo,
};
pub use crate::relocation::{MoveRequest, MoveResult};
