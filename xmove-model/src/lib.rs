//! Core data model definitions shared across xmove crates.
#![allow(missing_docs)]

pub mod category;
pub mod error;
pub mod locator;
pub mod outline;
pub mod prelude;
pub mod relocation;

// Intentionally curated re-exports for downstream consumers.
pub use category::Category;
pub use error::{ModelError, Result as ModelResult};
pub use locator::Locator;
pub use outline::{
    AncestorEntry, AncestorInfo, ChildInfo, OutlinePayload, XBlockInfo,
};
pub use relocation::{MoveRequest, MoveResult};
