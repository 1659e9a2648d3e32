//! Core library for moving blocks around a Studio course outline.
//!
//! The pieces, from the bottom up:
//!
//! - [`tree::OutlineTree`] validates the concise outline payload and holds
//!   it read-only for the lifetime of a dialog.
//! - [`cursor::NavigationCursor`] walks that tree forward into children and
//!   backward along the breadcrumb trail.
//! - [`eligibility`] decides whether the cursor points at a legal new
//!   parent for the source block.
//! - [`workflow::MoveWorkflow`] drives move and undo requests through an
//!   explicit state machine.
//! - [`modal::MoveModal`] ties them together for one dialog session, with
//!   [`api::StudioApi`] and [`notify::Notifier`] as its only collaborators.

pub mod api;
pub mod config;
pub mod cursor;
pub mod eligibility;
pub mod error;
pub mod modal;
pub mod notify;
pub mod tree;
pub mod views;
pub mod workflow;

pub use xmove_model as model;

pub use api::{StudioApi, StudioClient};
pub use config::StudioConfig;
pub use cursor::NavigationCursor;
pub use eligibility::{can_adopt, is_eligible};
pub use error::{
    ConfigError, ModalError, NavigationError, OutlineError, TransportError,
    WorkflowError,
};
pub use modal::{ModalOptions, MoveModal};
pub use notify::{LogNotifier, Notifier};
pub use tree::{NodeId, OutlineNode, OutlineTree};
pub use views::{BreadcrumbView, ListView, ModalHeader};
pub use workflow::{
    CompletedMove, MovePhase, MoveState, MoveWorkflow, MovedAlert,
};

/// Frequently used imports for front ends.
pub mod prelude {
    pub use super::model::prelude::*;
    pub use super::{
        ModalError, ModalOptions, MoveModal, MovePhase, MovedAlert, Notifier,
        StudioApi, StudioClient, StudioConfig,
    };
}
