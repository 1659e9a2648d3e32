//! Error types for outline building, navigation, transport and the move
//! workflow.

use thiserror::Error;
use xmove_model::{Category, Locator};

/// The outline payload does not describe a well-formed course tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutlineError {
    #[error("outline node at depth {depth} has no id")]
    MissingId { depth: usize },

    #[error("block {id} has an empty category")]
    EmptyCategory { id: Locator },

    #[error("outline root {id} is a {found}, expected a course")]
    RootNotCourse { id: Locator, found: Category },

    #[error(
        "block {id} is a {found} but its {parent} parent can only hold {expected}"
    )]
    InvalidNesting {
        id: Locator,
        parent: Category,
        found: Category,
        expected: String,
    },
}

/// A cursor transition was requested that the current position forbids.
///
/// These indicate UI gating bugs rather than user-facing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no child at index {index} (node has {len} children)")]
    NoSuchChild { index: usize, len: usize },

    #[error("components have no children to navigate into")]
    AtLeaf,

    #[error("no breadcrumb at index {index} (trail has {len} entries)")]
    InvalidBreadcrumbIndex { index: usize, len: usize },
}

/// Failure talking to Studio.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unable to decode response: {0}")]
    Decode(String),

    #[error("move response did not report the source index")]
    MissingSourceIndex,

    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// A workflow transition was attempted from a state that does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("the selected location is not a valid move target")]
    MoveNotAllowed,

    #[error("a relocation request is already in flight")]
    Busy,

    #[error("there is no completed move to undo")]
    UndoUnavailable,

    #[error("received a relocation response with no request in flight")]
    NothingInFlight,

    #[error("relocation failed: {0}")]
    Transport(#[from] TransportError),
}

/// Errors surfaced by a [`crate::modal::MoveModal`] session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error("the move dialog is not open")]
    Closed,

    #[error("the course outline has not been loaded")]
    NotLoaded,

    #[error("block {block} has no parent in the ancestor info")]
    Orphan { block: Locator },

    #[error(transparent)]
    Outline(#[from] OutlineError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Configuration could not be loaded or failed validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid base url {value}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}
