//! Move and undo as an explicit state machine.
//!
//! ```text
//! Idle -> Navigating <-> Confirming -> InFlight -> Succeeded -> UndoInFlight -> UndoSucceeded
//!                                              \-> Failed                  \-> Failed -> UndoInFlight
//! ```
//!
//! Every request is split into a `begin_*` step that validates the state
//! and shows the transient status, and a `finish_*` step that applies the
//! server outcome. [`MoveWorkflow::confirm_move`] and [`MoveWorkflow::undo`]
//! run both halves around a [`StudioApi::relocate`] call.

use std::fmt;
use std::sync::Arc;

use xmove_model::{Locator, MoveRequest, MoveResult, XBlockInfo};

use crate::api::{ApiResult, StudioApi};
use crate::eligibility::can_adopt;
use crate::error::{TransportError, WorkflowError};
use crate::notify::{MOVING, Notifier, SAVE_ERROR, UNDO_MOVING};
use crate::tree::OutlineNode;

pub const TAKE_ME_THERE_LABEL: &str = "Take me to the new location";
pub const UNDO_MOVE_LABEL: &str = "Undo move";

/// Link from the confirmation banner to the destination container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertLink {
    pub label: String,
    pub href: String,
}

/// Data carried by the banner's undo action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoAction {
    pub label: String,
    pub source_display_name: String,
    pub source_locator: Locator,
    pub parent_locator: Locator,
    pub target_index: usize,
}

/// Persistent confirmation shown after a move or an undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedAlert {
    pub title: String,
    pub link: Option<AlertLink>,
    pub undo: Option<UndoAction>,
}

impl MovedAlert {
    fn moved(
        source: &XBlockInfo,
        result: &MoveResult,
        undo: &MoveRequest,
    ) -> Self {
        Self {
            title: format!(
                "Success! \"{}\" has been moved.",
                source.display_name
            ),
            link: Some(AlertLink {
                label: TAKE_ME_THERE_LABEL.to_string(),
                href: format!("/container/{}", result.new_parent),
            }),
            undo: Some(UndoAction {
                label: UNDO_MOVE_LABEL.to_string(),
                source_display_name: source.display_name.clone(),
                source_locator: undo.source.clone(),
                parent_locator: undo.target_parent.clone(),
                target_index: undo.target_index.unwrap_or_default(),
            }),
        }
    }

    fn moved_back(source: &XBlockInfo) -> Self {
        Self {
            title: format!(
                "Move cancelled. \"{}\" has been moved back to its original \
                 location.",
                source.display_name
            ),
            link: None,
            undo: None,
        }
    }
}

/// A move the server confirmed, with what it takes to revert it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedMove {
    pub source: XBlockInfo,
    pub alert: MovedAlert,
    pub undo: MoveRequest,
}

/// Lightweight discriminant of [`MoveState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePhase {
    Idle,
    Navigating,
    Confirming,
    InFlight,
    Succeeded,
    Failed,
    UndoInFlight,
    UndoSucceeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveState {
    /// Dialog open, outline not rendered yet
    Idle,
    /// Cursor is somewhere the source cannot move to
    Navigating,
    /// Cursor is on a valid destination; the move action is enabled
    Confirming,
    InFlight {
        source: XBlockInfo,
        request: MoveRequest,
    },
    Succeeded(CompletedMove),
    /// `undo` survives a failed undo so it can be sent again
    Failed {
        error: TransportError,
        undo: Option<CompletedMove>,
    },
    UndoInFlight(CompletedMove),
    UndoSucceeded {
        alert: MovedAlert,
    },
}

impl MoveState {
    pub fn phase(&self) -> MovePhase {
        match self {
            MoveState::Idle => MovePhase::Idle,
            MoveState::Navigating => MovePhase::Navigating,
            MoveState::Confirming => MovePhase::Confirming,
            MoveState::InFlight { .. } => MovePhase::InFlight,
            MoveState::Succeeded(_) => MovePhase::Succeeded,
            MoveState::Failed { .. } => MovePhase::Failed,
            MoveState::UndoInFlight(_) => MovePhase::UndoInFlight,
            MoveState::UndoSucceeded { .. } => MovePhase::UndoSucceeded,
        }
    }
}

pub struct MoveWorkflow {
    state: MoveState,
    api: Arc<dyn StudioApi>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for MoveWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveWorkflow")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl MoveWorkflow {
    pub fn new(api: Arc<dyn StudioApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: MoveState::Idle,
            api,
            notifier,
        }
    }

    pub fn state(&self) -> &MoveState {
        &self.state
    }

    pub fn phase(&self) -> MovePhase {
        self.state.phase()
    }

    /// True while a move or undo request is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            MoveState::InFlight { .. } | MoveState::UndoInFlight(_)
        )
    }

    /// The live confirmation banner, if any.
    ///
    /// A failed undo keeps the move banner so its undo action stays
    /// available.
    pub fn alert(&self) -> Option<&MovedAlert> {
        match &self.state {
            MoveState::Succeeded(done)
            | MoveState::Failed {
                undo: Some(done), ..
            } => Some(&done.alert),
            MoveState::UndoSucceeded { alert } => Some(alert),
            _ => None,
        }
    }

    /// The move an undo would revert, if one is available.
    pub fn undoable(&self) -> Option<&CompletedMove> {
        match &self.state {
            MoveState::Succeeded(done)
            | MoveState::Failed {
                undo: Some(done), ..
            } => Some(done),
            _ => None,
        }
    }

    /// Record whether the cursor sits on a valid destination.
    ///
    /// Only the pre-move states react; a live banner or an outstanding
    /// request is left alone.
    pub fn set_target_eligible(&mut self, eligible: bool) {
        if matches!(
            self.state,
            MoveState::Idle | MoveState::Navigating | MoveState::Confirming
        ) {
            self.state = if eligible {
                MoveState::Confirming
            } else {
                MoveState::Navigating
            };
        }
    }

    /// Validate a move to `target` and enter `InFlight`.
    pub fn begin_move(
        &mut self,
        source: &XBlockInfo,
        source_parent: &XBlockInfo,
        target: &OutlineNode,
        target_index: Option<usize>,
    ) -> Result<MoveRequest, WorkflowError> {
        if self.is_busy() {
            return Err(WorkflowError::Busy);
        }
        if !can_adopt(source, source_parent, target) {
            return Err(WorkflowError::MoveNotAllowed);
        }

        let request = MoveRequest::new(
            source.id.clone(),
            source_parent.id.clone(),
            target.locator.clone(),
            target_index,
        );
        tracing::info!(
            target: "xmove::workflow",
            source = %request.source,
            from = %source_parent.id,
            to = %request.target_parent,
            "moving block"
        );
        self.notifier.show(MOVING);
        self.state = MoveState::InFlight {
            source: source.clone(),
            request: request.clone(),
        };
        Ok(request)
    }

    /// Apply the server's answer to the outstanding move.
    pub fn finish_move(
        &mut self,
        outcome: ApiResult<MoveResult>,
    ) -> Result<MovedAlert, WorkflowError> {
        let (source, request) =
            match std::mem::replace(&mut self.state, MoveState::Idle) {
                MoveState::InFlight { source, request } => (source, request),
                other => {
                    self.state = other;
                    return Err(unexpected_response());
                }
            };
        self.notifier.hide();

        let outcome = outcome.and_then(|result| {
            request
                .inverse(&result)
                .map(|undo| (result, undo))
                .ok_or(TransportError::MissingSourceIndex)
        });
        match outcome {
            Ok((result, undo)) => {
                let alert = MovedAlert::moved(&source, &result, &undo);
                tracing::info!(
                    target: "xmove::workflow",
                    source = %result.moved_source,
                    parent = %result.new_parent,
                    source_index = ?result.source_index,
                    "move succeeded"
                );
                self.state = MoveState::Succeeded(CompletedMove {
                    source,
                    alert: alert.clone(),
                    undo,
                });
                Ok(alert)
            }
            Err(error) => Err(self.fail(error, None)),
        }
    }

    /// Run a complete move round trip.
    pub async fn confirm_move(
        &mut self,
        source: &XBlockInfo,
        source_parent: &XBlockInfo,
        target: &OutlineNode,
        target_index: Option<usize>,
    ) -> Result<MovedAlert, WorkflowError> {
        let request =
            self.begin_move(source, source_parent, target, target_index)?;
        let outcome = self.api.relocate(&request).await;
        self.finish_move(outcome)
    }

    /// Enter `UndoInFlight` with the inverse of the last move.
    ///
    /// Also accepted after a failed undo, which resends the same request.
    pub fn begin_undo(&mut self) -> Result<MoveRequest, WorkflowError> {
        let Some(done) = self.undoable().cloned() else {
            return Err(if self.is_busy() {
                WorkflowError::Busy
            } else {
                WorkflowError::UndoUnavailable
            });
        };

        let request = done.undo.clone();
        tracing::info!(
            target: "xmove::workflow",
            source = %request.source,
            to = %request.target_parent,
            index = ?request.target_index,
            "undoing move"
        );
        self.notifier.show(UNDO_MOVING);
        self.state = MoveState::UndoInFlight(done);
        Ok(request)
    }

    /// Apply the server's answer to the outstanding undo.
    pub fn finish_undo(
        &mut self,
        outcome: ApiResult<MoveResult>,
    ) -> Result<MovedAlert, WorkflowError> {
        let done = match std::mem::replace(&mut self.state, MoveState::Idle) {
            MoveState::UndoInFlight(done) => done,
            other => {
                self.state = other;
                return Err(unexpected_response());
            }
        };
        self.notifier.hide();

        match outcome {
            Ok(result) => {
                let alert = MovedAlert::moved_back(&done.source);
                tracing::info!(
                    target: "xmove::workflow",
                    source = %result.moved_source,
                    parent = %result.new_parent,
                    "undo succeeded"
                );
                self.state = MoveState::UndoSucceeded {
                    alert: alert.clone(),
                };
                Ok(alert)
            }
            Err(error) => Err(self.fail(error, Some(done))),
        }
    }

    /// Run a complete undo round trip.
    pub async fn undo(&mut self) -> Result<MovedAlert, WorkflowError> {
        let request = self.begin_undo()?;
        let outcome = self.api.relocate(&request).await;
        self.finish_undo(outcome)
    }

    fn fail(
        &mut self,
        error: TransportError,
        undo: Option<CompletedMove>,
    ) -> WorkflowError {
        tracing::warn!(target: "xmove::workflow", %error, "relocation failed");
        self.notifier.show_error(SAVE_ERROR);
        self.state = MoveState::Failed {
            error: error.clone(),
            undo,
        };
        WorkflowError::Transport(error)
    }
}

fn unexpected_response() -> WorkflowError {
    tracing::error!(
        target: "xmove::workflow",
        "relocation response arrived with no request in flight"
    );
    WorkflowError::NothingInFlight
}
