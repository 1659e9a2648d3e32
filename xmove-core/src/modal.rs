//! One move-dialog session.
//!
//! A [`MoveModal`] owns the outline, the cursor and the workflow for a
//! single source block. Nothing is shared between sessions; closing the
//! dialog drops the outline and cursor. The workflow stays so the last
//! move can still be undone from its banner.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use xmove_model::{AncestorInfo, Locator, OutlinePayload, XBlockInfo};

use crate::api::StudioApi;
use crate::cursor::NavigationCursor;
use crate::eligibility::is_eligible;
use crate::error::{ModalError, TransportError};
use crate::notify::{Notifier, SAVE_ERROR};
use crate::tree::{NodeId, OutlineNode, OutlineTree};
use crate::views::{BreadcrumbView, ListView, ModalHeader};
use crate::workflow::{MovePhase, MoveWorkflow, MovedAlert};

/// What the dialog is asked to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalOptions {
    pub course: Locator,
    pub source: XBlockInfo,
    /// Current parent of the source; follows it through moves and undos
    pub source_parent: XBlockInfo,
    /// Start at the source's parent instead of the outline root
    pub start_at_source_parent: bool,
}

#[derive(Debug)]
struct Loaded {
    tree: OutlineTree,
    cursor: NavigationCursor,
    current_location: HashSet<Locator>,
}

/// Where the source sat before the last confirmed move.
#[derive(Debug)]
struct PriorLocation {
    parent: XBlockInfo,
    markers: HashSet<Locator>,
}

pub struct MoveModal {
    options: ModalOptions,
    api: Arc<dyn StudioApi>,
    notifier: Arc<dyn Notifier>,
    workflow: MoveWorkflow,
    loaded: Option<Loaded>,
    prior: Option<PriorLocation>,
    loading: bool,
    open: bool,
}

impl fmt::Debug for MoveModal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveModal")
            .field("options", &self.options)
            .field("workflow", &self.workflow)
            .field("loaded", &self.loaded.is_some())
            .field("loading", &self.loading)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

impl MoveModal {
    pub fn new(
        options: ModalOptions,
        api: Arc<dyn StudioApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let workflow = MoveWorkflow::new(api.clone(), notifier.clone());
        Self {
            options,
            api,
            notifier,
            workflow,
            loaded: None,
            prior: None,
            loading: false,
            open: true,
        }
    }

    /// Fetch everything needed for `source` and open a dialog on it.
    ///
    /// The source's display name and parent come from the fetched outline
    /// and ancestor info, so the caller only needs locators.
    pub async fn open_for_source(
        course: Locator,
        source: Locator,
        start_at_source_parent: bool,
        api: Arc<dyn StudioApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ModalError> {
        let (outline, ancestors) = match tokio::try_join!(
            api.fetch_outline(&course),
            api.fetch_ancestors(&source),
        ) {
            Ok(fetched) => fetched,
            Err(error) => {
                report_load_failure(notifier.as_ref(), &error);
                return Err(error.into());
            }
        };

        let source_parent = ancestors
            .ancestors
            .first()
            .cloned()
            .ok_or_else(|| ModalError::Orphan {
                block: source.clone(),
            })?;
        let source_info = match outline.find(&source) {
            Some(block) => XBlockInfo::new(
                source.clone(),
                block.display_name.clone(),
                block.category.clone(),
            ),
            None => {
                XBlockInfo::new(source.clone(), source.to_string(), "component")
            }
        };

        let options = ModalOptions {
            course,
            source: source_info,
            source_parent,
            start_at_source_parent,
        };
        let mut modal = Self::new(options, api, notifier);
        modal.begin_open()?;
        modal.finish_open(Ok((outline, ancestors)))?;
        Ok(modal)
    }

    pub fn header(&self) -> ModalHeader {
        ModalHeader::for_source(&self.options.source)
    }

    pub fn options(&self) -> &ModalOptions {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fetch the outline and the source's ancestors, then render.
    ///
    /// Both requests are issued together. Any failure shows the generic
    /// save error and leaves the dialog without an outline.
    pub async fn open(&mut self) -> Result<(), ModalError> {
        self.begin_open()?;
        let fetched = tokio::try_join!(
            self.api.fetch_outline(&self.options.course),
            self.api.fetch_ancestors(&self.options.source.id),
        );
        self.finish_open(fetched)
    }

    /// Show the loading state while the caller fetches the payloads.
    pub fn begin_open(&mut self) -> Result<(), ModalError> {
        self.ensure_open()?;
        self.loading = true;
        Ok(())
    }

    /// Leave the loading state with the fetched payloads.
    pub fn finish_open(
        &mut self,
        fetched: Result<(OutlinePayload, AncestorInfo), TransportError>,
    ) -> Result<(), ModalError> {
        self.loading = false;
        self.ensure_open()?;
        match fetched {
            Ok((outline, ancestors)) => self.render_views(&outline, &ancestors),
            Err(error) => {
                report_load_failure(self.notifier.as_ref(), &error);
                Err(error.into())
            }
        }
    }

    /// Build the tree and position the cursor.
    ///
    /// Re-rendering replaces the previous outline and cursor.
    pub fn render_views(
        &mut self,
        outline: &OutlinePayload,
        ancestors: &AncestorInfo,
    ) -> Result<(), ModalError> {
        self.ensure_open()?;
        let tree = OutlineTree::build(outline)?;
        let cursor = if self.options.start_at_source_parent {
            NavigationCursor::seeded(&tree, ancestors)
        } else {
            NavigationCursor::new(&tree)
        };

        let mut current_location: HashSet<Locator> = ancestors
            .ancestors
            .iter()
            .map(|entry| entry.id.clone())
            .collect();
        current_location.insert(self.options.source.id.clone());

        self.loaded = Some(Loaded {
            tree,
            cursor,
            current_location,
        });
        self.refresh_eligibility();
        Ok(())
    }

    /// Navigate into the child at `index` of the displayed node.
    pub fn forward(&mut self, index: usize) -> Result<(), ModalError> {
        let loaded = self.loaded_mut()?;
        loaded.cursor.forward(&loaded.tree, index)?;
        self.refresh_eligibility();
        Ok(())
    }

    /// Navigate back to the breadcrumb at `index`.
    pub fn backward(&mut self, index: usize) -> Result<(), ModalError> {
        let loaded = self.loaded_mut()?;
        loaded.cursor.backward(&loaded.tree, index)?;
        self.refresh_eligibility();
        Ok(())
    }

    pub fn list_view(&self) -> Result<ListView, ModalError> {
        let loaded = self.loaded()?;
        Ok(ListView::build(
            &loaded.tree,
            &loaded.cursor,
            &loaded.current_location,
        ))
    }

    pub fn breadcrumbs(&self) -> Result<BreadcrumbView, ModalError> {
        let loaded = self.loaded()?;
        Ok(BreadcrumbView::build(&loaded.tree, &loaded.cursor))
    }

    /// Node that would become the new parent if the move were confirmed.
    pub fn target_parent(&self) -> Option<&OutlineNode> {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.cursor.current_node(&loaded.tree))
    }

    pub fn tree(&self) -> Option<&OutlineTree> {
        self.loaded.as_ref().map(|loaded| &loaded.tree)
    }

    pub fn cursor(&self) -> Option<&NavigationCursor> {
        self.loaded.as_ref().map(|loaded| &loaded.cursor)
    }

    /// Whether the move action is enabled.
    pub fn is_move_enabled(&self) -> bool {
        self.open
            && !self.workflow.is_busy()
            && self.loaded.as_ref().is_some_and(|loaded| {
                is_eligible(
                    &self.options.source,
                    &self.options.source_parent,
                    &loaded.tree,
                    &loaded.cursor,
                )
            })
    }

    pub fn phase(&self) -> MovePhase {
        self.workflow.phase()
    }

    pub fn workflow(&self) -> &MoveWorkflow {
        &self.workflow
    }

    /// The live confirmation banner, if any.
    pub fn alert(&self) -> Option<&MovedAlert> {
        self.workflow.alert()
    }

    /// Move the source under the displayed node.
    ///
    /// On success the displayed node becomes the source's parent.
    pub async fn confirm_move(
        &mut self,
        target_index: Option<usize>,
    ) -> Result<MovedAlert, ModalError> {
        self.ensure_open()?;
        let loaded = self.loaded.as_ref().ok_or(ModalError::NotLoaded)?;
        let target_id = loaded.cursor.current();
        let alert = self
            .workflow
            .confirm_move(
                &self.options.source,
                &self.options.source_parent,
                loaded.tree.node(target_id),
                target_index,
            )
            .await?;
        self.settle_under(target_id);
        Ok(alert)
    }

    /// Revert the last successful move.
    ///
    /// Works after [`MoveModal::cancel`] too: the move banner outlives the
    /// dialog and its undo action stays usable.
    pub async fn undo(&mut self) -> Result<MovedAlert, ModalError> {
        let alert = self.workflow.undo().await?;
        if let Some(prior) = self.prior.take() {
            self.options.source_parent = prior.parent;
            if let Some(loaded) = self.loaded.as_mut() {
                loaded.current_location = prior.markers;
            }
        }
        self.refresh_eligibility();
        Ok(alert)
    }

    /// Close the dialog without moving anything.
    pub fn cancel(&mut self) {
        tracing::debug!(target: "xmove::modal", "move dialog cancelled");
        self.open = false;
        self.loading = false;
        self.loaded = None;
    }

    fn ensure_open(&self) -> Result<(), ModalError> {
        if self.open {
            Ok(())
        } else {
            Err(ModalError::Closed)
        }
    }

    fn loaded(&self) -> Result<&Loaded, ModalError> {
        self.ensure_open()?;
        self.loaded.as_ref().ok_or(ModalError::NotLoaded)
    }

    fn loaded_mut(&mut self) -> Result<&mut Loaded, ModalError> {
        self.ensure_open()?;
        self.loaded.as_mut().ok_or(ModalError::NotLoaded)
    }

    /// Record `target` as the source's parent after a confirmed move.
    fn settle_under(&mut self, target: NodeId) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        let node = loaded.tree.node(target);
        let new_parent = XBlockInfo::new(
            node.locator.clone(),
            node.display_name.clone(),
            node.block_type.clone(),
        );

        let mut markers: HashSet<Locator> = loaded
            .tree
            .ancestors(target)
            .into_iter()
            .map(|id| loaded.tree.node(id).locator.clone())
            .collect();
        markers.insert(new_parent.id.clone());
        markers.insert(self.options.source.id.clone());

        let markers = std::mem::replace(&mut loaded.current_location, markers);
        let parent =
            std::mem::replace(&mut self.options.source_parent, new_parent);
        self.prior = Some(PriorLocation { parent, markers });
        self.refresh_eligibility();
    }

    fn refresh_eligibility(&mut self) {
        let eligible = self.loaded.as_ref().is_some_and(|loaded| {
            is_eligible(
                &self.options.source,
                &self.options.source_parent,
                &loaded.tree,
                &loaded.cursor,
            )
        });
        self.workflow.set_target_eligible(eligible);
    }
}

fn report_load_failure(notifier: &dyn Notifier, error: &TransportError) {
    tracing::warn!(
        target: "xmove::modal",
        %error,
        "failed to load course outline"
    );
    notifier.show_error(SAVE_ERROR);
}
