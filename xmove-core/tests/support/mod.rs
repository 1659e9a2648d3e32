//! Shared fixtures for dialog-level tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use xmove_core::api::ApiResult;
use xmove_core::model::prelude::*;
use xmove_core::{
    ModalOptions, MoveModal, Notifier, StudioApi, TransportError,
};

pub const SOURCE_LOCATOR: &str = "component_ID_0";
pub const SOURCE_DISPLAY_NAME: &str = "component_display_name_0";
pub const SOURCE_PARENT_LOCATOR: &str = "unit_ID_0";
pub const COURSE_LOCATOR: &str = "COURSE_ID_101";

/// Number of blocks per level; zero stops the outline at that level.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineShape {
    pub section: usize,
    pub subsection: usize,
    pub unit: usize,
    pub component: usize,
}

impl OutlineShape {
    pub fn uniform(count: usize) -> Self {
        Self {
            section: count,
            subsection: count,
            unit: count,
            component: count,
        }
    }

    fn count(&self, category: Category) -> usize {
        match category {
            Category::Course => 1,
            Category::Section => self.section,
            Category::Subsection => self.subsection,
            Category::Unit => self.unit,
            Category::Component => self.component,
        }
    }
}

/// Outline where every block at a level is named `{level}_ID_{i}` /
/// `{level}_display_name_{i}`, regardless of its parent.
pub fn course_outline(shape: OutlineShape) -> OutlinePayload {
    let root = OutlinePayload::new(COURSE_LOCATOR, "Demo Course", "course");
    attach_children(root, Category::Section, shape)
}

fn attach_children(
    node: OutlinePayload,
    category: Category,
    shape: OutlineShape,
) -> OutlinePayload {
    let count = shape.count(category);
    if count == 0 {
        return node;
    }
    let children = (0..count)
        .map(|index| {
            let child = OutlinePayload::new(
                format!("{}_ID_{index}", category.label()),
                format!("{}_display_name_{index}", category.label()),
                category.studio_block_type(),
            );
            match category.child() {
                Some(next) => attach_children(child, next, shape),
                None => child,
            }
        })
        .collect();
    node.with_children(children)
}

pub fn source_ancestors() -> AncestorInfo {
    AncestorInfo {
        ancestors: vec![
            XBlockInfo::new("unit_ID_0", "unit_display_name_0", "vertical"),
            XBlockInfo::new(
                "subsection_ID_0",
                "subsection_display_name_0",
                "sequential",
            ),
            XBlockInfo::new(
                "section_ID_0",
                "section_display_name_0",
                "chapter",
            ),
            XBlockInfo::new(COURSE_LOCATOR, "Demo Course", "course"),
        ],
    }
}

pub fn modal_options() -> ModalOptions {
    ModalOptions {
        course: Locator::new(COURSE_LOCATOR),
        source: XBlockInfo::new(
            SOURCE_LOCATOR,
            SOURCE_DISPLAY_NAME,
            "component",
        ),
        source_parent: XBlockInfo::new(
            SOURCE_PARENT_LOCATOR,
            "unit_display_name_0",
            "vertical",
        ),
        start_at_source_parent: false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Show(String),
    Hide,
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, text: &str) {
        self.notices.lock().unwrap().push(Notice::Show(text.to_string()));
    }

    fn hide(&self) {
        self.notices.lock().unwrap().push(Notice::Hide);
    }

    fn show_error(&self, text: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Error(text.to_string()));
    }
}

/// In-memory Studio that records relocation requests and answers from a
/// script.
#[derive(Debug, Default)]
pub struct FakeStudio {
    pub outline: Mutex<Option<ApiResult<OutlinePayload>>>,
    pub ancestors: Mutex<Option<ApiResult<AncestorInfo>>>,
    pub relocations: Mutex<VecDeque<ApiResult<MoveResult>>>,
    pub sent: Mutex<Vec<MoveRequest>>,
    pub fetches: Mutex<Vec<String>>,
}

impl FakeStudio {
    pub fn with_outline(
        outline: OutlinePayload,
        ancestors: AncestorInfo,
    ) -> Self {
        let studio = Self::default();
        *studio.outline.lock().unwrap() = Some(Ok(outline));
        *studio.ancestors.lock().unwrap() = Some(Ok(ancestors));
        studio
    }

    pub fn respond(&self, result: ApiResult<MoveResult>) {
        self.relocations.lock().unwrap().push_back(result);
    }

    pub fn sent(&self) -> Vec<MoveRequest> {
        self.sent.lock().unwrap().clone()
    }
}

fn unscripted() -> TransportError {
    TransportError::Network("no scripted response".to_string())
}

#[async_trait]
impl StudioApi for FakeStudio {
    async fn fetch_outline(
        &self,
        course: &Locator,
    ) -> ApiResult<OutlinePayload> {
        self.fetches.lock().unwrap().push(format!("outline:{course}"));
        self.outline
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn fetch_ancestors(
        &self,
        usage: &Locator,
    ) -> ApiResult<AncestorInfo> {
        self.fetches.lock().unwrap().push(format!("ancestors:{usage}"));
        self.ancestors
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn relocate(&self, request: &MoveRequest) -> ApiResult<MoveResult> {
        self.sent.lock().unwrap().push(request.clone());
        self.relocations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }
}

pub struct Harness {
    pub studio: Arc<FakeStudio>,
    pub notifier: Arc<RecordingNotifier>,
    pub modal: MoveModal,
}

pub fn harness(studio: FakeStudio, options: ModalOptions) -> Harness {
    let studio = Arc::new(studio);
    let notifier = Arc::new(RecordingNotifier::default());
    let modal = MoveModal::new(options, studio.clone(), notifier.clone());
    Harness {
        studio,
        notifier,
        modal,
    }
}

pub fn moved(parent: &str, source_index: Option<usize>) -> MoveResult {
    MoveResult {
        moved_source: Locator::new(SOURCE_LOCATOR),
        new_parent: Locator::new(parent),
        source_index,
    }
}
