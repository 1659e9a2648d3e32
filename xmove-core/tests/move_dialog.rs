//! End-to-end behaviour of one move-dialog session against a fake Studio.

mod support;

use std::sync::Arc;

use serde_json::json;
use support::{
    COURSE_LOCATOR, FakeStudio, Notice, OutlineShape, RecordingNotifier,
    SOURCE_LOCATOR, course_outline, harness, modal_options, moved,
    source_ancestors,
};
use xmove_core::model::prelude::*;
use xmove_core::notify::{MOVING, SAVE_ERROR, UNDO_MOVING};
use xmove_core::views::FORWARD_LABEL;
use xmove_core::{
    ModalError, MovePhase, MoveModal, NavigationError, TransportError,
    WorkflowError,
};

fn studio(shape: OutlineShape) -> FakeStudio {
    FakeStudio::with_outline(course_outline(shape), source_ancestors())
}

async fn opened(shape: OutlineShape) -> support::Harness {
    let mut h = harness(studio(shape), modal_options());
    h.modal.open().await.unwrap();
    h
}

fn navigate(modal: &mut MoveModal, path: &[usize]) {
    for index in path {
        modal.forward(*index).unwrap();
    }
}

#[tokio::test]
async fn open_fetches_outline_and_ancestors() {
    let h = opened(OutlineShape::uniform(2)).await;

    assert!(!h.modal.is_loading());
    assert_eq!(
        h.studio.fetches.lock().unwrap().clone(),
        vec![
            "outline:COURSE_ID_101".to_string(),
            "ancestors:component_ID_0".to_string(),
        ]
    );
    assert_eq!(h.modal.header().title, "Move: component_display_name_0");
    assert_eq!(h.modal.phase(), MovePhase::Navigating);
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn renders_each_level_with_breadcrumbs() {
    let mut h = opened(OutlineShape::uniform(2)).await;

    let list = h.modal.list_view().unwrap();
    assert_eq!(list.category_text, "Sections:");
    assert_eq!(
        list.display_names(),
        vec!["section_display_name_0", "section_display_name_1"]
    );
    assert!(
        list.items
            .iter()
            .all(|item| item.forward.as_deref() == Some(FORWARD_LABEL))
    );
    assert!(h.modal.breadcrumbs().unwrap().crumbs.is_empty());

    h.modal.forward(0).unwrap();
    let list = h.modal.list_view().unwrap();
    assert_eq!(list.category_text, "Subsections:");
    assert_eq!(
        h.modal.breadcrumbs().unwrap().labels(),
        vec!["Course Outline"]
    );

    h.modal.forward(1).unwrap();
    let list = h.modal.list_view().unwrap();
    assert_eq!(list.category_text, "Units:");
    assert_eq!(
        h.modal.breadcrumbs().unwrap().labels(),
        vec!["Course Outline", "section_display_name_0"]
    );

    h.modal.forward(0).unwrap();
    let list = h.modal.list_view().unwrap();
    assert_eq!(list.category_text, "Components:");
    assert!(list.items.iter().all(|item| item.forward.is_none()));
    assert_eq!(
        h.modal.breadcrumbs().unwrap().labels(),
        vec![
            "Course Outline",
            "section_display_name_0",
            "subsection_display_name_1",
        ]
    );

    h.modal.backward(1).unwrap();
    assert_eq!(h.modal.list_view().unwrap().category_text, "Subsections:");
    assert_eq!(
        h.modal.breadcrumbs().unwrap().labels(),
        vec!["Course Outline"]
    );

    h.modal.backward(0).unwrap();
    assert_eq!(h.modal.list_view().unwrap().category_text, "Sections:");
    assert_eq!(
        h.modal.backward(0),
        Err(ModalError::Navigation(
            NavigationError::InvalidBreadcrumbIndex { index: 0, len: 0 }
        ))
    );
}

#[tokio::test]
async fn marks_current_location_along_the_source_chain() {
    let mut h = opened(OutlineShape::uniform(2)).await;

    for depth in 0..4 {
        let list = h.modal.list_view().unwrap();
        assert_eq!(list.current_location_index(), Some(0), "depth {depth}");
        assert!(!list.items[1].is_current_location);
        if depth < 3 {
            h.modal.forward(0).unwrap();
        }
    }
}

#[tokio::test]
async fn shows_empty_messages_for_short_outlines() {
    let cases = [
        (
            OutlineShape::default(),
            0,
            "Sections:",
            "This course has no sections",
        ),
        (
            OutlineShape {
                section: 1,
                ..OutlineShape::default()
            },
            1,
            "Subsections:",
            "This section has no subsections",
        ),
        (
            OutlineShape {
                section: 1,
                subsection: 1,
                ..OutlineShape::default()
            },
            2,
            "Units:",
            "This subsection has no units",
        ),
        (
            OutlineShape {
                section: 1,
                subsection: 1,
                unit: 1,
                component: 0,
            },
            3,
            "Components:",
            "This unit has no components",
        ),
    ];

    for (shape, depth, heading, message) in cases {
        let mut h = opened(shape).await;
        navigate(&mut h.modal, &vec![0; depth]);

        let list = h.modal.list_view().unwrap();
        assert_eq!(list.category_text, heading);
        assert!(list.items.is_empty());
        assert_eq!(list.empty_message.as_deref(), Some(message));
    }
}

#[tokio::test]
async fn empty_course_disables_move() {
    let mut h = opened(OutlineShape::default()).await;

    assert!(!h.modal.is_move_enabled());
    assert_eq!(
        h.modal.confirm_move(None).await,
        Err(ModalError::Workflow(WorkflowError::MoveNotAllowed))
    );
    assert!(h.studio.sent().is_empty());
}

#[tokio::test]
async fn four_forward_steps_reach_a_component() {
    let mut h = opened(OutlineShape::uniform(2)).await;
    navigate(&mut h.modal, &[0, 0, 0, 0]);

    assert_eq!(h.modal.cursor().unwrap().depth(), 4);
    assert_eq!(
        h.modal.target_parent().unwrap().locator.as_str(),
        "component_ID_0"
    );
    let list = h.modal.list_view().unwrap();
    assert!(list.items.is_empty());
    assert!(list.empty_message.is_none());
    assert!(!h.modal.is_move_enabled());
    assert_eq!(
        h.modal.forward(0),
        Err(ModalError::Navigation(NavigationError::AtLeaf))
    );
}

#[tokio::test]
async fn move_is_disabled_under_the_current_parent() {
    let mut h = opened(OutlineShape::uniform(2)).await;

    navigate(&mut h.modal, &[0, 0, 0]);
    assert_eq!(
        h.modal.target_parent().unwrap().locator.as_str(),
        "unit_ID_0"
    );
    assert!(!h.modal.is_move_enabled());
    assert_eq!(h.modal.phase(), MovePhase::Navigating);

    h.modal.backward(0).unwrap();
    navigate(&mut h.modal, &[1, 1, 1]);
    assert!(h.modal.is_move_enabled());
    assert_eq!(h.modal.phase(), MovePhase::Confirming);
}

#[tokio::test]
async fn disabled_move_sends_nothing() {
    let mut h = opened(OutlineShape::uniform(2)).await;
    navigate(&mut h.modal, &[0, 0]);

    let result = h.modal.confirm_move(None).await;

    assert_eq!(
        result,
        Err(ModalError::Workflow(WorkflowError::MoveNotAllowed))
    );
    assert!(h.studio.sent().is_empty());
    assert!(h.modal.alert().is_none());
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn moves_and_undoes_a_component() {
    let mut h = opened(OutlineShape::uniform(2)).await;
    navigate(&mut h.modal, &[1, 1, 1]);
    h.studio.respond(Ok(moved("unit_ID_1", Some(0))));
    h.studio.respond(Ok(moved("unit_ID_0", None)));

    let alert = h.modal.confirm_move(None).await.unwrap();

    assert_eq!(
        alert.title,
        "Success! \"component_display_name_0\" has been moved."
    );
    let link = alert.link.as_ref().unwrap();
    assert_eq!(link.label, "Take me to the new location");
    assert_eq!(link.href, "/container/unit_ID_1");
    let undo = alert.undo.as_ref().unwrap();
    assert_eq!(undo.label, "Undo move");
    assert_eq!(undo.source_locator.as_str(), "component_ID_0");
    assert_eq!(undo.parent_locator.as_str(), "unit_ID_0");
    assert_eq!(undo.target_index, 0);
    assert_eq!(h.modal.phase(), MovePhase::Succeeded);
    assert_eq!(h.modal.alert(), Some(&alert));

    let reverted = h.modal.undo().await.unwrap();
    assert_eq!(
        reverted.title,
        "Move cancelled. \"component_display_name_0\" has been moved back \
         to its original location."
    );
    assert!(reverted.link.is_none());
    assert!(reverted.undo.is_none());
    assert_eq!(h.modal.phase(), MovePhase::UndoSucceeded);

    let bodies: Vec<_> = h
        .studio
        .sent()
        .iter()
        .map(|request| serde_json::to_value(request).unwrap())
        .collect();
    assert_eq!(
        bodies,
        vec![
            json!({
                "move_source_locator": "component_ID_0",
                "parent_locator": "unit_ID_1",
            }),
            json!({
                "move_source_locator": "component_ID_0",
                "parent_locator": "unit_ID_0",
                "targetIndex": 0,
            }),
        ]
    );
    assert_eq!(
        h.notifier.notices(),
        vec![
            Notice::Show(MOVING.to_string()),
            Notice::Hide,
            Notice::Show(UNDO_MOVING.to_string()),
            Notice::Hide,
        ]
    );
}

#[tokio::test]
async fn second_undo_is_rejected() {
    let mut h = opened(OutlineShape::uniform(2)).await;
    navigate(&mut h.modal, &[1, 1, 1]);
    h.studio.respond(Ok(moved("unit_ID_1", Some(0))));
    h.studio.respond(Ok(moved("unit_ID_0", None)));

    h.modal.confirm_move(None).await.unwrap();
    h.modal.undo().await.unwrap();

    assert_eq!(
        h.modal.undo().await,
        Err(ModalError::Workflow(WorkflowError::UndoUnavailable))
    );
    assert_eq!(h.studio.sent().len(), 2);
}

#[tokio::test]
async fn explicit_target_index_is_sent() {
    let mut h = opened(OutlineShape::uniform(2)).await;
    navigate(&mut h.modal, &[1, 0, 1]);
    h.studio.respond(Ok(moved("unit_ID_1", Some(3))));

    let alert = h.modal.confirm_move(Some(1)).await.unwrap();

    assert_eq!(h.studio.sent()[0].target_index, Some(1));
    assert_eq!(alert.undo.unwrap().target_index, 3);
}

#[tokio::test]
async fn failed_move_reports_and_allows_retry() {
    let mut h = opened(OutlineShape::uniform(2)).await;
    navigate(&mut h.modal, &[1, 1, 1]);
    let failure = TransportError::Status {
        status: 500,
        body: "boom".to_string(),
    };
    h.studio.respond(Err(failure.clone()));
    h.studio.respond(Ok(moved("unit_ID_1", Some(0))));

    assert_eq!(
        h.modal.confirm_move(None).await,
        Err(ModalError::Workflow(WorkflowError::Transport(failure)))
    );
    assert_eq!(h.modal.phase(), MovePhase::Failed);
    assert!(h.modal.alert().is_none());
    assert!(h.modal.is_move_enabled());
    assert_eq!(
        h.notifier.notices(),
        vec![
            Notice::Show(MOVING.to_string()),
            Notice::Hide,
            Notice::Error(SAVE_ERROR.to_string()),
        ]
    );

    h.modal.confirm_move(None).await.unwrap();
    assert_eq!(h.modal.phase(), MovePhase::Succeeded);
    assert_eq!(h.studio.sent().len(), 2);
}

#[tokio::test]
async fn cancel_closes_without_requests() {
    let mut h = opened(OutlineShape::uniform(2)).await;
    navigate(&mut h.modal, &[1, 1, 1]);

    h.modal.cancel();

    assert!(!h.modal.is_open());
    assert!(!h.modal.is_move_enabled());
    assert_eq!(h.modal.confirm_move(None).await, Err(ModalError::Closed));
    assert_eq!(h.modal.list_view(), Err(ModalError::Closed));
    assert!(h.studio.sent().is_empty());
    assert!(h.modal.alert().is_none());
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn open_failure_shows_save_error() {
    let mut h = harness(FakeStudio::default(), modal_options());

    let result = h.modal.open().await;

    assert!(matches!(result, Err(ModalError::Transport(_))));
    assert_eq!(
        h.notifier.notices(),
        vec![Notice::Error(SAVE_ERROR.to_string())]
    );
    assert_eq!(h.modal.list_view(), Err(ModalError::NotLoaded));
    assert!(!h.modal.is_move_enabled());
}

#[tokio::test]
async fn can_start_at_the_source_parent() {
    let mut options = modal_options();
    options.start_at_source_parent = true;
    let mut h = harness(studio(OutlineShape::uniform(2)), options);
    h.modal.open().await.unwrap();

    assert_eq!(
        h.modal.breadcrumbs().unwrap().labels(),
        vec![
            "Course Outline",
            "section_display_name_0",
            "subsection_display_name_0",
        ]
    );
    assert_eq!(h.modal.list_view().unwrap().category_text, "Components:");
    assert!(!h.modal.is_move_enabled());
}

fn three_units() -> OutlineShape {
    OutlineShape {
        section: 1,
        subsection: 1,
        unit: 3,
        component: 1,
    }
}

#[tokio::test]
async fn moved_block_tracks_its_new_parent() {
    let mut h = opened(three_units()).await;
    h.studio.respond(Ok(moved("unit_ID_1", Some(0))));
    h.studio.respond(Ok(moved("unit_ID_2", Some(0))));
    h.studio.respond(Ok(moved("unit_ID_1", None)));

    navigate(&mut h.modal, &[0, 0, 1]);
    h.modal.confirm_move(None).await.unwrap();

    assert_eq!(h.modal.options().source_parent.id.as_str(), "unit_ID_1");
    assert!(!h.modal.is_move_enabled());
    h.modal.backward(2).unwrap();
    assert_eq!(h.modal.list_view().unwrap().current_location_index(), Some(1));
    h.modal.forward(0).unwrap();
    assert!(h.modal.is_move_enabled());

    h.modal.backward(2).unwrap();
    h.modal.forward(2).unwrap();
    let alert = h.modal.confirm_move(None).await.unwrap();
    let undo = alert.undo.unwrap();
    assert_eq!(undo.parent_locator.as_str(), "unit_ID_1");

    h.modal.undo().await.unwrap();
    let sent = h.studio.sent();
    assert_eq!(sent[1].target_parent.as_str(), "unit_ID_2");
    assert_eq!(sent[1].source_parent, Some(Locator::new("unit_ID_1")));
    assert_eq!(sent[2].target_parent.as_str(), "unit_ID_1");
    assert_eq!(h.modal.options().source_parent.id.as_str(), "unit_ID_1");
    assert!(h.modal.is_move_enabled());
    h.modal.backward(2).unwrap();
    assert_eq!(h.modal.list_view().unwrap().current_location_index(), Some(1));
}

#[tokio::test]
async fn failed_undo_can_be_retried() {
    let mut h = opened(OutlineShape::uniform(2)).await;
    navigate(&mut h.modal, &[1, 1, 1]);
    let down = TransportError::Network("down".to_string());
    h.studio.respond(Ok(moved("unit_ID_1", Some(0))));
    h.studio.respond(Err(down.clone()));
    h.studio.respond(Ok(moved("unit_ID_0", None)));

    let alert = h.modal.confirm_move(None).await.unwrap();
    assert_eq!(
        h.modal.undo().await,
        Err(ModalError::Workflow(WorkflowError::Transport(down)))
    );
    assert_eq!(h.modal.phase(), MovePhase::Failed);
    assert_eq!(h.modal.alert(), Some(&alert));
    assert_eq!(h.modal.options().source_parent.id.as_str(), "unit_ID_1");

    h.modal.undo().await.unwrap();

    let sent = h.studio.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[1], sent[2]);
    assert_eq!(sent[2].target_parent.as_str(), "unit_ID_0");
    assert_eq!(h.modal.phase(), MovePhase::UndoSucceeded);
    assert_eq!(h.modal.options().source_parent.id.as_str(), "unit_ID_0");
}

#[tokio::test]
async fn loading_is_visible_until_payloads_arrive() {
    let mut h = harness(FakeStudio::default(), modal_options());

    h.modal.begin_open().unwrap();
    assert!(h.modal.is_loading());
    assert_eq!(h.modal.list_view(), Err(ModalError::NotLoaded));
    assert!(!h.modal.is_move_enabled());

    h.modal
        .finish_open(Ok((
            course_outline(OutlineShape::uniform(2)),
            source_ancestors(),
        )))
        .unwrap();
    assert!(!h.modal.is_loading());
    assert_eq!(h.modal.list_view().unwrap().category_text, "Sections:");
}

#[tokio::test]
async fn failed_load_clears_loading_and_reports() {
    let mut h = harness(FakeStudio::default(), modal_options());

    h.modal.begin_open().unwrap();
    let result = h
        .modal
        .finish_open(Err(TransportError::Network("down".to_string())));

    assert!(matches!(result, Err(ModalError::Transport(_))));
    assert!(!h.modal.is_loading());
    assert_eq!(
        h.notifier.notices(),
        vec![Notice::Error(SAVE_ERROR.to_string())]
    );
}

#[tokio::test]
async fn opens_from_locators_alone() {
    let studio = Arc::new(studio(OutlineShape::uniform(2)));
    let notifier = Arc::new(RecordingNotifier::default());

    let modal = MoveModal::open_for_source(
        Locator::new(COURSE_LOCATOR),
        Locator::new(SOURCE_LOCATOR),
        false,
        studio.clone(),
        notifier.clone(),
    )
    .await
    .unwrap();

    assert_eq!(modal.header().title, "Move: component_display_name_0");
    assert_eq!(modal.options().source_parent.id.as_str(), "unit_ID_0");
    assert_eq!(modal.list_view().unwrap().category_text, "Sections:");
    assert_eq!(studio.fetches.lock().unwrap().len(), 2);
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn opening_from_locators_reports_failures() {
    let notifier = Arc::new(RecordingNotifier::default());
    let result = MoveModal::open_for_source(
        Locator::new(COURSE_LOCATOR),
        Locator::new(SOURCE_LOCATOR),
        false,
        Arc::new(FakeStudio::default()),
        notifier.clone(),
    )
    .await;
    assert!(matches!(result, Err(ModalError::Transport(_))));
    assert_eq!(
        notifier.notices(),
        vec![Notice::Error(SAVE_ERROR.to_string())]
    );

    let orphan = FakeStudio::with_outline(
        course_outline(OutlineShape::uniform(1)),
        AncestorInfo::default(),
    );
    let result = MoveModal::open_for_source(
        Locator::new(COURSE_LOCATOR),
        Locator::new(SOURCE_LOCATOR),
        false,
        Arc::new(orphan),
        Arc::new(RecordingNotifier::default()),
    )
    .await;
    assert_eq!(
        result.map(|_| ()),
        Err(ModalError::Orphan {
            block: Locator::new(SOURCE_LOCATOR),
        })
    );
}

#[tokio::test]
async fn undo_still_works_after_cancel() {
    let mut h = opened(OutlineShape::uniform(2)).await;
    navigate(&mut h.modal, &[1, 1, 1]);
    h.studio.respond(Ok(moved("unit_ID_1", Some(0))));
    h.studio.respond(Ok(moved("unit_ID_0", None)));
    h.modal.confirm_move(None).await.unwrap();

    h.modal.cancel();
    assert!(h.modal.alert().is_some());
    h.modal.undo().await.unwrap();

    assert_eq!(h.studio.sent().len(), 2);
    assert_eq!(h.modal.phase(), MovePhase::UndoSucceeded);
    assert_eq!(h.modal.options().source_parent.id.as_str(), "unit_ID_0");
}
