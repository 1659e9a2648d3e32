//! Render-ready view models for the move dialog.
//!
//! Nothing here draws anything; a front end reads these structs after each
//! transition and renders them however it likes.

use std::collections::HashSet;

use xmove_model::{Category, Locator, XBlockInfo};

use crate::cursor::NavigationCursor;
use crate::tree::OutlineTree;

pub const ROOT_CRUMB_LABEL: &str = "Course Outline";
pub const FORWARD_LABEL: &str = "Click for children";
pub const CURRENT_LOCATION_LABEL: &str = "(Current location)";
pub const MODAL_SR_TITLE: &str = "Choose a location to move your component to";
pub const MOVE_ACTION_LABEL: &str = "Move";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalHeader {
    pub title: String,
    pub sr_title: String,
    pub move_label: String,
}

impl ModalHeader {
    pub fn for_source(source: &XBlockInfo) -> Self {
        Self {
            title: format!("Move: {}", source.display_name),
            sr_title: MODAL_SR_TITLE.to_string(),
            move_label: MOVE_ACTION_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Argument for `backward`
    pub index: usize,
    pub label: String,
    pub locator: Locator,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BreadcrumbView {
    pub crumbs: Vec<Breadcrumb>,
}

impl BreadcrumbView {
    pub fn build(tree: &OutlineTree, cursor: &NavigationCursor) -> Self {
        let crumbs = cursor
            .trail()
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let node = tree.node(*id);
                let label = if node.category == Category::Course {
                    ROOT_CRUMB_LABEL.to_string()
                } else {
                    node.display_name.clone()
                };
                Breadcrumb {
                    index,
                    label,
                    locator: node.locator.clone(),
                }
            })
            .collect();
        Self { crumbs }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.crumbs.iter().map(|crumb| crumb.label.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Argument for `forward`
    pub index: usize,
    pub display_name: String,
    pub locator: Locator,
    pub is_current_location: bool,
    /// Screen-reader text of the forward button, absent for components
    pub forward: Option<String>,
}

/// Children of the node under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    /// Heading such as `Units:`; empty under a component
    pub category_text: String,
    pub items: Vec<ListItem>,
    pub empty_message: Option<String>,
}

impl ListView {
    /// `current_location` holds the source block and every ancestor of it.
    pub fn build(
        tree: &OutlineTree,
        cursor: &NavigationCursor,
        current_location: &HashSet<Locator>,
    ) -> Self {
        let node = cursor.current_node(tree);
        let Some(child_category) = node.category.child() else {
            return Self {
                category_text: String::new(),
                items: Vec::new(),
                empty_message: None,
            };
        };

        let forward = (!child_category.is_leaf())
            .then(|| FORWARD_LABEL.to_string());
        let items: Vec<ListItem> = node
            .children
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let child = tree.node(*id);
                ListItem {
                    index,
                    display_name: child.display_name.clone(),
                    locator: child.locator.clone(),
                    is_current_location: current_location
                        .contains(&child.locator),
                    forward: forward.clone(),
                }
            })
            .collect();

        let empty_message = items.is_empty().then(|| {
            format!(
                "This {} has no {}",
                node.category.label(),
                child_category.plural_heading().to_lowercase()
            )
        });

        Self {
            category_text: format!("{}:", child_category.plural_heading()),
            items,
            empty_message,
        }
    }

    pub fn display_names(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|item| item.display_name.as_str())
            .collect()
    }

    pub fn current_location_index(&self) -> Option<usize> {
        self.items
            .iter()
            .find(|item| item.is_current_location)
            .map(|item| item.index)
    }
}
