//! Plain-text rendering of the dialog view models.

use std::fmt::Write;

use xmove_core::OutlineTree;
use xmove_core::views::{BreadcrumbView, CURRENT_LOCATION_LABEL, ListView};
use xmove_core::workflow::MovedAlert;

pub fn outline(tree: &OutlineTree) -> String {
    let mut out = String::new();
    for (_, node) in tree.iter() {
        let indent = "  ".repeat(node.category.depth());
        let _ = writeln!(
            out,
            "{indent}{} [{}] {}",
            node.display_name, node.block_type, node.locator
        );
    }
    out
}

pub fn breadcrumbs(view: &BreadcrumbView) -> String {
    if view.crumbs.is_empty() {
        return String::new();
    }
    let trail = view
        .crumbs
        .iter()
        .map(|crumb| format!("[{}] {}", crumb.index, crumb.label))
        .collect::<Vec<_>>()
        .join(" > ");
    format!("{trail}\n")
}

pub fn list(view: &ListView) -> String {
    let mut out = String::new();
    if !view.category_text.is_empty() {
        let _ = writeln!(out, "{}", view.category_text);
    }
    for item in &view.items {
        let marker = if item.is_current_location {
            format!(" {CURRENT_LOCATION_LABEL}")
        } else {
            String::new()
        };
        let forward = if item.forward.is_some() { " >" } else { "" };
        let _ = writeln!(
            out,
            "  {}. {} ({}){marker}{forward}",
            item.index, item.display_name, item.locator
        );
    }
    if let Some(message) = &view.empty_message {
        let _ = writeln!(out, "  {message}");
    }
    out
}

pub fn alert(alert: &MovedAlert) -> String {
    let mut out = format!("{}\n", alert.title);
    if let Some(link) = &alert.link {
        let _ = writeln!(out, "  {}: {}", link.label, link.href);
    }
    if let Some(undo) = &alert.undo {
        let _ = writeln!(
            out,
            "  {}: xmovectl undo --source {} --parent {} --index {}",
            undo.label,
            undo.source_locator,
            undo.parent_locator,
            undo.target_index
        );
    }
    out
}
