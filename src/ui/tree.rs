//! Folder tree sidebar widget.

use crate::app::{App, Focus};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the folder tree panel.
///
/// Home is the first row; folders indent by depth, expanded folders show
/// their children, and each row carries its direct bookmark count.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Tree;
    let items = app.visible_tree();

    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let indent = "  ".repeat(item.depth);
            let marker = if item.path.is_none() {
                "  "
            } else if !item.has_children {
                "  "
            } else if item.is_expanded {
                "▾ "
            } else {
                "▸ "
            };

            let is_current = item.path == app.nav.current_folder;
            let name_style = if is_focused && i == app.selected_tree_item {
                app.palette.tree_selected
            } else if is_current {
                app.palette.crumb_current
            } else {
                app.palette.tree_normal
            };

            let mut spans = vec![
                Span::raw(indent),
                Span::styled(marker, app.palette.tree_expanded_marker),
                Span::styled(item.name.clone(), name_style),
            ];
            if item.bookmark_count > 0 {
                spans.push(Span::styled(
                    format!(" ({})", item.bookmark_count),
                    app.palette.tree_count,
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let border_style = if is_focused {
        app.palette.panel_border_focused
    } else {
        app.palette.panel_border
    };

    let folder_count = items.len().saturating_sub(1); // Home is not a folder
    let list = List::new(list_items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!("Folders ({})", folder_count)),
    );

    f.render_widget(list, area);
}
