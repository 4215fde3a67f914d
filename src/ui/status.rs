//! Header (breadcrumb / search bar) and status bar widgets.

use crate::app::App;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the one-line header: the search bar while editing, otherwise the
/// breadcrumb for the current folder.
pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.search_mode || !app.nav.search_query.is_empty() {
        let cursor = if app.search_mode { "_" } else { "" };
        Line::from(vec![
            Span::styled("Search: ", app.palette.search_active),
            Span::raw(format!("{}{}", app.nav.search_query, cursor)),
        ])
    } else {
        let crumbs = app.nav.breadcrumb();
        let last = crumbs.len() - 1;
        let mut spans = Vec::with_capacity(crumbs.len() * 2);
        for (i, crumb) in crumbs.iter().enumerate() {
            let style = if i == last {
                app.palette.crumb_current
            } else {
                app.palette.crumb_segment
            };
            spans.push(Span::styled(crumb.name.clone(), style));
            if i < last {
                spans.push(Span::styled(" › ", app.palette.crumb_separator));
            }
        }
        Line::from(spans)
    };

    f.render_widget(Paragraph::new(line), area);
}

/// Render the status bar: an active status message, or the key hints.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let text = match &app.status_message {
        Some((msg, _)) => msg.to_string(),
        None => {
            "q quit  / search  Enter open  f favorite  t theme  Tab focus  Esc back".to_string()
        }
    };

    let bar = Paragraph::new(Line::from(Span::raw(text))).style(app.palette.status_bar);
    f.render_widget(bar, area);
}
