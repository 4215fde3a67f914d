//! Card grid widget: favorites banner, folder cards, then bookmark cards.
//!
//! Only the revealed prefix of the visible set is rendered; the pagination
//! controller decides how much that is. Selection styling tracks the
//! keyboard index, which points into the card list, not the widget rows
//! (section headers are display-only rows).

use crate::app::{App, Focus};
use crate::filter::Card;
use crate::util::{truncate_to_width, FaviconStatus};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Cards;
    let border_style = if is_focused {
        app.palette.panel_border_focused
    } else {
        app.palette.panel_border
    };

    let set = app.pager.set();
    let title = panel_title(app);

    if set.is_empty() {
        let msg = if !app.nav.search_query.is_empty() {
            format!("No bookmarks match \"{}\"", app.nav.search_query)
        } else if app.store.is_empty() {
            "No bookmarks loaded".to_string()
        } else {
            "This folder is empty".to_string()
        };
        let empty = Paragraph::new(msg).style(app.palette.empty_view).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );
        f.render_widget(empty, area);
        return;
    }

    // Titles get whatever width remains after glyphs and the URL tail.
    let inner_width = area.width.saturating_sub(2) as usize;
    let revealed = app.pager.revealed_cards();
    let favorite_count = set.favorite_count;

    let mut rows: Vec<ListItem> = Vec::with_capacity(revealed.len() + 2);
    for (i, card) in revealed.iter().enumerate() {
        if favorite_count > 0 && i == 0 {
            rows.push(ListItem::new(Line::from(Span::styled(
                "★ Favorites",
                app.palette.favorites_header,
            ))));
        }
        if favorite_count > 0 && i == favorite_count {
            rows.push(ListItem::new(Line::raw("")));
        }
        rows.push(card_row(app, card, i, is_focused, inner_width));
    }

    if app.pager.has_more() {
        rows.push(ListItem::new(Line::from(Span::styled(
            format!(
                "… {} more (scroll to load)",
                set.len() - app.pager.displayed()
            ),
            app.palette.empty_view,
        ))));
    }

    let list = List::new(rows).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    f.render_widget(list, area);
}

fn panel_title(app: &App) -> String {
    let shown = app.pager.displayed();
    let total = app.pager.set().len();
    let place = match &app.nav.current_folder {
        Some(folder) => folder.as_str(),
        None => "Home",
    };
    if shown < total {
        format!("{} ({}/{})", place, shown, total)
    } else {
        format!("{} ({})", place, total)
    }
}

fn card_row(app: &App, card: &Card, index: usize, focused: bool, width: usize) -> ListItem<'static> {
    let selected = focused && index == app.nav.selected_card;

    match card {
        Card::Folder(folder) => {
            let count = app.store.bookmark_count_in(&folder.path_string);
            let style = if selected {
                app.palette.card_selected
            } else {
                app.palette.card_folder
            };
            let mut spans = vec![
                Span::styled("▸ ", app.palette.card_folder),
                Span::styled(
                    truncate_to_width(&folder.name, width.saturating_sub(8)).into_owned(),
                    style,
                ),
            ];
            if count > 0 {
                spans.push(Span::styled(
                    format!(" ({})", count),
                    app.palette.tree_count,
                ));
            }
            ListItem::new(Line::from(spans))
        }
        Card::Bookmark(bookmark) => {
            let favicon = match app.favicon_status.get(&bookmark.url) {
                Some(FaviconStatus::Available) => {
                    Span::styled("● ", app.palette.card_favicon_ok)
                }
                _ => Span::styled("○ ", app.palette.card_favicon_missing),
            };
            let star = if app.favorites.contains(&bookmark.url) {
                Span::styled("★ ", app.palette.card_favorite_star)
            } else {
                Span::raw("  ")
            };

            let title_style = if selected {
                app.palette.card_selected
            } else {
                app.palette.card_title
            };
            // Reserve roughly a third of the row for the URL tail.
            let title_width = (width.saturating_sub(6)) * 2 / 3;
            let url_width = width.saturating_sub(6 + title_width);

            let mut spans = vec![
                favicon,
                star,
                Span::styled(
                    truncate_to_width(&bookmark.title, title_width).into_owned(),
                    title_style,
                ),
            ];
            if url_width > 4 {
                spans.push(Span::styled(
                    format!("  {}", truncate_to_width(&bookmark.url, url_width)),
                    app.palette.card_url,
                ));
            }
            ListItem::new(Line::from(spans))
        }
    }
}
