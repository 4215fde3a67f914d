//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on the focused panel and search mode. Handlers mutate app
//! state synchronously and spawn background tasks for persistence; nothing
//! here blocks on the database or the network.

use crate::app::{App, AppEvent, Focus};
use crate::filter::Card;
use crate::nav::{self, encode_expanded};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;
use url::Url;

use super::loop_runner::spawn_favicon_probes;
use super::Action;

/// Maximum allowed search query length (UI layer validation)
const MAX_SEARCH_LENGTH: usize = 256;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if app.search_mode {
        return Ok(handle_search_input(app, code));
    }
    handle_browse_input(app, code, modifiers, event_tx)
}

// ============================================================================
// Search mode
// ============================================================================

/// Handle input while the search bar is active. Every edit recomputes the
/// visible set immediately; the deferred reveal collapses rapid keystrokes
/// into one batch.
fn handle_search_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        // Esc abandons the search entirely.
        KeyCode::Esc => {
            app.search_mode = false;
            if !app.nav.search_query.is_empty() {
                app.set_search(String::new());
            }
        }
        // Enter keeps the query active and returns focus to the cards.
        KeyCode::Enter => {
            app.search_mode = false;
            app.focus = Focus::Cards;
        }
        KeyCode::Backspace => {
            let mut query = app.nav.search_query.clone();
            query.pop();
            app.set_search(query);
        }
        KeyCode::Char(c) => {
            if app.nav.search_query.len() >= MAX_SEARCH_LENGTH {
                app.set_status(format!("Search query too long (max {} chars)", MAX_SEARCH_LENGTH));
            } else {
                let mut query = app.nav.search_query.clone();
                query.push(c);
                app.set_search(query);
            }
        }
        _ => {}
    }
    Action::Continue
}

// ============================================================================
// Browse mode
// ============================================================================

fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Ctrl+C quits from anywhere.
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),

        KeyCode::Char('/') => {
            app.search_mode = true;
            app.focus = Focus::Cards;
        }

        KeyCode::Esc => {
            // Priority: clear an active search, then step back up the tree.
            if !app.nav.search_query.is_empty() {
                app.set_search(String::new());
            } else if app.nav.current_folder.is_some() {
                navigate_to(app, app.nav.parent_folder(), event_tx);
            }
        }

        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Tree => Focus::Cards,
                Focus::Cards => Focus::Tree,
            };
        }

        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            Focus::Tree => {
                let len = app.visible_tree().len();
                if len > 0 {
                    app.selected_tree_item = (app.selected_tree_item + 1).min(len - 1);
                }
            }
            Focus::Cards => {
                let displayed = app.pager.displayed();
                if displayed > 0 {
                    app.nav.selected_card = (app.nav.selected_card + 1).min(displayed - 1);
                }
                // Approaching the end of the revealed cards loads the next
                // batch without waiting for the tick.
                if app.selection_near_end() {
                    app.reveal_next_batch();
                    spawn_favicon_probes(app, event_tx);
                }
            }
        },

        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            Focus::Tree => {
                app.selected_tree_item = app.selected_tree_item.saturating_sub(1);
            }
            Focus::Cards => {
                app.nav.selected_card = app.nav.selected_card.saturating_sub(1);
            }
        },

        KeyCode::Char('h') | KeyCode::Left => match app.focus {
            Focus::Tree => {
                // Collapse the selected folder if it is expanded.
                if let Some(item) = app.visible_tree().get(app.selected_tree_item).cloned() {
                    if let Some(path) = item.path {
                        if item.is_expanded {
                            toggle_expanded(app, &path, event_tx);
                        }
                    }
                }
            }
            Focus::Cards => {
                navigate_to(app, app.nav.parent_folder(), event_tx);
            }
        },

        KeyCode::Char('l') | KeyCode::Right => {
            if app.focus == Focus::Tree {
                if let Some(item) = app.visible_tree().get(app.selected_tree_item).cloned() {
                    if let Some(path) = item.path {
                        if item.has_children && !item.is_expanded {
                            toggle_expanded(app, &path, event_tx);
                        }
                    }
                }
            }
        }

        KeyCode::Enter => match app.focus {
            Focus::Tree => {
                if let Some(item) = app.visible_tree().get(app.selected_tree_item).cloned() {
                    navigate_to(app, item.path, event_tx);
                    app.focus = Focus::Cards;
                }
            }
            Focus::Cards => match app.selected_card().cloned() {
                Some(Card::Folder(folder)) => {
                    navigate_to(app, Some(folder.path_string), event_tx);
                }
                Some(Card::Bookmark(bookmark)) => {
                    open_in_browser(app, &bookmark.url);
                }
                None => {}
            },
        },

        KeyCode::Char('f') => {
            if let Some(Card::Bookmark(bookmark)) = app.selected_card().cloned() {
                toggle_favorite(app, bookmark.url, event_tx);
            }
        }

        KeyCode::Char('t') => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
            let value = app.theme_variant.pref_value().to_string();
            persist_preference(app, event_tx, "theme", Some(value));
        }

        _ => {}
    }

    Ok(Action::Continue)
}

// ============================================================================
// Shared transitions
// ============================================================================

/// Navigate to a folder (or home) and persist the new location.
fn navigate_to(app: &mut App, folder: Option<String>, event_tx: &mpsc::Sender<AppEvent>) {
    app.select_folder(folder.clone());
    persist_preference(app, event_tx, nav::PREF_CURRENT_FOLDER, folder);
}

/// Toggle a sidebar folder and persist the expanded set.
fn toggle_expanded(app: &mut App, path: &str, event_tx: &mpsc::Sender<AppEvent>) {
    app.toggle_expanded(path);
    app.clamp_selections();
    let encoded = encode_expanded(&app.nav.expanded_folders);
    persist_preference(app, event_tx, nav::PREF_EXPANDED_FOLDERS, Some(encoded));
}

/// Flip a favorite optimistically, then confirm it against the database in
/// the background. A failed write reverts through the event channel.
fn toggle_favorite(app: &mut App, url: String, event_tx: &mpsc::Sender<AppEvent>) {
    let favorited = app.toggle_favorite_local(&url);
    app.set_status(if favorited {
        "Added to favorites"
    } else {
        "Removed from favorites"
    });

    let db = app.db.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let event = match db.toggle_favorite(&url).await {
            Ok(favorited) => AppEvent::FavoriteToggled { url, favorited },
            Err(e) => AppEvent::FavoriteToggleFailed {
                url,
                error: e.to_string(),
            },
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send favorite result (receiver dropped)");
        }
    });
}

/// Persist a preference in the background. `None` clears the key (the value
/// reverted to its default). Failures surface once through the event channel.
fn persist_preference(
    app: &App,
    event_tx: &mpsc::Sender<AppEvent>,
    key: &'static str,
    value: Option<String>,
) {
    let db = app.db.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = match &value {
            Some(v) => db.set_preference(key, v).await,
            None => db.clear_preference(key).await,
        };
        if let Err(e) = result {
            let event = AppEvent::PreferenceWriteFailed {
                key: key.to_string(),
                error: e.to_string(),
            };
            if tx.send(event).await.is_err() {
                tracing::warn!(key, "Failed to report preference write error");
            }
        }
    });
}

/// Open a bookmark in the default browser. Only http(s) URLs are passed to
/// the system opener; anything else from the export is refused.
fn open_in_browser(app: &mut App, url: &str) {
    if let Err(reason) = validate_open_url(url) {
        app.set_status(reason);
        return;
    }
    if let Err(e) = open::that(url) {
        app.set_status(format!("Failed to open browser: {}", e));
    } else {
        app.set_status("Opening in browser...");
    }
}

/// Validate a URL before handing it to `open::that`.
fn validate_open_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(format!("Refusing to open {} URL", parsed.scheme())),
        Err(_) => Err("Bookmark URL is not valid".to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================
