use crate::bookmarks::{BookmarkStore, Folder};
use crate::config::Config;
use crate::filter::{compute_visible, Card};
use crate::nav::{self, NavigationState};
use crate::pagination::PaginationController;
use crate::storage::Database;
use crate::theme::{ColorPalette, ThemeVariant};
use crate::util::FaviconStatus;
use anyhow::Result;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::time::Instant;

/// Delay between a state transition and the first revealed batch. Collapses
/// bursts of transitions (held-down keys, fast typing) into one reveal.
pub const REVEAL_DELAY: Duration = Duration::from_millis(120);

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Create a custom redirect policy with loop detection and limited hops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }
        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }
        attempt.follow()
    })
}

// ============================================================================
// Focus
// ============================================================================

/// Which panel has keyboard focus in the browse view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Cards,
}

// ============================================================================
// Sidebar Tree
// ============================================================================

/// A single row of the flattened sidebar tree for rendering and navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    /// Full path string, or None for the "Home" row.
    pub path: Option<String>,
    /// Display name.
    pub name: String,
    /// Nesting depth (0 = Home, 1 = root folders).
    pub depth: usize,
    /// Number of bookmarks filed directly in this folder.
    pub bookmark_count: usize,
    /// Whether this folder has child folders.
    pub has_children: bool,
    /// Whether this folder is expanded (children visible).
    pub is_expanded: bool,
}

// ============================================================================
// Events
// ============================================================================

/// Events from background tasks, delivered through the event channel and
/// applied on the main loop.
pub enum AppEvent {
    /// Favorite toggle confirmed by the database.
    FavoriteToggled { url: String, favorited: bool },
    /// Favorite toggle failed; the optimistic in-memory state must revert.
    FavoriteToggleFailed { url: String, error: String },
    /// Favicon availability probe finished for a bookmark URL.
    FaviconChecked {
        url: String,
        status: FaviconStatus,
    },
    /// A persisted preference write failed. Non-fatal, reported once.
    PreferenceWriteFailed { key: String, error: String },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
///
/// The bookmark store is immutable after load; everything the user sees is
/// derived from (store, nav, favorites) through the filter engine and the
/// pagination controller. Transitions call `refresh_visible` to recompute.
pub struct App {
    pub db: Database,
    pub http_client: reqwest::Client,

    // Theme
    pub theme_variant: ThemeVariant,
    pub palette: ColorPalette,

    // Data
    pub store: BookmarkStore,
    pub favorites: HashSet<String>,

    // Navigation / derived view
    pub nav: NavigationState,
    pub pager: PaginationController,

    // UI state
    pub focus: Focus,
    /// Selection index into the flattened sidebar tree.
    pub selected_tree_item: usize,
    /// Whether keystrokes currently edit the search query.
    pub search_mode: bool,
    pub should_quit: bool,

    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,

    // Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Deferred first-batch reveal: (due time, pager generation). The tick
    /// handler services it; a newer transition overwrites it, so only the
    /// latest state ever reveals (last write wins).
    pub pending_reveal: Option<(Instant, u64)>,

    // Favicons
    pub favicon_probes: bool,
    /// Probe results keyed by bookmark URL. Absent = not yet probed.
    pub favicon_status: HashMap<String, FaviconStatus>,
}

impl App {
    pub fn new(db: Database, config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(30))
            .build()?;

        let theme_variant =
            ThemeVariant::from_str_name(&config.theme).unwrap_or(ThemeVariant::Dark);

        Ok(Self {
            db,
            http_client,
            theme_variant,
            palette: theme_variant.palette(),
            store: BookmarkStore::default(),
            favorites: HashSet::new(),
            nav: NavigationState::default(),
            pager: PaginationController::new(config.batch_size),
            focus: Focus::Cards,
            selected_tree_item: 0,
            search_mode: false,
            should_quit: false,
            needs_redraw: true,
            status_message: None,
            pending_reveal: None,
            favicon_probes: config.favicon_probes,
            favicon_status: HashMap::new(),
        })
    }

    // ========================================================================
    // Startup
    // ========================================================================

    /// Installs a freshly parsed bookmark store, dropping persisted navigation
    /// references that no longer resolve, then recomputes the view.
    pub fn install_store(&mut self, store: BookmarkStore) {
        self.store = store;
        self.nav.reconcile(&self.store);
        self.refresh_visible();
    }

    /// Restores persisted state: theme, favorites, current folder, and the
    /// expanded-folder set. Corrupt values degrade to defaults; only a
    /// database failure propagates.
    pub async fn restore_persisted(&mut self) -> Result<()> {
        self.favorites = self.db.get_favorites().await?;

        if let Some(raw) = self.db.get_preference("theme").await? {
            match ThemeVariant::from_str_name(&raw) {
                Some(variant) => self.set_theme(variant),
                None => {
                    tracing::warn!(value = %raw, "Unknown persisted theme, keeping current");
                }
            }
        }

        if let Some(folder) = self.db.get_preference(nav::PREF_CURRENT_FOLDER).await? {
            self.nav.set_folder(Some(folder));
        }
        let raw = self.db.get_preference(nav::PREF_EXPANDED_FOLDERS).await?;
        self.nav.expanded_folders = nav::decode_expanded(raw.as_deref());

        Ok(())
    }

    // ========================================================================
    // View transitions
    // ========================================================================

    /// Recomputes the visible set and schedules the deferred first reveal.
    ///
    /// Every transition funnels through here, so the pager cursor and the
    /// keyboard selection can never survive a state they no longer index.
    pub fn refresh_visible(&mut self) {
        let set = compute_visible(&self.store, &self.nav, &self.favorites);
        let generation = self.pager.reset(set);
        self.pending_reveal = Some((Instant::now() + REVEAL_DELAY, generation));
        self.clamp_selections();
        self.needs_redraw = true;
    }

    /// Navigates to a folder (or home for `None`).
    pub fn select_folder(&mut self, folder: Option<String>) {
        self.nav.set_folder(folder);
        self.refresh_visible();
    }

    /// Replaces the live search query.
    pub fn set_search(&mut self, query: String) {
        self.nav.set_search(query);
        self.refresh_visible();
    }

    /// Toggles a sidebar folder's expanded state. Returns the new state for
    /// persistence.
    pub fn toggle_expanded(&mut self, path: &str) -> bool {
        let expanded = self.nav.toggle_expanded(path);
        self.needs_redraw = true;
        expanded
    }

    /// Flips a favorite in memory. The caller persists it in the background;
    /// a write failure reverts through `AppEvent::FavoriteToggleFailed`.
    pub fn toggle_favorite_local(&mut self, url: &str) -> bool {
        let favorited = if self.favorites.remove(url) {
            false
        } else {
            self.favorites.insert(url.to_string());
            true
        };
        self.refresh_visible();
        favorited
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Services the deferred reveal if due. Stale generations (a newer
    /// transition replaced the set) are dropped silently.
    pub fn service_pending_reveal(&mut self) {
        let Some((due, generation)) = self.pending_reveal else {
            return;
        };
        if Instant::now() < due {
            return;
        }
        self.pending_reveal = None;
        if generation != self.pager.generation() {
            tracing::trace!(generation, "Discarding stale deferred reveal");
            return;
        }
        self.reveal_next_batch();
    }

    /// Reveals the next batch synchronously. Rendering is part of the same
    /// frame, so begin/finish bracket without an await between them.
    pub fn reveal_next_batch(&mut self) {
        if let Some(range) = self.pager.begin_reveal() {
            tracing::debug!(start = range.start, end = range.end, "Revealing cards");
            self.pager.finish_reveal();
            self.needs_redraw = true;
        }
    }

    /// Whether the keyboard selection is close enough to the end of the
    /// revealed cards that the next batch should load.
    pub fn selection_near_end(&self) -> bool {
        let displayed = self.pager.displayed();
        displayed > 0 && self.nav.selected_card + 5 >= displayed && self.pager.has_more()
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Clamp selection indices to valid ranges. Call after any operation
    /// that shrinks the card list or the sidebar tree.
    pub fn clamp_selections(&mut self) {
        let displayed = self.pager.displayed();
        self.nav.selected_card = if displayed == 0 {
            0
        } else {
            self.nav.selected_card.min(displayed - 1)
        };
        let tree_len = self.visible_tree().len();
        self.selected_tree_item = if tree_len == 0 {
            0
        } else {
            self.selected_tree_item.min(tree_len - 1)
        };
    }

    /// Currently selected card (bounds-checked).
    pub fn selected_card(&self) -> Option<&Card> {
        self.pager.revealed_cards().get(self.nav.selected_card)
    }

    // ========================================================================
    // Sidebar tree
    // ========================================================================

    /// Builds the flattened sidebar tree: Home first, then root folders in
    /// store order, descending into expanded folders.
    pub fn visible_tree(&self) -> Vec<TreeItem> {
        let mut items = vec![TreeItem {
            path: None,
            name: "Home".to_string(),
            depth: 0,
            bookmark_count: self.store.root_bookmark_count(),
            has_children: self.store.root_folders().next().is_some(),
            is_expanded: true,
        }];
        for folder in self.store.root_folders() {
            self.add_tree_item(&mut items, folder, 1);
        }
        items
    }

    fn add_tree_item(&self, items: &mut Vec<TreeItem>, folder: &Folder, depth: usize) {
        let children: Vec<&Folder> = self.store.children_of(folder).collect();
        let has_children = !children.is_empty();
        let is_expanded = self.nav.is_expanded(&folder.path_string);

        items.push(TreeItem {
            path: Some(folder.path_string.clone()),
            name: folder.name.clone(),
            depth,
            bookmark_count: self.store.bookmark_count_in(&folder.path_string),
            has_children,
            is_expanded,
        });

        if is_expanded {
            for child in children {
                self.add_tree_item(items, child, depth + 1);
            }
        }
    }

    // ========================================================================
    // Theme
    // ========================================================================

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.palette = variant.palette();
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant (Dark → Light → Dark).
    /// Returns the name of the new theme for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Set a status message with current timestamp
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Tests
// ============================================================================
