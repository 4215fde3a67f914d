//! Navigation state: current folder, expanded sidebar folders, search query,
//! and the keyboard-selection substate.
//!
//! The struct is plain data; persistence happens through the preference store
//! as an explicit port (`encode_expanded` / `decode_expanded`, plus the raw
//! `current_folder` string), never as ambient access from inside the state.

use std::collections::HashSet;

use crate::bookmarks::{BookmarkStore, PATH_SEPARATOR};

/// Preference key holding the current folder path string.
pub const PREF_CURRENT_FOLDER: &str = "nav.current_folder";
/// Preference key holding the expanded-folder set as a JSON array.
pub const PREF_EXPANDED_FOLDERS: &str = "nav.expanded_folders";

/// One breadcrumb segment: display name plus the folder path it navigates to
/// (`None` for the Home segment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub name: String,
    pub target: Option<String>,
}

/// Folder/search/selection state for the browse view.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    /// Path string of the selected folder, `None` for home.
    pub current_folder: Option<String>,
    /// Folders whose children are visible in the sidebar tree.
    pub expanded_folders: HashSet<String>,
    /// Live search query; empty means no search.
    pub search_query: String,
    /// Keyboard selection index into the revealed card list.
    pub selected_card: usize,
}

impl NavigationState {
    /// Selects a folder (or home for `None`).
    ///
    /// One atomic transition: changing folder intrinsically resets the
    /// keyboard selection, so a stale index can never point into the
    /// previous folder's cards.
    pub fn set_folder(&mut self, folder: Option<String>) {
        self.current_folder = folder;
        self.selected_card = 0;
    }

    /// Replaces the search query, resetting the keyboard selection the same
    /// way a folder change does.
    pub fn set_search(&mut self, query: String) {
        self.search_query = query;
        self.selected_card = 0;
    }

    /// Toggles a folder's expanded state in the sidebar. Returns the new
    /// state so callers can persist it.
    pub fn toggle_expanded(&mut self, path_string: &str) -> bool {
        if self.expanded_folders.remove(path_string) {
            false
        } else {
            self.expanded_folders.insert(path_string.to_string());
            true
        }
    }

    pub fn is_expanded(&self, path_string: &str) -> bool {
        self.expanded_folders.contains(path_string)
    }

    /// Path string of the parent folder, or `None` when already at a root
    /// folder or at home.
    pub fn parent_folder(&self) -> Option<String> {
        let current = self.current_folder.as_deref()?;
        current
            .rsplit_once(PATH_SEPARATOR)
            .map(|(parent, _)| parent.to_string())
    }

    /// Breadcrumb for the current folder: Home first, then one crumb per
    /// ancestor, each carrying the path prefix it navigates back to.
    pub fn breadcrumb(&self) -> Vec<Crumb> {
        let mut crumbs = vec![Crumb {
            name: "Home".to_string(),
            target: None,
        }];

        if let Some(current) = &self.current_folder {
            let parts: Vec<&str> = current.split(PATH_SEPARATOR).collect();
            for i in 0..parts.len() {
                crumbs.push(Crumb {
                    name: parts[i].to_string(),
                    target: Some(parts[..=i].join(PATH_SEPARATOR)),
                });
            }
        }

        crumbs
    }

    /// Drops persisted references that no longer resolve after a re-parse.
    /// A dangling current folder degrades to home; dangling expanded entries
    /// are forgotten.
    pub fn reconcile(&mut self, store: &BookmarkStore) {
        if let Some(folder) = &self.current_folder {
            if !store.folder_exists(folder) {
                tracing::debug!(folder = %folder, "Persisted folder no longer exists, falling back to home");
                self.set_folder(None);
            }
        }
        self.expanded_folders.retain(|f| store.folder_exists(f));
    }
}

// ============================================================================
// Persistence codec
// ============================================================================

/// Encodes the expanded-folder set as a JSON array for the preference store.
pub fn encode_expanded(expanded: &HashSet<String>) -> String {
    let mut sorted: Vec<&String> = expanded.iter().collect();
    sorted.sort();
    serde_json::to_string(&sorted).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes a persisted expanded-folder value. Corrupt values fall back to an
/// empty (fully collapsed) set rather than failing startup.
pub fn decode_expanded(raw: Option<&str>) -> HashSet<String> {
    match raw {
        Some(json) => serde_json::from_str::<Vec<String>>(json)
            .map(|v| v.into_iter().collect())
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Corrupt expanded-folders preference, using defaults");
                HashSet::new()
            }),
        None => HashSet::new(),
    }
}
