//! Filter engine: composes folder scope, search query, and favorites into
//! the visible result set.
//!
//! `compute_visible` is a pure function over (store, nav, favorites): same
//! inputs, same ordered output. The precedence rules are load-bearing and
//! pinned by tests:
//!
//! 1. A selected folder restricts bookmarks to an exact path-string match.
//! 2. Home without a search shows only root-level bookmarks.
//! 3. A search with no folder selected spans the whole tree.
//! 4. The query filters by case-insensitive substring on title or url,
//!    after the folder restriction.
//! 5. The favorites banner appears only on home without a search, listing
//!    every favorited bookmark across folders, de-duplicated by url.
//! 6. Folder cards precede bookmarks: children of the selected folder, or
//!    root folders on home without search, or none while searching at home.

use std::collections::HashSet;

use crate::bookmarks::{Bookmark, BookmarkStore, Folder, ROOT_FOLDER};
use crate::nav::NavigationState;

/// One entry of the visible result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Card {
    Folder(Folder),
    Bookmark(Bookmark),
}

impl Card {
    /// Bookmark URL if this card is a bookmark.
    pub fn url(&self) -> Option<&str> {
        match self {
            Card::Bookmark(b) => Some(&b.url),
            Card::Folder(_) => None,
        }
    }
}

/// The ordered visible result set: favorites banner first (`favorite_count`
/// entries), then folder cards, then filtered bookmarks in store order.
///
/// Derived state — recomputed on every transition, never persisted. An empty
/// set is the distinct "empty view" the UI renders instead of cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleSet {
    pub cards: Vec<Card>,
    pub favorite_count: usize,
}

impl VisibleSet {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }
}

/// Computes the visible result set for the current navigation state.
pub fn compute_visible(
    store: &BookmarkStore,
    nav: &NavigationState,
    favorites: &HashSet<String>,
) -> VisibleSet {
    let searching = !nav.search_query.is_empty();
    let query = nav.search_query.to_lowercase();

    let mut cards: Vec<Card> = Vec::new();

    // Favorites banner: home view only, no active search.
    let favorite_count = if nav.current_folder.is_none() && !searching {
        let mut seen: HashSet<&str> = HashSet::new();
        for bookmark in store.bookmarks() {
            if favorites.contains(&bookmark.url) && seen.insert(&bookmark.url) {
                cards.push(Card::Bookmark(bookmark.clone()));
            }
        }
        cards.len()
    } else {
        0
    };

    // Folder cards. First matching arm wins: a selected folder shows its
    // children even while a search is active inside it.
    if let Some(current) = &nav.current_folder {
        if let Some(parent) = store.folder_by_path(current) {
            for child in store.children_of(parent) {
                cards.push(Card::Folder(child.clone()));
            }
        }
    } else if !searching {
        for folder in store.root_folders() {
            cards.push(Card::Folder(folder.clone()));
        }
    }

    // Bookmarks: folder restriction, then query, in store insertion order.
    for bookmark in store.bookmarks() {
        let in_scope = match &nav.current_folder {
            Some(current) => bookmark.folder == *current,
            None if !searching => bookmark.folder == ROOT_FOLDER,
            None => true,
        };
        if !in_scope {
            continue;
        }
        if searching && !matches_query(bookmark, &query) {
            continue;
        }
        cards.push(Card::Bookmark(bookmark.clone()));
    }

    VisibleSet {
        cards,
        favorite_count,
    }
}

fn matches_query(bookmark: &Bookmark, lowercase_query: &str) -> bool {
    bookmark.title.to_lowercase().contains(lowercase_query)
        || bookmark.url.to_lowercase().contains(lowercase_query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmarks::parser::parse_html;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<DL><p>
    <DT><A HREF="https://root.example.com">Root Link</A>
    <DT><H3>Dev</H3>
    <DL><p>
        <DT><A HREF="https://github.com">GitHub</A>
        <DT><H3>Tools</H3>
        <DL><p>
            <DT><A HREF="https://tool.example.com">Tool</A>
        </DL>
    </DL>
    <DT><H3>News</H3>
    <DL><p>
        <DT><A HREF="https://news.example.com">Daily News</A>
    </DL>
</DL>"#;

    fn sample_store() -> BookmarkStore {
        BookmarkStore::from_tree(parse_html(SAMPLE).unwrap())
    }

    fn nav(folder: Option<&str>, query: &str) -> NavigationState {
        NavigationState {
            current_folder: folder.map(String::from),
            search_query: query.to_string(),
            ..Default::default()
        }
    }

    fn titles(set: &VisibleSet) -> Vec<String> {
        set.cards
            .iter()
            .map(|c| match c {
                Card::Folder(f) => format!("[{}]", f.name),
                Card::Bookmark(b) => b.title.clone(),
            })
            .collect()
    }

    #[test]
    fn test_home_shows_root_folders_and_unfiled_bookmarks() {
        let store = sample_store();
        let set = compute_visible(&store, &nav(None, ""), &HashSet::new());
        assert_eq!(titles(&set), vec!["[Dev]", "[News]", "Root Link"]);
    }

    #[test]
    fn test_selected_folder_shows_children_and_exact_matches_only() {
        let store = sample_store();
        let set = compute_visible(&store, &nav(Some("Dev"), ""), &HashSet::new());
        // Child folder card plus the one bookmark directly in Dev; the
        // bookmark nested in Dev > Tools is not an exact match.
        assert_eq!(titles(&set), vec!["[Tools]", "GitHub"]);
    }

    #[test]
    fn test_search_spans_whole_tree_when_no_folder_selected() {
        let store = sample_store();
        let set = compute_visible(&store, &nav(None, "git"), &HashSet::new());
        // Case-insensitive substring, no folder cards during home search.
        assert_eq!(titles(&set), vec!["GitHub"]);
    }

    #[test]
    fn test_search_inside_folder_stays_scoped() {
        let store = sample_store();
        let set = compute_visible(&store, &nav(Some("News"), "example"), &HashSet::new());
        assert_eq!(titles(&set), vec!["Daily News"]);

        // The same query inside Dev does not see News bookmarks.
        let set = compute_visible(&store, &nav(Some("Dev"), "news"), &HashSet::new());
        assert_eq!(titles(&set), vec!["[Tools]"]);
    }

    #[test]
    fn test_search_matches_url_substring() {
        let store = sample_store();
        let set = compute_visible(&store, &nav(None, "tool.example"), &HashSet::new());
        assert_eq!(titles(&set), vec!["Tool"]);
    }

    #[test]
    fn test_favorites_banner_home_only() {
        let store = sample_store();
        let mut favorites = HashSet::new();
        favorites.insert("https://tool.example.com".to_string());

        let home = compute_visible(&store, &nav(None, ""), &favorites);
        assert_eq!(home.favorite_count, 1);
        assert_eq!(
            titles(&home),
            vec!["Tool", "[Dev]", "[News]", "Root Link"],
            "favorites come before folder cards and bookmarks"
        );

        // No banner inside a folder or while searching.
        let in_folder = compute_visible(&store, &nav(Some("Dev"), ""), &favorites);
        assert_eq!(in_folder.favorite_count, 0);
        let searching = compute_visible(&store, &nav(None, "tool"), &favorites);
        assert_eq!(searching.favorite_count, 0);
    }

    #[test]
    fn test_favorites_deduplicated_by_url() {
        let html = r#"<DL>
    <DT><A HREF="https://dup.example.com">First Copy</A>
    <DT><A HREF="https://dup.example.com">Second Copy</A>
</DL>"#;
        let store = BookmarkStore::from_tree(parse_html(html).unwrap());
        let mut favorites = HashSet::new();
        favorites.insert("https://dup.example.com".to_string());

        let set = compute_visible(&store, &nav(None, ""), &favorites);
        assert_eq!(set.favorite_count, 1);
        assert_eq!(set.cards[0].url(), Some("https://dup.example.com"));
    }

    #[test]
    fn test_compute_visible_is_idempotent() {
        let store = sample_store();
        let mut favorites = HashSet::new();
        favorites.insert("https://github.com".to_string());
        let state = nav(None, "");

        let first = compute_visible(&store, &state, &favorites);
        let second = compute_visible(&store, &state, &favorites);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_view_is_observable() {
        let store = sample_store();
        let set = compute_visible(&store, &nav(None, "zzz-no-match"), &HashSet::new());
        assert!(set.is_empty());

        let empty_store = BookmarkStore::default();
        let set = compute_visible(&empty_store, &nav(None, ""), &HashSet::new());
        assert!(set.is_empty());
    }
}
