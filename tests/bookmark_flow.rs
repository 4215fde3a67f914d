//! Integration tests for the browse flow: parse an export, navigate folders,
//! search, favorite, and page through results.
//!
//! These tests drive the same pipeline the app uses (parser into store into
//! filter into pagination) plus HTTP source loading against a mock server.

use std::collections::HashSet;

use marks::app::App;
use marks::bookmarks::{parser::parse_html, source, BookmarkStore, Source};
use marks::config::Config;
use marks::filter::{compute_visible, Card};
use marks::nav::NavigationState;
use marks::pagination::PaginationController;
use marks::storage::Database;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXPORT: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
    <DT><A HREF="https://news.ycombinator.com" ICON="data:image/png;base64,AAAA">Hacker News</A>
    <DT><H3 ADD_DATE="1700000000">Development</H3>
    <DL><p>
        <DT><A HREF="https://github.com">GitHub</A>
        <DT><A HREF="https://docs.rs">Docs.rs</A>
        <DT><H3>Rust</H3>
        <DL><p>
            <DT><A HREF="https://doc.rust-lang.org/book/">The Book</A>
        </DL>
    </DL>
    <DT><H3>Cooking</H3>
    <DL><p>
        <DT><A HREF="https://based.cooking">Based Cooking</A>
    </DL>
</DL>
"#;

fn store() -> BookmarkStore {
    BookmarkStore::from_tree(parse_html(EXPORT).unwrap())
}

fn nav(folder: Option<&str>, query: &str) -> NavigationState {
    NavigationState {
        current_folder: folder.map(String::from),
        search_query: query.to_string(),
        ..Default::default()
    }
}

fn labels(cards: &[Card]) -> Vec<String> {
    cards
        .iter()
        .map(|c| match c {
            Card::Folder(f) => format!("[{}]", f.name),
            Card::Bookmark(b) => b.title.clone(),
        })
        .collect()
}

// ============================================================================
// Parse and navigate
// ============================================================================

#[test]
fn test_export_parses_into_nested_folders() {
    let store = store();
    assert_eq!(store.folders().len(), 3);
    assert_eq!(store.bookmarks().len(), 5);

    let rust = store.folder_by_path("Development > Rust").unwrap();
    assert_eq!(rust.name, "Rust");
    assert_eq!(rust.path, vec!["Development", "Rust"]);
}

#[test]
fn test_home_then_drill_down_then_breadcrumb_back() {
    let store = store();
    let favorites = HashSet::new();

    // Home: root folders as cards, root bookmark after them.
    let home = compute_visible(&store, &nav(None, ""), &favorites);
    assert_eq!(
        labels(&home.cards),
        vec!["[Development]", "[Cooking]", "Hacker News"]
    );

    // Drill into Development: child folder plus direct bookmarks.
    let dev = compute_visible(&store, &nav(Some("Development"), ""), &favorites);
    assert_eq!(labels(&dev.cards), vec!["[Rust]", "GitHub", "Docs.rs"]);

    // Breadcrumb from the nested folder walks back through prefixes.
    let mut state = NavigationState::default();
    state.set_folder(Some("Development > Rust".to_string()));
    let crumbs = state.breadcrumb();
    let names: Vec<_> = crumbs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Home", "Development", "Rust"]);
    assert_eq!(crumbs[1].target.as_deref(), Some("Development"));
}

#[test]
fn test_search_from_home_spans_tree_but_folder_search_stays_scoped() {
    let store = store();
    let favorites = HashSet::new();

    let global = compute_visible(&store, &nav(None, "docs"), &favorites);
    assert_eq!(labels(&global.cards), vec!["Docs.rs"]);

    // The same query scoped to Cooking finds nothing: distinct empty view.
    let scoped = compute_visible(&store, &nav(Some("Cooking"), "docs"), &favorites);
    assert!(scoped.is_empty());
}

#[test]
fn test_favorites_banner_lists_across_folders_home_only() {
    let store = store();
    let mut favorites = HashSet::new();
    favorites.insert("https://doc.rust-lang.org/book/".to_string());
    favorites.insert("https://based.cooking".to_string());

    let home = compute_visible(&store, &nav(None, ""), &favorites);
    assert_eq!(home.favorite_count, 2);
    // Banner entries in store order, before the folder cards.
    assert_eq!(
        labels(&home.cards)[..2],
        ["The Book".to_string(), "Based Cooking".to_string()]
    );

    let in_folder = compute_visible(&store, &nav(Some("Cooking"), ""), &favorites);
    assert_eq!(in_folder.favorite_count, 0);
}

// ============================================================================
// Pagination over a large filtered set
// ============================================================================

#[test]
fn test_pagination_over_filtered_set() {
    let mut html = String::from("<DL><DT><H3>Big</H3><DL>");
    for i in 0..75 {
        html.push_str(&format!("<DT><A HREF=\"https://e.com/{i}\">Item {i}</A>"));
    }
    html.push_str("</DL></DL>");
    let store = BookmarkStore::from_tree(parse_html(&html).unwrap());

    let set = compute_visible(&store, &nav(Some("Big"), ""), &HashSet::new());
    assert_eq!(set.len(), 75);

    let mut pager = PaginationController::new(30);
    pager.reset(set);

    let mut batches = Vec::new();
    while let Some(range) = pager.begin_reveal() {
        batches.push(range.len());
        pager.finish_reveal();
    }
    assert_eq!(batches, vec![30, 30, 15]);
    assert_eq!(pager.revealed_cards().len(), 75);

    // A new search resets the cursor instead of appending.
    let filtered = compute_visible(&store, &nav(Some("Big"), "item 7"), &HashSet::new());
    pager.reset(filtered);
    assert_eq!(pager.displayed(), 0);
}

// ============================================================================
// End-to-end through App
// ============================================================================

#[tokio::test]
async fn test_app_session_restores_favorites_and_folder() {
    let db = Database::open(":memory:").await.unwrap();
    db.toggle_favorite("https://github.com").await.unwrap();
    db.set_preference("nav.current_folder", "Development")
        .await
        .unwrap();

    let mut app = App::new(db, &Config::default()).unwrap();
    app.restore_persisted().await.unwrap();
    app.install_store(store());

    assert_eq!(app.nav.current_folder.as_deref(), Some("Development"));
    app.pending_reveal = None;
    app.reveal_next_batch();
    assert_eq!(
        labels(app.pager.revealed_cards()),
        vec!["[Rust]", "GitHub", "Docs.rs"]
    );
    assert!(app.favorites.contains("https://github.com"));
}

// ============================================================================
// HTTP source loading
// ============================================================================

#[tokio::test]
async fn test_load_export_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bookmarks.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EXPORT))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let source = Source::from_spec(&format!("{}/bookmarks.html", server.uri()));
    let store = source::load(&client, &source).await.unwrap();

    assert_eq!(store.bookmarks().len(), 5);
    assert!(store.folder_exists("Development > Rust"));
}

#[tokio::test]
async fn test_http_error_status_is_reported_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bookmarks.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let source = Source::from_spec(&format!("{}/bookmarks.html", server.uri()));
    let err = source::load(&client, &source).await.unwrap_err();
    assert!(err.to_string().contains("404"));
}

// ============================================================================
// Parser robustness
// ============================================================================

proptest! {
    // Folder paths never exceed the structural depth of the markup: for any
    // nesting level within the cap, every folder's path length is at most
    // its nesting depth.
    #[test]
    fn prop_folder_path_depth_bounded(depth in 1usize..20) {
        let mut html = String::new();
        for i in 0..depth {
            html.push_str(&format!("<DL><DT><H3>F{i}</H3>"));
        }
        html.push_str("<DL><DT><A HREF=\"https://leaf.example.com\">Leaf</A>");
        for _ in 0..=depth {
            html.push_str("</DL>");
        }

        let store = BookmarkStore::from_tree(parse_html(&html).unwrap());
        for folder in store.folders() {
            prop_assert!(folder.path.len() <= depth);
        }
        prop_assert_eq!(store.bookmarks().len(), 1);
    }

    // Arbitrary text content never panics the parser; entries without an
    // href or title are dropped, never mangled.
    #[test]
    fn prop_parser_never_panics_on_text(title in "\\PC{0,40}") {
        let html = format!(
            "<DL><DT><A HREF=\"https://x.example.com\">{}</A></DL>",
            title.replace('&', "&amp;").replace('<', "&lt;")
        );
        let _ = parse_html(&html);
    }
}
