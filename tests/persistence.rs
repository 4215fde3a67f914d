//! Integration tests for persisted state: favorites and preferences survive
//! a simulated restart, and corrupt values degrade to defaults.
//!
//! Each test creates its own in-memory SQLite database for isolation.

use marks::app::App;
use marks::bookmarks::{parser::parse_html, BookmarkStore};
use marks::config::Config;
use marks::nav::{decode_expanded, encode_expanded, PREF_CURRENT_FOLDER, PREF_EXPANDED_FOLDERS};
use marks::storage::Database;
use std::collections::HashSet;

async fn test_db() -> Database {
    Database::open(":memory:").await.unwrap()
}

fn sample_store() -> BookmarkStore {
    let html = r#"<DL>
        <DT><H3>Dev</H3>
        <DL>
            <DT><A HREF="https://github.com">GitHub</A>
            <DT><H3>Tools</H3>
            <DL><DT><A HREF="https://tool.example.com">Tool</A></DL>
        </DL>
    </DL>"#;
    BookmarkStore::from_tree(parse_html(html).unwrap())
}

// ============================================================================
// Favorites
// ============================================================================

#[tokio::test]
async fn test_favorites_survive_reconnect() {
    let db = test_db().await;
    db.toggle_favorite("https://github.com").await.unwrap();
    db.toggle_favorite("https://docs.rs").await.unwrap();
    db.toggle_favorite("https://docs.rs").await.unwrap(); // toggled off

    // Same pool, fresh read: only the still-on favorite remains.
    let favorites = db.get_favorites().await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert!(favorites.contains("https://github.com"));
}

#[tokio::test]
async fn test_favorite_identity_is_url_not_title() {
    let db = test_db().await;
    db.toggle_favorite("https://dup.example.com").await.unwrap();

    // Toggling through a second bookmark with the same URL flips the shared
    // state off rather than tracking a second row.
    let now_favorited = db.toggle_favorite("https://dup.example.com").await.unwrap();
    assert!(!now_favorited);
    assert!(db.get_favorites().await.unwrap().is_empty());
}

// ============================================================================
// Navigation preferences
// ============================================================================

#[tokio::test]
async fn test_navigation_round_trips_through_preferences() {
    let db = test_db().await;

    let mut expanded = HashSet::new();
    expanded.insert("Dev".to_string());
    expanded.insert("Dev > Tools".to_string());

    db.set_preference(PREF_CURRENT_FOLDER, "Dev > Tools")
        .await
        .unwrap();
    db.set_preference(PREF_EXPANDED_FOLDERS, &encode_expanded(&expanded))
        .await
        .unwrap();

    let mut app = App::new(db, &Config::default()).unwrap();
    app.restore_persisted().await.unwrap();
    app.install_store(sample_store());

    assert_eq!(app.nav.current_folder.as_deref(), Some("Dev > Tools"));
    assert!(app.nav.is_expanded("Dev"));
    assert!(app.nav.is_expanded("Dev > Tools"));
}

#[tokio::test]
async fn test_dangling_references_dropped_on_reparse() {
    let db = test_db().await;
    db.set_preference(PREF_CURRENT_FOLDER, "Removed > Folder")
        .await
        .unwrap();
    db.set_preference(PREF_EXPANDED_FOLDERS, "[\"Dev\",\"Removed\"]")
        .await
        .unwrap();

    let mut app = App::new(db, &Config::default()).unwrap();
    app.restore_persisted().await.unwrap();
    app.install_store(sample_store());

    // The export no longer has those folders: home, and only Dev stays.
    assert_eq!(app.nav.current_folder, None);
    assert!(app.nav.is_expanded("Dev"));
    assert!(!app.nav.is_expanded("Removed"));
}

#[tokio::test]
async fn test_corrupt_preferences_fall_back_to_defaults() {
    let db = test_db().await;
    db.set_preference("theme", "chartreuse").await.unwrap();
    db.set_preference(PREF_EXPANDED_FOLDERS, "{broken json")
        .await
        .unwrap();

    let mut app = App::new(db, &Config::default()).unwrap();
    // Startup must not fail on corrupt values.
    app.restore_persisted().await.unwrap();

    assert_eq!(app.theme_variant.name(), "Dark");
    assert!(app.nav.expanded_folders.is_empty());
}

#[tokio::test]
async fn test_clearing_a_preference_restores_default() {
    let db = test_db().await;
    db.set_preference(PREF_CURRENT_FOLDER, "Dev").await.unwrap();
    db.clear_preference(PREF_CURRENT_FOLDER).await.unwrap();

    let mut app = App::new(db, &Config::default()).unwrap();
    app.restore_persisted().await.unwrap();
    assert_eq!(app.nav.current_folder, None);
}

// ============================================================================
// Codec
// ============================================================================

#[test]
fn test_expanded_codec_is_stable() {
    let mut expanded = HashSet::new();
    expanded.insert("B".to_string());
    expanded.insert("A".to_string());

    // Sorted encoding: the persisted value is deterministic.
    assert_eq!(encode_expanded(&expanded), "[\"A\",\"B\"]");
    assert_eq!(decode_expanded(Some("[\"A\",\"B\"]")), expanded);
}
