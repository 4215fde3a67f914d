//! Terminal bookmark browser.
//!
//! Parses a browser-exported bookmarks HTML file into an in-memory store and
//! presents it as a navigable TUI: a folder tree sidebar, a breadcrumb, and a
//! card grid with live search, favorites, and batched reveal. Favorites and
//! navigation state persist in SQLite across sessions.

pub mod app;
pub mod bookmarks;
pub mod config;
pub mod filter;
pub mod nav;
pub mod pagination;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
