//! In-memory bookmark store.
//!
//! Holds the flattened folder and bookmark lists produced by the parser, in
//! document order, and exposes the lookup primitives the filter engine and
//! the sidebar tree need. Contents are immutable after construction; a
//! re-parse replaces the whole store.

use super::parser::{Bookmark, Folder, ParsedTree, PATH_SEPARATOR};

/// Flattened bookmark data for one parsed export file.
#[derive(Debug, Clone, Default)]
pub struct BookmarkStore {
    folders: Vec<Folder>,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    /// Builds a store from a parse result.
    pub fn from_tree(tree: ParsedTree) -> Self {
        Self {
            folders: tree.folders,
            bookmarks: tree.bookmarks,
        }
    }

    /// All folders in document order.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// All bookmarks in document order.
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.bookmarks.is_empty()
    }

    /// Top-level folders (path length 1), in document order.
    pub fn root_folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders.iter().filter(|f| f.path.len() == 1)
    }

    /// Direct children of the folder identified by `parent`: path one level
    /// deeper and path string extending the parent's. The separator is part
    /// of the prefix so that "Dev" does not claim "Development > X".
    pub fn children_of<'a>(&'a self, parent: &'a Folder) -> impl Iterator<Item = &'a Folder> {
        let prefix = format!("{}{}", parent.path_string, PATH_SEPARATOR);
        self.folders.iter().filter(move |f| {
            f.path.len() == parent.path.len() + 1 && f.path_string.starts_with(&prefix)
        })
    }

    /// Looks up a folder by its canonical path string.
    pub fn folder_by_path(&self, path_string: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.path_string == path_string)
    }

    /// Whether a persisted folder reference still exists after a re-parse.
    pub fn folder_exists(&self, path_string: &str) -> bool {
        self.folder_by_path(path_string).is_some()
    }

    /// Number of bookmarks filed directly in the given folder.
    pub fn bookmark_count_in(&self, path_string: &str) -> usize {
        self.bookmarks
            .iter()
            .filter(|b| b.folder == path_string)
            .count()
    }

    /// Number of bookmarks at the top level, outside any folder.
    pub fn root_bookmark_count(&self) -> usize {
        self.bookmark_count_in(super::parser::ROOT_FOLDER)
    }
}
