//! Bookmark domain: export-file parsing, the in-memory store, and source
//! loading.

pub mod parser;
pub mod source;
pub mod store;

pub use parser::{Bookmark, FlatNode, Folder, ParseError, ParsedTree, PATH_SEPARATOR, ROOT_FOLDER};
pub use source::{Source, SourceError};
pub use store::BookmarkStore;
