//! Bookmark source loading.
//!
//! The export file is read once at startup, either from the filesystem or
//! over HTTP(S). Any failure here is a `SourceError`: it is reported to the
//! user exactly once and leaves the store empty rather than partially
//! populated — the UI stays interactive either way.

use thiserror::Error;

use super::parser::{self, ParseError, ParsedTree};
use super::store::BookmarkStore;

/// Errors raised while obtaining or decoding the bookmark source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source file could not be read from disk.
    #[error("failed to read bookmark file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The source could not be fetched over HTTP.
    #[error("failed to fetch bookmark source '{url}': {reason}")]
    Fetch { url: String, reason: String },

    /// The fetch succeeded but the server answered with an error status.
    #[error("bookmark source '{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The file was obtained but its markup could not be decoded.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Where the bookmark export comes from.
#[derive(Debug, Clone)]
pub enum Source {
    File(std::path::PathBuf),
    Url(String),
}

impl Source {
    /// Classifies a source string: anything with an http(s) scheme is a URL,
    /// everything else a filesystem path.
    pub fn from_spec(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::File(std::path::PathBuf::from(s))
        }
    }

    /// Human-readable location for status reporting.
    pub fn describe(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Url(url) => url.clone(),
        }
    }
}

/// Loads and parses the bookmark source into a store.
///
/// This is the only asynchronous step of initialization; the caller decides
/// what to do on failure (the binary falls back to an empty store and a
/// one-shot status message).
pub async fn load(client: &reqwest::Client, source: &Source) -> Result<BookmarkStore, SourceError> {
    let html = match source {
        Source::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| SourceError::Read {
                    path: path.display().to_string(),
                    source: e,
                })?
        }
        Source::Url(url) => fetch(client, url).await?,
    };

    let tree: ParsedTree = parser::parse_html(&html)?;
    tracing::info!(
        folders = tree.folders.len(),
        bookmarks = tree.bookmarks.len(),
        source = %source.describe(),
        "Parsed bookmark source"
    );
    Ok(BookmarkStore::from_tree(tree))
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<String, SourceError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SourceError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| SourceError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
