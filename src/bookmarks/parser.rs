//! Bookmark tree parser.
//!
//! Browser bookmark exports encode the folder hierarchy as nested `DL` lists:
//! each folder is a `DT` holding an `H3` heading, each bookmark a `DT` holding
//! an `A` anchor. The parser runs in two stages: `scan_nodes` decodes the
//! markup into a flat sequence of markers tagged with their structural nesting
//! depth (count of enclosing `DL` scopes), and `build_tree` reconstructs the
//! full path of every folder and bookmark from that flat sequence with a
//! truncate/extend path stack.

use quick_xml::events::attributes::Attribute;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use crate::util::strip_control_chars;

/// Maximum allowed nesting depth for bookmark folders.
/// Prevents stack-abuse from pathologically nested export files.
const MAX_TREE_DEPTH: usize = 64;

/// Separator joining folder names into a canonical path string.
pub const PATH_SEPARATOR: &str = " > ";

/// Sentinel folder label for bookmarks that sit outside any folder.
pub const ROOT_FOLDER: &str = "Root";

/// Errors that can occur while decoding a bookmark export.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Folder nesting depth exceeds the safety limit.
    #[error("bookmark nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),

    /// The markup stream could not be decoded at all.
    #[error("markup parse error: {0}")]
    Markup(String),
}

// ============================================================================
// Flat node sequence
// ============================================================================

/// A single marker decoded from the export file, in document order.
///
/// `depth` is structural: the number of `DL` container scopes enclosing the
/// node. It is never derived from whitespace or any embedded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatNode {
    /// A folder heading (`H3`).
    Folder { depth: usize, name: String },
    /// A bookmark anchor (`A`).
    Link {
        depth: usize,
        url: String,
        title: String,
        icon: Option<String>,
        icon_uri: Option<String>,
    },
}

impl FlatNode {
    /// Structural nesting depth of this node.
    pub fn depth(&self) -> usize {
        match self {
            FlatNode::Folder { depth, .. } | FlatNode::Link { depth, .. } => *depth,
        }
    }
}

// ============================================================================
// Reconstructed tree
// ============================================================================

/// A folder reconstructed from the export, immutable after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    /// The folder's own name.
    pub name: String,
    /// Ancestor names root-first, ending with this folder. Never empty.
    pub path: Vec<String>,
    /// `path` joined with [`PATH_SEPARATOR`]. Unique identifier among
    /// folders whose siblings carry distinct names.
    pub path_string: String,
}

/// A bookmark reconstructed from the export, immutable after parsing.
///
/// Identity for favoriting purposes is `url`; duplicate URLs collapse to a
/// single favorite state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub title: String,
    pub url: String,
    /// Inline icon data from the `ICON` attribute, if present.
    pub icon: Option<String>,
    /// Icon source URL from the `ICON_URI` attribute, if present.
    pub icon_uri: Option<String>,
    /// Path of the containing folder, empty for root-level bookmarks.
    pub folder_path: Vec<String>,
    /// Path string of the containing folder, or [`ROOT_FOLDER`].
    pub folder: String,
}

/// Output of a parse: folders and bookmarks in document order.
#[derive(Debug, Clone, Default)]
pub struct ParsedTree {
    pub folders: Vec<Folder>,
    pub bookmarks: Vec<Bookmark>,
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses a bookmark export file into folders and bookmarks.
///
/// Individual malformed entries (missing URL or empty title) are dropped
/// silently; only unreadable markup or excessive nesting fails the parse.
pub fn parse_html(html: &str) -> Result<ParsedTree, ParseError> {
    let nodes = scan_nodes(html)?;
    Ok(build_tree(&nodes))
}

/// Decodes the export markup into a flat marker sequence.
///
/// Real-world exports are not well-formed XML: `DT` and `p` elements are
/// routinely left unclosed, and tag/attribute case varies between browsers.
/// The scanner therefore disables end-name checking and matches names
/// ASCII case-insensitively, tracking only the `DL` nesting it needs.
pub fn scan_nodes(html: &str) -> Result<Vec<FlatNode>, ParseError> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.trim_text(true);
    config.check_end_names = false;

    let mut nodes = Vec::new();
    let mut buf = Vec::new();
    let mut depth: usize = 0;

    // Text accumulator for the H3 or A element currently open, if any.
    enum Capture {
        Folder {
            depth: usize,
            text: String,
        },
        Link {
            depth: usize,
            url: String,
            icon: Option<String>,
            icon_uri: Option<String>,
            text: String,
        },
    }
    let mut capture: Option<Capture> = None;

    // Set once an H3 has been emitted for the current DT. An A under the
    // same DT is dropped: a node is a folder or a link, never both, and the
    // folder marker wins.
    let mut folder_pending = false;
    let mut skip_link = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name();
                let tag = name.as_ref();
                if tag.eq_ignore_ascii_case(b"dl") {
                    depth += 1;
                    if depth > MAX_TREE_DEPTH {
                        return Err(ParseError::MaxDepthExceeded(MAX_TREE_DEPTH));
                    }
                    folder_pending = false;
                } else if tag.eq_ignore_ascii_case(b"dt") {
                    folder_pending = false;
                } else if tag.eq_ignore_ascii_case(b"h3") {
                    capture = Some(Capture::Folder {
                        depth,
                        text: String::new(),
                    });
                } else if tag.eq_ignore_ascii_case(b"a") {
                    if folder_pending {
                        skip_link = true;
                    } else {
                        let (url, icon, icon_uri) = anchor_attributes(&e, &reader);
                        capture = Some(Capture::Link {
                            depth,
                            url,
                            icon,
                            icon_uri,
                            text: String::new(),
                        });
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                let tag = name.as_ref();
                if tag.eq_ignore_ascii_case(b"dl") {
                    depth = depth.saturating_sub(1);
                } else if tag.eq_ignore_ascii_case(b"h3") {
                    if let Some(Capture::Folder { depth, text }) = capture.take() {
                        nodes.push(FlatNode::Folder { depth, name: text });
                        folder_pending = true;
                    }
                } else if tag.eq_ignore_ascii_case(b"a") {
                    if skip_link {
                        skip_link = false;
                    } else if let Some(Capture::Link {
                        depth,
                        url,
                        icon,
                        icon_uri,
                        text,
                    }) = capture.take()
                    {
                        nodes.push(FlatNode::Link {
                            depth,
                            url,
                            title: text,
                            icon,
                            icon_uri,
                        });
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(cap) = capture.as_mut() {
                    let decoded = e
                        .unescape()
                        .map(|cow| cow.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                    match cap {
                        Capture::Folder { text, .. } | Capture::Link { text, .. } => {
                            text.push_str(&decoded)
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Markup(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(nodes)
}

/// Extracts `HREF` / `ICON` / `ICON_URI` from an anchor element.
///
/// Attribute keys are matched case-insensitively. Values that fail entity
/// decoding fall back to a lossy raw decode so that an unescaped `&` in a
/// URL does not lose the bookmark.
fn anchor_attributes(
    e: &quick_xml::events::BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> (String, Option<String>, Option<String>) {
    let mut url = String::new();
    let mut icon = None;
    let mut icon_uri = None;

    for attr_result in e.attributes() {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed anchor attribute");
                continue;
            }
        };
        let key = attr.key.as_ref().to_ascii_lowercase();
        match key.as_slice() {
            b"href" => url = attribute_value(&attr, reader),
            b"icon" => icon = Some(attribute_value(&attr, reader)),
            b"icon_uri" => icon_uri = Some(attribute_value(&attr, reader)),
            _ => {}
        }
    }

    (url, icon, icon_uri)
}

fn attribute_value(attr: &Attribute<'_>, reader: &Reader<&[u8]>) -> String {
    attr.decode_and_unescape_value(reader.decoder())
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Reconstructs folder paths from the flat marker sequence.
///
/// Maintains a path stack of the currently-open folder names. Before each
/// node the stack is truncated to `depth - 1`, discarding segments belonging
/// to siblings and closed ancestors: a depth-first flat encoding guarantees
/// children immediately follow their parent marker, so the surviving prefix
/// is exactly the node's ancestor chain.
pub fn build_tree(nodes: &[FlatNode]) -> ParsedTree {
    let mut path_stack: Vec<String> = Vec::new();
    let mut tree = ParsedTree::default();

    for node in nodes {
        path_stack.truncate(node.depth().saturating_sub(1));

        match node {
            FlatNode::Folder { name, .. } => {
                // Export text is untrusted terminal output later on, so
                // escape sequences are stripped here, once.
                let name = strip_control_chars(name);
                path_stack.push(name.trim().to_string());
                // Snapshot, not a live reference: later stack mutation must
                // never retroactively change an emitted folder's path.
                tree.folders.push(Folder {
                    name: name.trim().to_string(),
                    path: path_stack.clone(),
                    path_string: path_stack.join(PATH_SEPARATOR),
                });
            }
            FlatNode::Link {
                url,
                title,
                icon,
                icon_uri,
                ..
            } => {
                let title = strip_control_chars(title);
                let title = title.trim();
                if url.is_empty() || title.is_empty() {
                    tracing::debug!(url = %url, "Dropping bookmark entry with missing url or title");
                    continue;
                }
                let folder = if path_stack.is_empty() {
                    ROOT_FOLDER.to_string()
                } else {
                    path_stack.join(PATH_SEPARATOR)
                };
                tree.bookmarks.push(Bookmark {
                    title: title.to_string(),
                    url: url.clone(),
                    icon: icon.clone(),
                    icon_uri: icon_uri.clone(),
                    folder_path: path_stack.clone(),
                    folder,
                });
            }
        }
    }

    tree
}
