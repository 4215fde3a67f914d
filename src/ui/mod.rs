//! Terminal User Interface module.
//!
//! This module provides the TUI for the bookmark browser, including:
//! - Main event loop (`run`)
//! - Input handling for browse and search modes
//! - Rendering for the folder tree, breadcrumb, and card grid
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Frame layout dispatch
//! - `tree` - Folder tree sidebar widget
//! - `cards` - Card grid widget (favorites banner, folders, bookmarks)
//! - `status` - Status bar and breadcrumb widgets

mod cards;
mod events;
mod input;
mod loop_runner;
mod render;
mod status;
mod tree;

// Re-export the public API
pub use loop_runner::{run, Action};
