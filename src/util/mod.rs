pub mod favicon;
pub mod text;

pub use favicon::{favicon_url, FaviconStatus};
pub use text::{display_width, strip_control_chars, truncate_to_width};
