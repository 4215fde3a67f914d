//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }

    /// Persistence token for the preferences store.
    pub fn pref_value(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

// ============================================================================
// Color Palette — semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
///
/// Each field corresponds to a specific visual element in the TUI.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Folder tree sidebar --
    pub tree_normal: Style,
    pub tree_selected: Style,
    pub tree_expanded_marker: Style,
    pub tree_count: Style,

    // -- Breadcrumb --
    pub crumb_segment: Style,
    pub crumb_current: Style,
    pub crumb_separator: Style,

    // -- Cards grid --
    pub card_title: Style,
    pub card_url: Style,
    pub card_folder: Style,
    pub card_selected: Style,
    pub card_favorite_star: Style,
    pub card_favicon_ok: Style,
    pub card_favicon_missing: Style,

    // -- Favorites banner --
    pub favorites_header: Style,

    // -- Search --
    pub search_active: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub empty_view: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            // Folder tree
            tree_normal: Style::default(),
            tree_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            tree_expanded_marker: Style::default().fg(Color::Cyan),
            tree_count: Style::default().fg(Color::DarkGray),

            // Breadcrumb
            crumb_segment: Style::default().fg(Color::Cyan),
            crumb_current: Style::default().add_modifier(Modifier::BOLD),
            crumb_separator: Style::default().fg(Color::DarkGray),

            // Cards
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_url: Style::default().fg(Color::Blue),
            card_folder: Style::default().fg(Color::Cyan),
            card_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            card_favorite_star: Style::default().fg(Color::Yellow),
            card_favicon_ok: Style::default().fg(Color::Green),
            card_favicon_missing: Style::default().fg(Color::DarkGray),

            // Favorites banner
            favorites_header: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            // Search
            search_active: Style::default().fg(Color::Magenta),

            // Chrome
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            empty_view: Style::default().fg(Color::DarkGray),
        }
    }

    /// Light palette — adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            // Folder tree
            tree_normal: Style::default().fg(Color::Black),
            tree_selected: Style::default().bg(Color::Blue).fg(Color::White),
            tree_expanded_marker: Style::default().fg(Color::Blue),
            tree_count: Style::default().fg(Color::DarkGray),

            // Breadcrumb
            crumb_segment: Style::default().fg(Color::Blue),
            crumb_current: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            crumb_separator: Style::default().fg(Color::DarkGray),

            // Cards
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_url: Style::default().fg(Color::Blue),
            card_folder: Style::default().fg(Color::Blue),
            card_selected: Style::default().bg(Color::Blue).fg(Color::White),
            card_favorite_star: Style::default().fg(Color::Magenta),
            card_favicon_ok: Style::default().fg(Color::Green),
            card_favicon_missing: Style::default().fg(Color::DarkGray),

            // Favorites banner
            favorites_header: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            // Search
            search_active: Style::default().fg(Color::Magenta),

            // Chrome
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            empty_view: Style::default().fg(Color::DarkGray),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_palette_selection_uses_darkgray() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.card_selected,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
        assert_eq!(palette.card_selected, palette.tree_selected);
    }

    #[test]
    fn dark_palette_favorite_star_is_yellow() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.card_favorite_star,
            Style::default().fg(Color::Yellow)
        );
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        // Light selection uses Blue bg instead of DarkGray
        assert_ne!(dark.card_selected, light.card_selected);
        assert_ne!(dark.tree_selected, light.tree_selected);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(
            ThemeVariant::from_str_name("dark"),
            Some(ThemeVariant::Dark)
        );
        assert_eq!(
            ThemeVariant::from_str_name("Light"),
            Some(ThemeVariant::Light)
        );
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn variant_cycle_round_trips() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next(), ThemeVariant::Dark);
    }

    #[test]
    fn pref_value_round_trips() {
        for v in [ThemeVariant::Dark, ThemeVariant::Light] {
            assert_eq!(ThemeVariant::from_str_name(v.pref_value()), Some(v));
        }
    }
}
