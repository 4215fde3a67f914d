use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns, Unicode-aware.
/// CJK characters and most emoji occupy two columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncation marker, one column wide.
const ELLIPSIS: char = '…';

/// Truncates a string to fit within `max_width` terminal columns, appending
/// `…` when text was cut. Returns `Cow::Borrowed` when the string already
/// fits, so the common render path allocates nothing.
///
/// A width of 0 yields the empty string. A width of 1 yields at most one
/// single-column character with no marker.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    // Leave one column for the marker, except at width 1 where nothing fits
    // alongside it.
    let budget = if max_width == 1 { 1 } else { max_width - 1 };
    let mut used = 0;
    let mut out = String::with_capacity(s.len().min(max_width * 4));
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if max_width > 1 {
        out.push(ELLIPSIS);
    }
    Cow::Owned(out)
}

/// Strips terminal control characters and ANSI escape sequences from text.
///
/// Bookmark titles and URLs come straight out of a browser export and are
/// rendered verbatim in the terminal; a crafted title must not be able to
/// move the cursor or retitle the window. Tab, newline, and carriage return
/// survive; everything else below 0x20, DEL, and ESC-introduced sequences
/// (CSI and OSC) are dropped.
///
/// Returns `Cow::Borrowed` when the input is already clean.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    fn is_bad(c: char) -> bool {
        c == '\u{1b}' || c == '\u{7f}' || (c < ' ' && c != '\t' && c != '\n' && c != '\r')
    }

    if !s.chars().any(is_bad) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            match chars.peek() {
                // CSI: parameters until a final byte in 0x40..=0x7e
                Some('[') => {
                    chars.next();
                    for t in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&t) {
                            break;
                        }
                    }
                }
                // OSC: runs until BEL or ST
                Some(']') => {
                    chars.next();
                    while let Some(t) = chars.next() {
                        if t == '\u{07}' {
                            break;
                        }
                        if t == '\u{1b}' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                // Bare ESC, drop it
                _ => {}
            }
        } else if !is_bad(c) {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_returns_borrowed() {
        let result = truncate_to_width("Short", 10);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Short");
    }

    #[test]
    fn test_ascii_truncation() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello W…");
        assert_eq!(truncate_to_width("12345", 5), "12345");
    }

    #[test]
    fn test_cjk_truncation() {
        // CJK characters are two columns wide.
        assert_eq!(truncate_to_width("你好世界", 8), "你好世界");
        // Budget 4 after the marker, but the third char needs 2 columns.
        assert_eq!(truncate_to_width("你好世界", 5), "你好…");
    }

    #[test]
    fn test_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("Test", 2), "T…");
        // A 2-column char does not fit in a 1-column budget.
        assert_eq!(truncate_to_width("你好", 1), "");
    }

    #[test]
    fn test_no_panic_on_multibyte() {
        let mixed = "Hello世界の栞";
        let result = truncate_to_width(mixed, 9);
        assert!(display_width(&result) <= 9);
    }

    #[test]
    fn test_strip_clean_text_returns_borrowed() {
        let input = "Rust Language — Official Site";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test]
    fn test_strip_preserves_whitespace_controls() {
        let input = "line1\nline2\ttabbed\r\n";
        assert_eq!(strip_control_chars(input), input);
    }

    #[test]
    fn test_strip_removes_c0_and_del() {
        let input = "he\x00ll\x07o\x7f!";
        assert_eq!(strip_control_chars(input), "hello!");
    }

    #[test]
    fn test_strip_ansi_color_codes() {
        let input = "\x1b[31mRed title\x1b[0m";
        assert_eq!(strip_control_chars(input), "Red title");
    }

    #[test]
    fn test_strip_osc_title_injection() {
        assert_eq!(
            strip_control_chars("\x1b]0;evil title\x07safe"),
            "safe"
        );
        assert_eq!(
            strip_control_chars("\x1b]0;evil title\x1b\\safe"),
            "safe"
        );
    }

    #[test]
    fn test_strip_bare_esc() {
        assert_eq!(strip_control_chars("before\x1bafter"), "beforeafter");
    }

    #[test]
    fn test_strip_unicode_preserved() {
        let input = "日本語 \x1b[31m赤い\x1b[0m タイトル";
        assert_eq!(strip_control_chars(input), "日本語 赤い タイトル");
    }
}
