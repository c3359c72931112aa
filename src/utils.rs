use std::time::{SystemTime, UNIX_EPOCH};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Shorten `s` to at most `max_len` characters, ending in "..." when cut.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Lowercase ASCII slug for file names.
pub fn slugify(s: &str) -> String {
    let mut slug = String::new();
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "quiz".to_string()
    } else {
        slug
    }
}

/// Horizontal scrolling for a single-line input of display width `width`.
/// `cursor` is a char index. Returns the visible slice and the cursor column
/// inside it.
pub fn input_window(input: &str, cursor: usize, width: usize) -> (String, usize) {
    let chars: Vec<char> = input.chars().collect();
    let cursor = cursor.min(chars.len());
    if width == 0 {
        return (String::new(), 0);
    }

    // Walk left from the cursor until the window is full.
    let mut start = cursor;
    let mut used = 0;
    while start > 0 {
        let w = chars[start - 1].width().unwrap_or(1);
        if used + w >= width {
            break;
        }
        used += w;
        start -= 1;
    }

    let mut visible = String::new();
    let mut visible_width = 0;
    for c in &chars[start..] {
        let w = c.width().unwrap_or(1);
        if visible_width + w > width {
            break;
        }
        visible.push(*c);
        visible_width += w;
    }

    let before: String = chars[start..cursor].iter().collect();
    (visible, before.width())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_no_truncation() {
        assert_eq!(truncate_string("Short string", 20), "Short string");
    }

    #[test]
    fn test_truncate_string_with_truncation() {
        let result = truncate_string("This is a very long string that should be truncated", 20);
        assert_eq!(result, "This is a very lo...");
        assert_eq!(result.chars().count(), 20);
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("αβγδεζηθ", 6), "αβγ...");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Cell Biology: Mitosis!"), "cell-biology-mitosis");
        assert_eq!(slugify("???"), "quiz");
    }

    #[test]
    fn test_input_window_short_input() {
        assert_eq!(input_window("hello", 5, 20), ("hello".to_string(), 5));
        assert_eq!(input_window("hello", 2, 20), ("hello".to_string(), 2));
    }

    #[test]
    fn test_input_window_scrolls_to_cursor() {
        let (visible, col) = input_window("abcdefghij", 10, 4);
        assert_eq!(visible, "hij");
        assert_eq!(col, 3);
    }

    #[test]
    fn test_input_window_zero_width() {
        assert_eq!(input_window("abc", 1, 0), (String::new(), 0));
    }
}
