use regex::Regex;

lazy_static::lazy_static! {
    // Priority is encoded by alternation order: bold, italic, citation.
    static ref INLINE_RE: Regex =
        Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*|\[(\d+(?:\s*,\s*\d+)*)\]").unwrap();
}

/// A styled fragment of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Bold(String),
    Italic(String),
    /// Source references such as `[1, 2]`, 1-based.
    Citation(Vec<u32>),
    Plain(String),
}

impl Span {
    /// Text as it should read with styling removed.
    pub fn plain_text(&self) -> String {
        match self {
            Span::Bold(text) | Span::Italic(text) | Span::Plain(text) => text.clone(),
            Span::Citation(numbers) => format!("[{}]", join_numbers(numbers)),
        }
    }
}

pub fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split a line into spans. Markers do not nest: `**a *b* c**` is a single
/// bold span whose text still contains the inner asterisks.
pub fn parse_inline(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE_RE.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let span = if let Some(bold) = caps.get(1) {
            Span::Bold(bold.as_str().to_string())
        } else if let Some(italic) = caps.get(2) {
            Span::Italic(italic.as_str().to_string())
        } else if let Some(list) = caps.get(3) {
            match parse_citation(list.as_str()) {
                Some(numbers) => Span::Citation(numbers),
                None => continue,
            }
        } else {
            continue;
        };

        if whole.start() > last {
            spans.push(Span::Plain(line[last..whole.start()].to_string()));
        }
        spans.push(span);
        last = whole.end();
    }

    if last < line.len() {
        spans.push(Span::Plain(line[last..].to_string()));
    }

    spans
}

fn parse_citation(list: &str) -> Option<Vec<u32>> {
    list.split(',')
        .map(|n| n.trim().parse::<u32>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_line() {
        assert_eq!(
            parse_inline("**bold** and *italic* [1, 2]"),
            vec![
                Span::Bold("bold".to_string()),
                Span::Plain(" and ".to_string()),
                Span::Italic("italic".to_string()),
                Span::Plain(" ".to_string()),
                Span::Citation(vec![1, 2]),
            ]
        );
    }

    #[test]
    fn test_plain_only() {
        assert_eq!(
            parse_inline("just text"),
            vec![Span::Plain("just text".to_string())]
        );
        assert!(parse_inline("").is_empty());
    }

    #[test]
    fn test_empty_marker_pairs_stay_plain() {
        assert_eq!(parse_inline("**"), vec![Span::Plain("**".to_string())]);
        assert_eq!(parse_inline("a * b"), vec![Span::Plain("a * b".to_string())]);
    }

    #[test]
    fn test_single_citation_and_trailing_text() {
        assert_eq!(
            parse_inline("Water boils at 100°C [3]."),
            vec![
                Span::Plain("Water boils at 100°C ".to_string()),
                Span::Citation(vec![3]),
                Span::Plain(".".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_numeric_brackets_are_plain() {
        assert_eq!(
            parse_inline("see [note]"),
            vec![Span::Plain("see [note]".to_string())]
        );
    }

    #[test]
    fn test_nesting_is_not_supported() {
        // Accepted limitation: the inner italic markers are kept verbatim.
        assert_eq!(
            parse_inline("**a *b* c**"),
            vec![Span::Bold("a *b* c".to_string())]
        );
    }

    #[test]
    fn test_plain_text_of_citation() {
        assert_eq!(Span::Citation(vec![1, 4]).plain_text(), "[1, 4]");
    }
}
