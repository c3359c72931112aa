use super::inline::{parse_inline, Span};
use super::normalize::normalize;
use regex::Regex;

lazy_static::lazy_static! {
    static ref ORDERED_RE: Regex = Regex::new(r"^\d+\.\s+(.*)$").unwrap();
    static ref UNORDERED_RE: Regex = Regex::new(r"^[-*]\s+(.*)$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    List { ordered: bool, items: Vec<Vec<Span>> },
    LineBreak,
}

struct ListAccumulator {
    ordered: bool,
    items: Vec<Vec<Span>>,
}

fn flush(pending: &mut Option<ListAccumulator>, blocks: &mut Vec<Block>) {
    if let Some(list) = pending.take() {
        blocks.push(Block::List {
            ordered: list.ordered,
            items: list.items,
        });
    }
}

fn heading(line: &str) -> Option<(u8, &str)> {
    if let Some(rest) = line.strip_prefix("### ") {
        Some((3, rest))
    } else if let Some(rest) = line.strip_prefix("## ") {
        Some((2, rest))
    } else {
        line.strip_prefix("# ").map(|rest| (1, rest))
    }
}

fn list_item(line: &str) -> Option<(bool, &str)> {
    if let Some(caps) = UNORDERED_RE.captures(line) {
        return caps.get(1).map(|m| (false, m.as_str()));
    }
    ORDERED_RE
        .captures(line)
        .and_then(|caps| caps.get(1).map(|m| (true, m.as_str())))
}

/// Normalize `text` and turn it into a flat sequence of blocks.
///
/// Single pass, line by line. The only carried state is the list being
/// accumulated; list items hold inline spans only, there is no nesting.
pub fn render_blocks(text: &str) -> Vec<Block> {
    let normalized = normalize(text);
    let lines: Vec<&str> = normalized.split('\n').collect();
    let last_index = lines.len().saturating_sub(1);

    let mut blocks = Vec::new();
    let mut pending: Option<ListAccumulator> = None;

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();

        if line.is_empty() {
            flush(&mut pending, &mut blocks);
            if i != 0 && i != last_index {
                blocks.push(Block::LineBreak);
            }
            continue;
        }

        if let Some((level, rest)) = heading(line) {
            flush(&mut pending, &mut blocks);
            blocks.push(Block::Heading {
                level,
                spans: parse_inline(rest),
            });
            continue;
        }

        if let Some((ordered, item)) = list_item(line) {
            if pending.as_ref().is_some_and(|list| list.ordered != ordered) {
                flush(&mut pending, &mut blocks);
            }
            pending
                .get_or_insert_with(|| ListAccumulator {
                    ordered,
                    items: Vec::new(),
                })
                .items
                .push(parse_inline(item));
            continue;
        }

        flush(&mut pending, &mut blocks);
        blocks.push(Block::Paragraph(parse_inline(line)));
    }

    flush(&mut pending, &mut blocks);
    blocks
}

/// Flatten blocks back into unstyled text, one block per line.
pub fn blocks_to_plain_text(blocks: &[Block]) -> String {
    let spans_text = |spans: &[Span]| spans.iter().map(Span::plain_text).collect::<String>();
    let mut lines = Vec::new();
    for block in blocks {
        match block {
            Block::Heading { spans, .. } | Block::Paragraph(spans) => lines.push(spans_text(spans)),
            Block::List { items, .. } => {
                lines.extend(items.iter().map(|item| spans_text(item)));
            }
            Block::LineBreak => lines.push(String::new()),
        }
    }
    lines.join("\n")
}
