use super::blocks::{render_blocks, Block};
use super::inline::{join_numbers, Span};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span as StyledSpan},
};

/// Render model output to `Vec<Line>` for ratatui.
/// Supports: math cleanup, **bold**, *italic*, [n] citations, - / * / numbered
/// lists and #, ##, ### headings.
pub fn render_markdown(content: &str) -> Vec<Line<'static>> {
    let mut result: Vec<Line<'static>> = Vec::new();

    for block in render_blocks(content) {
        match block {
            Block::Heading { level, spans } => {
                let style = match level {
                    1 => Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    _ => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                };
                let line: Vec<StyledSpan<'static>> = styled_spans(&spans)
                    .into_iter()
                    .map(|span| {
                        let inner = span.style;
                        span.style(style.patch(inner))
                    })
                    .collect();
                result.push(Line::from(line));
            }
            Block::Paragraph(spans) => result.push(Line::from(styled_spans(&spans))),
            Block::List { ordered, items } => {
                for (i, item) in items.iter().enumerate() {
                    let marker = if ordered {
                        format!("  {}. ", i + 1)
                    } else {
                        "  • ".to_string()
                    };
                    let mut line = vec![StyledSpan::from(marker)];
                    line.extend(styled_spans(item));
                    result.push(Line::from(line));
                }
            }
            Block::LineBreak => result.push(Line::from("")),
        }
    }

    result
}

fn styled_spans(spans: &[Span]) -> Vec<StyledSpan<'static>> {
    spans
        .iter()
        .map(|span| match span {
            Span::Bold(text) => StyledSpan::styled(
                text.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::Italic(text) => StyledSpan::styled(
                text.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
            Span::Citation(numbers) => StyledSpan::styled(
                format!("[{}]", join_numbers(numbers)),
                Style::default().fg(Color::Cyan),
            ),
            Span::Plain(text) => StyledSpan::from(text.clone()),
        })
        .collect()
}
