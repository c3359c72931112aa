use super::layout::calculate_search_chunks;
use super::{help_bar, help_line, title_bar};
use crate::app::{App, TextInput};
use crate::attachments::MAX_ATTACHMENTS;
use crate::render::render_markdown;
use crate::utils::input_window;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn draw_input(f: &mut Frame, area: Rect, input: &TextInput, title: &str, placeholder: &str) {
    let width = area.width.saturating_sub(2) as usize;
    let (visible, cursor_col) = input_window(input.value(), input.cursor(), width);

    let paragraph = if input.value().is_empty() {
        Paragraph::new(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(visible)
    };
    f.render_widget(
        paragraph.block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title.to_string()),
        ),
        area,
    );
    f.set_cursor_position((area.x + 1 + cursor_col as u16, area.y + 1));
}

fn attachments_line(app: &App) -> Line<'static> {
    let attachments = &app.search.attachments;
    let mut spans = vec![Span::styled(
        "Attachments: ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if attachments.items().is_empty() && !attachments.is_processing() {
        spans.push(Span::styled(
            format!("none (Ctrl+A to add, max {})", MAX_ATTACHMENTS),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        let names: Vec<&str> = attachments.items().iter().map(|a| a.name.as_str()).collect();
        spans.push(Span::from(names.join(", ")));
        if attachments.is_processing() {
            spans.push(Span::styled(
                "  (loading...)",
                Style::default().fg(Color::Yellow),
            ));
        }
    }
    Line::from(spans)
}

fn result_text(app: &App) -> Text<'static> {
    if app.busy {
        return Text::from(Line::from(Span::styled(
            "Searching...",
            Style::default().fg(Color::Yellow),
        )));
    }
    let Some(record) = app.search.result.as_ref() else {
        return Text::from(Line::from(Span::styled(
            "Ask a question and press Enter.",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    };

    let mut text = Text::from(render_markdown(&record.result.text));
    if !record.result.sources.is_empty() {
        text.push_line(Line::from(""));
        text.push_line(Line::from(Span::styled(
            "Sources:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (i, source) in record.result.sources.iter().enumerate() {
            text.push_line(Line::from(vec![
                Span::styled(format!("[{}] ", i + 1), Style::default().fg(Color::Cyan)),
                Span::from(source.title.clone()),
                Span::styled(
                    format!("  {}", source.uri),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }
    text
}

pub fn draw_search(f: &mut Frame, app: &mut App) {
    let layout = calculate_search_chunks(f.area());
    let speaking = app.is_speaking();

    f.render_widget(title_bar("Search".to_string()), layout.header_area);

    match app.search.attach_prompt.as_ref() {
        Some(prompt) => draw_input(
            f,
            layout.input_area,
            prompt,
            "Attach file",
            "Path to a png, jpg, webp, gif, pdf, txt, md or csv file",
        ),
        None => draw_input(
            f,
            layout.input_area,
            &app.search.input,
            "Question",
            "What would you like to learn about?",
        ),
    }

    f.render_widget(Paragraph::new(attachments_line(app)), layout.attachments_area);

    let title = if speaking { "Answer (reading aloud)" } else { "Answer" };
    let result = Paragraph::new(result_text(app))
        .wrap(Wrap { trim: false })
        .scroll((app.search.scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(result, layout.result_area);

    let help = if app.search.attach_prompt.is_some() {
        help_line(&[("Enter", "Attach"), ("Esc", "Cancel")])
    } else {
        help_line(&[
            ("Enter", "Search"),
            ("↑/↓", "Scroll"),
            ("Ctrl+A", "Attach"),
            ("Ctrl+D", "Remove"),
            ("Ctrl+S", if speaking { "Stop" } else { "Read Aloud" }),
            ("Esc", "Back"),
        ])
    };
    f.render_widget(help_bar(vec![help]), layout.help_area);
}
