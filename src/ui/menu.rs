use super::{help_bar, help_line, title_bar};
use crate::app::{App, MenuItem};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw_menu(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(area);

    f.render_widget(
        title_bar(format!("Study Assistant v{}", env!("CARGO_PKG_VERSION"))),
        chunks[0],
    );

    let items: Vec<ListItem> = MenuItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let text = format!("[{}] {}", i + 1, item.label());
            let style = if i == app.menu_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("Menu"),
    );
    f.render_widget(list, chunks[1]);

    let help_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[2]);

    let ai_status_content = if app.ai_enabled {
        vec![
            Line::from("AI: Enabled"),
            Line::from(format!("Model: {}", app.model)),
        ]
    } else {
        vec![
            Line::from("AI: Disabled"),
            Line::from("Set OPENROUTER_API_KEY"),
        ]
    };

    let ai_status = Paragraph::new(ai_status_content)
        .style(
            Style::default()
                .fg(if app.ai_enabled {
                    Color::Green
                } else {
                    Color::Yellow
                })
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("AI Status"));
    f.render_widget(ai_status, help_chunks[0]);

    let help = help_bar(vec![
        help_line(&[("↑/↓", "Navigate"), ("Enter", "Select"), ("1-3", "Jump")]),
        help_line(&[("Esc/q", "Quit"), ("Ctrl+C", "Exit App")]),
    ]);
    f.render_widget(help, help_chunks[1]);
}
