use super::layout::calculate_screen_chunks;
use super::{help_bar, help_line, key_style, title_bar};
use crate::app::{App, SetupField};
use crate::models::MAX_QUESTIONS;
use crate::quiz::SECONDS_PER_QUESTION;
use crate::utils::input_window;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let marker = if focused { "▸ " } else { "  " };
    let label_style = if focused {
        key_style()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let value_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{}{:<14}", marker, label), label_style),
        Span::styled(value, value_style),
    ])
}

pub fn draw_setup(f: &mut Frame, app: &App) {
    let layout = calculate_screen_chunks(f.area());
    let setup = &app.setup;

    f.render_widget(title_bar("New Quiz".to_string()), layout.header_area);

    let topic_width = layout.body_area.width.saturating_sub(20) as usize;
    let (topic, topic_cursor) = input_window(setup.topic.value(), setup.topic.cursor(), topic_width);
    let topic = if setup.topic.value().is_empty() && setup.field != SetupField::Topic {
        "(required)".to_string()
    } else {
        topic
    };

    let timer = if setup.timer_enabled {
        format!(
            "On ({} min total)",
            setup.question_count as u32 * SECONDS_PER_QUESTION / 60
        )
    } else {
        "Off".to_string()
    };

    let mut lines = vec![
        Line::from(""),
        field_line("Topic", topic, setup.field == SetupField::Topic),
        field_line(
            "Questions",
            format!("◂ {} ▸  (max {})", setup.question_count, MAX_QUESTIONS),
            setup.field == SetupField::QuestionCount,
        ),
        field_line(
            "Exam style",
            format!("◂ {} ▸", setup.exam_style.label()),
            setup.field == SetupField::ExamStyle,
        ),
        field_line(
            "Difficulty",
            format!("◂ {} ▸", setup.difficulty.label()),
            setup.field == SetupField::Difficulty,
        ),
        field_line("Timer", timer, setup.field == SetupField::Timer),
    ];
    if app.busy {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Generating questions...",
            Style::default().fg(Color::Yellow),
        )));
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(form, layout.body_area);

    if setup.field == SetupField::Topic {
        // Border, blank line, then the marker and padded label.
        let x = layout.body_area.x + 1 + 16 + topic_cursor as u16;
        let y = layout.body_area.y + 2;
        f.set_cursor_position((x, y));
    }

    let help = help_bar(vec![help_line(&[
        ("Tab/↑/↓", "Field"),
        ("←/→", "Change"),
        ("Ctrl+R", "Random Topic"),
        ("Enter", "Generate"),
        ("Esc", "Back"),
    ])]);
    f.render_widget(help, layout.help_area);
}
