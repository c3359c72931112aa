pub mod layout;
mod history;
mod menu;
mod quiz;
mod results;
mod search;
mod setup;

pub use history::format_record_date;
pub use layout::{calculate_quiz_chunks, calculate_screen_chunks, calculate_search_chunks};

use crate::app::{App, Screen};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    match app.screen {
        Screen::Menu => menu::draw_menu(f, app),
        Screen::Search => search::draw_search(f, app),
        Screen::QuizSetup => setup::draw_setup(f, app),
        Screen::Quiz => quiz::draw_quiz(f, app),
        Screen::Results => results::draw_results(f, app),
        Screen::History => history::draw_history(f, app),
        Screen::QuitConfirm => quiz::draw_quit_confirmation(f),
    }

    if let Some(notice) = app.notice.as_deref() {
        draw_notice(f, notice);
    }
}

pub(crate) fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Help bar line from `(key, label)` pairs.
pub(crate) fn help_line(items: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(items.len() * 2);
    for (i, (key, label)) in items.iter().enumerate() {
        spans.push(Span::styled(key.to_string(), key_style()));
        let sep = if i + 1 < items.len() { "  " } else { "" };
        spans.push(Span::from(format!(" {}{}", label, sep)));
    }
    Line::from(spans)
}

pub(crate) fn title_bar(text: String) -> Paragraph<'static> {
    Paragraph::new(text)
        .style(key_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

pub(crate) fn help_bar(lines: Vec<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn draw_notice(f: &mut Frame, notice: &str) {
    let area = f.area();
    let width = area.width.saturating_sub(8).min(70);
    let height = 3;
    let rect = ratatui::layout::Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + area.height.saturating_sub(height + 4),
        width,
        height.min(area.height),
    );

    let popup = Paragraph::new(notice.to_string())
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title("Notice"),
        );
    f.render_widget(Clear, rect);
    f.render_widget(popup, rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::history::MemoryStore;
    use crate::models::{Question, QuizConfig};
    use crate::quiz::QuizSession;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::mpsc;

    fn app() -> App {
        let config = AppConfig::from_lookup(
            |key| (key == "STUDY_ASSISTANT_DATA_DIR").then(|| "/tmp/study-assistant-ui".to_string()),
            || None,
        );
        let (tx, _rx) = mpsc::channel();
        App::new(&config, Box::new(MemoryStore::new()), tx, false)
    }

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn quiz_session() -> QuizSession {
        let question = Question {
            prompt: "Solve $x^2 = 4$".to_string(),
            options: [
                "2".to_string(),
                "4".to_string(),
                "8".to_string(),
                "16".to_string(),
            ],
            correct_option_index: 0,
            explanation: "Square root".to_string(),
        };
        let config = QuizConfig {
            topic: "Algebra".to_string(),
            ..QuizConfig::default()
        };
        QuizSession::start(vec![question], config)
    }

    #[test]
    fn test_help_line_spacing() {
        let line = help_line(&[("Enter", "Select"), ("Esc", "Back")]);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Enter Select  Esc Back");
    }

    #[test]
    fn test_menu_shows_ai_status() {
        let mut app = app();
        let screen = render(&mut app);
        assert!(screen.contains("Study Assistant"));
        assert!(screen.contains("AI: Disabled"));
        assert!(screen.contains("New Quiz"));
    }

    #[test]
    fn test_quiz_screen_renders_normalized_prompt() {
        let mut app = app();
        app.quiz = Some(quiz_session());
        app.screen = Screen::Quiz;
        let screen = render(&mut app);
        assert!(screen.contains("Solve x² = 4"));
        assert!(screen.contains("Question 1 / 1"));
    }

    #[test]
    fn test_results_screen_shows_score() {
        let mut app = app();
        let mut session = quiz_session();
        session.select_option(0);
        session.finish();
        app.quiz = Some(session);
        app.screen = Screen::Results;
        let screen = render(&mut app);
        assert!(screen.contains("Score: 1 / 1"));
    }

    #[test]
    fn test_notice_is_drawn_on_top() {
        let mut app = app();
        app.notice = Some("Search failed. Please try again.".to_string());
        let screen = render(&mut app);
        assert!(screen.contains("Search failed. Please try again."));
    }
}
