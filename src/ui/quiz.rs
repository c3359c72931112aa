use super::layout::calculate_quiz_chunks;
use super::{help_bar, help_line, title_bar};
use crate::app::App;
use crate::quiz::{dot_states, option_state, DotStatus, OptionState, Phase, QuizSession};
use crate::render::{blocks_to_plain_text, render_blocks, render_markdown};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn header_text(session: &QuizSession) -> String {
    let mut text = format!(
        "Question {} / {} - {}",
        session.current_index() + 1,
        session.active_questions().len(),
        session.config().topic
    );
    if session.phase() == Phase::Reviewing {
        text.push_str("  [Review]");
    } else if session.is_retake_subset() {
        text.push_str("  [Retake]");
    }
    if session.timer_running() {
        text.push_str(&format!("  ⏱ {}", format_clock(session.time_remaining_seconds())));
    }
    text
}

fn dots_line(session: &QuizSession) -> Line<'static> {
    let spans: Vec<Span> = dot_states(session)
        .into_iter()
        .map(|dot| {
            let (symbol, color) = match dot.status {
                DotStatus::Unanswered => ("○", Color::DarkGray),
                DotStatus::Answered => ("●", Color::Yellow),
                DotStatus::Correct => ("●", Color::Green),
                DotStatus::Incorrect => ("●", Color::Red),
            };
            let mut style = Style::default().fg(color);
            if dot.current {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            Span::styled(format!(" {} ", symbol), style)
        })
        .collect();
    Line::from(spans)
}

fn options_text(session: &QuizSession) -> Text<'static> {
    let index = session.current_index();
    let mut text = Text::default();
    let Some(question) = session.current_question() else {
        return text;
    };

    for (opt, option) in question.options.iter().enumerate() {
        let letter = (b'A' + opt as u8) as char;
        let label = blocks_to_plain_text(&render_blocks(option)).replace('\n', " ");
        let (marker, style) = match option_state(session, index, opt) {
            OptionState::Neutral => ("  ", Style::default()),
            OptionState::Selected => (
                "▸ ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            OptionState::Correct => (
                "✓ ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            OptionState::Incorrect => (
                "✗ ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        };
        text.push_line(Line::from(Span::styled(
            format!("{}{}. {}", marker, letter, label),
            style,
        )));
        text.push_line(Line::from(""));
    }

    let revealed = session.submitted().get(index).copied().unwrap_or(false);
    if revealed && !question.explanation.trim().is_empty() {
        text.push_line(Line::from(Span::styled(
            "Explanation:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        text.extend(render_markdown(&question.explanation));
    }
    text
}

fn help_lines(session: &QuizSession) -> Vec<Line<'static>> {
    match session.phase() {
        Phase::Reviewing => vec![
            help_line(&[("←/→", "Navigate"), ("Home/End", "First/Last")]),
            help_line(&[("Esc/f", "Back to Results"), ("Ctrl+C", "Exit App")]),
        ],
        _ => {
            let enter = if session.is_timed() { "Next" } else { "Submit/Next" };
            vec![
                help_line(&[
                    ("1-4/a-d", "Choose"),
                    ("Enter", enter),
                    ("←/→", "Navigate"),
                ]),
                help_line(&[
                    ("f", "Finish"),
                    ("Esc", "Quit to Menu"),
                    ("Ctrl+C", "Exit App"),
                ]),
            ]
        }
    }
}

pub fn draw_quiz(f: &mut Frame, app: &App) {
    let Some(session) = app.quiz.as_ref() else {
        return;
    };
    let layout = calculate_quiz_chunks(f.area());

    f.render_widget(title_bar(header_text(session)), layout.header_area);
    f.render_widget(
        Paragraph::new(dots_line(session)).alignment(Alignment::Center),
        layout.dots_area,
    );

    let prompt = session
        .current_question()
        .map(|q| render_markdown(&q.prompt))
        .unwrap_or_default();
    let question = Paragraph::new(prompt)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, layout.question_area);

    let options = Paragraph::new(options_text(session))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Options"));
    f.render_widget(options, layout.options_area);

    f.render_widget(help_bar(help_lines(session)), layout.help_area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit to Menu")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Leave this quiz? Progress will not be saved.")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (Return to Menu)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Continue Quiz)  "),
        Span::styled(
            "Ctrl+C",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, QuizConfig};

    fn session(timed: bool) -> QuizSession {
        let question = Question {
            prompt: "p".to_string(),
            options: [
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
            ],
            correct_option_index: 2,
            explanation: "because".to_string(),
        };
        let config = QuizConfig {
            topic: "Topic".to_string(),
            timer_enabled: timed,
            ..QuizConfig::default()
        };
        QuizSession::start(vec![question.clone(), question], config)
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(180), "03:00");
        assert_eq!(format_clock(59), "00:59");
    }

    #[test]
    fn test_header_shows_countdown_only_when_timed() {
        assert!(header_text(&session(true)).ends_with("⏱ 03:00"));
        assert_eq!(header_text(&session(false)), "Question 1 / 2 - Topic");
    }

    #[test]
    fn test_options_reveal_explanation_after_submit() {
        let mut s = session(false);
        s.select_option(0);
        let before: Vec<String> = options_text(&s).lines.iter().map(|l| l.to_string()).collect();
        assert!(before.contains(&"▸ A. a".to_string()));
        assert!(!before.iter().any(|l| l == "Explanation:"));

        s.submit_current();
        let after: Vec<String> = options_text(&s).lines.iter().map(|l| l.to_string()).collect();
        assert!(after.contains(&"✗ A. a".to_string()));
        assert!(after.contains(&"✓ C. c".to_string()));
        assert!(after.iter().any(|l| l == "Explanation:"));
    }

    #[test]
    fn test_dots_mark_current() {
        let s = session(false);
        let line = dots_line(&s);
        assert_eq!(line.spans.len(), 2);
        assert!(line.spans[0].style.add_modifier.contains(Modifier::REVERSED));
        assert!(!line.spans[1].style.add_modifier.contains(Modifier::REVERSED));
    }
}
