use super::layout::calculate_screen_chunks;
use super::{help_bar, help_line, title_bar};
use crate::app::App;
use crate::render::{blocks_to_plain_text, render_blocks};
use crate::utils::truncate_string;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_results(f: &mut Frame, app: &App) {
    let Some(session) = app.quiz.as_ref() else {
        return;
    };
    let layout = calculate_screen_chunks(f.area());

    f.render_widget(
        title_bar(format!("Results - {}", session.config().topic)),
        layout.header_area,
    );

    let total = session.active_questions().len();
    let score = session.score();
    let percent = if total == 0 { 0 } else { score * 100 / total };
    let score_color = match percent {
        80.. => Color::Green,
        50..=79 => Color::Yellow,
        _ => Color::Red,
    };

    let mut summary = Text::default();
    summary.push_line(Line::from(Span::styled(
        format!("Score: {} / {} ({}%)", score, total, percent),
        Style::default()
            .fg(score_color)
            .add_modifier(Modifier::BOLD),
    )));
    let mut details = format!(
        "{} - {} - {} questions",
        session.config().exam_style.label(),
        session.config().difficulty.label(),
        session.original_questions().len()
    );
    if session.is_retake_subset() {
        details.push_str(" - retake of incorrect answers (not saved to history)");
    }
    summary.push_line(Line::from(details));
    summary.push_line(Line::from(""));

    for (i, question) in session.active_questions().iter().enumerate() {
        let (mark, color) = if session.is_correct(i) {
            ("[✓]", Color::Green)
        } else {
            ("[✗]", Color::Red)
        };
        let prompt = blocks_to_plain_text(&render_blocks(&question.prompt)).replace('\n', " ");
        summary.push_line(Line::from(vec![
            Span::styled(mark, Style::default().fg(color)),
            Span::from(format!(" {}. {}", i + 1, truncate_string(&prompt, 80))),
        ]));
        let answer = session
            .user_answers()
            .get(i)
            .copied()
            .flatten()
            .and_then(|a| question.options.get(a))
            .map(|a| truncate_string(a, 60))
            .unwrap_or_else(|| "(no answer)".to_string());
        summary.push_line(Line::from(format!("    Your Answer: {}", answer)));
    }

    let body = Paragraph::new(summary)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, layout.body_area);

    let help = help_bar(vec![help_line(&[
        ("a", "Retake All"),
        ("w", "Retake Wrong"),
        ("r", "Review"),
        ("e", "Export"),
        ("s", "Export + Solutions"),
        ("m", "Menu"),
    ])]);
    f.render_widget(help, layout.help_area);
}
