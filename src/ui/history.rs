use super::layout::calculate_screen_chunks;
use super::{help_bar, help_line, title_bar};
use crate::app::App;
use crate::models::HistoryRecord;
use crate::utils::truncate_string;
use ratatui::{
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use std::time::{Duration, UNIX_EPOCH};

const DATE_FORMAT_TODAY: &str = "Today %H:%M";
const DATE_FORMAT_YESTERDAY: &str = "Yesterday %H:%M";
const DATE_FORMAT_OTHER: &str = "%Y-%m-%d";

pub fn format_record_date(timestamp: u64) -> String {
    let record_time = UNIX_EPOCH + Duration::from_secs(timestamp);
    let datetime: chrono::DateTime<chrono::Local> = record_time.into();

    let today = chrono::Local::now();
    let record_date = datetime.date_naive();

    if record_date == today.date_naive() {
        datetime.format(DATE_FORMAT_TODAY).to_string()
    } else if record_date == today.date_naive() - chrono::Duration::days(1) {
        datetime.format(DATE_FORMAT_YESTERDAY).to_string()
    } else {
        datetime.format(DATE_FORMAT_OTHER).to_string()
    }
}

fn format_record_item(record: &HistoryRecord) -> String {
    format!(
        "{} - {}",
        format_record_date(record.timestamp()),
        truncate_string(&record.title(), 70)
    )
}

pub fn draw_history(f: &mut Frame, app: &App) {
    let layout = calculate_screen_chunks(f.area());

    let records = app.history.records();
    f.render_widget(
        title_bar(format!("History ({} entries)", records.len())),
        layout.header_area,
    );

    let items: Vec<ListItem> = if records.is_empty() {
        vec![ListItem::new("No history yet").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let style = if i == app.history_index {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format_record_item(record)).style(style)
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(list, layout.body_area);

    let help = help_bar(vec![help_line(&[
        ("↑/↓", "Navigate"),
        ("Enter", "Open"),
        ("d", "Delete"),
        ("Esc", "Back"),
    ])]);
    f.render_widget(help, layout.help_area);
}
