use crate::logger;
use crate::models::Question;
use crate::render::{blocks_to_plain_text, render_blocks};
use crate::utils::slugify;
use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

const PAGE_BREAK: char = '\u{000C}';
const CORRECT_MARK: &str = "✓";
/// Lines reserved at the bottom of every page: a blank line and the footer.
const FOOTER_LINES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    QuestionsOnly,
    WithSolutions,
}

impl ExportMode {
    pub fn label(&self) -> &'static str {
        match self {
            ExportMode::QuestionsOnly => "questions only",
            ExportMode::WithSolutions => "with solutions",
        }
    }
}

fn plain(text: &str) -> String {
    blocks_to_plain_text(&render_blocks(text))
}

/// One card per question, each a list of printable lines ending in a blank
/// separator line.
pub fn render_cards(questions: &[Question], mode: ExportMode) -> Vec<Vec<String>> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let mut card = vec![format!("Question {}", i + 1)];
            card.extend(plain(&q.prompt).lines().map(str::to_string));
            for (opt_idx, option) in q.options.iter().enumerate() {
                let letter = (b'A' + opt_idx as u8) as char;
                let mut line = format!("  {}. {}", letter, plain(option).replace('\n', " "));
                if mode == ExportMode::WithSolutions && opt_idx == q.correct_option_index {
                    line.push(' ');
                    line.push_str(CORRECT_MARK);
                }
                card.push(line);
            }
            if mode == ExportMode::WithSolutions && !q.explanation.trim().is_empty() {
                let explanation = plain(&q.explanation);
                let mut lines = explanation.lines();
                if let Some(first) = lines.next() {
                    card.push(format!("  Explanation: {}", first));
                }
                card.extend(lines.map(|l| format!("  {}", l)));
            }
            card.push(String::new());
            card
        })
        .collect()
}

/// Greedy page packing. Cards are never split across pages; a card taller
/// than a page gets a page of its own. Returns card indices per page.
pub fn paginate(cards: &[Vec<String>], page_height: usize) -> Vec<Vec<usize>> {
    let body_height = page_height.saturating_sub(FOOTER_LINES).max(1);
    let mut pages: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut used = 0;

    for (i, card) in cards.iter().enumerate() {
        if !current.is_empty() && used + card.len() > body_height {
            pages.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(i);
        used += card.len();
    }
    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

pub fn render_document(
    title: &str,
    questions: &[Question],
    mode: ExportMode,
    page_height: usize,
) -> String {
    let mut cards = render_cards(questions, mode);
    if let Some(first) = cards.first_mut() {
        let mut header = vec![title.to_string(), format!("({})", mode.label()), String::new()];
        header.append(first);
        *first = header;
    }

    let pages = paginate(&cards, page_height);
    let total = pages.len().max(1);
    let mut rendered_pages = Vec::with_capacity(total);

    for (page_idx, card_indices) in pages.iter().enumerate() {
        let mut page = String::new();
        for &card_idx in card_indices {
            for line in &cards[card_idx] {
                page.push_str(line);
                page.push('\n');
            }
        }
        page.push('\n');
        page.push_str(&format!("Page {} / {}\n", page_idx + 1, total));
        rendered_pages.push(page);
    }

    if rendered_pages.is_empty() {
        rendered_pages.push(format!("{}\n\nPage 1 / 1\n", title));
    }

    rendered_pages.join(&PAGE_BREAK.to_string())
}

/// Write the document into `dir` as `quiz-<slug>-<timestamp>.txt`.
pub fn write_export(
    dir: &Path,
    title: &str,
    questions: &[Question],
    mode: ExportMode,
    page_height: usize,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let suffix = match mode {
        ExportMode::QuestionsOnly => "",
        ExportMode::WithSolutions => "-solutions",
    };
    let path = dir.join(format!("quiz-{}-{}{}.txt", slugify(title), stamp, suffix));
    let document = render_document(title, questions, mode, page_height);

    fs::write(&path, document)
        .with_context(|| format!("Failed to write export {}", path.display()))?;
    logger::log(&format!(
        "Exported {} questions ({}) to {}",
        questions.len(),
        mode.label(),
        path.display()
    ));
    Ok(path)
}
