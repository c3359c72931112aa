use crate::error::ProviderError;
use crate::models::{Question, SearchResult, Source, OPTION_COUNT};
use serde::Deserialize;

/// Strip code fences and surrounding chatter, keeping the outermost
/// `open`..`close` delimited region.
pub fn clean_json_response(response: &str, open: char, close: char) -> String {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    if let Some(start) = cleaned.find(open)
        && let Some(end) = cleaned.rfind(close)
        && start < end
    {
        cleaned = cleaned[start..=end].to_string();
    }

    cleaned.trim().to_string()
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(alias = "question")]
    prompt: String,
    options: Vec<String>,
    #[serde(
        alias = "correctOptionIndex",
        alias = "correctAnswerIndex",
        alias = "correct_answer_index"
    )]
    correct_option_index: i64,
    #[serde(default)]
    explanation: String,
}

/// Parse a generated question set. The whole call fails on the first
/// malformed entry; there is no partial recovery.
pub fn parse_questions(response: &str) -> Result<Vec<Question>, ProviderError> {
    let cleaned = clean_json_response(response, '[', ']');
    let raw: Vec<RawQuestion> = serde_json::from_str(&cleaned)
        .map_err(|e| ProviderError::Parse(format!("{}\nRaw: {}", e, response)))?;

    if raw.is_empty() {
        return Err(ProviderError::Shape("empty question list".to_string()));
    }

    raw.into_iter()
        .enumerate()
        .map(|(i, q)| {
            let option_count = q.options.len();
            let options: [String; OPTION_COUNT] = q.options.try_into().map_err(|_| {
                ProviderError::Shape(format!(
                    "question {} has {} options, expected {}",
                    i + 1,
                    option_count,
                    OPTION_COUNT
                ))
            })?;
            if !(0..OPTION_COUNT as i64).contains(&q.correct_option_index) {
                return Err(ProviderError::Shape(format!(
                    "question {} has correct index {}",
                    i + 1,
                    q.correct_option_index
                )));
            }
            if q.prompt.trim().is_empty() {
                return Err(ProviderError::Shape(format!("question {} has no prompt", i + 1)));
            }
            Ok(Question {
                prompt: q.prompt,
                options,
                correct_option_index: q.correct_option_index as usize,
                explanation: q.explanation,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(alias = "url")]
    uri: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    #[serde(alias = "text")]
    answer: String,
    #[serde(default)]
    sources: Vec<RawSource>,
}

/// Title shown for a cited source that came back with neither a URI nor a title.
pub const UNKNOWN_SOURCE: &str = "unknown source";

pub fn parse_search(response: &str) -> Result<SearchResult, ProviderError> {
    let cleaned = clean_json_response(response, '{', '}');
    let raw: RawSearch = serde_json::from_str(&cleaned)
        .map_err(|e| ProviderError::Parse(format!("{}\nRaw: {}", e, response)))?;

    // `[n]` citations index into this list, so every entry keeps its slot.
    let sources = raw
        .sources
        .into_iter()
        .map(|s| {
            let uri = s.uri.trim().to_string();
            let title = if !s.title.trim().is_empty() {
                s.title
            } else if !uri.is_empty() {
                uri.clone()
            } else {
                UNKNOWN_SOURCE.to_string()
            };
            Source { uri, title }
        })
        .collect();

    Ok(SearchResult {
        text: raw.answer,
        sources,
    })
}
