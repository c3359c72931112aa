use super::client::{ModelConfig, OpenRouterClient};
use super::parse::{parse_questions, parse_search};
use crate::attachments::Attachment;
use crate::error::ProviderError;
use crate::logger;
use crate::models::{Question, QuizConfig, SearchResult};
use async_trait::async_trait;
use openrouter_api::types::chat::{ContentPart, ImageContent, ImageUrl, TextContent};

const SEARCH_SYSTEM: &str = "You are a study assistant. Answer accurately and cite your sources.";
const QUIZ_SYSTEM: &str =
    "You are an exam writer producing multiple-choice practice questions. Respond with JSON only.";
/// Text attachments larger than this are cut before being inlined.
const MAX_INLINE_ATTACHMENT_CHARS: usize = 20_000;

/// Source of generated content. Every call is a single terminal attempt.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        attachments: &[Attachment],
    ) -> Result<SearchResult, ProviderError>;

    async fn generate_quiz(&self, config: &QuizConfig) -> Result<Vec<Question>, ProviderError>;
}

pub fn build_search_prompt(query: &str, attachments: &[Attachment]) -> String {
    let mut prompt = format!(
        r#"Answer the following study question.

Question: {}
"#,
        query.trim()
    );

    for attachment in attachments {
        if attachment.is_text() {
            let text = String::from_utf8_lossy(&attachment.data);
            let text: String = text.chars().take(MAX_INLINE_ATTACHMENT_CHARS).collect();
            prompt.push_str(&format!(
                "\nAttached file `{}`:\n---\n{}\n---\n",
                attachment.name, text
            ));
        } else {
            prompt.push_str(&format!(
                "\nThe user attached `{}` ({}), included after this message.\n",
                attachment.name, attachment.mime_type
            ));
        }
    }

    prompt.push_str(
        r#"
IMPORTANT:

- Respond ONLY with this exact JSON structure (no extra text):
{
    "answer": "markdown answer; use #/##/### headings, - or 1. lists, **bold**, *italic* and $...$ for math; cite sources inline as [1], [2]",
    "sources": [{"uri": "https://...", "title": "source title"}]
}
- Citation numbers refer to positions in "sources", starting at 1.
"#,
    );
    prompt
}

/// User turn for a search: the prompt text, then one base64 data-URL part
/// per binary attachment, in attachment order.
pub fn build_search_parts(query: &str, attachments: &[Attachment]) -> Vec<ContentPart> {
    let mut parts = vec![ContentPart::Text(TextContent {
        content_type: "text".to_string(),
        text: build_search_prompt(query, attachments),
    })];
    parts.extend(
        attachments
            .iter()
            .filter(|a| !a.is_text())
            .map(|a| {
                ContentPart::Image(ImageContent {
                    content_type: "image_url".to_string(),
                    image_url: ImageUrl {
                        url: a.data_url(),
                        detail: None,
                    },
                })
            }),
    );
    parts
}

pub fn build_quiz_prompt(config: &QuizConfig) -> String {
    format!(
        r#"Write {count} multiple-choice questions about: {topic}

Exam style: {style}
Difficulty: {difficulty}

IMPORTANT:

- Respond ONLY with a JSON array, no markdown fences, in exactly this shape:
[
    {{
        "question": "question text",
        "options": ["option A", "option B", "option C", "option D"],
        "correctAnswerIndex": integer between 0 and 3,
        "explanation": "why the correct option is right"
    }}
]
- Every question has exactly 4 options and exactly one correct option.
- Use $...$ for math notation.
"#,
        count = config.question_count,
        topic = config.topic.trim(),
        style = config.exam_style.label(),
        difficulty = config.difficulty.label(),
    )
}

#[derive(Debug)]
pub struct OpenRouterProvider {
    client: OpenRouterClient,
    config: ModelConfig,
}

impl OpenRouterProvider {
    pub fn new(config: ModelConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: OpenRouterClient::new()?,
            config,
        })
    }
}

#[async_trait]
impl ContentProvider for OpenRouterProvider {
    async fn search(
        &self,
        query: &str,
        attachments: &[Attachment],
    ) -> Result<SearchResult, ProviderError> {
        logger::log(&format!(
            "Search request: {} ({} attachments)",
            query,
            attachments.len()
        ));
        let response = if attachments.iter().all(Attachment::is_text) {
            let prompt = build_search_prompt(query, attachments);
            self.client.complete(SEARCH_SYSTEM, &prompt, &self.config).await?
        } else {
            let parts = build_search_parts(query, attachments);
            self.client
                .complete_parts(SEARCH_SYSTEM, parts, &self.config)
                .await?
        };
        logger::log(&format!("Raw search response: {}", response));
        parse_search(&response)
    }

    async fn generate_quiz(&self, config: &QuizConfig) -> Result<Vec<Question>, ProviderError> {
        logger::log(&format!(
            "Quiz request: {} x{} ({}, {})",
            config.topic,
            config.question_count,
            config.exam_style.label(),
            config.difficulty.label()
        ));
        let prompt = build_quiz_prompt(config);
        let response = self.client.complete(QUIZ_SYSTEM, &prompt, &self.config).await?;
        logger::log(&format!("Raw quiz response: {}", response));
        parse_questions(&response)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted provider for tests. Replies are consumed in order; an
    /// exhausted script answers with a transport error.
    pub struct MockProvider {
        searches: Mutex<Vec<Result<SearchResult, ProviderError>>>,
        quizzes: Mutex<Vec<Result<Vec<Question>, ProviderError>>>,
        delay: Duration,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                searches: Mutex::new(Vec::new()),
                quizzes: Mutex::new(Vec::new()),
                delay: Duration::from_millis(0),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn push_search(self, reply: Result<SearchResult, ProviderError>) -> Self {
            self.searches.lock().unwrap().push(reply);
            self
        }

        pub fn push_quiz(self, reply: Result<Vec<Question>, ProviderError>) -> Self {
            self.quizzes.lock().unwrap().push(reply);
            self
        }
    }

    fn next<T>(queue: &Mutex<Vec<Result<T, ProviderError>>>) -> Result<T, ProviderError> {
        let mut queue = queue.lock().unwrap();
        if queue.is_empty() {
            Err(ProviderError::Transport("no scripted reply".to_string()))
        } else {
            queue.remove(0)
        }
    }

    #[async_trait]
    impl ContentProvider for MockProvider {
        async fn search(
            &self,
            _query: &str,
            _attachments: &[Attachment],
        ) -> Result<SearchResult, ProviderError> {
            tokio::time::sleep(self.delay).await;
            next(&self.searches)
        }

        async fn generate_quiz(
            &self,
            _config: &QuizConfig,
        ) -> Result<Vec<Question>, ProviderError> {
            tokio::time::sleep(self.delay).await;
            next(&self.quizzes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockProvider;
    use super::*;
    use crate::models::{Difficulty, ExamStyle};

    fn config() -> QuizConfig {
        QuizConfig {
            topic: "  Thermodynamics ".to_string(),
            question_count: 10,
            exam_style: ExamStyle::AdvancedPlacement,
            difficulty: Difficulty::Hard,
            timer_enabled: false,
        }
    }

    #[test]
    fn test_quiz_prompt_mentions_config() {
        let prompt = build_quiz_prompt(&config());
        assert!(prompt.contains("Write 10 multiple-choice questions about: Thermodynamics"));
        assert!(prompt.contains("Exam style: AP"));
        assert!(prompt.contains("Difficulty: Hard"));
        assert!(prompt.contains("\"correctAnswerIndex\""));
    }

    fn mixed_attachments() -> Vec<Attachment> {
        vec![
            Attachment {
                name: "notes.txt".to_string(),
                mime_type: "text/plain".to_string(),
                data: b"Krebs cycle".to_vec(),
            },
            Attachment {
                name: "diagram.png".to_string(),
                mime_type: "image/png".to_string(),
                data: vec![0; 16],
            },
            Attachment {
                name: "paper.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
                data: b"%PDF".to_vec(),
            },
        ]
    }

    #[test]
    fn test_search_prompt_inlines_text_and_names_binary() {
        let prompt = build_search_prompt("What is ATP?", &mixed_attachments());
        assert!(prompt.contains("Question: What is ATP?"));
        assert!(prompt.contains("Krebs cycle"));
        assert!(prompt.contains("`diagram.png` (image/png), included after this message"));
        assert!(prompt.contains("`paper.pdf` (application/pdf)"));
    }

    #[test]
    fn test_search_parts_carry_binary_payloads() {
        let parts = build_search_parts("What is ATP?", &mixed_attachments());
        assert_eq!(parts.len(), 3);
        match &parts[0] {
            ContentPart::Text(text) => assert!(text.text.contains("Krebs cycle")),
            other => panic!("expected the prompt first, got {:?}", other),
        }
        let urls: Vec<&str> = parts[1..]
            .iter()
            .map(|part| match part {
                ContentPart::Image(image) => image.image_url.url.as_str(),
                other => panic!("expected a data part, got {:?}", other),
            })
            .collect();
        assert_eq!(urls[0], "data:image/png;base64,AAAAAAAAAAAAAAAAAAAAAA==");
        assert_eq!(urls[1], "data:application/pdf;base64,JVBERg==");

        let message = openrouter_api::types::chat::Message::multimodal("user", parts);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["content"][1]["type"], "image_url");
    }

    #[test]
    fn test_text_only_search_has_single_part() {
        let attachments = &mixed_attachments()[..1];
        assert_eq!(build_search_parts("q", attachments).len(), 1);
    }

    #[tokio::test]
    async fn test_mock_provider_replays_script() {
        let provider = MockProvider::new()
            .push_search(Ok(SearchResult {
                text: "answer".to_string(),
                sources: vec![],
            }))
            .push_quiz(Err(ProviderError::Parse("bad".to_string())));

        let result = provider.search("q", &[]).await.unwrap();
        assert_eq!(result.text, "answer");
        assert!(provider.generate_quiz(&config()).await.is_err());
        assert!(matches!(
            provider.search("q", &[]).await,
            Err(ProviderError::Transport(_))
        ));
    }
}
