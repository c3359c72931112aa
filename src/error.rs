use std::fmt;

pub const SEARCH_FAILED: &str = "Search failed. Please try again.";
pub const QUIZ_GENERATION_FAILED: &str = "Quiz generation failed. Please try again.";

/// Which external call a [`ProviderError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    GenerateQuiz,
}

/// Failure at the AI provider boundary. Always terminal for the call that
/// produced it; retrying means issuing a brand-new request.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Client could not be constructed (missing key, bad model config).
    Config(String),
    Transport(String),
    /// Response was not well-formed JSON.
    Parse(String),
    /// JSON parsed but did not have the expected shape.
    Shape(String),
}

impl ProviderError {
    /// The single message surfaced to the user, regardless of detail.
    pub fn user_message(&self, operation: Operation) -> &'static str {
        match operation {
            Operation::Search => SEARCH_FAILED,
            Operation::GenerateQuiz => QUIZ_GENERATION_FAILED,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "provider configuration error: {}", msg),
            ProviderError::Transport(msg) => write!(f, "provider transport error: {}", msg),
            ProviderError::Parse(msg) => write!(f, "failed to parse provider response: {}", msg),
            ProviderError::Shape(msg) => write!(f, "unexpected provider response shape: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Invalid user input, rejected before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    EmptyQuery,
    EmptyTopic,
    QuestionCount { requested: usize, min: usize, max: usize },
    TooManyAttachments { max: usize },
    UnsupportedAttachment { name: String },
    AttachmentRead { name: String, reason: String },
    AttachmentTooLarge { name: String, max_bytes: u64 },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::EmptyQuery => write!(f, "Type a question before searching."),
            InputError::EmptyTopic => write!(f, "Enter a topic for the quiz."),
            InputError::QuestionCount {
                requested,
                min,
                max,
            } => write!(
                f,
                "Question count {} is out of range ({}-{}).",
                requested, min, max
            ),
            InputError::TooManyAttachments { max } => {
                write!(f, "You can attach at most {} files.", max)
            }
            InputError::UnsupportedAttachment { name } => {
                write!(f, "Unsupported attachment type: {}", name)
            }
            InputError::AttachmentRead { name, reason } => {
                write!(f, "Could not read {}: {}", name, reason)
            }
            InputError::AttachmentTooLarge { name, max_bytes } => write!(
                f,
                "{} is larger than the {} MB attachment limit.",
                name,
                max_bytes / (1024 * 1024)
            ),
        }
    }
}

impl std::error::Error for InputError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_detail() {
        let err = ProviderError::Parse("expected `[` at line 1".to_string());
        assert_eq!(err.user_message(Operation::GenerateQuiz), QUIZ_GENERATION_FAILED);
        assert_eq!(err.user_message(Operation::Search), SEARCH_FAILED);
        assert!(err.to_string().contains("expected `[`"));
    }

    #[test]
    fn test_input_error_display() {
        let err = InputError::QuestionCount {
            requested: 50,
            min: 1,
            max: 30,
        };
        assert_eq!(err.to_string(), "Question count 50 is out of range (1-30).");
        assert_eq!(
            InputError::TooManyAttachments { max: 3 }.to_string(),
            "You can attach at most 3 files."
        );
    }
}
