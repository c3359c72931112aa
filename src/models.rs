use crate::error::InputError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const OPTION_COUNT: usize = 4;
pub const MIN_QUESTIONS: usize = 1;
pub const MAX_QUESTIONS: usize = 30;
/// Choices offered by the setup form.
pub const QUESTION_COUNT_STEPS: &[usize] = &[5, 10, 15, 20, 25, 30];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub correct_option_index: usize,
    pub explanation: String,
}

impl Question {
    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct_option_index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamStyle {
    General,
    Sat,
    Act,
    Gre,
    AdvancedPlacement,
    University,
}

impl ExamStyle {
    pub const ALL: [ExamStyle; 6] = [
        ExamStyle::General,
        ExamStyle::Sat,
        ExamStyle::Act,
        ExamStyle::Gre,
        ExamStyle::AdvancedPlacement,
        ExamStyle::University,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExamStyle::General => "General",
            ExamStyle::Sat => "SAT",
            ExamStyle::Act => "ACT",
            ExamStyle::Gre => "GRE",
            ExamStyle::AdvancedPlacement => "AP",
            ExamStyle::University => "University",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Mixed,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Mixed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Mixed => "Mixed",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: usize) -> T {
    let pos = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(pos + step) % all.len()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    pub topic: String,
    pub question_count: usize,
    pub exam_style: ExamStyle,
    pub difficulty: Difficulty,
    pub timer_enabled: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            topic: String::new(),
            question_count: QUESTION_COUNT_STEPS[0],
            exam_style: ExamStyle::General,
            difficulty: Difficulty::Medium,
            timer_enabled: false,
        }
    }
}

impl QuizConfig {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.topic.trim().is_empty() {
            return Err(InputError::EmptyTopic);
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.question_count) {
            return Err(InputError::QuestionCount {
                requested: self.question_count,
                min: MIN_QUESTIONS,
                max: MAX_QUESTIONS,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub text: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub id: Uuid,
    pub query: String,
    pub result: SearchResult,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: Uuid,
    pub config: QuizConfig,
    pub questions: Vec<Question>,
    pub user_answers: Vec<Option<usize>>,
    pub score: usize,
    pub total_questions: usize,
    pub timestamp: u64,
}

/// One entry in the persisted history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryRecord {
    Search(SearchRecord),
    Quiz(QuizRecord),
}

impl HistoryRecord {
    pub fn id(&self) -> Uuid {
        match self {
            HistoryRecord::Search(record) => record.id,
            HistoryRecord::Quiz(record) => record.id,
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            HistoryRecord::Search(record) => record.timestamp,
            HistoryRecord::Quiz(record) => record.timestamp,
        }
    }

    pub fn title(&self) -> String {
        match self {
            HistoryRecord::Search(record) => format!("Search: {}", record.query),
            HistoryRecord::Quiz(record) => format!(
                "Quiz: {} ({}/{})",
                record.config.topic, record.score, record.total_questions
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = QuizConfig {
            topic: "  ".to_string(),
            ..QuizConfig::default()
        };
        assert_eq!(config.validate(), Err(InputError::EmptyTopic));

        config.topic = "Photosynthesis".to_string();
        assert!(config.validate().is_ok());

        config.question_count = 0;
        assert!(matches!(
            config.validate(),
            Err(InputError::QuestionCount { requested: 0, .. })
        ));
        config.question_count = MAX_QUESTIONS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enum_cycling_wraps() {
        assert_eq!(ExamStyle::University.next(), ExamStyle::General);
        assert_eq!(ExamStyle::General.prev(), ExamStyle::University);
        assert_eq!(Difficulty::Mixed.next(), Difficulty::Easy);
        assert_eq!(Difficulty::Easy.prev(), Difficulty::Mixed);
    }

    #[test]
    fn test_history_record_tagging() {
        let record = HistoryRecord::Search(SearchRecord {
            id: Uuid::new_v4(),
            query: "what is entropy".to_string(),
            result: SearchResult::default(),
            timestamp: 1,
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "search");
        assert_eq!(record.title(), "Search: what is entropy");
    }

    #[test]
    fn test_unanswered_is_never_correct() {
        let q = Question {
            prompt: "p".to_string(),
            options: ["a".into(), "b".into(), "c".into(), "d".into()],
            correct_option_index: 0,
            explanation: String::new(),
        };
        assert!(q.is_correct(Some(0)));
        assert!(!q.is_correct(Some(1)));
        assert!(!q.is_correct(None));
    }
}
