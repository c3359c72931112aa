mod input;
mod keys;

pub use input::TextInput;

use crate::attachments::AttachmentSet;
use crate::config::AppConfig;
use crate::error::{InputError, Operation};
use crate::export::{write_export, ExportMode};
use crate::history::{History, HistoryStore};
use crate::logger;
use crate::models::{
    Difficulty, ExamStyle, HistoryRecord, Question, QuizConfig, SearchRecord, QUESTION_COUNT_STEPS,
};
use crate::quiz::{Countdown, QuizSession};
use crate::render::{blocks_to_plain_text, render_blocks};
use crate::speech::Speaker;
use crate::utils::now;
use crate::worker::{WorkerRequest, WorkerResponse};
use rand::seq::SliceRandom;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use uuid::Uuid;

const WORKER_UNAVAILABLE: &str = "Background worker stopped. Restart the app.";
const ATTACHMENTS_LOADING: &str = "Attachments are still loading.";
const NOTHING_TO_RETAKE: &str = "Every answer was correct. Nothing to retake.";
const HISTORY_SAVE_FAILED: &str = "Could not save to history.";

pub const SUGGESTED_TOPICS: &[&str] = &[
    "Photosynthesis",
    "The French Revolution",
    "Quadratic equations",
    "Cell division",
    "Newton's laws of motion",
    "Causes of World War I",
    "Organic functional groups",
    "Probability basics",
    "The water cycle",
    "Supply and demand",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Search,
    QuizSetup,
    Quiz,
    Results,
    History,
    QuitConfirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Search,
    NewQuiz,
    History,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Search, MenuItem::NewQuiz, MenuItem::History];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Search => "Search",
            MenuItem::NewQuiz => "New Quiz",
            MenuItem::History => "History",
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchState {
    pub input: TextInput,
    /// Path being typed for a new attachment, when the prompt is open.
    pub attach_prompt: Option<TextInput>,
    pub attachments: AttachmentSet,
    pub result: Option<SearchRecord>,
    pub scroll: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Topic,
    QuestionCount,
    ExamStyle,
    Difficulty,
    Timer,
}

impl SetupField {
    pub const ALL: [SetupField; 5] = [
        SetupField::Topic,
        SetupField::QuestionCount,
        SetupField::ExamStyle,
        SetupField::Difficulty,
        SetupField::Timer,
    ];

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let pos = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(pos + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug)]
pub struct SetupState {
    pub topic: TextInput,
    pub question_count: usize,
    pub exam_style: ExamStyle,
    pub difficulty: Difficulty,
    pub timer_enabled: bool,
    pub field: SetupField,
}

impl Default for SetupState {
    fn default() -> Self {
        let defaults = QuizConfig::default();
        Self {
            topic: TextInput::new(),
            question_count: defaults.question_count,
            exam_style: defaults.exam_style,
            difficulty: defaults.difficulty,
            timer_enabled: defaults.timer_enabled,
            field: SetupField::Topic,
        }
    }
}

impl SetupState {
    pub fn to_config(&self) -> QuizConfig {
        QuizConfig {
            topic: self.topic.value().trim().to_string(),
            question_count: self.question_count,
            exam_style: self.exam_style,
            difficulty: self.difficulty,
            timer_enabled: self.timer_enabled,
        }
    }

    /// Step through the preset counts, wrapping at either end.
    pub fn step_question_count(&mut self, forward: bool) {
        let steps = QUESTION_COUNT_STEPS;
        let pos = steps
            .iter()
            .position(|n| *n == self.question_count)
            .unwrap_or(0);
        let next = if forward {
            (pos + 1) % steps.len()
        } else {
            (pos + steps.len() - 1) % steps.len()
        };
        self.question_count = steps[next];
    }

    pub fn suggest_topic(&mut self) {
        if let Some(topic) = SUGGESTED_TOPICS.choose(&mut rand::thread_rng()) {
            self.topic.set(*topic);
        }
    }
}

/// Everything the terminal front end shows and mutates. Slow work is sent to
/// the worker through `requests`; results come back via [`App::handle_response`].
pub struct App {
    pub screen: Screen,
    pub menu_index: usize,
    pub search: SearchState,
    pub setup: SetupState,
    pub quiz: Option<QuizSession>,
    pub history: History<Box<dyn HistoryStore>>,
    pub history_index: usize,
    pub notice: Option<String>,
    pub busy: bool,
    pub ai_enabled: bool,
    pub model: String,
    pub should_quit: bool,
    countdown: Countdown,
    speaker: Speaker,
    requests: Sender<WorkerRequest>,
    export_dir: PathBuf,
    page_height: usize,
}

impl App {
    pub fn new(
        config: &AppConfig,
        store: Box<dyn HistoryStore>,
        requests: Sender<WorkerRequest>,
        ai_enabled: bool,
    ) -> Self {
        Self {
            screen: Screen::Menu,
            menu_index: 0,
            search: SearchState::default(),
            setup: SetupState::default(),
            quiz: None,
            history: History::new(store),
            history_index: 0,
            notice: None,
            busy: false,
            ai_enabled,
            model: config.model.clone(),
            should_quit: false,
            countdown: Countdown::new(),
            speaker: Speaker::new(config.tts_command.clone()),
            requests,
            export_dir: config.export_dir(),
            page_height: config.page_height,
        }
    }

    pub fn is_speaking(&mut self) -> bool {
        self.speaker.is_speaking()
    }

    fn send(&mut self, request: WorkerRequest) -> bool {
        match self.requests.send(request) {
            Ok(()) => true,
            Err(e) => {
                logger::log(&format!("Failed to queue worker request: {}", e));
                self.notice = Some(WORKER_UNAVAILABLE.to_string());
                false
            }
        }
    }

    fn record_history(&mut self, record: HistoryRecord) {
        if let Err(e) = self.history.append(record) {
            logger::log(&format!("Failed to save history: {:#}", e));
            self.notice = Some(HISTORY_SAVE_FAILED.to_string());
        }
    }

    pub fn open_menu(&mut self) {
        self.speaker.stop();
        self.screen = Screen::Menu;
    }

    pub fn open_history(&mut self) {
        self.history.reload();
        self.history_index = self
            .history_index
            .min(self.history.records().len().saturating_sub(1));
        self.screen = Screen::History;
    }

    pub fn submit_search(&mut self) {
        if self.busy {
            return;
        }
        if self.search.input.is_blank() {
            self.notice = Some(InputError::EmptyQuery.to_string());
            return;
        }
        if self.search.attachments.is_processing() {
            self.notice = Some(ATTACHMENTS_LOADING.to_string());
            return;
        }

        let query = self.search.input.value().trim().to_string();
        let attachments = self.search.attachments.items().to_vec();
        self.speaker.stop();
        if self.send(WorkerRequest::Search { query, attachments }) {
            self.search.attachments.clear();
            self.busy = true;
        }
    }

    pub fn add_attachment(&mut self, path: &str) {
        let path = match self.search.attachments.begin_read(path) {
            Ok(path) => path,
            Err(e) => {
                self.notice = Some(e.to_string());
                return;
            }
        };
        let name = path.display().to_string();
        if !self.send(WorkerRequest::ReadAttachment { path }) {
            let _ = self.search.attachments.finish_read(Err(InputError::AttachmentRead {
                name,
                reason: "worker unavailable".to_string(),
            }));
        }
    }

    /// Read the current answer aloud, or stop if it is already playing.
    pub fn toggle_read_aloud(&mut self) {
        if self.speaker.is_speaking() {
            self.speaker.stop();
            return;
        }
        let Some(record) = self.search.result.as_ref() else {
            return;
        };
        let text = blocks_to_plain_text(&render_blocks(&record.result.text));
        if !self.speaker.speak(&text)
            && let Some(notice) = self.speaker.take_unavailable_notice()
        {
            self.notice = Some(notice.to_string());
        }
    }

    pub fn request_quiz(&mut self) {
        if self.busy {
            return;
        }
        let config = self.setup.to_config();
        if let Err(e) = config.validate() {
            self.notice = Some(e.to_string());
            return;
        }
        if self.send(WorkerRequest::GenerateQuiz { config }) {
            self.busy = true;
        }
    }

    fn start_quiz(&mut self, questions: Vec<Question>, config: QuizConfig) {
        let session = QuizSession::start(questions, config);
        if session.is_timed() {
            self.countdown.start();
        } else {
            self.countdown.cancel();
        }
        self.quiz = Some(session);
        self.screen = Screen::Quiz;
    }

    /// Restart the countdown after a retake put the session back in play.
    fn resume_quiz(&mut self) {
        if let Some(session) = self.quiz.as_ref() {
            if session.timer_running() {
                self.countdown.start();
            }
            self.screen = Screen::Quiz;
        }
    }

    /// Move a finished session to the results screen, recording it once.
    fn sync_quiz(&mut self) {
        let Some(session) = self.quiz.as_mut() else {
            return;
        };
        if !session.is_finished() {
            return;
        }
        self.countdown.cancel();
        if let Some(record) = session.persist_on_completion() {
            self.record_history(HistoryRecord::Quiz(record));
        }
        if matches!(self.screen, Screen::Quiz | Screen::QuitConfirm) {
            self.screen = Screen::Results;
        }
    }

    pub fn leave_quiz(&mut self) {
        self.countdown.cancel();
        self.quiz = None;
        self.screen = Screen::Menu;
    }

    pub fn retake_all(&mut self) {
        if let Some(session) = self.quiz.as_mut() {
            session.retake_all();
        }
        self.resume_quiz();
    }

    pub fn retake_wrong(&mut self) {
        let Some(session) = self.quiz.as_mut() else {
            return;
        };
        let any_wrong = (0..session.active_questions().len()).any(|i| !session.is_correct(i));
        if !any_wrong {
            self.notice = Some(NOTHING_TO_RETAKE.to_string());
            return;
        }
        session.retake_wrong();
        self.resume_quiz();
    }

    pub fn review(&mut self) {
        if let Some(session) = self.quiz.as_mut() {
            session.review();
            self.screen = Screen::Quiz;
        }
    }

    pub fn export(&mut self, mode: ExportMode) {
        let Some(session) = self.quiz.as_ref() else {
            return;
        };
        let result = write_export(
            &self.export_dir,
            &session.config().topic,
            session.original_questions(),
            mode,
            self.page_height,
        );
        self.notice = Some(match result {
            Ok(path) => format!("Exported to {}", path.display()),
            Err(e) => {
                logger::log(&format!("Export failed: {:#}", e));
                "Export failed.".to_string()
            }
        });
    }

    pub fn open_history_entry(&mut self) {
        let Some(record) = self.history.records().get(self.history_index).cloned() else {
            return;
        };
        match record {
            HistoryRecord::Search(record) => {
                self.speaker.stop();
                self.search.input.set(record.query.clone());
                self.search.result = Some(record);
                self.search.scroll = 0;
                self.screen = Screen::Search;
            }
            HistoryRecord::Quiz(record) => {
                self.countdown.cancel();
                self.quiz = Some(QuizSession::restore(&record));
                self.screen = Screen::Results;
            }
        }
    }

    pub fn delete_history_entry(&mut self) {
        let Some(id) = self.history.records().get(self.history_index).map(|r| r.id()) else {
            return;
        };
        if let Err(e) = self.history.delete(id) {
            logger::log(&format!("Failed to delete history entry {}: {:#}", id, e));
            self.notice = Some(HISTORY_SAVE_FAILED.to_string());
        }
        self.history_index = self
            .history_index
            .min(self.history.records().len().saturating_sub(1));
    }

    /// Periodic housekeeping from the event loop: countdown ticks.
    pub fn on_tick(&mut self) {
        if let Some(session) = self.quiz.as_mut()
            && self.countdown.pump(session)
        {
            self.notice = Some("Time is up.".to_string());
        }
        self.sync_quiz();
    }

    pub fn handle_response(&mut self, response: WorkerResponse) {
        match response {
            WorkerResponse::Search { query, result } => {
                self.busy = false;
                self.speaker.stop();
                match result {
                    Ok(result) => {
                        let record = SearchRecord {
                            id: Uuid::new_v4(),
                            query,
                            result,
                            timestamp: now(),
                        };
                        self.search.result = Some(record.clone());
                        self.search.scroll = 0;
                        self.record_history(HistoryRecord::Search(record));
                    }
                    Err(e) => {
                        logger::log(&format!("Search for '{}' failed: {}", query, e));
                        self.notice = Some(e.user_message(Operation::Search).to_string());
                    }
                }
            }
            WorkerResponse::Quiz { config, result } => {
                self.busy = false;
                match result {
                    Ok(questions) if self.screen == Screen::QuizSetup => {
                        self.start_quiz(questions, config);
                    }
                    Ok(_) => {
                        logger::log("Discarding quiz generated after setup was left");
                    }
                    Err(e) => {
                        logger::log(&format!("Quiz generation for '{}' failed: {}", config.topic, e));
                        self.notice = Some(e.user_message(Operation::GenerateQuiz).to_string());
                    }
                }
            }
            WorkerResponse::Attachment(result) => {
                if let Err(e) = self.search.attachments.finish_read(result) {
                    self.notice = Some(e.to_string());
                }
            }
        }
    }
}
