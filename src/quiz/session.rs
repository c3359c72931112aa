use crate::logger;
use crate::models::{Question, QuizConfig, QuizRecord};
use crate::utils::now;
use uuid::Uuid;

pub const SECONDS_PER_QUESTION: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Finished session reopened for browsing; every answer stays revealed.
    Reviewing,
    Finished,
}

/// State of one quiz run. All transitions are guarded no-ops when their
/// preconditions do not hold, so none of them can fail.
///
/// `user_answers`, `submitted` and `active_questions` always have the same
/// length, and `submitted[i]` only ever goes from `false` to `true` until a
/// retake replaces the arrays wholesale.
#[derive(Debug, Clone)]
pub struct QuizSession {
    config: QuizConfig,
    original_questions: Vec<Question>,
    active_questions: Vec<Question>,
    current_index: usize,
    user_answers: Vec<Option<usize>>,
    submitted: Vec<bool>,
    time_remaining_seconds: u32,
    finished: bool,
    reviewing: bool,
    has_persisted: bool,
}

impl QuizSession {
    /// Fresh session over the full generated question set.
    pub fn start(questions: Vec<Question>, config: QuizConfig) -> Self {
        let mut session = Self {
            config,
            original_questions: questions.clone(),
            active_questions: Vec::new(),
            current_index: 0,
            user_answers: Vec::new(),
            submitted: Vec::new(),
            time_remaining_seconds: 0,
            finished: false,
            reviewing: false,
            has_persisted: false,
        };
        session.reset_to(questions);
        session
    }

    /// Reopen a recorded quiz directly on its results. Restored sessions
    /// never record themselves again.
    pub fn restore(record: &QuizRecord) -> Self {
        let len = record.questions.len();
        let mut user_answers = record.user_answers.clone();
        user_answers.resize(len, None);
        Self {
            config: record.config.clone(),
            original_questions: record.questions.clone(),
            active_questions: record.questions.clone(),
            current_index: 0,
            user_answers,
            submitted: vec![true; len],
            time_remaining_seconds: 0,
            finished: true,
            reviewing: false,
            has_persisted: true,
        }
    }

    fn reset_to(&mut self, questions: Vec<Question>) {
        let len = questions.len();
        self.active_questions = questions;
        self.current_index = 0;
        self.user_answers = vec![None; len];
        self.submitted = vec![false; len];
        self.time_remaining_seconds = if self.config.timer_enabled {
            len as u32 * SECONDS_PER_QUESTION
        } else {
            0
        };
        self.finished = false;
        self.reviewing = false;
    }

    pub fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else if self.reviewing {
            Phase::Reviewing
        } else {
            Phase::Playing
        }
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn active_questions(&self) -> &[Question] {
        &self.active_questions
    }

    pub fn original_questions(&self) -> &[Question] {
        &self.original_questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.active_questions.get(self.current_index)
    }

    pub fn user_answers(&self) -> &[Option<usize>] {
        &self.user_answers
    }

    pub fn submitted(&self) -> &[bool] {
        &self.submitted
    }

    pub fn time_remaining_seconds(&self) -> u32 {
        self.time_remaining_seconds
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn has_persisted(&self) -> bool {
        self.has_persisted
    }

    pub fn is_timed(&self) -> bool {
        self.config.timer_enabled
    }

    /// True when the active set is narrower than the generated set.
    pub fn is_retake_subset(&self) -> bool {
        self.active_questions.len() != self.original_questions.len()
    }

    /// The countdown only runs for timed sessions that are actively played.
    pub fn timer_running(&self) -> bool {
        self.config.timer_enabled && self.phase() == Phase::Playing
    }

    pub fn select_option(&mut self, option: usize) {
        if self.phase() != Phase::Playing || option >= crate::models::OPTION_COUNT {
            return;
        }
        let i = self.current_index;
        if i < self.submitted.len() && !self.submitted[i] {
            self.user_answers[i] = Some(option);
        }
    }

    /// Lock and reveal the current answer. Untimed mode only.
    pub fn submit_current(&mut self) {
        if self.phase() != Phase::Playing || self.config.timer_enabled {
            return;
        }
        let i = self.current_index;
        if i < self.submitted.len() && !self.submitted[i] && self.user_answers[i].is_some() {
            self.submitted[i] = true;
        }
    }

    pub fn advance(&mut self) {
        if self.current_index + 1 < self.active_questions.len() {
            self.current_index += 1;
        }
    }

    /// Timed mode: moving past the final question ends the run. Otherwise
    /// the same as [`advance`](Self::advance).
    pub fn advance_or_finish(&mut self) {
        let at_last = self.current_index + 1 >= self.active_questions.len();
        if at_last && self.timer_running() {
            self.finish();
        } else {
            self.advance();
        }
    }

    pub fn retreat(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
    }

    pub fn jump_to(&mut self, index: usize) {
        if index < self.active_questions.len() {
            self.current_index = index;
        }
    }

    /// Reveal everything and move to the results screen.
    pub fn finish(&mut self) {
        self.submitted.iter_mut().for_each(|s| *s = true);
        self.finished = true;
        self.reviewing = false;
    }

    /// Browse a finished session question by question.
    pub fn review(&mut self) {
        if self.finished {
            self.finished = false;
            self.reviewing = true;
            self.current_index = 0;
        }
    }

    /// Advance the countdown by one second. Returns true when this tick
    /// ended the session.
    pub fn tick(&mut self) -> bool {
        if !self.timer_running() {
            return false;
        }
        self.time_remaining_seconds = self.time_remaining_seconds.saturating_sub(1);
        if self.time_remaining_seconds == 0 {
            logger::log("Quiz countdown reached zero, finishing session");
            self.finish();
            return true;
        }
        false
    }

    pub fn score(&self) -> usize {
        self.active_questions
            .iter()
            .zip(self.user_answers.iter())
            .filter(|(question, answer)| question.is_correct(**answer))
            .count()
    }

    pub fn is_correct(&self, index: usize) -> bool {
        match (self.active_questions.get(index), self.user_answers.get(index)) {
            (Some(question), Some(answer)) => question.is_correct(*answer),
            _ => false,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.user_answers.iter().filter(|a| a.is_some()).count()
    }

    /// Produce the history record for this run, at most once, and only for
    /// a finished run over the full question set.
    pub fn persist_on_completion(&mut self) -> Option<QuizRecord> {
        if !self.finished || self.has_persisted {
            return None;
        }
        self.has_persisted = true;
        let score = self.score();
        logger::log(&format!(
            "Recording quiz '{}' with score {}/{}",
            self.config.topic,
            score,
            self.active_questions.len()
        ));
        Some(QuizRecord {
            id: Uuid::new_v4(),
            config: self.config.clone(),
            questions: self.active_questions.clone(),
            user_answers: self.user_answers.clone(),
            score,
            total_questions: self.active_questions.len(),
            timestamp: now(),
        })
    }

    /// Replay the full generated set. A completed full run may record again.
    pub fn retake_all(&mut self) {
        logger::log("Retaking all questions");
        let questions = self.original_questions.clone();
        self.reset_to(questions);
        self.has_persisted = false;
    }

    /// Replay only the questions answered incorrectly, keeping their order.
    /// No-op when nothing was wrong. Narrowed runs never record to history.
    pub fn retake_wrong(&mut self) {
        let wrong: Vec<Question> = self
            .active_questions
            .iter()
            .zip(self.user_answers.iter())
            .filter(|(question, answer)| !question.is_correct(**answer))
            .map(|(question, _)| question.clone())
            .collect();
        if wrong.is_empty() {
            return;
        }
        logger::log(&format!("Retaking {} incorrect questions", wrong.len()));
        self.reset_to(wrong);
        self.has_persisted = true;
    }
}
