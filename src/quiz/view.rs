//! Presentation state derived from a [`QuizSession`]. Nothing here is
//! stored; callers recompute on every draw.

use super::session::QuizSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    Neutral,
    Selected,
    /// Revealed and this is the right option.
    Correct,
    /// Revealed and the user picked this wrong option.
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotStatus {
    Unanswered,
    /// Selected but not yet revealed.
    Answered,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotState {
    pub status: DotStatus,
    pub current: bool,
}

pub fn option_state(session: &QuizSession, question: usize, option: usize) -> OptionState {
    let (Some(q), Some(answer), Some(submitted)) = (
        session.active_questions().get(question),
        session.user_answers().get(question),
        session.submitted().get(question),
    ) else {
        return OptionState::Neutral;
    };

    let picked = *answer == Some(option);
    if *submitted {
        if option == q.correct_option_index {
            OptionState::Correct
        } else if picked {
            OptionState::Incorrect
        } else {
            OptionState::Neutral
        }
    } else if picked {
        OptionState::Selected
    } else {
        OptionState::Neutral
    }
}

pub fn dot_state(session: &QuizSession, question: usize) -> DotState {
    let current = session.current_index() == question;
    let submitted = session.submitted().get(question).copied().unwrap_or(false);
    let answered = session
        .user_answers()
        .get(question)
        .is_some_and(|a| a.is_some());

    let status = match (submitted, answered) {
        (true, _) if session.is_correct(question) => DotStatus::Correct,
        (true, _) => DotStatus::Incorrect,
        (false, true) => DotStatus::Answered,
        (false, false) => DotStatus::Unanswered,
    };
    DotState { status, current }
}

pub fn dot_states(session: &QuizSession) -> Vec<DotState> {
    (0..session.active_questions().len())
        .map(|i| dot_state(session, i))
        .collect()
}
