use super::session::QuizSession;
use crossbeam_channel::Receiver;
use std::time::{Duration, Instant};

/// One-second ticker driving a timed [`QuizSession`].
///
/// Dropping or cancelling the countdown drops the tick receiver, after which
/// no further ticks can reach the session.
#[derive(Debug, Default)]
pub struct Countdown {
    ticker: Option<Receiver<Instant>>,
}

impl Countdown {
    pub fn new() -> Self {
        Self { ticker: None }
    }

    pub fn start(&mut self) {
        self.start_with_period(Duration::from_secs(1));
    }

    pub fn start_with_period(&mut self, period: Duration) {
        self.ticker = Some(crossbeam_channel::tick(period));
    }

    pub fn cancel(&mut self) {
        self.ticker = None;
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Deliver any elapsed ticks to `session`. Cancels itself once the
    /// session's timer stops running. Returns true if a tick finished it.
    pub fn pump(&mut self, session: &mut QuizSession) -> bool {
        let Some(ticker) = self.ticker.as_ref() else {
            return false;
        };
        if !session.timer_running() {
            self.cancel();
            return false;
        }

        let elapsed = ticker.try_iter().count();
        let mut ended = false;
        for _ in 0..elapsed {
            if session.tick() {
                ended = true;
                break;
            }
        }
        if !session.timer_running() {
            self.cancel();
        }
        ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, ExamStyle, Question, QuizConfig};

    fn timed_session(questions: usize) -> QuizSession {
        let questions = (0..questions)
            .map(|i| Question {
                prompt: format!("Q{}", i),
                options: ["a".into(), "b".into(), "c".into(), "d".into()],
                correct_option_index: 0,
                explanation: String::new(),
            })
            .collect();
        QuizSession::start(
            questions,
            QuizConfig {
                topic: "t".to_string(),
                question_count: 1,
                exam_style: ExamStyle::Sat,
                difficulty: Difficulty::Hard,
                timer_enabled: true,
            },
        )
    }

    #[test]
    fn test_pump_without_start_is_inert() {
        let mut session = timed_session(1);
        let mut countdown = Countdown::new();
        assert!(!countdown.pump(&mut session));
        assert_eq!(session.time_remaining_seconds(), 90);
    }

    #[test]
    fn test_ticks_decrement_session() {
        let mut session = timed_session(1);
        let mut countdown = Countdown::new();
        countdown.start_with_period(Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(40));
        countdown.pump(&mut session);
        assert!(session.time_remaining_seconds() < 90);
        assert!(countdown.is_running());
    }

    #[test]
    fn test_cancelled_once_session_finishes() {
        let mut session = timed_session(1);
        let mut countdown = Countdown::new();
        countdown.start_with_period(Duration::from_millis(5));
        session.finish();
        std::thread::sleep(Duration::from_millis(20));
        assert!(!countdown.pump(&mut session));
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_cancel_stops_delivery() {
        let mut session = timed_session(1);
        let mut countdown = Countdown::new();
        countdown.start_with_period(Duration::from_millis(5));
        countdown.cancel();
        std::thread::sleep(Duration::from_millis(20));
        countdown.pump(&mut session);
        assert_eq!(session.time_remaining_seconds(), 90);
    }
}
