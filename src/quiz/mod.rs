pub mod session;
pub mod timer;
pub mod view;

pub use session::{Phase, QuizSession, SECONDS_PER_QUESTION};
pub use timer::Countdown;
pub use view::{dot_state, dot_states, option_state, DotState, DotStatus, OptionState};
