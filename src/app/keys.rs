use super::{App, MenuItem, Screen, SetupField, TextInput};
use crate::export::ExportMode;
use crate::quiz::Phase;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Option index for `1`-`4` or `a`-`d`.
fn option_key(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Char(c @ '1'..='4') => Some(c as usize - '1' as usize),
        KeyCode::Char(c @ 'a'..='d') => Some(c as usize - 'a' as usize),
        _ => None,
    }
}

impl App {
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if is_ctrl(&key, 'c') {
            self.should_quit = true;
            return;
        }
        self.notice = None;

        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::Search => self.handle_search_key(key),
            Screen::QuizSetup => self.handle_setup_key(key),
            Screen::Quiz => self.handle_quiz_key(key),
            Screen::Results => self.handle_results_key(key),
            Screen::History => self.handle_history_key(key),
            Screen::QuitConfirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.leave_quiz(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.screen = Screen::Quiz
                }
                _ => {}
            },
        }
    }

    fn activate_menu_item(&mut self, item: MenuItem) {
        match item {
            MenuItem::Search => self.screen = Screen::Search,
            MenuItem::NewQuiz => {
                self.setup.field = SetupField::Topic;
                self.screen = Screen::QuizSetup;
            }
            MenuItem::History => self.open_history(),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.menu_index = self.menu_index.saturating_sub(1),
            KeyCode::Down => {
                if self.menu_index < MenuItem::ALL.len() - 1 {
                    self.menu_index += 1;
                }
            }
            KeyCode::Enter => self.activate_menu_item(MenuItem::ALL[self.menu_index]),
            KeyCode::Char(c @ '1'..='3') => {
                self.menu_index = c as usize - '1' as usize;
                self.activate_menu_item(MenuItem::ALL[self.menu_index]);
            }
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        if let Some(prompt) = self.search.attach_prompt.as_mut() {
            match key.code {
                KeyCode::Esc => self.search.attach_prompt = None,
                KeyCode::Enter => {
                    let path = prompt.value().to_string();
                    self.search.attach_prompt = None;
                    if !path.trim().is_empty() {
                        self.add_attachment(&path);
                    }
                }
                _ => {
                    prompt.handle_key(&key);
                }
            }
            return;
        }

        if is_ctrl(&key, 'a') {
            self.search.attach_prompt = Some(TextInput::new());
            return;
        }
        if is_ctrl(&key, 'd') {
            self.search.attachments.remove_last();
            return;
        }
        if is_ctrl(&key, 's') {
            self.toggle_read_aloud();
            return;
        }

        match key.code {
            KeyCode::Esc => self.open_menu(),
            KeyCode::Enter => self.submit_search(),
            KeyCode::Up => self.search.scroll = self.search.scroll.saturating_sub(1),
            KeyCode::Down => self.search.scroll = self.search.scroll.saturating_add(1),
            KeyCode::PageUp => self.search.scroll = self.search.scroll.saturating_sub(10),
            KeyCode::PageDown => self.search.scroll = self.search.scroll.saturating_add(10),
            _ => {
                self.search.input.handle_key(&key);
            }
        }
    }

    fn handle_setup_key(&mut self, key: KeyEvent) {
        if is_ctrl(&key, 'r') {
            self.setup.suggest_topic();
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::Menu;
                return;
            }
            KeyCode::Enter => {
                self.request_quiz();
                return;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.setup.field = self.setup.field.next();
                return;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.setup.field = self.setup.field.prev();
                return;
            }
            _ => {}
        }

        let forward = match key.code {
            KeyCode::Right | KeyCode::Char(' ') => Some(true),
            KeyCode::Left => Some(false),
            _ => None,
        };
        match self.setup.field {
            SetupField::Topic => {
                self.setup.topic.handle_key(&key);
            }
            SetupField::QuestionCount => {
                if let Some(forward) = forward {
                    self.setup.step_question_count(forward);
                }
            }
            SetupField::ExamStyle => match forward {
                Some(true) => self.setup.exam_style = self.setup.exam_style.next(),
                Some(false) => self.setup.exam_style = self.setup.exam_style.prev(),
                None => {}
            },
            SetupField::Difficulty => match forward {
                Some(true) => self.setup.difficulty = self.setup.difficulty.next(),
                Some(false) => self.setup.difficulty = self.setup.difficulty.prev(),
                None => {}
            },
            SetupField::Timer => {
                if forward.is_some() {
                    self.setup.timer_enabled = !self.setup.timer_enabled;
                }
            }
        }
    }

    fn handle_quiz_key(&mut self, key: KeyEvent) {
        let Some(session) = self.quiz.as_mut() else {
            self.screen = Screen::Menu;
            return;
        };

        match session.phase() {
            Phase::Playing => match key.code {
                KeyCode::Esc => self.screen = Screen::QuitConfirm,
                KeyCode::Enter => {
                    let i = session.current_index();
                    let submitted = session.submitted().get(i).copied().unwrap_or(false);
                    let at_last = i + 1 >= session.active_questions().len();
                    if session.is_timed() {
                        session.advance_or_finish();
                    } else if !submitted {
                        session.submit_current();
                    } else if at_last {
                        session.finish();
                    } else {
                        session.advance();
                    }
                }
                KeyCode::Right | KeyCode::Char('n') => session.advance_or_finish(),
                KeyCode::Left | KeyCode::Char('p') => session.retreat(),
                KeyCode::Home => session.jump_to(0),
                KeyCode::End => session.jump_to(session.active_questions().len().saturating_sub(1)),
                KeyCode::Char('f') => session.finish(),
                code => {
                    if let Some(option) = option_key(code) {
                        session.select_option(option);
                    }
                }
            },
            Phase::Reviewing => match key.code {
                KeyCode::Right | KeyCode::Char('n') | KeyCode::Enter => session.advance(),
                KeyCode::Left | KeyCode::Char('p') => session.retreat(),
                KeyCode::Home => session.jump_to(0),
                KeyCode::End => session.jump_to(session.active_questions().len().saturating_sub(1)),
                KeyCode::Esc | KeyCode::Char('f') => session.finish(),
                _ => {}
            },
            Phase::Finished => {}
        }

        self.sync_quiz();
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => self.retake_all(),
            KeyCode::Char('w') => self.retake_wrong(),
            KeyCode::Char('r') => self.review(),
            KeyCode::Char('e') => self.export(ExportMode::QuestionsOnly),
            KeyCode::Char('s') => self.export(ExportMode::WithSolutions),
            KeyCode::Char('m') | KeyCode::Esc => self.leave_quiz(),
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        let len = self.history.records().len();
        match key.code {
            KeyCode::Up => self.history_index = self.history_index.saturating_sub(1),
            KeyCode::Down => {
                if self.history_index + 1 < len {
                    self.history_index += 1;
                }
            }
            KeyCode::Enter => self.open_history_entry(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_history_entry(),
            KeyCode::Esc => self.screen = Screen::Menu,
            _ => {}
        }
    }
}
