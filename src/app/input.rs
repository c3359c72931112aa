use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line text field. The cursor is a char index so multi-byte input
/// never splits a character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    /// Apply an editing key. Returns false for keys the field does not use,
    /// including anything pressed with Ctrl.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.chars().count(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = TextInput::new();
        for c in "Hello".chars() {
            input.handle_key(&key(KeyCode::Char(c)));
        }
        assert_eq!(input.value(), "Hello");
        input.handle_key(&key(KeyCode::Backspace));
        assert_eq!(input.value(), "Hell");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::new();
        input.set("αβγ");
        input.handle_key(&key(KeyCode::Left));
        input.handle_key(&key(KeyCode::Backspace));
        assert_eq!(input.value(), "αγ");
        input.insert('δ');
        assert_eq!(input.value(), "αδγ");
        input.handle_key(&key(KeyCode::Delete));
        assert_eq!(input.value(), "αδ");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut input = TextInput::new();
        input.handle_key(&key(KeyCode::Left));
        input.handle_key(&key(KeyCode::Backspace));
        assert_eq!(input.cursor(), 0);
        input.set("ab");
        input.handle_key(&key(KeyCode::Right));
        assert_eq!(input.cursor(), 2);
        input.handle_key(&key(KeyCode::Home));
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_ctrl_keys_are_not_consumed() {
        let mut input = TextInput::new();
        let consumed = input.handle_key(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert!(!consumed);
        assert!(input.is_blank());
    }
}
