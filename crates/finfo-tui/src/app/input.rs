//! Line editor for the input sub-modes (chmod, open-with, move, rename).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// State for text input operations.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
    /// Prefilled value, if any.
    original: Option<String>,
    /// Validation error from the last submit.
    error: Option<String>,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input state with a prefilled value.
    pub fn with_initial(value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            cursor: value.chars().count(),
            original: Some(value.to_string()),
            error: None,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// Text before and after the cursor, for rendering.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.buffer.split_at(self.byte_offset(self.cursor))
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
        self.error = None;

        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => InputResult::Submit(self.buffer.clone()),

            (KeyCode::Esc, _) => InputResult::Cancel,

            (KeyCode::Backspace, _) => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
                InputResult::Continue
            }

            (KeyCode::Delete, _) => {
                if self.cursor < self.len() {
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
                InputResult::Continue
            }

            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                InputResult::Continue
            }

            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.len());
                InputResult::Continue
            }

            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                InputResult::Continue
            }

            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.len();
                InputResult::Continue
            }

            // Ctrl-U - clear line
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.buffer.clear();
                self.cursor = 0;
                InputResult::Continue
            }

            // Ctrl-K - delete to end
            (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.truncate(at);
                InputResult::Continue
            }

            // Ctrl-W - delete word before cursor
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                if self.cursor > 0 {
                    let end = self.byte_offset(self.cursor);
                    let before = &self.buffer[..end];
                    let trimmed = before.trim_end_matches(char::is_whitespace);
                    let start = trimmed
                        .rfind(|c: char| c.is_whitespace() || c == '/')
                        .map(|i| i + 1)
                        .unwrap_or(0);
                    self.cursor -= self.buffer[start..end].chars().count();
                    self.buffer.replace_range(start..end, "");
                }
                InputResult::Continue
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
                InputResult::Continue
            }

            _ => InputResult::Continue,
        }
    }
}

/// Result of handling input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// Continue accepting input.
    Continue,
    /// User cancelled the input.
    Cancel,
    /// User submitted the input with this value.
    Submit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn type_str(input: &mut InputState, text: &str) {
        for c in text.chars() {
            input.handle_key(key_event(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_input_basic() {
        let mut input = InputState::new();
        type_str(&mut input, "644");

        assert_eq!(input.buffer(), "644");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_input_multibyte() {
        let mut input = InputState::with_initial("café");
        assert_eq!(input.cursor(), 4);

        input.handle_key(key_event(KeyCode::Left, KeyModifiers::NONE));
        type_str(&mut input, "ï");
        assert_eq!(input.buffer(), "cafïé");

        input.handle_key(key_event(KeyCode::End, KeyModifiers::NONE));
        input.handle_key(key_event(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(input.buffer(), "cafï");
        assert_eq!(input.split_at_cursor(), ("cafï", ""));
    }

    #[test]
    fn test_input_cursor_movement() {
        let mut input = InputState::with_initial("test");

        input.handle_key(key_event(KeyCode::Home, KeyModifiers::NONE));
        assert_eq!(input.cursor(), 0);

        input.handle_key(key_event(KeyCode::End, KeyModifiers::NONE));
        assert_eq!(input.cursor(), 4);

        input.handle_key(key_event(KeyCode::Left, KeyModifiers::NONE));
        assert_eq!(input.cursor(), 3);
        assert_eq!(input.split_at_cursor(), ("tes", "t"));

        input.handle_key(key_event(KeyCode::Right, KeyModifiers::NONE));
        input.handle_key(key_event(KeyCode::Right, KeyModifiers::NONE));
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_delete_word_stops_at_separator() {
        let mut input = InputState::with_initial("~/Archive/2024");
        input.handle_key(key_event(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(input.buffer(), "~/Archive/");
        assert_eq!(input.cursor(), 10);
    }

    #[test]
    fn test_submit_and_cancel() {
        let mut input = InputState::with_initial("{name}{ext}");

        let result = input.handle_key(key_event(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(result, InputResult::Submit("{name}{ext}".into()));

        let result = input.handle_key(key_event(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(result, InputResult::Cancel);
        assert_eq!(input.original(), Some("{name}{ext}"));
    }
}
