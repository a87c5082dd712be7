//! UTF-8 safe single-line editor used by the tree filter and the
//! free-text form fields.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    input: String,
    /// Byte offset into `input`, always on a char boundary.
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `text` and the cursor at its end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let input = text.into();
        let cursor = input.len();
        Self { input, cursor }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of chars left of the cursor, for placing the terminal caret.
    pub fn cursor_column(&self) -> usize {
        self.input[..self.cursor].chars().count()
    }

    pub fn is_blank(&self) -> bool {
        self.input.trim().is_empty()
    }

    pub fn move_left(&mut self) {
        if let Some(previous) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= previous.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    pub fn insert_char(&mut self, character: char) {
        self.input.insert(self.cursor, character);
        self.cursor += character.len_utf8();
    }

    /// Deletes the char before the cursor.
    pub fn backspace(&mut self) {
        if let Some(previous) = self.input[..self.cursor].chars().next_back() {
            let start = self.cursor - previous.len_utf8();
            self.input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    /// Deletes the char under the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.input.drain(self.cursor..self.cursor + next.len_utf8());
        }
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }
}
