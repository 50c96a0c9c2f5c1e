use std::ops::Range;

use crate::util::unicode;

/// Identity of a text input on screen (keys the mention session arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

/// A single-line editable text buffer.
///
/// `cursor` is a byte offset into `text` and always sits on a grapheme
/// boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer with the cursor at the end
    pub fn with_text(text: &str) -> Self {
        TextInput {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Place the cursor, clamping to the buffer and snapping back to a char boundary
    pub fn set_cursor(&mut self, offset: usize) {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        self.cursor = offset;
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert text at the cursor; newlines become spaces (single-line field)
    pub fn insert_str(&mut self, s: &str) {
        let clean = s.replace('\r', "").replace('\n', " ");
        self.text.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    /// Delete the grapheme before the cursor. Returns false at the start.
    pub fn backspace(&mut self) -> bool {
        match unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            Some(prev) => {
                self.text.drain(prev..self.cursor);
                self.cursor = prev;
                true
            }
            None => false,
        }
    }

    /// Delete the grapheme under the cursor. Returns false at the end.
    pub fn delete(&mut self) -> bool {
        match unicode::next_grapheme_boundary(&self.text, self.cursor) {
            Some(next) => {
                self.text.drain(self.cursor..next);
                true
            }
            None => false,
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn move_word_left(&mut self) {
        self.cursor = unicode::word_boundary_left(&self.text, self.cursor);
    }

    pub fn move_word_right(&mut self) {
        self.cursor = unicode::word_boundary_right(&self.text, self.cursor);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Replace a byte range and leave the cursor right after the replacement
    pub fn replace_range(&mut self, range: Range<usize>, replacement: &str) {
        let start = range.start;
        self.text.replace_range(range, replacement);
        self.cursor = start + replacement.len();
    }

    /// Display column of the cursor (terminal cells)
    pub fn cursor_col(&self) -> usize {
        unicode::byte_offset_to_display_col(&self.text, self.cursor)
    }
}
