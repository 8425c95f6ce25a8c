// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{InputRejected, ok};

/// The in-progress, not yet submitted command line plus the cursor position.
///
/// - `cursor` is a char index, `0 <= cursor <= char count of text`.
/// - `text` never contains a line terminator. Enter submits, it never inserts.
/// - Typed characters are limited to printable ASCII. Text spliced in by completion may
///   contain other printable characters (file names), but never control characters.
///
/// There is no I/O in here. The [`crate::LineEditor`] decides what to echo based on
/// what these operations report back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns true if `ch` may be typed into the buffer: space through tilde.
    #[must_use]
    pub fn is_insertable(ch: char) -> bool { matches!(ch, ' '..='~') }

    /// Insert `ch` at the cursor and advance the cursor by one.
    ///
    /// # Errors
    ///
    /// [`InputRejected`] when `ch` is not printable ASCII. The buffer is unchanged.
    pub fn insert(&mut self, ch: char) -> Result<(), InputRejected> {
        if !Self::is_insertable(ch) {
            return Err(InputRejected { ch });
        }
        let byte_index = self.byte_index(self.cursor);
        self.text.insert(byte_index, ch);
        self.cursor += 1;
        ok!()
    }

    /// Remove the character before the cursor. No-op at the start of the buffer.
    pub fn backspace(&mut self) -> Option<char> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let byte_index = self.byte_index(self.cursor);
        Some(self.text.remove(byte_index))
    }

    /// Remove the character under the cursor. No-op at the end of the buffer.
    pub fn delete(&mut self) -> Option<char> {
        if self.is_cursor_at_end() {
            return None;
        }
        let byte_index = self.byte_index(self.cursor);
        Some(self.text.remove(byte_index))
    }

    /// Returns true if the cursor moved.
    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Returns true if the cursor moved.
    pub fn move_right(&mut self) -> bool {
        if self.is_cursor_at_end() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Returns how many cells the cursor moved left.
    pub fn move_home(&mut self) -> usize { std::mem::take(&mut self.cursor) }

    /// Returns how many cells the cursor moved right.
    pub fn move_end(&mut self) -> usize {
        let end = self.len();
        let moved = end - self.cursor;
        self.cursor = end;
        moved
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Read-only view of the current text.
    #[must_use]
    pub fn snapshot(&self) -> &str { &self.text }

    /// Snapshot the text and clear the buffer, as on submit.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    /// Replace the `erase` characters before the cursor with `text`, leaving the cursor
    /// after the inserted text. This is how a completion is applied.
    ///
    /// # Errors
    ///
    /// [`InputRejected`] if `text` contains a control character (including line
    /// terminators). The buffer is unchanged.
    pub fn splice_before_cursor(
        &mut self,
        erase: usize,
        text: &str,
    ) -> Result<(), InputRejected> {
        if let Some(ch) = text.chars().find(|ch| ch.is_control()) {
            return Err(InputRejected { ch });
        }
        let erase = erase.min(self.cursor);
        let start = self.byte_index(self.cursor - erase);
        let end = self.byte_index(self.cursor);
        self.text.replace_range(start..end, text);
        self.cursor = self.cursor - erase + text.chars().count();
        ok!()
    }

    #[must_use]
    pub fn text_before_cursor(&self) -> &str { &self.text[..self.byte_index(self.cursor)] }

    #[must_use]
    pub fn text_after_cursor(&self) -> &str { &self.text[self.byte_index(self.cursor)..] }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize { self.text.chars().count() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    /// Empty or whitespace only. Submitting a blank line does not reach the shell.
    #[must_use]
    pub fn is_blank(&self) -> bool { self.text.trim().is_empty() }

    #[must_use]
    pub fn is_cursor_at_end(&self) -> bool { self.cursor == self.len() }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(byte_index, _)| byte_index)
    }
}
