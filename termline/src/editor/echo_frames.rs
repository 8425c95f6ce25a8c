// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The bytes the editor writes to keep the display in step with the buffer. Cursor
//! movement to the left is done with backspace (`\x08`), which moves without erasing,
//! and movement to the right by re-writing the characters being passed over. This keeps
//! the frames valid on the simplest terminals.

use crate::{CRLF, InputBuffer};
use crossterm::{cursor::MoveToColumn,
                queue,
                terminal::{Clear, ClearType}};
use std::io;
use unicode_width::UnicodeWidthStr;

pub const BACKSPACE: char = '\x08';
/// Erase one cell to the left of the cursor.
pub const ERASE_CELL: &str = "\x08 \x08";
pub const INTERRUPT_ECHO: &str = "^C\r\n";
pub const NEWLINE_ECHO: &str = CRLF;

#[must_use]
pub fn cursor_left(cells: usize) -> String { BACKSPACE.to_string().repeat(cells) }

/// Frame for replacing `erased` (just before the cursor) with `inserted`, where `tail`
/// is the text after the cursor. Covers typing, backspace and applying a completion.
/// The cursor ends up right after `inserted`.
#[must_use]
pub fn edit_before_cursor(erased: &str, inserted: &str, tail: &str) -> String {
    let erased_width = erased.width();
    let mut frame = ERASE_CELL.repeat(erased_width);
    frame.push_str(inserted);
    if !tail.is_empty() {
        // Blank out cells the shifted tail no longer covers.
        let uncovered = erased_width.saturating_sub(inserted.width());
        frame.push_str(tail);
        frame.push_str(&" ".repeat(uncovered));
        frame.push_str(&cursor_left(tail.width() + uncovered));
    }
    frame
}

/// Frame for removing `removed` from under the cursor, where `tail` is what now follows
/// the cursor. The cursor does not move.
#[must_use]
pub fn delete_at_cursor(removed: &str, tail: &str) -> String {
    let removed_width = removed.width();
    let mut frame = String::from(tail);
    frame.push_str(&" ".repeat(removed_width));
    frame.push_str(&cursor_left(tail.width() + removed_width));
    frame
}

/// Frame that draws `prompt` and the whole buffer, leaving the visual cursor where the
/// buffer cursor is.
#[must_use]
pub fn prompt_and_buffer(prompt: &str, buffer: &InputBuffer) -> String {
    let mut frame = String::from(prompt);
    frame.push_str(buffer.snapshot());
    frame.push_str(&cursor_left(buffer.text_after_cursor().width()));
    frame
}

/// Frame that returns to the start of the row and clears it.
///
/// # Errors
///
/// Only if crossterm fails to encode the commands.
pub fn clear_current_row() -> io::Result<Vec<u8>> {
    let mut frame = Vec::new();
    queue!(frame, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_at_end_is_plain_echo() {
        assert_eq!(edit_before_cursor("", "a", ""), "a");
    }

    #[test]
    fn test_backspace_at_end() {
        assert_eq!(edit_before_cursor("a", "", ""), "\x08 \x08");
    }

    #[test]
    fn test_type_in_middle_redraws_tail() {
        assert_eq!(edit_before_cursor("", "c", "ho"), "cho\x08\x08");
    }

    #[test]
    fn test_backspace_in_middle_blanks_last_cell() {
        assert_eq!(edit_before_cursor("c", "", "ho"), "\x08 \x08ho \x08\x08\x08");
    }

    #[test]
    fn test_completion_replacing_partial() {
        assert_eq!(
            edit_before_cursor("loc", "/usr/local/bin", ""),
            "\x08 \x08\x08 \x08\x08 \x08/usr/local/bin"
        );
    }

    #[test]
    fn test_delete_at_cursor() {
        assert_eq!(delete_at_cursor("x", "yz"), "yz \x08\x08\x08");
        assert_eq!(delete_at_cursor("x", ""), " \x08");
    }

    #[test]
    fn test_prompt_and_buffer_places_cursor() {
        let mut buffer = InputBuffer::new();
        for ch in "echo".chars() {
            buffer.insert(ch).unwrap();
        }
        buffer.move_left();
        assert_eq!(prompt_and_buffer("$ ", &buffer), "$ echo\x08");
    }

    #[test]
    fn test_clear_current_row() {
        assert_eq!(clear_current_row().unwrap(), b"\x1b[1G\x1b[2K".to_vec());
    }
}
