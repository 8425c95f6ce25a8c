// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// What the user is asking to complete.
///
/// Words are found by ignoring leading whitespace and splitting the rest on single
/// spaces. The target is always the last element, which is an empty word when the line
/// ends in a space (completing a fresh argument).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// The buffer up to the cursor, handed to the source so it can tell commands from
    /// arguments. Text after the cursor is left out, otherwise the source would count
    /// words that are not before the target.
    pub line: String,
    /// Index of the target word. `0` is the command name.
    pub word_index: usize,
    /// The already typed part of the target word.
    pub partial: String,
    /// The text after the cursor starts with a space, so the target word already has a
    /// boundary after it.
    pub followed_by_space: bool,
}

impl CompletionRequest {
    /// Build a request from the text before the cursor. Returns [`None`] for a blank
    /// line, in which case the completion source is not consulted at all.
    #[must_use]
    pub fn new(text_before_cursor: &str) -> Option<Self> {
        let line = text_before_cursor.trim_start();
        if line.trim_end().is_empty() {
            return None;
        }

        let mut word_index = 0;
        let mut partial = line;
        for (index, word) in line.split(' ').enumerate() {
            word_index = index;
            partial = word;
        }

        Some(Self {
            line: text_before_cursor.to_string(),
            word_index,
            partial: partial.to_string(),
            followed_by_space: false,
        })
    }

    #[must_use]
    pub fn with_text_after_cursor(mut self, text_after_cursor: &str) -> Self {
        self.followed_by_space = text_after_cursor.starts_with(' ');
        self
    }

    #[must_use]
    pub fn is_command_position(&self) -> bool { self.word_index == 0 }

    /// Length of the partial word in cells, which is how much a replacement erases.
    #[must_use]
    pub fn partial_len(&self) -> usize { self.partial.chars().count() }
}
