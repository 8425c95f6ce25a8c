// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CompletionRequest, EditorIssue, InputBuffer, SafeCompletionSource, layout_grid};

/// A single candidate turned into a concrete edit: erase `erase` cells before the
/// cursor, then write `insert`. The same edit is applied to the buffer and echoed to the
/// display, so the two never diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub candidate: String,
    pub erase: usize,
    pub insert: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// No candidates, a blank line, or a failing source.
    None,
    /// Exactly one candidate, applied directly.
    Single(Expansion),
    /// Several candidates, shown as a menu. The buffer is not touched.
    Multiple(Vec<String>),
}

/// What the display has to show for a [`CompletionResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEffect {
    Nothing,
    /// Erase `erase` cells (`"\b \b"` each) then write `write`.
    Splice { erase: usize, write: String },
    /// Emit a newline, one display line per row, then re-render prompt and buffer.
    Menu { rows: Vec<String> },
}

/// Turns the word under the cursor into a [`CompletionResult`] by asking a
/// [`crate::CompletionSource`] for candidates.
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    source: SafeCompletionSource,
}

impl CompletionEngine {
    #[must_use]
    pub fn new(source: SafeCompletionSource) -> Self { Self { source } }

    /// Complete the word before the cursor in `buffer`. `viewport_columns` is only used
    /// to lay out a menu. Source failures degrade to [`CompletionResult::None`].
    ///
    /// The source is given the line up to the cursor, so it sees the same word index
    /// as the engine when the cursor is inside the line.
    pub async fn complete(
        &self,
        buffer: &InputBuffer,
        viewport_columns: u16,
    ) -> (CompletionResult, DisplayEffect) {
        let Some(request) = CompletionRequest::new(buffer.text_before_cursor())
            .map(|it| it.with_text_after_cursor(buffer.text_after_cursor()))
        else {
            return (CompletionResult::None, DisplayEffect::Nothing);
        };

        let candidates = match self
            .source
            .suggest(&request.partial, &request.line)
            .await
        {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::warn!(
                    message = "Completion source failed",
                    issue = %EditorIssue::CompletionUnavailable,
                    partial = %request.partial,
                    error = %err
                );
                vec![]
            }
        };

        tracing::debug!(
            message = "Completion candidates",
            partial = %request.partial,
            word_index = request.word_index,
            count = candidates.len()
        );

        resolve(&request, candidates, viewport_columns)
    }
}

/// The pure half of completion: decide what `candidates` mean for `request`.
#[must_use]
pub fn resolve(
    request: &CompletionRequest,
    mut candidates: Vec<String>,
    viewport_columns: u16,
) -> (CompletionResult, DisplayEffect) {
    match candidates.len() {
        0 => (CompletionResult::None, DisplayEffect::Nothing),
        1 => {
            let candidate = candidates.remove(0);
            let expansion = expand_single(request, candidate);
            let effect = DisplayEffect::Splice {
                erase: expansion.erase,
                write: expansion.insert.clone(),
            };
            (CompletionResult::Single(expansion), effect)
        }
        _ => {
            let rows = layout_grid(&candidates, viewport_columns);
            (CompletionResult::Multiple(candidates), DisplayEffect::Menu { rows })
        }
    }
}

/// Rules for a single candidate:
/// - Command name: the candidate plus one trailing space.
/// - Argument that is an absolute or home relative path: replace the partial word with
///   the full candidate, no trailing space.
/// - Other argument: append the untyped suffix, then a space unless the candidate is a
///   directory (ends with `/`).
///
/// No space is added when the text after the cursor already starts with one.
///
/// When the candidate does not start with the partial (the source returned something
/// else entirely), the partial is erased and the full candidate written.
fn expand_single(request: &CompletionRequest, candidate: String) -> Expansion {
    let is_path = candidate.starts_with('/') || candidate.starts_with('~');
    let boundary = if request.followed_by_space {
        ""
    } else if request.is_command_position() {
        " "
    } else if is_path || candidate.ends_with('/') {
        ""
    } else {
        " "
    };

    let (erase, body) = match candidate.strip_prefix(request.partial.as_str()) {
        Some(suffix) if request.is_command_position() || !is_path => (0, suffix),
        _ => (request.partial_len(), candidate.as_str()),
    };

    let insert = format!("{body}{boundary}");
    Expansion { candidate, erase, insert }
}
