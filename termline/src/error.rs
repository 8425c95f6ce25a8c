// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;
use std::io;
use strum_macros::{Display, EnumString};

// ╭──────────────────────────────────────────────────────────╮
// │ Buffer                                                   │
// ╰──────────────────────────────────────────────────────────╯

/// A character the [`crate::InputBuffer`] refuses to store. The editor drops these
/// silently, nothing is echoed and the buffer does not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Diagnostic)]
#[error("Rejected input character {ch:?}")]
#[diagnostic(
    code(termline::buffer::input_rejected),
    help("Only printable ASCII (space through tilde) can be typed into the buffer")
)]
pub struct InputRejected {
    pub ch: char,
}

// ╭──────────────────────────────────────────────────────────╮
// │ Collaborators                                            │
// ╰──────────────────────────────────────────────────────────╯

/// Failure reported by a [`crate::Shell`], [`crate::CompletionSource`] or
/// [`crate::DirectoryProvider`]. These never end the editing session.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum CollaboratorError {
    /// A human readable description, shown to the user verbatim when it comes from the
    /// shell.
    #[error("{0}")]
    #[diagnostic(code(termline::collaborator::failed))]
    Failed(String),

    #[error(transparent)]
    #[diagnostic(code(termline::collaborator::io))]
    Io(#[from] io::Error),

    /// The task running the collaborator call panicked or was aborted.
    #[error("Background task failed: {0}")]
    #[diagnostic(code(termline::collaborator::join))]
    Join(String),
}

impl CollaboratorError {
    pub fn failed(description: impl Into<String>) -> Self {
        CollaboratorError::Failed(description.into())
    }
}

impl From<tokio::task::JoinError> for CollaboratorError {
    fn from(err: tokio::task::JoinError) -> Self { CollaboratorError::Join(err.to_string()) }
}

// ╭──────────────────────────────────────────────────────────╮
// │ Session                                                  │
// ╰──────────────────────────────────────────────────────────╯

/// Errors that end a [`crate::LineEditor`] session. Collaborator failures are never
/// surfaced here; only a broken display is.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum TermlineError {
    /// Writing to the display failed.
    #[error(transparent)]
    #[diagnostic(
        code(termline::session::io),
        help("The terminal may have been closed")
    )]
    Io(#[from] io::Error),
}

/// The kinds of degradation the editor absorbs. Used as a structured field in tracing
/// events so log output can be filtered by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum EditorIssue {
    /// Non-printable or unsupported key, dropped.
    InputRejected,
    /// Completion source failed or returned nothing.
    CompletionUnavailable,
    /// Shell returned a failure, shown as an `Error: ...` line.
    ExecutionFailed,
    /// Directory lookup failed, prompt fell back to plain `$ `.
    DirectoryUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_collaborator_error_display_is_the_description() {
        let err = CollaboratorError::failed("ls: cannot access 'nope'");
        assert_eq!(err.to_string(), "ls: cannot access 'nope'");
    }

    #[test]
    fn test_collaborator_error_from_io() {
        let err: CollaboratorError =
            io::Error::new(io::ErrorKind::NotFound, "no such file").into();
        assert!(matches!(err, CollaboratorError::Io(_)));
        assert_eq!(err.to_string(), "no such file");
    }

    #[test]
    fn test_editor_issue_round_trips_through_strum() {
        assert_eq!(EditorIssue::CompletionUnavailable.to_string(), "CompletionUnavailable");
        assert_eq!(
            EditorIssue::from_str("DirectoryUnavailable").unwrap(),
            EditorIssue::DirectoryUnavailable
        );
    }
}
