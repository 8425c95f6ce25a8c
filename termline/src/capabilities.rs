// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The seams between the editor core and the outside world. The core only ever talks to
//! these traits, so it can be driven by the real backends in [`crate::backends`] or by
//! the mocks in [`crate::test_fixtures`].

use crate::CollaboratorError;
use async_trait::async_trait;
use std::{fmt::Debug, io, sync::Arc};

/// Runs one complete command line and returns its captured output, or a failure
/// description that the editor shows as `Error: <description>`.
#[async_trait]
pub trait Shell: Send + Sync + Debug {
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when the command could not be run or exited with a
    /// failure status.
    async fn execute(&self, command: &str) -> Result<String, CollaboratorError>;
}

/// Supplies completion candidates for the word currently being typed. The order of the
/// returned candidates is preserved by the engine, so it must be stable for menus to
/// lay out deterministically.
#[async_trait]
pub trait CompletionSource: Send + Sync + Debug {
    /// `full_line` is the line up to the cursor. It lets the source tell a command name
    /// (first word) apart from an argument.
    ///
    /// # Errors
    ///
    /// Any lookup failure. The engine treats it as zero candidates.
    async fn suggest(
        &self,
        partial_word: &str,
        full_line: &str,
    ) -> Result<Vec<String>, CollaboratorError>;
}

/// Absolute path of the current working context, used only for the prompt.
#[async_trait]
pub trait DirectoryProvider: Send + Sync + Debug {
    /// # Errors
    ///
    /// Any lookup failure. The prompt falls back to a plain `$ `.
    async fn current(&self) -> Result<String, CollaboratorError>;
}

pub type SafeShell = Arc<dyn Shell>;
pub type SafeCompletionSource = Arc<dyn CompletionSource>;
pub type SafeDirectoryProvider = Arc<dyn DirectoryProvider>;

/// Raw output sink plus a viewport width query. The editor never reads from it.
pub trait DisplayDevice: Send + Debug {
    /// Write raw bytes (text, erase sequences, cursor movement).
    ///
    /// # Errors
    ///
    /// Underlying I/O failure. This ends the editing session.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Write `text` followed by a line break. The display is in raw mode, so the break
    /// is `\r\n`.
    ///
    /// # Errors
    ///
    /// Underlying I/O failure.
    fn write_line(&mut self, text: &str) -> io::Result<()> {
        let mut bytes = Vec::with_capacity(text.len() + CRLF.len());
        bytes.extend_from_slice(text.as_bytes());
        bytes.extend_from_slice(CRLF.as_bytes());
        self.write(&bytes)
    }

    /// Current viewport width in columns.
    fn columns(&self) -> u16;

    /// # Errors
    ///
    /// Underlying I/O failure.
    fn flush(&mut self) -> io::Result<()>;
}

pub type BoxedDisplayDevice = Box<dyn DisplayDevice>;

/// Line break used on a raw mode display.
pub const CRLF: &str = "\r\n";
