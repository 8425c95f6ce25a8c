// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DisplayDevice, EditorEvent, PinnedInputStream, convert_crossterm_event};
use crossterm::{event::EventStream, terminal};
use futures_util::StreamExt;
use std::io::{self, Stdout, Write};

/// A [`DisplayDevice`] over the process stdout. Expects the terminal to be in raw mode
/// (see [`RawModeGuard`]), which is why line breaks are written as `\r\n`.
#[derive(Debug)]
pub struct CrosstermDisplay {
    stdout: Stdout,
    fallback_columns: u16,
}

impl CrosstermDisplay {
    /// `fallback_columns` is used when the terminal size can't be queried (eg: stdout is
    /// not a tty).
    #[must_use]
    pub fn new(fallback_columns: u16) -> Self {
        Self {
            stdout: io::stdout(),
            fallback_columns,
        }
    }
}

impl DisplayDevice for CrosstermDisplay {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> { self.stdout.write_all(bytes) }

    fn columns(&self) -> u16 {
        match terminal::size() {
            Ok((columns, _rows)) if columns > 0 => columns,
            _ => self.fallback_columns,
        }
    }

    fn flush(&mut self) -> io::Result<()> { self.stdout.flush() }
}

/// Key presses and resizes from the terminal, as [`EditorEvent`]s. Read errors are
/// logged and skipped.
#[must_use]
pub fn crossterm_input_stream() -> PinnedInputStream<EditorEvent> {
    let stream = EventStream::new().filter_map(|maybe_event| async move {
        match maybe_event {
            Ok(event) => Some(convert_crossterm_event(event)),
            Err(err) => {
                tracing::error!(message = "Failed to read terminal event", error = ?err);
                None
            }
        }
    });
    Box::pin(stream)
}

/// Raw mode is enabled while this is alive and disabled when it is dropped, including
/// when unwinding from a panic.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// # Errors
    ///
    /// If stdin is not a terminal.
    pub fn start() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        tracing::debug!(message = "Raw mode enabled");
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Nothing useful can be done about a failure here.
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::error!(message = "Failed to disable raw mode", error = ?err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_is_never_zero() {
        // Under a test harness stdout is usually not a tty, so this exercises the
        // fallback. On a real terminal it is the terminal width.
        let display = CrosstermDisplay::new(80);
        assert!(display.columns() > 0);
    }
}
