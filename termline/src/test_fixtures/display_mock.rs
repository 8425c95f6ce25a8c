// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::StdoutMock;
use crate::DisplayDevice;
use std::{io::{self, Write},
          sync::{Arc,
                 atomic::{AtomicU16, Ordering}}};

/// A [`DisplayDevice`] that records everything into a [`StdoutMock`]. Clones share the
/// same buffer and width, so a test keeps one clone and hands the other to the editor.
#[derive(Clone, Debug)]
pub struct DisplayMock {
    pub stdout_mock: StdoutMock,
    columns: Arc<AtomicU16>,
}

impl DisplayMock {
    #[must_use]
    pub fn new(columns: u16) -> Self {
        Self {
            stdout_mock: StdoutMock::new(),
            columns: Arc::new(AtomicU16::new(columns)),
        }
    }

    /// Simulate the terminal being resized.
    pub fn set_columns(&self, columns: u16) { self.columns.store(columns, Ordering::SeqCst); }

    /// Everything written so far.
    #[must_use]
    pub fn output(&self) -> String { self.stdout_mock.get_copy_of_buffer_as_string() }

    /// Everything written so far, with color and cursor sequences removed.
    #[must_use]
    pub fn output_strip_ansi(&self) -> String {
        self.stdout_mock.get_copy_of_buffer_as_string_strip_ansi()
    }
}

impl Default for DisplayMock {
    fn default() -> Self { Self::new(crate::DEFAULT_FALLBACK_COLUMNS) }
}

impl DisplayDevice for DisplayMock {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> { self.stdout_mock.write_all(bytes) }

    fn columns(&self) -> u16 { self.columns.load(Ordering::SeqCst) }

    fn flush(&mut self) -> io::Result<()> { self.stdout_mock.flush() }
}
