// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # termline
//!
//! The line editing and tab completion engine behind a terminal style front-end. It
//! owns the in-progress command line, echoes every keystroke to a display, lays out
//! completion menus in a column grid, renders a prompt derived from the current
//! directory, and hands finished lines to an external shell.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   EditorEvent   ┌──────────────┐  write / write_line  ┌─────────┐
//! │ input stream ├────────────────►│  LineEditor  ├─────────────────────►│ Display │
//! └──────────────┘                 └──┬───┬───┬───┘                      └─────────┘
//!                                     │   │   │
//!                ┌────────────────────┘   │   └──────────────────┐
//!                ▼                        ▼                      ▼
//!         ┌─────────────┐       ┌──────────────────┐     ┌────────────────┐
//!         │ InputBuffer │       │ CompletionEngine │     │ PromptRenderer │
//!         └─────────────┘       └────────┬─────────┘     └───────┬────────┘
//!                                        ▼                       ▼
//!                               CompletionSource         DirectoryProvider
//! ```
//!
//! The editor itself never spawns a process or touches the filesystem. Those concerns
//! live behind the [`Shell`], [`CompletionSource`] and [`DirectoryProvider`] traits.
//! The [`backends`] module supplies real implementations (built on [`tokio::process`]
//! and bash `compgen`), and [`test_fixtures`] supplies scripted mocks.
//!
//! # Ordering
//!
//! All writes to the [`DisplayDevice`] happen on the task that drives
//! [`LineEditor::run()`]. Shell results come back over a channel and are applied in the
//! order their commands were submitted. Only one shell call is outstanding at a time; a
//! line submitted while another is running is queued.

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod app;
pub mod backends;
pub mod capabilities;
pub mod completion;
pub mod config;
pub mod editor;
pub mod error;
pub mod input_buffer;
pub mod prompt;
pub mod test_fixtures;
pub mod tracing_setup;

// Re-export.
pub use capabilities::*;
pub use completion::*;
pub use config::*;
pub use editor::*;
pub use error::*;
pub use input_buffer::*;
pub use prompt::*;
pub use tracing_setup::*;

// External crates.
use futures_core::Stream;
use smallvec::SmallVec;
use std::pin::Pin;

// Type aliases.
pub type StdMutex<T> = std::sync::Mutex<T>;

/// Async stream of input events, typically a mapped [`crossterm::event::EventStream`].
/// Tests provide one via [`test_fixtures::gen_input_stream`].
pub type PinnedInputStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

/// Stack allocated list for the small collections the editor passes around.
pub type InlineVec<T> = SmallVec<[T; DEFAULT_INLINE_VEC_SIZE]>;
pub const DEFAULT_INLINE_VEC_SIZE: usize = 8;

/// Simple macro to create a [`Result`] with an [`Ok`] variant. It is just syntactic sugar
/// that helps having to write `Ok(())`.
/// - If no arg is passed in then it will return `Ok(())`.
/// - If an arg is passed in then it will return `Ok($arg)`.
#[macro_export]
macro_rules! ok {
    // No args.
    () => {
        Ok(())
    };
    // With arg.
    ($value:expr) => {
        Ok($value)
    };
}
