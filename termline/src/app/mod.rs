// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Everything the `termline` binary needs beyond the library: command line parsing and
//! wiring the real backends to a [`crate::LineEditor`].

// Attach.
pub mod clap_config;
pub mod launcher;

// Re-export.
pub use clap_config::*;
pub use launcher::*;
