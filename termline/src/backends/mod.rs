// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Real implementations of the collaborator traits, used by the `termline` binary.
//! The shell and completion source share one [`WorkingDir`], so `cd` changes both what
//! the prompt shows and where completions are looked up.

// Attach.
pub mod compgen_completion_source;
pub mod crossterm_terminal;
pub mod process_shell;
pub mod working_dir;

// Re-export.
pub use compgen_completion_source::*;
pub use crossterm_terminal::*;
pub use process_shell::*;
pub use working_dir::*;
