// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod command_dispatch;
pub mod echo_frames;
pub mod editor_event;
pub mod line_editor;

// Re-export.
pub use command_dispatch::*;
pub use echo_frames::*;
pub use editor_event::*;
pub use line_editor::*;
