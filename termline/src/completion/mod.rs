// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod completion_engine;
pub mod completion_grid;
pub mod completion_request;

// Re-export.
pub use completion_engine::*;
pub use completion_grid::*;
pub use completion_request::*;
