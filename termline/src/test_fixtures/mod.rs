// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mocks for driving a [`crate::LineEditor`] without a terminal, a shell, or a
//! filesystem. Used by the unit tests in this crate, the integration tests, and anyone
//! embedding the editor who wants to test their own wiring.

// Attach.
pub mod collaborator_mocks;
pub mod display_mock;
pub mod input_stream_mock;
pub mod stdout_mock;

// Re-export.
pub use collaborator_mocks::*;
pub use display_mock::*;
pub use input_stream_mock::*;
pub use stdout_mock::*;
