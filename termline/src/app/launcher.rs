// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::CLIArg;
use crate::{LineEditor,
            backends::{CompgenCompletionSource, CrosstermDisplay, ProcessShell,
                       RawModeGuard, WorkingDir, crossterm_input_stream},
            tracing_setup};
use miette::IntoDiagnostic;
use std::sync::Arc;

/// Set up logging, wire the real backends to a [`LineEditor`], and run it on the
/// terminal until the user exits.
///
/// # Errors
///
/// If logging can't be set up, the terminal can't enter raw mode, or writing to the
/// terminal fails.
pub async fn run_app(cli_arg: CLIArg) -> miette::Result<()> {
    tracing_setup::init(cli_arg.tracing_config())?;

    let editor_config = cli_arg.editor_config();
    tracing::info!(message = "Starting termline", config = ?editor_config);

    let working_dir = WorkingDir::from_home();
    let shell = ProcessShell::new(working_dir.clone());
    let shutdown_receiver = shell.subscribe_to_shutdown();

    let mut line_editor = LineEditor::new(
        &editor_config,
        Arc::new(shell),
        Arc::new(CompgenCompletionSource::new(working_dir.clone())),
        Arc::new(working_dir),
        Box::new(CrosstermDisplay::new(editor_config.fallback_columns)),
    );

    let raw_mode_guard = RawModeGuard::start().into_diagnostic()?;
    let result = line_editor
        .run_until_shutdown(crossterm_input_stream(), shutdown_receiver)
        .await;
    drop(raw_mode_guard);

    result?;
    Ok(())
}
