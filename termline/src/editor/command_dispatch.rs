// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CollaboratorError, SafeShell};
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::Instrument;

/// Monotonically increasing per editor. Only used to correlate log lines.
pub type CommandId = u64;

/// A finished shell call, sent back to the editor task to be written to the display.
#[derive(Debug)]
pub struct CommandOutcome {
    pub id: CommandId,
    pub command: String,
    pub result: Result<String, CollaboratorError>,
}

/// Run `command` on `shell` in a new task and send the [`CommandOutcome`] to
/// `outcome_sender`. An outcome is always sent, even when the shell panics, so the
/// editor never waits forever on a dead command.
pub fn spawn_command(
    id: CommandId,
    command: String,
    shell: SafeShell,
    outcome_sender: UnboundedSender<CommandOutcome>,
) -> JoinHandle<()> {
    let span = tracing::info_span!("command", id, command = %command);
    tokio::spawn(
        async move {
            let command_clone = command.clone();
            let result =
                match tokio::spawn(async move { shell.execute(&command_clone).await }).await {
                    Ok(result) => result,
                    Err(join_error) => Err(join_error.into()),
                };

            tracing::info!(message = "Command finished", success = result.is_ok());

            // The receiver is gone only when the editor was dropped.
            let _unused = outcome_sender.send(CommandOutcome {
                id,
                command,
                result,
            });
        }
        .instrument(span),
    )
}

/// Split shell output into display lines. `\r\n` and lone `\r` count as line breaks,
/// and empty lines are dropped so the output has no blank rows.
pub fn output_lines(output: &str) -> impl Iterator<Item = &str> {
    output
        .split("\r\n")
        .flat_map(|it| it.split(['\r', '\n']))
        .filter(|line| !line.is_empty())
}

/// The single display line for a failed command: `Error: <description>`. Trailing line
/// breaks are trimmed and interior ones are written as `\r\n` for a raw mode display.
#[must_use]
pub fn failure_line(err: &CollaboratorError) -> String {
    let description = err.to_string();
    let description = description.trim_end_matches(['\r', '\n']);
    let description = description
        .split("\r\n")
        .flat_map(|it| it.split(['\r', '\n']))
        .collect::<Vec<_>>()
        .join("\r\n");
    format!("Error: {description}")
}
