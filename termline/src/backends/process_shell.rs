// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::WorkingDir;
use crate::{CollaboratorError, Shell};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::{process::Command, sync::broadcast};

pub const EXIT_COMMAND: &str = "exit";
pub const EXIT_MESSAGE: &str = "Exiting...";

/// A [`Shell`] that runs each line with `sh -c` in the session's [`WorkingDir`].
///
/// Two lines are handled without spawning a process:
/// - `exit` prints [`EXIT_MESSAGE`] and fires the shutdown channel returned by
///   [`Self::subscribe_to_shutdown()`].
/// - `cd [dir]` changes the [`WorkingDir`], since a child process can't change its
///   parent's directory.
#[derive(Debug)]
pub struct ProcessShell {
    working_dir: WorkingDir,
    shutdown_sender: broadcast::Sender<()>,
}

impl ProcessShell {
    #[must_use]
    pub fn new(working_dir: WorkingDir) -> Self {
        let (shutdown_sender, _) = broadcast::channel(1);
        Self {
            working_dir,
            shutdown_sender,
        }
    }

    /// Fires once when the user runs `exit`. Pass it to
    /// [`crate::LineEditor::run_until_shutdown()`].
    #[must_use]
    pub fn subscribe_to_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_sender.subscribe()
    }

    fn change_directory(&self, target: &str) -> Result<String, CollaboratorError> {
        let new_dir = self.working_dir.resolve(target)?;
        if !new_dir.is_dir() {
            return Err(CollaboratorError::failed(format!(
                "cd: no such directory: {target}"
            )));
        }
        let canonical = new_dir.canonicalize().map_err(|err| {
            CollaboratorError::failed(format!("cd: failed to resolve path: {err}"))
        })?;

        tracing::debug!(message = "Changed directory", path = %canonical.display());
        self.working_dir.set(canonical)?;
        Ok(String::new())
    }

    async fn run_in_sh(&self, command: &str) -> Result<String, CollaboratorError> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(self.working_dir.get()?)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        tracing::debug!(
            message = "sh -c finished",
            status = %output.status,
            stdout_len = stdout.len(),
            stderr_len = stderr.len()
        );

        if output.status.success() {
            Ok(stdout)
        } else if stderr.is_empty() {
            Err(CollaboratorError::failed(format!(
                "Command failed with status: {}",
                output.status
            )))
        } else {
            Err(CollaboratorError::Failed(stderr))
        }
    }
}

#[async_trait]
impl Shell for ProcessShell {
    async fn execute(&self, command: &str) -> Result<String, CollaboratorError> {
        let command = command.trim();

        if command == EXIT_COMMAND {
            // No receivers just means nobody is listening for shutdown.
            let _unused = self.shutdown_sender.send(());
            return Ok(EXIT_MESSAGE.to_string());
        }

        if command == "cd" {
            return self.change_directory("");
        }
        if let Some(target) = command.strip_prefix("cd ") {
            return self.change_directory(target.trim());
        }

        self.run_in_sh(command).await
    }
}
