// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::WorkingDir;
use crate::{CollaboratorError, CompletionSource};
use async_trait::async_trait;
use std::{path::Path, process::Stdio};
use strum_macros::{AsRefStr, Display};
use tokio::process::Command;

/// Which `compgen` action to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum CompgenAction {
    /// Command names: builtins, functions, aliases and executables on `PATH`.
    #[strum(serialize = "-c")]
    Commands,
    /// File and directory names.
    #[strum(serialize = "-f")]
    Files,
    /// Directory names only.
    #[strum(serialize = "-d")]
    Directories,
}

/// A [`CompletionSource`] backed by bash's `compgen`, run in the session's
/// [`WorkingDir`].
///
/// - The first word completes to command names.
/// - Later words complete to file names. `~/` is expanded before the lookup, and
///   results under home are shown with `~` again. Directories get a trailing `/`.
///
/// Candidates are sorted and deduplicated.
#[derive(Debug, Clone)]
pub struct CompgenCompletionSource {
    working_dir: WorkingDir,
}

impl CompgenCompletionSource {
    #[must_use]
    pub fn new(working_dir: WorkingDir) -> Self { Self { working_dir } }

    async fn complete_files(
        &self,
        partial_word: &str,
        current_dir: &Path,
    ) -> Result<Vec<String>, CollaboratorError> {
        let expanded = self.working_dir.expand_tilde(partial_word);

        let files = run_compgen(CompgenAction::Files, &expanded, current_dir).await?;
        if !files.is_empty() {
            return Ok(files
                .into_iter()
                .map(|file| {
                    let is_dir = current_dir.join(&file).is_dir();
                    let mut candidate = self.working_dir.collapse_home(&file);
                    if is_dir && !candidate.ends_with('/') {
                        candidate.push('/');
                    }
                    candidate
                })
                .collect());
        }

        let directories =
            run_compgen(CompgenAction::Directories, &expanded, current_dir).await?;
        Ok(directories
            .into_iter()
            .map(|dir| format!("{}/", self.working_dir.collapse_home(&dir)))
            .collect())
    }
}

#[async_trait]
impl CompletionSource for CompgenCompletionSource {
    async fn suggest(
        &self,
        partial_word: &str,
        full_line: &str,
    ) -> Result<Vec<String>, CollaboratorError> {
        let current_dir = self.working_dir.get()?;

        let mut candidates = if is_command_position(full_line) {
            run_compgen(CompgenAction::Commands, partial_word, &current_dir).await?
        } else {
            self.complete_files(partial_word, &current_dir).await?
        };

        candidates.sort();
        candidates.dedup();
        Ok(candidates)
    }
}

/// The first word is still being typed when the trimmed line has no space in it.
#[must_use]
pub fn is_command_position(full_line: &str) -> bool { !full_line.trim().contains(' ') }

/// Run `compgen <action> -- <word>` in `current_dir`. A word with no matches is not a
/// failure, it just yields no candidates.
///
/// # Errors
///
/// If bash can't be spawned, or `compgen` fails with a message on stderr.
pub async fn run_compgen(
    action: CompgenAction,
    word: &str,
    current_dir: &Path,
) -> Result<Vec<String>, CollaboratorError> {
    let script = format!("compgen {} -- {}", action, shell_words::quote(word));

    let output = Command::new("bash")
        .arg("-c")
        .arg(&script)
        .current_dir(current_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            return Err(CollaboratorError::failed(stderr.into_owned()));
        }
    }

    tracing::trace!(message = "compgen", script = %script, status = %output.status);
    Ok(parse_candidates(&stdout))
}

fn parse_candidates(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}
