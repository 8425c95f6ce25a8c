// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BoxedDisplayDevice, CRLF, CommandId, CommandOutcome, CompletionEngine,
            CompletionResult, DisplayEffect, EditorConfig, EditorEvent, EditorIssue,
            INTERRUPT_ECHO, InputBuffer, NEWLINE_ECHO, PinnedInputStream, PromptRenderer,
            SafeCompletionSource, SafeDirectoryProvider, SafeShell, TermlineError,
            clear_current_row, cursor_left, delete_at_cursor, edit_before_cursor,
            failure_line, ok, output_lines, prompt_and_buffer, spawn_command};
use futures_util::StreamExt;
use std::collections::VecDeque;
use tokio::sync::{broadcast,
                  mpsc::{self, UnboundedReceiver, UnboundedSender}};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// A prompt is showing and the user is editing.
    Idle,
    /// A line was submitted and no prompt is showing. Typed-ahead input is still
    /// buffered and echoed.
    AwaitingCommand,
}

/// What the caller driving [`LineEditor::apply_event()`] should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorControl {
    Continue,
    /// The user asked to end the session (Ctrl+D on an empty line).
    Exit,
}

/// # Mental model
///
/// The editor is a small state machine ([`EditorState`]) that owns an [`InputBuffer`]
/// and a display. Each [`EditorEvent`] mutates the buffer and writes exactly the bytes
/// needed to make the display match it. Tab asks the [`CompletionEngine`]; Enter hands
/// the line to the [`crate::Shell`] on a separate task.
///
/// # Ordering and single flight
///
/// Only one shell call is outstanding at a time. A line submitted while another is
/// running waits in a FIFO queue and is dispatched when the running one finishes.
/// Results come back over a channel and are only applied by the task that drives the
/// editor ([`Self::run()`]), so output from a command is never interleaved with the
/// echo of a keystroke. Completion and prompt lookups are awaited inline, so their
/// results are applied in the order of the events that triggered them.
///
/// # Interrupt
///
/// Ctrl+C clears the buffer and any queued lines, and shows a fresh prompt. It does not
/// cancel a running command; that command's output is still written when it arrives,
/// followed by another prompt.
#[derive(Debug)]
pub struct LineEditor {
    buffer: InputBuffer,
    state: EditorState,
    /// Whether the current row starts with a prompt.
    prompt_visible: bool,
    completion_engine: CompletionEngine,
    prompt_renderer: PromptRenderer,
    shell: SafeShell,
    directory_provider: SafeDirectoryProvider,
    display: BoxedDisplayDevice,
    /// Width from the last resize event. Takes precedence over the display's own answer.
    resized_columns: Option<u16>,
    welcome_message: Option<String>,
    /// Set once the session is winding down. No more input is read and no prompt
    /// follows the last command's output.
    ending: bool,
    in_flight: Option<CommandId>,
    queued_commands: VecDeque<String>,
    next_command_id: CommandId,
    outcome_sender: UnboundedSender<CommandOutcome>,
    outcome_receiver: UnboundedReceiver<CommandOutcome>,
}

impl LineEditor {
    #[must_use]
    pub fn new(
        config: &EditorConfig,
        shell: SafeShell,
        completion_source: SafeCompletionSource,
        directory_provider: SafeDirectoryProvider,
        display: BoxedDisplayDevice,
    ) -> Self {
        let (outcome_sender, outcome_receiver) = mpsc::unbounded_channel();
        Self {
            buffer: InputBuffer::new(),
            state: EditorState::Idle,
            prompt_visible: false,
            completion_engine: CompletionEngine::new(completion_source),
            prompt_renderer: PromptRenderer::new(config),
            shell,
            directory_provider,
            display,
            resized_columns: None,
            welcome_message: config.welcome_message.clone(),
            ending: false,
            in_flight: None,
            queued_commands: VecDeque::new(),
            next_command_id: 0,
            outcome_sender,
            outcome_receiver,
        }
    }

    #[must_use]
    pub fn state(&self) -> EditorState { self.state }

    #[must_use]
    pub fn buffer(&self) -> &InputBuffer { &self.buffer }

    #[must_use]
    pub fn has_command_in_flight(&self) -> bool { self.in_flight.is_some() }

    #[must_use]
    pub fn queued_command_count(&self) -> usize { self.queued_commands.len() }

    /// Width used to lay out completion menus.
    #[must_use]
    pub fn viewport_columns(&self) -> u16 {
        self.resized_columns
            .unwrap_or_else(|| self.display.columns())
    }

    /// Write the welcome message (first call only) and the first prompt.
    ///
    /// # Errors
    ///
    /// Display I/O failure.
    pub async fn start(&mut self) -> Result<(), TermlineError> {
        if let Some(welcome_message) = self.welcome_message.take() {
            self.display.write_line(&welcome_message)?;
        }
        self.show_prompt_and_buffer().await?;
        self.state = EditorState::Idle;
        self.display.flush()?;
        ok!()
    }

    /// Drive the editor until `input` ends or the user exits. Same as
    /// [`Self::run_until_shutdown()`] with a shutdown channel that never fires.
    ///
    /// # Errors
    ///
    /// Display I/O failure.
    pub async fn run(
        &mut self,
        input: PinnedInputStream<EditorEvent>,
    ) -> Result<(), TermlineError> {
        let (_shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);
        self.run_until_shutdown(input, shutdown_receiver).await
    }

    /// Drive the editor: write the first prompt, then apply input events and command
    /// outcomes as they arrive. Returns when
    /// - the user exits (Ctrl+D on an empty line), or
    /// - `shutdown` fires, or
    /// - `input` ends.
    ///
    /// In every case a command that is still running is waited for, and its output
    /// written, before returning. Lines queued behind it still run, unless `shutdown`
    /// fired, which drops them.
    ///
    /// # Errors
    ///
    /// Display I/O failure. Collaborator failures never end the session.
    pub async fn run_until_shutdown(
        &mut self,
        mut input: PinnedInputStream<EditorEvent>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), TermlineError> {
        self.start().await?;

        loop {
            if self.ending && self.in_flight.is_none() {
                break;
            }

            tokio::select! {
                biased;

                // Branch: shutdown signal. Checked first so a command that triggers the
                // shutdown (eg: `exit`) doesn't get a prompt written after its output.
                _ = shutdown.recv(), if !self.ending => {
                    tracing::info!(
                        message = "Shutdown requested",
                        dropped = self.queued_commands.len()
                    );
                    self.queued_commands.clear();
                    self.ending = true;
                }

                // Branch: command outcomes. Applied before any later keystroke. This is
                // cancel safe because recv is cancel safe.
                Some(outcome) = self.outcome_receiver.recv() => {
                    self.apply_command_outcome(outcome).await?;
                }

                // Branch: user input. This is cancel safe because `next()` on the pinned
                // stream does not lose items when dropped.
                maybe_event = input.next(), if !self.ending => {
                    match maybe_event {
                        Some(event) => {
                            if self.apply_event(event).await? == EditorControl::Exit {
                                self.ending = true;
                            }
                        }
                        None => {
                            tracing::debug!(message = "Input stream ended");
                            self.ending = true;
                        }
                    }
                }

                else => break,
            }
        }

        tracing::info!(message = "Editor session ended");
        ok!()
    }

    /// Apply one input event: mutate the buffer, echo, and possibly complete or
    /// dispatch.
    ///
    /// # Errors
    ///
    /// Display I/O failure.
    pub async fn apply_event(
        &mut self,
        event: EditorEvent,
    ) -> Result<EditorControl, TermlineError> {
        tracing::debug!(message = "apply_event", event = ?event, state = ?self.state);

        let control = match event {
            EditorEvent::Char(ch) => self.handle_char(ch),
            EditorEvent::Backspace => self.handle_backspace(),
            EditorEvent::Delete => self.handle_delete(),
            EditorEvent::Left => self.handle_left(),
            EditorEvent::Right => self.handle_right(),
            EditorEvent::Home => self.handle_home(),
            EditorEvent::End => self.handle_end(),
            EditorEvent::Tab => self.handle_tab().await,
            EditorEvent::Enter => self.handle_enter().await,
            EditorEvent::Interrupt => self.handle_interrupt().await,
            EditorEvent::Eof => self.handle_eof(),
            EditorEvent::Resize(columns) => {
                self.resized_columns = Some(columns);
                Ok(EditorControl::Continue)
            }
            EditorEvent::Ignored => Ok(EditorControl::Continue),
        }?;

        self.display.flush()?;
        Ok(control)
    }

    /// Write the result of a finished command, then either dispatch the next queued
    /// line or show a prompt.
    ///
    /// # Errors
    ///
    /// Display I/O failure.
    pub async fn apply_command_outcome(
        &mut self,
        outcome: CommandOutcome,
    ) -> Result<(), TermlineError> {
        if self.in_flight == Some(outcome.id) {
            self.in_flight = None;
        } else {
            tracing::warn!(
                message = "Outcome for a command that is not in flight",
                id = outcome.id,
                in_flight = ?self.in_flight
            );
        }

        // Typed-ahead text or a prompt may be on the current row.
        if self.prompt_visible || !self.buffer.is_empty() {
            self.display.write(&clear_current_row()?)?;
        }

        match &outcome.result {
            Ok(output) => {
                for line in output_lines(output) {
                    self.display.write_line(line)?;
                }
            }
            Err(err) => {
                tracing::warn!(
                    message = "Command failed",
                    issue = %EditorIssue::ExecutionFailed,
                    id = outcome.id,
                    error = %err
                );
                self.display.write_line(&failure_line(err))?;
            }
        }

        if let Some(next_command) = self.queued_commands.pop_front() {
            self.dispatch(next_command);
            self.prompt_visible = false;
            self.state = EditorState::AwaitingCommand;
            let frame = prompt_and_buffer("", &self.buffer);
            self.write_str(&frame)?;
        } else if self.ending {
            self.state = EditorState::Idle;
        } else {
            self.show_prompt_and_buffer().await?;
            self.state = EditorState::Idle;
        }

        self.display.flush()?;
        ok!()
    }

    /// Wait for the next command outcome and apply it. For callers that drive the
    /// editor with [`Self::apply_event()`] instead of [`Self::run()`].
    ///
    /// # Errors
    ///
    /// Display I/O failure.
    pub async fn apply_next_command_outcome(&mut self) -> Result<(), TermlineError> {
        if let Some(outcome) = self.outcome_receiver.recv().await {
            self.apply_command_outcome(outcome).await?;
        }
        ok!()
    }
}

mod handlers {
    use super::*;

    impl LineEditor {
        pub(super) fn handle_char(&mut self, ch: char) -> Result<EditorControl, TermlineError> {
            match self.buffer.insert(ch) {
                Ok(()) => {
                    let frame = edit_before_cursor(
                        "",
                        ch.encode_utf8(&mut [0; 4]),
                        self.buffer.text_after_cursor(),
                    );
                    self.write_str(&frame)?;
                }
                Err(rejected) => {
                    tracing::trace!(
                        message = "Dropped input",
                        issue = %EditorIssue::InputRejected,
                        ch = ?rejected.ch
                    );
                }
            }
            Ok(EditorControl::Continue)
        }

        pub(super) fn handle_backspace(&mut self) -> Result<EditorControl, TermlineError> {
            if let Some(removed) = self.buffer.backspace() {
                let frame = edit_before_cursor(
                    removed.encode_utf8(&mut [0; 4]),
                    "",
                    self.buffer.text_after_cursor(),
                );
                self.write_str(&frame)?;
            }
            Ok(EditorControl::Continue)
        }

        pub(super) fn handle_delete(&mut self) -> Result<EditorControl, TermlineError> {
            if let Some(removed) = self.buffer.delete() {
                let frame = delete_at_cursor(
                    removed.encode_utf8(&mut [0; 4]),
                    self.buffer.text_after_cursor(),
                );
                self.write_str(&frame)?;
            }
            Ok(EditorControl::Continue)
        }

        pub(super) fn handle_left(&mut self) -> Result<EditorControl, TermlineError> {
            let maybe_prev = self.buffer.text_before_cursor().chars().next_back();
            if let Some(prev) = maybe_prev
                && self.buffer.move_left()
            {
                self.write_str(&cursor_left(prev.width().unwrap_or(1)))?;
            }
            Ok(EditorControl::Continue)
        }

        pub(super) fn handle_right(&mut self) -> Result<EditorControl, TermlineError> {
            let maybe_next = self.buffer.text_after_cursor().chars().next();
            if let Some(next) = maybe_next
                && self.buffer.move_right()
            {
                // Writing the character moves the cursor over it.
                self.write_str(next.encode_utf8(&mut [0; 4]))?;
            }
            Ok(EditorControl::Continue)
        }

        pub(super) fn handle_home(&mut self) -> Result<EditorControl, TermlineError> {
            let width = self.buffer.text_before_cursor().width();
            self.buffer.move_home();
            self.write_str(&cursor_left(width))?;
            Ok(EditorControl::Continue)
        }

        pub(super) fn handle_end(&mut self) -> Result<EditorControl, TermlineError> {
            let after = self.buffer.text_after_cursor().to_string();
            self.buffer.move_end();
            self.write_str(&after)?;
            Ok(EditorControl::Continue)
        }

        pub(super) async fn handle_tab(&mut self) -> Result<EditorControl, TermlineError> {
            let columns = self.viewport_columns();
            let (result, effect) = self.completion_engine.complete(&self.buffer, columns).await;

            match effect {
                DisplayEffect::Nothing => {}
                DisplayEffect::Splice { erase, write } => {
                    let before = self.buffer.text_before_cursor();
                    let skip = before.chars().count().saturating_sub(erase);
                    let erased: String = before.chars().skip(skip).collect();

                    match self.buffer.splice_before_cursor(erase, &write) {
                        Ok(()) => {
                            let frame = edit_before_cursor(
                                &erased,
                                &write,
                                self.buffer.text_after_cursor(),
                            );
                            self.write_str(&frame)?;
                        }
                        Err(rejected) => {
                            tracing::warn!(
                                message = "Completion candidate can't be typed",
                                issue = %EditorIssue::CompletionUnavailable,
                                result = ?result,
                                ch = ?rejected.ch
                            );
                        }
                    }
                }
                DisplayEffect::Menu { rows } => {
                    if let CompletionResult::Multiple(candidates) = &result {
                        tracing::debug!(message = "Completion menu", count = candidates.len());
                    }
                    self.write_str(NEWLINE_ECHO)?;
                    for row in &rows {
                        self.display.write_line(row)?;
                    }
                    self.redraw_current_row().await?;
                }
            }

            Ok(EditorControl::Continue)
        }

        pub(super) async fn handle_enter(&mut self) -> Result<EditorControl, TermlineError> {
            self.write_str(NEWLINE_ECHO)?;

            if self.buffer.is_blank() {
                self.buffer.clear();
                self.show_prompt_and_buffer().await?;
                self.state = EditorState::Idle;
                return Ok(EditorControl::Continue);
            }

            let command = self.buffer.take();
            self.prompt_visible = false;
            self.state = EditorState::AwaitingCommand;

            if self.in_flight.is_some() {
                tracing::info!(
                    message = "Command queued behind running command",
                    command = %command,
                    queued = self.queued_commands.len() + 1
                );
                self.queued_commands.push_back(command);
            } else {
                self.dispatch(command);
            }

            Ok(EditorControl::Continue)
        }

        pub(super) async fn handle_interrupt(&mut self) -> Result<EditorControl, TermlineError> {
            self.write_str(INTERRUPT_ECHO)?;
            self.buffer.clear();

            if !self.queued_commands.is_empty() {
                tracing::info!(
                    message = "Interrupt dropped queued commands",
                    dropped = self.queued_commands.len()
                );
                self.queued_commands.clear();
            }

            self.show_prompt_and_buffer().await?;
            self.state = EditorState::Idle;
            Ok(EditorControl::Continue)
        }

        pub(super) fn handle_eof(&mut self) -> Result<EditorControl, TermlineError> {
            if self.buffer.is_empty() {
                self.write_str(CRLF)?;
                return Ok(EditorControl::Exit);
            }
            self.handle_delete()
        }
    }
}

mod rendering {
    use super::*;

    impl LineEditor {
        pub(super) fn write_str(&mut self, frame: &str) -> Result<(), TermlineError> {
            if !frame.is_empty() {
                self.display.write(frame.as_bytes())?;
            }
            ok!()
        }

        /// Render a fresh prompt (the directory may have changed) followed by the buffer.
        pub(super) async fn show_prompt_and_buffer(&mut self) -> Result<(), TermlineError> {
            let prompt = self
                .prompt_renderer
                .render_from(self.directory_provider.as_ref())
                .await;
            let frame = prompt_and_buffer(&prompt, &self.buffer);
            self.write_str(&frame)?;
            self.prompt_visible = true;
            ok!()
        }

        /// Draw the current row again on an empty line, with a prompt only if one was
        /// showing.
        pub(super) async fn redraw_current_row(&mut self) -> Result<(), TermlineError> {
            if self.prompt_visible {
                self.show_prompt_and_buffer().await
            } else {
                let frame = prompt_and_buffer("", &self.buffer);
                self.write_str(&frame)
            }
        }

        pub(super) fn dispatch(&mut self, command: String) {
            let id = self.next_command_id;
            self.next_command_id += 1;
            self.in_flight = Some(id);

            tracing::info!(message = "Dispatching command", id, command = %command);
            spawn_command(id, command, self.shell.clone(), self.outcome_sender.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ERASE_CELL, HomeDirRule,
                test_fixtures::{CompletionSourceMock, DirectoryProviderMock, DisplayMock,
                                ShellMock, type_text}};
    use pretty_assertions::assert_eq;
    use std::{sync::Arc, time::Duration};

    const HOME: &str = "/home/nadia";
    const CWD: &str = "/home/nadia/code";

    struct Fixture {
        editor: LineEditor,
        display: DisplayMock,
        shell: ShellMock,
        directory: DirectoryProviderMock,
        prompt_renderer: PromptRenderer,
    }

    impl Fixture {
        fn new(shell: ShellMock, source: CompletionSourceMock) -> Self {
            let display = DisplayMock::new(80);
            let directory = DirectoryProviderMock::new(CWD);
            let config = EditorConfig::default()
                .with_home_rule(HomeDirRule::Exact(HOME.into()))
                .with_welcome_message(None);
            let editor = LineEditor::new(
                &config,
                Arc::new(shell.clone()),
                Arc::new(source),
                Arc::new(directory.clone()),
                Box::new(display.clone()),
            );
            Self {
                editor,
                display,
                shell,
                directory,
                prompt_renderer: PromptRenderer::new(&config),
            }
        }

        fn with_shell(shell: ShellMock) -> Self {
            Self::new(shell, CompletionSourceMock::new(vec![]))
        }

        fn with_candidates(candidates: &[&str]) -> Self {
            Self::new(
                ShellMock::new(),
                CompletionSourceMock::new(candidates.iter().map(ToString::to_string).collect()),
            )
        }

        fn prompt(&self) -> String { self.prompt_renderer.render(CWD) }

        async fn started(mut self) -> Self {
            self.editor.start().await.unwrap();
            self
        }

        async fn send(&mut self, events: impl IntoIterator<Item = EditorEvent>) {
            for event in events {
                self.editor.apply_event(event).await.unwrap();
            }
        }

        async fn type_text(&mut self, text: &str) { self.send(type_text(text)).await; }
    }

    /// Column of the cursor after replaying `frame` on a single row: printable
    /// characters advance, backspace retreats.
    fn visual_cursor_column(frame: &str) -> usize {
        frame.chars().fold(0, |column, ch| match ch {
            BACKSPACE_CHAR => column - 1,
            _ => column + 1,
        })
    }
    const BACKSPACE_CHAR: char = '\x08';

    #[tokio::test]
    async fn test_start_writes_welcome_then_prompt() {
        let display = DisplayMock::new(80);
        let config = EditorConfig::default()
            .with_home_rule(HomeDirRule::Disabled)
            .with_welcome_message(Some("Welcome!".into()));
        let mut editor = LineEditor::new(
            &config,
            Arc::new(ShellMock::new()),
            Arc::new(CompletionSourceMock::new(vec![])),
            Arc::new(DirectoryProviderMock::new("/srv")),
            Box::new(display.clone()),
        );

        editor.start().await.unwrap();

        let expected = format!("Welcome!\r\n{}", PromptRenderer::new(&config).render("/srv"));
        assert_eq!(display.output(), expected);
        assert_eq!(editor.state(), EditorState::Idle);
    }

    #[tokio::test]
    async fn test_prompt_shows_collapsed_directory_basename() {
        let fixture = Fixture::with_shell(ShellMock::new()).started().await;
        assert_eq!(fixture.display.output_strip_ansi(), "code $ ");
    }

    #[tokio::test]
    async fn test_prompt_falls_back_when_directory_unavailable() {
        let mut fixture = Fixture::with_shell(ShellMock::new());
        fixture.editor.directory_provider = Arc::new(DirectoryProviderMock::failing());
        let fixture = fixture.started().await;
        assert_eq!(fixture.display.output(), "$ ");
    }

    #[tokio::test]
    async fn test_typing_then_erasing_returns_to_prompt_column() {
        let mut fixture = Fixture::with_shell(ShellMock::new()).started().await;
        let typed = "ls -la ~/x";

        fixture.type_text(typed).await;
        fixture
            .send(std::iter::repeat_n(EditorEvent::Backspace, typed.len()))
            .await;

        assert!(fixture.editor.buffer().is_empty());
        let output = fixture.display.output();
        let after_prompt = output.strip_prefix(&fixture.prompt()).unwrap();
        assert_eq!(
            after_prompt,
            format!("{typed}{}", ERASE_CELL.repeat(typed.len()))
        );
        assert_eq!(visual_cursor_column(after_prompt), 0);
    }

    #[tokio::test]
    async fn test_backspace_on_empty_buffer_writes_nothing() {
        let mut fixture = Fixture::with_shell(ShellMock::new()).started().await;
        fixture.send([EditorEvent::Backspace]).await;
        assert_eq!(fixture.display.output(), fixture.prompt());
    }

    #[tokio::test]
    async fn test_rejected_input_is_silent() {
        let mut fixture = Fixture::with_shell(ShellMock::new()).started().await;
        fixture
            .send([EditorEvent::Char('é'), EditorEvent::Char('\u{1}'), EditorEvent::Ignored])
            .await;
        assert_eq!(fixture.display.output(), fixture.prompt());
        assert!(fixture.editor.buffer().is_empty());
    }

    #[tokio::test]
    async fn test_blank_enter_reprompts_without_shell() {
        let mut fixture = Fixture::with_shell(ShellMock::new()).started().await;

        fixture.type_text("   ").await;
        fixture.send([EditorEvent::Enter]).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let prompt = fixture.prompt();
        assert_eq!(fixture.display.output(), format!("{prompt}   \r\n{prompt}"));
        assert!(fixture.shell.get_calls().is_empty());
        assert!(fixture.editor.buffer().is_empty());
        assert_eq!(fixture.editor.state(), EditorState::Idle);
    }

    #[tokio::test]
    async fn test_enter_dispatches_and_writes_output_lines() {
        let shell = ShellMock::new().with_output("echo hi", "hi\r\n\r\nthere\n");
        let mut fixture = Fixture::with_shell(shell).started().await;

        fixture.type_text("echo hi").await;
        fixture.send([EditorEvent::Enter]).await;

        assert_eq!(fixture.editor.state(), EditorState::AwaitingCommand);
        assert!(fixture.editor.buffer().is_empty());
        assert!(fixture.editor.has_command_in_flight());

        fixture.editor.apply_next_command_outcome().await.unwrap();

        let prompt = fixture.prompt();
        assert_eq!(
            fixture.display.output(),
            format!("{prompt}echo hi\r\nhi\r\nthere\r\n{prompt}")
        );
        assert_eq!(fixture.shell.get_calls(), vec!["echo hi"]);
        assert_eq!(fixture.editor.state(), EditorState::Idle);
        assert!(!fixture.editor.has_command_in_flight());
    }

    #[tokio::test]
    async fn test_failure_is_a_single_error_line() {
        let shell = ShellMock::new().with_failure("false", "Command failed with status: 1\n");
        let mut fixture = Fixture::with_shell(shell).started().await;

        fixture.type_text("false").await;
        fixture.send([EditorEvent::Enter]).await;
        fixture.editor.apply_next_command_outcome().await.unwrap();

        let prompt = fixture.prompt();
        assert_eq!(
            fixture.display.output(),
            format!("{prompt}false\r\nError: Command failed with status: 1\r\n{prompt}")
        );
        assert_eq!(fixture.editor.state(), EditorState::Idle);
    }

    #[tokio::test]
    async fn test_prompt_follows_directory_changes() {
        let mut fixture = Fixture::with_shell(ShellMock::new()).started().await;

        fixture.type_text("cd /tmp").await;
        fixture.send([EditorEvent::Enter]).await;
        fixture.directory.set_current("/tmp");
        fixture.editor.apply_next_command_outcome().await.unwrap();

        let tmp_prompt = fixture.prompt_renderer.render("/tmp");
        assert!(fixture.display.output().ends_with(&format!("cd /tmp\r\n{tmp_prompt}")));
    }

    #[tokio::test]
    async fn test_tab_single_command_completion() {
        let mut fixture = Fixture::with_candidates(&["config.json"]).started().await;

        fixture.type_text("conf").await;
        fixture.send([EditorEvent::Tab]).await;

        assert_eq!(fixture.editor.buffer().snapshot(), "config.json ");
        assert_eq!(
            fixture.display.output(),
            format!("{}config.json ", fixture.prompt())
        );
    }

    #[tokio::test]
    async fn test_tab_completes_command_name_inside_line() {
        let source = CompletionSourceMock::new(vec![]).with_rule("ech", &["echo"]);
        let mut fixture = Fixture::new(ShellMock::new(), source.clone()).started().await;

        fixture.type_text("ech foo").await;
        fixture.send([EditorEvent::Home]).await;
        fixture.send([EditorEvent::Right, EditorEvent::Right, EditorEvent::Right]).await;
        fixture.send([EditorEvent::Tab]).await;

        assert_eq!(source.get_calls(), vec![("ech".to_string(), "ech".to_string())]);
        assert_eq!(fixture.editor.buffer().snapshot(), "echo foo");
        assert_eq!(fixture.editor.buffer().cursor(), 4);
        assert_eq!(
            fixture.display.output(),
            format!(
                "{}ech foo{}echo foo{}",
                fixture.prompt(),
                cursor_left(7),
                cursor_left(4)
            )
        );
    }

    #[tokio::test]
    async fn test_tab_absolute_path_replaces_partial() {
        let mut fixture = Fixture::with_candidates(&["/usr/local/bin"]).started().await;

        fixture.type_text("cd loc").await;
        fixture.send([EditorEvent::Tab]).await;

        assert_eq!(fixture.editor.buffer().snapshot(), "cd /usr/local/bin");
        assert_eq!(
            fixture.display.output(),
            format!("{}cd loc{}/usr/local/bin", fixture.prompt(), ERASE_CELL.repeat(3))
        );
    }

    #[tokio::test]
    async fn test_tab_multiple_candidates_shows_menu() {
        let mut fixture = Fixture::with_candidates(&["foo.txt", "foobar.txt"]).started().await;

        fixture.type_text("foo").await;
        fixture.send([EditorEvent::Tab]).await;

        let prompt = fixture.prompt();
        assert_eq!(fixture.editor.buffer().snapshot(), "foo");
        assert_eq!(
            fixture.display.output(),
            format!("{prompt}foo\r\nfoo.txt     foobar.txt  \r\n{prompt}foo")
        );
    }

    #[tokio::test]
    async fn test_resize_changes_menu_layout() {
        let mut fixture = Fixture::with_candidates(&["a", "b", "c", "d", "e"]).started().await;

        fixture.send([EditorEvent::Resize(10)]).await;
        fixture.type_text("x ").await;
        fixture.send([EditorEvent::Tab]).await;

        assert_eq!(fixture.editor.viewport_columns(), 10);
        let prompt = fixture.prompt();
        assert_eq!(
            fixture.display.output(),
            format!("{prompt}x \r\na  b  c  \r\nd  e  \r\n{prompt}x ")
        );
    }

    #[tokio::test]
    async fn test_tab_on_empty_buffer_does_not_query_source() {
        let source = CompletionSourceMock::new(vec!["ls".into()]);
        let mut fixture = Fixture::new(ShellMock::new(), source.clone()).started().await;

        fixture.send([EditorEvent::Tab]).await;

        assert!(source.get_calls().is_empty());
        assert_eq!(fixture.display.output(), fixture.prompt());
    }

    #[tokio::test]
    async fn test_tab_with_failing_source_is_no_op() {
        let mut fixture =
            Fixture::new(ShellMock::new(), CompletionSourceMock::failing("boom")).started().await;

        fixture.type_text("gi").await;
        fixture.send([EditorEvent::Tab]).await;

        assert_eq!(fixture.editor.buffer().snapshot(), "gi");
        assert_eq!(fixture.display.output(), format!("{}gi", fixture.prompt()));
    }

    #[tokio::test]
    async fn test_cursor_movement_and_mid_line_edits() {
        let mut fixture = Fixture::with_shell(ShellMock::new()).started().await;

        fixture.type_text("eho").await;
        fixture.send([EditorEvent::Left, EditorEvent::Left]).await;
        fixture.type_text("c").await;
        fixture.send([EditorEvent::End, EditorEvent::Home, EditorEvent::Delete]).await;

        assert_eq!(fixture.editor.buffer().snapshot(), "cho");
        assert_eq!(fixture.editor.buffer().cursor(), 0);
        assert_eq!(
            fixture.display.output(),
            format!(
                "{}eho\x08\x08cho\x08\x08ho\x08\x08\x08\x08cho \x08\x08\x08\x08",
                fixture.prompt()
            )
        );
    }

    #[tokio::test]
    async fn test_eof_exits_only_on_empty_buffer() {
        let mut fixture = Fixture::with_shell(ShellMock::new()).started().await;

        fixture.type_text("ab").await;
        fixture.send([EditorEvent::Home]).await;
        let control = fixture.editor.apply_event(EditorEvent::Eof).await.unwrap();
        assert_eq!(control, EditorControl::Continue);
        assert_eq!(fixture.editor.buffer().snapshot(), "b");

        fixture.send([EditorEvent::Delete]).await;
        let control = fixture.editor.apply_event(EditorEvent::Eof).await.unwrap();
        assert_eq!(control, EditorControl::Exit);
    }

    #[tokio::test]
    async fn test_interrupt_clears_buffer_and_reprompts() {
        let mut fixture = Fixture::with_shell(ShellMock::new()).started().await;

        fixture.type_text("rm -rf").await;
        fixture.send([EditorEvent::Interrupt]).await;

        let prompt = fixture.prompt();
        assert_eq!(fixture.display.output(), format!("{prompt}rm -rf^C\r\n{prompt}"));
        assert!(fixture.editor.buffer().is_empty());
        assert!(fixture.shell.get_calls().is_empty());
        assert_eq!(fixture.editor.state(), EditorState::Idle);
    }

    #[tokio::test]
    async fn test_interrupt_while_awaiting_still_flushes_result() {
        let shell = ShellMock::gated().with_output("sleep 1", "done");
        let mut fixture = Fixture::with_shell(shell).started().await;

        fixture.type_text("sleep 1").await;
        fixture.send([EditorEvent::Enter]).await;
        fixture.type_text("ab").await;
        fixture.send([EditorEvent::Interrupt]).await;

        assert_eq!(fixture.editor.state(), EditorState::Idle);
        assert!(fixture.editor.buffer().is_empty());
        assert!(fixture.editor.has_command_in_flight());

        fixture.shell.release_one();
        fixture.editor.apply_next_command_outcome().await.unwrap();

        let prompt = fixture.prompt();
        let clear_row = String::from_utf8(clear_current_row().unwrap()).unwrap();
        assert_eq!(
            fixture.display.output(),
            format!("{prompt}sleep 1\r\nab^C\r\n{prompt}{clear_row}done\r\n{prompt}")
        );
        assert!(!fixture.editor.has_command_in_flight());
    }

    #[tokio::test]
    async fn test_typed_ahead_text_survives_command_output() {
        let shell = ShellMock::gated().with_output("make", "built");
        let mut fixture = Fixture::with_shell(shell).started().await;

        fixture.type_text("make").await;
        fixture.send([EditorEvent::Enter]).await;
        fixture.type_text("ls").await;

        fixture.shell.release_one();
        fixture.editor.apply_next_command_outcome().await.unwrap();

        let prompt = fixture.prompt();
        let clear_row = String::from_utf8(clear_current_row().unwrap()).unwrap();
        assert_eq!(
            fixture.display.output(),
            format!("{prompt}make\r\nls{clear_row}built\r\n{prompt}ls")
        );
        assert_eq!(fixture.editor.buffer().snapshot(), "ls");
    }

    #[tokio::test]
    async fn test_second_submit_is_queued_until_first_finishes() {
        let shell = ShellMock::gated().with_output("a", "A").with_output("b", "B");
        let mut fixture = Fixture::with_shell(shell).started().await;

        fixture.type_text("a").await;
        fixture.send([EditorEvent::Enter]).await;
        fixture.type_text("b").await;
        fixture.send([EditorEvent::Enter]).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(fixture.shell.get_calls(), vec!["a"]);
        assert_eq!(fixture.editor.queued_command_count(), 1);

        fixture.shell.release_one();
        fixture.editor.apply_next_command_outcome().await.unwrap();
        assert_eq!(fixture.editor.state(), EditorState::AwaitingCommand);
        assert_eq!(fixture.editor.queued_command_count(), 0);

        fixture.shell.release_one();
        fixture.editor.apply_next_command_outcome().await.unwrap();

        let prompt = fixture.prompt();
        assert_eq!(
            fixture.display.output(),
            format!("{prompt}a\r\nb\r\nA\r\nB\r\n{prompt}")
        );
        assert_eq!(fixture.shell.get_calls(), vec!["a", "b"]);
        assert_eq!(fixture.shell.get_max_in_flight(), 1);
        assert_eq!(fixture.editor.state(), EditorState::Idle);
    }

    #[tokio::test]
    async fn test_interrupt_drops_queued_commands() {
        let shell = ShellMock::gated();
        let mut fixture = Fixture::with_shell(shell).started().await;

        fixture.type_text("a").await;
        fixture.send([EditorEvent::Enter]).await;
        fixture.type_text("b").await;
        fixture.send([EditorEvent::Enter, EditorEvent::Interrupt]).await;
        assert_eq!(fixture.editor.queued_command_count(), 0);

        fixture.shell.release_one();
        fixture.editor.apply_next_command_outcome().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(fixture.shell.get_calls(), vec!["a"]);
        assert!(!fixture.editor.has_command_in_flight());
    }
}
