// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Whole sessions driven through [`LineEditor::run()`] and
//! [`LineEditor::run_until_shutdown()`], with scripted collaborators.

use pretty_assertions::assert_eq;
use smallvec::smallvec;
use std::{sync::Arc, time::Duration};
use termline::{EditorConfig, EditorEvent, EditorState, HomeDirRule, InlineVec, LineEditor,
               PromptRenderer,
               backends::{ProcessShell, WorkingDir},
               test_fixtures::{CompletionSourceMock, DirectoryProviderMock, DisplayMock,
                               ShellMock, gen_input_stream_with_delay, type_text}};

const CWD: &str = "/home/nadia/projects";
const INPUT_DELAY: Duration = Duration::from_millis(20);

fn config() -> EditorConfig {
    EditorConfig::default()
        .with_home_rule(HomeDirRule::Exact("/home/nadia".into()))
        .with_welcome_message(Some("Welcome to termline!".into()))
}

fn prompt() -> String { PromptRenderer::new(&config()).render(CWD) }

fn editor(
    shell: termline::SafeShell,
    source: CompletionSourceMock,
    display: &DisplayMock,
) -> LineEditor {
    LineEditor::new(
        &config(),
        shell,
        Arc::new(source),
        Arc::new(DirectoryProviderMock::new(CWD)),
        Box::new(display.clone()),
    )
}

fn events(parts: &[InlineVec<EditorEvent>]) -> InlineVec<EditorEvent> {
    parts.iter().flatten().copied().collect()
}

#[tokio::test]
async fn test_session_runs_command_then_reprompts() {
    let display = DisplayMock::new(80);
    let shell = ShellMock::new().with_output("echo hi", "hi\n");
    let mut editor = editor(Arc::new(shell.clone()), CompletionSourceMock::new(vec![]), &display);

    let input = events(&[
        type_text("echo hi"),
        smallvec![EditorEvent::Enter, EditorEvent::Ignored],
    ]);
    editor
        .run(gen_input_stream_with_delay(input, INPUT_DELAY))
        .await
        .unwrap();

    let prompt = prompt();
    assert_eq!(
        display.output(),
        format!("Welcome to termline!\r\n{prompt}echo hi\r\nhi\r\n{prompt}")
    );
    assert_eq!(shell.get_calls(), vec!["echo hi"]);
    assert_eq!(editor.state(), EditorState::Idle);
}

#[tokio::test]
async fn test_completion_then_submit() {
    let display = DisplayMock::new(80);
    let shell = ShellMock::new().with_output("config.json ", "ok");
    let source = CompletionSourceMock::new(vec![]).with_rule("conf", &["config.json"]);
    let mut editor = editor(Arc::new(shell.clone()), source, &display);

    let input = events(&[
        type_text("conf"),
        smallvec![EditorEvent::Tab, EditorEvent::Enter, EditorEvent::Ignored],
    ]);
    editor
        .run(gen_input_stream_with_delay(input, INPUT_DELAY))
        .await
        .unwrap();

    let prompt = prompt();
    assert_eq!(
        display.output(),
        format!("Welcome to termline!\r\n{prompt}config.json \r\nok\r\n{prompt}")
    );
    assert_eq!(shell.get_calls(), vec!["config.json "]);
}

#[tokio::test]
async fn test_eof_waits_for_running_command() {
    let display = DisplayMock::new(80);
    let shell = ShellMock::gated().with_output("make", "built");
    let mut editor = editor(Arc::new(shell.clone()), CompletionSourceMock::new(vec![]), &display);

    let releaser = {
        let shell = shell.clone();
        tokio::spawn(async move {
            tokio::time::sleep(INPUT_DELAY * 10).await;
            shell.release_one();
        })
    };

    let input = events(&[type_text("make"), smallvec![EditorEvent::Enter, EditorEvent::Eof]]);
    editor
        .run(gen_input_stream_with_delay(input, INPUT_DELAY))
        .await
        .unwrap();
    releaser.await.unwrap();

    // No prompt after the output, the session is over.
    assert_eq!(
        display.output(),
        format!("Welcome to termline!\r\n{}make\r\n\r\nbuilt\r\n", prompt())
    );
    assert!(!editor.has_command_in_flight());
}

#[tokio::test]
async fn test_exit_command_shuts_down_session() {
    let display = DisplayMock::new(80);
    let shell = ProcessShell::new(WorkingDir::new("/", "/"));
    let shutdown_receiver = shell.subscribe_to_shutdown();
    let mut editor = editor(Arc::new(shell), CompletionSourceMock::new(vec![]), &display);

    // The trailing input must never be read.
    let input = events(&[
        type_text("exit"),
        smallvec![EditorEvent::Enter],
        type_text("ls"),
    ]);
    editor
        .run_until_shutdown(
            gen_input_stream_with_delay(input, INPUT_DELAY * 5),
            shutdown_receiver,
        )
        .await
        .unwrap();

    assert_eq!(
        display.output(),
        format!("Welcome to termline!\r\n{}exit\r\nExiting...\r\n", prompt())
    );
    assert!(editor.buffer().is_empty());
}

#[tokio::test]
async fn test_lines_submitted_while_busy_run_in_order() {
    let display = DisplayMock::new(80);
    let shell = ShellMock::gated()
        .with_output("first", "1")
        .with_output("second", "2");
    let mut editor = editor(Arc::new(shell.clone()), CompletionSourceMock::new(vec![]), &display);

    let releaser = {
        let shell = shell.clone();
        tokio::spawn(async move {
            for _ in 0..2 {
                tokio::time::sleep(INPUT_DELAY * 20).await;
                shell.release_one();
            }
        })
    };

    let input = events(&[
        type_text("first"),
        smallvec![EditorEvent::Enter],
        type_text("second"),
        smallvec![EditorEvent::Enter],
    ]);
    editor
        .run(gen_input_stream_with_delay(input, INPUT_DELAY))
        .await
        .unwrap();
    releaser.await.unwrap();

    assert_eq!(shell.get_calls(), vec!["first", "second"]);
    assert_eq!(shell.get_max_in_flight(), 1);
    // The input ended while `second` was queued, so it still ran but no prompt follows.
    assert_eq!(
        display.output(),
        format!("Welcome to termline!\r\n{}first\r\nsecond\r\n1\r\n2\r\n", prompt())
    );
}
