// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CollaboratorError, CompletionSource, DirectoryProvider, Shell, StdMutex};
use async_trait::async_trait;
use std::{collections::HashMap,
          sync::{Arc,
                 atomic::{AtomicUsize, Ordering}}};
use tokio::sync::Notify;

// ╭──────────────────────────────────────────────────────────╮
// │ Shell                                                    │
// ╰──────────────────────────────────────────────────────────╯

/// A scripted [`Shell`]. Commands without a scripted response succeed with empty output.
///
/// When created with [`ShellMock::gated`], every call waits for
/// [`ShellMock::release_one`] before returning, which lets a test hold a command in
/// flight while it sends more input.
#[derive(Clone, Debug, Default)]
pub struct ShellMock {
    responses: Arc<StdMutex<HashMap<String, Result<String, String>>>>,
    calls: Arc<StdMutex<Vec<String>>>,
    gate: Option<Arc<Notify>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl ShellMock {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::default()
        }
    }

    /// # Panics
    ///
    /// If the lock is poisoned.
    #[must_use]
    pub fn with_output(self, command: &str, output: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(command.to_string(), Ok(output.to_string()));
        self
    }

    /// # Panics
    ///
    /// If the lock is poisoned.
    #[must_use]
    pub fn with_failure(self, command: &str, description: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(command.to_string(), Err(description.to_string()));
        self
    }

    /// Let one waiting (or the next) gated call return.
    pub fn release_one(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Every command received, in order.
    ///
    /// # Panics
    ///
    /// If the lock is poisoned.
    #[must_use]
    pub fn get_calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }

    /// The most calls that were ever running at the same time.
    #[must_use]
    pub fn get_max_in_flight(&self) -> usize { self.max_in_flight.load(Ordering::SeqCst) }
}

#[async_trait]
impl Shell for ShellMock {
    async fn execute(&self, command: &str) -> Result<String, CollaboratorError> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.to_string());
        }

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let response = self
            .responses
            .lock()
            .ok()
            .and_then(|responses| responses.get(command).cloned())
            .unwrap_or_else(|| Ok(String::new()));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        response.map_err(CollaboratorError::Failed)
    }
}

// ╭──────────────────────────────────────────────────────────╮
// │ CompletionSource                                         │
// ╰──────────────────────────────────────────────────────────╯

/// A scripted [`CompletionSource`]. Returns the candidates registered for the exact
/// partial word, or the default candidates when there is no rule for it.
#[derive(Clone, Debug)]
pub struct CompletionSourceMock {
    rules: Vec<(String, Vec<String>)>,
    default: Result<Vec<String>, String>,
    calls: Arc<StdMutex<Vec<(String, String)>>>,
}

impl CompletionSourceMock {
    /// Always returns `candidates`.
    #[must_use]
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            rules: vec![],
            default: Ok(candidates),
            calls: Arc::default(),
        }
    }

    /// Always fails with `description`.
    #[must_use]
    pub fn failing(description: &str) -> Self {
        Self {
            rules: vec![],
            default: Err(description.to_string()),
            calls: Arc::default(),
        }
    }

    /// Return `candidates` when asked about exactly `partial`.
    #[must_use]
    pub fn with_rule(mut self, partial: &str, candidates: &[&str]) -> Self {
        self.rules.push((
            partial.to_string(),
            candidates.iter().map(ToString::to_string).collect(),
        ));
        self
    }

    /// Every `(partial_word, full_line)` pair received, in order.
    ///
    /// # Panics
    ///
    /// If the lock is poisoned.
    #[must_use]
    pub fn get_calls(&self) -> Vec<(String, String)> { self.calls.lock().unwrap().clone() }
}

#[async_trait]
impl CompletionSource for CompletionSourceMock {
    async fn suggest(
        &self,
        partial_word: &str,
        full_line: &str,
    ) -> Result<Vec<String>, CollaboratorError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((partial_word.to_string(), full_line.to_string()));
        }

        match self.rules.iter().find(|(partial, _)| partial == partial_word) {
            Some((_, candidates)) => Ok(candidates.clone()),
            None => self.default.clone().map_err(CollaboratorError::Failed),
        }
    }
}

// ╭──────────────────────────────────────────────────────────╮
// │ DirectoryProvider                                        │
// ╰──────────────────────────────────────────────────────────╯

/// A [`DirectoryProvider`] whose answer can be changed mid test, as if a command had
/// changed directory.
#[derive(Clone, Debug)]
pub struct DirectoryProviderMock {
    current: Arc<StdMutex<Option<String>>>,
}

impl DirectoryProviderMock {
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self {
            current: Arc::new(StdMutex::new(Some(path.to_string()))),
        }
    }

    /// Every lookup fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            current: Arc::new(StdMutex::new(None)),
        }
    }

    /// # Panics
    ///
    /// If the lock is poisoned.
    pub fn set_current(&self, path: &str) {
        *self.current.lock().unwrap() = Some(path.to_string());
    }
}

#[async_trait]
impl DirectoryProvider for DirectoryProviderMock {
    async fn current(&self) -> Result<String, CollaboratorError> {
        self.current
            .lock()
            .ok()
            .and_then(|current| current.clone())
            .ok_or_else(|| CollaboratorError::failed("current directory is unavailable"))
    }
}
