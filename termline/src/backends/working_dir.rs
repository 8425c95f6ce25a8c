// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CollaboratorError, DirectoryProvider, StdMutex};
use async_trait::async_trait;
use std::{path::{Path, PathBuf},
          sync::Arc};

/// The session's current directory. It is not the process working directory: commands
/// are spawned with it as their `current_dir`, so changing it never races with other
/// code in the process. Clones share the same directory.
#[derive(Clone, Debug)]
pub struct WorkingDir {
    current: Arc<StdMutex<PathBuf>>,
    home: PathBuf,
}

impl WorkingDir {
    pub fn new(start: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            current: Arc::new(StdMutex::new(start.into())),
            home: home.into(),
        }
    }

    /// Start in the user's home directory, or `/` when it is unknown.
    #[must_use]
    pub fn from_home() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        Self::new(home.clone(), home)
    }

    #[must_use]
    pub fn home(&self) -> &Path { &self.home }

    /// # Errors
    ///
    /// If another thread panicked while changing directory.
    pub fn get(&self) -> Result<PathBuf, CollaboratorError> {
        self.current
            .lock()
            .map(|it| it.clone())
            .map_err(|_| CollaboratorError::failed("working directory lock is poisoned"))
    }

    /// # Errors
    ///
    /// If another thread panicked while changing directory.
    pub fn set(&self, path: impl Into<PathBuf>) -> Result<(), CollaboratorError> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| CollaboratorError::failed("working directory lock is poisoned"))?;
        *current = path.into();
        Ok(())
    }

    /// Resolve a `cd` argument to a path, without checking that it exists:
    /// - empty or `~` is home.
    /// - `~/rest` is relative to home.
    /// - absolute paths are used as is.
    /// - anything else is relative to the current directory.
    ///
    /// # Errors
    ///
    /// If the current directory can't be read.
    pub fn resolve(&self, target: &str) -> Result<PathBuf, CollaboratorError> {
        Ok(match target {
            "" | "~" => self.home.clone(),
            _ if target.starts_with("~/") => self.home.join(&target[2..]),
            _ if target.starts_with('/') => PathBuf::from(target),
            _ => self.get()?.join(target),
        })
    }

    /// Expand a leading `~` in a word typed by the user.
    #[must_use]
    pub fn expand_tilde(&self, word: &str) -> String {
        match word.strip_prefix('~') {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                format!("{}{rest}", self.home.display())
            }
            _ => word.to_string(),
        }
    }

    /// Replace a leading home directory with `~`. Only matches on a segment boundary,
    /// so `/home/nadia2` is left alone when home is `/home/nadia`.
    #[must_use]
    pub fn collapse_home(&self, path: &str) -> String {
        let home = self.home.display().to_string();
        if home.is_empty() || home == "/" {
            return path.to_string();
        }
        match path.strip_prefix(home.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("~{rest}"),
            _ => path.to_string(),
        }
    }
}

#[async_trait]
impl DirectoryProvider for WorkingDir {
    async fn current(&self) -> Result<String, CollaboratorError> {
        Ok(self.get()?.display().to_string())
    }
}
