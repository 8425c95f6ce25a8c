// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CollaboratorError, DirectoryProvider, EditorConfig, EditorIssue};
use crossterm::style::{Color, Stylize};

/// How the home folder at the start of a path is collapsed to `~`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeDirRule {
    /// Collapse this exact folder, eg: `/home/nadia`.
    Exact(String),
    /// Collapse `/<root>/<any single segment>`, eg: `Users` matches `/Users/nazmul`.
    UsersRoot(String),
    /// Never collapse.
    Disabled,
}

impl HomeDirRule {
    /// The user's actual home folder when it can be found, otherwise the usual layout
    /// for this OS (`/Users/<name>` on macOS, `/home/<name>` elsewhere).
    #[must_use]
    pub fn platform_default() -> Self {
        match dirs::home_dir() {
            Some(home) => HomeDirRule::Exact(home.to_string_lossy().into_owned()),
            None if cfg!(target_os = "macos") => HomeDirRule::UsersRoot("Users".into()),
            None => HomeDirRule::UsersRoot("home".into()),
        }
    }

    /// Replace the home prefix of `path` with `~`. Only matches on a segment boundary,
    /// so `/home/nadia2` is left alone when home is `/home/nadia`.
    #[must_use]
    pub fn collapse(&self, path: &str) -> String {
        let rest = match self {
            HomeDirRule::Disabled => None,
            HomeDirRule::Exact(home) => {
                let home = home.trim_end_matches('/');
                if home.is_empty() {
                    None
                } else {
                    path.strip_prefix(home)
                        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                }
            }
            HomeDirRule::UsersRoot(root) => path
                .strip_prefix('/')
                .and_then(|it| it.strip_prefix(root.as_str()))
                .and_then(|it| it.strip_prefix('/'))
                .and_then(|it| {
                    let user_len = it.find('/').unwrap_or(it.len());
                    (user_len > 0).then(|| &it[user_len..])
                }),
        };

        match rest {
            Some(rest) => format!("~{rest}"),
            None => path.to_string(),
        }
    }
}

/// Builds the prompt from the current directory: the (home collapsed) basename in color,
/// then a reset, then `" $ "`. Nothing is cached, since the directory can change between
/// commands.
#[derive(Debug, Clone)]
pub struct PromptRenderer {
    home_rule: HomeDirRule,
    color: Color,
    suffix: String,
    fallback: String,
}

impl PromptRenderer {
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            home_rule: config.home_rule.clone(),
            color: config.prompt_color.into(),
            suffix: config.prompt_suffix.clone(),
            fallback: config.fallback_prompt.clone(),
        }
    }

    /// The uncolored name shown for `directory_path`.
    #[must_use]
    pub fn display_name(&self, directory_path: &str) -> String {
        let collapsed = self.home_rule.collapse(directory_path);
        let trimmed = collapsed.trim_end_matches('/');
        if trimmed.is_empty() {
            // The filesystem root has no basename.
            return collapsed;
        }
        match trimmed.rsplit_once('/') {
            Some((_, basename)) => basename.to_string(),
            None => trimmed.to_string(),
        }
    }

    #[must_use]
    pub fn render(&self, directory_path: &str) -> String {
        let name = self.display_name(directory_path);
        format!("{}{}", name.with(self.color), self.suffix)
    }

    /// Render from a provider result, falling back to the plain prompt on failure.
    #[must_use]
    pub fn render_result(&self, directory: Result<String, CollaboratorError>) -> String {
        match directory {
            Ok(path) => self.render(&path),
            Err(err) => {
                tracing::warn!(
                    message = "Directory lookup failed, using plain prompt",
                    issue = %EditorIssue::DirectoryUnavailable,
                    error = %err
                );
                self.fallback.clone()
            }
        }
    }

    pub async fn render_from(&self, provider: &dyn DirectoryProvider) -> String {
        self.render_result(provider.current().await)
    }
}
