// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::HomeDirRule;
use crossterm::style::Color;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

pub const DEFAULT_PROMPT_SUFFIX: &str = " $ ";
pub const DEFAULT_FALLBACK_PROMPT: &str = "$ ";
pub const DEFAULT_FALLBACK_COLUMNS: u16 = 80;
pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome to termline!";

/// Everything about the editor that can be tuned. There is no configuration file; the
/// binary fills this in from command line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub home_rule: HomeDirRule,
    pub prompt_color: PromptColor,
    /// Written after the colored directory name.
    pub prompt_suffix: String,
    /// Written instead of the whole prompt when the directory can't be determined.
    pub fallback_prompt: String,
    /// Used by displays that can't report their width.
    pub fallback_columns: u16,
    /// Written once before the first prompt, if present.
    pub welcome_message: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            home_rule: HomeDirRule::platform_default(),
            prompt_color: PromptColor::default(),
            prompt_suffix: DEFAULT_PROMPT_SUFFIX.to_string(),
            fallback_prompt: DEFAULT_FALLBACK_PROMPT.to_string(),
            fallback_columns: DEFAULT_FALLBACK_COLUMNS,
            welcome_message: Some(DEFAULT_WELCOME_MESSAGE.to_string()),
        }
    }
}

impl EditorConfig {
    #[must_use]
    pub fn with_home_rule(mut self, home_rule: HomeDirRule) -> Self {
        self.home_rule = home_rule;
        self
    }

    #[must_use]
    pub fn with_prompt_color(mut self, prompt_color: PromptColor) -> Self {
        self.prompt_color = prompt_color;
        self
    }

    #[must_use]
    pub fn with_fallback_columns(mut self, fallback_columns: u16) -> Self {
        self.fallback_columns = fallback_columns;
        self
    }

    #[must_use]
    pub fn with_welcome_message(mut self, welcome_message: Option<String>) -> Self {
        self.welcome_message = welcome_message;
        self
    }
}

/// Colors offered for the directory name in the prompt. Parsed from the command line
/// in lowercase, eg: `--prompt-color cyan`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum PromptColor {
    #[default]
    Green,
    Blue,
    Cyan,
    Magenta,
    Yellow,
    Red,
    White,
}

impl PromptColor {
    /// Every color name, comma separated, for help text.
    #[must_use]
    pub fn names() -> String {
        PromptColor::iter()
            .map(|it| it.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<PromptColor> for Color {
    fn from(prompt_color: PromptColor) -> Self {
        match prompt_color {
            PromptColor::Green => Color::Green,
            PromptColor::Blue => Color::Blue,
            PromptColor::Cyan => Color::Cyan,
            PromptColor::Magenta => Color::Magenta,
            PromptColor::Yellow => Color::Yellow,
            PromptColor::Red => Color::Red,
            PromptColor::White => Color::White,
        }
    }
}
