// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DEFAULT_LOG_FILE_PATH, EditorConfig, HomeDirRule, PromptColor, TracingConfig,
            WriterArg};
use clap::{Args, Parser};

/// More info: <https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_2/index.html>
#[derive(Debug, Parser)]
#[command(bin_name = "termline")]
#[command(about = "An interactive shell prompt with line editing and tab completion")]
#[command(version)]
#[command(next_line_help = true)]
#[command(arg_required_else_help(false))]
/// More info: <https://docs.rs/clap/latest/clap/struct.Command.html#method.help_template>
#[command(
    help_template = "{about}\nVersion: {bin} {version}\n\nType `exit` or press Ctrl+D on an empty line to quit.\n\nUSAGE:\n  termline [\x1b[34moptions\x1b[0m]\n\n[options]\n{options}"
)]
pub struct CLIArg {
    #[command(flatten)]
    pub prompt_options: PromptOption,

    #[command(flatten)]
    pub global_options: GlobalOption,
}

#[derive(Debug, Args)]
pub struct PromptOption {
    #[arg(
        long,
        value_name = "segment",
        help = "Collapse `/<segment>/<user>` to `~` in the prompt instead of the detected home directory, eg: `Users` or `home`"
    )]
    pub home_root: Option<String>,

    #[arg(
        long,
        default_value_t = PromptColor::default(),
        help = format!("Color of the directory name in the prompt: {}", PromptColor::names())
    )]
    pub prompt_color: PromptColor,

    #[arg(long, help = "Don't print the welcome message on start")]
    pub no_welcome: bool,
}

#[derive(Debug, Args)]
pub struct GlobalOption {
    #[arg(
        global = true,
        long,
        default_value = "info",
        help = "Log level: error, warn, info, debug, or trace"
    )]
    pub log_level: tracing::Level,

    #[arg(
        global = true,
        long,
        value_name = "writer",
        help = "Where logs go: file, stderr, or none. Repeat to use more than one. Defaults to file"
    )]
    pub log_writer: Vec<WriterArg>,

    #[arg(
        global = true,
        long,
        default_value = DEFAULT_LOG_FILE_PATH,
        help = "Log file path, used by the file writer"
    )]
    pub log_file: String,
}

impl CLIArg {
    #[must_use]
    pub fn editor_config(&self) -> EditorConfig {
        let mut editor_config = EditorConfig::default()
            .with_prompt_color(self.prompt_options.prompt_color);
        if let Some(segment) = &self.prompt_options.home_root {
            editor_config = editor_config.with_home_rule(HomeDirRule::UsersRoot(segment.clone()));
        }
        if self.prompt_options.no_welcome {
            editor_config = editor_config.with_welcome_message(None);
        }
        editor_config
    }

    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        let writers = if self.global_options.log_writer.is_empty() {
            vec![WriterArg::File]
        } else {
            self.global_options.log_writer.clone()
        };
        TracingConfig {
            writers,
            level: self.global_options.log_level,
            tracing_log_file_path_and_prefix: self.global_options.log_file.clone(),
        }
    }
}
