// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tracing subscriber setup for the `termline` binary. The editor writes to the raw
//! terminal on stdout, so the usual choice is a log file. Display logging goes to
//! stderr.

use miette::IntoDiagnostic;
use std::{io, path::PathBuf, str::FromStr};
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt};

pub const DEFAULT_LOG_FILE_PATH: &str = "termline.log";

/// Fields:
/// - `writers`: Vec<[`WriterArg`]> - Zero or more writers to use for tracing.
/// - `level`: [`tracing::Level`] - The log level to use for tracing.
/// - `tracing_log_file_path_and_prefix`: [String] - The file path to use for the log
///   file. Eg: `/tmp/termline.log` or `termline.log`.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    pub writers: Vec<WriterArg>,
    pub level: tracing::Level,
    pub tracing_log_file_path_and_prefix: String,
}

mod tracing_config_impl {
    use super::*;

    impl Default for TracingConfig {
        /// Log to a file only, since the display belongs to the editor.
        fn default() -> Self {
            Self {
                writers: vec![WriterArg::File],
                level: tracing::Level::INFO,
                tracing_log_file_path_and_prefix: DEFAULT_LOG_FILE_PATH.to_string(),
            }
        }
    }

    impl TracingConfig {
        #[must_use]
        pub fn get_level_filter(&self) -> LevelFilter { LevelFilter::from_level(self.level) }
    }
}

/// Parsed from the command line (via `clap`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriterArg {
    Stderr,
    File,
    None,
}

/// This is an intermediate representation, which is converted into a [`WriterConfig`]
/// by [`writer_config_impl::from()`] before it is used.
pub mod writer_arg_impl {
    use super::*;

    impl FromStr for WriterArg {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "stderr" => Ok(WriterArg::Stderr),
                "file" => Ok(WriterArg::File),
                "none" | "" => Ok(WriterArg::None),
                _ => Err(format!("{s} is not a valid tracing writer")),
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriterConfig {
    Display,
    File,
    DisplayAndFile,
}

pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

pub mod writer_config_impl {
    use super::*;

    /// [`None`] when no writer is enabled, in which case tracing is not set up at all.
    #[must_use]
    pub fn from(writers: &[WriterArg]) -> Option<WriterConfig> {
        let contains_file_writer = writers.contains(&WriterArg::File);
        let contains_stderr_writer = writers.contains(&WriterArg::Stderr);
        match (contains_file_writer, contains_stderr_writer) {
            (true, true) => Some(WriterConfig::DisplayAndFile),
            (true, false) => Some(WriterConfig::File),
            (false, true) => Some(WriterConfig::Display),
            (false, false) => None,
        }
    }

    /// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
    #[macro_export]
    macro_rules! create_fmt {
        () => {
            tracing_subscriber::fmt::layer()
                .compact()
                .without_time()
                .with_thread_ids(true)
                .with_thread_names(false)
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
        };
    }

    impl WriterConfig {
        /// Erases the concrete type of the writer and returns a boxed layer, so layers
        /// can be composed at runtime.
        #[must_use]
        pub fn create_display_layer<S>(
            self,
            level_filter: LevelFilter,
        ) -> Option<Box<DynLayer<S>>>
        where
            S: tracing_core::Subscriber,
            for<'a> S: LookupSpan<'a>,
        {
            let fmt_layer = create_fmt!().with_ansi(true);

            match self {
                WriterConfig::DisplayAndFile | WriterConfig::Display => Some(Box::new(
                    fmt_layer.with_writer(io::stderr).with_filter(level_filter),
                )),
                WriterConfig::File => None,
            }
        }

        /// # Errors
        ///
        /// If the log file can't be created.
        pub fn try_create_file_layer<S>(
            self,
            level_filter: LevelFilter,
            tracing_log_file_path_and_prefix: &str,
        ) -> miette::Result<Option<Box<DynLayer<S>>>>
        where
            S: tracing_core::Subscriber,
            for<'a> S: LookupSpan<'a>,
        {
            // No escape codes in the log file.
            let fmt_layer = create_fmt!().with_ansi(false);

            Ok(match self {
                WriterConfig::DisplayAndFile | WriterConfig::File => {
                    let file =
                        rolling_file_appender_impl::try_create(tracing_log_file_path_and_prefix)?;
                    Some(Box::new(fmt_layer.with_writer(file).with_filter(level_filter)))
                }
                WriterConfig::Display => None,
            })
        }
    }
}

/// Create the layers and install them as the global default subscriber.
///
/// # Errors
///
/// If the log file can't be created, or a global subscriber is already set.
pub fn init(tracing_config: TracingConfig) -> miette::Result<()> {
    if let Some(layers) = try_create_layers(&tracing_config)? {
        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .into_diagnostic()?;
    }
    Ok(())
}

/// Returns the layers, or [`None`] when no writer is configured. This does not install
/// them; for that run
/// `tracing_subscriber::registry().with(layers).init()`.
///
/// # Errors
///
/// If the log file can't be created.
pub fn try_create_layers(
    tracing_config: &TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<tracing_subscriber::Registry>>>>> {
    let Some(writer_config) = writer_config_impl::from(&tracing_config.writers) else {
        return Ok(None);
    };

    let level_filter = tracing_config.get_level_filter();

    let layers = {
        let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];

        // Applies to every layer, including ones without their own filter.
        return_it.push(Box::new(level_filter));

        if let Some(layer) = writer_config.create_display_layer(level_filter) {
            return_it.push(layer);
        }

        if let Some(layer) = writer_config.try_create_file_layer(
            level_filter,
            &tracing_config.tracing_log_file_path_and_prefix,
        )? {
            return_it.push(layer);
        }

        return_it
    };

    Ok(Some(layers))
}

mod rolling_file_appender_impl {
    use super::*;
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    /// A file appender that never rotates. A bare file name is created in the current
    /// working directory.
    pub fn try_create(path_str: &str) -> miette::Result<RollingFileAppender> {
        let path = PathBuf::from(path_str);

        let file_name = path.file_name().ok_or_else(|| {
            miette::miette!(
                "Can't use {} as a log file. It must name a file, not a folder.",
                path.display()
            )
        })?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name.to_string_lossy())
            .build(&parent)
            .into_diagnostic()
    }
}
