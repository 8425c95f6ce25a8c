// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clap::Parser;
use termline::app::{CLIArg, run_app};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli_arg = CLIArg::parse();
    run_app(cli_arg).await
}
