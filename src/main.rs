// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Classify-Admin command-line client
//!
//! Drives the management screens of the post classification platform from
//! the terminal: login, users, studies, categories, questions, posts, groups
//! and statistics.

use anyhow::Context;
use clap::Parser;
use classify_admin::{config::Config, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("classify-admin: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose)?;

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url);
    }
    if let Some(session_file) = &cli.session_file {
        config = config.with_session_file(session_file);
    }
    tracing::debug!(
        api_url = %config.api_url,
        session_file = %config.session_file.display(),
        "Configuration loaded"
    );

    let (state, writer) = AppState::bootstrap(config)?;
    cli::commands::dispatch(cli.command, &state, &writer).await
}

/// Structured JSON logs on stderr; stdout is reserved for command output.
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("classify_admin={level}").parse()?)
        .add_directive("warn".parse()?);

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}
