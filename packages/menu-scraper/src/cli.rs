//! Plumbing shared by the binaries: logging, argument errors, reporting.

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use fetchfox_client::FetchFoxClient;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::Result;
use crate::output::ErrorReport;
use crate::pipeline::Scraper;

const DEFAULT_LOG_FILTER: &str = "warn,menu_scraper=info,fetchfox_client=info";

/// Initialize logging to stderr; stdout carries the JSON output.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();
}

/// Parse arguments, or print the usage error object and return the exit code.
///
/// Help and version requests print normally and exit successfully.
pub fn parse_args<C: Parser>(usage: &str) -> std::result::Result<C, ExitCode> {
    match C::try_parse() {
        Ok(args) => Ok(args),
        Err(err) if matches!(err.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) => {
            let _ = err.print();
            Err(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!(error = %err, "Invalid arguments");
            let message = match err.kind() {
                ClapErrorKind::ValueValidation => format!("{}. {}", first_line(&err.to_string()), usage),
                _ => usage.to_string(),
            };
            println!("{}", ErrorReport::usage(message).to_json());
            Err(ExitCode::from(1))
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .trim()
}

/// Argument parser for page URLs: absolute http(s) only.
pub fn parse_url(raw: &str) -> std::result::Result<String, String> {
    let url = url::Url::parse(raw).map_err(|e| format!("invalid URL '{}': {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => Err(format!("unsupported URL scheme '{}'", other)),
    }
}

/// Build a scraper from the environment. Ctrl-C cancels any wait in progress.
///
/// Must be called inside the tokio runtime.
pub fn scraper_from_env() -> Result<Scraper<FetchFoxClient>> {
    let config = Config::from_env()?;
    let client = config.client()?;

    tracing::debug!(host = %config.host, poll = ?config.poll, "Loaded configuration");

    Ok(Scraper::new(client)
        .with_poll(config.poll)
        .with_max_pages(config.max_pages)
        .with_cancellation(cancel_on_ctrl_c()))
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            trigger.cancel();
        }
    });
    token
}

/// Print the JSON output, or the error object in its place.
///
/// Runtime failures still exit successfully; callers read the `error` key.
pub fn report(result: Result<String>) -> ExitCode {
    match result {
        Ok(json) => println!("{}", json),
        Err(err) => {
            tracing::error!(kind = ?err.kind(), error = %err, "Scrape failed");
            println!("{}", ErrorReport::from(&err).to_json());
        }
    }
    ExitCode::SUCCESS
}
