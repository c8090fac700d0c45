//! Recruitsss command-line client
//!
//! Command-line shell over the authenticated REST client:
//! 1. Loads `recruit.toml` (optional) and environment overrides
//! 2. Restores the stored session through `/users/me/`
//! 3. Mounts the page for the subcommand behind the role gate
//! 4. Fetches and prints the page data
//!
//! Redirects requested by the gate or by an expired session are reported on
//! stderr as the page the user would land on.

mod commands;
mod config;
mod error;
mod metrics;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use recruit_auth::TokenStore;
use recruit_client::HttpClient;
use recruit_session::{AuthSession, NavigationLog};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{App, Cli};
use crate::config::{Config, LogFormat};

/// Logs go to stderr so stdout carries only command output.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = Config::resolve_path(cli.config.as_deref());
    let config = Config::load_from(&source)
        .with_context(|| format!("failed to load config from {}", source.path.display()))?;

    init_tracing(config.log_format);
    debug!(
        path = %source.path.display(),
        explicit = source.explicit,
        base_url = %config.api.base_url,
        "configuration loaded"
    );

    let prometheus = metrics::install_recorder()?;

    let tokens = match config.token_path() {
        Some(path) => TokenStore::file(path),
        None => {
            warn!("no home directory; tokens will not outlive this command");
            TokenStore::memory()
        }
    };
    let tokens = Arc::new(tokens);
    let session = Arc::new(AuthSession::new());
    let navigator = Arc::new(NavigationLog::new());
    let client = HttpClient::new(
        &config.client_config(),
        tokens,
        session,
        navigator.clone(),
    )
    .context("failed to build HTTP client")?;

    let app = App {
        client,
        gate: config.gate(),
        navigator,
    };

    if config.session.rehydrate && cli.command.restores_session() {
        app.client
            .rehydrate()
            .await
            .context("failed to restore session")?;
    }

    let outcome = commands::run(&app, cli.command).await;

    if let Some(route) = app.navigator.last() {
        eprintln!("-> {route}");
    }
    if cli.metrics {
        eprint!("{}", prometheus.render());
    }

    outcome
}
