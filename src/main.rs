// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! whoop-sync CLI
//!
//! Authorizes against WHOOP, keeps the stored token fresh, and pulls
//! workout/sleep/recovery collections to JSON.

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use whoop_sync::{
    config::Config,
    models::Resource,
    services::{AuthService, CancelFlag, CollectionFetcher, FetchOptions},
    store::FileTokenStore,
    time_utils::parse_date_arg,
};

#[derive(Parser)]
#[command(name = "whoop-sync", about = "Sync WHOOP workout/sleep/recovery data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the browser authorization flow and store the token
    Auth,
    /// Fetch a collection within a date range and write it as JSON
    Fetch {
        /// Resource to fetch: workouts, sleep or recovery
        resource: Resource,
        /// Range start, YYYY-MM-DD or RFC3339 (default: 7 days ago)
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<chrono::DateTime<Utc>>,
        /// Range end, YYYY-MM-DD or RFC3339 (default: now)
        #[arg(long, value_parser = parse_date_arg)]
        end: Option<chrono::DateTime<Utc>>,
        /// Stop after this many records
        #[arg(long)]
        max_records: Option<usize>,
        /// Records requested per page
        #[arg(long, default_value_t = 25)]
        limit: u32,
        /// Write JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// On a mid-fetch failure, keep what was fetched instead of erroring
        #[arg(long)]
        keep_partial: bool,
    },
    /// Show the authenticated user's basic profile
    Profile,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let store = Arc::new(FileTokenStore::new(config.token_path.clone()));
    let auth = AuthService::new(config.credentials.clone(), store);

    match cli.command {
        Command::Auth => run_auth(&auth).await,
        Command::Fetch {
            resource,
            start,
            end,
            max_records,
            limit,
            out,
            keep_partial,
        } => {
            let end = end.unwrap_or_else(Utc::now);
            let start = start.unwrap_or(end - Duration::days(7));
            let options = FetchOptions {
                page_limit: limit,
                max_records,
                keep_partial,
                cancel: Some(install_ctrl_c_handler()),
                ..FetchOptions::default()
            };
            run_fetch(&auth, resource, start, end, options, out).await
        }
        Command::Profile => run_profile(&auth).await,
    }
}

/// Interactive authorization: print the URL, wait for the pasted redirect.
async fn run_auth(auth: &AuthService) -> anyhow::Result<()> {
    let request = auth.begin_authorization();

    println!("Open this URL in a browser and authorize the application:\n");
    println!("{}\n", request.url);
    print!("Paste the full redirect URL here: ");
    std::io::stdout().flush()?;

    let mut redirect_url = String::new();
    std::io::stdin()
        .read_line(&mut redirect_url)
        .context("Failed to read redirect URL")?;

    let token = auth
        .exchange_code(&request, redirect_url.trim())
        .await
        .context("Authorization failed")?;

    println!("Authorized. Granted scopes: {}", token.scope);
    Ok(())
}

async fn run_fetch(
    auth: &AuthService,
    resource: Resource,
    start: chrono::DateTime<Utc>,
    end: chrono::DateTime<Utc>,
    options: FetchOptions,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let token = auth.valid_access_token().await?;
    let fetcher = CollectionFetcher::new();

    tracing::info!(%resource, %start, %end, "Starting fetch");
    let records = fetcher.fetch(resource, &token, start, end, &options).await?;
    tracing::info!(%resource, count = records.len(), "Fetch complete");

    let json = serde_json::to_string_pretty(&records)?;
    match out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {} {} records to {}", records.len(), resource, path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn run_profile(auth: &AuthService) -> anyhow::Result<()> {
    let token = auth.valid_access_token().await?;
    let profile = CollectionFetcher::new().get_profile(&token).await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

/// Ctrl-C sets the cancel flag; the fetcher stops issuing requests and
/// returns whatever it has accumulated so it can still be written out.
fn install_ctrl_c_handler() -> CancelFlag {
    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing up");
            handler_flag.cancel();
        }
    });
    cancel
}

/// Initialize structured logging to the terminal.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("whoop_sync=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
