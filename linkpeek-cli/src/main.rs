//! linkpeek CLI
//!
//! Command-line interface for the linkpeek link preview resolver.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use futures::future::try_join_all;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use linkpeek_api::{ApiConfig, ApiServer, AppState};
use linkpeek_core::types::{LinkPreview, TargetUrl};

/// linkpeek - link previews with request coalescing
#[derive(Parser)]
#[command(name = "linkpeek")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080", env = "LINKPEEK_PORT")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0", env = "LINKPEEK_BIND")]
        bind: String,
    },

    /// Resolve a single URL and print its preview
    Resolve {
        /// URL to preview
        url: String,
        /// Number of concurrent callers sharing the fetch
        #[arg(short, long, default_value = "1")]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "linkpeek=debug,info"
    } else {
        "linkpeek=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Resolve { url, concurrency } => cmd_resolve(&url, concurrency).await,
    }
}

/// Run API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    println!("{}", "🚀 Starting linkpeek API server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("\n   Press Ctrl+C to stop.\n");

    let config = ApiConfig::from_env().context("Invalid configuration")?;
    let server = ApiServer::new(config).context("Failed to build server")?;

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;
    server.run(addr).await?;

    Ok(())
}

/// Resolve a URL through the same coalescer the server uses
async fn cmd_resolve(url: &str, concurrency: usize) -> Result<()> {
    println!("{} {}", "🔍 Resolving:".cyan().bold(), url);

    let target = match TargetUrl::parse(url) {
        Ok(target) => target,
        Err(e) => {
            println!("\n{} {}", "❌ Not a previewable URL:".red().bold(), e);
            print_preview(&LinkPreview::invalid_url())?;
            return Ok(());
        }
    };

    let config = ApiConfig::from_env().context("Invalid configuration")?;
    let ttl = config.cache.default_ttl();
    let state = Arc::new(AppState::new(config).context("Failed to build fetcher")?);

    let key = target.cache_key();
    let start = Instant::now();
    let payloads = try_join_all((0..concurrency.max(1)).map(|_| {
        let fetcher = Arc::clone(&state.fetcher);
        let target = target.clone();
        state
            .coalescer
            .resolve(&key, ttl, move || async move { fetcher.fetch(&target).await })
    }))
    .await
    .context("Fetch did not complete")?;
    let elapsed = start.elapsed();
    info!(key = %key, callers = payloads.len(), ?elapsed, "Resolved link");

    let preview = LinkPreview::decode(&payloads[0]).context("Malformed preview payload")?;
    if preview.is_success() {
        println!("\n{}", "✅ Preview:".green().bold());
    } else {
        println!("\n{}", "⚠️  No preview available:".yellow().bold());
    }
    print_preview(&preview)?;

    println!(
        "\n   {} {} caller(s) served in {:?}",
        "Done:".dimmed(),
        payloads.len(),
        elapsed
    );

    Ok(())
}

fn print_preview(preview: &LinkPreview) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(preview)?);
    Ok(())
}
