//! Airport service: cached AVWX station data over HTTP.
//!
//! Single-binary Tokio application that:
//! 1. Loads the seed list and AVWX token
//! 2. Populates the airport store in the background, one task per airport
//! 3. Serves the store read-only over HTTP while population is in flight

mod config;
mod http;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use airport_store::{AirportStore, PopulateOptions};
use avwx_client::AvwxClient;

/// Airport metadata cache and read-only HTTP API
#[derive(Parser)]
#[command(name = "airport-service", about = "Caches AVWX airport data and serves it over HTTP")]
struct Cli {
    /// Path to the TOML config file (optional; defaults apply if missing).
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Populate once, print the summary, and exit without serving HTTP.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "airport_service=info,avwx_client=info,airport_store=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("Airport service starting up...");

    // Load configuration.
    let cfg = match config::load_config(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if cfg.uses_placeholder_token() {
        warn!("No AVWX token configured (set AVWX_TOKEN); upstream fetches will be rejected");
    }
    info!("Upstream: {}", cfg.avwx_base_url);
    info!("Seed airports ({}): {:?}", cfg.seed_ids.len(), cfg.seed_ids);
    info!(
        "Fetch: timeout={}s, max_concurrent={}",
        cfg.fetch.timeout_secs, cfg.fetch.max_concurrent
    );

    let avwx = match AvwxClient::from_config(&cfg) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to initialize AVWX client: {}", e);
            std::process::exit(1);
        }
    };

    // ── Shared state ─────────────────────────────────────────────────
    let store = AirportStore::new();
    let options = PopulateOptions::from_config(&cfg.fetch);
    let population = store.populate(cfg.seed_ids.iter().cloned(), avwx, &options);

    // ── Once mode ────────────────────────────────────────────────────
    if cli.once {
        let report = population.settled().await;
        let airports: Vec<_> = store.all().collect();
        print!("{}", common::summarize(airports.iter().map(|a| a.as_ref())));
        info!(
            "Loaded {} / {} airports",
            report.loaded.len(),
            report.total()
        );
        for (id, reason) in &report.failed {
            warn!("  {} not loaded: {}", id, reason);
        }
        if report.loaded.is_empty() && report.total() > 0 {
            std::process::exit(1);
        }
        return;
    }

    // Report when the background load settles; serving does not wait for it.
    tokio::spawn(async move {
        let report = population.settled().await;
        if report.is_complete() {
            info!("Population settled: all {} airports loaded", report.total());
        } else {
            warn!(
                "Population settled: {} loaded, {} failed ({:?})",
                report.loaded.len(),
                report.failed.len(),
                report.failed.iter().map(|(id, _)| id).collect::<Vec<_>>()
            );
        }
    });

    // ── Serve ────────────────────────────────────────────────────────
    let listener = match TcpListener::bind(&cfg.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", cfg.bind_addr, e);
            std::process::exit(1);
        }
    };
    info!("Airport service listening on {}. Press Ctrl+C to stop.", cfg.bind_addr);

    let served = axum::serve(listener, http::router(store))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await;

    if let Err(e) = served {
        error!("HTTP server exited with error: {}", e);
        std::process::exit(1);
    }

    info!("Airport service shut down.");
}
