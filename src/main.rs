//! # Quiz Answer Service
//!
//! An HTTP service that answers multiple-choice questions with an LLM and
//! attaches a few source links.
//!
//! ## Usage
//!
//! ```sh
//! MISTRAL_API_KEY=... quiz_answer_service --bind 0.0.0.0:8000
//!
//! curl -s localhost:8000/api/request \
//!     -H 'content-type: application/json' \
//!     -d '{"query": "Capital of France?\n1. Paris\n2. Berlin", "id": 7}'
//! ```
//!
//! ## Architecture
//!
//! Each request flows through:
//! 1. **Completion**: the question is sent to the model as one user message
//! 2. **Sources**: static search results, then links scraped from the news site
//! 3. **Extraction**: the model reply is matched back onto a numbered option
//! 4. **Response**: `{id, answer, reasoning, sources}` with at most 3 sources

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod answer;
mod api;
mod cli;
mod config;
mod error;
mod models;
mod scrapers;
mod search;
mod server;
mod utils;

use api::MistralClient;
use cli::Cli;
use config::{FileConfig, ServiceConfig};
use scrapers::news::NewsFetcher;
use server::{Predictor, router};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("quiz_answer_service starting up");

    let args = Cli::parse();
    debug!(bind = %args.bind, config = ?args.config, "Parsed CLI arguments");

    // ---- Configuration ----
    let file_config = match args.config.as_deref() {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = ServiceConfig::resolve(&args, file_config)?;
    info!(?config, "Resolved configuration");

    // ---- Collaborators ----
    let completion = MistralClient::new(&config.api_key, &config.api_base_url, &config.model);
    let news = NewsFetcher::new(
        &config.news_base_url,
        &config.news_page_path,
        config.news_timeout,
    )?;
    let predictor = Arc::new(Predictor::new(completion, news));

    // ---- Serve ----
    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(predictor))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received; draining connections");
}
