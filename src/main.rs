//! # AI News Digest
//!
//! A scheduled batch job that collects Japanese AI headlines from the Google
//! News search feed, condenses them into a short digest with a chat model,
//! and broadcasts the digest to every follower of a LINE channel.
//!
//! ## Usage
//!
//! ```sh
//! OPENAI_API_KEY=sk-... LINE_ACCESS_TOKEN=... ai_news_digest
//! ```
//!
//! ## Architecture
//!
//! The application is a linear pipeline, run once per invocation:
//! 1. **Collecting**: three fixed queries against the search feed, merged and de-duplicated
//! 2. **Summarizing**: one chat-completion request, or a local fallback digest
//! 3. **Delivering**: one LINE broadcast; failures trigger a short error notice

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod errors;
mod messaging;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod summarizer;
mod utils;

use api::OpenAiChat;
use cli::{Cli, Config};
use messaging::LineMessenger;
use scrapers::google_news::GoogleNewsCollector;
use summarizer::Summarizer;

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

    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let start_time = std::time::Instant::now();
    info!("ai_news_digest starting up");

    let config = match Config::from_cli(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Initialization failed");
            return Err(e.into());
        }
    };
    debug!(?config, "Loaded configuration");

    // Clients are built once and handed to the pipeline.
    let collector = GoogleNewsCollector::new(config.feed_url.clone())?;
    let summarizer = Summarizer::new(OpenAiChat::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.model.clone(),
    ));
    let line = LineMessenger::new(config.line_access_token.clone(), config.line_api_url.clone());
    info!("Clients initialized");

    let delivered = pipeline::run(&collector, &summarizer, &line).await;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        delivered,
        "Execution complete"
    );

    Ok(())
}
