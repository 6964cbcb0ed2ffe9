//! Command-line interface and validated configuration.
//!
//! Every option has an environment fallback, so a scheduled job normally
//! runs with no arguments and takes its secrets from `OPENAI_API_KEY` and
//! `LINE_ACCESS_TOKEN` (or a `.env` file).

use crate::api::{DEFAULT_MODEL, OPENAI_BASE_URL};
use crate::errors::DigestError;
use crate::messaging::LINE_API_URL;
use crate::scrapers::google_news::GOOGLE_NEWS_SEARCH_URL;
use clap::Parser;
use tracing::info;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Normal scheduled run
/// OPENAI_API_KEY=sk-... LINE_ACCESS_TOKEN=... ai_news_digest
///
/// # Different model
/// ai_news_digest --model gpt-4o
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// API key for the chat-completion service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Channel access token for the LINE Messaging API
    #[arg(long, env = "LINE_ACCESS_TOKEN", hide_env_values = true)]
    pub line_access_token: Option<String>,

    /// Chat model used for the digest
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Root of the chat-completion API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// News search feed endpoint
    #[arg(long, env = "NEWS_FEED_URL", default_value = GOOGLE_NEWS_SEARCH_URL)]
    pub feed_url: String,

    /// Root of the LINE Messaging API
    #[arg(long, env = "LINE_API_URL", default_value = LINE_API_URL)]
    pub line_api_url: String,
}

/// Settings for one run, with both secrets present.
#[derive(Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub line_access_token: String,
    pub model: String,
    pub openai_base_url: String,
    pub feed_url: String,
    pub line_api_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("model", &self.model)
            .field("openai_base_url", &self.openai_base_url)
            .field("feed_url", &self.feed_url)
            .field("line_api_url", &self.line_api_url)
            .finish_non_exhaustive()
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, DigestError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(DigestError::MissingSetting(name))
}

impl Config {
    /// Validate parsed arguments. Fails if either secret is missing or blank.
    pub fn from_cli(cli: Cli) -> Result<Self, DigestError> {
        let presence = |v: &Option<String>| if v.is_some() { "present" } else { "missing" };
        info!(
            openai_api_key = presence(&cli.openai_api_key),
            line_access_token = presence(&cli.line_access_token),
            "Checking credentials"
        );

        Ok(Self {
            openai_api_key: required(cli.openai_api_key, "OPENAI_API_KEY")?,
            line_access_token: required(cli.line_access_token, "LINE_ACCESS_TOKEN")?,
            model: cli.model,
            openai_base_url: cli.openai_base_url,
            feed_url: cli.feed_url,
            line_api_url: cli.line_api_url,
        })
    }
}
