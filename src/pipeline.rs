//! One end-to-end run: collect → summarize → broadcast.
//!
//! [`run`] reports success as a `bool` and never returns an error. A failure
//! after collection is announced to subscribers with a short message; a run
//! that finds no articles ends quietly.

use crate::api::AskAsync;
use crate::errors::DigestError;
use crate::messaging::{Broadcast, notify};
use crate::scrapers::ArticleSource;
use crate::summarizer::Summarizer;
use crate::utils::take_chars;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

const ERROR_NOTICE_PREFIX: &str = "AIニュース処理中にエラーが発生しました: ";

/// Chars of the error description included in the notice.
const ERROR_NOTICE_CHARS: usize = 100;

/// How a run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    NoArticles,
}

/// Text sent to subscribers when a run fails.
pub fn error_notice(e: &DigestError) -> String {
    format!(
        "{ERROR_NOTICE_PREFIX}{}",
        take_chars(&e.to_string(), ERROR_NOTICE_CHARS)
    )
}

async fn deliver<S, A, B>(
    source: &S,
    summarizer: &Summarizer<A>,
    channel: &B,
) -> Result<Outcome, DigestError>
where
    S: ArticleSource,
    A: AskAsync,
    B: Broadcast,
{
    let articles = source.collect().await;
    if articles.is_empty() {
        return Ok(Outcome::NoArticles);
    }

    let digest = summarizer.summarize(&articles).await;
    notify(channel, &digest).await?;
    Ok(Outcome::Delivered)
}

/// Execute one run. Returns `true` only when a digest was broadcast.
#[instrument(level = "info", skip_all)]
pub async fn run<S, A, B>(source: &S, summarizer: &Summarizer<A>, channel: &B) -> bool
where
    S: ArticleSource,
    A: AskAsync,
    B: Broadcast,
{
    let t0 = Instant::now();
    info!("AI news run starting");

    match deliver(source, summarizer, channel).await {
        Ok(Outcome::Delivered) => {
            info!(elapsed_ms = t0.elapsed().as_millis() as u64, "AI news digest delivered");
            true
        }
        Ok(Outcome::NoArticles) => {
            info!("No articles found; nothing to send");
            false
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            if let Err(notice_err) = notify(channel, &error_notice(&e)).await {
                warn!(error = %notice_err, "Could not deliver error notice");
            }
            false
        }
    }
}
