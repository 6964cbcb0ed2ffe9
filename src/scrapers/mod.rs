//! Headline sources.
//!
//! A source runs its whole collection pass and always returns a (possibly
//! empty) batch: per-request failures are logged and absorbed inside the
//! source, never surfaced to the pipeline.
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | Google News | [`google_news`] | RSS search feed, three fixed Japanese AI queries |

use crate::models::Article;

pub mod google_news;

/// A collector of headlines for one run.
pub trait ArticleSource {
    /// Run every query and return the de-duplicated, bounded batch.
    async fn collect(&self) -> Vec<Article>;
}
