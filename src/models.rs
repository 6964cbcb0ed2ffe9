//! Data models for collected articles and the RSS documents they come from.
//!
//! - [`Article`]: one normalized headline, owned by a single run
//! - [`RssDocument`] and friends: serde view of a Google News RSS 2.0 search
//!   result, where every item sub-element is optional

use serde::Deserialize;

/// Publisher name used when a feed item carries no `<source>` element.
pub const DEFAULT_SOURCE: &str = "Google News";

/// A normalized headline as produced by the collector.
///
/// Articles live only for the duration of one run; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Headline text. Never empty; used as the de-duplication key.
    pub title: String,
    /// Tag-stripped, trimmed summary text. May be empty.
    pub description: String,
    /// Publisher name, or [`DEFAULT_SOURCE`].
    pub source: String,
    /// Link as given by the feed (usually a Google News redirect).
    pub url: String,
    /// Raw `pubDate` string.
    pub published_at: String,
    /// The search query that surfaced this article.
    pub query: String,
}

/// Root `<rss>` element.
#[derive(Debug, Deserialize)]
pub struct RssDocument {
    pub channel: Channel,
}

#[derive(Debug, Deserialize)]
pub struct Channel {
    #[serde(rename = "item", default)]
    pub items: Vec<FeedItem>,
}

/// One `<item>` of a search result.
#[derive(Debug, Default, Deserialize)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    pub description: Option<String>,
    pub source: Option<FeedSource>,
}

/// `<source url="https://publisher.example">Publisher</source>`; only the
/// element text is used.
#[derive(Debug, Default, Deserialize)]
pub struct FeedSource {
    #[serde(rename = "$text", default)]
    pub name: String,
}
