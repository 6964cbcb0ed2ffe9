//! Google News RSS search collector.
//!
//! Runs a fixed set of Japanese AI queries against the Google News search
//! feed, one request at a time with a pause in between, and merges the
//! results into a single short batch.
//!
//! # Selection
//!
//! Per query the top-ranked item (position 0) is skipped and the next five
//! are kept; the top hit is usually the same story across all three queries.
//! Across queries the first article with a given title wins, and the batch is
//! capped at [`MAX_ARTICLES`].

use crate::errors::DigestError;
use crate::models::{Article, DEFAULT_SOURCE, FeedItem, RssDocument};
use crate::scrapers::ArticleSource;
use crate::utils::strip_tags;
use itertools::Itertools;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Default search endpoint.
pub const GOOGLE_NEWS_SEARCH_URL: &str = "https://news.google.com/rss/search";

/// Queries issued on every run, in order.
pub const SEARCH_QUERIES: [&str; 3] = [
    r#"AI OR ChatGPT OR "生成AI""#,
    r#""人工知能" OR OpenAI OR Claude"#,
    r#""機械学習" OR "ディープラーニング""#,
];

/// Upper bound on the batch handed to the summarizer.
pub const MAX_ARTICLES: usize = 6;

/// Feed positions kept per query (zero-based, inclusive start, exclusive end).
const KEPT_POSITIONS: std::ops::Range<usize> = 1..6;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const QUERY_DELAY: Duration = Duration::from_secs(1);

/// Query-string parameters understood by the search feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedParam {
    /// Search expression.
    Query,
    /// UI language.
    Language,
    /// Region.
    Region,
    /// Country/language edition id.
    Edition,
    /// Recency window.
    Window,
}

impl FeedParam {
    pub fn key(self) -> &'static str {
        match self {
            FeedParam::Query => "q",
            FeedParam::Language => "hl",
            FeedParam::Region => "gl",
            FeedParam::Edition => "ceid",
            FeedParam::Window => "when",
        }
    }
}

/// Build the search URL for `query`, percent-encoding every value.
pub fn build_search_url(base_url: &str, query: &str) -> String {
    let params = [
        (FeedParam::Query, query),
        (FeedParam::Language, "ja"),
        (FeedParam::Region, "JP"),
        (FeedParam::Edition, "JP:ja"),
        (FeedParam::Window, "1d"),
    ];
    let query_string = params
        .iter()
        .map(|(param, value)| format!("{}={}", param.key(), urlencoding::encode(value)))
        .join("&");
    format!("{base_url}?{query_string}")
}

/// Decode a feed body and turn the kept items into articles.
///
/// Items without a non-empty title are dropped after position filtering, so
/// a titleless item still occupies its slot.
pub fn parse_feed(xml: &str, query: &str) -> Result<Vec<Article>, DigestError> {
    let doc: RssDocument = quick_xml::de::from_str(xml)?;
    let articles = doc
        .channel
        .items
        .into_iter()
        .skip(KEPT_POSITIONS.start)
        .take(KEPT_POSITIONS.len())
        .filter_map(|item| to_article(item, query))
        .collect();
    Ok(articles)
}

fn to_article(item: FeedItem, query: &str) -> Option<Article> {
    let title = item.title.filter(|t| !t.trim().is_empty())?;
    let source = item
        .source
        .map(|s| s.name)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    Some(Article {
        title,
        description: item.description.as_deref().map(strip_tags).unwrap_or_default(),
        source,
        url: item.link.unwrap_or_default(),
        published_at: item.pub_date.unwrap_or_default(),
        query: query.to_string(),
    })
}

/// Collector bound to one search endpoint.
#[derive(Debug, Clone)]
pub struct GoogleNewsCollector {
    client: Client,
    base_url: String,
    queries: Vec<String>,
    delay: Duration,
}

impl GoogleNewsCollector {
    /// Create a collector for `base_url` using the standard queries.
    pub fn new(base_url: impl Into<String>) -> Result<Self, DigestError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            queries: SEARCH_QUERIES.iter().map(|q| q.to_string()).collect(),
            delay: QUERY_DELAY,
        })
    }

    /// Override the pause between query requests.
    #[cfg(test)]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fetch and parse one query.
    #[instrument(level = "info", skip(self))]
    async fn fetch_query(&self, query: &str) -> Result<Vec<Article>, DigestError> {
        let url = build_search_url(&self.base_url, query);
        debug!(%url, "Requesting search feed");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DigestError::from_response("Google News", response).await);
        }
        let body = response.text().await?;
        parse_feed(&body, query)
    }
}

impl ArticleSource for GoogleNewsCollector {
    #[instrument(level = "info", skip_all)]
    async fn collect(&self) -> Vec<Article> {
        let t0 = Instant::now();
        let mut found = Vec::new();

        for (i, query) in self.queries.iter().enumerate() {
            if i > 0 {
                sleep(self.delay).await;
            }
            info!(index = i + 1, total = self.queries.len(), %query, "Searching");
            match self.fetch_query(query).await {
                Ok(articles) => {
                    info!(%query, count = articles.len(), "Query returned articles");
                    found.extend(articles);
                }
                Err(e) => {
                    warn!(%query, error = %e, "Query failed; continuing with remaining queries");
                }
            }
        }

        let articles: Vec<Article> = found
            .into_iter()
            .unique_by(|a| a.title.clone())
            .take(MAX_ARTICLES)
            .collect();

        for a in &articles {
            debug!(title = %a.title, source = %a.source, query = %a.query, "Kept article");
        }
        info!(
            count = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Collected articles"
        );
        articles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn item(title: &str) -> String {
        format!(
            "<item><title>{title}</title><link>https://news.google.com/rss/articles/{title}</link>\
             <pubDate>Tue, 06 May 2025 09:05:00 GMT</pubDate>\
             <description>&lt;a href=\"x\"&gt;{title} の詳細についての説明文です&lt;/a&gt;</description>\
             <source url=\"https://pub.example\">Publisher</source></item>"
        )
    }

    fn feed(titles: &[&str]) -> String {
        let items: String = titles.iter().map(|t| item(t)).collect();
        format!("<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>search</title>{items}</channel></rss>")
    }

    fn collector_for(server: &MockServer) -> GoogleNewsCollector {
        GoogleNewsCollector::new(format!("{}/rss/search", server.uri()))
            .unwrap()
            .with_delay(Duration::ZERO)
    }

    async fn mount_query(server: &MockServer, query: &str, status: u16, body: String) {
        Mock::given(method("GET"))
            .and(path("/rss/search"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[test]
    fn test_build_search_url_encodes_values() {
        let url = build_search_url(GOOGLE_NEWS_SEARCH_URL, SEARCH_QUERIES[0]);
        assert_eq!(
            url,
            "https://news.google.com/rss/search?q=AI%20OR%20ChatGPT%20OR%20%22%E7%94%9F%E6%88%90AI%22&hl=ja&gl=JP&ceid=JP%3Aja&when=1d"
        );
    }

    #[test]
    fn test_parse_feed_skips_first_and_keeps_five() {
        let xml = feed(&["t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7"]);
        let articles = parse_feed(&xml, "q").unwrap();
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["t1", "t2", "t3", "t4", "t5"]);
        assert!(articles.iter().all(|a| a.query == "q"));
    }

    #[test]
    fn test_parse_feed_normalizes_fields() {
        let xml = r#"<rss><channel>
            <item><title>skipped</title></item>
            <item><title>見出し</title><description>&lt;b&gt; 本文 &lt;/b&gt;</description></item>
            <item><link>https://x.example</link></item>
        </channel></rss>"#;
        let articles = parse_feed(xml, "q").unwrap();
        assert_eq!(articles.len(), 1);
        let a = &articles[0];
        assert_eq!(a.title, "見出し");
        assert_eq!(a.description, "本文");
        assert_eq!(a.source, DEFAULT_SOURCE);
        assert_eq!(a.url, "");
        assert_eq!(a.published_at, "");
    }

    #[test]
    fn test_parse_feed_realistic_google_news_document() {
        let xml = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss xmlns:media="http://search.yahoo.com/mrss/" version="2.0">
  <channel>
    <generator>NFE/5.0</generator>
    <title>"AI" - Google ニュース</title>
    <link>https://news.google.com/search?q=AI&amp;hl=ja</link>
    <language>ja</language>
    <lastBuildDate>Tue, 06 May 2025 09:30:00 GMT</lastBuildDate>
    <description>Google ニュース</description>
    <item>
      <title>zero - A</title>
      <link>https://news.google.com/rss/articles/zero</link>
      <source url="https://a.example">A社</source>
    </item>
    <item>
      <title>one &amp; co - B</title>
      <link>https://news.google.com/rss/articles/one?oc=5</link>
      <guid isPermaLink="false">one</guid>
      <pubDate>Tue, 06 May 2025 08:00:00 GMT</pubDate>
      <description><![CDATA[<a href="https://news.google.com/rss/articles/one" target="_blank">one &amp; co</a>&nbsp;&nbsp;<font color="#6f6f6f">B社</font>]]></description>
      <media:content url="https://b.example/img.jpg" medium="image"/>
      <source url="https://b.example">B社</source>
    </item>
  </channel>
</rss>"##;
        let articles = parse_feed(xml, "q").unwrap();
        assert_eq!(articles.len(), 1);
        let a = &articles[0];
        assert_eq!(a.title, "one & co - B");
        assert_eq!(a.source, "B社");
        assert_eq!(a.url, "https://news.google.com/rss/articles/one?oc=5");
        assert_eq!(a.published_at, "Tue, 06 May 2025 08:00:00 GMT");
        assert!(a.description.starts_with("one &amp; co"));
        assert!(!a.description.contains('<'));
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        assert!(parse_feed("this is not xml", "q").is_err());
    }

    #[tokio::test]
    async fn test_collect_single_query_with_five_items() {
        let server = MockServer::start().await;
        mount_query(&server, SEARCH_QUERIES[0], 200, feed(&["a", "b", "c", "d", "e"])).await;
        mount_query(&server, SEARCH_QUERIES[1], 200, feed(&[])).await;
        mount_query(&server, SEARCH_QUERIES[2], 200, feed(&[])).await;

        let articles = collector_for(&server).collect().await;
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_collect_dedupes_and_caps() {
        let server = MockServer::start().await;
        mount_query(&server, SEARCH_QUERIES[0], 200, feed(&["x", "dup", "a1", "a2"])).await;
        mount_query(&server, SEARCH_QUERIES[1], 200, feed(&["y", "dup", "b1", "b2", "b3", "b4"])).await;
        mount_query(&server, SEARCH_QUERIES[2], 200, feed(&["z", "c1", "c2"])).await;

        let articles = collector_for(&server).collect().await;
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["dup", "a1", "a2", "b1", "b2", "b3"]);
        assert_eq!(articles[0].query, SEARCH_QUERIES[0]);

        let unique: HashSet<_> = titles.iter().collect();
        assert_eq!(unique.len(), titles.len());
        assert!(articles.len() <= MAX_ARTICLES);
    }

    #[tokio::test]
    async fn test_collect_survives_failing_query() {
        let server = MockServer::start().await;
        mount_query(&server, SEARCH_QUERIES[0], 503, "unavailable".to_string()).await;
        mount_query(&server, SEARCH_QUERIES[1], 200, "<html>not a feed</html>".to_string()).await;
        mount_query(&server, SEARCH_QUERIES[2], 200, feed(&["top", "kept"])).await;

        let articles = collector_for(&server).collect().await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "kept");
        assert_eq!(articles[0].source, "Publisher");
    }

    #[tokio::test]
    async fn test_collect_empty_feeds() {
        let server = MockServer::start().await;
        for q in SEARCH_QUERIES {
            mount_query(&server, q, 200, feed(&[])).await;
        }
        let articles = collector_for(&server).collect().await;
        assert!(articles.is_empty());
    }
}
