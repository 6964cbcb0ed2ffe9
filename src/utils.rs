//! Text helpers shared by the collector, the digest renderers and the notifier.
//!
//! All lengths here are counted in `char`s, never bytes: headlines are
//! Japanese and a byte slice would split a code point.

use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

/// Display format for article and footer timestamps.
pub const DISPLAY_DATE_FORMAT: &str = "%Y年%m月%d日 %H:%M";

/// Shown in place of a publication date the feed did not provide.
pub const UNKNOWN_DATE: &str = "日時不明";

/// Number of `char`s in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The first `max` chars of `s`.
pub fn take_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Cut `s` to `max` chars and append `...` when anything was dropped.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(ellipsize("abcdef", 3), "abc...");
/// assert_eq!(ellipsize("abc", 3), "abc");
/// ```
pub fn ellipsize(s: &str, max: usize) -> String {
    if char_len(s) > max {
        format!("{}...", take_chars(s, max))
    } else {
        s.to_string()
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped characters.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let len = char_len(s);
    if len <= max {
        s.to_string()
    } else {
        format!("{}…(+{} chars)", take_chars(s, max), len - max)
    }
}

/// Remove anything that looks like an HTML tag and trim the result.
pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").trim().to_string()
}

/// Count `http(s)://` links in `s`.
pub fn count_urls(s: &str) -> usize {
    URL_RE.find_iter(s).count()
}

/// Recover the publisher URL from a Google News redirect link.
///
/// Links of the form `https://news.google.com/...?url=<target>` are unwrapped
/// to `<target>`; anything else, including URLs that fail to parse, is
/// returned unchanged. Unwrapping repeats until the URL stops changing, so
/// cleaning an already clean URL is a no-op.
pub fn clean_url(raw: &str) -> String {
    let mut current = raw.to_string();
    while let Some(target) = redirect_target(&current) {
        if target == current {
            break;
        }
        current = target;
    }
    current
}

fn redirect_target(url: &str) -> Option<String> {
    if !url.contains("news.google.com") || !url.contains("url=") {
        return None;
    }
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == "url")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Render an RSS `pubDate` for display.
///
/// RFC 2822 dates (`Mon, 06 May 2025 09:30:00 GMT`) are shown in the
/// wall-clock time the feed used. A date with an unrecognised zone suffix is
/// retried without it; anything else is passed through verbatim.
pub fn format_pub_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return UNKNOWN_DATE.to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.naive_local().format(DISPLAY_DATE_FORMAT).to_string();
    }
    let without_zone = raw.split(" GMT").next().unwrap_or(raw).trim();
    match NaiveDateTime::parse_from_str(without_zone, "%a, %d %b %Y %H:%M:%S") {
        Ok(dt) => dt.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_chars_multibyte() {
        assert_eq!(take_chars("人工知能ニュース", 4), "人工知能");
        assert_eq!(take_chars("AI", 10), "AI");
        assert_eq!(take_chars("", 3), "");
    }

    #[test]
    fn test_ellipsize() {
        assert_eq!(ellipsize("abcdef", 3), "abc...");
        assert_eq!(ellipsize("abc", 3), "abc");
        assert_eq!(ellipsize("生成AIの最新動向", 4), "生成AI...");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "あ".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"あ".repeat(100)));
        assert!(result.ends_with("…(+400 chars)"));
        assert_eq!(truncate_for_log("short", 100), "short");
    }

    #[test]
    fn test_strip_tags() {
        let html = r##"  <a href="https://example.com">OpenAI、新モデルを発表</a>&nbsp;<font color="#6f6f6f">日経</font> "##;
        assert_eq!(strip_tags(html), "OpenAI、新モデルを発表&nbsp;日経");
        assert_eq!(strip_tags("no markup"), "no markup");
    }

    #[test]
    fn test_count_urls() {
        let text = "1️⃣ 記事\n🔗 https://a.example/x\n2️⃣ 記事\n🔗 http://b.example/y?z=1\n";
        assert_eq!(count_urls(text), 2);
        assert_eq!(count_urls("リンクなし"), 0);
    }

    #[test]
    fn test_clean_url_unwraps_redirect() {
        let wrapped = "https://news.google.com/articles/abc?url=https%3A%2F%2Fexample.jp%2Fnews%2F1&hl=ja";
        assert_eq!(clean_url(wrapped), "https://example.jp/news/1");
    }

    #[test]
    fn test_clean_url_leaves_other_urls() {
        let plain = "https://news.google.com/rss/articles/CBMiK2h0dHBz?oc=5";
        assert_eq!(clean_url(plain), plain);
        assert_eq!(clean_url("not a url url="), "not a url url=");
        assert_eq!(clean_url(""), "");
    }

    #[test]
    fn test_clean_url_is_idempotent() {
        let samples = [
            "https://news.google.com/articles/abc?url=https%3A%2F%2Fexample.jp%2Fnews%2F1",
            "https://news.google.com/x?url=https%3A%2F%2Fnews.google.com%2Fy%3Furl%3Dhttps%253A%252F%252Fdeep.example%252F",
            "https://example.com/path?url=foo",
            "https://news.google.com/rss/articles/CBMi?oc=5",
        ];
        for s in samples {
            let once = clean_url(s);
            assert_eq!(clean_url(&once), once, "not idempotent for {s}");
        }
    }

    #[test]
    fn test_format_pub_date_rfc2822() {
        assert_eq!(
            format_pub_date("Tue, 06 May 2025 09:05:00 GMT"),
            "2025年05月06日 09:05"
        );
    }

    #[test]
    fn test_format_pub_date_fallbacks() {
        assert_eq!(format_pub_date(""), UNKNOWN_DATE);
        assert_eq!(format_pub_date("   "), UNKNOWN_DATE);
        assert_eq!(format_pub_date("昨日"), "昨日");
        assert_eq!(
            format_pub_date("Tue, 06 May 2025 09:05:00 GMT+9"),
            "2025年05月06日 09:05"
        );
    }
}
