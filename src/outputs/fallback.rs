//! Deterministic digest rendered without the completion API.
//!
//! Output for a given article list is byte-identical between calls except
//! for the final `🕐` timestamp line.

use crate::models::Article;
use crate::outputs::{DIVIDER, number_glyph};
use crate::utils::{DISPLAY_DATE_FORMAT, char_len, clean_url, ellipsize, format_pub_date};
use chrono::{Local, NaiveDateTime};
use std::fmt::Write;
use tracing::{info, instrument};

const HEADER: &str = "🤖 今日のAIニュースまとめ";
const FOOTER_LABEL: &str = "📱 AIニュース自動配信システム";

/// Items rendered in the fallback digest.
const MAX_ITEMS: usize = 5;
const TITLE_CHARS: usize = 40;
const DESCRIPTION_CHARS: usize = 80;

/// Descriptions at or under this many chars are left out.
pub const MIN_DESCRIPTION_CHARS: usize = 20;

/// Render the fallback digest stamped with the current local time.
#[instrument(level = "info", skip_all, fields(articles = articles.len()))]
pub fn fallback_digest(articles: &[Article]) -> String {
    info!("Rendering fallback digest");
    render(articles, Local::now().naive_local())
}

/// Render the fallback digest with an explicit footer timestamp.
pub fn render(articles: &[Article], generated_at: NaiveDateTime) -> String {
    let mut out = String::new();
    writeln!(out, "{HEADER}\n").unwrap();

    for (i, article) in articles.iter().take(MAX_ITEMS).enumerate() {
        writeln!(
            out,
            "{}【{}】",
            number_glyph(i),
            ellipsize(&article.title, TITLE_CHARS)
        )
        .unwrap();

        if let Some(desc) = displayable_description(&article.description) {
            writeln!(out, "{}", ellipsize(desc, DESCRIPTION_CHARS)).unwrap();
        }

        writeln!(out, "📰 {}", article.source).unwrap();
        writeln!(out, "📅 {}", format_pub_date(&article.published_at)).unwrap();
        writeln!(out, "🔗 {}\n", clean_url(&article.url)).unwrap();
    }

    writeln!(out, "{DIVIDER}").unwrap();
    writeln!(out, "{FOOTER_LABEL}").unwrap();
    write!(out, "🕐 {}", generated_at.format(DISPLAY_DATE_FORMAT)).unwrap();
    out
}

/// The trimmed description, if it is long enough to be worth showing.
pub fn displayable_description(description: &str) -> Option<&str> {
    let trimmed = description.trim();
    (char_len(trimmed) > MIN_DESCRIPTION_CHARS).then_some(trimmed)
}
