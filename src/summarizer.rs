//! Digest generation through the completion API.
//!
//! The summarizer never fails: an empty batch gets a fixed notice, and any
//! API error is logged and replaced by [`fallback_digest`].

use crate::api::{AskAsync, ChatPrompt};
use crate::models::Article;
use crate::outputs::fallback::{displayable_description, fallback_digest};
use crate::utils::{clean_url, ellipsize, format_pub_date};
use std::fmt::Write;
use tracing::{error, info, instrument};

/// Returned for an empty batch; no request is made.
pub const NOTHING_TO_SUMMARIZE: &str = "要約するニュース記事がありませんでした。";

const PROMPT_DESCRIPTION_CHARS: usize = 150;

const SYSTEM_INSTRUCTION: &str = "あなたは日本のAI・テクノロジーニュースの専門要約者です。
LINEメッセージ向けに以下の形式で要約を作成してください：

【重要な制約事項】
- Markdown記法は絶対に使用禁止
- 各ニュースは「1️⃣」「2️⃣」などの数字絵文字で番号付け
- 強調は【】や絵文字を使用
- 各ニュースの要約後に必ず引用元URLを「🔗 URL」の形式で記載
- URLは短縮せず完全な形で掲載
- 区切り線は「━━━━━━━━━━━━━━━━━━」を使用
- 全体で1200文字以内に収める
- 重要なニュースを3-5件選んで要約";

const USER_PREAMBLE: &str = "以下のAIニュースをLINE向けに要約してください（リンク必須）：";

/// Render the per-article block sent as the user message.
pub fn news_block(articles: &[Article]) -> String {
    let mut out = String::new();
    for (i, article) in articles.iter().enumerate() {
        writeln!(out, "【記事{}】", i + 1).unwrap();
        writeln!(out, "タイトル: {}", article.title).unwrap();
        if let Some(desc) = displayable_description(&article.description) {
            writeln!(out, "内容: {}", ellipsize(desc, PROMPT_DESCRIPTION_CHARS)).unwrap();
        }
        writeln!(out, "配信元: {}", article.source).unwrap();
        writeln!(out, "日時: {}", format_pub_date(&article.published_at)).unwrap();
        writeln!(out, "リンク: {}\n", clean_url(&article.url)).unwrap();
    }
    out
}

/// Build the full completion prompt for `articles`.
pub fn build_prompt(articles: &[Article]) -> ChatPrompt {
    ChatPrompt {
        system: SYSTEM_INSTRUCTION.to_string(),
        user: format!("{USER_PREAMBLE}\n\n{}", news_block(articles)),
    }
}

/// Produces the digest text for a batch.
#[derive(Debug)]
pub struct Summarizer<A> {
    model: A,
}

impl<A: AskAsync> Summarizer<A> {
    pub fn new(model: A) -> Self {
        Self { model }
    }

    /// Summarize `articles`, falling back to the local digest on any API error.
    #[instrument(level = "info", skip_all, fields(articles = articles.len()))]
    pub async fn summarize(&self, articles: &[Article]) -> String {
        if articles.is_empty() {
            return NOTHING_TO_SUMMARIZE.to_string();
        }

        info!("Requesting digest from completion API");
        match self.model.ask(&build_prompt(articles)).await {
            Ok(text) => {
                info!(chars = text.chars().count(), "Digest generated");
                text
            }
            Err(e) => {
                error!(error = %e, "Digest generation failed; using fallback digest");
                fallback_digest(articles)
            }
        }
    }
}
