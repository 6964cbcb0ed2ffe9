//! Digest delivery over the LINE Messaging API.
//!
//! [`notify`] applies the message size limit and sends exactly one
//! broadcast; failures are logged and returned to the caller.

use crate::errors::DigestError;
use crate::utils::{char_len, count_urls, take_chars};
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, instrument};

/// Default API root.
pub const LINE_API_URL: &str = "https://api.line.me";

/// Texts longer than this are cut.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Chars of original text kept when cutting.
pub const TRUNCATED_CHARS: usize = 3950;

/// Appended after a cut.
pub const OMISSION_MARKER: &str = "\n\n... (文字数制限により省略)";

/// A channel that delivers one text message to every subscriber.
pub trait Broadcast {
    async fn broadcast(&self, text: &str) -> Result<(), DigestError>;
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct BroadcastRequest<'a> {
    messages: [TextMessage<'a>; 1],
}

/// Broadcast client for one LINE channel.
#[derive(Clone)]
pub struct LineMessenger {
    client: Client,
    access_token: String,
    base_url: String,
}

impl std::fmt::Debug for LineMessenger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineMessenger")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl LineMessenger {
    pub fn new(access_token: String, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            access_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Broadcast for LineMessenger {
    #[instrument(level = "info", skip_all)]
    async fn broadcast(&self, text: &str) -> Result<(), DigestError> {
        let body = BroadcastRequest {
            messages: [TextMessage { kind: "text", text }],
        };
        let response = self
            .client
            .post(format!("{}/v2/bot/message/broadcast", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DigestError::from_response("LINE broadcast", response).await);
        }
        Ok(())
    }
}

/// Cut `text` to fit a single message.
pub fn fit_message(text: &str) -> String {
    if char_len(text) > MAX_MESSAGE_CHARS {
        format!("{}{OMISSION_MARKER}", take_chars(text, TRUNCATED_CHARS))
    } else {
        text.to_string()
    }
}

/// Broadcast `text` (cut to the size limit) through `channel`.
#[instrument(level = "info", skip_all)]
pub async fn notify<B: Broadcast>(channel: &B, text: &str) -> Result<(), DigestError> {
    let message = fit_message(text);
    info!(
        chars = char_len(&message),
        url_count = count_urls(&message),
        truncated = message.len() != text.len(),
        "Sending broadcast"
    );

    match channel.broadcast(&message).await {
        Ok(()) => {
            info!("Broadcast sent");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Broadcast failed");
            Err(e)
        }
    }
}
