//! Error type shared by every outbound call in the pipeline.
//!
//! Each component returns `Result<_, DigestError>` and its caller decides
//! what to do with the error branch: the collector skips the query, the
//! summarizer falls back to the local digest, the notifier propagates.

use crate::utils::truncate_for_log;
use thiserror::Error;

/// Chars of a failed response body kept in the error.
const ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("required setting {0} is missing or blank")]
    MissingSetting(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to decode feed document: {0}")]
    Feed(#[from] quick_xml::DeError),

    #[error("completion response contained no text")]
    EmptyCompletion,
}

impl DigestError {
    /// Build a [`DigestError::Status`] from a non-success response, consuming its body.
    ///
    /// Long bodies are cut so the error stays readable in logs.
    pub async fn from_response(service: &'static str, response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        DigestError::Status {
            service,
            status,
            body: truncate_for_log(&body, ERROR_BODY_CHARS),
        }
    }
}
