use serde_json::Value;

use crate::error::{AppError, Result};

/// Classified result of the single upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome {
    Success(String),
    UpstreamError { status: u16, excerpt: String },
    TransportError(String),
    Timeout,
}

impl UpstreamOutcome {
    /// Short tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamOutcome::Success(_) => "success",
            UpstreamOutcome::UpstreamError { .. } => "upstream_error",
            UpstreamOutcome::TransportError(_) => "transport_error",
            UpstreamOutcome::Timeout => "timeout",
        }
    }

    /// Success text is trimmed; a blank reply becomes [`AppError::EmptyResponse`].
    pub fn into_result(self) -> Result<String> {
        match self {
            UpstreamOutcome::Success(text) => {
                let text = text.trim();
                if text.is_empty() {
                    Err(AppError::EmptyResponse)
                } else {
                    Ok(text.to_string())
                }
            }
            UpstreamOutcome::UpstreamError { status, excerpt } => {
                Err(AppError::Upstream { status, details: excerpt })
            }
            UpstreamOutcome::TransportError(msg) => Err(AppError::Transport(msg)),
            UpstreamOutcome::Timeout => Err(AppError::Timeout),
        }
    }
}

const FLAT_TEXT_FIELDS: [&str; 4] = ["text", "completion", "response", "message"];

/// Pulls the generated text out of a reply body.
///
/// Accepts a `content` block list (first block's `text`, or a bare string
/// block) and falls back to a flat top-level text field. Any other shape
/// yields an empty string.
pub fn extract_text(reply: &Value) -> String {
    let first_block = reply
        .get("content")
        .and_then(Value::as_array)
        .and_then(|blocks| blocks.first());
    if let Some(block) = first_block {
        let text = block.get("text").and_then(Value::as_str).or_else(|| block.as_str());
        if let Some(text) = text {
            return text.to_string();
        }
    }

    FLAT_TEXT_FIELDS
        .iter()
        .find_map(|field| reply.get(field).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}
