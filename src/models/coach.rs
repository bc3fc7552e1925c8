use serde_json::Value;

use crate::error::{AppError, Result};

pub const MAX_USER_INPUT_CHARS: usize = 2000;
pub const MAX_CONTEXT_CHARS: usize = 4000;
pub const MAX_NAME_CHARS: usize = 80;
pub const TRUNCATION_MARKER: &str = " …[truncated]";

/// A coaching request after validation and sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachRequest {
    pub user_input: String,
    /// Empty when the caller sent none.
    pub conversation_context: String,
    /// Empty when the caller sent none; never invented.
    pub name: String,
}

impl CoachRequest {
    /// Parses a raw JSON body. An empty body is treated as `{}`.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::from_value(&Value::Null);
        }
        let value: Value =
            serde_json::from_slice(body).map_err(|e| AppError::InvalidJson(e.to_string()))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let user_input = match value.get("userInput").and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => truncate_with_marker(s, MAX_USER_INPUT_CHARS),
            _ => return Err(AppError::MissingField("userInput")),
        };
        let conversation_context = value
            .get("conversationContext")
            .and_then(Value::as_str)
            .map(|s| truncate_with_marker(s, MAX_CONTEXT_CHARS))
            .unwrap_or_default();
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map(sanitize_name)
            .unwrap_or_default();

        Ok(Self { user_input, conversation_context, name })
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn has_context(&self) -> bool {
        !self.conversation_context.is_empty()
    }
}

/// Rejects anything that does not declare a JSON body.
pub fn require_json_content_type(content_type: Option<&str>) -> Result<()> {
    let declared = content_type.unwrap_or_default().trim().to_ascii_lowercase();
    if declared.starts_with("application/json") {
        Ok(())
    } else {
        Err(AppError::UnsupportedMediaType)
    }
}

pub fn truncate_with_marker(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &s[..cut]),
        None => s.to_string(),
    }
}

/// Trims, caps at [`MAX_NAME_CHARS`], folds CR/LF/TAB runs into one space and
/// drops any other control characters. A name with nothing printable left is
/// returned empty.
pub fn sanitize_name(raw: &str) -> String {
    let mut out = String::new();
    let mut in_break = false;
    for c in raw.trim().chars().take(MAX_NAME_CHARS) {
        if matches!(c, '\r' | '\n' | '\t') {
            if !in_break {
                out.push(' ');
            }
            in_break = true;
            continue;
        }
        in_break = false;
        if !c.is_control() {
            out.push(c);
        }
    }
    out.trim().to_string()
}
