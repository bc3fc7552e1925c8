use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: u32 = 400;
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "*";

/// Process-wide settings, resolved once at startup and handed to the pipeline.
#[derive(Clone, Debug)]
pub struct CoachConfig {
    /// Absent means every POST is answered with 500 instead of calling upstream.
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub allowed_origin: String,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
        }
    }
}

impl CoachConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            api_key: text("CLAUDE_API_KEY"),
            api_url: text("CLAUDE_API_URL").unwrap_or(defaults.api_url),
            model: text("CLAUDE_MODEL").unwrap_or(defaults.model),
            max_tokens: positive(text("CLAUDE_MAX_TOKENS"), "CLAUDE_MAX_TOKENS")
                .unwrap_or(defaults.max_tokens),
            timeout: positive(text("CLAUDE_TIMEOUT_MS"), "CLAUDE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            allowed_origin: text("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

fn positive<T>(raw: Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let raw = raw?;
    match raw.parse::<T>() {
        Ok(v) if v > T::default() => Some(v),
        _ => {
            tracing::warn!(key, value = %raw, "ignoring invalid numeric setting, using default");
            None
        }
    }
}
