use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} (string) is required")]
    MissingField(&'static str),
    #[error("Request body is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("Content-Type must be application/json")]
    UnsupportedMediaType,
    #[error("CLAUDE_API_KEY missing")]
    ServerMisconfigured,
    #[error("Claude API returned {status}")]
    Upstream { status: u16, details: String },
    #[error("{0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("Claude API returned an empty response")]
    EmptyResponse,
}

impl AppError {
    /// Stable code placed in the `error` field so callers can branch on it.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingField(_) => "missing field",
            AppError::InvalidJson(_) => "invalid json",
            AppError::UnsupportedMediaType => "unsupported media type",
            AppError::ServerMisconfigured => "server misconfigured",
            AppError::Upstream { .. } => "upstream error",
            AppError::Transport(_) | AppError::Timeout => "failed to get response",
            AppError::EmptyResponse => "empty response",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            AppError::MissingField(_) | AppError::InvalidJson(_) => 400,
            AppError::UnsupportedMediaType => 415,
            AppError::ServerMisconfigured | AppError::Transport(_) => 500,
            AppError::Upstream { status, .. } => *status,
            AppError::Timeout => 504,
            AppError::EmptyResponse => 502,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflight_errors_have_distinct_codes() {
        let errs = [
            AppError::MissingField("userInput"),
            AppError::UnsupportedMediaType,
            AppError::ServerMisconfigured,
        ];
        let codes: Vec<_> = errs.iter().map(AppError::code).collect();
        assert_eq!(codes, ["missing field", "unsupported media type", "server misconfigured"]);
        let statuses: Vec<_> = errs.iter().map(AppError::status).collect();
        assert_eq!(statuses, [400, 415, 500]);
    }

    #[test]
    fn upstream_status_passes_through() {
        let err = AppError::Upstream { status: 429, details: "slow down".into() };
        assert_eq!(err.status(), 429);
        assert_eq!(err.code(), "upstream error");
    }
}
