pub mod anthropic;

use async_trait::async_trait;

use crate::models::{RenderedPrompt, UpstreamOutcome};

pub use anthropic::AnthropicClient;

/// Text generation backend. Implementations make exactly one outbound call per
/// invocation and never fail: every result is classified into an outcome.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &RenderedPrompt) -> UpstreamOutcome;
}
