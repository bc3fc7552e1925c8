use std::sync::Arc;

use crate::{
    clients::{AnthropicClient, Generator},
    config::CoachConfig,
    error::{AppError, Result},
    models::{
        coach::{require_json_content_type, CoachRequest},
        RenderedPrompt,
    },
};

/// Request pipeline: validate, render, generate, normalize.
pub struct CoachService {
    config: CoachConfig,
    generator: Option<Arc<dyn Generator>>,
}

impl CoachService {
    /// Wires the live Claude client. Without a credential the service still
    /// answers, but every POST fails with `ServerMisconfigured`.
    pub fn from_config(config: CoachConfig) -> Self {
        let generator = AnthropicClient::from_config(&config)
            .map(|client| Arc::new(client) as Arc<dyn Generator>);
        if generator.is_none() {
            tracing::error!("CLAUDE_API_KEY is not set; coaching requests will fail with 500");
        }
        Self { config, generator }
    }

    pub fn with_generator(config: CoachConfig, generator: Arc<dyn Generator>) -> Self {
        Self { config, generator: Some(generator) }
    }

    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Produces the coaching text for one POST. Every pre-flight check runs
    /// before the generator is touched.
    pub async fn create_answer(&self, content_type: Option<&str>, body: &[u8]) -> Result<String> {
        let generator = self.generator.as_ref().ok_or(AppError::ServerMisconfigured)?;
        require_json_content_type(content_type)?;
        let req = CoachRequest::from_json(body)?;

        tracing::info!(
            input_len = req.user_input.chars().count(),
            has_context = req.has_context(),
            has_name = req.has_name(),
            "coaching request accepted"
        );

        let prompt = RenderedPrompt::render(&req);
        generator.generate(&prompt).await.into_result()
    }
}
