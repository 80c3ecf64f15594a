pub mod gemini;

#[cfg(test)]
pub mod fake;

use crate::domain::error::Result;
use crate::domain::llm_config::{GenerationRequest, LLMConfig};
use async_trait::async_trait;

/// A generative model that turns a prompt (plus an optional image) into text.
#[async_trait]
pub trait LLMClient {
    async fn generate(&self, config: &LLMConfig, request: &GenerationRequest) -> Result<String>;
}
