use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{GenerationRequest, LLMConfig};
use async_trait::async_trait;
use std::sync::Mutex;

/// Canned-response client for tests. Records every prompt it receives.
pub struct FakeLLMClient {
    response: std::result::Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
    pub saw_image: Mutex<bool>,
}

impl FakeLLMClient {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            prompts: Mutex::new(Vec::new()),
            saw_image: Mutex::new(false),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            prompts: Mutex::new(Vec::new()),
            saw_image: Mutex::new(false),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LLMClient for FakeLLMClient {
    async fn generate(&self, _config: &LLMConfig, request: &GenerationRequest) -> Result<String> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        if request.image.is_some() {
            *self.saw_image.lock().unwrap() = true;
        }

        self.response
            .clone()
            .map_err(AppError::LLMError)
    }
}
