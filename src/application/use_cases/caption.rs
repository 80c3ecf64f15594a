use crate::application::use_cases::prompt_builder::build_caption_prompt;
use crate::domain::caption::{Caption, CaptionRequest, CaptionStyle};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{GenerationRequest, ImageInput, LLMConfig};
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::extract_json;
use std::sync::Arc;
use validator::Validate;

pub struct CaptionUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    output_language: String,
}

impl CaptionUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, output_language: String) -> Self {
        Self {
            llm_client,
            output_language,
        }
    }

    pub async fn execute(
        &self,
        config: &LLMConfig,
        request: CaptionRequest,
        image: ImageInput,
    ) -> Result<Vec<Caption>> {
        request.validate()?;

        let prompt = {
            let mut rng = rand::thread_rng();
            build_caption_prompt(&request, &self.output_language, &mut rng)
        };

        tracing::info!(
            description = %request.description_or_default(),
            styles = request.effective_styles().len(),
            "Generating captions"
        );

        let raw_result = self
            .llm_client
            .generate(config, &GenerationRequest::with_image(prompt, image))
            .await?;

        let captions = parse_captions(&raw_result, &request.effective_styles())?;
        tracing::info!(count = captions.len(), "Generated captions");

        Ok(captions)
    }
}

/// Parses model output into captions. The payload must be a non-empty JSON
/// array; captions without a style get the requested style at their position.
pub fn parse_captions(raw: &str, styles: &[CaptionStyle]) -> Result<Vec<Caption>> {
    let extracted = extract_json(Some(raw));

    let captions: Vec<Caption> = serde_json::from_str(&extracted).map_err(|e| {
        tracing::warn!(error = %e, "Model output is not a caption array");
        AppError::ParseError(format!("Unexpected caption format: {}", e))
    })?;

    let captions: Vec<Caption> = captions
        .into_iter()
        .enumerate()
        .filter(|(_, caption)| !caption.text.trim().is_empty())
        .map(|(idx, mut caption)| {
            if caption.style.is_none() {
                caption.style = styles.get(idx).map(|style| style.to_string());
            }
            caption.text = caption.text.trim().to_string();
            caption
        })
        .collect();

    if captions.is_empty() {
        return Err(AppError::ParseError(
            "Model returned no captions".to_string(),
        ));
    }

    Ok(captions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm_clients::fake::FakeLLMClient;

    fn image() -> ImageInput {
        ImageInput {
            mime_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
        }
    }

    #[test]
    fn test_parse_plain_strings_get_styles() {
        let captions = parse_captions(
            "```json\n[\"first\", \"second\"]\n```",
            &CaptionStyle::DEFAULT_SET,
        )
        .unwrap();

        assert_eq!(captions.len(), 2);
        assert_eq!(captions[0].style.as_deref(), Some("humorous"));
        assert_eq!(captions[1].style.as_deref(), Some("emotional"));
    }

    #[test]
    fn test_parse_blank_caption_keeps_style_positions() {
        let captions =
            parse_captions(r#"["", "b", "c"]"#, &CaptionStyle::DEFAULT_SET).unwrap();

        assert_eq!(captions.len(), 2);
        assert_eq!(captions[0].text, "b");
        assert_eq!(captions[0].style.as_deref(), Some("emotional"));
        assert_eq!(captions[1].style.as_deref(), Some("concise"));
    }

    #[test]
    fn test_parse_keeps_model_style() {
        let captions = parse_captions(
            r#"[{"style": "poetic", "text": " moonlight "}]"#,
            &[CaptionStyle::Humorous],
        )
        .unwrap();
        assert_eq!(captions[0].style.as_deref(), Some("poetic"));
        assert_eq!(captions[0].text, "moonlight");
    }

    #[test]
    fn test_parse_rejects_empty_array() {
        assert!(matches!(
            parse_captions("", &CaptionStyle::DEFAULT_SET),
            Err(AppError::ParseError(_))
        ));
        assert!(matches!(
            parse_captions("[\"  \"]", &CaptionStyle::DEFAULT_SET),
            Err(AppError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_object_and_prose() {
        assert!(matches!(
            parse_captions(r#"{"captions": ["a"]}"#, &CaptionStyle::DEFAULT_SET),
            Err(AppError::ParseError(_))
        ));
        assert!(matches!(
            parse_captions("Sorry, I can't help with that.", &CaptionStyle::DEFAULT_SET),
            Err(AppError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_sends_prompt_and_image() {
        let client = Arc::new(FakeLLMClient::replying(
            r#"Here are your captions: ["one", "two", "three"]"#,
        ));
        let use_case = CaptionUseCase::new(client.clone(), "English".to_string());

        let request = CaptionRequest {
            description: "sunset at the beach".to_string(),
            ..Default::default()
        };
        let captions = use_case
            .execute(&LLMConfig::default(), request, image())
            .await
            .unwrap();

        assert_eq!(captions.len(), 3);
        assert!(*client.saw_image.lock().unwrap());
        assert!(client.last_prompt().unwrap().contains("sunset at the beach"));
    }

    #[tokio::test]
    async fn test_execute_rejects_invalid_request_before_calling_model() {
        let client = Arc::new(FakeLLMClient::replying("[\"never\"]"));
        let use_case = CaptionUseCase::new(client.clone(), "English".to_string());

        let request = CaptionRequest {
            rating: Some(9),
            ..Default::default()
        };
        let result = use_case.execute(&LLMConfig::default(), request, image()).await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(client.last_prompt().is_none());
    }

    #[tokio::test]
    async fn test_execute_propagates_model_failure() {
        let client = Arc::new(FakeLLMClient::failing("boom"));
        let use_case = CaptionUseCase::new(client, "English".to_string());

        let result = use_case
            .execute(&LLMConfig::default(), CaptionRequest::default(), image())
            .await;

        assert!(matches!(result, Err(AppError::LLMError(_))));
    }
}
