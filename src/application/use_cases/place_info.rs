use crate::application::use_cases::prompt_builder::build_place_prompt;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{GenerationRequest, LLMConfig};
use crate::domain::place::{PlaceInfo, PlaceQuery};
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::{clean_llm_response, extract_json};
use std::sync::Arc;
use validator::Validate;

pub struct PlaceInfoUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    output_language: String,
}

impl PlaceInfoUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, output_language: String) -> Self {
        Self {
            llm_client,
            output_language,
        }
    }

    /// Looks up facts about a place. Unparsable model output does not fail the
    /// request; a placeholder built from the raw text is returned instead.
    pub async fn execute(&self, config: &LLMConfig, query: PlaceQuery) -> Result<PlaceInfo> {
        query.validate()?;
        let name = query.name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("Place name is required".to_string()));
        }

        let prompt = build_place_prompt(name, &self.output_language);
        let raw_result = self
            .llm_client
            .generate(config, &GenerationRequest::text(prompt))
            .await?;

        Ok(parse_place_info(name, &raw_result))
    }
}

pub fn parse_place_info(query_name: &str, raw: &str) -> PlaceInfo {
    let extracted = extract_json(Some(raw));

    match parse_place_object(&extracted) {
        Ok(mut info) => {
            if info.name.trim().is_empty() {
                info.name = query_name.to_string();
            }
            info
        }
        Err(err) => {
            tracing::warn!(error = %err, place = %query_name, "Falling back to placeholder place info");
            PlaceInfo::fallback(query_name, &clean_llm_response(raw))
        }
    }
}

// Only a JSON object counts; serde would otherwise map an array onto the
// struct fields positionally.
fn parse_place_object(extracted: &str) -> std::result::Result<PlaceInfo, String> {
    match serde_json::from_str::<serde_json::Value>(extracted) {
        Ok(value @ serde_json::Value::Object(_)) => {
            serde_json::from_value(value).map_err(|e| e.to_string())
        }
        Ok(_) => Err("expected a JSON object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}
