use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::strip_json_fences;
use super::types::{
    ApiErrorEnvelope, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const TEMPERATURE: f64 = 0.4;

/// One prompt invocation: system text, user text and the JSON schema the
/// hosted API validates the reply against.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub system: String,
    pub prompt: String,
    pub response_schema: Value,
}

/// Seam for the model provider. Production uses [`GeminiBackend`]; tests
/// swap in a canned backend.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Executes one prompt and returns the parsed JSON payload.
    async fn generate_json(&self, request: PromptRequest) -> Result<Value, String>;
}

pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(api_key: String, model: Option<String>) -> Self {
        GeminiBackend {
            client: reqwest::Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate_json(&self, request: PromptRequest) -> Result<Value, String> {
        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.model);

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: request.prompt }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part { text: request.system }],
            }),
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: "application/json".to_string(),
                response_schema: Some(request.response_schema),
            },
        };

        log::info!("🤖 Calling model {}", self.model);
        crate::api::metrics::increment_model_call_count();

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Failed to reach the model API: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body_text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body_text);
            log::error!("❌ Model API returned {}: {}", status, message);
            return Err(format!("Model API error ({}): {}", status.as_u16(), message));
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse model response: {}", e))?;

        if let Some(usage) = &envelope.usage_metadata {
            log::debug!(
                "📊 Model tokens: prompt={} output={}",
                usage.prompt_token_count,
                usage.candidates_token_count
            );
        }

        let text = envelope
            .text()
            .ok_or_else(|| "Model returned no text content".to_string())?;

        serde_json::from_str(strip_json_fences(text))
            .map_err(|e| format!("Model returned invalid JSON: {}", e))
    }
}

/// Shared handle handlers receive through `web::Data<GenAi>`.
#[derive(Clone)]
pub struct GenAi {
    backend: Arc<dyn GenerativeBackend>,
}

impl GenAi {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        GenAi { backend }
    }

    /// Builds the production handle from GEMINI_API_KEY and the optional
    /// GEMINI_MODEL override.
    pub fn from_env() -> Result<Self, String> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| "GEMINI_API_KEY must be set".to_string())?;
        let model = std::env::var("GEMINI_MODEL").ok();
        Ok(GenAi::new(Arc::new(GeminiBackend::new(api_key, model))))
    }

    /// Runs one prompt and decodes the reply into the template's outcome
    /// type.
    pub async fn generate<T: DeserializeOwned>(&self, request: PromptRequest) -> Result<T, String> {
        let value = self.backend.generate_json(request).await?;
        serde_json::from_value(value)
            .map_err(|e| format!("Model response did not match the expected shape: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::types::HintOutcome;

    struct CannedBackend {
        reply: Value,
    }

    #[async_trait]
    impl GenerativeBackend for CannedBackend {
        async fn generate_json(&self, _request: PromptRequest) -> Result<Value, String> {
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_generate_decodes_outcome() {
        let genai = GenAi::new(Arc::new(CannedBackend {
            reply: serde_json::json!({"hint": "Start with moments you enjoyed"}),
        }));
        let request = PromptRequest {
            system: String::new(),
            prompt: String::new(),
            response_schema: Value::Null,
        };
        let outcome: HintOutcome = genai.generate(request).await.unwrap();
        assert_eq!(outcome.hint, "Start with moments you enjoyed");
    }

    #[tokio::test]
    async fn test_generate_rejects_wrong_shape() {
        let genai = GenAi::new(Arc::new(CannedBackend {
            reply: serde_json::json!({"unexpected": true}),
        }));
        let request = PromptRequest {
            system: String::new(),
            prompt: String::new(),
            response_schema: Value::Null,
        };
        let outcome: Result<HintOutcome, String> = genai.generate(request).await;
        assert!(outcome.is_err());
    }
}
