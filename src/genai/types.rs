use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire types for the generateContent endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f64,
    /// "application/json" - the API then enforces the response schema.
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    pub prompt_token_count: u64,
    #[serde(rename = "candidatesTokenCount", default)]
    pub candidates_token_count: u64,
}

impl GenerateContentResponse {
    /// First non-empty text part of the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find(|p| !p.text.is_empty())
            .map(|p| p.text.as_str())
    }
}

/// Error envelope the API returns on non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Structured outcomes the prompt templates ask for
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RankingOutcome {
    pub rankings: Vec<RankedInterest>,
}

#[derive(Debug, Deserialize)]
pub struct RankedInterest {
    pub name: String,
    pub score: f64,
    pub justification: String,
}

#[derive(Debug, Deserialize)]
pub struct SolutionsOutcome {
    pub solutions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchSolutionsOutcome {
    pub entries: Vec<EntrySolutions>,
}

#[derive(Debug, Deserialize)]
pub struct EntrySolutions {
    pub entry_id: String,
    pub solutions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportOutcome {
    pub report: String,
}

#[derive(Debug, Deserialize)]
pub struct HintOutcome {
    pub hint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_generate_content_response() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "{\"hint\": \"Think of moments\"}"}]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 30}
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text().unwrap(), "{\"hint\": \"Think of moments\"}");
        assert_eq!(parsed.usage_metadata.unwrap().prompt_token_count, 120);
    }

    #[test]
    fn test_response_without_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.text().is_none());
    }

    #[test]
    fn test_parses_api_error_envelope() {
        let raw = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        let parsed: ApiErrorEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.error.message, "Quota exceeded");
        assert_eq!(parsed.error.status.as_deref(), Some("RESOURCE_EXHAUSTED"));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: "hello".to_string() }],
            }],
            system_instruction: None,
            generation_config: GenerationConfig {
                temperature: 0.4,
                response_mime_type: "application/json".to_string(),
                response_schema: None,
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("generationConfig"));
        assert!(json.contains("responseMimeType"));
        assert!(!json.contains("systemInstruction"));
    }
}
