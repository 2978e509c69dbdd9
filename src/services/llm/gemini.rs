/// Google Gemini client
///
/// Uses the REST `generateContent` endpoint. One request per prompt, no
/// streaming and no retries.
///
/// API Flow:
/// 1. POST /models/{model}:generateContent?key=... with the prompt as a single user turn
/// 2. Concatenate the text parts of the first candidate
use crate::{
    error::{AppError, AppResult},
    services::llm::LlmClient,
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

/// Harm categories relaxed to block only high-probability content. Movie
/// descriptions routinely mention violence and crime.
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
];
const SAFETY_THRESHOLD: &str = "BLOCK_ONLY_HIGH";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    fn build_request(prompt: &str) -> GenerateRequest<'_> {
        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        }
    }

    /// Pulls the answer text out of a decoded response
    fn extract_text(response: GenerateResponse) -> AppResult<String> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(AppError::ExternalApi(format!(
                "Gemini returned no answer: {}",
                reason
            )));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            return Err(AppError::ExternalApi(
                "Gemini returned an empty answer".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::build_request(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(response = %response_text, "Raw Gemini API response");

        let decoded: GenerateResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, "Failed to deserialize Gemini response");
            AppError::ExternalApi(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = Self::extract_text(decoded)?;

        tracing::info!(
            model = %self.model,
            prompt_chars = prompt.len(),
            response_chars = text.len(),
            provider = "gemini",
            "Completion received"
        );

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_serialization() {
        let value = serde_json::to_value(GeminiClient::build_request("How was my day?")).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "How was my day?");

        let settings = value["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        assert!(settings.iter().all(|s| s["threshold"] == "BLOCK_ONLY_HIGH"));
        assert_eq!(settings[1]["category"], "HARM_CATEGORY_HATE_SPEECH");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response = decode(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "{\"mood\": "}, {"text": "[\"calm\"]}"}]},
                    "finishReason": "STOP"
                }]
            }"#,
        );

        let text = GeminiClient::extract_text(response).unwrap();
        assert_eq!(text, r#"{"mood": ["calm"]}"#);
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let response = decode(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);

        let err = GeminiClient::extract_text(response).unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(ref msg) if msg.contains("SAFETY")));
    }

    #[test]
    fn test_extract_text_empty_candidate() {
        let response = decode(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#);
        assert!(GeminiClient::extract_text(response).is_err());
    }
}
