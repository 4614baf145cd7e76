use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{GenerationRequest, GenerativeModel};
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
const API_VERSION_PATH: &str = "/v1beta/models";

/// Upper bound for a single HTTP exchange. Callers race every call against
/// their own, usually shorter, timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    system_instruction: ApiContent<'a>,
    contents: Vec<ApiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct ApiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<ApiPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ApiPart<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: ApiBlob<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiBlob<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// HTTP client for the Gemini `generateContent` endpoint.
///
/// Configuration comes from the environment:
///
/// | Variable          | Default                                       |
/// |-------------------|-----------------------------------------------|
/// | `GEMINI_API_KEY`  | none, required                                |
/// | `GEMINI_MODEL`    | `gemini-2.0-flash-exp`                        |
/// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com`   |
///
/// Images attached to a request are sent inline as base64.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Full endpoint URL (base + version path + model + method).
    url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        let model: String = model.into();
        let url = format!(
            "{}{API_VERSION_PATH}/{model}:generateContent",
            base.trim_end_matches('/')
        );
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model,
            url,
        }
    }

    /// Returns `None` when `GEMINI_API_KEY` is unset or blank.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Some(Self::new(key, model, base))
    }

    fn response_text(response: ApiResponse) -> Result<String, DomainError> {
        let candidate = response.candidates.into_iter().next().ok_or_else(|| {
            DomainError::upstream("Gemini returned no candidates (the prompt may have been blocked)")
        })?;

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        Ok(text)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, DomainError> {
        let mut parts = vec![ApiPart::Text {
            text: &request.prompt,
        }];
        if let Some(image) = &request.image {
            parts.push(ApiPart::InlineData {
                inline_data: ApiBlob {
                    mime_type: &image.mime_type,
                    data: base64::engine::general_purpose::STANDARD.encode(&image.bytes),
                },
            });
        }

        let body = ApiRequest {
            system_instruction: ApiContent {
                role: None,
                parts: vec![ApiPart::Text {
                    text: &request.system,
                }],
            },
            contents: vec![ApiContent {
                role: Some("user"),
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: request.sampling.temperature,
                top_p: request.sampling.top_p,
                top_k: request.sampling.top_k,
                max_output_tokens: request.sampling.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::upstream(format!("Generation failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("GeminiClient: API returned {status}: {body}");
            return Err(DomainError::upstream(format!(
                "Generation failed: API returned {status}"
            )));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::upstream(format!("Generation failed: unreadable response: {e}"))
        })?;

        let text = Self::response_text(api_response)?;
        debug!("GeminiClient raw response: {text}");
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_includes_model() {
        let client = GeminiClient::new("k", "gemini-test", "http://localhost:9/");
        assert_eq!(
            client.url,
            "http://localhost:9/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let response: ApiResponse = serde_json::from_str(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "heavy figure "}, {"text": "solitude"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            GeminiClient::response_text(response).unwrap(),
            "heavy figure solitude"
        );
    }

    #[test]
    fn response_without_candidates_is_upstream_error() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();

        assert!(GeminiClient::response_text(response)
            .unwrap_err()
            .is_upstream());
    }

    #[test]
    fn request_serializes_in_api_shape() {
        let body = ApiRequest {
            system_instruction: ApiContent {
                role: None,
                parts: vec![ApiPart::Text { text: "sys" }],
            },
            contents: vec![ApiContent {
                role: Some("user"),
                parts: vec![
                    ApiPart::Text { text: "hi" },
                    ApiPart::InlineData {
                        inline_data: ApiBlob {
                            mime_type: "image/png",
                            data: "AAAA".to_string(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: 100,
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 100);
        assert_eq!(json["generationConfig"]["topK"], 40);
    }
}
