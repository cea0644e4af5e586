//! Gemini API client
//!
//! Single-turn, non-streaming text generation. The persona is part of the
//! user prompt; no system instruction is sent.
//! Uses a long-lived reqwest::Client for connection pooling.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::config::{ApiKey, AppConfig};
use crate::error::AdvisorError;
use crate::Result;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// The model-invocation primitive behind every advisory call.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Model identifier, as shown to users in error messages.
    fn model(&self) -> &str;

    /// Send one prompt, get the raw text back.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: Option<ApiKey>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<ApiKey>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config.api_key.clone(), config.model.clone(), config.request_timeout)
    }

    /// Point at a different host, e.g. a local proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or(AdvisorError::MissingCredential)?;

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        info!(model = %self.model, prompt_len = prompt.len(), "Calling Gemini API");

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("Gemini API request failed: {}", e);
                AdvisorError::HttpError(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response ({}): {}", status, error_text);
            return Err(AdvisorError::Upstream {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::HttpError(e.without_url()))?;

        let answer = extract_text(&gemini_response).ok_or(AdvisorError::EmptyResponse)?;

        info!(
            finish_reason = ?gemini_response.candidates.first().and_then(|c| c.finish_reason.as_deref()),
            "Gemini response received"
        );

        Ok(answer)
    }
}

/// Concatenated text parts of the first candidate.
fn extract_text(response: &GeminiResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    let content = candidate.content.as_ref()?;

    if content.parts.is_empty() {
        return None;
    }

    Some(
        content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .concat(),
    )
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "Tỷ giá USD/VND hôm nay?".to_string(),
                }],
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Tỷ giá USD/VND hôm nay?");
        assert!(json.get("system_instruction").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts_verbatim() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "**Rủi ro** cao. " }, { "text": "Nên phòng ngừa." }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert_eq!(extract_text(&response).unwrap(), "**Rủi ro** cao. Nên phòng ngừa.");
        assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_extract_text_empty() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert!(extract_text(&response).is_none());

        let response: GeminiResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(extract_text(&response).is_none());
    }

    #[test]
    fn test_endpoint_uses_model() {
        let client = GeminiClient::new(None, "gemini-2.0-flash", Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://localhost:9999/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_missing_key_fails_at_call_time() {
        let client = GeminiClient::new(None, "gemini-2.0-flash", Duration::from_secs(5)).unwrap();
        let result = tokio_test::block_on(client.generate("hello"));
        assert!(matches!(result, Err(AdvisorError::MissingCredential)));
    }

    const TEST_KEY: &str = "SUPERSECRETKEY";

    /// Local Gemini stand-in. The first path segment picks the reply.
    async fn spawn_stub_server() -> String {
        use axum::http::{HeaderMap, StatusCode, Uri};

        async fn respond(uri: Uri, headers: HeaderMap) -> (StatusCode, String) {
            let key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
            if uri.query().is_some() || key != Some(TEST_KEY) {
                return (StatusCode::UNAUTHORIZED, "API key not valid".to_string());
            }

            let scenario = uri
                .path()
                .trim_start_matches('/')
                .split('/')
                .next()
                .unwrap_or_default()
                .to_string();

            match scenario.as_str() {
                "ok" => (
                    StatusCode::OK,
                    serde_json::json!({
                        "candidates": [{
                            "content": { "parts": [{ "text": "**Rủi ro** tỷ giá cao.\nNên phòng ngừa." }] },
                            "finishReason": "STOP"
                        }]
                    })
                    .to_string(),
                ),
                "busy" => (StatusCode::TOO_MANY_REQUESTS, "RESOURCE_EXHAUSTED".to_string()),
                "missing" => (StatusCode::NOT_FOUND, "model is not found".to_string()),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal".to_string()),
            }
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, axum::Router::new().fallback(respond))
                .await
                .unwrap();
        });

        format!("http://{}", addr)
    }

    fn advisor_at(base_url: &str, key: &str) -> crate::advisor::Advisor {
        let client = GeminiClient::new(ApiKey::new(key), "gemini-2.0-flash", Duration::from_secs(5))
            .unwrap()
            .with_base_url(base_url);
        crate::advisor::Advisor::new(std::sync::Arc::new(client))
    }

    #[tokio::test]
    async fn test_http_statuses_classify_through_advisor() {
        use crate::advisor::{AdvisoryErrorKind, RATE_LIMITED_MESSAGE};

        let server = spawn_stub_server().await;

        let response = advisor_at(&format!("{}/ok", server), TEST_KEY)
            .ask_advisor("r", "c", "t")
            .await;
        assert_eq!(response.error_kind(), None);
        assert_eq!(response.text(), "**Rủi ro** tỷ giá cao.\nNên phòng ngừa.");

        let response = advisor_at(&format!("{}/busy", server), TEST_KEY)
            .ask_advisor("r", "c", "t")
            .await;
        assert_eq!(response.error_kind(), Some(AdvisoryErrorKind::RateLimited));
        assert_eq!(response.text(), RATE_LIMITED_MESSAGE);

        let response = advisor_at(&format!("{}/missing", server), TEST_KEY)
            .ask_advisor("r", "c", "t")
            .await;
        assert_eq!(response.error_kind(), Some(AdvisoryErrorKind::ModelUnavailable));

        let response = advisor_at(&format!("{}/broken", server), TEST_KEY)
            .ask_advisor("r", "c", "t")
            .await;
        assert_eq!(response.error_kind(), Some(AdvisoryErrorKind::ConnectionFailure));
        assert!(response.text().contains("internal"));

        let response = advisor_at(&format!("{}/ok", server), "wrong-key")
            .ask_advisor("r", "c", "t")
            .await;
        assert_eq!(response.error_kind(), Some(AdvisoryErrorKind::ConnectionFailure));
        assert!(response.text().contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_upstream_status_is_structured() {
        let server = spawn_stub_server().await;
        let client = GeminiClient::new(ApiKey::new(TEST_KEY), "gemini-2.0-flash", Duration::from_secs(5))
            .unwrap()
            .with_base_url(format!("{}/busy", server));

        let error = client.generate("hello").await.unwrap_err();
        assert_eq!(error.status(), Some(429));
        assert!(matches!(error, AdvisorError::Upstream { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_connection_error_never_contains_key() {
        let client = GeminiClient::new(ApiKey::new(TEST_KEY), "gemini-2.0-flash", Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://127.0.0.1:1");

        let error = client.generate("hello").await.unwrap_err();
        assert!(matches!(error, AdvisorError::HttpError(_)));
        assert!(!error.to_string().contains(TEST_KEY));
        assert!(!format!("{:?}", error).contains(TEST_KEY));
        assert!(!client.endpoint().contains(TEST_KEY));
    }
}
