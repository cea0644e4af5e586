//! Advisory client
//!
//! Wraps one model call per request. Failures never propagate to the caller:
//! they are classified and turned into a user-facing message, and the caller
//! renders whatever text comes back. Each call is attempted exactly once.

pub mod format;
pub mod prompt;

pub use prompt::{build_advisory_prompt, build_macro_prompt, AdvisoryRequest, MacroScenario};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::error::AdvisorError;
use crate::gemini::ModelClient;

pub const RATE_LIMITED_MESSAGE: &str =
    "⚠️ Hệ thống AI đang quá tải (lỗi 429). Vui lòng thử lại sau ít phút.";

const REDACTED_DETAIL: &str = "chi tiết lỗi đã được ẩn, xem log máy chủ";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryErrorKind {
    RateLimited,
    ModelUnavailable,
    ConnectionFailure,
}

impl AdvisoryErrorKind {
    /// Classify from the error's display text alone. "429" is checked
    /// before "404".
    pub fn from_message(message: &str) -> Self {
        if message.contains("429") {
            AdvisoryErrorKind::RateLimited
        } else if message.contains("404") {
            AdvisoryErrorKind::ModelUnavailable
        } else {
            AdvisoryErrorKind::ConnectionFailure
        }
    }

    /// Classify using the HTTP status when there is one, the text otherwise.
    /// Same precedence as [`AdvisoryErrorKind::from_message`].
    pub fn from_error(error: &AdvisorError) -> Self {
        let status = error.status();
        let text = error.to_string();

        if status == Some(429) || text.contains("429") {
            AdvisoryErrorKind::RateLimited
        } else if status == Some(404) || text.contains("404") {
            AdvisoryErrorKind::ModelUnavailable
        } else {
            AdvisoryErrorKind::ConnectionFailure
        }
    }
}

/// How a failed call is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Three-way: rate limited, model unavailable, generic.
    Classified,
    /// Every failure gets the generic connection message.
    Generic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdvisoryResponse {
    Answer { text: String },
    Failed { kind: AdvisoryErrorKind, message: String },
}

impl AdvisoryResponse {
    /// What the desk view shows, success or not.
    pub fn text(&self) -> &str {
        match self {
            AdvisoryResponse::Answer { text } => text,
            AdvisoryResponse::Failed { message, .. } => message,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            AdvisoryResponse::Answer { text } => text,
            AdvisoryResponse::Failed { message, .. } => message,
        }
    }

    pub fn error_kind(&self) -> Option<AdvisoryErrorKind> {
        match self {
            AdvisoryResponse::Answer { .. } => None,
            AdvisoryResponse::Failed { kind, .. } => Some(*kind),
        }
    }
}

pub fn model_unavailable_message(model: &str) -> String {
    format!("⚠️ Tài khoản của bạn không hỗ trợ model {} (lỗi 404).", model)
}

pub fn connection_failure_message(detail: &str) -> String {
    format!("⚠️ Lỗi kết nối AI: {}", detail)
}

/// Stateless wrapper around a [`ModelClient`].
#[derive(Clone)]
pub struct Advisor {
    client: Arc<dyn ModelClient>,
    redact_errors: bool,
}

impl Advisor {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            redact_errors: false,
        }
    }

    /// Hide raw upstream error text from users.
    pub fn with_redacted_errors(mut self, redact: bool) -> Self {
        self.redact_errors = redact;
        self
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// General desk advisor: role, situation, task.
    pub async fn ask_advisor(&self, role: &str, context_data: &str, task: &str) -> AdvisoryResponse {
        let request = AdvisoryRequest::new(role, context_data, task);
        self.ask_request(&request).await
    }

    pub async fn ask_request(&self, request: &AdvisoryRequest) -> AdvisoryResponse {
        self.ask(&build_advisory_prompt(request), ErrorPolicy::Classified)
            .await
    }

    /// Government macro advisor for an exchange-rate shock.
    pub async fn ask_macro_advisor(&self, scenario: &MacroScenario) -> AdvisoryResponse {
        self.ask(&build_macro_prompt(scenario), ErrorPolicy::Generic)
            .await
    }

    /// One model call; failures become messages according to `policy`.
    pub async fn ask(&self, prompt: &str, policy: ErrorPolicy) -> AdvisoryResponse {
        match self.client.generate(prompt).await {
            Ok(text) => AdvisoryResponse::Answer { text },
            Err(e) => {
                let kind = match policy {
                    ErrorPolicy::Classified => AdvisoryErrorKind::from_error(&e),
                    ErrorPolicy::Generic => AdvisoryErrorKind::ConnectionFailure,
                };
                warn!(?kind, model = %self.client.model(), "Advisory call failed: {}", e);

                AdvisoryResponse::Failed {
                    kind,
                    message: self.failure_message(kind, &e),
                }
            }
        }
    }

    fn failure_message(&self, kind: AdvisoryErrorKind, error: &AdvisorError) -> String {
        match kind {
            AdvisoryErrorKind::RateLimited => RATE_LIMITED_MESSAGE.to_string(),
            AdvisoryErrorKind::ModelUnavailable => model_unavailable_message(self.client.model()),
            AdvisoryErrorKind::ConnectionFailure if self.redact_errors => {
                connection_failure_message(REDACTED_DETAIL)
            }
            AdvisoryErrorKind::ConnectionFailure => connection_failure_message(&error.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a canned reply or error and remembers every prompt.
    pub struct StubModel {
        reply: Mutex<Option<AdvisorError>>,
        text: String,
        pub prompts: Mutex<Vec<String>>,
    }

    impl StubModel {
        pub fn answering(text: &str) -> Self {
            Self {
                reply: Mutex::new(None),
                text: text.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Fails on the first call, answers "OK" after that.
        pub fn failing(error: AdvisorError) -> Self {
            Self {
                reply: Mutex::new(Some(error)),
                text: "OK".to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ModelClient for StubModel {
        fn model(&self) -> &str {
            "gemini-2.0-flash"
        }

        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.reply.lock().unwrap().take() {
                Some(e) => Err(e),
                None => Ok(self.text.clone()),
            }
        }
    }
}
