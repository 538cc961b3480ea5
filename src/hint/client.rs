//! `TextGenerator` trait and the HTTP `ApiClient` behind it.
//!
//! `ApiClient` calls any OpenAI-compatible `/v1/chat/completions` endpoint
//! (OpenAI, Groq, Ollama in OpenAI mode, LM Studio, vLLM …) with a single
//! user message and reads the generated text from
//! `choices[0].message.content`.  All connection details come from
//! [`HintConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::HintConfig;

// ---------------------------------------------------------------------------
// HintError
// ---------------------------------------------------------------------------

/// Why a hint request produced no hint.
///
/// The `Display` text is what the view shows in its `hintFailed` message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HintError {
    /// Transport or connection fault, including timeouts.
    #[error("could not reach the hint service: {0}")]
    Network(String),

    /// The service answered with a non-success HTTP status.
    #[error("hint service returned HTTP {0}")]
    Api(u16),

    /// The response was not JSON, or had no text at the expected path.
    #[error("hint service returned a response without generated text")]
    MalformedResponse,

    /// Hint requests are switched off in the settings.
    #[error("hints are disabled in settings")]
    Disabled,
}

impl From<reqwest::Error> for HintError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            HintError::MalformedResponse
        } else if let Some(status) = e.status() {
            HintError::Api(status.as_u16())
        } else {
            HintError::Network(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// TextGenerator trait
// ---------------------------------------------------------------------------

/// Async text-generation collaborator: one prompt in, one generated text out.
///
/// Implementors must be `Send + Sync` so they can be shared with spawned
/// request tasks as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, HintError>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible chat-completions endpoint.
pub struct ApiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
}

impl ApiClient {
    /// Build an `ApiClient` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`; a default client is used if the builder fails.
    /// The credential is resolved once, here.
    pub fn from_config(config: &HintConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            log::info!(
                "hint: no API key configured (checked settings and ${}), sending unauthenticated requests",
                config.api_key_env
            );
        }

        Self {
            client,
            endpoint: format!(
                "{}/v1/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for ApiClient {
    /// Send `prompt` as a single user message.
    ///
    /// The `Authorization: Bearer …` header is attached only when a
    /// non-empty key was resolved.
    async fn generate(&self, prompt: &str) -> Result<String, HintError> {
        let body = serde_json::json!({
            "model":       self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "stream":      false,
            "temperature": self.temperature
        });

        let mut req = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = self.api_key.as_deref() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("hint: {} answered {}", self.endpoint, status);
            return Err(HintError::Api(status.as_u16()));
        }

        // reqwest reports every body read failure as a decode error, even a
        // reset or timeout mid-body.  JSON is parsed separately below, so
        // anything failing here is a transport fault.
        let body = response
            .text()
            .await
            .map_err(|e| HintError::Network(e.to_string()))?;
        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|_| HintError::MalformedResponse)?;

        extract_text(&json)
            .map(|text| text.trim().to_string())
            .ok_or(HintError::MalformedResponse)
    }
}

/// Generated text at `choices[0].message.content`, if present and a string.
pub fn extract_text(response: &serde_json::Value) -> Option<&str> {
    response["choices"][0]["message"]["content"].as_str()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_config(base_url: &str, api_key: Option<&str>) -> HintConfig {
        HintConfig {
            base_url: base_url.into(),
            api_key: api_key.map(|s| s.to_string()),
            api_key_env: "CODE_TIMER_TEST_KEY_DEFINITELY_UNSET".into(),
            ..HintConfig::default()
        }
    }

    #[test]
    fn endpoint_joins_base_url() {
        let client = ApiClient::from_config(&make_config("http://localhost:11434/", None));
        assert_eq!(client.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn empty_api_key_is_not_sent() {
        let client = ApiClient::from_config(&make_config("http://localhost", Some("")));
        assert!(client.api_key.is_none());
    }

    #[test]
    fn real_api_key_is_kept() {
        let client = ApiClient::from_config(&make_config("http://localhost", Some("sk-test")));
        assert_eq!(client.api_key.as_deref(), Some("sk-test"));
    }

    /// `ApiClient` must be usable as `dyn TextGenerator`.
    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn TextGenerator> =
            Box::new(ApiClient::from_config(&make_config("http://localhost", None)));
        drop(client);
    }

    #[test]
    fn extract_text_reads_first_choice() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "hi"}}]});
        assert_eq!(extract_text(&body), Some("hi"));
    }

    #[test]
    fn extract_text_rejects_other_shapes() {
        assert_eq!(extract_text(&json!({})), None);
        assert_eq!(extract_text(&json!({"choices": []})), None);
        assert_eq!(extract_text(&json!({"choices": [{"text": "legacy"}]})), None);
        assert_eq!(
            extract_text(&json!({"choices": [{"message": {"content": 42}}]})),
            None
        );
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(HintError::Api(503).to_string(), "hint service returned HTTP 503");
        assert!(HintError::Network("refused".into())
            .to_string()
            .contains("refused"));
    }
}
