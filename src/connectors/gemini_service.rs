use super::config::GeminiSettings;
use super::errors::ConnectorError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// A hosted language model that turns one prompt into free text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ConnectorError>;
}

pub struct GeminiClient {
    base_url: String,
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    user_agent: String,
}

impl GeminiClient {
    pub fn new(config: GeminiSettings) -> Result<Self, ConnectorError> {
        let api_key = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConnectorError::Unauthorized("GEMINI_API_KEY is not set".to_string()))?;

        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ConnectorError::Network(format!("HTTP client error: {}", err)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            api_key,
            model: config.model,
            user_agent: format!("poldo-gemini-client/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ]
        })
    }

    fn map_http_error(status: StatusCode, text: String) -> ConnectorError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ConnectorError::Unauthorized(text),
            StatusCode::TOO_MANY_REQUESTS => ConnectorError::RateLimited(text),
            status if status.is_server_error() => {
                ConnectorError::ServiceUnavailable(format!("Gemini error {}: {}", status, text))
            }
            status => ConnectorError::Http(format!("Gemini error {}: {}", status, text)),
        }
    }

    /// Joins the text parts of the first candidate.
    fn parse_reply(payload: &Value) -> Result<String, ConnectorError> {
        let candidate = payload
            .get("candidates")
            .and_then(Value::as_array)
            .and_then(|candidates| candidates.first())
            .ok_or_else(|| ConnectorError::InvalidResponse("no candidates in response".to_string()))?;

        let text: String = candidate
            .pointer("/content/parts")
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            let reason = candidate
                .get("finishReason")
                .and_then(Value::as_str)
                .unwrap_or("empty answer");
            return Err(ConnectorError::InvalidResponse(format!(
                "candidate without text ({})",
                reason
            )));
        }

        Ok(text.to_string())
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ConnectorError> {
        let span = tracing::info_span!("gemini_generate_content", model = %self.model);

        let response = self
            .http_client
            .post(self.endpoint_url())
            .query(&[("key", self.api_key.as_str())])
            .header("User-Agent", &self.user_agent)
            .json(&Self::request_body(prompt))
            .send()
            .instrument(span)
            .await?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ConnectorError::Network(err.to_string()))?;

        if !status.is_success() {
            return Err(Self::map_http_error(status, text));
        }

        let payload = serde_json::from_str::<Value>(&text)
            .map_err(|_| ConnectorError::InvalidResponse(text))?;
        Self::parse_reply(&payload)
    }
}

/// Initialize the model connector from app settings
pub fn init(config: &GeminiSettings) -> Arc<dyn GenerativeModel> {
    if !config.enabled {
        tracing::warn!("Gemini connector disabled - every question gets the fallback reply");
        return Arc::new(mock::UnconfiguredModel);
    }

    match GeminiClient::new(config.clone()) {
        Ok(client) => {
            tracing::info!("Gemini connector initialized ({}, {})", config.base_url, client.model());
            Arc::new(client)
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to initialize Gemini connector");
            Arc::new(mock::UnconfiguredModel)
        }
    }
}

pub mod mock {
    use super::*;
    use tokio::sync::Mutex;

    /// Stands in when no API key is configured.
    pub struct UnconfiguredModel;

    #[async_trait]
    impl GenerativeModel for UnconfiguredModel {
        async fn generate(&self, _prompt: &str) -> Result<String, ConnectorError> {
            Err(ConnectorError::Unauthorized(
                "Gemini connector is not configured".to_string(),
            ))
        }
    }

    /// Scripted model that remembers every prompt it was given.
    pub struct MockGenerativeModel {
        outcome: Result<String, ConnectorError>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockGenerativeModel {
        pub fn replying(reply: impl Into<String>) -> Self {
            Self {
                outcome: Ok(reply.into()),
                prompts: Mutex::new(vec![]),
            }
        }

        pub fn failing(error: ConnectorError) -> Self {
            Self {
                outcome: Err(error),
                prompts: Mutex::new(vec![]),
            }
        }

        pub async fn prompts(&self) -> Vec<String> {
            self.prompts.lock().await.clone()
        }
    }

    #[async_trait]
    impl GenerativeModel for MockGenerativeModel {
        async fn generate(&self, prompt: &str) -> Result<String, ConnectorError> {
            self.prompts.lock().await.push(prompt.to_string());
            self.outcome.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_are_classified() {
        assert_eq!(
            GeminiClient::map_http_error(StatusCode::UNAUTHORIZED, "bad key".into()),
            ConnectorError::Unauthorized("bad key".into())
        );
        assert_eq!(
            GeminiClient::map_http_error(StatusCode::FORBIDDEN, "denied".into()),
            ConnectorError::Unauthorized("denied".into())
        );
        assert_eq!(
            GeminiClient::map_http_error(StatusCode::TOO_MANY_REQUESTS, "quota".into()),
            ConnectorError::RateLimited("quota".into())
        );
        assert!(matches!(
            GeminiClient::map_http_error(StatusCode::BAD_GATEWAY, "".into()),
            ConnectorError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            GeminiClient::map_http_error(StatusCode::BAD_REQUEST, "".into()),
            ConnectorError::Http(_)
        ));
    }

    #[test]
    fn reply_joins_text_parts_of_first_candidate() {
        let payload = json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "🔍 homelab-dev "}, {"text": "- CPU: 45%\n"}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ]
        });
        assert_eq!(
            GeminiClient::parse_reply(&payload).unwrap(),
            "🔍 homelab-dev - CPU: 45%"
        );
    }

    #[test]
    fn reply_without_candidates_is_invalid() {
        assert!(matches!(
            GeminiClient::parse_reply(&json!({"candidates": []})),
            Err(ConnectorError::InvalidResponse(_))
        ));
        assert!(matches!(
            GeminiClient::parse_reply(&json!({
                "candidates": [{"finishReason": "SAFETY"}]
            })),
            Err(ConnectorError::InvalidResponse(msg)) if msg.contains("SAFETY")
        ));
    }

    #[test]
    fn client_requires_api_key() {
        let settings = GeminiSettings::default();
        assert!(matches!(
            GeminiClient::new(settings),
            Err(ConnectorError::Unauthorized(_))
        ));
    }

    #[test]
    fn request_body_wraps_prompt_in_one_user_part() {
        let body = GeminiClient::request_body("olá");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "olá");
    }

    #[tokio::test]
    async fn mock_model_records_prompts() {
        let model = mock::MockGenerativeModel::replying("ok");
        assert_eq!(model.generate("first").await.unwrap(), "ok");
        assert_eq!(model.prompts().await, vec!["first".to_string()]);
    }
}
