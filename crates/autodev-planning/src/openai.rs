//! OpenAI-compatible chat completions client

use crate::settings::ModelSettings;
use async_trait::async_trait;
use autodev_core::{CompletionRequest, Message, ModelClient, ModelError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat client for `POST {base_url}/chat/completions`
///
/// A single request per call; retries and deadlines belong to the caller.
#[derive(Debug, Clone)]
pub struct OpenAiChatClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiChatClient {
    /// Create client for `base_url` and `model`
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
        })
    }

    /// Create client from settings; `None` when no usable key is configured
    pub fn from_settings(settings: &ModelSettings) -> Result<Option<Self>, ModelError> {
        let Some(key) = settings.api_key() else {
            return Ok(None);
        };

        Self::new(
            &settings.base_url,
            &settings.model,
            Duration::from_secs(settings.timeout_secs),
        )
        .map(|client| Some(client.with_api_key(key)))
    }

    /// With bearer key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Model name sent with each request
    #[inline]
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ModelClient for OpenAiChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        tracing::debug!(model = %self.model, "Sending chat completion request");
        let response = builder
            .send()
            .await
            .map_err(|e| ModelError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ModelError::transport(format!(
                "chat completion returned {status}: {text}"
            )));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::transport(format!("unreadable completion body: {e}")))?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ModelError::transport("completion contained no choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodev_core::MessageRole;

    #[test]
    fn no_key_means_no_client() {
        let settings = ModelSettings::default();
        assert!(OpenAiChatClient::from_settings(&settings).unwrap().is_none());
    }

    #[test]
    fn keyed_settings_build_client() {
        let settings = ModelSettings {
            base_url: "http://localhost:1234/v1/".into(),
            api_key: Some("sk-test".into()),
            ..ModelSettings::default()
        };

        let client = OpenAiChatClient::from_settings(&settings).unwrap().unwrap();
        assert_eq!(client.model(), "gpt-4-turbo-preview");
        assert_eq!(client.endpoint(), "http://localhost:1234/v1/chat/completions");
    }

    #[test]
    fn request_body_matches_chat_format() {
        let messages = vec![Message::system("sys"), Message::user("hi")];
        let body = ChatRequest {
            model: "gpt-4-turbo-preview",
            messages: &messages,
            temperature: 0.5,
            max_tokens: 4096,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["max_tokens"], 4096);
        assert_eq!(messages[0].role, MessageRole::System);
    }

    #[test]
    fn reply_without_choices_decodes_empty() {
        let reply: ChatResponse = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(reply.choices.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let client = OpenAiChatClient::new("http://127.0.0.1:9", "m", Duration::from_secs(2))
            .unwrap()
            .with_api_key("sk-test");
        let request = CompletionRequest {
            messages: vec![Message::user("hi")],
            temperature: 0.2,
            max_tokens: 16,
        };

        let err = client.complete(&request).await.unwrap_err();
        assert_eq!(err.kind(), autodev_core::ModelFailureKind::Transport);
    }
}
