//! OpenAI-compatible Chat Completions provider.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{ChatModel, ChatTurn, LlmError};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Chat-completion provider using the Chat Completions API.
pub struct OpenAiChat {
    client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiChat {
    pub fn new(api_key: String, model: String, temperature: f32, max_tokens: u32) -> Self {
        Self {
            client: HttpClient::new(),
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            model,
            temperature,
            max_tokens,
        }
    }

    /// Override the endpoint URL (tests, gateways).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Build the wire message list: system, then history, nothing else.
    ///
    /// The caller has already appended the current user message as the
    /// final turn.
    fn build_messages(system: &str, turns: &[ChatTurn]) -> Vec<WireMessage> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(WireMessage {
            role: "system".into(),
            content: system.to_string(),
        });
        for turn in turns {
            messages.push(WireMessage {
                role: turn.role.as_str().into(),
                content: turn.content.clone(),
            });
        }
        messages
    }
}

// Wire types.

#[derive(Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(
        &self,
        system: &str,
        turns: &[ChatTurn],
    ) -> Result<Option<String>, LlmError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: Self::build_messages(system, turns),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LlmError::Request(format!(
                "completion returned HTTP {}",
                response.status()
            )));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Response(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        tracing::debug!(has_content = content.is_some(), "Completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TurnRole;

    #[test]
    fn test_build_messages_system_first() {
        let turns = vec![
            ChatTurn {
                role: TurnRole::User,
                content: "list projects".into(),
            },
            ChatTurn {
                role: TurnRole::Assistant,
                content: "Here they are.".into(),
            },
        ];
        let messages = OpenAiChat::build_messages("you are a concierge", &turns);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[2].role, "assistant");
    }

    #[test]
    fn test_completion_response_parses() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hello."}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Hello.")
        );
    }

    #[test]
    fn test_completion_response_null_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[test]
    fn test_request_serializes_caps() {
        let request = CompletionRequest {
            model: "gpt-4".into(),
            messages: vec![],
            temperature: 0.5,
            max_tokens: 800,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["max_tokens"], 800);
        assert_eq!(json["model"], "gpt-4");
    }
}
