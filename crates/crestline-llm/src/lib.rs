//! Chat-completion collaborator.
//!
//! The pipeline hands the model a fully assembled system prompt plus the
//! filtered conversation turns; the model returns plain text or nothing.
//! `OpenAiChat` speaks the OpenAI-compatible Chat Completions wire
//! format; `ScriptedChat` replays queued replies for tests.

pub mod openai;

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

pub use openai::OpenAiChat;

/// Errors from the chat-completion collaborator.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("completion request failed: {0}")]
    Request(String),
    #[error("unexpected completion response: {0}")]
    Response(String),
}

impl From<LlmError> for crestline_core::CrestlineError {
    fn from(err: LlmError) -> Self {
        crestline_core::CrestlineError::Completion(err.to_string())
    }
}

/// The speaker of a model-visible turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One model-visible conversation turn.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

/// A chat-completion model.
///
/// Returns `Ok(None)` when the provider produced no content; callers
/// decide whether that is an error.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        turns: &[ChatTurn],
    ) -> Result<Option<String>, LlmError>;
}

/// Test double replaying queued replies in order.
///
/// An exhausted queue yields `Ok(None)`, which lets tests exercise the
/// empty-completion path.
#[derive(Default)]
pub struct ScriptedChat {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedChat {
    pub fn new(replies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn complete(
        &self,
        _system: &str,
        _turns: &[ChatTurn],
    ) -> Result<Option<String>, LlmError> {
        Ok(self.replies.lock().await.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_chat_replays_in_order() {
        let model = ScriptedChat::new(["first", "second"]);
        assert_eq!(
            model.complete("sys", &[]).await.unwrap(),
            Some("first".to_string())
        );
        assert_eq!(
            model.complete("sys", &[]).await.unwrap(),
            Some("second".to_string())
        );
    }

    #[tokio::test]
    async fn test_scripted_chat_exhausted_is_none() {
        let model = ScriptedChat::new(Vec::<String>::new());
        assert_eq!(model.complete("sys", &[]).await.unwrap(), None);
    }

    #[test]
    fn test_turn_role_strings() {
        assert_eq!(TurnRole::User.as_str(), "user");
        assert_eq!(TurnRole::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_llm_error_into_core() {
        let err: crestline_core::CrestlineError = LlmError::Request("boom".into()).into();
        assert!(matches!(err, crestline_core::CrestlineError::Completion(_)));
    }
}
