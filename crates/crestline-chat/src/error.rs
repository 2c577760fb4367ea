//! Error types for the chat pipeline.

use crestline_lang::LangError;
use crestline_llm::LlmError;
use crestline_speech::SpeechError;
use crestline_store::StoreError;

/// Errors from the chat pipeline.
///
/// Validation and policy variants are caller mistakes; upstream variants
/// wrap collaborator failures, which abort the request without retry.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("message contains a forbidden keyword")]
    ForbiddenKeyword,
    #[error("audio produced an empty transcription")]
    EmptyTranscription,
    #[error("model returned no content")]
    EmptyCompletion,
    #[error("store error: {0}")]
    Store(String),
    #[error("translation error: {0}")]
    Translation(String),
    #[error("completion error: {0}")]
    Completion(String),
    #[error("speech error: {0}")]
    Speech(String),
}

impl ChatError {
    /// Whether this is a bad-input failure (HTTP 400 class).
    pub fn is_validation(&self) -> bool {
        matches!(self, ChatError::EmptyMessage | ChatError::MessageTooLong(_))
    }

    /// Whether this is a policy rejection (HTTP 422 class).
    pub fn is_policy(&self) -> bool {
        matches!(self, ChatError::ForbiddenKeyword)
    }
}

impl From<StoreError> for ChatError {
    fn from(err: StoreError) -> Self {
        ChatError::Store(err.to_string())
    }
}

impl From<LangError> for ChatError {
    fn from(err: LangError) -> Self {
        ChatError::Translation(err.to_string())
    }
}

impl From<LlmError> for ChatError {
    fn from(err: LlmError) -> Self {
        ChatError::Completion(err.to_string())
    }
}

impl From<SpeechError> for ChatError {
    fn from(err: SpeechError) -> Self {
        ChatError::Speech(err.to_string())
    }
}

impl From<ChatError> for crestline_core::CrestlineError {
    fn from(err: ChatError) -> Self {
        crestline_core::CrestlineError::Chat(err.to_string())
    }
}
