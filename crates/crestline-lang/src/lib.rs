//! Language detection and translation collaborator.
//!
//! All classification and intent logic in the chat pipeline runs on
//! pivot-language (English) text; this crate is the seam that detects a
//! message's language and translates text in and out of the pivot.

pub mod http;

use async_trait::async_trait;

pub use http::HttpTranslator;

/// The ISO-639-1 code of the pivot language.
pub const PIVOT_LANG: &str = "en";

/// Errors from the translation collaborator.
#[derive(Debug, thiserror::Error)]
pub enum LangError {
    #[error("translation request failed: {0}")]
    Request(String),
    #[error("unexpected translation response: {0}")]
    Response(String),
}

impl From<LangError> for crestline_core::CrestlineError {
    fn from(err: LangError) -> Self {
        crestline_core::CrestlineError::Translation(err.to_string())
    }
}

/// Language detection and translation.
#[async_trait]
pub trait LanguageService: Send + Sync {
    /// Detect the ISO-639-1 language code of `text`, if recognizable.
    async fn detect(&self, text: &str) -> Result<Option<String>, LangError>;

    /// Translate `text` into the `target` language.
    async fn translate(&self, text: &str, target: &str) -> Result<String, LangError>;
}

/// Offline implementation: detects nothing and returns text unchanged.
///
/// With this service the pipeline treats every message as already being
/// in the pivot language, which is the correct degraded behavior when no
/// translation provider is configured.
#[derive(Default)]
pub struct EchoTranslator;

impl EchoTranslator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LanguageService for EchoTranslator {
    async fn detect(&self, _text: &str) -> Result<Option<String>, LangError> {
        Ok(None)
    }

    async fn translate(&self, text: &str, _target: &str) -> Result<String, LangError> {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_detect_is_none() {
        let svc = EchoTranslator::new();
        assert_eq!(svc.detect("hello there").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_echo_translate_identity() {
        let svc = EchoTranslator::new();
        assert_eq!(
            svc.translate("list projects", "ar").await.unwrap(),
            "list projects"
        );
    }

    #[test]
    fn test_lang_error_display() {
        let err = LangError::Request("timeout".into());
        assert_eq!(err.to_string(), "translation request failed: timeout");

        let err = LangError::Response("missing field".into());
        assert_eq!(
            err.to_string(),
            "unexpected translation response: missing field"
        );
    }

    #[test]
    fn test_lang_error_into_core() {
        let err: crestline_core::CrestlineError = LangError::Request("boom".into()).into();
        assert!(matches!(
            err,
            crestline_core::CrestlineError::Translation(_)
        ));
    }
}
