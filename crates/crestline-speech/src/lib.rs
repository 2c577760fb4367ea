//! Speech synthesis and transcription collaborator.
//!
//! Synthesis providers cap the payload size per request, so outbound text
//! is split into chunks under the byte limit and the binary results are
//! concatenated. Inbound audio is staged in a scoped temporary file that
//! is removed on every exit path.

pub mod http;

use async_trait::async_trait;

pub use http::HttpSpeech;

/// Maximum bytes of text accepted per synthesis request.
pub const SYNTHESIS_BYTE_LIMIT: usize = 5000;

/// Errors from the speech collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("synthesis failed: {0}")]
    Synthesis(String),
    #[error("transcription failed: {0}")]
    Transcription(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SpeechError> for crestline_core::CrestlineError {
    fn from(err: SpeechError) -> Self {
        crestline_core::CrestlineError::Speech(err.to_string())
    }
}

/// Text-to-speech and speech-to-text.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Synthesize `text` into audio bytes for a BCP-47 language code.
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, SpeechError>;

    /// Transcribe audio bytes into text.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, SpeechError>;
}

/// Offline implementation: synthesizes silence, transcribes nothing.
#[derive(Default)]
pub struct SilentSpeech;

impl SilentSpeech {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SpeechService for SilentSpeech {
    async fn synthesize(&self, _text: &str, _language_code: &str) -> Result<Vec<u8>, SpeechError> {
        Ok(Vec::new())
    }

    async fn transcribe(&self, _audio: &[u8]) -> Result<String, SpeechError> {
        Ok(String::new())
    }
}

/// Map an ISO-639-1 language code to the synthesis voice language.
pub fn tts_language_code(lang: &str) -> &'static str {
    match lang {
        "ar" => "ar-XA",
        "fr" => "fr-FR",
        "de" => "de-DE",
        "zh" => "cmn-CN",
        _ => "en-US",
    }
}

/// Split text into whitespace-separated chunks, each under `max_bytes`
/// when UTF-8 encoded.
///
/// A single word longer than the limit becomes its own chunk; the
/// provider rejects it rather than this function splitting mid-word.
pub fn chunk_by_bytes(text: &str, max_bytes: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() >= max_bytes {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

// =============================================================================
// Tests
// =============================================================================
