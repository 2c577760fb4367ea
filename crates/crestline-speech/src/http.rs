//! HTTP speech provider: Cloud Text-to-Speech synthesis plus a
//! Whisper-style transcription endpoint.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{chunk_by_bytes, SpeechError, SpeechService, SYNTHESIS_BYTE_LIMIT};

const DEFAULT_TTS_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
const DEFAULT_TRANSCRIBE_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Speech provider combining a synthesis endpoint and a transcription
/// endpoint.
pub struct HttpSpeech {
    client: HttpClient,
    tts_api_key: String,
    transcribe_api_key: String,
    tts_url: String,
    transcribe_url: String,
    transcribe_model: String,
}

impl HttpSpeech {
    pub fn new(tts_api_key: String, transcribe_api_key: String) -> Self {
        Self {
            client: HttpClient::new(),
            tts_api_key,
            transcribe_api_key,
            tts_url: DEFAULT_TTS_URL.to_string(),
            transcribe_url: DEFAULT_TRANSCRIBE_URL.to_string(),
            transcribe_model: "whisper-1".to_string(),
        }
    }

    /// Override the synthesis endpoint (tests, proxies).
    pub fn with_tts_url(mut self, url: impl Into<String>) -> Self {
        self.tts_url = url.into();
        self
    }

    /// Override the transcription endpoint (tests, proxies).
    pub fn with_transcribe_url(mut self, url: impl Into<String>) -> Self {
        self.transcribe_url = url.into();
        self
    }

    /// Synthesize one chunk that is already under the byte limit.
    async fn synthesize_chunk(
        &self,
        chunk: &str,
        language_code: &str,
    ) -> Result<Vec<u8>, SpeechError> {
        let request = json!({
            "input": { "text": chunk },
            "voice": { "languageCode": language_code, "ssmlGender": "NEUTRAL" },
            "audioConfig": { "audioEncoding": "MP3" },
        });

        let response = self
            .client
            .post(&self.tts_url)
            .query(&[("key", self.tts_api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SpeechError::Synthesis(format!(
                "synthesis returned HTTP {}",
                response.status()
            )));
        }

        let body: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;

        BASE64
            .decode(body.audio_content.as_bytes())
            .map_err(|e| SpeechError::Synthesis(format!("invalid audio encoding: {}", e)))
    }
}

#[derive(Deserialize)]
struct SynthesizeResponse {
    #[serde(rename = "audioContent")]
    audio_content: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[async_trait]
impl SpeechService for HttpSpeech {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, SpeechError> {
        let chunks = chunk_by_bytes(text, SYNTHESIS_BYTE_LIMIT);
        tracing::debug!(chunks = chunks.len(), language_code, "Synthesizing speech");

        let mut audio = Vec::new();
        for chunk in &chunks {
            let bytes = self.synthesize_chunk(chunk, language_code).await?;
            audio.extend_from_slice(&bytes);
        }
        Ok(audio)
    }

    async fn transcribe(&self, audio: &[u8]) -> Result<String, SpeechError> {
        // Stage the upload in a scoped temp file; NamedTempFile removes it
        // on drop, covering success and every error return below.
        let temp = tempfile::NamedTempFile::new()?;
        tokio::fs::write(temp.path(), audio).await?;
        let staged = tokio::fs::read(temp.path()).await?;

        let part = reqwest::multipart::Part::bytes(staged)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| SpeechError::Transcription(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("model", self.transcribe_model.clone())
            .text("response_format", "json")
            .part("file", part);

        let response = self
            .client
            .post(&self.transcribe_url)
            .bearer_auth(&self.transcribe_api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechError::Transcription(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SpeechError::Transcription(format!(
                "transcription returned HTTP {}",
                response.status()
            )));
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Transcription(e.to_string()))?;

        Ok(body.text)
    }
}
