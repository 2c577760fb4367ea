//! HTTP translation provider (Google Cloud Translation v2 wire format).

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{LangError, LanguageService};

const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Translation provider speaking the Cloud Translation v2 REST API.
pub struct HttpTranslator {
    client: HttpClient,
    api_key: String,
    base_url: String,
}

impl HttpTranslator {
    pub fn new(api_key: String) -> Self {
        Self {
            client: HttpClient::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the endpoint base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// Wire types. The v2 API nests payloads under `data`.

#[derive(Deserialize)]
struct DetectEnvelope {
    data: DetectData,
}

#[derive(Deserialize)]
struct DetectData {
    detections: Vec<Vec<Detection>>,
}

#[derive(Deserialize)]
struct Detection {
    language: String,
}

#[derive(Deserialize)]
struct TranslateEnvelope {
    data: TranslateData,
}

#[derive(Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[async_trait]
impl LanguageService for HttpTranslator {
    async fn detect(&self, text: &str) -> Result<Option<String>, LangError> {
        let url = format!("{}/detect", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "q": text }))
            .send()
            .await
            .map_err(|e| LangError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LangError::Request(format!(
                "detect returned HTTP {}",
                response.status()
            )));
        }

        let envelope: DetectEnvelope = response
            .json()
            .await
            .map_err(|e| LangError::Response(e.to_string()))?;

        let language = envelope
            .data
            .detections
            .into_iter()
            .flatten()
            .next()
            .map(|d| d.language)
            .filter(|l| l != "und");

        tracing::debug!(language = ?language, "Language detected");
        Ok(language)
    }

    async fn translate(&self, text: &str, target: &str) -> Result<String, LangError> {
        let response = self
            .client
            .post(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "q": text, "target": target, "format": "text" }))
            .send()
            .await
            .map_err(|e| LangError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LangError::Request(format!(
                "translate returned HTTP {}",
                response.status()
            )));
        }

        let envelope: TranslateEnvelope = response
            .json()
            .await
            .map_err(|e| LangError::Response(e.to_string()))?;

        envelope
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| LangError::Response("empty translations array".to_string()))
    }
}
