//! Route handler functions for the chat API.
//!
//! Each handler extracts its payload via axum extractors, drives the
//! chat pipeline, and returns JSON responses.

use axum::extract::{Multipart, State};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crestline_chat::ChatOutcome;
use crestline_core::types::{EntityLink, NormalizedEntity, Turn};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    pub message: Option<String>,
    #[serde(rename = "conversationId", alias = "conversation_id")]
    pub conversation_id: Option<String>,
    pub history: Option<Vec<Turn>>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponseBody {
    /// The reply text; `null` when a single entity answered directly.
    pub message: Option<String>,
    pub links: Vec<EntityLink>,
    pub product: Option<NormalizedEntity>,
    pub project: Option<NormalizedEntity>,
    pub developer: Option<NormalizedEntity>,
    pub user: Option<NormalizedEntity>,
    pub products: Vec<NormalizedEntity>,
    pub projects: Vec<NormalizedEntity>,
    pub developers: Vec<NormalizedEntity>,
    #[serde(rename = "userLanguage")]
    pub user_language: String,
}

impl From<ChatOutcome> for ChatResponseBody {
    fn from(outcome: ChatOutcome) -> Self {
        Self {
            message: outcome.reply,
            links: outcome.links,
            product: outcome.product,
            project: outcome.project,
            developer: outcome.developer,
            user: outcome.user,
            products: outcome.products,
            projects: outcome.projects,
            developers: outcome.developers,
            user_language: outcome.user_language,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AudioResponseBody {
    pub message: Option<String>,
    /// The transcribed user message.
    #[serde(rename = "userMessage")]
    pub user_message: String,
    /// Base64-encoded reply audio.
    pub audio: String,
    pub links: Vec<EntityLink>,
    /// Reserved per-language variants of the reply; currently always
    /// empty.
    #[serde(default)]
    pub translations: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub products: Vec<NormalizedEntity>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub projects: Vec<NormalizedEntity>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub developers: Vec<NormalizedEntity>,
    #[serde(rename = "userLanguage")]
    pub user_language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /health - liveness and uptime.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /chat - handle one text chat message.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, ApiError> {
    let message = body
        .message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Message is required".to_string()))?;

    let history = body.history.unwrap_or_default();
    let outcome = state
        .pipeline
        .handle_message(message, body.conversation_id.as_deref(), &history)
        .await?;

    Ok(Json(outcome.into()))
}

/// POST /chat/audio - handle one audio chat message (multipart upload).
pub async fn chat_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AudioResponseBody>, ApiError> {
    let mut audio: Option<Vec<u8>> = None;
    let mut conversation_id: Option<String> = None;
    let mut history: Vec<Turn> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "audio" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid audio field: {}", e)))?;
                audio = Some(bytes.to_vec());
            }
            "conversationId" | "conversation_id" => {
                let text = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Invalid conversationId field: {}", e))
                })?;
                conversation_id = Some(text);
            }
            "history" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid history field: {}", e)))?;
                match serde_json::from_str(&raw) {
                    Ok(turns) => history = turns,
                    Err(e) => {
                        tracing::warn!(error = %e, "Ignoring unparseable history field");
                    }
                }
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let audio = audio.ok_or_else(|| ApiError::BadRequest("Audio file is required".to_string()))?;

    let result = state
        .pipeline
        .handle_audio(&audio, conversation_id.as_deref(), &history)
        .await?;

    Ok(Json(AudioResponseBody {
        message: result.outcome.reply.clone(),
        user_message: result.user_message,
        audio: BASE64.encode(&result.audio),
        links: result.outcome.links.clone(),
        translations: serde_json::Map::new(),
        products: result.outcome.products.clone(),
        projects: result.outcome.projects.clone(),
        developers: result.outcome.developers.clone(),
        user_language: result.outcome.user_language.clone(),
    }))
}
