//! Crestline application binary - composition root.
//!
//! Ties the workspace crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Load the catalog snapshot into the in-memory store
//! 3. Construct the provider collaborators from environment keys,
//!    falling back to the offline implementations when keys are absent
//! 4. Start the axum REST API server

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crestline_api::{routes, AppState};
use crestline_chat::ChatPipeline;
use crestline_core::config::CrestlineConfig;
use crestline_core::types::{CompanySection, EntityKind, EntityRecord};
use crestline_lang::{EchoTranslator, HttpTranslator, LanguageService};
use crestline_llm::{ChatModel, OpenAiChat, ScriptedChat};
use crestline_speech::{HttpSpeech, SilentSpeech, SpeechService};
use crestline_store::MemoryStore;

/// Catalog snapshot file shape loaded at startup.
#[derive(Default, Deserialize)]
struct CatalogSnapshot {
    #[serde(default)]
    products: Vec<EntityRecord>,
    #[serde(default)]
    projects: Vec<EntityRecord>,
    #[serde(default)]
    developers: Vec<EntityRecord>,
    #[serde(default)]
    users: Vec<EntityRecord>,
    #[serde(default)]
    company_sections: Vec<CompanySection>,
}

/// Resolve the config file path (CRESTLINE_CONFIG env, or
/// ~/.crestline/config.toml).
fn config_path() -> PathBuf {
    if let Ok(p) = std::env::var("CRESTLINE_CONFIG") {
        return PathBuf::from(p);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".crestline").join("config.toml");
    }
    PathBuf::from("config.toml")
}

/// Load the catalog snapshot named by CRESTLINE_CATALOG, if any.
async fn load_catalog(store: &MemoryStore) {
    let Ok(path) = std::env::var("CRESTLINE_CATALOG") else {
        tracing::info!("CRESTLINE_CATALOG not set; starting with an empty catalog");
        return;
    };

    let snapshot: CatalogSnapshot = match std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Failed to load catalog snapshot");
            return;
        }
    };

    let counts = (
        snapshot.products.len(),
        snapshot.projects.len(),
        snapshot.developers.len(),
        snapshot.users.len(),
    );
    for record in snapshot.products {
        store.insert(EntityKind::Product, record).await;
    }
    for record in snapshot.projects {
        store.insert(EntityKind::Project, record).await;
    }
    for record in snapshot.developers {
        store.insert(EntityKind::Developer, record).await;
    }
    for record in snapshot.users {
        store.insert(EntityKind::User, record).await;
    }
    store.set_sections(snapshot.company_sections).await;

    tracing::info!(
        products = counts.0,
        projects = counts.1,
        developers = counts.2,
        users = counts.3,
        "Catalog snapshot loaded"
    );
}

fn build_language_service() -> Arc<dyn LanguageService> {
    match std::env::var("GOOGLE_TRANSLATE_API_KEY") {
        Ok(key) if !key.is_empty() => {
            tracing::info!("Translation provider: Cloud Translation");
            Arc::new(HttpTranslator::new(key))
        }
        _ => {
            tracing::warn!("GOOGLE_TRANSLATE_API_KEY not set; translation disabled");
            Arc::new(EchoTranslator::new())
        }
    }
}

fn build_chat_model(config: &CrestlineConfig) -> Arc<dyn ChatModel> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => {
            tracing::info!(model = %config.providers.chat_model, "Completion provider: OpenAI");
            Arc::new(OpenAiChat::new(
                key,
                config.providers.chat_model.clone(),
                config.providers.temperature,
                config.providers.max_tokens,
            ))
        }
        _ => {
            tracing::warn!("OPENAI_API_KEY not set; completions disabled");
            Arc::new(ScriptedChat::new(Vec::<String>::new()))
        }
    }
}

fn build_speech_service() -> Arc<dyn SpeechService> {
    let tts_key = std::env::var("GOOGLE_TTS_API_KEY").unwrap_or_default();
    let stt_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    if !tts_key.is_empty() && !stt_key.is_empty() {
        tracing::info!("Speech provider: Cloud TTS + Whisper");
        Arc::new(HttpSpeech::new(tts_key, stt_key))
    } else {
        tracing::warn!("Speech provider keys not set; voice disabled");
        Arc::new(SilentSpeech::new())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Crestline v{}", env!("CARGO_PKG_VERSION"));

    let config_file = config_path();
    let config = CrestlineConfig::load_or_default(&config_file);
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    let store = MemoryStore::new();
    load_catalog(&store).await;

    let language = build_language_service();
    let model = build_chat_model(&config);
    let speech = build_speech_service();

    let port = std::env::var("CRESTLINE_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.general.port);

    let pipeline = ChatPipeline::new(config, Arc::new(store), language, model, speech);
    let state = AppState::new(pipeline);

    tracing::info!(port, "API server starting");
    routes::start_server(port, state).await?;

    Ok(())
}
