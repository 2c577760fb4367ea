use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CrestlineError, Result};

/// Top-level configuration for the Crestline backend.
///
/// Loaded from `~/.crestline/config.toml` by default. Each section
/// corresponds to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrestlineConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub company: CompanyConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub moderation: ModerationConfig,
    #[serde(default)]
    pub capabilities: CapabilitiesConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl CrestlineConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CrestlineConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if
    /// the file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CrestlineError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// TCP port for the HTTP API.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: 8081,
            log_level: "info".to_string(),
        }
    }
}

/// Agency identity used in canned replies, prompts, and deep links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    pub name: String,
    /// The name the assistant introduces itself with.
    pub agent_name: String,
    /// Named in the ownership reply.
    pub owner: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub city: String,
    /// IANA timezone used for the canned local-time reply.
    pub timezone: String,
    /// Base URL deep links are built from.
    pub site_base_url: String,
    /// Fallback company description when no curated sections exist.
    pub blurb: String,
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: "Crestline Properties".to_string(),
            agent_name: "Crestline Concierge".to_string(),
            owner: "the Hartwell family".to_string(),
            phone: "+971 50 123 4567".to_string(),
            email: "hello@crestline.example".to_string(),
            website: "crestline.example".to_string(),
            city: "Dubai".to_string(),
            timezone: "Asia/Dubai".to_string(),
            site_base_url: "https://crestline.example".to_string(),
            blurb: "Crestline Properties is a real estate agency in Dubai specializing in \
                    products, projects, and developers."
                .to_string(),
        }
    }
}

/// Chat pipeline tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum accepted message length in characters.
    pub max_message_chars: usize,
    /// Records per kind embedded into the system prompt.
    pub prompt_records: usize,
    /// Sample entities fetched for example lists.
    pub sample_limit: usize,
    /// Entities returned by list queries.
    pub list_limit: usize,
    /// Description truncation for entity digests.
    pub description_digest_chars: usize,
    /// Description truncation inside the system prompt.
    pub prompt_description_chars: usize,
    /// Company-info cache lifetime in seconds.
    pub company_cache_ttl_secs: u64,
    /// Company-info sections included in context.
    pub company_sections: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_chars: 1000,
            prompt_records: 5,
            sample_limit: 3,
            list_limit: 10,
            description_digest_chars: 120,
            prompt_description_chars: 100,
            company_cache_ttl_secs: 600,
            company_sections: 3,
        }
    }
}

/// Conversation name memory bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Seconds a remembered name survives without being touched.
    pub name_ttl_secs: u64,
    /// Maximum remembered conversations before eviction.
    pub name_capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            name_ttl_secs: 30 * 60,
            name_capacity: 1024,
        }
    }
}

/// Input moderation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Case-insensitive substrings that reject a message outright.
    pub forbidden_keywords: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            forbidden_keywords: [
                "casino",
                "gambling",
                "betting",
                "escort",
                "porn",
                "weapon",
                "narcotic",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Optional collaborator capabilities, resolved at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilitiesConfig {
    /// Whether the store exposes a user collection.
    pub users: bool,
    /// Whether the store exposes curated company-info sections.
    pub company_info: bool,
}

impl Default for CapabilitiesConfig {
    fn default() -> Self {
        Self {
            users: true,
            company_info: true,
        }
    }
}

/// External provider tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Chat-completion model identifier.
    pub chat_model: String,
    /// Sampling temperature for completions.
    pub temperature: f32,
    /// Completion token cap.
    pub max_tokens: u32,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            chat_model: "gpt-4".to_string(),
            temperature: 0.5,
            max_tokens: 800,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CrestlineConfig::default();
        assert_eq!(config.general.port, 8081);
        assert_eq!(config.chat.max_message_chars, 1000);
        assert_eq!(config.chat.prompt_records, 5);
        assert_eq!(config.memory.name_ttl_secs, 1800);
        assert!(config.capabilities.users);
        assert!(config.capabilities.company_info);
    }

    #[test]
    fn test_default_providers() {
        let config = CrestlineConfig::default();
        assert_eq!(config.providers.chat_model, "gpt-4");
        assert_eq!(config.providers.max_tokens, 800);
        assert!((config.providers.temperature - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_forbidden_keywords_nonempty_by_default() {
        let config = CrestlineConfig::default();
        assert!(!config.moderation.forbidden_keywords.is_empty());
    }

    #[test]
    fn test_partial_toml_uses_section_defaults() {
        let toml_str = r#"
            [general]
            port = 9090
        "#;
        let config: CrestlineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.port, 9090);
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.chat.list_limit, 10);
    }

    #[test]
    fn test_partial_section_uses_field_defaults() {
        let toml_str = r#"
            [chat]
            list_limit = 25
        "#;
        let config: CrestlineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chat.list_limit, 25);
        assert_eq!(config.chat.max_message_chars, 1000);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = CrestlineConfig::default();
        config.general.port = 9191;
        config.company.city = "Abu Dhabi".to_string();
        config.save(&path).unwrap();

        let loaded = CrestlineConfig::load(&path).unwrap();
        assert_eq!(loaded.general.port, 9191);
        assert_eq!(loaded.company.city, "Abu Dhabi");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = CrestlineConfig::load(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = CrestlineConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.port, 8081);
    }

    #[test]
    fn test_load_or_default_on_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        let config = CrestlineConfig::load_or_default(&path);
        assert_eq!(config.general.port, 8081);
    }
}
