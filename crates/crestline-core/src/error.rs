use thiserror::Error;

/// Top-level error type for the Crestline system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for
/// CrestlineError` so that the `?` operator works seamlessly across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CrestlineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for CrestlineError {
    fn from(err: toml::de::Error) -> Self {
        CrestlineError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CrestlineError {
    fn from(err: toml::ser::Error) -> Self {
        CrestlineError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CrestlineError {
    fn from(err: serde_json::Error) -> Self {
        CrestlineError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Crestline operations.
pub type Result<T> = std::result::Result<T, CrestlineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CrestlineError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CrestlineError = io_err.into();
        assert!(matches!(err, CrestlineError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let parsed: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        assert!(parsed.is_err());
        let err: CrestlineError = parsed.unwrap_err().into();
        assert!(matches!(err, CrestlineError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let bad_json = "{ invalid json }";
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        assert!(parsed.is_err());
        let err: CrestlineError = parsed.unwrap_err().into();
        assert!(matches!(err, CrestlineError::Serialization(_)));
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(CrestlineError, &str)> = vec![
            (
                CrestlineError::Store("connection lost".to_string()),
                "Store error: connection lost",
            ),
            (
                CrestlineError::Translation("quota exceeded".to_string()),
                "Translation error: quota exceeded",
            ),
            (
                CrestlineError::Completion("model overloaded".to_string()),
                "Completion error: model overloaded",
            ),
            (
                CrestlineError::Speech("payload too large".to_string()),
                "Speech error: payload too large",
            ),
            (
                CrestlineError::Chat("message rejected".to_string()),
                "Chat error: message rejected",
            ),
            (
                CrestlineError::Api("bind failed".to_string()),
                "API error: bind failed",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(CrestlineError::Config("fail".to_string()))
        }

        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_error_debug_impl() {
        let err = CrestlineError::Store("test debug".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Store"));
        assert!(debug_str.contains("test debug"));
    }
}
