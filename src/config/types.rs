use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::store::FileFormat;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "languages[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to access configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncSettings {
    /// Source language whose tree shape every other language follows.
    pub default_language: String,

    /// Language registry. Rewritten from the files on disk after a run that
    /// creates new languages.
    pub languages: Vec<String>,

    /// Directory of language files, relative to the project root.
    pub locales_dir: PathBuf,

    pub file_format: FileFormat,

    /// Separator of external key paths (`common.hello`).
    pub key_separator: String,

    pub translator: TranslatorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatorConfig {
    /// Translation API URL. Can also be given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Per-request timeout.
    pub timeout_seconds: u64,

    /// Extra attempts after a transport error, 429 or 5xx.
    pub max_retries: u32,

    pub retry_delay_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self { endpoint: None, timeout_seconds: 30, max_retries: 0, retry_delay_ms: 500 }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            languages: Vec::new(),
            locales_dir: PathBuf::from("locales"),
            file_format: FileFormat::default(),
            key_separator: ".".to_string(),
            translator: TranslatorConfig::default(),
        }
    }
}

impl SyncSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid endpoint URL
    /// - Zero timeout
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.default_language.trim().is_empty() {
            errors.push(ValidationError::new(
                "defaultLanguage",
                "The default language cannot be empty. Example: \"en\"",
            ));
        }

        for (index, language) in self.languages.iter().enumerate() {
            if language.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("languages[{index}]"),
                    "Language codes cannot be empty",
                ));
            }
        }

        if self.locales_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "localesDir",
                "The directory cannot be empty. Example: \"locales\"",
            ));
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if let Some(endpoint) = &self.translator.endpoint
            && let Err(e) = reqwest::Url::parse(endpoint)
        {
            errors.push(ValidationError::new(
                "translator.endpoint",
                format!("Invalid URL '{endpoint}': {e}"),
            ));
        }

        if self.translator.timeout_seconds == 0 {
            errors.push(ValidationError::new(
                "translator.timeoutSeconds",
                "The timeout must be at least 1 second",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
