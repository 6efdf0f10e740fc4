use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::ConfigError;
use crate::providers::TranslationBackend;
use crate::providers::bhashini::{Bhashini, DEFAULT_BHASHINI_ENDPOINT, DEFAULT_BHASHINI_SERVICE_ID};
use crate::providers::google::{DEFAULT_GOOGLE_ENDPOINT, GoogleTranslate};
use crate::translation::glossary::{Glossary, TermFields};

/// Application configuration module
/// This module handles the configuration the host application passes into
/// the translation pipeline: languages, glossary location, backend
/// credentials and pipeline tuning.
/// Represents the pipeline configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Glossary file; no glossary when absent
    #[serde(default)]
    pub glossary_path: Option<PathBuf>,

    /// Record field names inside the glossary file
    #[serde(default)]
    pub glossary_fields: TermFields,

    /// Backend config
    pub backend: BackendConfig,

    /// Pipeline tuning
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Google Cloud Translation
    #[default]
    Google,
    /// Bhashini inference pipeline
    Bhashini,
}

impl BackendKind {
    /// Capitalized backend name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::Bhashini => "Bhashini",
        }
    }

    /// Lowercase backend identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Bhashini => "bhashini".to_string(),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "bhashini" => Ok(Self::Bhashini),
            _ => Err(anyhow!("Invalid backend type: {}", s)),
        }
    }
}

/// Backend connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    /// Which backend to use
    #[serde(rename = "type", default)]
    pub kind: BackendKind,

    /// API key (Google) or Authorization header value (Bhashini)
    #[serde(default)]
    pub api_key: String,

    /// Service URL; empty means the backend's public endpoint
    #[serde(default)]
    pub endpoint: String,

    /// Model service id (Bhashini only)
    #[serde(default)]
    pub service_id: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Backend config with the defaults for `kind`
    pub fn new(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Google => Self {
                kind,
                api_key: String::new(),
                endpoint: DEFAULT_GOOGLE_ENDPOINT.to_string(),
                service_id: String::new(),
                timeout_secs: default_timeout_secs(),
            },
            BackendKind::Bhashini => Self {
                kind,
                api_key: String::new(),
                endpoint: DEFAULT_BHASHINI_ENDPOINT.to_string(),
                service_id: DEFAULT_BHASHINI_SERVICE_ID.to_string(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Pipeline tuning and per-call defaults
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Default source language code
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Default target language code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Maximum strings per backend request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Minimum fuzzy similarity for glossary fallback matches
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,

    /// Annotate glossary terms before translating
    #[serde(default)]
    pub use_glossary: bool,

    /// Send only markdown prose to the backend.
    ///
    /// Every string is split into markdown chunks and each prose chunk is
    /// trimmed, so leading and trailing whitespace of a string is not kept:
    /// `"Hello\n\n"` comes back as `"Hello\n"`. Disable to send strings whole.
    #[serde(default = "default_preserve_markdown")]
    pub preserve_markdown: bool,

    /// Keys whose subtrees are never translated
    #[serde(default)]
    pub exclude_keys: HashSet<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_language: default_target_language(),
            batch_size: default_batch_size(),
            fuzzy_threshold: default_fuzzy_threshold(),
            use_glossary: false,
            preserve_markdown: default_preserve_markdown(),
            exclude_keys: HashSet::new(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter for the `log` facade
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "gu".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    4
}

fn default_fuzzy_threshold() -> f64 {
    0.97
}

fn default_preserve_markdown() -> bool {
    true
}

impl Config {
    /// Configuration with defaults for the given languages and backend
    pub fn new(source_language: &str, target_language: &str, backend: BackendKind) -> Self {
        Self {
            glossary_path: None,
            glossary_fields: TermFields::default(),
            backend: BackendConfig::new(backend),
            pipeline: PipelineConfig {
                source_language: source_language.to_string(),
                target_language: target_language.to_string(),
                ..PipelineConfig::default()
            },
            log_level: LogLevel::default(),
        }
    }

    /// Parse configuration from JSON text and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Backends accept regional codes, so only blank codes are rejected here
        crate::language_utils::backend_language_code(&self.pipeline.source_language)?;
        crate::language_utils::backend_language_code(&self.pipeline.target_language)?;

        if self.backend.api_key.is_empty() {
            return Err(ConfigError::InvalidValue(format!(
                "API key is required for the {} backend",
                self.backend.kind.display_name()
            ))
            .into());
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("timeout_secs must be at least 1".to_string()).into());
        }

        if self.pipeline.batch_size == 0 {
            return Err(crate::errors::ValidationError::ZeroBatchSize.into());
        }
        crate::translation::fuzzy::validate_threshold(self.pipeline.fuzzy_threshold)?;

        Ok(())
    }

    /// Construct the configured backend
    pub fn build_backend(&self) -> Arc<dyn TranslationBackend> {
        let backend = &self.backend;
        match backend.kind {
            BackendKind::Google => Arc::new(GoogleTranslate::new(
                backend.api_key.clone(),
                backend.endpoint.clone(),
                backend.timeout_secs,
            )),
            BackendKind::Bhashini => Arc::new(Bhashini::new(
                backend.api_key.clone(),
                backend.endpoint.clone(),
                backend.service_id.clone(),
                backend.timeout_secs,
            )),
        }
    }

    /// Load the configured glossary, or an empty one when none is set
    pub fn load_glossary(&self) -> Result<Glossary> {
        match &self.glossary_path {
            Some(path) => Ok(Glossary::from_file(path, &self.glossary_fields)?),
            None => Ok(Glossary::empty()),
        }
    }
}
