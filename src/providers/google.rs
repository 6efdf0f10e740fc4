use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::BackendError;
use crate::providers::{TranslationBackend, ensure_same_length};

/// Public Cloud Translation v2 endpoint
pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Cloud Translation client
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
}

/// Translation request body
#[derive(Debug, Serialize)]
pub struct GoogleRequest<'a> {
    /// Strings to translate
    q: &'a [String],
    /// Source language code
    source: &'a str,
    /// Target language code
    target: &'a str,
    /// Plain text, so markdown and brackets are not HTML-escaped
    format: &'static str,
}

/// Translation response body
#[derive(Debug, Deserialize)]
pub struct GoogleResponse {
    pub data: GoogleData,
}

#[derive(Debug, Deserialize)]
pub struct GoogleData {
    pub translations: Vec<GoogleTranslation>,
}

/// One translated string
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleTranslation {
    pub translated_text: String,
    #[serde(default)]
    pub detected_source_language: Option<String>,
}

/// Error envelope returned on non-success responses
#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

impl GoogleTranslate {
    /// Create a new Google client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn api_url(&self) -> Result<Url, BackendError> {
        let base = if self.endpoint.is_empty() {
            DEFAULT_GOOGLE_ENDPOINT
        } else {
            self.endpoint.as_str()
        };

        let mut url = Url::parse(base).map_err(|e| BackendError::RequestFailed(format!("Invalid endpoint {}: {}", base, e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslate {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, BackendError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if self.api_key.is_empty() {
            return Err(BackendError::AuthenticationError("Google API key is not set".to_string()));
        }

        let request = GoogleRequest {
            q: texts,
            source: source_lang,
            target: target_lang,
            format: "text",
        };

        debug!("Google translate: {} strings {} -> {}", texts.len(), source_lang, target_lang);

        let response = self
            .client
            .post(self.api_url()?)
            .json(&request)
            .send()
            .await
            .map_err(BackendError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let raw = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            let message = serde_json::from_str::<GoogleErrorEnvelope>(&raw)
                .map(|envelope| envelope.error.message)
                .unwrap_or(raw);
            error!("Google API error ({}): {}", status, message);
            return Err(BackendError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response
            .json::<GoogleResponse>()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        let translations: Vec<String> = body
            .data
            .translations
            .into_iter()
            .map(|t| t.translated_text)
            .collect();

        ensure_same_length(texts.len(), translations.len())?;
        Ok(translations)
    }
}
