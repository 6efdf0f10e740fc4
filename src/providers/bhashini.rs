use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};

use crate::errors::BackendError;
use crate::providers::{TranslationBackend, ensure_same_length};

/// Public Bhashini inference pipeline endpoint
pub const DEFAULT_BHASHINI_ENDPOINT: &str = "https://dhruva-api.bhashini.gov.in/services/inference/pipeline";

/// Translation model served by the pipeline
pub const DEFAULT_BHASHINI_SERVICE_ID: &str = "bhashini/ai4bharat/indictrans-v3";

/// Bhashini pipeline client
#[derive(Debug)]
pub struct Bhashini {
    /// HTTP client for API requests, reused across calls
    client: Client,
    /// Value of the Authorization header
    api_key: String,
    /// Inference pipeline URL
    endpoint: String,
    /// Model service identifier
    service_id: String,
}

/// Pipeline request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRequest {
    pipeline_tasks: Vec<PipelineTask>,
    input_data: InputData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelineTask {
    task_type: String,
    config: TaskConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskConfig {
    service_id: String,
    language: LanguagePair,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LanguagePair {
    source_language: String,
    target_language: String,
}

#[derive(Debug, Serialize)]
struct InputData {
    input: Vec<SourceText>,
}

#[derive(Debug, Serialize)]
struct SourceText {
    source: String,
}

/// Pipeline response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResponse {
    pub pipeline_response: Vec<TaskResponse>,
}

/// Output of one pipeline task
#[derive(Debug, Deserialize)]
pub struct TaskResponse {
    pub output: Vec<TaskOutput>,
}

#[derive(Debug, Deserialize)]
pub struct TaskOutput {
    #[serde(default)]
    pub source: Option<String>,
    pub target: String,
}

impl PipelineRequest {
    /// Create a single-task translation request
    pub fn translation(service_id: &str, texts: &[String], source_lang: &str, target_lang: &str) -> Self {
        Self {
            pipeline_tasks: vec![PipelineTask {
                task_type: "translation".to_string(),
                config: TaskConfig {
                    service_id: service_id.to_string(),
                    language: LanguagePair {
                        source_language: source_lang.to_string(),
                        target_language: target_lang.to_string(),
                    },
                },
            }],
            input_data: InputData {
                input: texts.iter().map(|t| SourceText { source: t.clone() }).collect(),
            },
        }
    }
}

impl Bhashini {
    /// Create a new Bhashini client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        service_id: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        let endpoint = endpoint.into();
        let service_id = service_id.into();
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: if endpoint.is_empty() {
                DEFAULT_BHASHINI_ENDPOINT.to_string()
            } else {
                endpoint
            },
            service_id: if service_id.is_empty() {
                DEFAULT_BHASHINI_SERVICE_ID.to_string()
            } else {
                service_id
            },
        }
    }
}

#[async_trait]
impl TranslationBackend for Bhashini {
    fn name(&self) -> &str {
        "bhashini"
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
            return Err(BackendError::AuthenticationError("Bhashini API key is not set".to_string()));
        }

        let request = PipelineRequest::translation(&self.service_id, texts, source_lang, target_lang);

        debug!("Bhashini translate: {} strings {} -> {}", texts.len(), source_lang, target_lang);

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(BackendError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Bhashini API error ({}): {}", status, message);
            return Err(BackendError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response
            .json::<PipelineResponse>()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        let task = body
            .pipeline_response
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::ParseError("pipelineResponse is empty".to_string()))?;

        let translations: Vec<String> = task.output.into_iter().map(|o| o.target).collect();

        ensure_same_length(texts.len(), translations.len())?;
        Ok(translations)
    }
}
