//! HTTP text-generation adapter
//!
//! Talks to a text-generation-inference style server:
//! `POST {endpoint}/generate` with
//! `{"model": .., "inputs": .., "parameters": {"max_new_tokens", "temperature", "do_sample", "num_return_sequences"}}`.
//! `model` carries the backend id so one server can host several backends.
//! The server answers either one `{"generated_text": ..}` object or a list of them.

use super::registry::BackendFactory;
use crate::config::FileInferenceConfig;
use async_trait::async_trait;
use ensemble_application::{BackendError, TextGenerator};
use ensemble_domain::GenerationRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    do_sample: bool,
    num_return_sequences: u32,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    One(GeneratedText),
    Many(Vec<GeneratedText>),
}

impl GenerateResponse {
    fn into_texts(self) -> Vec<String> {
        match self {
            GenerateResponse::One(one) => vec![one.generated_text],
            GenerateResponse::Many(many) => many.into_iter().map(|g| g.generated_text).collect(),
        }
    }
}

fn request_body<'a>(backend_id: &'a str, request: &'a GenerationRequest) -> GenerateBody<'a> {
    let do_sample = request.is_sampling();
    GenerateBody {
        model: backend_id,
        inputs: &request.prompt,
        parameters: GenerateParameters {
            max_new_tokens: request.max_tokens,
            // Greedy requests carry no temperature
            temperature: do_sample.then_some(request.temperature),
            do_sample,
            num_return_sequences: request.num_samples,
        },
    }
}

/// One backend served over HTTP
pub struct HttpTextGenerator {
    backend_id: String,
    url: String,
    client: reqwest::Client,
}

impl HttpTextGenerator {
    pub fn new(backend_id: impl Into<String>, endpoint: &str, client: reqwest::Client) -> Self {
        Self {
            backend_id: backend_id.into(),
            url: format!("{}/generate", endpoint.trim_end_matches('/')),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    fn backend_id(&self) -> &str {
        &self.backend_id
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, BackendError> {
        debug!("POST {} for {}", self.url, self.backend_id);

        let response = self
            .client
            .post(&self.url)
            .json(&request_body(&self.backend_id, request))
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(format!("{}: {}", self.backend_id, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::RequestFailed(format!(
                "{}: HTTP {} {}",
                self.backend_id,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedOutput(format!("{}: {}", self.backend_id, e)))?;
        Ok(parsed.into_texts())
    }
}

/// Builds [`HttpTextGenerator`]s from the `[inference]` section
pub struct HttpBackendFactory {
    config: FileInferenceConfig,
    client: reqwest::Client,
}

impl HttpBackendFactory {
    pub fn new(config: FileInferenceConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("llm-ensemble/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Unavailable(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Generator for `backend_id` at its configured endpoint
    pub fn generator(&self, backend_id: &str) -> HttpTextGenerator {
        HttpTextGenerator::new(
            backend_id,
            self.config.endpoint_for(backend_id),
            self.client.clone(),
        )
    }
}

#[async_trait]
impl BackendFactory for HttpBackendFactory {
    async fn create(&self, backend_id: &str) -> Result<Arc<dyn TextGenerator>, BackendError> {
        Ok(Arc::new(self.generator(backend_id)))
    }
}
