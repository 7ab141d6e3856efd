//! Locally hosted embedding models served by [Ollama](https://ollama.com).
//!
//! This is the free backend: no API key, no hosted service. The model must be
//! pulled on the Ollama server beforehand (`ollama pull nomic-embed-text`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::http::send_json;

/// Default Ollama server address.
pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "nomic-embed-text";

const PROVIDER: &str = "Ollama";

/// An [`EmbeddingProvider`] backed by the Ollama `/api/embed` endpoint.
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    host: String,
    model: String,
}

impl OllamaEmbeddingProvider {
    /// Create a provider for `model` on the server at `host`.
    pub fn new(host: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn failure(message: String) -> RagError {
        error!(provider = PROVIDER, error = %message, "embedding request failed");
        RagError::EmbeddingError { provider: PROVIDER.into(), message }
    }
}

impl Default for OllamaEmbeddingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_MODEL)
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Self::failure("server returned no embeddings".into()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = PROVIDER,
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let request = self
            .client
            .post(format!("{}/api/embed", self.host))
            .json(&EmbedRequest { model: &self.model, input: texts });
        let response: EmbedResponse = send_json(request).await.map_err(Self::failure)?;

        if response.embeddings.len() != texts.len() {
            return Err(Self::failure(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }
        Ok(response.embeddings)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
