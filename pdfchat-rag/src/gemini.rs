//! Gemini embedding provider and chat model over the Generative Language REST API.
//!
//! Requests authenticate with the `x-goog-api-key` header. Model names may be
//! given with or without the `models/` prefix.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::ChatModel;
use crate::http::send_json;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "models/text-embedding-004";

/// Default generative model.
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";

/// `batchEmbedContents` accepts at most this many requests per call.
const MAX_BATCH_SIZE: usize = 100;

const PROVIDER: &str = "Gemini";

/// Embedding task hint sent with each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    RetrievalQuery,
    RetrievalDocument,
}

struct GeminiEndpoint {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiEndpoint {
    fn new(api_key: String, model: &str) -> Result<Self> {
        if api_key.is_empty() {
            return Err(RagError::ConfigError("Gemini API key must not be empty".into()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: qualified_model_name(model),
            base_url: GEMINI_BASE_URL.into(),
        })
    }

    fn post(&self, method: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/{}:{method}", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
    }
}

/// Prefix a bare model name with `models/`.
fn qualified_model_name(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self { parts: vec![Part { text }] }
    }
}

// ── Embeddings ─────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: TaskType,
}

#[derive(Serialize)]
struct BatchEmbedContentsRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Deserialize)]
struct BatchEmbedContentsResponse {
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

/// An [`EmbeddingProvider`] backed by the Gemini embedding API.
///
/// Questions are embedded with [`TaskType::RetrievalQuery`] and document
/// chunks with [`TaskType::RetrievalDocument`].
///
/// # Example
///
/// ```rust,ignore
/// use pdfchat_rag::gemini::GeminiEmbeddingProvider;
///
/// let provider = GeminiEmbeddingProvider::new("your-api-key", "text-embedding-004")?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct GeminiEmbeddingProvider {
    endpoint: GeminiEndpoint,
}

impl GeminiEmbeddingProvider {
    /// Create a provider for `model` using the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the key is empty.
    pub fn new(api_key: impl Into<String>, model: &str) -> Result<Self> {
        Ok(Self { endpoint: GeminiEndpoint::new(api_key.into(), model)? })
    }

    /// The fully qualified model name.
    pub fn model(&self) -> &str {
        &self.endpoint.model
    }

    fn request<'a>(&'a self, text: &'a str, task_type: TaskType) -> EmbedContentRequest<'a> {
        EmbedContentRequest { model: &self.endpoint.model, content: Content::text(text), task_type }
    }

    fn failure(message: String) -> RagError {
        error!(provider = PROVIDER, error = %message, "embedding request failed");
        RagError::EmbeddingError { provider: PROVIDER.into(), message }
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, text_len = text.len(), "embedding query");

        let request =
            self.endpoint.post("embedContent").json(&self.request(text, TaskType::RetrievalQuery));
        let response: EmbedContentResponse = send_json(request).await.map_err(Self::failure)?;

        Ok(response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_BATCH_SIZE) {
            debug!(provider = PROVIDER, batch_size = batch.len(), "embedding batch");

            let body = BatchEmbedContentsRequest {
                requests: batch
                    .iter()
                    .map(|text| self.request(text, TaskType::RetrievalDocument))
                    .collect(),
            };
            let request = self.endpoint.post("batchEmbedContents").json(&body);
            let response: BatchEmbedContentsResponse =
                send_json(request).await.map_err(Self::failure)?;

            if response.embeddings.len() != batch.len() {
                return Err(Self::failure(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }
            embeddings.extend(response.embeddings.into_iter().map(|e| e.values));
        }

        Ok(embeddings)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

// ── Generation ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<UserContent<'a>>,
}

#[derive(Serialize)]
struct UserContent<'a> {
    role: &'static str,
    #[serde(flatten)]
    content: Content<'a>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        Some(content.parts.into_iter().filter_map(|part| part.text).collect())
    }
}

/// A [`ChatModel`] backed by Gemini `generateContent`.
///
/// Each prompt is sent as a single user turn; the answer is returned as plain
/// text without post-processing.
pub struct GeminiChatModel {
    endpoint: GeminiEndpoint,
}

impl GeminiChatModel {
    /// Create a chat model for `model` using the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the key is empty.
    pub fn new(api_key: impl Into<String>, model: &str) -> Result<Self> {
        Ok(Self { endpoint: GeminiEndpoint::new(api_key.into(), model)? })
    }

    fn failure(&self, message: String) -> RagError {
        error!(model = %self.endpoint.model, error = %message, "generation failed");
        RagError::GenerationError { model: self.endpoint.model.clone(), message }
    }
}

#[async_trait]
impl ChatModel for GeminiChatModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.endpoint.model, prompt_len = prompt.len(), "generating answer");

        let body = GenerateContentRequest {
            contents: vec![UserContent { role: "user", content: Content::text(prompt) }],
        };
        let request = self.endpoint.post("generateContent").json(&body);
        let response: GenerateContentResponse =
            send_json(request).await.map_err(|e| self.failure(e))?;

        response.into_text().ok_or_else(|| self.failure("response contained no candidates".into()))
    }

    fn name(&self) -> &str {
        &self.endpoint.model
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_model_names_get_prefixed() {
        assert_eq!(qualified_model_name("text-embedding-004"), "models/text-embedding-004");
        assert_eq!(qualified_model_name("models/embedding-001"), "models/embedding-001");
    }

    #[test]
    fn embed_request_uses_camel_case_task_type() {
        let provider = GeminiEmbeddingProvider::new("key", "text-embedding-004").unwrap();
        let request = provider.request("hi", TaskType::RetrievalDocument);
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "models/text-embedding-004",
                "content": { "parts": [{ "text": "hi" }] },
                "taskType": "RETRIEVAL_DOCUMENT",
            })
        );
    }

    #[test]
    fn generate_request_is_a_single_user_turn() {
        let body = GenerateContentRequest {
            contents: vec![UserContent { role: "user", content: Content::text("prompt") }],
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "contents": [{ "role": "user", "parts": [{ "text": "prompt" }] }] })
        );
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {
                    "content": {
                        "parts": [{ "text": "Não tenho " }, { "text": "informações." }]
                    }
                },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.into_text().as_deref(), Some("Não tenho informações."));
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
                .unwrap();
        assert!(response.into_text().is_none());
    }

    #[test]
    fn rejects_empty_api_key() {
        assert!(GeminiChatModel::new("", DEFAULT_CHAT_MODEL).is_err());
    }
}
