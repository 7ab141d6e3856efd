//! Online question answering: embed → search → prompt → generate.
//!
//! # Example
//!
//! ```rust,ignore
//! use pdfchat_rag::{QaService, RagConfig};
//!
//! let service = QaService::builder()
//!     .config(RagConfig::default())
//!     .collection("manual")
//!     .embedding_provider(provider)
//!     .vector_store(Arc::new(store))
//!     .chat_model(Arc::new(GeminiChatModel::new(&api_key, "gemini-2.5-flash")?))
//!     .build()?;
//!
//! let answer = service.answer("Qual é o prazo de entrega?").await?;
//! ```

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::RagConfig;
use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::{ChatModel, build_context, render_prompt};
use crate::vectorstore::VectorStore;

/// Answers questions from the chunks stored in one collection.
///
/// Each call is independent: no history, no caching, no retries.
pub struct QaService {
    config: RagConfig,
    collection: String,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chat_model: Arc<dyn ChatModel>,
}

impl QaService {
    /// Create a new [`QaServiceBuilder`].
    pub fn builder() -> QaServiceBuilder {
        QaServiceBuilder::default()
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Retrieve the `top_k` chunks nearest to the question, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ValidationError`] for an empty question, without
    /// calling the embedding provider or the store.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        validate_question(question)?;

        let embedding = self.embedding_provider.embed(question).await.inspect_err(|e| {
            error!(
                provider = self.embedding_provider.name(),
                error = %e,
                "query embedding failed"
            );
        })?;

        let results = self
            .vector_store
            .search(&self.collection, &embedding, self.config.top_k)
            .await
            .inspect_err(|e| {
                error!(collection = %self.collection, error = %e, "vector store search failed");
            })?;

        debug!(collection = %self.collection, result_count = results.len(), "retrieved chunks");
        Ok(results)
    }

    /// Answer a question using only the retrieved context.
    ///
    /// The model's output is returned unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ValidationError`] for an empty question; embedding,
    /// store and model failures are propagated unchanged.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let results = self.retrieve(question).await?;
        let context = build_context(&results);
        let prompt = render_prompt(&context, question);

        let answer = self.chat_model.generate(&prompt).await.inspect_err(|e| {
            error!(model = self.chat_model.name(), error = %e, "generation failed");
        })?;

        info!(result_count = results.len(), answer_len = answer.len(), "answered question");
        Ok(answer)
    }
}

fn validate_question(question: &str) -> Result<()> {
    if question.is_empty() {
        return Err(RagError::ValidationError("A pergunta não pode ser vazia.".to_string()));
    }
    Ok(())
}

/// Builder for constructing a [`QaService`].
///
/// `config` defaults to [`RagConfig::default`]; every other field is required.
#[derive(Default)]
pub struct QaServiceBuilder {
    config: Option<RagConfig>,
    collection: Option<String>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chat_model: Option<Arc<dyn ChatModel>>,
}

impl QaServiceBuilder {
    /// Set the retrieval configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the collection to search.
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Set the embedding provider. It must match the one used for ingestion.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the generative model.
    pub fn chat_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.chat_model = Some(model);
        self
    }

    /// Build the [`QaService`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<QaService> {
        let collection = self
            .collection
            .ok_or_else(|| RagError::ConfigError("collection is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let chat_model = self
            .chat_model
            .ok_or_else(|| RagError::ConfigError("chat_model is required".to_string()))?;

        Ok(QaService {
            config: self.config.unwrap_or_default(),
            collection,
            embedding_provider,
            vector_store,
            chat_model,
        })
    }
}
