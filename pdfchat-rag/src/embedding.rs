//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap specific embedding backends (Gemini, OpenAI, a local
/// Ollama server) behind a unified async interface. A collection must only
/// ever hold vectors from one provider and model.
///
/// [`embed`](EmbeddingProvider::embed) is used for questions and
/// [`embed_batch`](EmbeddingProvider::embed_batch) for document chunks, so
/// backends that distinguish query and document embeddings can do so.
///
/// # Example
///
/// ```rust,ignore
/// use pdfchat_rag::EmbeddingProvider;
///
/// let provider = select_embedding_provider(&settings)?;
/// let embedding = provider.embed("What is the refund policy?").await?;
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single query text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of document texts.
    ///
    /// The default implementation calls [`embed`](EmbeddingProvider::embed)
    /// sequentially for each input. Override this method if the backend
    /// supports native batch embedding.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// A short label for logs and errors.
    fn name(&self) -> &str;
}
