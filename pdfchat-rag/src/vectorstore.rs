//! Vector store trait for storing and searching chunk embeddings.

use async_trait::async_trait;

use crate::document::{SearchResult, StoredChunk};
use crate::error::Result;

/// A storage backend for chunk embeddings with similarity search.
///
/// Collections are addressed by name. Ingestion creates and writes them;
/// answering only searches them.
///
/// # Example
///
/// ```rust,ignore
/// use pdfchat_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("manual").await?;
/// store.upsert("manual", &chunks).await?;
/// let nearest = store.search("manual", &query_embedding, 10).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection. No-op if it already exists.
    async fn create_collection(&self, name: &str) -> Result<()>;

    /// Insert chunks, overwriting any existing chunk with the same id.
    ///
    /// Chunks already in the collection under other ids are left untouched.
    async fn upsert(&self, collection: &str, chunks: &[StoredChunk]) -> Result<()>;

    /// Return the `top_k` chunks nearest to `embedding`.
    ///
    /// Results are ordered by ascending distance.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}
