//! Offline ingestion: PDF → chunks → embeddings → vector collection.
//!
//! # Example
//!
//! ```rust,ignore
//! use pdfchat_rag::{IngestionPipeline, Settings, select_embedding_provider};
//!
//! let settings = Settings::for_ingestion()?;
//! let pipeline = IngestionPipeline::from_settings(
//!     &settings,
//!     select_embedding_provider(&settings)?,
//!     Arc::new(PgVectorStore::connect(&settings.database_url).await?),
//! )?;
//! let report = pipeline.ingest().await?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::chunking::{RecursiveCharacterSplitter, TextSplitter};
use crate::document::{Document, StoredChunk, sanitize_metadata};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::pdf::PdfLoader;
use crate::settings::Settings;
use crate::vectorstore::VectorStore;

/// Outcome of a successful ingestion run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IngestReport {
    /// The collection written to.
    pub collection: String,
    /// Number of chunks upserted.
    pub chunk_count: usize,
    /// Identifiers written, in chunk order.
    pub ids: Vec<String>,
}

/// The identifier of the chunk at `index` in split order.
pub fn chunk_id(index: usize) -> String {
    format!("doc-{index}")
}

/// Split loaded pages into chunks and strip empty metadata.
///
/// # Errors
///
/// Returns [`RagError::EmptyDocument`] if no chunk is produced, which happens
/// for PDFs without extractable text.
pub fn split_pages(
    pages: &[Document],
    splitter: &dyn TextSplitter,
    source: &str,
) -> Result<Vec<Document>> {
    let chunks = splitter.split_documents(pages);
    if chunks.is_empty() {
        return Err(RagError::EmptyDocument(format!(
            "No document chunks were generated from {source}. \
             The file might be empty or unreadable."
        )));
    }

    Ok(chunks
        .into_iter()
        .map(|chunk| {
            let metadata = sanitize_metadata(&chunk.metadata);
            chunk.with_metadata(metadata)
        })
        .collect())
}

/// Load the PDF at `path` and split it into sanitized chunks.
///
/// # Errors
///
/// Returns [`RagError::PdfError`] if the file cannot be parsed and
/// [`RagError::EmptyDocument`] if it yields no chunks.
pub fn load_and_split(path: &Path, splitter: &dyn TextSplitter) -> Result<Vec<Document>> {
    let pages = PdfLoader::load(path)?;
    split_pages(&pages, splitter, &path.display().to_string())
}

/// Assign `doc-0 .. doc-(n-1)` in order, replacing any existing ids.
pub fn assign_ids(chunks: &mut [Document]) {
    for (index, chunk) in chunks.iter_mut().enumerate() {
        chunk.id = Some(chunk_id(index));
    }
}

/// Ingests one PDF into one collection.
///
/// Chunk ids depend only on split order, so re-running with the same PDF and
/// splitter overwrites the previous rows. Rows beyond the new chunk count
/// (left over from a longer earlier document) are not removed.
pub struct IngestionPipeline {
    pdf_path: PathBuf,
    collection: String,
    splitter: Arc<dyn TextSplitter>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
}

impl IngestionPipeline {
    /// Create a pipeline using the default splitter (1000 characters, 150 overlap).
    pub fn new(
        pdf_path: impl Into<PathBuf>,
        collection: impl Into<String>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            collection: collection.into(),
            splitter: Arc::new(RecursiveCharacterSplitter::default()),
            embedding_provider,
            vector_store,
        }
    }

    /// Create a pipeline for the PDF and collection named in `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `PDF_PATH` is not set.
    pub fn from_settings(
        settings: &Settings,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Result<Self> {
        Ok(Self::new(
            settings.pdf_path()?,
            &settings.collection_name,
            embedding_provider,
            vector_store,
        ))
    }

    /// Replace the text splitter.
    pub fn with_splitter(mut self, splitter: Arc<dyn TextSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    /// Load the configured PDF and split it into sanitized chunks.
    pub fn load_and_split(&self) -> Result<Vec<Document>> {
        load_and_split(&self.pdf_path, self.splitter.as_ref())
    }

    /// Run the full ingestion: load, split, identify, embed, upsert.
    ///
    /// # Errors
    ///
    /// Fails on the first error; nothing is retried.
    pub async fn ingest(&self) -> Result<IngestReport> {
        let chunks = self.load_and_split()?;
        info!(
            pdf = %self.pdf_path.display(),
            chunk_count = chunks.len(),
            "split pdf into chunks"
        );
        self.ingest_chunks(chunks).await
    }

    /// Identify, embed and upsert already-split chunks in a single batch.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if the provider returns a different
    /// number of embeddings than chunks; embedding and storage errors are
    /// propagated unchanged.
    pub async fn ingest_chunks(&self, mut chunks: Vec<Document>) -> Result<IngestReport> {
        assign_ids(&mut chunks);

        self.vector_store.create_collection(&self.collection).await.inspect_err(|e| {
            error!(collection = %self.collection, error = %e, "failed to create collection");
        })?;

        let texts: Vec<&str> = chunks.iter().map(|chunk| chunk.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.inspect_err(|e| {
            error!(
                provider = self.embedding_provider.name(),
                error = %e,
                "embedding failed during ingestion"
            );
        })?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::PipelineError(format!(
                "embedding provider returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let stored: Vec<StoredChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(index, (chunk, embedding))| StoredChunk {
                id: chunk.id.unwrap_or_else(|| chunk_id(index)),
                text: chunk.text,
                embedding,
                metadata: chunk.metadata,
            })
            .collect();

        self.vector_store.upsert(&self.collection, &stored).await.inspect_err(|e| {
            error!(collection = %self.collection, error = %e, "upsert failed during ingestion");
        })?;

        let ids: Vec<String> = stored.into_iter().map(|chunk| chunk.id).collect();
        info!(collection = %self.collection, chunk_count = ids.len(), "ingested pdf");

        Ok(IngestReport { collection: self.collection.clone(), chunk_count: ids.len(), ids })
    }
}
