//! Error types for the `pdfchat-rag` crate.

use thiserror::Error;

/// Errors that can occur while ingesting or answering.
///
/// The variants separate failures that are fatal at startup
/// ([`ConfigError`](RagError::ConfigError)) from failures scoped to a single
/// ingestion run or a single question.
#[derive(Debug, Error)]
pub enum RagError {
    /// A required setting is missing or a configuration value is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The source document produced no chunks.
    #[error("Empty document: {0}")]
    EmptyDocument(String),

    /// Caller input was rejected before any external call was made.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The PDF could not be read or parsed.
    #[error("PDF error ({path}): {message}")]
    PdfError {
        /// The path (or label) of the offending document.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The generative model failed to produce an answer.
    #[error("Generation error ({model}): {message}")]
    GenerationError {
        /// The model that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// An error in the ingestion or answering orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
