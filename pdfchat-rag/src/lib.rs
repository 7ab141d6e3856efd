//! # pdfchat-rag
//!
//! Retrieval-augmented question answering over a single PDF document.
//!
//! ## Overview
//!
//! The crate has two halves that share an embedding provider and a vector
//! collection:
//!
//! - [`IngestionPipeline`] loads a PDF, splits it into overlapping chunks
//!   (1000 characters, 150 overlap), embeds them and upserts them under the
//!   stable ids `doc-0 .. doc-(n-1)`.
//! - [`QaService`] embeds a question, retrieves the 10 nearest chunks, fills
//!   a grounded prompt and returns the chat model's answer unmodified.
//!
//! Embedding backends are interchangeable through [`EmbeddingProvider`]:
//!
//! - [`GeminiEmbeddingProvider`] - Google Gemini embeddings
//! - [`OpenAIEmbeddingProvider`] - OpenAI embeddings
//! - [`OllamaEmbeddingProvider`] - a locally hosted model (the default)
//!
//! [`select_embedding_provider`] picks one from `MODEL_TYPE`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pdfchat_rag::{GeminiChatModel, QaService, Settings, select_embedding_provider};
//! use pdfchat_rag::pgvector::PgVectorStore;
//!
//! let settings = Settings::from_env()?;
//! let service = QaService::builder()
//!     .collection(&settings.collection_name)
//!     .embedding_provider(select_embedding_provider(&settings)?)
//!     .vector_store(Arc::new(PgVectorStore::connect(&settings.database_url).await?))
//!     .chat_model(Arc::new(GeminiChatModel::new(api_key, &settings.google_gemini_model)?))
//!     .build()?;
//!
//! println!("{}", service.answer("Qual é o prazo de entrega?").await?);
//! ```
//!
//! ## Features
//!
//! | Feature | Backend |
//! |---------|---------|
//! | `pgvector` (default) | [`pgvector::PgVectorStore`] |

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod gemini;
pub mod generation;
mod http;
pub mod ingest;
pub mod inmemory;
pub mod ollama;
pub mod openai;
pub mod pdf;
#[cfg(feature = "pgvector")]
pub mod pgvector;
pub mod provider;
pub mod qa;
pub mod settings;
pub mod vectorstore;

pub use chunking::{RecursiveCharacterSplitter, TextSplitter};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Document, Metadata, SearchResult, StoredChunk, sanitize_metadata};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use gemini::{GeminiChatModel, GeminiEmbeddingProvider};
pub use generation::{ChatModel, REFUSAL, build_context, render_prompt};
pub use ingest::{IngestReport, IngestionPipeline};
pub use inmemory::InMemoryVectorStore;
pub use ollama::OllamaEmbeddingProvider;
pub use openai::OpenAIEmbeddingProvider;
pub use pdf::PdfLoader;
pub use provider::{EmbeddingBackend, select_embedding_provider};
pub use qa::{QaService, QaServiceBuilder};
pub use settings::Settings;
pub use vectorstore::VectorStore;
