//! Process settings loaded from environment variables.
//!
//! [`Settings`] is built once at startup and passed by reference to the
//! components that need it. Loading fails before any I/O when a required
//! variable is missing. Empty values count as missing.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{RagError, Result};

/// PostgreSQL connection string.
pub const DATABASE_URL: &str = "DATABASE_URL";
/// Name of the vector collection.
pub const PG_VECTOR_COLLECTION_NAME: &str = "PG_VECTOR_COLLECTION_NAME";
/// Path of the PDF to ingest.
pub const PDF_PATH: &str = "PDF_PATH";
/// Embedding backend selector (`gemini`, `openai`, anything else is the free backend).
pub const MODEL_TYPE: &str = "MODEL_TYPE";
/// Gemini embedding model name.
pub const GOOGLE_EMBEDDING_MODEL: &str = "GOOGLE_EMBEDDING_MODEL";
/// OpenAI embedding model name.
pub const OPENAI_EMBEDDING_MODEL: &str = "OPENAI_EMBEDDING_MODEL";
/// Embedding model served by Ollama for the free backend.
pub const FREE_EMBEDDING_MODEL: &str = "FREE_EMBEDDING_MODEL";
/// Gemini model that generates answers.
pub const GOOGLE_GEMINI_MODEL: &str = "GOOGLE_GEMINI_MODEL";
/// API key for the Gemini endpoints.
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// API key for the OpenAI endpoints.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Base URL of the Ollama server.
pub const OLLAMA_HOST: &str = "OLLAMA_HOST";

const DEFAULT_MODEL_TYPE: &str = "free";
const DEFAULT_GOOGLE_EMBEDDING_MODEL: &str = "models/text-embedding-004";
const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_FREE_EMBEDDING_MODEL: &str = "nomic-embed-text";
const DEFAULT_GOOGLE_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Settings shared by the ingestion and chat entry points.
#[derive(Clone, PartialEq)]
pub struct Settings {
    /// PostgreSQL connection string for the vector store.
    pub database_url: String,
    /// Collection the chunks are written to and read from.
    pub collection_name: String,
    /// Source PDF; only required for ingestion.
    pub pdf_path: Option<PathBuf>,
    /// Raw embedding backend selector.
    pub model_type: String,
    /// Embedding model used when the backend is `gemini`.
    pub google_embedding_model: String,
    /// Embedding model used when the backend is `openai`.
    pub openai_embedding_model: String,
    /// Embedding model used by the free backend.
    pub free_embedding_model: String,
    /// Generative model used to answer questions.
    pub google_gemini_model: String,
    /// Key for Gemini; required for chat and for the `gemini` backend.
    pub google_api_key: Option<String>,
    /// Key for OpenAI; required only for the `openai` backend.
    pub openai_api_key: Option<String>,
    /// Base URL of the Ollama server hosting the free embedding model.
    pub ollama_host: String,
}

impl Settings {
    /// Load settings for answering questions from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `DATABASE_URL` or
    /// `PG_VECTOR_COLLECTION_NAME` is not set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings for ingestion from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `DATABASE_URL`,
    /// `PG_VECTOR_COLLECTION_NAME` or `PDF_PATH` is not set.
    pub fn for_ingestion() -> Result<Self> {
        Self::for_ingestion_from_lookup(|key| std::env::var(key).ok())
    }

    /// Load chat settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::load(lookup, false)
    }

    /// Load ingestion settings through an arbitrary variable lookup.
    pub fn for_ingestion_from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::load(lookup, true)
    }

    /// The configured PDF path.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `PDF_PATH` was not set.
    pub fn pdf_path(&self) -> Result<&Path> {
        self.pdf_path.as_deref().ok_or_else(|| missing(PDF_PATH))
    }

    fn load<F>(lookup: F, require_pdf: bool) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let required = |key: &str| get(key).ok_or_else(|| missing(key));
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database_url = required(DATABASE_URL)?;
        let collection_name = required(PG_VECTOR_COLLECTION_NAME)?;
        let pdf_path = if require_pdf {
            Some(PathBuf::from(required(PDF_PATH)?))
        } else {
            get(PDF_PATH).map(PathBuf::from)
        };

        Ok(Self {
            database_url,
            collection_name,
            pdf_path,
            model_type: or_default(MODEL_TYPE, DEFAULT_MODEL_TYPE),
            google_embedding_model: or_default(
                GOOGLE_EMBEDDING_MODEL,
                DEFAULT_GOOGLE_EMBEDDING_MODEL,
            ),
            openai_embedding_model: or_default(
                OPENAI_EMBEDDING_MODEL,
                DEFAULT_OPENAI_EMBEDDING_MODEL,
            ),
            free_embedding_model: or_default(FREE_EMBEDDING_MODEL, DEFAULT_FREE_EMBEDDING_MODEL),
            google_gemini_model: or_default(GOOGLE_GEMINI_MODEL, DEFAULT_GOOGLE_GEMINI_MODEL),
            google_api_key: get(GOOGLE_API_KEY),
            openai_api_key: get(OPENAI_API_KEY),
            ollama_host: or_default(OLLAMA_HOST, DEFAULT_OLLAMA_HOST),
        })
    }
}

fn missing(key: &str) -> RagError {
    RagError::ConfigError(format!("Environment variable {key} is not set."))
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() { "<redacted>" } else { "<unset>" }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The connection string may embed a password.
        f.debug_struct("Settings")
            .field("database_url", &"<redacted>")
            .field("collection_name", &self.collection_name)
            .field("pdf_path", &self.pdf_path)
            .field("model_type", &self.model_type)
            .field("google_embedding_model", &self.google_embedding_model)
            .field("openai_embedding_model", &self.openai_embedding_model)
            .field("free_embedding_model", &self.free_embedding_model)
            .field("google_gemini_model", &self.google_gemini_model)
            .field("google_api_key", &redact(&self.google_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("ollama_host", &self.ollama_host)
            .finish()
    }
}
