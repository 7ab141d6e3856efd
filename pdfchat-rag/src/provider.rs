//! Embedding backend selection.
//!
//! The backend is resolved once at startup from `MODEL_TYPE`. Only `gemini`
//! and `openai` are recognised; every other value, including an unset one,
//! selects the free local backend without raising an error.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::gemini::GeminiEmbeddingProvider;
use crate::ollama::OllamaEmbeddingProvider;
use crate::openai::OpenAIEmbeddingProvider;
use crate::settings::{GOOGLE_API_KEY, OPENAI_API_KEY, Settings};

/// The interchangeable embedding backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingBackend {
    /// Hosted Gemini embeddings.
    Gemini,
    /// Hosted OpenAI embeddings.
    OpenAI,
    /// A locally hosted model.
    #[default]
    Free,
}

impl EmbeddingBackend {
    /// Map a `MODEL_TYPE` value to a backend. Matching is exact.
    pub fn from_model_type(model_type: &str) -> Self {
        match model_type {
            "gemini" => Self::Gemini,
            "openai" => Self::OpenAI,
            "free" => Self::Free,
            other => {
                debug!(model_type = other, "unrecognised MODEL_TYPE, using the free backend");
                Self::Free
            }
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenAI => write!(f, "openai"),
            Self::Free => write!(f, "free"),
        }
    }
}

/// Build the embedding provider selected by `settings.model_type`.
///
/// No request is made until the provider is first used.
///
/// # Errors
///
/// Returns [`RagError::ConfigError`] if a hosted backend is selected and its
/// API key is not set.
pub fn select_embedding_provider(settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>> {
    let backend = EmbeddingBackend::from_model_type(&settings.model_type);

    let provider: Arc<dyn EmbeddingProvider> = match backend {
        EmbeddingBackend::Gemini => {
            let api_key = require_key(&settings.google_api_key, GOOGLE_API_KEY)?;
            Arc::new(GeminiEmbeddingProvider::new(api_key, &settings.google_embedding_model)?)
        }
        EmbeddingBackend::OpenAI => {
            let api_key = require_key(&settings.openai_api_key, OPENAI_API_KEY)?;
            Arc::new(
                OpenAIEmbeddingProvider::new(api_key)?
                    .with_model(&settings.openai_embedding_model),
            )
        }
        EmbeddingBackend::Free => Arc::new(OllamaEmbeddingProvider::new(
            &settings.ollama_host,
            &settings.free_embedding_model,
        )),
    };

    debug!(%backend, provider = provider.name(), "selected embedding provider");
    Ok(provider)
}

fn require_key(key: &Option<String>, variable: &str) -> Result<String> {
    key.clone().ok_or_else(|| {
        RagError::ConfigError(format!("Environment variable {variable} is not set."))
    })
}
