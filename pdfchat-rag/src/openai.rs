//! OpenAI embedding provider using the OpenAI embeddings API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::http::send_json;

/// The default OpenAI API base URL.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// The default model for OpenAI embeddings.
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Inputs sent per `/embeddings` request; the API rejects more than 2048.
const MAX_BATCH_SIZE: usize = 1000;

const PROVIDER: &str = "OpenAI";

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
///
/// Uses `reqwest` to call the `/v1/embeddings` endpoint directly. Queries and
/// documents are embedded the same way.
///
/// # Example
///
/// ```rust,ignore
/// use pdfchat_rag::openai::OpenAIEmbeddingProvider;
///
/// let provider = OpenAIEmbeddingProvider::new("sk-...")?.with_model("text-embedding-3-large");
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIEmbeddingProvider {
    /// Create a new provider with the given API key and the default model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::ConfigError("OpenAI API key must not be empty".into()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            base_url: OPENAI_BASE_URL.into(),
        })
    }

    /// Set the model name (e.g. `text-embedding-3-large`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the provider at an OpenAI-compatible API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn failure(message: String) -> RagError {
        error!(provider = PROVIDER, error = %message, "embedding request failed");
        RagError::EmbeddingError { provider: PROVIDER.into(), message }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| Self::failure("API returned empty response".into()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_BATCH_SIZE) {
            debug!(
                provider = PROVIDER,
                batch_size = batch.len(),
                model = %self.model,
                "embedding batch"
            );

            let request = self
                .client
                .post(format!("{}/embeddings", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&EmbeddingRequest { model: &self.model, input: batch });

            let mut response: EmbeddingResponse =
                send_json(request).await.map_err(Self::failure)?;
            if response.data.len() != batch.len() {
                return Err(Self::failure(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    response.data.len()
                )));
            }
            response.data.sort_by_key(|d| d.index);
            embeddings.extend(response.data.into_iter().map(|d| d.embedding));
        }

        Ok(embeddings)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;

    /// Answer `/embeddings` requests with one vector per input, in reverse
    /// index order, recording the number of inputs of each request.
    async fn serve_embeddings(listener: TcpListener, batch_sizes: Arc<Mutex<Vec<usize>>>) {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(handle_connection(socket, batch_sizes.clone()));
        }
    }

    async fn handle_connection(mut socket: TcpStream, batch_sizes: Arc<Mutex<Vec<usize>>>) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 16 * 1024];
        loop {
            let header_end = loop {
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            };
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length: usize = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|value| value.trim().parse().unwrap())
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed mid-body");
                buf.extend_from_slice(&chunk[..n]);
            }

            let body: Value =
                serde_json::from_slice(&buf[header_end..header_end + content_length]).unwrap();
            buf.drain(..header_end + content_length);

            let count = body["input"].as_array().unwrap().len();
            batch_sizes.lock().unwrap().push(count);

            let data: Vec<Value> =
                (0..count).rev().map(|i| json!({ "index": i, "embedding": [i as f32] })).collect();
            let payload = json!({ "data": data }).to_string();
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\n\r\n{payload}",
                payload.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        }
    }

    #[tokio::test]
    async fn large_batches_are_split_across_requests() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let batch_sizes = Arc::new(Mutex::new(Vec::new()));
        tokio::spawn(serve_embeddings(listener, batch_sizes.clone()));

        let provider = OpenAIEmbeddingProvider::new("sk-test")
            .unwrap()
            .with_base_url(format!("http://{address}/v1"));
        let texts: Vec<String> = (0..2500).map(|i| format!("chunk {i}")).collect();
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();

        let embeddings = provider.embed_batch(&inputs).await.unwrap();

        assert_eq!(*batch_sizes.lock().unwrap(), vec![1000, 1000, 500]);
        assert_eq!(embeddings.len(), 2500);
        assert_eq!(embeddings[0], vec![0.0]);
        assert_eq!(embeddings[999], vec![999.0]);
        assert_eq!(embeddings[1000], vec![0.0]);
        assert_eq!(embeddings[2499], vec![499.0]);
    }

    #[test]
    fn rejects_empty_api_key() {
        assert!(matches!(OpenAIEmbeddingProvider::new(""), Err(RagError::ConfigError(_))));
    }

    #[test]
    fn base_url_is_normalized() {
        let provider = OpenAIEmbeddingProvider::new("sk-test")
            .unwrap()
            .with_base_url("http://localhost:8080/v1/");
        assert_eq!(provider.base_url, "http://localhost:8080/v1");
        assert_eq!(provider.model(), DEFAULT_MODEL);
    }
}
