//! Interactive question answering over the ingested PDF.
//!
//! ```bash
//! pdfchat-chat
//! ```

use std::sync::Arc;

use anyhow::Context;
use pdfchat_cli::{init_tracing, run_chat};
use pdfchat_rag::pgvector::PgVectorStore;
use pdfchat_rag::settings::GOOGLE_API_KEY;
use pdfchat_rag::{
    GeminiChatModel, QaService, RagError, Settings, VectorStore, select_embedding_provider,
};
use rustyline::DefaultEditor;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("warn")?;

    let settings = Settings::from_env()?;
    let embedding_provider = select_embedding_provider(&settings)?;

    let api_key = settings.google_api_key.clone().ok_or_else(|| {
        RagError::ConfigError(format!("Environment variable {GOOGLE_API_KEY} is not set."))
    })?;
    let chat_model = GeminiChatModel::new(api_key, &settings.google_gemini_model)?;

    let store = PgVectorStore::connect(&settings.database_url)
        .await
        .context("failed to connect to the vector database")?;
    store.create_collection(&settings.collection_name).await?;

    let service = QaService::builder()
        .collection(&settings.collection_name)
        .embedding_provider(embedding_provider)
        .vector_store(Arc::new(store))
        .chat_model(Arc::new(chat_model))
        .build()?;

    let mut editor = DefaultEditor::new()?;
    let mut stdout = std::io::stdout();
    run_chat(&service, &mut editor, &mut stdout).await
}
