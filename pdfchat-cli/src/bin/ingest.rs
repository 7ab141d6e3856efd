//! Loads the PDF named by `PDF_PATH` into the configured vector collection.
//!
//! ```bash
//! PDF_PATH=document.pdf pdfchat-ingest
//! ```

use std::sync::Arc;

use anyhow::Context;
use pdfchat_cli::init_tracing;
use pdfchat_rag::pgvector::PgVectorStore;
use pdfchat_rag::{IngestionPipeline, Settings, select_embedding_provider};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info")?;

    let settings = Settings::for_ingestion()?;
    info!(
        collection = %settings.collection_name,
        model_type = %settings.model_type,
        "starting ingestion"
    );

    let embedding_provider = select_embedding_provider(&settings)?;
    let store = PgVectorStore::connect(&settings.database_url)
        .await
        .context("failed to connect to the vector database")?;

    let report = IngestionPipeline::from_settings(&settings, embedding_provider, Arc::new(store))?
        .ingest()
        .await?;

    info!(
        collection = %report.collection,
        chunk_count = report.chunk_count,
        "ingestion complete"
    );
    Ok(())
}
