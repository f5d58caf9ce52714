use clap::Parser;
use shelfscan::{
    config, embedding,
    extract::PdfExtractor,
    logging,
    processing::{IngestService, IngestSettings},
    qdrant::QdrantService,
    uploads::MemoryUploadStore,
    worker,
};
use std::sync::Arc;

/// Process pending PDF uploads into vector records.
#[derive(Parser)]
#[command(name = "shelfscan", version)]
struct Cli {
    /// Restrict the run to a single owner's uploads.
    #[arg(long)]
    owner: Option<String>,
}

#[tokio::main]
async fn main() {
    config::init_config();
    logging::init_tracing();
    let cli = Cli::parse();
    let config = config::get_config();

    let settings = IngestSettings::from_config(config);
    let store = Arc::new(MemoryUploadStore::new());
    let seeded = store.seed_from_dir(&settings.uploads_dir).await;
    tracing::info!(
        files = seeded,
        dir = %settings.uploads_dir.display(),
        "Registered pending uploads"
    );

    let qdrant = QdrantService::new(&config.qdrant_url, config.qdrant_api_key.clone())
        .expect("Failed to construct Qdrant client");
    let embedding_client = embedding::build_embedding_client(config);
    let service = IngestService::new(
        store,
        Box::new(PdfExtractor::new()),
        embedding_client,
        qdrant,
        settings,
    );
    service
        .prepare_collection()
        .await
        .expect("Failed to ensure Qdrant collection exists");

    match worker::run_worker(&service, cli.owner.as_deref()).await {
        Ok(outcome) => {
            tracing::info!(
                succeeded = outcome.succeeded,
                failed = outcome.failed,
                chunks = outcome.chunks_indexed,
                "Worker finished"
            );
            if outcome.failed > 0 {
                std::process::exit(2);
            }
        }
        Err(error) => {
            tracing::error!(error = %error, "Worker run failed");
            std::process::exit(1);
        }
    }
}
