use pdf_chat::api::{create_router, AppState};
use pdf_chat::application::{AnsweringPipeline, ChatSession, EmbeddingIndexer};
use pdf_chat::infrastructure::config::LoggingConfig;
use pdf_chat::infrastructure::{
    AppConfig, InMemoryVectorStoreFactory, LogFormat, OllamaEmbedding, OllamaLlm, PdfTextReader,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn build_session(config: &AppConfig) -> anyhow::Result<ChatSession> {
    let embedding = Arc::new(OllamaEmbedding::from_config(&config.config.embedding));
    let indexer = Arc::new(
        EmbeddingIndexer::new(embedding, Arc::new(InMemoryVectorStoreFactory))
            .with_batch_size(config.config.embedding.batch_size),
    );
    let llm = Arc::new(OllamaLlm::from_config(&config.config.llm));

    let pipeline = AnsweringPipeline::new(indexer, llm)
        .with_template(config.prompt_template()?)
        .with_top_k(config.config.rag.top_k)
        .with_history(config.config.rag.include_history);

    Ok(ChatSession::new(
        Arc::new(PdfTextReader::new()),
        config.text_splitter()?,
        pipeline,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.config.logging);
    for path in &config.missing_files {
        warn!(path = %path.display(), "configuration file not found, using defaults");
    }
    info!(
        llm = %config.config.llm.model,
        embedding = %config.config.embedding.model,
        "configuration loaded"
    );

    let session = build_session(&config)?;
    let addr = SocketAddr::new(config.config.server.host.parse()?, config.config.server.port);

    let state = AppState::new(session, config);
    let app = create_router(state);

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
