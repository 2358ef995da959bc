use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

use async_openai::{Client as OpenAIClient, config::OpenAIConfig};
use clap::Parser;
use medrag_server::{
    dataset::load_documents,
    embeddings::embed_documents,
    error::ServerError,
    index::FlatIndex,
    llm::ChatClient,
    retrieval::Retriever,
    server::{AppState, app},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "medrag-server",
    about = "Retrieval-augmented medical chatbot API backed by a flat vector index"
)]
struct Cli {
    /// Address to bind the HTTP server to (host:port).
    #[arg(long, env = "MEDRAG_BIND", default_value = "127.0.0.1:8080")]
    bind: String,

    /// Path to the disease/symptom CSV dataset.
    #[arg(long, env = "MEDRAG_DATASET", default_value = "data/medical_symptoms.csv")]
    dataset: PathBuf,

    /// Embedding model identifier; must match between index build and query.
    #[arg(long, env = "EMBEDDING_MODEL", default_value = "text-embedding-3-small")]
    embedding_model: String,

    /// Base URL for OpenAI-compatible embedding endpoints.
    #[arg(long, env = "OPENAI_API_BASE")]
    embedding_api_base: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let documents = load_documents(&cli.dataset)?;
    tracing::info!(
        "Loaded {} documents from {}",
        documents.len(),
        cli.dataset.display()
    );

    // The embedding credential is required up front: without it the index
    // cannot be built and the process must not come up.
    let openai_api_key = env::var("OPENAI_API_KEY")
        .map_err(|_| ServerError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

    let mut openai_config = OpenAIConfig::new().with_api_key(openai_api_key);
    if let Some(api_base) = &cli.embedding_api_base {
        openai_config = openai_config.with_api_base(api_base);
    }
    let openai_client = OpenAIClient::with_config(openai_config);

    tracing::info!(
        "Generating embeddings with model '{}'...",
        cli.embedding_model
    );
    let vectors = embed_documents(&openai_client, &cli.embedding_model, &documents).await?;

    let index = FlatIndex::build(vectors)?;
    tracing::info!(
        "Built flat index: {} vectors, dimension {}",
        index.len(),
        index.dimension()
    );

    let retriever = Retriever::new(documents, index, openai_client, cli.embedding_model)?;

    // The chat credential is checked per request, not at startup: its absence
    // must surface as the fixed HTTP error, not as a refusal to boot.
    let api_key = env::var("DEEPSEEK_API_KEY").ok();
    if api_key.as_deref().is_none_or(str::is_empty) {
        tracing::warn!("DEEPSEEK_API_KEY is not set; /chat will return a configuration error");
    }

    let state = AppState {
        retriever: Arc::new(retriever),
        chat: Arc::new(ChatClient::new()),
        api_key,
    };

    let addr: SocketAddr = cli
        .bind
        .parse()
        .map_err(|e| ServerError::Config(format!("Invalid bind address '{}': {}", cli.bind, e)))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Medical chatbot API listening on http://{addr}");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
