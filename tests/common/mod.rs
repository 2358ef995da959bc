use std::net::SocketAddr;
use std::sync::Arc;

use async_openai::{Client as OpenAIClient, config::OpenAIConfig};
use medrag_server::dataset::Document;
use medrag_server::index::FlatIndex;
use medrag_server::llm::ChatClient;
use medrag_server::retrieval::Retriever;
use medrag_server::server::{AppState, app};
use ndarray::Array1;
use serde_json::{Value, json};

/// Response body shape async-openai expects from an embeddings endpoint.
pub fn embedding_body(vector: &[f32]) -> Value {
    json!({
        "object": "list",
        "model": "text-embedding-3-small",
        "data": [{
            "object": "embedding",
            "index": 0,
            "embedding": vector,
        }],
        "usage": {"prompt_tokens": 1, "total_tokens": 1}
    })
}

/// Embeddings client pointed at a mock server instead of the real API.
pub fn mock_embeddings_client(base_url: &str) -> OpenAIClient<OpenAIConfig> {
    let config = OpenAIConfig::new()
        .with_api_base(base_url)
        .with_api_key("test-key");
    OpenAIClient::with_config(config)
}

/// Builds a retriever over a fixed three-document corpus with hand-made
/// vectors, so chat tests exercise retrieval without embedding the corpus.
#[allow(dead_code)]
pub fn fixed_corpus_retriever(embeddings_base_url: &str) -> Retriever {
    let documents = vec![
        Document {
            text: "influenza is associated with symptoms such as fever, cough.".to_string(),
        },
        Document {
            text: "anemia is associated with symptoms such as fatigue.".to_string(),
        },
        Document {
            text: "laryngitis is associated with symptoms such as sore_throat.".to_string(),
        },
    ];
    let index = FlatIndex::build(vec![
        Array1::from(vec![0.0_f32, 0.0]),
        Array1::from(vec![1.0_f32, 0.0]),
        Array1::from(vec![3.0_f32, 3.0]),
    ])
    .expect("Failed to build index");

    Retriever::new(
        documents,
        index,
        mock_embeddings_client(embeddings_base_url),
        "text-embedding-3-small".to_string(),
    )
    .expect("Failed to build retriever")
}

/// Serves `state` on an ephemeral port and returns the bound address.
#[allow(dead_code)]
pub async fn spawn_app(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app(state)).await {
            eprintln!("test server error: {err}");
        }
    });

    addr
}

#[allow(dead_code)]
pub fn app_state(retriever: Retriever, chat: ChatClient, api_key: Option<&str>) -> AppState {
    AppState {
        retriever: Arc::new(retriever),
        chat: Arc::new(chat),
        api_key: api_key.map(str::to_string),
    }
}
