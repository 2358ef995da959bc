use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::llm::ChatClient;
use crate::retrieval::Retriever;

/// Number of nearest documents injected into every prompt.
pub const TOP_K: usize = 3;

/// Detail string returned when no chat credential is configured.
pub const MISSING_API_KEY_DETAIL: &str = "API key not found. Set it in .env file.";

const STATUS_MESSAGE: &str = "Medical Chatbot API is running with RAG. Use /chat endpoint.";

#[derive(Clone)]
pub struct AppState {
    pub retriever: Arc<Retriever>,
    pub chat: Arc<ChatClient>,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub context_used: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/chat", post(chat))
        .with_state(state)
}

async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: STATUS_MESSAGE.to_string(),
    })
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorDetail>)> {
    // Preflight: without a credential nothing else runs, not even retrieval.
    let api_key = match state.api_key.as_deref() {
        Some(key) if !key.is_empty() => key,
        _ => return Err(server_error(MISSING_API_KEY_DETAIL)),
    };

    tracing::info!("Received chat query: {}", request.message);

    let context = state
        .retriever
        .retrieve(&request.message, TOP_K)
        .await
        .map_err(|e| server_error(e.to_string()))?;
    let context_text = context.join("\n");

    let augmented_prompt = format!(
        "You are a medical assistant. Use the following medical knowledge if helpful:\n\
         {context_text}\n\n\
         Patient query: {message}",
        message = request.message,
    );

    let reply = state
        .chat
        .complete(api_key, &augmented_prompt)
        .await
        .map_err(|e| server_error(e.to_string()))?;

    Ok(Json(ChatResponse {
        reply,
        context_used: context,
    }))
}

fn server_error(detail: impl Into<String>) -> (StatusCode, Json<ErrorDetail>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorDetail {
            detail: detail.into(),
        }),
    )
}
