// src/handlers/chat.rs
use crate::models::chat::{ChatTurnRequest, ChatTurnResponse, ErrorResponse};
use crate::AppState;
use axum::{extract::Extension, http::StatusCode, routing::post, Json, Router};
use std::sync::Arc;

pub fn chat_routes() -> Router {
    Router::new().route("/chat", post(chat))
}

/// One chat turn: validate the body, run the agent, persist the exchange.
///
/// Every server-side failure maps to the same generic 500 body; only the
/// missing-field case is distinguished as a 400.
async fn chat(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ChatTurnRequest>,
) -> Result<Json<ChatTurnResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Validate input
    let (user_id, message) = match (payload.user_id.as_deref(), payload.message.as_deref()) {
        (Some(user_id), Some(message)) if !user_id.is_empty() && !message.is_empty() => {
            (user_id, message)
        }
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    success: false,
                    message: "userId and message are required".to_string(),
                }),
            ));
        }
    };

    tracing::info!("💬 Chat turn from user {}: {} chars", user_id, message.len());

    let response = match state.agent.run_turn(user_id, message).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Chat turn failed for user {}: {}", user_id, e);
            return Err(internal_error());
        }
    };

    if let Err(e) = state.conversations.record(user_id, message, &response).await {
        tracing::error!("Failed to persist conversation for user {}: {}", user_id, e);
        return Err(internal_error());
    }

    Ok(Json(ChatTurnResponse { response }))
}

fn internal_error() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            success: false,
            message: "Something went wrong".to_string(),
        }),
    )
}
