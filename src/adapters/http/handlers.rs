//! Request handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::domain::Intent;
use crate::ports::{AuditStatus, ChatPort};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Chat request. Both fields may be absent; an absent or blank message is a 400.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub intent: Intent,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /chat
pub async fn chat_handler(
    State(chat): State<Arc<dyn ChatPort>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(json) => json,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "rejected chat body");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match chat.respond(request.message, request.user_id).await {
        Ok(outcome) => {
            if let AuditStatus::Failed(reason) = &outcome.audit {
                warn!(intent = %outcome.intent, reason = %reason, "reply sent without audit record");
            }
            (
                StatusCode::OK,
                Json(ChatResponse {
                    response: outcome.response,
                    intent: outcome.intent,
                }),
            )
                .into_response()
        }
        Err(e) if e.is_validation() => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            error!(error = %e, "chat request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /chat/quick-actions
pub async fn quick_actions_handler(State(chat): State<Arc<dyn ChatPort>>) -> Response {
    match chat.quick_actions().await {
        Ok(actions) => {
            let by_id: BTreeMap<String, String> = actions
                .into_iter()
                .map(|a| (a.action_id, a.response_text))
                .collect();
            (StatusCode::OK, Json(by_id)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list quick actions");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
