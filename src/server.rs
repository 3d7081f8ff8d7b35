//! HTTP surface: the Slack events endpoint and a health check.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::slack::handlers::handle_event;
use crate::slack::verify::verify_signature;
use crate::slack::EventEnvelope;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/slack/events", post(slack_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Entry point for all Slack Events API traffic.
///
/// Verifies the request signature, answers `url_verification` inline, and
/// acks `event_callback` immediately while the event is processed in a
/// spawned task (Slack retries anything not acked within three seconds).
async fn slack_events(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let body = String::from_utf8_lossy(&body).into_owned();

    let timestamp = header_str(&headers, "x-slack-request-timestamp");
    let signature = header_str(&headers, "x-slack-signature");
    if !verify_signature(
        &state.config.slack_signing_secret,
        timestamp,
        &body,
        signature,
        Utc::now().timestamp(),
    ) {
        tracing::warn!("Rejected Slack event with invalid signature");
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad signature" })));
    }

    let envelope: EventEnvelope = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!("Unparseable Slack event payload: {}", err);
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad payload" })));
        }
    };

    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            (StatusCode::OK, Json(json!({ "challenge": challenge })))
        }
        EventEnvelope::EventCallback { event } => {
            let chat = state.chat.clone();
            let orchestrator = state.orchestrator.clone();
            tokio::spawn(async move {
                handle_event(event, chat, orchestrator).await;
            });
            (StatusCode::OK, Json(json!({ "ok": true })))
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}
