//! Shared-secret check for the Telegram webhook.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app::AppState;
use shared::crypto::secrets_match;

/// Header Telegram sets when the webhook was registered with `secret_token`.
pub const TELEGRAM_SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Rejects webhook calls whose secret header does not match
/// `telegram.webhook_secret`. An empty configured secret disables the check.
pub async fn require_webhook_secret(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let expected = state.config.telegram.webhook_secret.as_str();
    if expected.is_empty() {
        return next.run(req).await;
    }

    let provided = req
        .headers()
        .get(TELEGRAM_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if secrets_match(expected, provided) {
        next.run(req).await
    } else {
        tracing::warn!("Rejected webhook call with bad secret token");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "unauthorized",
                "message": "Invalid webhook secret"
            })),
        )
            .into_response()
    }
}
