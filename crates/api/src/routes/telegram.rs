//! Telegram webhook route.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::services::bot::BotCommandHandler;
use crate::services::telegram::Update;

/// POST /api/v1/telegram/webhook
///
/// Always acknowledges with `{"ok": true}` so Telegram does not redeliver.
/// The secret header is checked by `require_webhook_secret` before this runs.
pub async fn webhook(
    State(state): State<AppState>,
    payload: Result<Json<Update>, JsonRejection>,
) -> Json<Value> {
    let ack = Json(json!({ "ok": true }));

    let update = match payload {
        Ok(Json(update)) => update,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Ignoring malformed Telegram update");
            return ack;
        }
    };

    let Some(message) = update.message else {
        tracing::debug!(update_id = update.update_id, "Ignoring update without message");
        return ack;
    };

    let Some(gateway) = state.gateway.clone() else {
        tracing::warn!(
            update_id = update.update_id,
            "Telegram update received but no chat gateway is configured"
        );
        return ack;
    };

    BotCommandHandler::new(state.pool.clone(), gateway, &state.config)
        .handle_message(&message)
        .await;

    ack
}
