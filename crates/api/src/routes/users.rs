//! Current-user routes: profile and Telegram linking.

use axum::{extract::State, Json};
use domain::models::{User, UserProfile};
use persistence::repositories::UserRepository;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::services::linking::{LinkingService, LinkingTicket};

/// Get current user profile, including Telegram link status.
///
/// GET /api/v1/users/me
pub async fn get_current_user(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<UserProfile>, ApiError> {
    let user: User = UserRepository::new(state.pool.clone())
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .into();

    Ok(Json(user.into()))
}

/// Issue a one-time Telegram linking token and deep link.
///
/// POST /api/v1/users/me/telegram-link
///
/// Any token issued earlier for this user stops working.
pub async fn create_telegram_link(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<LinkingTicket>, ApiError> {
    let service = LinkingService::new(
        state.pool.clone(),
        &state.config.telegram,
        &state.config.linking,
    );
    let ticket = service.issue(user_auth.user_id).await?;

    info!(user_id = %user_auth.user_id, "Telegram link requested");

    Ok(Json(ticket))
}
