//! Dashboard summary route.

use axum::{extract::State, Json};
use persistence::repositories::FormRepository;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_forms: i64,
    pub total_submissions: i64,
}

/// GET /api/v1/dashboard/stats
pub async fn get_stats(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = FormRepository::new(state.pool.clone())
        .stats_for_user(user_auth.user_id)
        .await?;

    Ok(Json(DashboardStats {
        total_forms: stats.total_forms,
        total_submissions: stats.total_submissions,
    }))
}
