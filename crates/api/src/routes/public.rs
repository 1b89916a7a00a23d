//! Unauthenticated form routes used by respondents.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{sanitize_answers, Form, PublicForm, Submission, SubmitFormRequest};
use persistence::repositories::{FormRepository, SubmissionRepository};
use serde::Serialize;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_submission_received;
use crate::routes::forms::{form_not_found, parse_form_id};
use crate::services::notification::SubmissionNotifier;

#[derive(Debug, Serialize)]
pub struct PublicFormResponse {
    pub form: PublicForm,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub submission_id: Uuid,
}

/// Only public forms are reachable anonymously.
async fn public_form(state: &AppState, raw_id: &str) -> Result<Form, ApiError> {
    let form_id = parse_form_id(raw_id)?;
    FormRepository::new(state.pool.clone())
        .find_by_id(form_id)
        .await?
        .map(Form::from)
        .filter(|form| form.is_public)
        .ok_or_else(form_not_found)
}

/// GET /api/v1/public/forms/:id
pub async fn get_public_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Json<PublicFormResponse>, ApiError> {
    let form = public_form(&state, &form_id).await?;
    Ok(Json(PublicFormResponse { form: form.into() }))
}

/// Record an anonymous submission and notify the owner in the background.
///
/// POST /api/v1/public/forms/:id/submissions
pub async fn submit_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    payload: Result<Json<SubmitFormRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let raw_answers = payload
        .ok()
        .and_then(|Json(body)| body.answers)
        .ok_or_else(|| ApiError::Validation("Missing answers".to_string()))?;

    let form = public_form(&state, &form_id).await?;
    let answers = sanitize_answers(&raw_answers, &form.questions)?;

    let submission: Submission = SubmissionRepository::new(state.pool.clone())
        .create(form.id, &answers)
        .await?
        .into();

    record_submission_received();
    info!(
        form_id = %form.id,
        submission_id = %submission.id,
        answered = submission.answers.len(),
        "Submission received"
    );

    let submission_id = submission.id;
    let notifier = SubmissionNotifier::new(state.pool.clone(), state.gateway.clone());
    tokio::spawn(
        async move {
            let result = notifier.notify(&form, &submission).await;
            tracing::debug!(
                form_id = %form.id,
                submission_id = %submission.id,
                result = ?result,
                "Notification finished"
            );
        }
        .instrument(tracing::Span::current()),
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            submission_id,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_response_serialization() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(SubmitResponse {
            success: true,
            submission_id: id,
        })
        .unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["submissionId"], id.to_string());
    }
}
