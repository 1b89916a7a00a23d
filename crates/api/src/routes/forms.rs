//! Owner-scoped form routes: CRUD, submissions and CSV export.
//!
//! A form owned by someone else is reported exactly like a missing one.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domain::models::{CreateFormRequest, Form, ListFormsQuery, Submission, UpdateFormRequest};
use domain::services::{export_filename, submissions_csv, CSV_CONTENT_TYPE};
use persistence::repositories::{FormRepository, SubmissionRepository};
use serde::Serialize;
use shared::pagination::{PageMetadata, PageRequest};
use shared::validation::{like_contains_pattern, non_blank};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub form: Form,
}

#[derive(Debug, Serialize)]
pub struct FormListResponse {
    pub data: Vec<Form>,
    pub metadata: PageMetadata,
}

#[derive(Debug, Serialize)]
pub struct FormSubmissionsResponse {
    pub form: Form,
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub(crate) fn form_not_found() -> ApiError {
    ApiError::NotFound("Form not found".to_string())
}

/// Form ids in paths that are not UUIDs cannot exist.
pub(crate) fn parse_form_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| form_not_found())
}

fn required_title(title: &str) -> Result<String, ApiError> {
    non_blank(Some(title)).ok_or_else(|| ApiError::Validation("Title is required".to_string()))
}

async fn owned_form(state: &AppState, form_id: Uuid, user_id: Uuid) -> Result<Form, ApiError> {
    FormRepository::new(state.pool.clone())
        .find_owned(form_id, user_id)
        .await?
        .map(Into::into)
        .ok_or_else(form_not_found)
}

/// List the caller's forms, newest first.
///
/// GET /api/v1/forms?page=1&limit=10&search=
pub async fn list_forms(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Query(query): Query<ListFormsQuery>,
) -> Result<Json<FormListResponse>, ApiError> {
    let page = PageRequest::new(query.page, query.limit);
    let pattern = non_blank(query.search.as_deref()).map(|s| like_contains_pattern(&s));

    let repo = FormRepository::new(state.pool.clone());
    let total = repo
        .count_for_user(user_auth.user_id, pattern.as_deref())
        .await?;
    let forms = repo
        .list_for_user(
            user_auth.user_id,
            pattern.as_deref(),
            Some(page.limit),
            page.offset(),
        )
        .await?;

    Ok(Json(FormListResponse {
        data: forms.into_iter().map(Into::into).collect(),
        metadata: PageMetadata::new(page, total),
    }))
}

/// POST /api/v1/forms
pub async fn create_form(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateFormRequest>,
) -> Result<(StatusCode, Json<FormResponse>), ApiError> {
    request.validate()?;
    let title = required_title(&request.title)?;
    let description = non_blank(request.description.as_deref());

    let form: Form = FormRepository::new(state.pool.clone())
        .create(
            user_auth.user_id,
            &title,
            description.as_deref(),
            &request.questions,
        )
        .await?
        .into();

    info!(
        user_id = %user_auth.user_id,
        form_id = %form.id,
        questions = form.questions.len(),
        "Form created"
    );

    Ok((StatusCode::CREATED, Json(FormResponse { form })))
}

/// GET /api/v1/forms/:id
pub async fn get_form(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(form_id): Path<String>,
) -> Result<Json<FormResponse>, ApiError> {
    let form_id = parse_form_id(&form_id)?;
    let form = owned_form(&state, form_id, user_auth.user_id).await?;
    Ok(Json(FormResponse { form }))
}

/// PUT /api/v1/forms/:id
pub async fn update_form(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(form_id): Path<String>,
    Json(request): Json<UpdateFormRequest>,
) -> Result<Json<FormResponse>, ApiError> {
    let form_id = parse_form_id(&form_id)?;
    request.validate()?;
    let title = required_title(&request.title)?;
    let description = non_blank(request.description.as_deref());

    let form: Form = FormRepository::new(state.pool.clone())
        .update(
            form_id,
            user_auth.user_id,
            &title,
            description.as_deref(),
            &request.questions,
            request.is_public,
        )
        .await?
        .map(Into::into)
        .ok_or_else(form_not_found)?;

    info!(user_id = %user_auth.user_id, form_id = %form.id, "Form updated");

    Ok(Json(FormResponse { form }))
}

/// DELETE /api/v1/forms/:id
///
/// Submissions are removed with the form.
pub async fn delete_form(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(form_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let form_id = parse_form_id(&form_id)?;

    let deleted = FormRepository::new(state.pool.clone())
        .delete(form_id, user_auth.user_id)
        .await?;
    if !deleted {
        return Err(form_not_found());
    }

    info!(user_id = %user_auth.user_id, form_id = %form_id, "Form deleted");

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/v1/forms/:id/submissions
pub async fn list_submissions(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(form_id): Path<String>,
) -> Result<Json<FormSubmissionsResponse>, ApiError> {
    let form_id = parse_form_id(&form_id)?;
    let form = owned_form(&state, form_id, user_auth.user_id).await?;

    let submissions = SubmissionRepository::new(state.pool.clone())
        .list_for_form(form.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(FormSubmissionsResponse { form, submissions }))
}

/// Download all submissions as CSV.
///
/// GET /api/v1/forms/:id/export
pub async fn export_submissions(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(form_id): Path<String>,
) -> Result<Response, ApiError> {
    let form_id = parse_form_id(&form_id)?;
    let form = owned_form(&state, form_id, user_auth.user_id).await?;

    let submissions: Vec<Submission> = SubmissionRepository::new(state.pool.clone())
        .list_for_form(form.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let csv = submissions_csv(&form, &submissions);
    let disposition = format!("attachment; filename=\"{}\"", export_filename(&form.title));

    info!(
        user_id = %user_auth.user_id,
        form_id = %form.id,
        rows = submissions.len(),
        "Exported submissions"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
