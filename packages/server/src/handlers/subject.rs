use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use common::models::{CreateSubjectRequest, Subject};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::subject::validate_create_subject;
use crate::repo;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/subjects",
    tag = "Subjects",
    operation_id = "listSubjects",
    summary = "List subjects",
    responses(
        (status = 200, description = "List of subjects", body = Vec<Subject>),
        (status = 500, description = "Unexpected failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>, AppError> {
    let subjects = repo::subject::list_subjects(&state.db).await?;
    Ok(Json(subjects))
}

#[utoipa::path(
    get,
    path = "/subjects/{id}",
    tag = "Subjects",
    operation_id = "getSubject",
    summary = "Get a subject by ID",
    params(("id" = i32, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject", body = Subject),
        (status = 404, description = "Subject not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Unexpected failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Subject>, AppError> {
    let subject = repo::subject::find_subject(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Subject not found.".into()))?;
    Ok(Json(subject))
}

#[utoipa::path(
    post,
    path = "/subjects",
    tag = "Subjects",
    operation_id = "createSubject",
    summary = "Create a subject",
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Unexpected failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(subject_name = %payload.subject_name))]
pub async fn create_subject(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSubjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_subject(&payload)?;

    let subject = repo::subject::insert_subject(&state.db, payload.subject_name.trim()).await?;

    let location = format!("/api/subjects/{}", subject.subject_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(subject),
    ))
}
