use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use common::models::{CreateExamRequest, ExamDetail, ExamRecord};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::exam::validate_create_exam;
use crate::repo;
use crate::state::AppState;
use crate::workflow;

#[utoipa::path(
    get,
    path = "/exams",
    tag = "Exams",
    operation_id = "listExams",
    summary = "List exam records",
    description = "Returns every exam record, newest first, with the student and each subject's mark.",
    responses(
        (status = 200, description = "List of exam records", body = Vec<ExamRecord>),
        (status = 500, description = "Unexpected failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_exams(State(state): State<AppState>) -> Result<Json<Vec<ExamRecord>>, AppError> {
    let records = repo::exam::list_exam_records(&state.db).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/exams/{id}",
    tag = "Exams",
    operation_id = "getExam",
    summary = "Get an exam record by ID",
    params(("id" = i32, Path, description = "Exam record ID")),
    responses(
        (status = 200, description = "Exam record", body = ExamRecord),
        (status = 404, description = "Exam record not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Unexpected failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_exam(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ExamRecord>, AppError> {
    let record = repo::exam::find_exam_record(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exam not found.".into()))?;
    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/exams/{id}/details",
    tag = "Exams",
    operation_id = "getExamDetails",
    summary = "List the subject marks of an exam record",
    description = "Returns the detail rows of an exam record. Responds 404 when there are none, which includes unknown record IDs.",
    params(("id" = i32, Path, description = "Exam record ID")),
    responses(
        (status = 200, description = "Exam details", body = Vec<ExamDetail>),
        (status = 404, description = "No details for this exam (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Unexpected failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_exam_details(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ExamDetail>>, AppError> {
    let details = repo::exam::list_exam_details(&state.db, id).await?;
    if details.is_empty() {
        return Err(AppError::NotFound(
            "No details found for this exam.".into(),
        ));
    }
    Ok(Json(details))
}

#[utoipa::path(
    post,
    path = "/exams",
    tag = "Exams",
    operation_id = "createExam",
    summary = "Create an exam record with its subject marks",
    description = "Creates the record and all details in one transaction, then computes the total mark and PASS/FAIL verdict (PASS only if every subject has at least 25). Nothing is stored when any check fails.",
    request_body = CreateExamRequest,
    responses(
        (status = 201, description = "Exam record created", body = ExamRecord),
        (status = 400, description = "Validation error, duplicate or unknown subjects (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "A record already exists for this student and year (CONFLICT)", body = ErrorBody),
        (status = 500, description = "Unexpected failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(student_id = payload.student_id, exam_year = payload.exam_year))]
pub async fn create_exam(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_exam(&payload)?;

    let record = workflow::create_exam(&state.db, payload).await?;

    let location = format!("/api/exams/{}", record.master_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    ))
}
