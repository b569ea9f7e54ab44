use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use common::models::{CreateStudentRequest, Student};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::student::validate_create_student;
use crate::repo;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/students",
    tag = "Students",
    operation_id = "listStudents",
    summary = "List students",
    description = "Returns every student ordered by name.",
    responses(
        (status = 200, description = "List of students", body = Vec<Student>),
        (status = 500, description = "Unexpected failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    let students = repo::student::list_students(&state.db).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "Students",
    operation_id = "getStudent",
    summary = "Get a student by ID",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Unexpected failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Student>, AppError> {
    let student = repo::student::find_student(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(crate::workflow::STUDENT_NOT_FOUND.into()))?;
    Ok(Json(student))
}

#[utoipa::path(
    post,
    path = "/students",
    tag = "Students",
    operation_id = "createStudent",
    summary = "Create a student",
    description = "Creates a student. The name must be 5-250 characters and the mail address must contain `@` and be unused.",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Mail address already registered (CONFLICT)", body = ErrorBody),
        (status = 500, description = "Unexpected failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(mail = %payload.mail))]
pub async fn create_student(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_student(&payload)?;

    let student = repo::student::insert_student(
        &state.db,
        payload.student_name.trim(),
        payload.mail.trim(),
    )
    .await?;

    let location = format!("/api/students/{}", student.student_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(student),
    ))
}
