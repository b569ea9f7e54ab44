use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::health::health))
        .merge(student_routes())
        .merge(subject_routes())
        .merge(exam_routes())
}

fn student_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::student::list_students,
            handlers::student::create_student
        ))
        .routes(routes!(handlers::student::get_student))
}

fn subject_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::subject::list_subjects,
            handlers::subject::create_subject
        ))
        .routes(routes!(handlers::subject::get_subject))
}

fn exam_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::exam::list_exams, handlers::exam::create_exam))
        .routes(routes!(handlers::exam::get_exam))
        .routes(routes!(handlers::exam::get_exam_details))
}
