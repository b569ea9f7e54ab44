use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::*;
use tracing::info;

use crate::entity::{exam_detail, exam_master, subject};

/// Subjects inserted into an empty database so the exam form is usable right away.
pub const DEFAULT_SUBJECTS: &[&str] = &[
    "Mathematics",
    "English",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
];

/// Seed the `subject` table with defaults when it is empty.
pub async fn seed_subjects(db: &DatabaseConnection) -> Result<(), DbErr> {
    let existing = subject::Entity::find().count(db).await?;
    if existing > 0 {
        return Ok(());
    }

    for &name in DEFAULT_SUBJECTS {
        subject::ActiveModel {
            subject_name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    info!("Seeded {} default subjects", DEFAULT_SUBJECTS.len());
    Ok(())
}

/// Ensure the composite unique indexes exist.
///
/// Composite keys are not declared on the entities, so schema-sync does not
/// create them. They enforce one record per (student, year) and one detail per
/// (record, subject), so a failure here aborts startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_index(
        db,
        "idx_exam_master_student_year",
        Index::create()
            .if_not_exists()
            .unique()
            .table(exam_master::Entity)
            .col(exam_master::Column::StudentId)
            .col(exam_master::Column::ExamYear)
            .to_owned(),
    )
    .await?;

    create_index(
        db,
        "idx_exam_detail_master_subject",
        Index::create()
            .if_not_exists()
            .unique()
            .table(exam_detail::Entity)
            .col(exam_detail::Column::MasterId)
            .col(exam_detail::Column::SubjectId)
            .to_owned(),
    )
    .await?;

    Ok(())
}

async fn create_index(
    db: &DatabaseConnection,
    name: &str,
    mut stmt: IndexCreateStatement,
) -> Result<(), DbErr> {
    stmt.name(name);
    let backend = db.get_database_backend();
    db.execute_raw(backend.build(&stmt)).await?;
    info!("Ensured index {name} exists");
    Ok(())
}
