use common::models::Student;
use sea_orm::*;

use super::{RepoError, map_unique_violation};
use crate::entity::student;

pub const DUPLICATE_MAIL: &str = "A student with this mail address already exists.";

pub async fn list_students<C: ConnectionTrait>(db: &C) -> Result<Vec<Student>, RepoError> {
    let rows = student::Entity::find()
        .order_by_asc(student::Column::StudentName)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Student::from).collect())
}

pub async fn find_student<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<Student>, RepoError> {
    let row = student::Entity::find_by_id(id).one(db).await?;
    Ok(row.map(Student::from))
}

/// Insert a student. Name and mail are stored as given; callers trim them.
pub async fn insert_student<C: ConnectionTrait>(
    db: &C,
    student_name: &str,
    mail: &str,
) -> Result<Student, RepoError> {
    let new_student = student::ActiveModel {
        student_name: Set(student_name.to_string()),
        mail: Set(mail.to_string()),
        ..Default::default()
    };

    let model = new_student
        .insert(db)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_MAIL))?;
    Ok(model.into())
}
