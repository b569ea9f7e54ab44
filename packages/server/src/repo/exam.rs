use std::collections::HashMap;

use chrono::Utc;
use common::ExamOutcome;
use common::models::{ExamDetail, ExamRecord};
use sea_orm::prelude::Expr;
use sea_orm::*;

use super::{RepoError, map_unique_violation};
use crate::entity::{exam_detail, exam_master, student, subject};
use crate::models::exam::{exam_detail_from_rows, exam_record_from_rows};

pub const DUPLICATE_EXAM: &str = "An exam for this student and year already exists.";
/// Reported by the detail unique index; requests normally hit the duplicate-subject validation first.
pub const DUPLICATE_DETAIL: &str =
    "Duplicate subjects are not allowed. Each subject can only be added once.";

/// All exam records with their student and details, newest record first.
pub async fn list_exam_records<C: ConnectionTrait>(db: &C) -> Result<Vec<ExamRecord>, RepoError> {
    let masters = exam_master::Entity::find()
        .find_also_related(student::Entity)
        .order_by_desc(exam_master::Column::Id)
        .all(db)
        .await?;

    let master_ids: Vec<i32> = masters.iter().map(|(m, _)| m.id).collect();
    let mut details = details_by_master(db, &master_ids).await?;

    Ok(masters
        .into_iter()
        .map(|(master, student)| {
            let rows = details.remove(&master.id).unwrap_or_default();
            exam_record_from_rows(master, student, rows)
        })
        .collect())
}

/// One exam record with student and details, or `None` if the ID is unknown.
pub async fn find_exam_record<C: ConnectionTrait>(
    db: &C,
    master_id: i32,
) -> Result<Option<ExamRecord>, RepoError> {
    let Some((master, student)) = exam_master::Entity::find_by_id(master_id)
        .find_also_related(student::Entity)
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let details = list_exam_details(db, master_id).await?;
    Ok(Some(exam_record_from_rows(master, student, details)))
}

/// Details of one record in insertion order; empty when the record has none or does not exist.
pub async fn list_exam_details<C: ConnectionTrait>(
    db: &C,
    master_id: i32,
) -> Result<Vec<ExamDetail>, RepoError> {
    let mut grouped = details_by_master(db, &[master_id]).await?;
    Ok(grouped.remove(&master_id).unwrap_or_default())
}

async fn details_by_master<C: ConnectionTrait>(
    db: &C,
    master_ids: &[i32],
) -> Result<HashMap<i32, Vec<ExamDetail>>, RepoError> {
    let mut grouped: HashMap<i32, Vec<ExamDetail>> = HashMap::new();
    if master_ids.is_empty() {
        return Ok(grouped);
    }

    let rows = exam_detail::Entity::find()
        .filter(exam_detail::Column::MasterId.is_in(master_ids.iter().copied()))
        .find_also_related(subject::Entity)
        .order_by_asc(exam_detail::Column::Id)
        .all(db)
        .await?;

    for (detail, subject) in rows {
        grouped
            .entry(detail.master_id)
            .or_default()
            .push(exam_detail_from_rows(detail, subject));
    }
    Ok(grouped)
}

pub async fn exam_exists<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
    exam_year: i32,
) -> Result<bool, RepoError> {
    let count = exam_master::Entity::find()
        .filter(exam_master::Column::StudentId.eq(student_id))
        .filter(exam_master::Column::ExamYear.eq(exam_year))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Insert a record row with an unfinalized total and verdict; returns the generated ID.
pub async fn insert_exam_master<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
    exam_year: i32,
) -> Result<i32, RepoError> {
    let pending = ExamOutcome::from_marks(std::iter::empty());
    let new_master = exam_master::ActiveModel {
        student_id: Set(student_id),
        exam_year: Set(exam_year),
        total_mark: Set(pending.total_mark),
        pass_or_fail: Set(pending.verdict),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let model = new_master
        .insert(db)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_EXAM))?;
    Ok(model.id)
}

pub async fn insert_exam_detail<C: ConnectionTrait>(
    db: &C,
    master_id: i32,
    subject_id: i32,
    marks: f64,
) -> Result<i32, RepoError> {
    let new_detail = exam_detail::ActiveModel {
        master_id: Set(master_id),
        subject_id: Set(subject_id),
        marks: Set(marks),
        ..Default::default()
    };

    let model = new_detail
        .insert(db)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_DETAIL))?;
    Ok(model.id)
}

/// Compute total mark and verdict from the stored details and write them onto the record.
pub async fn finalize_exam<C: ConnectionTrait>(
    db: &C,
    master_id: i32,
) -> Result<ExamOutcome, RepoError> {
    let marks: Vec<f64> = exam_detail::Entity::find()
        .filter(exam_detail::Column::MasterId.eq(master_id))
        .select_only()
        .column(exam_detail::Column::Marks)
        .into_tuple::<f64>()
        .all(db)
        .await?;

    let outcome = ExamOutcome::from_marks(marks);

    let result = exam_master::Entity::update_many()
        .col_expr(exam_master::Column::TotalMark, Expr::value(outcome.total_mark))
        .col_expr(
            exam_master::Column::PassOrFail,
            Expr::value(outcome.verdict.as_str()),
        )
        .filter(exam_master::Column::Id.eq(master_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(RepoError::Db(DbErr::RecordNotFound(format!(
            "exam_master {master_id}"
        ))));
    }
    Ok(outcome)
}
