use std::collections::HashSet;

use common::models::Subject;
use sea_orm::*;

use super::RepoError;
use crate::entity::subject;

pub async fn list_subjects<C: ConnectionTrait>(db: &C) -> Result<Vec<Subject>, RepoError> {
    let rows = subject::Entity::find()
        .order_by_asc(subject::Column::SubjectName)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Subject::from).collect())
}

pub async fn find_subject<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<Subject>, RepoError> {
    let row = subject::Entity::find_by_id(id).one(db).await?;
    Ok(row.map(Subject::from))
}

/// Return the IDs from `ids` that have no subject row, in input order without repeats.
pub async fn missing_subject_ids<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
) -> Result<Vec<i32>, RepoError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let existing: HashSet<i32> = subject::Entity::find()
        .filter(subject::Column::Id.is_in(ids.iter().copied()))
        .select_only()
        .column(subject::Column::Id)
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let mut reported = HashSet::new();
    Ok(ids
        .iter()
        .copied()
        .filter(|id| !existing.contains(id) && reported.insert(*id))
        .collect())
}

pub async fn insert_subject<C: ConnectionTrait>(
    db: &C,
    subject_name: &str,
) -> Result<Subject, RepoError> {
    let new_subject = subject::ActiveModel {
        subject_name: Set(subject_name.to_string()),
        ..Default::default()
    };
    let model = new_subject.insert(db).await?;
    Ok(model.into())
}

/// Number of distinct IDs in `ids` that have a subject row.
pub async fn count_existing_subjects<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
) -> Result<u64, RepoError> {
    if ids.is_empty() {
        return Ok(0);
    }
    Ok(subject::Entity::find()
        .filter(subject::Column::Id.is_in(ids.iter().copied()))
        .count(db)
        .await?)
}
